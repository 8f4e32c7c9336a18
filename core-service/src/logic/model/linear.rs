//! Linear regression engine
//!
//! Pure-Rust engine for models exported as coefficients + intercept
//! (`{"coefficients": [...], "intercept": 22.5}`, sklearn `coef_`/`intercept_`
//! accepted). Operates on the scaled row like any other engine.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::logic::features::layout::FEATURE_COUNT;
use super::inference::{EngineKind, InferenceEngine, InferenceError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearEngine {
    #[serde(alias = "coef_")]
    coefficients: Vec<f64>,
    #[serde(alias = "intercept_")]
    intercept: f64,
}

impl LinearEngine {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Result<Self, InferenceError> {
        let engine = Self { coefficients, intercept };
        engine.check()?;
        Ok(engine)
    }

    /// Load model artifact from a JSON file
    pub fn load(path: &Path) -> Result<Self, InferenceError> {
        log::info!("Loading linear model from: {}", path.display());

        if !path.exists() {
            return Err(InferenceError::NotFound(path.display().to_string()));
        }

        let data = std::fs::read(path)
            .map_err(|e| InferenceError::InvalidArtifact(format!("Failed to read model: {}", e)))?;
        let engine: Self = serde_json::from_slice(&data)
            .map_err(|e| InferenceError::InvalidArtifact(format!("Failed to parse model: {}", e)))?;
        engine.check()?;

        Ok(engine)
    }

    fn check(&self) -> Result<(), InferenceError> {
        if self.coefficients.len() != FEATURE_COUNT {
            return Err(InferenceError::WidthMismatch {
                artifact: "linear model".to_string(),
                expected: FEATURE_COUNT,
                actual: self.coefficients.len(),
            });
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(InferenceError::InvalidArtifact("non-finite model parameter".to_string()));
        }
        Ok(())
    }
}

impl InferenceEngine for LinearEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Linear
    }

    fn input_width(&self) -> usize {
        self.coefficients.len()
    }

    fn predict(&self, row: &[f64]) -> Result<f64, InferenceError> {
        if row.len() != self.coefficients.len() {
            return Err(InferenceError::WidthMismatch {
                artifact: "linear model".to_string(),
                expected: row.len(),
                actual: self.coefficients.len(),
            });
        }

        let value = self.intercept
            + row.iter().zip(&self.coefficients).map(|(x, w)| x * w).sum::<f64>();

        if !value.is_finite() {
            return Err(InferenceError::InvalidOutput(format!("non-finite prediction {}", value)));
        }
        Ok(value)
    }
}
