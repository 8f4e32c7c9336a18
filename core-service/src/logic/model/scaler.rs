//! Standard Scaler - fitted affine transform applied before inference
//!
//! Artifact format (JSON, sklearn attribute names accepted):
//!
//! ```json
//! { "feature_names": ["CRIM", ...], "mean": [...], "scale": [...] }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::logic::features::layout::{matches_layout_names, FEATURE_COUNT};
use super::inference::InferenceError;

/// Scaler parameters as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerParams {
    #[serde(default, alias = "feature_names_in_")]
    pub feature_names: Option<Vec<String>>,
    #[serde(alias = "mean_", alias = "center")]
    pub mean: Vec<f64>,
    #[serde(alias = "scale_")]
    pub scale: Vec<f64>,
}

/// `scaled[i] = (row[i] - center[i]) / scale[i]`
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    center: [f64; FEATURE_COUNT],
    scale: [f64; FEATURE_COUNT],
}

impl StandardScaler {
    /// Build from per-feature parameters (layout order)
    pub fn new(center: &[f64], scale: &[f64]) -> Result<Self, InferenceError> {
        if center.len() != FEATURE_COUNT || scale.len() != FEATURE_COUNT {
            return Err(InferenceError::WidthMismatch {
                artifact: "scaler".to_string(),
                expected: FEATURE_COUNT,
                actual: center.len().max(scale.len()),
            });
        }

        if let Some(i) = center.iter().position(|c| !c.is_finite()) {
            return Err(InferenceError::InvalidArtifact(format!("scaler center[{}] is not finite", i)));
        }
        if let Some(i) = scale.iter().position(|s| !s.is_finite() || *s == 0.0) {
            return Err(InferenceError::InvalidArtifact(format!(
                "scaler scale[{}] must be finite and non-zero, got {}",
                i, scale[i]
            )));
        }

        let mut c = [0.0; FEATURE_COUNT];
        let mut s = [0.0; FEATURE_COUNT];
        c.copy_from_slice(center);
        s.copy_from_slice(scale);

        Ok(Self { center: c, scale: s })
    }

    /// Build from artifact params, checking feature names against the layout
    pub fn from_params(params: &ScalerParams) -> Result<Self, InferenceError> {
        if let Some(names) = &params.feature_names {
            if !matches_layout_names(names) {
                return Err(InferenceError::InvalidArtifact(format!(
                    "scaler was fitted on columns {:?}, which do not match the feature layout",
                    names
                )));
            }
        } else {
            log::warn!("Scaler artifact has no feature names; relying on width check only");
        }

        Self::new(&params.mean, &params.scale)
    }

    /// Load scaler artifact from a JSON file
    pub fn load(path: &Path) -> Result<Self, InferenceError> {
        log::info!("Loading scaler from: {}", path.display());

        if !path.exists() {
            return Err(InferenceError::NotFound(path.display().to_string()));
        }

        let data = std::fs::read(path)
            .map_err(|e| InferenceError::InvalidArtifact(format!("Failed to read scaler: {}", e)))?;
        let params: ScalerParams = serde_json::from_slice(&data)
            .map_err(|e| InferenceError::InvalidArtifact(format!("Failed to parse scaler: {}", e)))?;

        Self::from_params(&params)
    }

    /// Apply the affine transform to one ordered row
    pub fn transform(&self, row: &[f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
        let mut scaled = [0.0; FEATURE_COUNT];
        for i in 0..FEATURE_COUNT {
            scaled[i] = (row[i] - self.center[i]) / self.scale[i];
        }
        scaled
    }

    pub fn center(&self) -> &[f64; FEATURE_COUNT] {
        &self.center
    }

    pub fn scale(&self) -> &[f64; FEATURE_COUNT] {
        &self.scale
    }
}
