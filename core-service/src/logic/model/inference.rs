//! Inference Engine - ONNX Runtime Integration
//!
//! Runs the frozen regression model on one scaled row.
//! Engines sit behind `InferenceEngine` so the model format can be swapped.

use std::path::Path;

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::logic::features::layout::{LayoutMismatchError, FEATURE_COUNT};
use super::linear::LinearEngine;

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug)]
pub enum InferenceError {
    /// Artifact file does not exist
    NotFound(String),
    /// Artifact exists but could not be parsed or is inconsistent
    InvalidArtifact(String),
    /// Artifact width differs from the feature layout
    WidthMismatch {
        artifact: String,
        expected: usize,
        actual: usize,
    },
    /// Vector was built against another feature layout
    LayoutMismatch(LayoutMismatchError),
    /// Valid submission that scales outside what the engine can represent
    OutOfRange {
        feature: String,
        value: f64,
    },
    /// Model failed while running
    Runtime(String),
    /// Model returned something other than one finite scalar
    InvalidOutput(String),
}

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InferenceError::NotFound(path) => write!(f, "InferenceError: artifact not found: {}", path),
            InferenceError::InvalidArtifact(msg) => write!(f, "InferenceError: invalid artifact: {}", msg),
            InferenceError::WidthMismatch { artifact, expected, actual } => write!(
                f,
                "InferenceError: {} expects {} features, layout has {}",
                artifact, actual, expected
            ),
            InferenceError::LayoutMismatch(e) => write!(f, "InferenceError: {}", e),
            InferenceError::OutOfRange { feature, value } => write!(
                f,
                "InferenceError: {} = {} is too large for the model",
                feature, value
            ),
            InferenceError::Runtime(msg) => write!(f, "InferenceError: {}", msg),
            InferenceError::InvalidOutput(msg) => write!(f, "InferenceError: invalid model output: {}", msg),
        }
    }
}

impl std::error::Error for InferenceError {}

impl From<LayoutMismatchError> for InferenceError {
    fn from(err: LayoutMismatchError) -> Self {
        InferenceError::LayoutMismatch(err)
    }
}

// ============================================================================
// INFERENCE ENGINE TRAIT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    Onnx,
    Linear,
}

impl std::fmt::Display for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineKind::Onnx => write!(f, "onnx"),
            EngineKind::Linear => write!(f, "linear"),
        }
    }
}

/// Trait for regression engines (ONNX, linear, ...)
pub trait InferenceEngine: Send + Sync {
    fn kind(&self) -> EngineKind;

    /// Number of features the model was exported for
    fn input_width(&self) -> usize;

    /// Run on one scaled row, returning the single output scalar
    fn predict(&self, row: &[f64]) -> Result<f64, InferenceError>;
}

/// Pick an engine from the artifact extension (`.onnx` or `.json`)
pub fn load_engine(path: &Path) -> Result<Box<dyn InferenceEngine>, InferenceError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("onnx") => Ok(Box::new(OnnxEngine::load(path)?)),
        Some("json") => Ok(Box::new(LinearEngine::load(path)?)),
        _ => Err(InferenceError::InvalidArtifact(format!(
            "unsupported model format: {} (expected .onnx or .json)",
            path.display()
        ))),
    }
}

/// Reduce a model output to its single scalar
pub fn single_output(data: &[f32]) -> Result<f64, InferenceError> {
    match data {
        [value] if value.is_finite() => Ok(*value as f64),
        [value] => Err(InferenceError::InvalidOutput(format!("non-finite prediction {}", value))),
        _ => Err(InferenceError::InvalidOutput(format!(
            "expected exactly one scalar, got {} values",
            data.len()
        ))),
    }
}

// ============================================================================
// ONNX IMPLEMENTATION
// ============================================================================

/// ONNX Runtime session (`run` needs exclusive access)
pub struct OnnxEngine {
    session: Mutex<Session>,
    output_name: String,
}

impl OnnxEngine {
    /// Load ONNX model from file and verify it accepts a layout-wide row
    pub fn load(model_path: &Path) -> Result<Self, InferenceError> {
        log::info!("Loading ONNX model from: {}", model_path.display());

        if !model_path.exists() {
            return Err(InferenceError::NotFound(model_path.display().to_string()));
        }

        let session = Session::builder()
            .map_err(|e| InferenceError::InvalidArtifact(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| InferenceError::InvalidArtifact(format!("Failed to set optimization: {}", e)))?
            .with_intra_threads(1)
            .map_err(|e| InferenceError::InvalidArtifact(format!("Failed to set threads: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| InferenceError::InvalidArtifact(format!("Failed to load model: {}", e)))?;

        let output_name = session.outputs.first()
            .map(|o| o.name.clone())
            .ok_or_else(|| InferenceError::InvalidArtifact("No output defined".to_string()))?;

        let engine = Self {
            session: Mutex::new(session),
            output_name,
        };

        // Probe with a zero row: a model exported for another width fails here, not per request
        let probe = engine.run(&[0.0; FEATURE_COUNT]).map_err(|e| {
            InferenceError::InvalidArtifact(format!(
                "model rejected a {}-feature row: {}",
                FEATURE_COUNT, e
            ))
        })?;
        single_output(&probe)?;

        log::info!("ONNX model loaded successfully");
        Ok(engine)
    }

    fn run(&self, row: &[f64]) -> Result<Vec<f32>, InferenceError> {
        let input_array = Array2::<f32>::from_shape_vec(
            (1, row.len()),
            row.iter().map(|&v| v as f32).collect(),
        ).map_err(|e| InferenceError::Runtime(format!("Array error: {}", e)))?;

        let input_tensor = Value::from_array(input_array)
            .map_err(|e| InferenceError::Runtime(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session.run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError::Runtime(format!("Inference failed: {}", e)))?;

        let output = outputs.get(&self.output_name)
            .ok_or_else(|| InferenceError::InvalidOutput("No output".to_string()))?;

        let output_tensor = output.try_extract_tensor::<f32>()
            .map_err(|e| InferenceError::InvalidOutput(format!("Extract error: {}", e)))?;

        Ok(output_tensor.1.to_vec())
    }
}

impl InferenceEngine for OnnxEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Onnx
    }

    fn input_width(&self) -> usize {
        // Verified by the probe in `load`
        FEATURE_COUNT
    }

    fn predict(&self, row: &[f64]) -> Result<f64, InferenceError> {
        let data = self.run(row)?;
        single_output(&data)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_output() {
        assert_eq!(single_output(&[22.5]).unwrap(), 22.5);
        assert!(matches!(single_output(&[]), Err(InferenceError::InvalidOutput(_))));
        assert!(matches!(single_output(&[1.0, 2.0]), Err(InferenceError::InvalidOutput(_))));
        assert!(matches!(single_output(&[f32::NAN]), Err(InferenceError::InvalidOutput(_))));
    }

    #[test]
    fn test_unsupported_model_format() {
        let result = load_engine(Path::new("boston_model.h5"));
        assert!(matches!(result, Err(InferenceError::InvalidArtifact(_))));
    }

    #[test]
    fn test_missing_onnx_model() {
        let dir = tempfile::tempdir().unwrap();
        let result = OnnxEngine::load(&dir.path().join("boston_model.onnx"));
        assert!(matches!(result, Err(InferenceError::NotFound(_))));
    }

    #[test]
    fn test_engine_kind_display() {
        assert_eq!(EngineKind::Onnx.to_string(), "onnx");
        assert_eq!(serde_json::to_string(&EngineKind::Linear).unwrap(), "\"linear\"");
    }
}
