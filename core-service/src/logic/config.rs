//! Pipeline configuration (artifact locations)

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Regression model (`.onnx` or linear `.json`)
    pub model_path: PathBuf,

    /// Fitted scaler (JSON)
    pub scaler_path: PathBuf,

    /// Reference dataset used for defaults and outlier statistics (CSV)
    pub dataset_path: PathBuf,
}

impl PipelineConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            model_path: constants::get_model_path().into(),
            scaler_path: constants::get_scaler_path().into(),
            dataset_path: constants::get_dataset_path().into(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model_path: constants::DEFAULT_MODEL_PATH.into(),
            scaler_path: constants::DEFAULT_SCALER_PATH.into(),
            dataset_path: constants::DEFAULT_DATASET_PATH.into(),
        }
    }
}
