//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! To change where artifacts are looked up by default, only edit this file.

/// Default ONNX regression model
pub const DEFAULT_MODEL_PATH: &str = "artifacts/boston_model.onnx";

/// Default fitted scaler (JSON)
pub const DEFAULT_SCALER_PATH: &str = "artifacts/boston_scaler.json";

/// Default reference dataset (CSV)
pub const DEFAULT_DATASET_PATH: &str = "artifacts/boston.csv";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Boston Housing Price Prediction";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get model path from environment or use default
pub fn get_model_path() -> String {
    std::env::var("HOUSING_MODEL_PATH")
        .unwrap_or_else(|_| DEFAULT_MODEL_PATH.to_string())
}

/// Get scaler path from environment or use default
pub fn get_scaler_path() -> String {
    std::env::var("HOUSING_SCALER_PATH")
        .unwrap_or_else(|_| DEFAULT_SCALER_PATH.to_string())
}

/// Get reference dataset path from environment or use default
pub fn get_dataset_path() -> String {
    std::env::var("HOUSING_DATASET_PATH")
        .unwrap_or_else(|_| DEFAULT_DATASET_PATH.to_string())
}
