//! Model Module - Scaler & Regression Inference
//!
//! Keeps inference apart from feature collection so the model format can be
//! swapped (ONNX, linear) without touching the form side.

pub mod inference;
pub mod linear;
pub mod scaler;
pub mod adapter;
#[cfg(test)]
mod tests;

// Re-export common types
pub use inference::{load_engine, EngineKind, InferenceEngine, InferenceError, OnnxEngine};
pub use linear::LinearEngine;
pub use scaler::{ScalerParams, StandardScaler};
pub use adapter::{format_price, InferenceAdapter, PredictionResult, PRICE_MULTIPLIER};
