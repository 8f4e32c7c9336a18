//! Inference Adapter
//!
//! FeatureVector → ordered row → scaler → engine → dollars.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::logic::features::layout::{feature_name, FEATURE_COUNT};
use crate::logic::features::FeatureVector;
use super::inference::{EngineKind, InferenceEngine, InferenceError};
use super::scaler::StandardScaler;

/// Model output is in thousands of dollars
pub const PRICE_MULTIPLIER: f64 = 1000.0;

/// `$12345.67`
pub fn format_price(dollars: f64) -> String {
    format!("${:.2}", dollars)
}

/// Prediction output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    pub request_id: Uuid,
    /// Raw model output (thousands of dollars)
    pub value_thousands: f64,
    pub price_usd: f64,
    pub formatted_price: String,
    pub engine: EngineKind,
    pub inference_time_us: u64,
    pub predicted_at: DateTime<Utc>,
}

impl PredictionResult {
    fn new(value_thousands: f64, engine: EngineKind, inference_time_us: u64) -> Self {
        let price_usd = value_thousands * PRICE_MULTIPLIER;
        Self {
            request_id: Uuid::new_v4(),
            value_thousands,
            price_usd,
            formatted_price: format_price(price_usd),
            engine,
            inference_time_us,
            predicted_at: Utc::now(),
        }
    }
}

/// Scaler + engine bound to the feature layout
pub struct InferenceAdapter {
    scaler: StandardScaler,
    engine: Box<dyn InferenceEngine>,
}

impl InferenceAdapter {
    /// Bind artifacts; fails if the engine was exported for another width
    pub fn new(scaler: StandardScaler, engine: Box<dyn InferenceEngine>) -> Result<Self, InferenceError> {
        let width = engine.input_width();
        if width != FEATURE_COUNT {
            return Err(InferenceError::WidthMismatch {
                artifact: format!("{} model", engine.kind()),
                expected: FEATURE_COUNT,
                actual: width,
            });
        }

        Ok(Self { scaler, engine })
    }

    pub fn engine_kind(&self) -> EngineKind {
        self.engine.kind()
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    /// Run the model on one validated vector
    pub fn predict(&self, vector: &FeatureVector) -> Result<PredictionResult, InferenceError> {
        let start_time = Instant::now();

        let row = vector.to_row().map_err(|e| {
            log::error!("Refusing to predict on foreign layout: {}", e);
            InferenceError::from(e)
        })?;

        let scaled = self.scaler.transform(&row);
        check_range(&row, &scaled)?;
        let value = self.engine.predict(&scaled)?;
        if !value.is_finite() {
            return Err(InferenceError::InvalidOutput(format!("non-finite prediction {}", value)));
        }

        let inference_time = start_time.elapsed().as_micros() as u64;
        log::debug!("{} prediction {:.4} in {}us", self.engine.kind(), value, inference_time);

        Ok(PredictionResult::new(value, self.engine.kind(), inference_time))
    }
}

/// Scaled values must fit in `f32` (the ONNX input type), whatever the engine
fn check_range(row: &[f64], scaled: &[f64]) -> Result<(), InferenceError> {
    let limit = f32::MAX as f64;
    for (i, v) in scaled.iter().enumerate() {
        if !v.is_finite() || v.abs() > limit {
            return Err(InferenceError::OutOfRange {
                feature: feature_name(i).unwrap_or("?").to_string(),
                value: row.get(i).copied().unwrap_or(f64::NAN),
            });
        }
    }
    Ok(())
}
