//! Housing Price Prediction - Core Pipeline
//!
//! Collects the 13 Boston housing attributes, warns about values far from
//! the reference data, and runs the frozen regression model on the scaled row.
//!
//! ```text
//! form input ──► FeatureCollector ──► FeatureVector ──► InferenceAdapter ──► PredictionResult
//!                                          │                (scaler → engine → x1000)
//!                                          └──► outlier guard ──► advisories (non-blocking)
//! ```

pub mod constants;
pub mod logic;

pub use logic::baseline::{Advisory, StatsTable};
pub use logic::config::PipelineConfig;
pub use logic::features::{FeatureVector, FieldInput};
pub use logic::model::PredictionResult;
pub use logic::pipeline::{Evaluation, PipelineContext, PipelineError, Review};
