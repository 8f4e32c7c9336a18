//! Logic Module - Prediction Pipeline
//!
//! ## Architecture
//! - `features/` - Feature layout, vectors, form input collection
//! - `baseline/` - Reference statistics and the outlier guard
//! - `model/` - Scaler, regression engines, inference adapter
//! - `pipeline` - Once-loaded context tying the three stages together

pub mod config;
pub mod features;
pub mod baseline;
pub mod model;
pub mod pipeline;
