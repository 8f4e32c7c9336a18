//! Features Module - Feature Schema & Collection
//!
//! `layout` fixes the feature order, `vector` carries one validated row,
//! `collector` turns form input into vectors.

pub mod layout;
pub mod vector;
pub mod collector;


// Re-export common types
pub use layout::{FeatureDomain, FeatureSpec, LayoutInfo, FEATURE_COUNT, FEATURE_LAYOUT, FLAG_CHOICES};
pub use vector::FeatureVector;
pub use collector::{CollectError, FeatureCollector, FieldError, FieldInput};
