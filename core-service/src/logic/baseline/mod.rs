//! Baseline Module - Reference Statistics & Outlier Guard
//!
//! Computes the per-field mean / standard deviation of the reference dataset
//! once at startup and flags submitted values that stray too far from them.
//!
//! # Architecture
//! - `types.rs`: `StatsTable`, `FieldStats`
//! - `dataset.rs`: CSV loading
//! - `validate.rs`: Errors and layout validation
//! - `guard.rs`: Outlier flagging and advisories

pub mod types;
pub mod validate;
pub mod dataset;
pub mod guard;

pub use types::{FieldStats, StatsTable};
pub use validate::{validate_stats, BaselineError};
pub use dataset::{load_stats, stats_from_reader};
pub use guard::{flag, inspect, Advisory, OUTLIER_STDS};
