//! Feature Collector - form input → validated FeatureVector
//!
//! Every field is checked against its domain here. Anything that gets past
//! `collect` is safe to hand to the outlier guard and the inference adapter.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::logic::baseline::StatsTable;
use super::layout::{
    feature_index, FeatureDomain, FeatureSpec, FEATURE_COUNT, FEATURE_LAYOUT, FLAG_CHOICES,
};
use super::vector::FeatureVector;

// ============================================================================
// INPUT
// ============================================================================

/// Raw value submitted for one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldInput {
    Number(f64),
    Choice(String),
    /// Any other JSON value (bool, null, array, object); always rejected
    Other(serde_json::Value),
}

impl From<f64> for FieldInput {
    fn from(value: f64) -> Self {
        FieldInput::Number(value)
    }
}

impl From<&str> for FieldInput {
    fn from(value: &str) -> Self {
        FieldInput::Choice(value.to_string())
    }
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub feature: String,
    pub reason: String,
}

/// All rejected fields of one submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectError {
    pub errors: Vec<FieldError>,
}

impl std::fmt::Display for CollectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid input:")?;
        for e in &self.errors {
            write!(f, " {}: {};", e.feature, e.reason)?;
        }
        Ok(())
    }
}

impl std::error::Error for CollectError {}

// ============================================================================
// DOMAIN VALIDATION
// ============================================================================

/// Validate one input against its spec, returning the encoded value
pub fn validate_field(spec: &FeatureSpec, input: &FieldInput) -> Result<f64, String> {
    match (spec.domain, input) {
        (FeatureDomain::Flag, FieldInput::Choice(choice)) => FLAG_CHOICES
            .iter()
            .position(|c| c == choice)
            .map(|i| i as f64)
            .ok_or_else(|| format!("expected one of {:?}, got {:?}", FLAG_CHOICES, choice)),
        (FeatureDomain::Flag, FieldInput::Number(n)) => {
            Err(format!("expected one of {:?}, got number {}", FLAG_CHOICES, n))
        }
        (FeatureDomain::Flag, FieldInput::Other(value)) => {
            Err(format!("expected one of {:?}, got {}", FLAG_CHOICES, value))
        }
        (_, FieldInput::Choice(choice)) => Err(format!("expected a number, got {:?}", choice)),
        (_, FieldInput::Other(value)) => Err(format!("expected a number, got {}", value)),
        (domain, FieldInput::Number(n)) => {
            let n = *n;
            if !n.is_finite() {
                return Err("value must be finite".to_string());
            }
            if n < 0.0 {
                return Err(format!("value must be non-negative, got {}", n));
            }
            if domain == FeatureDomain::Integer && n.fract() != 0.0 {
                return Err(format!("value must be a whole number, got {}", n));
            }
            Ok(n)
        }
    }
}

// ============================================================================
// COLLECTOR
// ============================================================================

/// Builds validated vectors, filling gaps with historical defaults
#[derive(Debug, Clone)]
pub struct FeatureCollector {
    defaults: [f64; FEATURE_COUNT],
}

impl FeatureCollector {
    /// Bind defaults from the reference statistics
    pub fn from_stats(stats: &StatsTable) -> Self {
        let mut defaults = stats.means();
        for (value, spec) in defaults.iter_mut().zip(FEATURE_LAYOUT) {
            *value = match spec.domain {
                FeatureDomain::Continuous => value.max(0.0),
                FeatureDomain::Integer => value.round().max(0.0),
                FeatureDomain::Flag => value.round().clamp(0.0, 1.0),
            };
        }
        Self { defaults }
    }

    /// Default of one field by layout index
    pub fn default_for(&self, index: usize) -> Option<f64> {
        self.defaults.get(index).copied()
    }

    /// Vector made of defaults only
    pub fn defaults(&self) -> FeatureVector {
        FeatureVector::from_values(self.defaults)
    }

    /// Validate a submission; missing fields take their default
    pub fn collect(&self, inputs: &HashMap<String, FieldInput>) -> Result<FeatureVector, CollectError> {
        let mut errors = Vec::new();

        let mut unknown: Vec<&String> = inputs.keys().filter(|k| feature_index(k).is_none()).collect();
        unknown.sort();
        for name in unknown {
            errors.push(FieldError {
                feature: name.clone(),
                reason: "unknown feature".to_string(),
            });
        }

        let mut values = self.defaults;
        for (i, spec) in FEATURE_LAYOUT.iter().enumerate() {
            let Some(input) = inputs.get(spec.name) else {
                continue;
            };
            match validate_field(spec, input) {
                Ok(v) => values[i] = v,
                Err(reason) => errors.push(FieldError {
                    feature: spec.name.to_string(),
                    reason,
                }),
            }
        }

        if !errors.is_empty() {
            log::debug!("Rejected submission with {} invalid field(s)", errors.len());
            return Err(CollectError { errors });
        }

        Ok(FeatureVector::from_values(values))
    }
}

// ============================================================================
// TESTS
// ============================================================================
