//! Outlier Guard
//!
//! Compares submitted values against the reference statistics and raises
//! advisories. Advisories never block a prediction and never touch the vector.

use serde::{Deserialize, Serialize};

use crate::logic::features::layout::FEATURE_LAYOUT;
use crate::logic::features::FeatureVector;
use super::types::StatsTable;

/// Distance from the mean (in standard deviations) beyond which a value is flagged
pub const OUTLIER_STDS: f64 = 3.0;

/// True iff `std > 0` and `value` is more than `OUTLIER_STDS` deviations from `mean`
pub fn flag(value: f64, mean: f64, std: f64) -> bool {
    std > 0.0 && (value - mean).abs() > OUTLIER_STDS * std
}

/// Non-blocking notice for one unusual field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advisory {
    pub feature: String,
    pub description: String,
    pub value: f64,
    pub mean: f64,
    pub std: f64,
    pub z_score: f64,
    pub message: String,
}

impl Advisory {
    fn new(feature: &str, description: &str, value: f64, mean: f64, std: f64) -> Self {
        let message = format!(
            "Value for {} ({}) is {:.2}, far from the historical mean ({:.2}). \
             This may be an unrealistic value for a real neighborhood.",
            feature, description, value, mean
        );

        Self {
            feature: feature.to_string(),
            description: description.to_string(),
            value,
            mean,
            std,
            z_score: (value - mean) / std,
            message,
        }
    }
}

/// Check every numeric field of `vector`; flag fields are skipped
pub fn inspect(stats: &StatsTable, vector: &FeatureVector) -> Vec<Advisory> {
    let mut advisories = Vec::new();

    for (i, spec) in FEATURE_LAYOUT.iter().enumerate() {
        if !spec.domain.is_numeric() {
            continue;
        }

        let (Some(value), Some(field)) = (vector.get(i), stats.get(i)) else {
            continue;
        };

        if flag(value, field.mean, field.std) {
            let advisory = Advisory::new(spec.name, spec.description, value, field.mean, field.std);
            log::warn!(
                "Outlier: {}={} (mean {:.3}, std {:.3}, z {:.1})",
                spec.name, value, field.mean, field.std, advisory.z_score
            );
            advisories.push(advisory);
        }
    }

    advisories
}

#[cfg(test)]
mod tests {
    use super::*;

    const CASES: &[(f64, f64)] = &[(3.61, 8.6), (0.0, 1.0), (408.2, 168.5), (0.55, 0.116)];

    #[test]
    fn test_mean_is_never_flagged() {
        for &(mean, std) in CASES {
            assert!(!flag(mean, mean, std));
        }
    }

    #[test]
    fn test_boundary_at_three_std() {
        for &(mean, std) in CASES {
            assert!(flag(mean + 3.0001 * std, mean, std), "mean={} std={}", mean, std);
            assert!(flag(mean - 3.0001 * std, mean, std), "mean={} std={}", mean, std);
            assert!(!flag(mean + 2.9999 * std, mean, std), "mean={} std={}", mean, std);
            assert!(!flag(mean - 2.9999 * std, mean, std), "mean={} std={}", mean, std);
        }
    }

    #[test]
    fn test_zero_std_never_flags() {
        for value in [-1e12, -1.0, 0.0, 5.0, 1e12] {
            assert!(!flag(value, 5.0, 0.0));
        }
    }

    #[test]
    fn test_advisory_message_names_field_and_mean() {
        let advisory = Advisory::new("CRIM", "Per capita crime rate by town", 90.0, 3.61, 8.6);
        assert!(advisory.message.contains("CRIM"));
        assert!(advisory.message.contains("90.00"));
        assert!(advisory.message.contains("3.61"));
        assert!(advisory.z_score > 10.0);
    }
}
