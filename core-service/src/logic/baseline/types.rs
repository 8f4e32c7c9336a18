use serde::{Deserialize, Serialize};
use crate::logic::features::layout::{FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION, layout_hash};
use super::validate::BaselineError;

// ============================================================================
// FIELD STATISTICS
// ============================================================================

/// Historical mean / sample standard deviation of one field
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldStats {
    pub mean: f64,
    pub std: f64,
    pub count: usize,
}

impl FieldStats {
    pub fn new(mean: f64, std: f64) -> Self {
        Self { mean, std, count: 0 }
    }

    /// Mean and sample std (n - 1 denominator); a single sample has std 0
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let std = if samples.len() > 1 {
            let ss: f64 = samples.iter().map(|x| (x - mean).powi(2)).sum();
            (ss / (n - 1.0)).sqrt()
        } else {
            0.0
        };

        Some(Self { mean, std, count: samples.len() })
    }

    /// Distance from the mean in standard deviations (0 when std is 0)
    pub fn z_score(&self, value: f64) -> f64 {
        if self.std > 0.0 {
            (value - self.mean) / self.std
        } else {
            0.0
        }
    }
}

// ============================================================================
// STATS TABLE
// ============================================================================

/// Per-field reference statistics, computed once at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsTable {
    pub feature_version: u8,
    pub layout_hash: u32,
    /// Rows in the reference dataset
    pub samples: usize,
    fields: [FieldStats; FEATURE_COUNT],
}

impl StatsTable {
    /// Build from precomputed statistics (layout order)
    pub fn from_stats(fields: [FieldStats; FEATURE_COUNT]) -> Result<Self, BaselineError> {
        for (spec, stats) in FEATURE_LAYOUT.iter().zip(fields.iter()) {
            if !stats.mean.is_finite() || !stats.std.is_finite() || stats.std < 0.0 {
                return Err(BaselineError::InvalidStats {
                    column: spec.name.to_string(),
                    mean: stats.mean,
                    std: stats.std,
                });
            }
        }

        Ok(Self {
            feature_version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            samples: fields.iter().map(|f| f.count).max().unwrap_or(0),
            fields,
        })
    }

    /// Build from one sample column per feature (layout order)
    pub fn from_columns(columns: &[Vec<f64>]) -> Result<Self, BaselineError> {
        if columns.len() != FEATURE_COUNT {
            return Err(BaselineError::Other(format!(
                "expected {} columns, got {}",
                FEATURE_COUNT,
                columns.len()
            )));
        }

        let mut fields = [FieldStats::default(); FEATURE_COUNT];
        for (i, (spec, column)) in FEATURE_LAYOUT.iter().zip(columns).enumerate() {
            fields[i] = FieldStats::from_samples(column)
                .ok_or_else(|| BaselineError::EmptyColumn(spec.name.to_string()))?;
        }

        Self::from_stats(fields)
    }

    /// Stats by layout index
    pub fn get(&self, index: usize) -> Option<&FieldStats> {
        self.fields.get(index)
    }

    /// Stats by feature name
    pub fn get_by_name(&self, name: &str) -> Option<&FieldStats> {
        crate::logic::features::layout::feature_index(name).and_then(|i| self.get(i))
    }

    pub fn fields(&self) -> &[FieldStats; FEATURE_COUNT] {
        &self.fields
    }

    /// Historical means in layout order
    pub fn means(&self) -> [f64; FEATURE_COUNT] {
        let mut means = [0.0; FEATURE_COUNT];
        for (m, f) in means.iter_mut().zip(self.fields.iter()) {
            *m = f.mean;
        }
        means
    }
}
