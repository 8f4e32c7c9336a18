use crate::logic::features::layout::validate_layout;
use super::types::StatsTable;

#[derive(Debug)]
pub enum BaselineError {
    IoError(std::io::Error),
    CsvError(csv::Error),
    MissingColumns(Vec<String>),
    InvalidValue {
        column: String,
        line: u64,
        value: String,
    },
    EmptyColumn(String),
    InvalidStats {
        column: String,
        mean: f64,
        std: f64,
    },
    LayoutMismatch {
        expected_version: u8,
        expected_hash: u32,
        actual_version: u8,
        actual_hash: u32,
    },
    Other(String),
}

impl std::fmt::Display for BaselineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BaselineError::IoError(e) => write!(f, "IO Error: {}", e),
            BaselineError::CsvError(e) => write!(f, "CSV Error: {}", e),
            BaselineError::MissingColumns(cols) => {
                write!(f, "Reference dataset is missing columns: {}", cols.join(", "))
            }
            BaselineError::InvalidValue { column, line, value } => {
                write!(f, "Invalid value {:?} for {} on line {}", value, column, line)
            }
            BaselineError::EmptyColumn(column) => write!(f, "No samples for column {}", column),
            BaselineError::InvalidStats { column, mean, std } => {
                write!(f, "Invalid statistics for {}: mean={}, std={}", column, mean, std)
            }
            BaselineError::LayoutMismatch { expected_version, expected_hash, actual_version, actual_hash } => {
                write!(f, "Stats Layout Mismatch: Expected v{} ({:x}), Got v{} ({:x})",
                    expected_version, expected_hash, actual_version, actual_hash)
            },
            BaselineError::Other(msg) => write!(f, "Baseline Error: {}", msg),
        }
    }
}

impl std::error::Error for BaselineError {}

impl From<std::io::Error> for BaselineError {
    fn from(err: std::io::Error) -> Self {
        BaselineError::IoError(err)
    }
}

impl From<csv::Error> for BaselineError {
    fn from(err: csv::Error) -> Self {
        BaselineError::CsvError(err)
    }
}

/// Validate stats table compatibility with current layout
pub fn validate_stats(stats: &StatsTable) -> Result<(), BaselineError> {
    match validate_layout(stats.feature_version, stats.layout_hash) {
        Ok(_) => Ok(()),
        Err(e) => Err(BaselineError::LayoutMismatch {
            expected_version: e.expected_version,
            expected_hash: e.expected_hash,
            actual_version: e.actual_version,
            actual_hash: e.actual_hash,
        }),
    }
}
