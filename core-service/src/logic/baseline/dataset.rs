//! Reference dataset loading (CSV)
//!
//! The header must contain every layout column; other columns (the target
//! `MEDV`, ids) are ignored.

use std::io::Read;
use std::path::Path;

use crate::logic::features::layout::{FEATURE_COUNT, FEATURE_LAYOUT};
use super::types::StatsTable;
use super::validate::BaselineError;

/// Load the reference dataset and compute the stats table
pub fn load_stats(path: &Path) -> Result<StatsTable, BaselineError> {
    log::info!("Loading reference dataset from: {}", path.display());

    if !path.exists() {
        return Err(BaselineError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Reference dataset not found: {}", path.display()),
        )));
    }

    let file = std::fs::File::open(path)?;
    let stats = stats_from_reader(file)?;

    log::info!("Reference statistics computed from {} rows", stats.samples);
    Ok(stats)
}

/// Compute the stats table from any CSV source
pub fn stats_from_reader<R: Read>(reader: R) -> Result<StatsTable, BaselineError> {
    let columns = read_columns(reader)?;
    StatsTable::from_columns(&columns)
}

/// Read the layout columns, in layout order
pub fn read_columns<R: Read>(reader: R) -> Result<Vec<Vec<f64>>, BaselineError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();

    // Layout index -> CSV column position
    let mut positions = Vec::with_capacity(FEATURE_COUNT);
    let mut missing = Vec::new();
    for spec in FEATURE_LAYOUT {
        match headers.iter().position(|h| h == spec.name) {
            Some(pos) => positions.push(pos),
            None => missing.push(spec.name.to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(BaselineError::MissingColumns(missing));
    }

    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); FEATURE_COUNT];
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        for (i, &pos) in positions.iter().enumerate() {
            let raw = record.get(pos).unwrap_or("");
            let value = raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| BaselineError::InvalidValue {
                    column: FEATURE_LAYOUT[i].name.to_string(),
                    line,
                    value: raw.to_string(),
                })?;
            columns[i].push(value);
        }
    }

    Ok(columns)
}
