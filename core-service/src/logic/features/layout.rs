//! Feature Layout - the 13 housing attributes
//!
//! `FEATURE_LAYOUT` order is the form order and the column order the scaler
//! and regression model were fitted on. Any edit to the list (new field,
//! removed field, reordering) bumps `FEATURE_VERSION`; the hash then changes
//! and statistics or vectors built for the old list stop validating.

use crc32fast::Hasher;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Bumped on every change to `FEATURE_LAYOUT`
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE DOMAIN
// ============================================================================

/// Value domain of a single housing attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureDomain {
    /// Non-negative float, entered with 0.1 steps
    Continuous,
    /// Non-negative whole number
    Integer,
    /// One of two discrete choices, mapped to {0, 1}
    Flag,
}

impl FeatureDomain {
    /// Input step shown by the form
    pub fn step(&self) -> f64 {
        match self {
            FeatureDomain::Continuous => 0.1,
            FeatureDomain::Integer | FeatureDomain::Flag => 1.0,
        }
    }

    /// Whether the outlier guard applies to this domain
    pub fn is_numeric(&self) -> bool {
        !matches!(self, FeatureDomain::Flag)
    }
}

/// Labels of the two flag choices, index == encoded value
pub const FLAG_CHOICES: [&str; 2] = ["No", "Yes"];

// ============================================================================
// FEATURE SPEC
// ============================================================================

/// Fixed definition of one housing attribute
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub domain: FeatureDomain,
}

impl FeatureSpec {
    const fn continuous(name: &'static str, description: &'static str) -> Self {
        Self { name, description, domain: FeatureDomain::Continuous }
    }

    const fn integer(name: &'static str, description: &'static str) -> Self {
        Self { name, description, domain: FeatureDomain::Integer }
    }

    const fn flag(name: &'static str, description: &'static str) -> Self {
        Self { name, description, domain: FeatureDomain::Flag }
    }
}

// ============================================================================
// HOUSING ATTRIBUTES
// ============================================================================

/// Attribute order of every vector, scaler and model row
pub const FEATURE_LAYOUT: &[FeatureSpec] = &[
    FeatureSpec::continuous("CRIM", "Per capita crime rate by town"),                          // 0
    FeatureSpec::continuous("ZN", "Proportion of residential land zoned for large lots"),      // 1
    FeatureSpec::continuous("INDUS", "Proportion of non-retail business acres per town"),      // 2
    FeatureSpec::flag("CHAS", "Does the Charles River bound the tract (Yes = 1, No = 0)"),     // 3
    FeatureSpec::continuous("NOX", "Nitric oxides concentration (parts per 10 million)"),      // 4
    FeatureSpec::integer("RM", "Number of rooms per dwelling"),                                 // 5
    FeatureSpec::integer("AGE", "Age of the dwelling"),                                         // 6
    FeatureSpec::continuous("DIS", "Distance to five Boston employment centres"),              // 7
    FeatureSpec::integer("RAD", "Index of accessibility to radial highways"),                  // 8
    FeatureSpec::continuous("TAX", "Full-value property tax rate"),                            // 9
    FeatureSpec::continuous("PTRATIO", "Pupil-teacher ratio by town"),                         // 10
    FeatureSpec::continuous("B", "Racial composition index"),                                  // 11
    FeatureSpec::continuous("LSTAT", "% lower status of the population"),                      // 12
];

pub const FEATURE_COUNT: usize = 13;

const _: () = assert!(FEATURE_LAYOUT.len() == FEATURE_COUNT);

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 over the version byte and the NUL-separated names
pub fn compute_layout_hash() -> u32 {
    let mut hasher = Hasher::new();

    hasher.update(&[FEATURE_VERSION]);

    for spec in FEATURE_LAYOUT {
        hasher.update(spec.name.as_bytes());
        hasher.update(&[0]);
    }

    hasher.finalize()
}

static LAYOUT_HASH: Lazy<u32> = Lazy::new(compute_layout_hash);

/// Layout hash, computed once per process
pub fn layout_hash() -> u32 {
    *LAYOUT_HASH
}

// ============================================================================
// LAYOUT SUMMARY
// ============================================================================

/// Version, hash and names, as reported by `/api/v1/model`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            feature_names: feature_names().map(str::to_string).collect(),
        }
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

// ============================================================================
// COMPATIBILITY
// ============================================================================

/// Stats or vector stamped with another layout
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutMismatchError {
    pub expected_version: u8,
    pub expected_hash: u32,
    pub actual_version: u8,
    pub actual_hash: u32,
}

impl std::fmt::Display for LayoutMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "layout mismatch: built for v{} ({:08x}), current is v{} ({:08x})",
            self.actual_version,
            self.actual_hash,
            self.expected_version,
            self.expected_hash
        )
    }
}

impl std::error::Error for LayoutMismatchError {}

/// Accept only data stamped with the current version and hash
pub fn validate_layout(incoming_version: u8, incoming_hash: u32) -> Result<(), LayoutMismatchError> {
    let current_hash = layout_hash();

    if incoming_version != FEATURE_VERSION || incoming_hash != current_hash {
        return Err(LayoutMismatchError {
            expected_version: FEATURE_VERSION,
            expected_hash: current_hash,
            actual_version: incoming_version,
            actual_hash: incoming_hash,
        });
    }

    Ok(())
}

/// Check that an artifact's column names are exactly the layout, in order
pub fn matches_layout_names<S: AsRef<str>>(names: &[S]) -> bool {
    names.len() == FEATURE_COUNT
        && names.iter().zip(FEATURE_LAYOUT).all(|(n, spec)| n.as_ref() == spec.name)
}

// ============================================================================
// LOOKUP
// ============================================================================

/// Feature names in layout order
pub fn feature_names() -> impl Iterator<Item = &'static str> {
    FEATURE_LAYOUT.iter().map(|spec| spec.name)
}

/// Position of `name` in the layout
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|spec| spec.name == name)
}

pub fn feature_spec(name: &str) -> Option<&'static FeatureSpec> {
    FEATURE_LAYOUT.iter().find(|spec| spec.name == name)
}

pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_LAYOUT.get(index).map(|spec| spec.name)
}

// ============================================================================
// TESTS
// ============================================================================
