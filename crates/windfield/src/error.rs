//! Error types for field loading and configuration.
//!
//! Only load-time and config failures are errors. Per-frame conditions
//! (no coverage, bad geometry, empty field) are reported as outcome values
//! so a tick never fails.

use thiserror::Error;

/// Grid axis named in validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Lat,
    Lon,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Lat => write!(f, "lats"),
            Axis::Lon => write!(f, "lons"),
        }
    }
}

/// A field payload that cannot become the active field.
///
/// Every variant except `Json` is a malformed field: the load is rejected
/// and the previously active field stays in place.
#[derive(Error, Debug)]
pub enum FieldError {
    #[error("{axis} needs at least 2 nodes, got {len}")]
    TooFewNodes { axis: Axis, len: usize },

    #[error("{component} is {rows}x{cols}, expected {lats}x{lons}")]
    DimensionMismatch {
        component: &'static str,
        rows: usize,
        cols: usize,
        lats: usize,
        lons: usize,
    },

    #[error("{axis} is not strictly monotonic at index {index}")]
    NonMonotonic { axis: Axis, index: usize },

    #[error("non-finite value in {what} at index {index}")]
    NonFinite { what: &'static str, index: usize },

    #[error("invalid field JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
