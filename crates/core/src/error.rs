//! Error types for geocluster

use thiserror::Error;

/// Main error type for geocluster operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid GeoJSON: {0}")]
    InvalidGeoJson(String),

    #[error("Wrong geometry type: expected {expected}, found {found}")]
    WrongGeometryType {
        expected: &'static str,
        found: String,
    },

    #[error("Schema mismatch: feature has {found} attributes, schema has {expected} fields")]
    SchemaMismatch { expected: usize, found: usize },

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Operation canceled")]
    Canceled,

    #[error("Algorithm error: {0}")]
    Algorithm(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for geocluster operations
pub type Result<T> = std::result::Result<T, Error>;
