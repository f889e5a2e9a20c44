//! Catalog Error Types
//!
//! A catalog that fails validation is never partially loaded. Startup
//! stops on the first malformed landmark.

use thiserror::Error;

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Landmark catalog errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("landmark at position {index} has an empty id")]
    EmptyId { index: usize },

    #[error("duplicate landmark id '{id}' at positions {first} and {second}")]
    DuplicateId {
        id: String,
        first: usize,
        second: usize,
    },

    #[error("landmark '{id}' has invalid coordinates ({latitude}, {longitude})")]
    InvalidCoordinates {
        id: String,
        latitude: f64,
        longitude: f64,
    },

    #[error("landmark '{id}' has invalid radius {radius_meters} m")]
    InvalidRadius { id: String, radius_meters: f64 },

    #[error("landmark '{id}' has non-positive expiration {millis} ms")]
    InvalidExpiration { id: String, millis: i64 },

    #[error("failed to read catalog {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("malformed catalog {path}: {reason}")]
    Malformed { path: String, reason: String },
}
