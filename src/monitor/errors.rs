//! Region Monitor Errors

use thiserror::Error;

/// Result type for monitoring backend calls
pub type MonitorResult<T> = Result<T, MonitorError>;

/// Failures reported by a region monitoring backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonitorError {
    /// Nothing is registered under the handle. Callers treat this as a
    /// successful remove.
    #[error("no region registered under handle '{0}'")]
    NotRegistered(String),

    #[error("monitoring backend unavailable: {0}")]
    Unavailable(String),

    #[error("monitoring backend rejected the request: {0}")]
    Rejected(String),
}
