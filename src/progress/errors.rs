//! Progress Persistence Errors
//!
//! Every variant is a persistence failure: the operation that triggered
//! the write must be treated as not having happened.

use thiserror::Error;

/// Result type for progress persistence
pub type ProgressResult<T> = Result<T, ProgressError>;

/// Progress persistence errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgressError {
    #[error("progress I/O failed during {operation}: {reason}")]
    Io {
        operation: &'static str,
        reason: String,
    },

    #[error("progress record is corrupted: {0}")]
    Corrupted(String),

    #[error("progress record has unsupported format version {0}")]
    UnsupportedVersion(u32),

    #[error("progress save rejected: {0}")]
    SaveRejected(String),
}

impl ProgressError {
    pub(crate) fn io(operation: &'static str, e: impl std::fmt::Display) -> Self {
        Self::Io {
            operation,
            reason: e.to_string(),
        }
    }
}
