//! Hunt Error Types
//!
//! No hunt operation panics. Every backend or persistence result is either
//! mapped to a notification and returned here, or turned into a no-op.

use thiserror::Error;

use crate::monitor::MonitorError;
use crate::progress::ProgressError;

/// Result type for hunt operations
pub type HuntResult<T> = Result<T, HuntError>;

/// Error taxonomy for the hunt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Backend add/remove failed. Non-fatal, retried on the next trigger.
    BackendUnavailable,
    /// Event could not be applied. Discarded to the log.
    MalformedEvent,
    /// Progress could not be made durable. The operation did not happen.
    PersistenceFailure,
    /// Internal state machine misuse.
    InvalidState,
}

impl ErrorClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BackendUnavailable => "BACKEND_UNAVAILABLE",
            Self::MalformedEvent => "MALFORMED_EVENT",
            Self::PersistenceFailure => "PERSISTENCE_FAILURE",
            Self::InvalidState => "INVALID_STATE",
        }
    }
}

/// Hunt errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HuntError {
    #[error("forbidden hunt transition: {from} → {to}")]
    ForbiddenTransition {
        from: &'static str,
        to: &'static str,
    },

    #[error("monitoring backend failed to {operation}: {source}")]
    Backend {
        operation: &'static str,
        source: MonitorError,
    },

    #[error("progress persistence failed: {0}")]
    Persistence(#[from] ProgressError),

    #[error("persisted progress index {next_index} exceeds catalog size {landmark_count}")]
    InvalidProgress {
        next_index: usize,
        landmark_count: usize,
    },
}

impl HuntError {
    pub fn forbidden_transition(from: &'static str, to: &'static str) -> Self {
        Self::ForbiddenTransition { from, to }
    }

    pub fn backend(operation: &'static str, source: MonitorError) -> Self {
        Self::Backend { operation, source }
    }

    /// Map to the error taxonomy.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::ForbiddenTransition { .. } => ErrorClass::InvalidState,
            Self::Backend { .. } => ErrorClass::BackendUnavailable,
            Self::Persistence(_) | Self::InvalidProgress { .. } => ErrorClass::PersistenceFailure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classes() {
        assert_eq!(
            HuntError::backend("add region", MonitorError::Unavailable("down".into())).class(),
            ErrorClass::BackendUnavailable
        );
        assert_eq!(
            HuntError::from(ProgressError::Corrupted("bad".into())).class(),
            ErrorClass::PersistenceFailure
        );
        assert_eq!(
            HuntError::InvalidProgress {
                next_index: 7,
                landmark_count: 4
            }
            .class(),
            ErrorClass::PersistenceFailure
        );
        assert_eq!(
            HuntError::forbidden_transition("Idle", "Active").class(),
            ErrorClass::InvalidState
        );
    }

    #[test]
    fn test_backend_error_message() {
        let err = HuntError::backend("remove region", MonitorError::Rejected("quota".into()));
        assert_eq!(
            err.to_string(),
            "monitoring backend failed to remove region: monitoring backend rejected the request: quota"
        );
    }
}
