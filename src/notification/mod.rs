//! Notification Port
//!
//! User-visible feedback (toast, snackbar, system notification) reduced to
//! a single fire-and-forget call. Rendering is the platform's business.

use std::fmt;
use std::sync::Mutex;

/// What the user is told.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// The current target region is now monitored
    RegionAdded,
    /// Registering the target region failed
    RegionAddFailed,
    /// Monitoring was torn down
    RegionsRemoved,
    /// Tearing down monitoring failed
    RegionsRemoveFailed,
    /// The landmark at this catalog index was reached
    LandmarkFound(usize),
    /// The last landmark was reached
    HuntCompleted,
}

impl NotificationKind {
    /// User-facing message.
    pub fn message(&self) -> String {
        match self {
            Self::RegionAdded => "Next landmark is being watched".to_string(),
            Self::RegionAddFailed => "Could not start watching the next landmark".to_string(),
            Self::RegionsRemoved => "Stopped watching landmarks".to_string(),
            Self::RegionsRemoveFailed => "Could not stop watching landmarks".to_string(),
            Self::LandmarkFound(index) => format!("Landmark #{} found!", index + 1),
            Self::HuntCompleted => "All landmarks found. Hunt complete!".to_string(),
        }
    }

    /// Whether this notification reports a failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::RegionAddFailed | Self::RegionsRemoveFailed)
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Sink for user-visible feedback.
pub trait NotificationPort: Send + Sync {
    fn notify(&self, kind: NotificationKind);
}

/// Surfaces notifications through the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl NotificationPort for LogNotifier {
    fn notify(&self, kind: NotificationKind) {
        if kind.is_failure() {
            tracing::warn!(notification = ?kind, "{}", kind.message());
        } else {
            tracing::info!(notification = ?kind, "{}", kind.message());
        }
    }
}

/// Records notifications in order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    received: Mutex<Vec<NotificationKind>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn received(&self) -> Vec<NotificationKind> {
        self.received.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl NotificationPort for RecordingNotifier {
    fn notify(&self, kind: NotificationKind) {
        if let Ok(mut received) = self.received.lock() {
            received.push(kind);
        }
    }
}
