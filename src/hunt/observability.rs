//! Hunt Observability
//!
//! Observability DESCRIBES what happened; it never DECIDES what happens.
//! Every activation attempt emits a start event and exactly one of
//! confirmed, failed, or superseded.

use super::outcome::DiscardReason;

/// Hunt lifecycle events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuntEvent {
    /// hunt.activation.started
    ActivationStarted { index: usize, region_id: String },

    /// hunt.activation.confirmed
    ActivationConfirmed { index: usize, region_id: String },

    /// hunt.activation.failed
    ActivationFailed {
        index: usize,
        region_id: String,
        reason: String,
    },

    /// hunt.activation.superseded
    ActivationSuperseded { index: usize, region_id: String },

    /// hunt.event.discarded
    EventDiscarded {
        region_id: String,
        reason: DiscardReason,
    },

    /// hunt.landmark.found
    LandmarkFound { index: usize, region_id: String },

    /// hunt.completed
    Completed { landmark_count: usize },

    /// hunt.deactivated
    Deactivated { region_id: Option<String> },

    /// hunt.progress.recovered
    ProgressRecovered {
        next_index: usize,
        landmark_count: usize,
        forgotten_region_id: Option<String>,
    },
}

impl HuntEvent {
    /// Get the event name for logging.
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::ActivationStarted { .. } => "hunt.activation.started",
            Self::ActivationConfirmed { .. } => "hunt.activation.confirmed",
            Self::ActivationFailed { .. } => "hunt.activation.failed",
            Self::ActivationSuperseded { .. } => "hunt.activation.superseded",
            Self::EventDiscarded { .. } => "hunt.event.discarded",
            Self::LandmarkFound { .. } => "hunt.landmark.found",
            Self::Completed { .. } => "hunt.completed",
            Self::Deactivated { .. } => "hunt.deactivated",
            Self::ProgressRecovered { .. } => "hunt.progress.recovered",
        }
    }

    /// Write the event to the log.
    pub fn emit(&self) {
        let event = self.event_name();
        match self {
            Self::ActivationStarted { index, region_id }
            | Self::ActivationConfirmed { index, region_id }
            | Self::LandmarkFound { index, region_id } => {
                tracing::info!(event, index, region_id = %region_id);
            }
            Self::ActivationFailed {
                index,
                region_id,
                reason,
            } => {
                tracing::warn!(event, index, region_id = %region_id, reason = %reason);
            }
            Self::ActivationSuperseded { index, region_id } => {
                tracing::warn!(event, index, region_id = %region_id);
            }
            Self::EventDiscarded { region_id, reason } => {
                let reason_text = reason.description();
                match reason.class() {
                    Some(class) => tracing::warn!(
                        event,
                        region_id = %region_id,
                        class = class.as_str(),
                        reason = %reason_text
                    ),
                    None => tracing::debug!(event, region_id = %region_id, reason = %reason_text),
                }
            }
            Self::Completed { landmark_count } => {
                tracing::info!(event, landmark_count);
            }
            Self::Deactivated { region_id } => {
                tracing::info!(event, region_id = ?region_id);
            }
            Self::ProgressRecovered {
                next_index,
                landmark_count,
                forgotten_region_id,
            } => {
                tracing::info!(
                    event,
                    next_index,
                    landmark_count,
                    forgotten_region_id = ?forgotten_region_id
                );
            }
        }
    }
}
