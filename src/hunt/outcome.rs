//! Results of hunt operations

use super::errors::ErrorClass;
use super::gate::GateBlock;
use crate::monitor::TransitionType;

/// Result of an activation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivationOutcome {
    /// `catalog[index]` is now the single registered region.
    Activated { index: usize, region_id: String },

    /// A region is already active; nothing was issued.
    AlreadyActive { index: usize, region_id: String },

    /// Another activation is in flight; nothing was issued.
    InFlight,

    /// The hunt is complete; nothing further will be activated.
    HuntFinished,

    /// The location gate is closed; nothing was issued.
    Blocked(GateBlock),

    /// The add succeeded but the hunt was deactivated meanwhile, so the
    /// registration was removed again.
    Superseded { index: usize, region_id: String },
}

impl ActivationOutcome {
    pub fn is_activated(&self) -> bool {
        matches!(self, Self::Activated { .. })
    }
}

/// Why a transition event was not applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscardReason {
    /// The backend flagged the event as failed.
    BackendReported { detail: Option<String> },

    /// Only Enter advances the hunt.
    NotEnter(TransitionType),

    /// No landmark has this id.
    UnknownRegion(String),

    /// A known landmark that is not the active region (late, duplicate,
    /// or delivered after deactivation).
    NotActiveRegion(String),
}

impl DiscardReason {
    pub fn description(&self) -> String {
        match self {
            Self::BackendReported { detail } => format!(
                "backend reported an error: {}",
                detail.as_deref().unwrap_or("no detail")
            ),
            Self::NotEnter(t) => format!("ignored {} transition", t),
            Self::UnknownRegion(id) => format!("unknown region '{}'", id),
            Self::NotActiveRegion(id) => format!("region '{}' is not the active region", id),
        }
    }

    /// Discards that indicate a malformed or stale event rather than an
    /// expected non-Enter transition.
    pub fn class(&self) -> Option<ErrorClass> {
        match self {
            Self::BackendReported { .. } | Self::UnknownRegion(_) => Some(ErrorClass::MalformedEvent),
            Self::NotEnter(_) | Self::NotActiveRegion(_) => None,
        }
    }
}

/// Result of applying one transition event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// Event dropped; no state changed.
    Discarded(DiscardReason),

    /// `catalog[found_index]` was found and progress durably advanced.
    /// `next` is the result of chaining to the following landmark.
    Advanced {
        found_index: usize,
        next: ActivationOutcome,
    },
}
