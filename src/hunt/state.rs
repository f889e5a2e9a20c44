//! Hunt State Machine
//!
//! - States are explicit and enumerable
//! - Transitions consume the old state and either produce the new one or
//!   fail with `ForbiddenTransition`; nothing is inferred
//! - At most one region is in flight or active at a time
//!
//! Crash semantics:
//! - Idle: nothing to recover
//! - Activating: forgotten, the add is re-issued on the next trigger
//! - Cancelling: forgotten, the add never counted
//! - Active: forgotten, the add is re-issued on the next trigger
//! - Completed: preserved, derived from the persisted index

use super::errors::{HuntError, HuntResult};

/// Lifecycle of the single monitored region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HuntState {
    /// No region active; activation may be attempted.
    #[default]
    Idle,

    /// Remove-then-add issued for `catalog[index]`, not yet confirmed.
    Activating {
        index: usize,
        region_id: String,
        /// Distinguishes overlapping attempts for the same index
        attempt: u64,
    },

    /// Exactly one region confirmed registered.
    Active { index: usize, region_id: String },

    /// Deactivated while an add was in flight. No new activation may start
    /// until that add completes and withdraws its own registration, since
    /// removal is keyed by handle and would otherwise hit a newer region.
    Cancelling {
        index: usize,
        region_id: String,
        attempt: u64,
    },

    /// Every landmark was found.
    Completed,
}

impl HuntState {
    /// Get the state name for observability.
    pub fn state_name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Activating { .. } => "Activating",
            Self::Active { .. } => "Active",
            Self::Cancelling { .. } => "Cancelling",
            Self::Completed => "Completed",
        }
    }

    /// Region currently confirmed active.
    pub fn active_region_id(&self) -> Option<&str> {
        match self {
            Self::Active { region_id, .. } => Some(region_id),
            _ => None,
        }
    }

    /// An add has been issued and has not completed yet.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::Activating { .. } | Self::Cancelling { .. })
    }

    /// Whether this is the in-flight attempt identified by the arguments.
    pub fn is_attempt(&self, index: usize, region_id: &str, attempt: u64) -> bool {
        matches!(
            self,
            Self::Activating { index: i, region_id: r, attempt: a }
                if *i == index && r == region_id && *a == attempt
        )
    }

    /// Whether this is the superseded attempt identified by the arguments.
    pub fn is_cancelled_attempt(&self, index: usize, region_id: &str, attempt: u64) -> bool {
        matches!(
            self,
            Self::Cancelling { index: i, region_id: r, attempt: a }
                if *i == index && r == region_id && *a == attempt
        )
    }

    /// Whether `region_id` at `index` is the confirmed active region.
    pub fn is_active_region(&self, index: usize, region_id: &str) -> bool {
        matches!(self, Self::Active { index: i, region_id: r } if *i == index && r == region_id)
    }

    // =========================================================================
    // ALLOWED TRANSITIONS
    // =========================================================================

    /// Idle → Activating
    pub fn begin_activation(self, index: usize, region_id: String, attempt: u64) -> HuntResult<Self> {
        match self {
            Self::Idle => Ok(Self::Activating {
                index,
                region_id,
                attempt,
            }),
            _ => Err(HuntError::forbidden_transition(self.state_name(), "Activating")),
        }
    }

    /// Activating → Active
    pub fn confirm_activation(self) -> HuntResult<Self> {
        match self {
            Self::Activating {
                index, region_id, ..
            } => Ok(Self::Active { index, region_id }),
            _ => Err(HuntError::forbidden_transition(self.state_name(), "Active")),
        }
    }

    /// Activating | Cancelling → Idle
    ///
    /// The add failed or could not be made durable.
    pub fn abort_activation(self) -> HuntResult<Self> {
        match self {
            Self::Activating { .. } | Self::Cancelling { .. } => Ok(Self::Idle),
            _ => Err(HuntError::forbidden_transition(self.state_name(), "Idle")),
        }
    }

    /// Active → Idle
    ///
    /// The active landmark was entered; the next one is not yet registered.
    pub fn landmark_found(self) -> HuntResult<Self> {
        match self {
            Self::Active { .. } => Ok(Self::Idle),
            _ => Err(HuntError::forbidden_transition(self.state_name(), "Idle")),
        }
    }

    /// Cancelling → Idle
    ///
    /// The superseded add completed and its registration was withdrawn.
    pub fn finish_cancel(self) -> HuntResult<Self> {
        match self {
            Self::Cancelling { .. } => Ok(Self::Idle),
            _ => Err(HuntError::forbidden_transition(self.state_name(), "Idle")),
        }
    }

    /// Idle → Completed
    pub fn complete(self) -> HuntResult<Self> {
        match self {
            Self::Idle => Ok(Self::Completed),
            _ => Err(HuntError::forbidden_transition(self.state_name(), "Completed")),
        }
    }

    /// Activating → Cancelling, Cancelling and Completed unchanged, any
    /// other → Idle.
    ///
    /// An in-flight activation is superseded; its completion will find the
    /// machine no longer waiting to confirm it.
    pub fn deactivate(self) -> Self {
        match self {
            Self::Activating {
                index,
                region_id,
                attempt,
            } => Self::Cancelling {
                index,
                region_id,
                attempt,
            },
            Self::Cancelling { .. } | Self::Completed => self,
            _ => Self::Idle,
        }
    }

    // =========================================================================
    // RECOVERY
    // =========================================================================

    /// State after a restart, derived from durable progress only.
    ///
    /// Any previously active registration is forgotten; the next trigger
    /// re-issues remove-then-add.
    pub fn recover(next_index: usize, landmark_count: usize) -> Self {
        if next_index >= landmark_count {
            Self::Completed
        } else {
            Self::Idle
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activating(index: usize, id: &str) -> HuntState {
        HuntState::Activating {
            index,
            region_id: id.to_string(),
            attempt: 1,
        }
    }

    #[test]
    fn test_idle_to_activating() {
        let state = HuntState::Idle
            .begin_activation(0, "tower".to_string(), 1)
            .unwrap();
        assert_eq!(state, activating(0, "tower"));
        assert!(state.is_in_flight());
        assert!(state.active_region_id().is_none());
    }

    #[test]
    fn test_activating_to_active() {
        let state = activating(2, "notre-dame").confirm_activation().unwrap();
        assert_eq!(
            state,
            HuntState::Active {
                index: 2,
                region_id: "notre-dame".to_string()
            }
        );
        assert_eq!(state.active_region_id(), Some("notre-dame"));
        assert!(state.is_active_region(2, "notre-dame"));
        assert!(!state.is_active_region(1, "notre-dame"));
    }

    #[test]
    fn test_activating_to_idle_on_abort() {
        assert_eq!(activating(0, "a").abort_activation().unwrap(), HuntState::Idle);
    }

    #[test]
    fn test_active_to_idle_on_found() {
        let state = activating(0, "a").confirm_activation().unwrap();
        assert_eq!(state.landmark_found().unwrap(), HuntState::Idle);
    }

    #[test]
    fn test_idle_to_completed() {
        assert_eq!(HuntState::Idle.complete().unwrap(), HuntState::Completed);
    }

    #[test]
    fn test_attempt_identity() {
        let state = activating(1, "b");
        assert!(state.is_attempt(1, "b", 1));
        assert!(!state.is_attempt(1, "b", 2));
        assert!(!state.is_attempt(0, "b", 1));
    }

    // =========================================================================
    // FORBIDDEN TRANSITIONS
    // =========================================================================

    #[test]
    fn test_forbidden_second_activation_while_in_flight() {
        let err = activating(0, "a")
            .begin_activation(0, "a".to_string(), 2)
            .unwrap_err();
        assert_eq!(err, HuntError::forbidden_transition("Activating", "Activating"));
    }

    #[test]
    fn test_forbidden_activation_while_active() {
        let state = activating(0, "a").confirm_activation().unwrap();
        assert!(state.begin_activation(1, "b".to_string(), 2).is_err());
    }

    #[test]
    fn test_forbidden_confirm_from_idle() {
        assert!(HuntState::Idle.confirm_activation().is_err());
    }

    #[test]
    fn test_forbidden_found_while_activating() {
        assert!(activating(0, "a").landmark_found().is_err());
    }

    #[test]
    fn test_completed_is_terminal() {
        assert!(HuntState::Completed
            .begin_activation(0, "a".to_string(), 1)
            .is_err());
        assert!(HuntState::Completed.complete().is_err());
        assert_eq!(HuntState::Completed.deactivate(), HuntState::Completed);
    }

    #[test]
    fn test_deactivate_supersedes_in_flight() {
        let state = activating(0, "a").deactivate();
        assert_eq!(
            state,
            HuntState::Cancelling {
                index: 0,
                region_id: "a".to_string(),
                attempt: 1
            }
        );
        assert!(state.is_in_flight());
        assert!(state.is_cancelled_attempt(0, "a", 1));
        assert!(!state.is_attempt(0, "a", 1));

        // A second deactivate keeps waiting on the same add
        assert_eq!(state.clone().deactivate(), state);
    }

    #[test]
    fn test_cancelling_resolves_to_idle_only() {
        let cancelling = activating(0, "a").deactivate();
        assert!(cancelling
            .clone()
            .begin_activation(0, "a".to_string(), 2)
            .is_err());
        assert!(cancelling.clone().confirm_activation().is_err());
        assert_eq!(cancelling.clone().finish_cancel().unwrap(), HuntState::Idle);
        assert_eq!(cancelling.abort_activation().unwrap(), HuntState::Idle);
        assert!(HuntState::Idle.finish_cancel().is_err());
    }

    #[test]
    fn test_deactivate_active_is_idle() {
        let active = activating(0, "a").confirm_activation().unwrap();
        assert_eq!(active.deactivate(), HuntState::Idle);
    }

    // =========================================================================
    // RECOVERY
    // =========================================================================

    #[test]
    fn test_recover() {
        assert_eq!(HuntState::recover(0, 4), HuntState::Idle);
        assert_eq!(HuntState::recover(3, 4), HuntState::Idle);
        assert_eq!(HuntState::recover(4, 4), HuntState::Completed);
        assert_eq!(HuntState::recover(0, 0), HuntState::Completed);
    }

    #[test]
    fn test_state_names() {
        assert_eq!(HuntState::Idle.state_name(), "Idle");
        assert_eq!(activating(0, "a").state_name(), "Activating");
        assert_eq!(
            HuntState::Active {
                index: 0,
                region_id: "a".to_string()
            }
            .state_name(),
            "Active"
        );
        assert_eq!(activating(0, "a").deactivate().state_name(), "Cancelling");
        assert_eq!(HuntState::Completed.state_name(), "Completed");
    }
}
