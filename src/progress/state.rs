//! Persisted hunt progress

use serde::{Deserialize, Serialize};

/// Hunt progress as it is persisted.
///
/// `next_index == N` (catalog length) means the hunt is complete.
/// `active_region_id`, when present, is `catalog[next_index].id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    /// Index of the next landmark to activate
    pub next_index: usize,

    /// Region currently confirmed registered with the backend
    #[serde(default)]
    pub active_region_id: Option<String>,
}

impl ProgressState {
    pub fn new(next_index: usize) -> Self {
        Self {
            next_index,
            active_region_id: None,
        }
    }

    /// Progress with `region_id` confirmed active at the current index.
    pub fn with_active(&self, region_id: impl Into<String>) -> Self {
        Self {
            next_index: self.next_index,
            active_region_id: Some(region_id.into()),
        }
    }

    /// Progress after the active landmark was found.
    pub fn advanced(&self) -> Self {
        Self {
            next_index: self.next_index + 1,
            active_region_id: None,
        }
    }

    /// Progress with no region registered.
    pub fn cleared(&self) -> Self {
        Self::new(self.next_index)
    }

    pub fn is_complete(&self, landmark_count: usize) -> bool {
        self.next_index >= landmark_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_start_of_hunt() {
        let state = ProgressState::default();
        assert_eq!(state.next_index, 0);
        assert!(state.active_region_id.is_none());
    }

    #[test]
    fn test_advanced_clears_active() {
        let state = ProgressState::new(1).with_active("louvre");
        let next = state.advanced();
        assert_eq!(next.next_index, 2);
        assert!(next.active_region_id.is_none());
    }

    #[test]
    fn test_is_complete() {
        assert!(!ProgressState::new(3).is_complete(4));
        assert!(ProgressState::new(4).is_complete(4));
        assert!(ProgressState::new(0).is_complete(0));
    }

    #[test]
    fn test_missing_active_field_deserializes() {
        let state: ProgressState = serde_json::from_str(r#"{"next_index": 2}"#).unwrap();
        assert_eq!(state, ProgressState::new(2));
    }
}
