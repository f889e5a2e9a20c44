//! Transition events delivered by the backend

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of region transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionType {
    Enter,
    Exit,
    Dwell,
}

impl fmt::Display for TransitionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Enter => "enter",
            Self::Exit => "exit",
            Self::Dwell => "dwell",
        };
        f.write_str(name)
    }
}

/// A single transition report. Consumed once, never retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionEvent {
    pub region_id: String,
    pub transition_type: TransitionType,
    #[serde(default)]
    pub had_error: bool,
    #[serde(default)]
    pub error_detail: Option<String>,
}

impl TransitionEvent {
    pub fn new(region_id: impl Into<String>, transition_type: TransitionType) -> Self {
        Self {
            region_id: region_id.into(),
            transition_type,
            had_error: false,
            error_detail: None,
        }
    }

    pub fn enter(region_id: impl Into<String>) -> Self {
        Self::new(region_id, TransitionType::Enter)
    }

    /// An event the backend flagged as failed.
    pub fn error(region_id: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            region_id: region_id.into(),
            transition_type: TransitionType::Enter,
            had_error: true,
            error_detail: Some(detail.into()),
        }
    }
}
