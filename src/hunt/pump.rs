//! Transition event pump
//!
//! Feeds a backend's transition stream into the machine one event at a
//! time. Errors from individual events are logged and counted; they never
//! stop the pump.

use super::errors::HuntResult;
use super::machine::RegionStateMachine;
use super::outcome::TransitionOutcome;
use crate::monitor::{TransitionEvent, TransitionReceiver};

/// Tally of processed events.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PumpSummary {
    pub advanced: usize,
    pub discarded: usize,
    pub failed: usize,
    pub completed: bool,
}

impl PumpSummary {
    fn record(&mut self, result: &HuntResult<TransitionOutcome>) {
        match result {
            Ok(TransitionOutcome::Advanced { .. }) => self.advanced += 1,
            Ok(TransitionOutcome::Discarded(_)) => self.discarded += 1,
            Err(e) => {
                tracing::error!(error = %e, class = e.class().as_str(), "transition event failed");
                self.failed += 1;
            }
        }
    }

    /// Fold another summary into this one.
    pub fn merge(&mut self, other: PumpSummary) {
        self.advanced += other.advanced;
        self.discarded += other.discarded;
        self.failed += other.failed;
        self.completed |= other.completed;
    }
}

async fn apply(machine: &RegionStateMachine, event: TransitionEvent, summary: &mut PumpSummary) {
    let result = machine.on_transition_event(event).await;
    summary.record(&result);
    summary.completed = machine.is_complete();
}

/// Process events until the stream closes or the hunt completes.
pub async fn pump_events(machine: &RegionStateMachine, mut events: TransitionReceiver) -> PumpSummary {
    let mut summary = PumpSummary::default();

    while let Some(event) = events.recv().await {
        apply(machine, event, &mut summary).await;
        if summary.completed {
            break;
        }
    }

    summary
}

/// Process only the events already queued, without waiting for more.
pub async fn pump_pending(machine: &RegionStateMachine, events: &mut TransitionReceiver) -> PumpSummary {
    let mut summary = PumpSummary::default();

    while let Ok(event) = events.try_recv() {
        apply(machine, event, &mut summary).await;
    }

    summary
}
