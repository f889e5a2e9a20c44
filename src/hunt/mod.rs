//! Landmark Hunt
//!
//! The single-active-region state machine: at most one landmark region is
//! registered with the monitoring backend at any time, progress advances by
//! exactly one per confirmed Enter of that region, and every advance is
//! durable before it is announced.
//!
//! Retrying after a failed activation is always caller-driven. The machine
//! never retries on its own.

mod errors;
mod gate;
mod machine;
mod observability;
mod outcome;
mod pump;
mod state;

pub use errors::{ErrorClass, HuntError, HuntResult};
pub use gate::{GateBlock, LocationGate, StaticGate};
pub use machine::RegionStateMachine;
pub use observability::HuntEvent;
pub use outcome::{ActivationOutcome, DiscardReason, TransitionOutcome};
pub use pump::{pump_events, pump_pending, PumpSummary};
pub use state::HuntState;
