//! Region Monitoring Port
//!
//! The boundary to whatever actually watches the device location. The
//! hunt only ever issues two commands through it (remove by handle, then
//! add) and consumes the transition stream it publishes.

mod errors;
mod event;
mod port;
mod request;
mod simulated;

pub use errors::{MonitorError, MonitorResult};
pub use event::{TransitionEvent, TransitionType};
pub use port::{RegionMonitorPort, TransitionReceiver, TransitionSender};
pub use request::{MonitoringRequest, PendingHandle};
pub use simulated::{MonitorCommand, SimulatedMonitor};
