//! Region monitoring backend interface

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::errors::MonitorResult;
use super::event::TransitionEvent;
use super::request::{MonitoringRequest, PendingHandle};

/// Receiving side of a backend's transition stream
pub type TransitionReceiver = mpsc::UnboundedReceiver<TransitionEvent>;

/// Sending side of a backend's transition stream
pub type TransitionSender = mpsc::UnboundedSender<TransitionEvent>;

/// Abstraction over an OS or cloud geofencing backend.
///
/// Both calls complete asynchronously, possibly on another executor. Each
/// resolves exactly once.
#[async_trait]
pub trait RegionMonitorPort: Send + Sync {
    /// Register a region under the request's handle.
    async fn add_region(&self, request: &MonitoringRequest) -> MonitorResult<()>;

    /// Remove whatever is registered under `handle`.
    ///
    /// Returns `MonitorError::NotRegistered` when nothing is; callers treat
    /// that as success.
    async fn remove_region(&self, handle: &PendingHandle) -> MonitorResult<()>;

    /// Stream of transition events. The backend may push at any time,
    /// including for regions that were just removed.
    fn subscribe(&self) -> TransitionReceiver;
}
