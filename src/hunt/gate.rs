//! Location permission and settings gate
//!
//! The platform layer resolves permission prompts and settings dialogs;
//! the hunt only reads the result.

/// Read-only view of the platform's location readiness.
pub trait LocationGate: Send + Sync {
    fn location_permission_granted(&self) -> bool;
    fn location_service_enabled(&self) -> bool;
}

/// Why activation was not attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateBlock {
    PermissionDenied,
    LocationServiceDisabled,
}

impl GateBlock {
    /// First reason the gate is closed, if any.
    pub fn check(gate: &dyn LocationGate) -> Option<Self> {
        if !gate.location_permission_granted() {
            Some(Self::PermissionDenied)
        } else if !gate.location_service_enabled() {
            Some(Self::LocationServiceDisabled)
        } else {
            None
        }
    }
}

/// Gate with fixed answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticGate {
    pub permission_granted: bool,
    pub service_enabled: bool,
}

impl StaticGate {
    pub fn open() -> Self {
        Self {
            permission_granted: true,
            service_enabled: true,
        }
    }
}

impl LocationGate for StaticGate {
    fn location_permission_granted(&self) -> bool {
        self.permission_granted
    }

    fn location_service_enabled(&self) -> bool {
        self.service_enabled
    }
}
