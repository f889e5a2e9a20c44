//! Monitoring requests

use std::fmt;

use serde::{Deserialize, Serialize};

use super::event::TransitionType;
use crate::catalog::{haversine_meters, Expiration, Landmark};

/// Handle under which the hunt registers its region.
///
/// Removal is keyed by handle, not by region id: removing a handle drops
/// whatever is registered under it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PendingHandle(String);

impl PendingHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PendingHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A request to monitor one circular region.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitoringRequest {
    pub handle: PendingHandle,
    pub region_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_meters: f64,
    pub expiration: Expiration,
    /// Transitions that should be reported; always contains `Enter`
    pub triggers: Vec<TransitionType>,
}

impl MonitoringRequest {
    /// Build an enter-triggered request for a landmark.
    pub fn for_landmark(handle: &PendingHandle, landmark: &Landmark) -> Self {
        Self {
            handle: handle.clone(),
            region_id: landmark.id.clone(),
            latitude: landmark.latitude,
            longitude: landmark.longitude,
            radius_meters: landmark.radius_meters,
            expiration: landmark.expiration,
            triggers: vec![TransitionType::Enter],
        }
    }

    pub fn triggers_on(&self, transition: TransitionType) -> bool {
        self.triggers.contains(&transition)
    }

    /// Whether a point lies inside the requested circle.
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        haversine_meters(self.latitude, self.longitude, latitude, longitude) <= self.radius_meters
    }
}
