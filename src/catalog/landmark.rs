//! Landmark and region geometry

use serde::{Deserialize, Serialize};

/// Mean Earth radius used for great-circle distances.
const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// Great-circle distance between two points in degrees.
pub fn haversine_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

/// How long a region stays registered with the backend once added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Expiration {
    /// Region never expires on its own
    #[default]
    Never,
    /// Region expires this many milliseconds after registration
    Millis(i64),
}

impl Expiration {
    /// Milliseconds until expiry, or `None` for regions that never expire.
    pub fn as_millis(&self) -> Option<i64> {
        match self {
            Self::Never => None,
            Self::Millis(ms) => Some(*ms),
        }
    }
}

/// A hunt waypoint.
///
/// Immutable once loaded. Its position in the catalog is its position in
/// the hunt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Unique id, also used as the monitored region id
    pub id: String,

    /// Center latitude in degrees
    pub latitude: f64,

    /// Center longitude in degrees
    pub longitude: f64,

    /// Region radius in meters
    pub radius_meters: f64,

    #[serde(default)]
    pub expiration: Expiration,
}

impl Landmark {
    /// Create a landmark that never expires.
    pub fn new(id: impl Into<String>, latitude: f64, longitude: f64, radius_meters: f64) -> Self {
        Self {
            id: id.into(),
            latitude,
            longitude,
            radius_meters,
            expiration: Expiration::Never,
        }
    }

    /// Builder-style expiration override.
    pub fn with_expiration(mut self, expiration: Expiration) -> Self {
        self.expiration = expiration;
        self
    }

    /// Distance from the landmark center to a point.
    pub fn distance_meters(&self, latitude: f64, longitude: f64) -> f64 {
        haversine_meters(self.latitude, self.longitude, latitude, longitude)
    }

    /// Whether a point lies inside the landmark's region (boundary included).
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        self.distance_meters(latitude, longitude) <= self.radius_meters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_to_center_is_zero() {
        let lm = Landmark::new("a", 51.5007, -0.1246, 50.0);
        assert!(lm.distance_meters(51.5007, -0.1246) < 1e-6);
    }

    #[test]
    fn test_distance_one_degree_latitude() {
        // One degree of latitude is ~111.2 km everywhere
        let lm = Landmark::new("a", 0.0, 0.0, 10.0);
        let d = lm.distance_meters(1.0, 0.0);
        assert!((d - 111_195.0).abs() < 100.0, "got {}", d);
    }

    #[test]
    fn test_contains_inside_and_outside() {
        let lm = Landmark::new("a", 48.8584, 2.2945, 100.0);

        // ~55 m north
        assert!(lm.contains(48.8589, 2.2945));
        // ~1.1 km north
        assert!(!lm.contains(48.8684, 2.2945));
    }

    #[test]
    fn test_expiration_serde_forms() {
        let never: Expiration = serde_json::from_str("\"never\"").unwrap();
        assert_eq!(never, Expiration::Never);
        assert_eq!(never.as_millis(), None);

        let timed: Expiration = serde_json::from_str("{\"millis\": 3600000}").unwrap();
        assert_eq!(timed, Expiration::Millis(3_600_000));
        assert_eq!(timed.as_millis(), Some(3_600_000));
    }

    #[test]
    fn test_landmark_expiration_defaults_to_never() {
        let json = r#"{"id":"x","latitude":1.0,"longitude":2.0,"radius_meters":30.0}"#;
        let lm: Landmark = serde_json::from_str(json).unwrap();
        assert_eq!(lm.expiration, Expiration::Never);
    }
}
