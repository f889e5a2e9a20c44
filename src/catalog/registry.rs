//! Ordered landmark catalog
//!
//! The catalog is loaded once at startup and never mutated. Order defines
//! hunt progression: `catalog[i]` is the region activated when progress
//! reaches `i`.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{CatalogError, CatalogResult};
use super::landmark::{Expiration, Landmark};

/// On-disk catalog document.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogDocument {
    landmarks: Vec<Landmark>,
}

/// Immutable ordered list of landmarks with unique ids.
#[derive(Debug, Clone, Default)]
pub struct LandmarkCatalog {
    landmarks: Vec<Landmark>,
}

impl LandmarkCatalog {
    /// Build a catalog, validating every landmark.
    ///
    /// An empty catalog is valid; a hunt over it is complete from the start.
    pub fn new(landmarks: Vec<Landmark>) -> CatalogResult<Self> {
        let mut seen: HashMap<&str, usize> = HashMap::with_capacity(landmarks.len());

        for (index, lm) in landmarks.iter().enumerate() {
            validate_landmark(index, lm)?;

            if let Some(first) = seen.insert(lm.id.as_str(), index) {
                return Err(CatalogError::DuplicateId {
                    id: lm.id.clone(),
                    first,
                    second: index,
                });
            }
        }

        Ok(Self { landmarks })
    }

    /// Load and validate a catalog from a JSON file of the form
    /// `{ "landmarks": [ ... ] }`.
    pub fn load(path: &Path) -> CatalogResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let doc: CatalogDocument =
            serde_json::from_str(&content).map_err(|e| CatalogError::Malformed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        Self::new(doc.landmarks)
    }

    /// Number of landmarks (`N`).
    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.landmarks.get(index)
    }

    /// Position of the landmark with exactly this id.
    ///
    /// Linear scan; catalogs are tens of entries. First match wins.
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.landmarks.iter().position(|lm| lm.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Landmark> {
        self.landmarks.iter()
    }
}

fn validate_landmark(index: usize, lm: &Landmark) -> CatalogResult<()> {
    if lm.id.is_empty() {
        return Err(CatalogError::EmptyId { index });
    }

    let lat_ok = lm.latitude.is_finite() && (-90.0..=90.0).contains(&lm.latitude);
    let lon_ok = lm.longitude.is_finite() && (-180.0..=180.0).contains(&lm.longitude);
    if !lat_ok || !lon_ok {
        return Err(CatalogError::InvalidCoordinates {
            id: lm.id.clone(),
            latitude: lm.latitude,
            longitude: lm.longitude,
        });
    }

    if !lm.radius_meters.is_finite() || lm.radius_meters <= 0.0 {
        return Err(CatalogError::InvalidRadius {
            id: lm.id.clone(),
            radius_meters: lm.radius_meters,
        });
    }

    if let Expiration::Millis(millis) = lm.expiration {
        if millis <= 0 {
            return Err(CatalogError::InvalidExpiration {
                id: lm.id.clone(),
                millis,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn four() -> Vec<Landmark> {
        vec![
            Landmark::new("tower", 48.8584, 2.2945, 100.0),
            Landmark::new("louvre", 48.8606, 2.3376, 120.0),
            Landmark::new("notre-dame", 48.8530, 2.3499, 80.0),
            Landmark::new("sacre-coeur", 48.8867, 2.3431, 90.0),
        ]
    }

    #[test]
    fn test_catalog_preserves_order() {
        let catalog = LandmarkCatalog::new(four()).unwrap();
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.get(0).unwrap().id, "tower");
        assert_eq!(catalog.get(3).unwrap().id, "sacre-coeur");
        assert!(catalog.get(4).is_none());
    }

    #[test]
    fn test_position_of() {
        let catalog = LandmarkCatalog::new(four()).unwrap();
        assert_eq!(catalog.position_of("notre-dame"), Some(2));
        assert_eq!(catalog.position_of("ghost-id"), None);
        // Exact match only
        assert_eq!(catalog.position_of("Tower"), None);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut lms = four();
        lms.push(Landmark::new("louvre", 0.0, 0.0, 10.0));

        let err = LandmarkCatalog::new(lms).unwrap_err();
        assert_eq!(
            err,
            CatalogError::DuplicateId {
                id: "louvre".to_string(),
                first: 1,
                second: 4,
            }
        );
    }

    #[test]
    fn test_empty_id_rejected() {
        let err = LandmarkCatalog::new(vec![Landmark::new("", 0.0, 0.0, 10.0)]).unwrap_err();
        assert_eq!(err, CatalogError::EmptyId { index: 0 });
    }

    #[test]
    fn test_invalid_geometry_rejected() {
        assert!(matches!(
            LandmarkCatalog::new(vec![Landmark::new("a", 91.0, 0.0, 10.0)]),
            Err(CatalogError::InvalidCoordinates { .. })
        ));
        assert!(matches!(
            LandmarkCatalog::new(vec![Landmark::new("a", 0.0, f64::NAN, 10.0)]),
            Err(CatalogError::InvalidCoordinates { .. })
        ));
        assert!(matches!(
            LandmarkCatalog::new(vec![Landmark::new("a", 0.0, 0.0, 0.0)]),
            Err(CatalogError::InvalidRadius { .. })
        ));
        assert!(matches!(
            LandmarkCatalog::new(vec![
                Landmark::new("a", 0.0, 0.0, 5.0).with_expiration(Expiration::Millis(0))
            ]),
            Err(CatalogError::InvalidExpiration { .. })
        ));
    }

    #[test]
    fn test_empty_catalog_is_valid() {
        let catalog = LandmarkCatalog::new(Vec::new()).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"landmarks": [
                {{"id": "a", "latitude": 1.0, "longitude": 2.0, "radius_meters": 25.0}},
                {{"id": "b", "latitude": 3.0, "longitude": 4.0, "radius_meters": 50.0,
                  "expiration": {{"millis": 86400000}}}}
            ]}}"#
        )
        .unwrap();

        let catalog = LandmarkCatalog::load(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(1).unwrap().expiration, Expiration::Millis(86_400_000));
    }

    #[test]
    fn test_load_malformed_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{\"landmarks\": 7}}").unwrap();

        assert!(matches!(
            LandmarkCatalog::load(file.path()),
            Err(CatalogError::Malformed { .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(matches!(
            LandmarkCatalog::load(&dir.path().join("absent.json")),
            Err(CatalogError::Io { .. })
        ));
    }
}
