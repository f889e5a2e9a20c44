//! Landmark Catalog
//!
//! Static, ordered, validated list of hunt waypoints. Pure data: the
//! catalog never talks to the monitoring backend.

mod registry;
mod errors;
mod landmark;

pub use registry::LandmarkCatalog;
pub use errors::{CatalogError, CatalogResult};
pub use landmark::{haversine_meters, Expiration, Landmark};
