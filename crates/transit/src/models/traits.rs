//! Core traits for transit data access.
//!
//! These traits define the public interface for stop data. Implementations
//! can be in-memory, bundle-backed, or remote.

use std::sync::Arc;

use geo::Point;

use crate::identifiers::StopIdentifier;
use crate::models::types::{Result, Stop, TransitError};

/// Catalog of all known stops with lookup and spatial query methods.
pub trait StopCatalog: Send + Sync {
    // ---- Lookups ----
    fn get_stop(&self, id: &StopIdentifier) -> Option<Arc<Stop>>;

    /// Like [`get_stop`](Self::get_stop), but an unknown id is an error.
    fn require_stop(&self, id: &StopIdentifier) -> Result<Arc<Stop>> {
        self.get_stop(id)
            .ok_or_else(|| TransitError::StopNotFound(id.clone()))
    }

    // ---- Collections ----
    fn all_stops(&self) -> Vec<Arc<Stop>>;

    // ---- Spatial queries ----

    /// Find stops within `radius_m` meters of `center`.
    ///
    /// Result order is unspecified; callers must not depend on it. Errors on
    /// an out-of-range center or a negative/non-finite radius.
    fn stops_near(&self, center: Point, radius_m: f64) -> Result<Vec<Arc<Stop>>>;

    /// Find the `n` nearest stops to a point.
    fn nearest_stops(&self, center: Point, n: usize) -> Vec<Arc<Stop>>;
}
