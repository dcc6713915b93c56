//! In-memory stop catalog with spatial indexing.
//!
//! This is the core implementation that keeps all stops in memory with an
//! R-tree for fast radius and nearest-neighbor queries.

use std::collections::HashMap;
use std::sync::Arc;

use geo::Point;
use rstar::RTree;

use crate::identifiers::StopIdentifier;
use crate::models::traits::StopCatalog;
use crate::models::types::{Result, Stop};
use crate::spatial::index::{radius_envelope, StopNode};
use crate::spatial::queries::{haversine_distance, validate_coordinate, validate_radius};

/// The GTT stops around central Turin the app ships with.
///
/// Tuples are (id, name, lat, lng), mirrored from the production fixture.
const TURIN_STOPS: &[(&str, &str, f64, f64)] = &[
    ("GTT-1501", "Porta Nuova Station", 45.0630, 7.6790),
    ("GTT-1502", "Vittorio Emanuele II", 45.0672, 7.6835),
    ("GTT-244", "Massimo D'Azeglio", 45.0560, 7.6870),
    ("GTT-591", "Porta Susa Station", 45.0715, 7.6640),
    ("GTT-472", "Bertola", 45.0720, 7.6830),
    ("GTT-342", "Solferino", 45.0680, 7.6750),
    ("GTT-765", "Statuto Nord", 45.0790, 7.6710),
    ("GTT-205", "Castello", 45.0710, 7.6860),
    ("GTT-2780", "Carducci Molinette", 45.0455, 7.6775),
    ("GTT-123", "Politecnico", 45.0628, 7.6612),
    ("GTT-456", "Vinzaaglio", 45.0695, 7.6688),
    ("GTT-789", "Re Umberto", 45.0655, 7.6760),
    ("GTT-1011", "San Carlo", 45.0690, 7.6845),
    ("GTT-1213", "Gran Madre", 45.0635, 7.6950),
];

/// In-memory stop catalog with spatial indexing
///
/// This type is cheap to clone since all stops are stored in `Arc`s.
#[derive(Clone)]
pub struct StaticStopCatalog {
    stops: Vec<Arc<Stop>>,
    stop_map: HashMap<StopIdentifier, Arc<Stop>>,
    stop_tree: RTree<StopNode>,
}

impl StaticStopCatalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self {
            stops: Vec::new(),
            stop_map: HashMap::new(),
            stop_tree: RTree::new(),
        }
    }

    /// Build a catalog from a stop list
    pub fn from_stops(stops: Vec<Stop>) -> Self {
        let stops: Vec<Arc<Stop>> = stops.into_iter().map(Arc::new).collect();

        let stop_map: HashMap<_, _> = stops
            .iter()
            .map(|s| (s.id.clone(), s.clone()))
            .collect();

        let stop_tree = RTree::bulk_load(stops.iter().map(|s| StopNode::new(s.clone())).collect());

        Self {
            stops,
            stop_map,
            stop_tree,
        }
    }

    /// The built-in central-Turin fixture catalog.
    pub fn turin() -> Self {
        Self::from_stops(
            TURIN_STOPS
                .iter()
                .map(|&(id, name, lat, lng)| Stop::new(id, name, lat, lng))
                .collect(),
        )
    }
}

impl Default for StaticStopCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl StopCatalog for StaticStopCatalog {
    fn get_stop(&self, id: &StopIdentifier) -> Option<Arc<Stop>> {
        self.stop_map.get(id).cloned()
    }

    fn all_stops(&self) -> Vec<Arc<Stop>> {
        self.stops.clone()
    }

    fn stops_near(&self, center: Point, radius_m: f64) -> Result<Vec<Arc<Stop>>> {
        validate_coordinate(center)?;
        validate_radius(radius_m)?;

        Ok(self
            .stop_tree
            .locate_in_envelope_intersecting(&radius_envelope(center, radius_m))
            .filter(|node| haversine_distance(center, node.stop.location) <= radius_m)
            .map(|node| node.stop.clone())
            .collect())
    }

    fn nearest_stops(&self, center: Point, n: usize) -> Vec<Arc<Stop>> {
        self.stop_tree
            .nearest_neighbor_iter(&[center.x(), center.y()])
            .take(n)
            .map(|node| node.stop.clone())
            .collect()
    }
}
