//! Spatial indexing and query utilities.

pub mod index;
pub mod queries;

pub use queries::{distance_meters, haversine_distance, nearby_stops, validate_coordinate};
