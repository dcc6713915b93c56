//! R-tree nodes for the stop spatial index.
//!
//! ## Two-Stage Filtering
//!
//! Radius queries use a two-stage filtering approach:
//! 1. **R-tree filter**: A degree-space bounding box prunes candidates fast
//! 2. **Haversine filter**: Accurate geodesic distance on the survivors
//!
//! The bounding box converts the metric radius into degrees of latitude and
//! longitude (widened by `1/cos(lat)` away from the equator), so the prefilter
//! never excludes a stop the haversine check would keep.

use std::sync::Arc;

use geo::Point;
use rstar::{PointDistance, RTreeObject, AABB};

use crate::models::types::Stop;

/// Mean Earth radius the haversine distance is computed on, in meters.
const MEAN_EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Meters per degree of latitude (and of longitude at the equator).
const METERS_PER_DEGREE: f64 = MEAN_EARTH_RADIUS_M * std::f64::consts::PI / 180.0;

/// Widening applied to the envelope. Covers float rounding and the shortfall
/// of the parallel-arc approximation for longitude spans.
const ENVELOPE_PADDING: f64 = 1.01;

#[derive(Clone)]
pub struct StopNode {
    pub stop: Arc<Stop>,
    point: [f64; 2],
}

impl StopNode {
    pub fn new(stop: Arc<Stop>) -> Self {
        let point = [stop.location.x(), stop.location.y()];
        Self { stop, point }
    }
}

impl RTreeObject for StopNode {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for StopNode {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Degree-space bounding box guaranteed to contain every point within
/// `radius_m` meters of `center`.
pub fn radius_envelope(center: Point, radius_m: f64) -> AABB<[f64; 2]> {
    let lat_delta = radius_m * ENVELOPE_PADDING / METERS_PER_DEGREE;
    let cos_lat = center.y().to_radians().cos();
    let lng_delta = if cos_lat > 1e-6 {
        (lat_delta / cos_lat).min(180.0)
    } else {
        // At the poles every longitude is within reach.
        180.0
    };

    AABB::from_corners(
        [center.x() - lng_delta, center.y() - lat_delta],
        [center.x() + lng_delta, center.y() + lat_delta],
    )
}
