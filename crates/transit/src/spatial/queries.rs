//! Coordinate validation, geodesic distance, and the linear proximity scan.
//!
//! Distances use the haversine great-circle formula on the mean Earth radius,
//! via the `geo` crate.

use std::sync::Arc;

use geo::{HaversineDistance, Point};

use crate::models::types::{Result, Stop, TransitError};

/// Check that a point is a usable WGS84 coordinate.
///
/// Latitude must lie in [-90, 90] and longitude in [-180, 180]; NaN and
/// infinities are rejected.
pub fn validate_coordinate(point: Point) -> Result<()> {
    let (lng, lat) = (point.x(), point.y());
    if !lat.is_finite() || !lng.is_finite() || lat.abs() > 90.0 || lng.abs() > 180.0 {
        return Err(TransitError::InvalidCoordinate { lat, lng });
    }
    Ok(())
}

/// Haversine distance between two validated coordinates, in meters.
///
/// Symmetric, zero for coincident points, monotonic in angular separation.
pub fn distance_meters(a: Point, b: Point) -> Result<f64> {
    validate_coordinate(a)?;
    validate_coordinate(b)?;
    Ok(haversine_distance(a, b))
}

/// Haversine distance in meters for already-trusted coordinates (catalog
/// entries, R-tree refinement).
pub fn haversine_distance(a: Point, b: Point) -> f64 {
    a.haversine_distance(&b)
}

/// Linear-scan proximity query: every stop within `radius_m` meters of
/// `center`, in unspecified order.
///
/// A radius of zero keeps only stops exactly at the center. The R-tree in
/// `StaticStopCatalog` answers the same query faster for large catalogs; the
/// two must agree set-wise.
pub fn nearby_stops(center: Point, radius_m: f64, stops: &[Arc<Stop>]) -> Result<Vec<Arc<Stop>>> {
    validate_coordinate(center)?;
    validate_radius(radius_m)?;

    Ok(stops
        .iter()
        .filter(|stop| haversine_distance(center, stop.location) <= radius_m)
        .cloned()
        .collect())
}

pub(crate) fn validate_radius(radius_m: f64) -> Result<()> {
    if !radius_m.is_finite() || radius_m < 0.0 {
        return Err(TransitError::InvalidData(format!(
            "Invalid search radius: {radius_m}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn stop(id: &str, lat: f64, lng: f64) -> Arc<Stop> {
        Arc::new(Stop::new(id, id, lat, lng))
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let p = Point::new(7.6869, 45.0703);
        assert_eq!(distance_meters(p, p).unwrap(), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = Point::new(7.6790, 45.0630); // Porta Nuova
        let b = Point::new(7.6640, 45.0715); // Porta Susa
        let ab = distance_meters(a, b).unwrap();
        let ba = distance_meters(b, a).unwrap();
        assert_relative_eq!(ab, ba);
        assert!(ab > 0.0);
    }

    #[test]
    fn test_distance_is_additive_along_meridian() {
        // Three points on the same meridian: B lies between A and C.
        let a = Point::new(7.68, 45.00);
        let b = Point::new(7.68, 45.05);
        let c = Point::new(7.68, 45.10);

        let ac = distance_meters(a, c).unwrap();
        let ab = distance_meters(a, b).unwrap();
        let bc = distance_meters(b, c).unwrap();
        assert_relative_eq!(ac, ab + bc, max_relative = 1e-9);
    }

    #[test]
    fn test_known_distance_magnitude() {
        // Porta Nuova to Porta Susa is roughly 1.5 km as the crow flies.
        let a = Point::new(7.6790, 45.0630);
        let b = Point::new(7.6640, 45.0715);
        let d = distance_meters(a, b).unwrap();
        assert!((1000.0..2500.0).contains(&d), "got {d}");
    }

    #[test]
    fn test_invalid_coordinates_rejected() {
        let good = Point::new(7.6869, 45.0703);
        assert!(matches!(
            distance_meters(Point::new(7.0, 91.0), good),
            Err(TransitError::InvalidCoordinate { .. })
        ));
        assert!(matches!(
            distance_meters(good, Point::new(181.0, 45.0)),
            Err(TransitError::InvalidCoordinate { .. })
        ));
        assert!(matches!(
            distance_meters(Point::new(f64::NAN, 45.0), good),
            Err(TransitError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn test_nearby_stops_filters_by_radius() {
        let stops = vec![
            stop("near", 45.0710, 7.6860),  // ~100 m from center
            stop("far", 45.0455, 7.6775),   // ~2.8 km from center
            stop("exact", 45.0703, 7.6869), // at center
        ];
        let center = Point::new(7.6869, 45.0703);

        let found = nearby_stops(center, 1000.0, &stops).unwrap();
        let ids: Vec<&str> = found.iter().map(|s| s.id.as_str()).collect();
        assert!(ids.contains(&"near"));
        assert!(ids.contains(&"exact"));
        assert!(!ids.contains(&"far"));
    }

    #[test]
    fn test_nearby_stops_zero_radius_keeps_exact_matches_only() {
        let stops = vec![
            stop("exact", 45.0703, 7.6869),
            stop("near", 45.0704, 7.6869),
        ];
        let center = Point::new(7.6869, 45.0703);

        let found = nearby_stops(center, 0.0, &stops).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id.as_str(), "exact");
    }

    #[test]
    fn test_nearby_stops_empty_when_out_of_range() {
        let stops = vec![stop("far", 45.0455, 7.6775)];
        let center = Point::new(7.6869, 45.0703);
        assert!(nearby_stops(center, 100.0, &stops).unwrap().is_empty());
    }

    #[test]
    fn test_nearby_stops_rejects_bad_input() {
        let stops = vec![stop("any", 45.0703, 7.6869)];
        let center = Point::new(7.6869, 45.0703);

        assert!(nearby_stops(Point::new(7.0, f64::NAN), 100.0, &stops).is_err());
        assert!(nearby_stops(center, -1.0, &stops).is_err());
        assert!(nearby_stops(center, f64::INFINITY, &stops).is_err());
    }
}
