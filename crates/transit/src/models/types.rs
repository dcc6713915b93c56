//! Core data types and enums for stop and arrival data.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use geo::Point;

use crate::identifiers::*;

// ============================================================================
// Data Structures
// ============================================================================

/// A fixed boarding location from the stop catalog.
///
/// Catalog entries are created once at startup and never mutated afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct Stop {
    pub id: StopIdentifier,
    pub name: Arc<str>,
    /// World position, x = longitude, y = latitude.
    pub location: Point,
}

impl Stop {
    pub fn new(id: impl Into<StopIdentifier>, name: impl AsRef<str>, lat: f64, lng: f64) -> Self {
        Self {
            id: id.into(),
            name: name.as_ref().into(),
            location: Point::new(lng, lat),
        }
    }
}

/// One predicted vehicle arrival at a stop.
///
/// Events are generated fresh on every fetch and discarded after display;
/// nothing holds them against the `Stop` entity.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrivalEvent {
    /// Unique within one generation batch.
    pub trip_id: TripIdentifier,
    pub route_id: RouteIdentifier,
    /// Scheduled arrival instant (UTC).
    pub scheduled: DateTime<Utc>,
    /// Positive for late, negative for early.
    pub delay_seconds: i32,
    pub headsign: Option<Arc<str>>,
}

impl ArrivalEvent {
    /// Best current estimate of the actual arrival: scheduled plus delay.
    pub fn effective_time(&self) -> DateTime<Utc> {
        self.scheduled + Duration::seconds(i64::from(self.delay_seconds))
    }

    /// Delay bucket for display styling.
    pub fn severity(&self) -> DelaySeverity {
        crate::arrivals::schedule::classify_delay(self.delay_seconds)
    }
}

/// How badly delayed an arrival is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DelaySeverity {
    /// On schedule or early.
    OnTime,
    /// Up to a minute late.
    SlightDelay,
    /// More than a minute late.
    SignificantDelay,
}

/// A door-to-door route suggestion.
///
/// The planner that would produce these is not implemented; every current
/// data source resolves route searches to an empty list.
#[derive(Clone, Debug, PartialEq)]
pub struct Journey {
    pub origin: Point,
    pub destination: Point,
    pub legs: Vec<JourneyLeg>,
}

/// One ride within a [`Journey`].
#[derive(Clone, Debug, PartialEq)]
pub struct JourneyLeg {
    pub route_id: RouteIdentifier,
    pub board: StopIdentifier,
    pub alight: StopIdentifier,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    #[error("Invalid coordinate: lat {lat}, lng {lng}")]
    InvalidCoordinate { lat: f64, lng: f64 },

    #[error("Stop not found: {0}")]
    StopNotFound(StopIdentifier),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, TransitError>;
