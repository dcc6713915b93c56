//! Wire-format records for the data-access boundary.
//!
//! A remote backend speaks JSON with camelCase keys and RFC 3339 timestamps.
//! Records are validated here, one by one, so downstream code only ever sees
//! well-formed model values; a malformed record is logged and dropped without
//! taking its siblings down with it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use geo::Point;
use serde::{Deserialize, Serialize};
use tracing::warn;

use torinogo_transit::identifiers::{RouteIdentifier, StopIdentifier, TripIdentifier};
use torinogo_transit::models::types::{ArrivalEvent, Result, Stop, TransitError};
use torinogo_transit::spatial::queries::validate_coordinate;

/// A stop as it appears on the wire.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopRecord {
    pub stop_id: String,
    pub stop_name: String,
    pub stop_lat: f64,
    pub stop_lon: f64,
}

impl StopRecord {
    pub fn into_stop(self) -> Result<Stop> {
        let location = Point::new(self.stop_lon, self.stop_lat);
        validate_coordinate(location)?;
        Ok(Stop {
            id: StopIdentifier::new(self.stop_id),
            name: self.stop_name.into(),
            location,
        })
    }

    pub fn from_stop(stop: &Stop) -> Self {
        Self {
            stop_id: stop.id.as_str().to_owned(),
            stop_name: stop.name.to_string(),
            stop_lat: stop.location.y(),
            stop_lon: stop.location.x(),
        }
    }
}

/// A predicted arrival as it appears on the wire.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrivalRecord {
    pub trip_id: String,
    #[serde(default)]
    pub route_id: Option<String>,
    /// RFC 3339 timestamp.
    pub arrival_time: String,
    /// Seconds; positive for late, negative for early.
    pub delay: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headsign: Option<String>,
}

impl ArrivalRecord {
    pub fn into_event(self) -> Result<ArrivalEvent> {
        let scheduled = parse_arrival_time(&self.arrival_time)?;
        Ok(ArrivalEvent {
            trip_id: TripIdentifier::new(self.trip_id),
            route_id: RouteIdentifier::new(self.route_id.as_deref().unwrap_or("unknown")),
            scheduled,
            delay_seconds: self.delay,
            headsign: self.headsign.map(Arc::from),
        })
    }

    pub fn from_event(event: &ArrivalEvent) -> Self {
        Self {
            trip_id: event.trip_id.as_str().to_owned(),
            route_id: Some(event.route_id.as_str().to_owned()),
            arrival_time: event.scheduled.to_rfc3339(),
            delay: event.delay_seconds,
            headsign: event.headsign.as_deref().map(str::to_owned),
        }
    }
}

fn parse_arrival_time(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|err| TransitError::InvalidData(format!("Unparseable arrival time {raw:?}: {err}")))
}

/// Decode a batch of arrival records, dropping the malformed ones.
///
/// The surviving events keep their wire order; ordering by effective time is
/// the scheduler's job, and by dropping invalid timestamps here it never has
/// to compare against them.
pub fn decode_arrivals(records: Vec<ArrivalRecord>) -> Vec<ArrivalEvent> {
    records
        .into_iter()
        .filter_map(|record| match record.into_event() {
            Ok(event) => Some(event),
            Err(err) => {
                warn!(%err, "dropping malformed arrival record");
                None
            }
        })
        .collect()
}

/// Decode a batch of stop records, dropping the malformed ones.
pub fn decode_stops(records: Vec<StopRecord>) -> Vec<Stop> {
    records
        .into_iter()
        .filter_map(|record| match record.into_stop() {
            Ok(stop) => Some(stop),
            Err(err) => {
                warn!(%err, "dropping malformed stop record");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(trip: &str, time: &str) -> ArrivalRecord {
        ArrivalRecord {
            trip_id: trip.to_owned(),
            route_id: Some("Line-13".to_owned()),
            arrival_time: time.to_owned(),
            delay: 0,
            headsign: Some("Piazza Gran Madre".to_owned()),
        }
    }

    #[test]
    fn test_arrival_round_trip() {
        let original = record("Trip-1502-0-0", "2024-05-20T12:05:00+00:00");
        let event = original.clone().into_event().unwrap();
        let back = ArrivalRecord::from_event(&event);

        assert_eq!(back.trip_id, original.trip_id);
        assert_eq!(back.route_id, original.route_id);
        assert_eq!(back.delay, original.delay);
        assert_eq!(back.headsign, original.headsign);
        assert_eq!(parse_arrival_time(&back.arrival_time).unwrap(), event.scheduled);
    }

    #[test]
    fn test_decode_drops_only_malformed_arrivals() {
        let records = vec![
            record("ok-1", "2024-05-20T12:05:00Z"),
            record("bad", "yesterday-ish"),
            record("ok-2", "2024-05-20T12:10:00Z"),
        ];

        let events = decode_arrivals(records);
        let trips: Vec<&str> = events.iter().map(|e| e.trip_id.as_str()).collect();
        assert_eq!(trips, vec!["ok-1", "ok-2"]);
    }

    #[test]
    fn test_missing_route_id_falls_back() {
        let mut r = record("Trip-x", "2024-05-20T12:05:00Z");
        r.route_id = None;
        let event = r.into_event().unwrap();
        assert_eq!(event.route_id.as_str(), "unknown");
    }

    #[test]
    fn test_stop_record_validation() {
        let good = StopRecord {
            stop_id: "GTT-1502".to_owned(),
            stop_name: "Vittorio Emanuele II".to_owned(),
            stop_lat: 45.0672,
            stop_lon: 7.6835,
        };
        let stop = good.into_stop().unwrap();
        assert_eq!(stop.location.y(), 45.0672);

        let bad = StopRecord {
            stop_id: "GTT-0".to_owned(),
            stop_name: "Nowhere".to_owned(),
            stop_lat: 123.0,
            stop_lon: 7.0,
        };
        assert!(matches!(
            bad.into_stop(),
            Err(TransitError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn test_wire_json_shape() {
        let json = r#"{
            "tripId": "Trip-1502-0-0-1716206400000",
            "routeId": "Line-13",
            "arrivalTime": "2024-05-20T12:05:00Z",
            "delay": 90,
            "headsign": "Piazza Gran Madre"
        }"#;

        let record: ArrivalRecord = serde_json::from_str(json).unwrap();
        let event = record.into_event().unwrap();
        assert_eq!(event.delay_seconds, 90);
        assert_eq!(event.severity(), torinogo_transit::models::types::DelaySeverity::SignificantDelay);
    }
}
