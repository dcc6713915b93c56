//! Ordering, delay classification, and display text for arrival events.

use chrono::{DateTime, Utc};

use crate::models::types::{ArrivalEvent, DelaySeverity};

/// Sort arrivals ascending by effective time (scheduled plus delay).
///
/// The sort is stable: events with identical effective times keep their
/// original relative order.
pub fn order_arrivals(mut events: Vec<ArrivalEvent>) -> Vec<ArrivalEvent> {
    events.sort_by_key(ArrivalEvent::effective_time);
    events
}

/// Bucket a delay for display styling.
pub fn classify_delay(delay_seconds: i32) -> DelaySeverity {
    match delay_seconds {
        d if d <= 0 => DelaySeverity::OnTime,
        d if d <= 60 => DelaySeverity::SlightDelay,
        _ => DelaySeverity::SignificantDelay,
    }
}

/// Compact relative-time label for an effective arrival instant.
///
/// Within a minute in the past reads `"Arriving now"`, anything older reads
/// `"Departed"`, and future arrivals compact to `"< 1 min"` / `"{n} min"`
/// with no "in"/"about" filler.
pub fn format_relative(effective: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (effective - now).num_seconds();
    if seconds < -60 {
        return "Departed".to_string();
    }
    if seconds <= 0 {
        return "Arriving now".to_string();
    }
    if seconds < 60 {
        return "< 1 min".to_string();
    }
    format!("{} min", seconds / 60)
}
