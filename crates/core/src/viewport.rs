//! Map-viewport requery control.
//!
//! The host UI calls [`ViewportTracker::should_requery`] every time the map
//! camera settles and only hits the data source once the center has drifted
//! past the threshold, which bounds fetch frequency during a drag.
//! [`RequestSequence`] implements last-request-wins: responses holding a
//! stale ticket are discarded instead of overwriting fresher data.

use std::sync::atomic::{AtomicU64, Ordering};

use geo::Point;

use torinogo_transit::spatial::queries::haversine_distance;

/// How far the map center must move before stops are fetched again.
pub const DEFAULT_REQUERY_THRESHOLD_M: f64 = 200.0;

/// Tracks the last queried map center against a movement threshold.
#[derive(Clone, Debug)]
pub struct ViewportTracker {
    last_queried: Option<Point>,
    threshold_m: f64,
}

impl ViewportTracker {
    pub fn new(threshold_m: f64) -> Self {
        Self {
            last_queried: None,
            threshold_m,
        }
    }

    /// Whether a query from `new_center` is warranted.
    ///
    /// Always true before the first query; afterwards only when the center
    /// has moved strictly more than the threshold since the last one.
    pub fn should_requery(&self, new_center: Point) -> bool {
        match self.last_queried {
            None => true,
            Some(prev) => haversine_distance(prev, new_center) > self.threshold_m,
        }
    }

    /// Record that a query was issued from `center`.
    pub fn mark_queried(&mut self, center: Point) {
        self.last_queried = Some(center);
    }

    pub fn last_queried(&self) -> Option<Point> {
        self.last_queried
    }
}

impl Default for ViewportTracker {
    fn default() -> Self {
        Self::new(DEFAULT_REQUERY_THRESHOLD_M)
    }
}

/// Monotone ticket counter for in-flight queries.
///
/// Issue a ticket with [`begin`](Self::begin) when a query starts and check
/// [`is_current`](Self::is_current) when its response lands; a response whose
/// ticket has been superseded must be dropped.
#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: AtomicU64,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket
    }
}
