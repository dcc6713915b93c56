//! Asynchronous data-access boundary.
//!
//! [`TransitDataSource`] is what a backend client would expose to the app.
//! [`SimulatedDataSource`] fabricates responses locally, with artificial
//! latency and injected transport failures, so the UI can be exercised
//! without a live feed. The underlying queries stay pure; latency and
//! failure noise live only here.

use std::future::Future;
use std::ops::Range;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use geo::Point;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use torinogo_transit::arrivals::simulator::ArrivalSimulator;
use torinogo_transit::identifiers::StopIdentifier;
use torinogo_transit::models::traits::StopCatalog;
use torinogo_transit::models::types::{ArrivalEvent, Journey, Stop, TransitError};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Transient transport failure; safe to retry.
    #[error("Transport error: {0}")]
    Transport(String),

    #[error(transparent)]
    Core(#[from] TransitError),
}

impl SourceError {
    /// Whether a retry can reasonably succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

pub type Result<T> = std::result::Result<T, SourceError>;

/// Stop and arrival data access, as the host app sees it.
pub trait TransitDataSource: Send + Sync {
    /// Stops within `radius_m` meters of `center`.
    fn nearby_stops<'a>(
        &'a self,
        center: Point,
        radius_m: f64,
    ) -> BoxFuture<'a, Result<Vec<Arc<Stop>>>>;

    /// Predicted arrivals for a stop, ordered by effective time.
    fn arrivals<'a>(&'a self, stop_id: &'a StopIdentifier)
        -> BoxFuture<'a, Result<Vec<ArrivalEvent>>>;

    /// Route planning placeholder; resolves to an empty list.
    fn find_routes<'a>(
        &'a self,
        origin: Point,
        destination: Point,
    ) -> BoxFuture<'a, Result<Vec<Journey>>>;
}

/// Latency and failure knobs for the simulated transport.
#[derive(Clone, Debug)]
pub struct SimulationProfile {
    pub stop_latency_ms: Range<u64>,
    pub arrival_latency_ms: Range<u64>,
    /// Probability in [0, 1] that a stop query fails.
    pub stop_failure_rate: f64,
    /// Probability in [0, 1] that an arrival query fails.
    pub arrival_failure_rate: f64,
}

impl SimulationProfile {
    /// No latency and no injected failures. For tests.
    pub fn instant() -> Self {
        Self {
            stop_latency_ms: 0..0,
            arrival_latency_ms: 0..0,
            stop_failure_rate: 0.0,
            arrival_failure_rate: 0.0,
        }
    }
}

impl Default for SimulationProfile {
    fn default() -> Self {
        Self {
            stop_latency_ms: 300..800,
            arrival_latency_ms: 400..1000,
            stop_failure_rate: 0.05,
            arrival_failure_rate: 0.10,
        }
    }
}

/// Data source backed by a local catalog and the arrival simulator.
pub struct SimulatedDataSource<C> {
    catalog: C,
    profile: SimulationProfile,
    rng: Mutex<StdRng>,
}

impl<C: StopCatalog> SimulatedDataSource<C> {
    pub fn new(catalog: C) -> Self {
        Self::with_profile(catalog, SimulationProfile::default())
    }

    pub fn with_profile(catalog: C, profile: SimulationProfile) -> Self {
        Self::with_rng(catalog, profile, StdRng::from_os_rng())
    }

    /// Fully deterministic source for tests.
    pub fn with_rng(catalog: C, profile: SimulationProfile, rng: StdRng) -> Self {
        Self {
            catalog,
            profile,
            rng: Mutex::new(rng),
        }
    }

    async fn simulate_latency(&self, range: Range<u64>) {
        if range.is_empty() {
            return;
        }
        let ms = self.rng.lock().await.random_range(range);
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    async fn inject_failure(&self, rate: f64, what: &'static str) -> Result<()> {
        if rate > 0.0 && self.rng.lock().await.random_bool(rate) {
            warn!(what, "injected transport failure");
            return Err(SourceError::Transport(format!(
                "Simulated network error fetching {what}"
            )));
        }
        Ok(())
    }
}

impl<C: StopCatalog> TransitDataSource for SimulatedDataSource<C> {
    fn nearby_stops<'a>(
        &'a self,
        center: Point,
        radius_m: f64,
    ) -> BoxFuture<'a, Result<Vec<Arc<Stop>>>> {
        Box::pin(async move {
            debug!(lat = center.y(), lng = center.x(), radius_m, "fetching nearby stops");
            self.simulate_latency(self.profile.stop_latency_ms.clone()).await;
            self.inject_failure(self.profile.stop_failure_rate, "stops").await?;

            let stops = self.catalog.stops_near(center, radius_m)?;
            debug!(count = stops.len(), "nearby stops resolved");
            Ok(stops)
        })
    }

    fn arrivals<'a>(
        &'a self,
        stop_id: &'a StopIdentifier,
    ) -> BoxFuture<'a, Result<Vec<ArrivalEvent>>> {
        Box::pin(async move {
            debug!(stop = %stop_id, "fetching arrivals");
            self.simulate_latency(self.profile.arrival_latency_ms.clone()).await;
            self.inject_failure(self.profile.arrival_failure_rate, "arrivals").await?;

            // Only stops the catalog knows about have arrivals.
            self.catalog.require_stop(stop_id)?;

            let now = Utc::now();
            let mut rng = self.rng.lock().await;
            let events = ArrivalSimulator::new(&mut *rng).generate(stop_id, now);
            debug!(stop = %stop_id, count = events.len(), "arrivals resolved");
            Ok(events)
        })
    }

    fn find_routes<'a>(
        &'a self,
        origin: Point,
        destination: Point,
    ) -> BoxFuture<'a, Result<Vec<Journey>>> {
        Box::pin(async move {
            warn!(
                origin = ?(origin.y(), origin.x()),
                destination = ?(destination.y(), destination.x()),
                "route planning is not implemented"
            );
            self.simulate_latency(self.profile.stop_latency_ms.clone()).await;
            Ok(Vec::new())
        })
    }
}
