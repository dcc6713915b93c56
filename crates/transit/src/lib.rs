//! # torinogo-transit
//!
//! Stop-proximity and arrival-ordering core for the TorinoGo transit app.
//!
//! ## Features
//!
//! - **Stop catalog**: In-memory catalog of boarding locations, with the GTT
//!   fixture set for central Turin built in
//! - **Spatial queries**: Fast R-tree based radius and nearest-stop lookups
//! - **Arrival simulation**: Seedable generator standing in for a real-time
//!   arrivals feed
//! - **Arrival scheduling**: Effective-time ordering, delay classification,
//!   and relative-time display text
//!
//! ## Example
//!
//! ```
//! use torinogo_transit::prelude::*;
//! use geo::Point;
//!
//! let catalog = StaticStopCatalog::turin();
//!
//! // Piazza Castello, central Turin
//! let center = Point::new(7.6869, 45.0703);
//! let nearby = catalog.stops_near(center, 1000.0).unwrap();
//! assert!(nearby.iter().any(|stop| stop.id.as_str() == "GTT-1502"));
//! ```

pub mod arrivals;
pub mod catalog;
pub mod identifiers;
pub mod models;
pub mod spatial;

// Re-exports for convenience
pub mod prelude {
    pub use crate::arrivals::schedule::{classify_delay, format_relative, order_arrivals};
    pub use crate::arrivals::simulator::ArrivalSimulator;
    pub use crate::catalog::StaticStopCatalog;
    pub use crate::identifiers::*;
    pub use crate::models::{traits::*, types::*};
    pub use crate::spatial::queries::{distance_meters, nearby_stops};
}

pub use prelude::*;
