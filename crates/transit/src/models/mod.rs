//! Transit data models, types, and traits.

pub mod traits;
pub mod types;

// Re-exports for convenience
pub use traits::StopCatalog;
pub use types::{ArrivalEvent, DelaySeverity, Journey, JourneyLeg, Result, Stop, TransitError};
