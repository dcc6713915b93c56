//! TorinoGo integration layer.
//!
//! Everything a host UI wires against: the async data-access boundary with
//! its simulated transport, favorite-stop persistence, wire-format decoding,
//! and map-viewport requery control. The algorithmic core lives in
//! `torinogo-transit` and is re-exported here as [`transit`].

pub mod favorites;
pub mod source;
pub mod viewport;
pub mod wire;

// Re-export the algorithmic core
pub use torinogo_transit as transit;
