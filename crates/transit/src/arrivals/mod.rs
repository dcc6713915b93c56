//! Arrival generation and presentation ordering.

pub mod schedule;
pub mod simulator;

pub use schedule::{classify_delay, format_relative, order_arrivals};
pub use simulator::ArrivalSimulator;
