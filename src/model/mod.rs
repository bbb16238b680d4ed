//! Typed telemetry model.
//!
//! - [`Reading`]: one named scalar value with a fixed [`ReadingKind`]
//! - [`Snapshot`]: the ordered readings from one read of the telemetry file
//! - [`TextAccumulator`]: the running transcript behind text readings

mod accumulator;
mod reading;

pub use accumulator::TextAccumulator;
pub use reading::{Reading, ReadingKind, ReadingValue};

/// The readings produced by one successful read, in file line order.
pub type Snapshot = Vec<Reading>;
