//! Fleet-size reduction.
//!
//! - [`reduce_fleet`]: greedy whole-route merging down to the vehicle limit

mod reduce;

pub use reduce::{reduce_fleet, FleetReduction, FleetStatus};
