//! Readers for the CVRP text formats (Augerat / CVRPLIB style).
//!
//! - [`parse_instance`] / [`read_instance`]: `.vrp` instance files
//! - [`parse_reference_cost`] / [`read_reference_cost`]: `.sol` reference costs
//! - [`fleet_size_from_name`]: vehicle limit from names like `A-n32-k5`

mod instance;
mod reference;

pub use instance::{fleet_size_from_name, parse_instance, read_instance};
pub use reference::{parse_reference_cost, read_reference_cost};
