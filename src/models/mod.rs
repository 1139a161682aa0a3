//! Domain model types for capacitated vehicle routing.
//!
//! Provides the immutable instance description (nodes, depot, capacity,
//! fleet limit, distances) and the value-semantics route and solution types
//! passed between solver phases.

mod instance;
mod node;
mod route;
mod solution;

pub use instance::Instance;
pub use node::Node;
pub use route::Route;
pub use solution::{Solution, Violation, ViolationType};
