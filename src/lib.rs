//! # u-cvrp
//!
//! Heuristic solver for the Capacitated Vehicle Routing Problem: a single
//! depot, identical vehicles of fixed capacity, and customers with integer
//! demands placed in the Euclidean plane.
//!
//! A solve runs three phases:
//!
//! 1. [`constructive::clarke_wright_savings`] builds a capacity-feasible
//!    route set by merging routes in descending order of savings.
//! 2. [`fleet::reduce_fleet`] concatenates route pairs until the vehicle
//!    limit is met, or reports a shortfall.
//! 3. [`annealing::refine`] swaps customers within routes under a geometric
//!    cooling schedule and keeps the best solution seen.
//!
//! ## Modules
//!
//! - [`models`]: nodes, instances, routes, solutions
//! - [`distance`]: Euclidean distance matrix
//! - [`evaluation`]: route cost and deviation from a reference cost
//! - [`constructive`]: Clarke-Wright savings construction
//! - [`fleet`]: vehicle-limit enforcement
//! - [`annealing`]: intra-route simulated annealing
//! - [`tsplib`]: CVRP instance and reference-solution readers
//! - [`solver`]: the end-to-end pipeline and its report
//!
//! ## Example
//!
//! ```
//! use u_cvrp::tsplib::parse_instance;
//!
//! let text = "\
//! NAME : T-n4-k1
//! CAPACITY : 3
//! NODE_COORD_SECTION
//! 1 0 0
//! 2 1 0
//! 3 2 0
//! 4 3 0
//! DEMAND_SECTION
//! 1 0
//! 2 1
//! 3 1
//! 4 1
//! DEPOT_SECTION
//! 1
//! -1
//! EOF
//! ";
//! let instance = parse_instance(text, None).unwrap();
//! let outcome = u_cvrp::solve(&instance).unwrap();
//! let report = outcome.report(&instance, None).unwrap();
//! assert_eq!(report.vehicles, 1);
//! assert!((report.total_distance - 6.0).abs() < 1e-10);
//! ```

pub mod annealing;
pub mod constructive;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod fleet;
pub mod models;
pub mod solver;
pub mod tsplib;

pub use error::{ConfigError, EvaluationError, InstanceError, ParseError, SolveError};
pub use solver::{solve, SolveOutcome, SolveReport, Solver, SolverConfig};
