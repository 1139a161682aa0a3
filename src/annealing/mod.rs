//! Simulated annealing refinement.
//!
//! - [`AnnealingConfig`]: geometric cooling schedule and route selection policy
//! - [`refine`]: Metropolis search over intra-route customer swaps

mod config;
mod neighbor;
mod runner;

pub use config::{AnnealingConfig, RouteSelection};
pub use runner::{refine, AnnealingResult, AnnealingStats};
