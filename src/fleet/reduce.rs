//! Greedy fleet-size reduction.
//!
//! # Algorithm
//!
//! While the solution uses more routes than the instance allows, every
//! unordered pair of routes (A, B) with A before B is considered. A pair is a
//! candidate when the combined load fits the vehicle; merging appends B's
//! customers after A's, keeping both internal orders. The candidate with the
//! smallest distance increase
//!
//! ```text
//! Δ = length(A + B) - (length(A) + length(B))
//! ```
//!
//! is applied, the earliest pair in list order winning ties: A and B are
//! removed and the merged route is appended. When no candidate exists the
//! phase stops and reports a shortfall.
//!
//! Δ is taken from full route lengths rather than the three endpoint edges
//! that change, so near-ties resolve exactly as a from-scratch evaluation of
//! each merged route would.
//!
//! # Complexity
//!
//! O(R² · n) per merge for R routes over n customers.

use serde::Serialize;
use tracing::{debug, warn};

use crate::distance::DistanceMatrix;
use crate::models::{Instance, Route, Solution};

/// Whether the fleet limit was met.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FleetStatus {
    /// Route count is within the limit.
    Within {
        /// Routes in the solution.
        routes: usize,
        /// Maximum vehicles allowed.
        max_vehicles: usize,
    },
    /// No capacity-feasible merge remained before the limit was reached.
    Shortfall {
        /// Routes in the solution.
        routes: usize,
        /// Maximum vehicles allowed.
        max_vehicles: usize,
    },
}

impl FleetStatus {
    /// Returns `true` if the solution still exceeds the vehicle limit.
    pub fn is_shortfall(&self) -> bool {
        matches!(self, FleetStatus::Shortfall { .. })
    }

    /// Number of routes in the reduced solution.
    pub fn routes(&self) -> usize {
        match *self {
            FleetStatus::Within { routes, .. } | FleetStatus::Shortfall { routes, .. } => routes,
        }
    }
}

/// Outcome of [`reduce_fleet`].
#[derive(Debug, Clone)]
pub struct FleetReduction {
    /// The reduced (still capacity-feasible) solution.
    pub solution: Solution,
    /// Whether the vehicle limit was reached.
    pub status: FleetStatus,
    /// Number of merges applied.
    pub merges: usize,
}

/// Merges whole routes until the instance's vehicle limit is met.
///
/// Returns a new solution; the input is left untouched. Never violates
/// capacity: if the limit cannot be reached, the best-effort solution comes
/// back with [`FleetStatus::Shortfall`].
///
/// # Examples
///
/// ```
/// use u_cvrp::models::{Instance, Node, Route, Solution};
/// use u_cvrp::fleet::reduce_fleet;
///
/// let nodes = vec![
///     Node::depot(0, 0.0, 0.0),
///     Node::new(1, 1.0, 0.0, 1),
///     Node::new(2, 2.0, 0.0, 1),
/// ];
/// let instance = Instance::new(nodes, 0, 2, 1).unwrap();
/// let initial = Solution::from_routes(vec![Route::singleton(0, 1), Route::singleton(0, 2)]);
///
/// let reduced = reduce_fleet(&initial, &instance);
/// assert!(!reduced.status.is_shortfall());
/// assert_eq!(reduced.solution.routes(), &[Route::new(0, vec![1, 2])]);
/// ```
pub fn reduce_fleet(solution: &Solution, instance: &Instance) -> FleetReduction {
    let capacity = u64::from(instance.capacity());
    let max_vehicles = instance.max_vehicles();
    let distances = instance.distances();

    let mut routes: Vec<Route> = solution.routes().to_vec();
    let mut loads: Vec<u64> = routes.iter().map(|r| r.load(instance)).collect();
    let mut lengths: Vec<f64> = routes
        .iter()
        .map(|r| distances.path_length(r.nodes()))
        .collect();
    let mut merges = 0usize;

    while routes.len() > max_vehicles {
        let mut best: Option<(usize, usize, Candidate)> = None;

        for r1 in 0..routes.len() {
            for r2 in (r1 + 1)..routes.len() {
                if loads[r1] + loads[r2] > capacity {
                    continue;
                }
                let candidate = Candidate::new(
                    &routes[r1],
                    &routes[r2],
                    lengths[r1] + lengths[r2],
                    distances,
                );
                let better = match &best {
                    None => true,
                    Some((_, _, current)) => candidate.increase < current.increase,
                };
                if better {
                    best = Some((r1, r2, candidate));
                }
            }
        }

        let Some((r1, r2, merged)) = best else {
            break;
        };
        let load = loads[r1] + loads[r2];

        // r2 > r1: remove the higher index first.
        for idx in [r2, r1] {
            routes.remove(idx);
            loads.remove(idx);
            lengths.remove(idx);
        }
        debug!(
            increase = merged.increase,
            routes = routes.len() + 1,
            "merged route pair"
        );
        routes.push(merged.route);
        loads.push(load);
        lengths.push(merged.length);
        merges += 1;
    }

    let count = routes.len();
    let status = if count > max_vehicles {
        warn!(
            routes = count,
            max_vehicles, "fleet reduction stopped short of the vehicle limit"
        );
        FleetStatus::Shortfall {
            routes: count,
            max_vehicles,
        }
    } else {
        FleetStatus::Within {
            routes: count,
            max_vehicles,
        }
    };

    FleetReduction {
        solution: Solution::from_routes(routes),
        status,
        merges,
    }
}

/// Route `a` followed by route `b`, with its length and the change in
/// total distance against the two separate routes.
#[derive(Debug)]
struct Candidate {
    route: Route,
    length: f64,
    increase: f64,
}

impl Candidate {
    fn new(a: &Route, b: &Route, separate: f64, distances: &DistanceMatrix) -> Self {
        let route = a.concat(b);
        let length = distances.path_length(route.nodes());
        Self {
            route,
            length,
            increase: length - separate,
        }
    }
}
