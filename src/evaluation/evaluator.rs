//! Route and solution cost computation.

use crate::distance::DistanceMatrix;
use crate::models::{Route, Solution};

/// Computes sequential route distances and total solution cost.
///
/// Holds no state beyond a borrowed distance matrix; every method is a pure
/// function of its arguments.
///
/// # Examples
///
/// ```
/// use u_cvrp::models::{Node, Route, Solution};
/// use u_cvrp::distance::DistanceMatrix;
/// use u_cvrp::evaluation::Evaluator;
///
/// let nodes = vec![
///     Node::depot(0, 0.0, 0.0),
///     Node::new(1, 3.0, 4.0, 10),
///     Node::new(2, 6.0, 8.0, 20),
/// ];
/// let dm = DistanceMatrix::from_nodes(&nodes);
/// let evaluator = Evaluator::new(&dm);
///
/// let route = Route::new(0, vec![1, 2]);
/// assert!((evaluator.route_distance(&route) - 20.0).abs() < 1e-10);
///
/// let sol = Solution::from_routes(vec![route, Route::singleton(0, 1)]);
/// assert!((evaluator.total_distance(&sol) - 30.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'a> {
    distances: &'a DistanceMatrix,
}

impl<'a> Evaluator<'a> {
    /// Creates an evaluator over the given distance matrix.
    pub fn new(distances: &'a DistanceMatrix) -> Self {
        Self { distances }
    }

    /// Sum of distances over consecutive node pairs of the route.
    pub fn route_distance(&self, route: &Route) -> f64 {
        self.distances.path_length(route.nodes())
    }

    /// Per-route distances, in route order.
    pub fn route_distances(&self, solution: &Solution) -> Vec<f64> {
        solution
            .routes()
            .iter()
            .map(|r| self.route_distance(r))
            .collect()
    }

    /// Total distance across all routes.
    pub fn total_distance(&self, solution: &Solution) -> f64 {
        solution
            .routes()
            .iter()
            .map(|r| self.route_distance(r))
            .sum()
    }
}
