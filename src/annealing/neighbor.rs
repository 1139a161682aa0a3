//! Intra-route swap neighborhood.

use rand::Rng;

use super::RouteSelection;
use crate::models::Solution;

/// Exchange of the customers at interior positions `a` and `b` of one route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SwapMove {
    pub route: usize,
    pub a: usize,
    pub b: usize,
}

/// Draws a swap move, or `None` when the trial is a no-op.
///
/// `perturbable` lists the indices of routes with at least two customers;
/// it is only consulted by [`RouteSelection::Perturbable`].
pub(crate) fn propose_swap<R: Rng + ?Sized>(
    solution: &Solution,
    selection: RouteSelection,
    perturbable: &[usize],
    rng: &mut R,
) -> Option<SwapMove> {
    let route = match selection {
        RouteSelection::Uniform => {
            if solution.num_routes() == 0 {
                return None;
            }
            rng.random_range(0..solution.num_routes())
        }
        RouteSelection::Perturbable => {
            if perturbable.is_empty() {
                return None;
            }
            perturbable[rng.random_range(0..perturbable.len())]
        }
    };

    let len = solution.routes()[route].len();
    if len < 2 {
        return None;
    }

    // Two distinct positions, uniform over ordered pairs.
    let a = rng.random_range(0..len);
    let mut b = rng.random_range(0..len - 1);
    if b >= a {
        b += 1;
    }
    Some(SwapMove { route, a, b })
}

/// Indices of routes a swap can change.
pub(crate) fn perturbable_routes(solution: &Solution) -> Vec<usize> {
    solution
        .routes()
        .iter()
        .enumerate()
        .filter(|(_, r)| r.len() >= 2)
        .map(|(i, _)| i)
        .collect()
}
