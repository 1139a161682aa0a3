//! Clarke-Wright savings algorithm.
//!
//! # Algorithm
//!
//! The savings algorithm (Clarke & Wright, 1964) starts with each customer
//! on its own route (depot → customer → depot). It then merges routes by
//! computing the "savings" of combining the end of one route with the start
//! of another:
//!
//! ```text
//! s(i, j) = d(0, i) + d(0, j) - d(i, j)
//! ```
//!
//! Every ordered pair of distinct customers is scored. Pairs are scanned in
//! decreasing order of savings; pair (i, j) merges route_i into route_j only
//! when i is the last customer of its route, j is the first customer of a
//! different route, and the combined load fits the vehicle.
//!
//! Equal savings are ordered by descending (i, j), so a given instance always
//! yields the same routes. On a symmetric matrix s(i, j) = s(j, i) exactly,
//! which makes this order decide every mirrored pair: (j, i) with j > i is
//! tried before (i, j).
//!
//! # Complexity
//!
//! O(n² log n) where n = number of customers (dominated by sorting savings).
//! Route membership is looked up through a node → route index instead of a
//! scan over all routes.
//!
//! # Reference
//!
//! Clarke, G. & Wright, J.W. (1964). "Scheduling of Vehicles from a Central
//! Depot to a Number of Delivery Points", *Operations Research* 12(4), 568-581.

use tracing::debug;

use crate::error::SolveError;
use crate::models::{Instance, Route, Solution};

/// A savings value for serving `i` immediately before `j`.
#[derive(Debug)]
struct Saving {
    i: usize,
    j: usize,
    value: f64,
}

/// A route under construction: its customers and their total demand.
#[derive(Debug)]
struct Partial {
    customers: Vec<usize>,
    load: u64,
}

/// Constructs an initial CVRP solution using the Clarke-Wright savings algorithm.
///
/// Starts with one route per customer, then merges routes in order of
/// decreasing savings while respecting vehicle capacity. The number of routes
/// is not bounded here; see [`reduce_fleet`](crate::fleet::reduce_fleet).
///
/// # Errors
///
/// [`SolveError::InfeasibleDemand`] if a single customer's demand exceeds
/// the vehicle capacity, since no feasible route can hold it.
///
/// # Examples
///
/// ```
/// use u_cvrp::models::{Instance, Node};
/// use u_cvrp::constructive::clarke_wright_savings;
///
/// let nodes = vec![
///     Node::depot(0, 0.0, 0.0),
///     Node::new(1, 1.0, 0.0, 1),
///     Node::new(2, 2.0, 0.0, 1),
///     Node::new(3, 3.0, 0.0, 1),
/// ];
/// let instance = Instance::new(nodes, 0, 3, 1).unwrap();
///
/// let solution = clarke_wright_savings(&instance).unwrap();
/// assert_eq!(solution.num_routes(), 1);
/// assert_eq!(solution.routes()[0].nodes(), &[0, 3, 2, 1, 0]);
/// ```
pub fn clarke_wright_savings(instance: &Instance) -> Result<Solution, SolveError> {
    let depot = instance.depot();
    let customers = instance.customers();
    let capacity = instance.capacity();
    let distances = instance.distances();

    for &c in customers {
        let demand = instance.demand(c);
        if demand > capacity {
            return Err(SolveError::InfeasibleDemand {
                customer: c,
                demand,
                capacity,
            });
        }
    }

    let k = customers.len();
    let mut savings = Vec::with_capacity(k * k.saturating_sub(1));
    for &i in customers {
        for &j in customers {
            if i != j {
                let value = distances.get(depot, i) + distances.get(depot, j) - distances.get(i, j);
                savings.push(Saving { i, j, value });
            }
        }
    }

    savings.sort_by(|a, b| {
        b.value
            .total_cmp(&a.value)
            .then(b.i.cmp(&a.i))
            .then(b.j.cmp(&a.j))
    });

    // slots[r] = route r while alive; merged routes are appended at the end.
    // route_of[node] = slot currently holding that customer.
    let mut slots: Vec<Option<Partial>> = customers
        .iter()
        .map(|&c| {
            Some(Partial {
                customers: vec![c],
                load: u64::from(instance.demand(c)),
            })
        })
        .collect();
    let mut route_of = vec![usize::MAX; instance.nodes().len()];
    for (slot, &c) in customers.iter().enumerate() {
        route_of[c] = slot;
    }

    let mut merges = 0usize;
    for saving in &savings {
        let ri = route_of[saving.i];
        let rj = route_of[saving.j];
        if ri == rj {
            continue;
        }

        let (Some(route_i), Some(route_j)) = (&slots[ri], &slots[rj]) else {
            continue;
        };

        // i must sit right before the trailing depot, j right after the leading one.
        if route_i.customers.last() != Some(&saving.i)
            || route_j.customers.first() != Some(&saving.j)
        {
            continue;
        }

        let load = route_i.load + route_j.load;
        if load > u64::from(capacity) {
            continue;
        }

        let (Some(mut head), Some(tail)) = (slots[ri].take(), slots[rj].take()) else {
            continue;
        };
        head.customers.extend(tail.customers);

        let merged = slots.len();
        for &c in &head.customers {
            route_of[c] = merged;
        }
        slots.push(Some(Partial {
            customers: head.customers,
            load,
        }));
        merges += 1;
    }

    let solution = Solution::from_routes(
        slots
            .into_iter()
            .flatten()
            .map(|p| Route::new(depot, p.customers))
            .collect(),
    );

    debug!(
        pairs = savings.len(),
        merges,
        routes = solution.num_routes(),
        "savings construction finished"
    );

    Ok(solution)
}
