//! Solution and violation types.

use serde::Serialize;

use super::{Instance, Route};

/// A type of structural or capacity violation in a solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationType {
    /// Route load exceeds vehicle capacity.
    CapacityExceeded {
        /// Route index in the solution.
        route_index: usize,
        /// Load that exceeded capacity.
        load: u64,
        /// Vehicle capacity.
        capacity: u32,
    },
    /// Route does not start and end at the depot, or visits it in between.
    MisplacedDepot {
        /// Route index in the solution.
        route_index: usize,
    },
    /// A customer is served by no route.
    MissingCustomer {
        /// Customer id.
        customer: usize,
    },
    /// A customer is served more than once.
    DuplicateCustomer {
        /// Customer id.
        customer: usize,
    },
    /// A route visits an id that is not a customer of the instance.
    UnknownNode {
        /// Route index in the solution.
        route_index: usize,
        /// Offending id.
        node: usize,
    },
}

/// A violation found in a solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// The type of violation.
    pub kind: ViolationType,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationType) -> Self {
        Self { kind }
    }
}

/// A set of routes for one instance.
///
/// Solutions are plain values: every phase returns a fresh one, so an
/// earlier solution stays intact for comparison.
///
/// # Examples
///
/// ```
/// use u_cvrp::models::{Route, Solution};
///
/// let sol = Solution::from_routes(vec![Route::new(0, vec![1, 2]), Route::singleton(0, 3)]);
/// assert_eq!(sol.num_routes(), 2);
/// assert_eq!(sol.num_served(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Solution {
    routes: Vec<Route>,
}

impl Solution {
    /// Creates an empty solution.
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Creates a solution from the given routes.
    pub fn from_routes(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// Returns the routes in this solution.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub(crate) fn routes_mut(&mut self) -> &mut [Route] {
        &mut self.routes
    }

    /// Number of routes (vehicles used).
    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    /// Total number of customer visits across all routes.
    pub fn num_served(&self) -> usize {
        self.routes.iter().map(|r| r.len()).sum()
    }

    /// Routes as 1-based node id lists, the numbering of CVRP files.
    pub fn to_external(&self) -> Vec<Vec<usize>> {
        self.routes.iter().map(|r| r.to_external()).collect()
    }

    /// Checks coverage, depot framing, and capacity against `instance`.
    ///
    /// A feasible solution yields an empty list. The fleet-size bound is not
    /// checked here: exceeding it is a reported status, not a violation.
    pub fn violations(&self, instance: &Instance) -> Vec<Violation> {
        let depot = instance.depot();
        let n = instance.nodes().len();
        let mut seen = vec![0usize; n];
        let mut violations = Vec::new();

        for (route_index, route) in self.routes.iter().enumerate() {
            let nodes = route.nodes();
            if nodes.len() < 2 || nodes[0] != depot || nodes[nodes.len() - 1] != depot {
                violations.push(Violation::new(ViolationType::MisplacedDepot {
                    route_index,
                }));
                continue;
            }

            let mut load = 0u64;
            for &node in route.customers() {
                if node == depot {
                    violations.push(Violation::new(ViolationType::MisplacedDepot {
                        route_index,
                    }));
                } else if node >= n {
                    violations.push(Violation::new(ViolationType::UnknownNode {
                        route_index,
                        node,
                    }));
                } else {
                    seen[node] += 1;
                    load += u64::from(instance.demand(node));
                }
            }

            if load > u64::from(instance.capacity()) {
                violations.push(Violation::new(ViolationType::CapacityExceeded {
                    route_index,
                    load,
                    capacity: instance.capacity(),
                }));
            }
        }

        for &customer in instance.customers() {
            match seen[customer] {
                0 => violations.push(Violation::new(ViolationType::MissingCustomer { customer })),
                1 => {}
                _ => violations.push(Violation::new(ViolationType::DuplicateCustomer { customer })),
            }
        }

        violations
    }
}
