//! Immutable CVRP instance.

use super::Node;
use crate::distance::DistanceMatrix;
use crate::error::InstanceError;

/// A capacitated vehicle routing instance.
///
/// Built once from parsed input and never mutated: the solver only reads it,
/// so a single instance can be shared by concurrent solves.
///
/// Nodes must carry ids `0..N` in order. Every node except the depot is a
/// customer.
///
/// # Examples
///
/// ```
/// use u_cvrp::models::{Instance, Node};
///
/// let nodes = vec![
///     Node::depot(0, 0.0, 0.0),
///     Node::new(1, 1.0, 0.0, 1),
///     Node::new(2, 2.0, 0.0, 1),
/// ];
/// let instance = Instance::new(nodes, 0, 3, 1).unwrap();
/// assert_eq!(instance.customers(), &[1, 2]);
/// assert!((instance.distances().get(0, 2) - 2.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct Instance {
    name: Option<String>,
    nodes: Vec<Node>,
    depot: usize,
    customers: Vec<usize>,
    capacity: u32,
    max_vehicles: usize,
    distances: DistanceMatrix,
}

impl Instance {
    /// Creates an instance and precomputes its distance matrix.
    ///
    /// # Errors
    ///
    /// Returns an [`InstanceError`] if the node list is empty, ids are not
    /// `0..N`, a coordinate is non-finite, the depot id is out of range or
    /// carries a demand, or the capacity is zero.
    pub fn new(
        nodes: Vec<Node>,
        depot: usize,
        capacity: u32,
        max_vehicles: usize,
    ) -> Result<Self, InstanceError> {
        if nodes.is_empty() {
            return Err(InstanceError::NoNodes);
        }
        if depot >= nodes.len() {
            return Err(InstanceError::DepotOutOfRange {
                depot,
                nodes: nodes.len(),
            });
        }
        if capacity == 0 {
            return Err(InstanceError::ZeroCapacity);
        }
        for (position, node) in nodes.iter().enumerate() {
            if node.id() != position {
                return Err(InstanceError::NonContiguousId {
                    position,
                    found: node.id(),
                });
            }
            if !node.is_finite() {
                return Err(InstanceError::NonFiniteCoordinate { node: position });
            }
        }
        let depot_demand = nodes[depot].demand();
        if depot_demand != 0 {
            return Err(InstanceError::DepotDemand {
                demand: depot_demand,
            });
        }

        let customers = (0..nodes.len()).filter(|&id| id != depot).collect();
        let distances = DistanceMatrix::from_nodes(&nodes);

        Ok(Self {
            name: None,
            nodes,
            depot,
            customers,
            capacity,
            max_vehicles,
            distances,
        })
    }

    /// Attaches a name (e.g. `A-n32-k5`) to this instance.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Instance name, if known.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// All nodes, indexed by id.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Depot node id.
    pub fn depot(&self) -> usize {
        self.depot
    }

    /// Customer ids in ascending order (every id except the depot).
    pub fn customers(&self) -> &[usize] {
        &self.customers
    }

    /// Number of customers.
    pub fn num_customers(&self) -> usize {
        self.customers.len()
    }

    /// Vehicle capacity.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Maximum number of vehicles (routes) allowed.
    pub fn max_vehicles(&self) -> usize {
        self.max_vehicles
    }

    /// Demand of a node (0 for the depot).
    pub fn demand(&self, node: usize) -> u32 {
        self.nodes[node].demand()
    }

    /// Precomputed pairwise distances.
    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }
}
