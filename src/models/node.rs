//! Node type: a located point with a demand.

use serde::{Deserialize, Serialize};

/// A node (depot or customer) in a CVRP instance.
///
/// Ids are internal and 0-based; they index the distance matrix directly.
///
/// # Examples
///
/// ```
/// use u_cvrp::models::Node;
///
/// let depot = Node::depot(0, 35.0, 35.0);
/// assert_eq!(depot.demand(), 0);
///
/// let c = Node::new(1, 41.0, 49.0, 10);
/// assert_eq!(c.id(), 1);
/// assert_eq!(c.demand(), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    id: usize,
    x: f64,
    y: f64,
    demand: u32,
}

impl Node {
    /// Creates a new node.
    pub fn new(id: usize, x: f64, y: f64, demand: u32) -> Self {
        Self { id, x, y, demand }
    }

    /// Creates a depot node (demand 0).
    pub fn depot(id: usize, x: f64, y: f64) -> Self {
        Self::new(id, x, y, 0)
    }

    /// Node id (0-based).
    pub fn id(&self) -> usize {
        self.id
    }

    /// X-coordinate.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Y-coordinate.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Demand to deliver at this node.
    pub fn demand(&self) -> u32 {
        self.demand
    }

    /// Returns `true` if both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Euclidean distance to another node.
    pub fn distance_to(&self, other: &Node) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}
