//! Depot-framed route.

use serde::Serialize;

use super::Instance;

/// An ordered depot-to-depot sequence of node ids.
///
/// The first and last elements are the depot; the interior holds distinct
/// customer ids in visit order.
///
/// # Examples
///
/// ```
/// use u_cvrp::models::Route;
///
/// let route = Route::new(0, vec![3, 1, 2]);
/// assert_eq!(route.nodes(), &[0, 3, 1, 2, 0]);
/// assert_eq!(route.customers(), &[3, 1, 2]);
/// assert_eq!(route.first_customer(), Some(3));
/// assert_eq!(route.last_customer(), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    nodes: Vec<usize>,
}

impl Route {
    /// Creates a route visiting `customers` in order, framed by `depot`.
    pub fn new(depot: usize, customers: Vec<usize>) -> Self {
        let mut nodes = Vec::with_capacity(customers.len() + 2);
        nodes.push(depot);
        nodes.extend(customers);
        nodes.push(depot);
        Self { nodes }
    }

    /// Creates the out-and-back route `[depot, customer, depot]`.
    pub fn singleton(depot: usize, customer: usize) -> Self {
        Self {
            nodes: vec![depot, customer, depot],
        }
    }

    /// Depot id.
    pub fn depot(&self) -> usize {
        self.nodes[0]
    }

    /// Full node sequence, including both depot visits.
    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    /// Interior customer ids in visit order.
    pub fn customers(&self) -> &[usize] {
        &self.nodes[1..self.nodes.len() - 1]
    }

    /// Number of customers on this route.
    pub fn len(&self) -> usize {
        self.nodes.len() - 2
    }

    /// Returns `true` if the route visits no customer.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Customer right after the leading depot.
    pub fn first_customer(&self) -> Option<usize> {
        self.customers().first().copied()
    }

    /// Customer right before the trailing depot.
    pub fn last_customer(&self) -> Option<usize> {
        self.customers().last().copied()
    }

    /// Total demand of the interior customers.
    pub fn load(&self, instance: &Instance) -> u64 {
        self.customers()
            .iter()
            .map(|&c| u64::from(instance.demand(c)))
            .sum()
    }

    /// Concatenates `self` (minus its trailing depot) with `other` (minus its
    /// leading depot).
    pub fn concat(&self, other: &Route) -> Route {
        let mut nodes = Vec::with_capacity(self.nodes.len() + other.nodes.len() - 2);
        nodes.extend_from_slice(&self.nodes[..self.nodes.len() - 1]);
        nodes.extend_from_slice(&other.nodes[1..]);
        Route { nodes }
    }

    /// Exchanges the customers at interior positions `a` and `b` (0-based
    /// within [`customers`](Self::customers)).
    ///
    /// # Panics
    ///
    /// Panics if either position is out of range.
    pub fn swap_customers(&mut self, a: usize, b: usize) {
        assert!(a < self.len() && b < self.len(), "interior position out of range");
        self.nodes.swap(a + 1, b + 1);
    }

    /// Node ids shifted to the 1-based numbering used by CVRP files.
    pub fn to_external(&self) -> Vec<usize> {
        self.nodes.iter().map(|&n| n + 1).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singleton() {
        let r = Route::singleton(0, 4);
        assert_eq!(r.nodes(), &[0, 4, 0]);
        assert_eq!(r.len(), 1);
        assert_eq!(r.depot(), 0);
        assert_eq!(r.first_customer(), Some(4));
        assert_eq!(r.last_customer(), Some(4));
    }

    #[test]
    fn test_empty_route() {
        let r = Route::new(2, vec![]);
        assert!(r.is_empty());
        assert_eq!(r.nodes(), &[2, 2]);
        assert_eq!(r.first_customer(), None);
    }

    #[test]
    fn test_concat_drops_inner_depots() {
        let a = Route::new(0, vec![1, 2]);
        let b = Route::new(0, vec![3]);
        assert_eq!(a.concat(&b).nodes(), &[0, 1, 2, 3, 0]);
        assert_eq!(b.concat(&a).nodes(), &[0, 3, 1, 2, 0]);
    }

    #[test]
    fn test_swap_customers() {
        let mut r = Route::new(0, vec![1, 2, 3]);
        r.swap_customers(0, 2);
        assert_eq!(r.nodes(), &[0, 3, 2, 1, 0]);
    }

    #[test]
    #[should_panic(expected = "interior position out of range")]
    fn test_swap_rejects_depot_position() {
        let mut r = Route::new(0, vec![1, 2]);
        r.swap_customers(0, 2);
    }

    #[test]
    fn test_to_external() {
        let r = Route::new(0, vec![3, 1]);
        assert_eq!(r.to_external(), vec![1, 4, 2, 1]);
    }
}
