//! Error types for instance construction, solving, evaluation, and parsing.
//!
//! Node ids carried by errors are internal (0-based). Messages also show the
//! 1-based id used by CVRP files so a failure can be traced back to its input.

use thiserror::Error;

/// An [`Instance`](crate::models::Instance) could not be built from the given data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InstanceError {
    /// No nodes were supplied.
    #[error("instance has no nodes")]
    NoNodes,
    /// The depot id does not name a node.
    #[error("depot {depot} is out of range for {nodes} nodes")]
    DepotOutOfRange {
        /// Requested depot id.
        depot: usize,
        /// Number of nodes in the instance.
        nodes: usize,
    },
    /// Node ids must be exactly `0..N` in order.
    #[error("node at position {position} has id {found}, expected {position}")]
    NonContiguousId {
        /// Position in the node list.
        position: usize,
        /// Id found at that position.
        found: usize,
    },
    /// A coordinate is NaN or infinite.
    #[error("node {node} (1-based {}) has a non-finite coordinate", .node + 1)]
    NonFiniteCoordinate {
        /// Offending node.
        node: usize,
    },
    /// The depot carries a demand.
    #[error("depot demand must be 0, found {demand}")]
    DepotDemand {
        /// Demand found on the depot.
        demand: u32,
    },
    /// Vehicle capacity is zero.
    #[error("vehicle capacity must be positive")]
    ZeroCapacity,
}

/// Invalid simulated-annealing schedule.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A temperature is zero, negative, or non-finite.
    #[error("temperatures must be positive and finite (initial {initial}, final {final_})")]
    InvalidTemperature {
        /// Initial temperature.
        initial: f64,
        /// Final temperature.
        final_: f64,
    },
    /// The final temperature is not below the initial one.
    #[error("final temperature {final_} must be below initial temperature {initial}")]
    FinalNotBelowInitial {
        /// Initial temperature.
        initial: f64,
        /// Final temperature.
        final_: f64,
    },
    /// Geometric cooling needs a factor strictly between 0 and 1.
    #[error("cooling factor {0} must lie strictly between 0 and 1")]
    CoolingFactorOutOfRange(f64),
    /// Each temperature level must run at least one trial.
    #[error("iterations per temperature level must be positive")]
    ZeroIterations,
}

/// A solve could not produce a feasible solution.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    /// A single customer does not fit in any vehicle.
    #[error(
        "customer {customer} (1-based {}) demands {demand}, exceeding vehicle capacity {capacity}",
        .customer + 1
    )]
    InfeasibleDemand {
        /// Offending customer.
        customer: usize,
        /// Its demand.
        demand: u32,
        /// Vehicle capacity.
        capacity: u32,
    },
    /// The annealing schedule is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Deviation from a reference cost could not be computed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    /// Division by a zero reference cost.
    #[error("reference cost is zero, deviation is undefined")]
    ZeroReferenceCost,
    /// The reference cost is NaN or infinite.
    #[error("reference cost {0} is not finite")]
    NonFiniteReferenceCost(f64),
}

/// A CVRP instance or reference-cost file could not be read.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Reading the file failed.
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
    /// A required section or keyword is absent.
    #[error("missing required section `{0}`")]
    MissingSection(&'static str),
    /// A line inside a section has the wrong shape.
    #[error("line {line}: malformed entry `{content}`")]
    MalformedLine {
        /// 1-based line number.
        line: usize,
        /// Line text.
        content: String,
    },
    /// A token could not be read as a number.
    #[error("line {line}: `{token}` is not a valid number")]
    InvalidNumber {
        /// 1-based line number.
        line: usize,
        /// Offending token.
        token: String,
    },
    /// A section refers to a node that has no coordinates.
    #[error("line {line}: node {node} has no entry in NODE_COORD_SECTION")]
    UnknownNode {
        /// 1-based line number.
        line: usize,
        /// 1-based node id as written in the file.
        node: usize,
    },
    /// A node has coordinates but no demand entry.
    #[error("node {node} has no entry in DEMAND_SECTION")]
    MissingDemand {
        /// 1-based node id as written in the file.
        node: usize,
    },
    /// `DIMENSION` disagrees with the number of coordinate entries.
    #[error("DIMENSION is {declared} but NODE_COORD_SECTION lists {found} nodes")]
    DimensionMismatch {
        /// Declared dimension.
        declared: usize,
        /// Coordinate entries found.
        found: usize,
    },
    /// The maximum vehicle count was neither given nor found in the name.
    #[error("fleet size not given and no `k<count>` token in instance name")]
    MissingFleetSize,
    /// No `Cost` line in a reference solution file.
    #[error("no `Cost` line in reference solution")]
    MissingCost,
    /// The parsed data does not form a consistent instance.
    #[error(transparent)]
    Instance(#[from] InstanceError),
}
