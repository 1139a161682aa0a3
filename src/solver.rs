//! End-to-end solve: savings construction, fleet reduction, annealing.
//!
//! Each phase returns a fresh [`Solution`]; the instance is only read, so
//! independent solves can run on separate threads as long as each owns its
//! random generator.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::annealing::{refine, AnnealingConfig, AnnealingStats};
use crate::constructive::clarke_wright_savings;
use crate::error::{EvaluationError, SolveError};
use crate::evaluation::{percent_deviation, Evaluator};
use crate::fleet::{reduce_fleet, FleetStatus};
use crate::models::{Instance, Solution};

/// Solver configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Annealing schedule, route selection policy, and seed.
    pub annealing: AnnealingConfig,
}

impl SolverConfig {
    /// Sets the annealing configuration.
    pub fn with_annealing(mut self, annealing: AnnealingConfig) -> Self {
        self.annealing = annealing;
        self
    }
}

/// Result of a solve.
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    /// Best solution found.
    pub solution: Solution,
    /// Total distance of `solution`.
    pub cost: f64,
    /// Whether fleet reduction met the vehicle limit.
    pub fleet: FleetStatus,
    /// Total distance right after fleet reduction, before annealing.
    pub constructed_cost: f64,
    /// Annealing counters.
    pub annealing: AnnealingStats,
    /// Wall-clock time of the solve.
    pub elapsed: Duration,
}

impl SolveOutcome {
    /// Builds the outbound report, with 1-based node ids.
    ///
    /// When `reference` is given, the report carries the signed percentage
    /// deviation from it.
    ///
    /// # Errors
    ///
    /// An [`EvaluationError`] if `reference` is zero or non-finite.
    pub fn report(
        &self,
        instance: &Instance,
        reference: Option<f64>,
    ) -> Result<SolveReport, EvaluationError> {
        let deviation_percent = reference
            .map(|r| percent_deviation(self.cost, r))
            .transpose()?;
        Ok(SolveReport {
            name: instance.name().map(str::to_string),
            routes: self.solution.to_external(),
            total_distance: self.cost,
            vehicles: self.solution.num_routes(),
            max_vehicles: instance.max_vehicles(),
            fleet_shortfall: self.fleet.is_shortfall(),
            reference_cost: reference,
            deviation_percent,
            elapsed_ms: self.elapsed.as_secs_f64() * 1000.0,
        })
    }
}

/// Serializable summary of a solve, in the 1-based numbering of CVRP files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveReport {
    /// Instance name, if known.
    pub name: Option<String>,
    /// Routes as 1-based node ids, each starting and ending at the depot.
    pub routes: Vec<Vec<usize>>,
    /// Total distance.
    pub total_distance: f64,
    /// Routes used.
    pub vehicles: usize,
    /// Vehicle limit of the instance.
    pub max_vehicles: usize,
    /// `true` if more routes than allowed remain.
    pub fleet_shortfall: bool,
    /// Reference (optimal or best-known) cost, if supplied.
    pub reference_cost: Option<f64>,
    /// `(total_distance - reference) / reference × 100`, if a reference was supplied.
    pub deviation_percent: Option<f64>,
    /// Solve time in milliseconds.
    pub elapsed_ms: f64,
}

impl SolveReport {
    /// Renders the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Propagates serialization failures from `serde_json`.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Heuristic CVRP solver.
///
/// # Examples
///
/// ```
/// use u_cvrp::models::{Instance, Node};
/// use u_cvrp::annealing::AnnealingConfig;
/// use u_cvrp::{Solver, SolverConfig};
///
/// let nodes = vec![
///     Node::depot(0, 0.0, 0.0),
///     Node::new(1, 1.0, 0.0, 1),
///     Node::new(2, 2.0, 0.0, 1),
///     Node::new(3, 3.0, 0.0, 1),
/// ];
/// let instance = Instance::new(nodes, 0, 3, 1).unwrap();
///
/// let config = SolverConfig::default()
///     .with_annealing(AnnealingConfig::default().with_iterations_per_level(10).with_seed(7));
/// let outcome = Solver::new(config).solve(&instance).unwrap();
/// assert_eq!(outcome.solution.num_routes(), 1);
/// assert!((outcome.cost - 6.0).abs() < 1e-10);
///
/// let report = outcome.report(&instance, Some(6.0)).unwrap();
/// assert_eq!(report.routes[0].first(), Some(&1));
/// assert!(report.deviation_percent.unwrap().abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Solver {
    config: SolverConfig,
    cancel: Option<Arc<AtomicBool>>,
}

impl Solver {
    /// Creates a solver with the given configuration.
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            cancel: None,
        }
    }

    /// Attaches a flag that stops annealing early once set.
    ///
    /// The best solution found so far is still returned.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Configuration in use.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solves `instance`, seeding the generator from the configuration
    /// (or from the operating system when no seed is set).
    ///
    /// # Errors
    ///
    /// [`SolveError::InfeasibleDemand`] if a customer exceeds the vehicle
    /// capacity, [`SolveError::Config`] if the annealing schedule is invalid.
    pub fn solve(&self, instance: &Instance) -> Result<SolveOutcome, SolveError> {
        let mut rng = match self.config.annealing.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        self.solve_with_rng(instance, &mut rng)
    }

    /// Solves `instance` drawing randomness from `rng`.
    ///
    /// # Errors
    ///
    /// Same as [`solve`](Self::solve).
    pub fn solve_with_rng<R: Rng + ?Sized>(
        &self,
        instance: &Instance,
        rng: &mut R,
    ) -> Result<SolveOutcome, SolveError> {
        let start = Instant::now();
        self.config.annealing.validate()?;

        let constructed = clarke_wright_savings(instance)?;
        info!(
            routes = constructed.num_routes(),
            customers = instance.num_customers(),
            "savings construction done"
        );

        let reduced = reduce_fleet(&constructed, instance);
        let constructed_cost = Evaluator::new(instance.distances()).total_distance(&reduced.solution);
        info!(
            routes = reduced.status.routes(),
            max_vehicles = instance.max_vehicles(),
            merges = reduced.merges,
            cost = constructed_cost,
            "fleet reduction done"
        );

        let refined = refine(
            &reduced.solution,
            instance.distances(),
            &self.config.annealing,
            rng,
            self.cancel.as_deref(),
        )?;

        let elapsed = start.elapsed();
        info!(
            cost = refined.best_cost,
            trials = refined.stats.trials,
            elapsed_ms = elapsed.as_millis() as u64,
            "annealing done"
        );

        Ok(SolveOutcome {
            solution: refined.best,
            cost: refined.best_cost,
            fleet: reduced.status,
            constructed_cost,
            annealing: refined.stats,
            elapsed,
        })
    }
}

/// Solves `instance` with the default configuration.
///
/// # Errors
///
/// Same as [`Solver::solve`].
pub fn solve(instance: &Instance) -> Result<SolveOutcome, SolveError> {
    Solver::default().solve(instance)
}
