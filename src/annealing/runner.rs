//! Simulated annealing over intra-route swaps.
//!
//! # Algorithm
//!
//! Each trial picks a route, exchanges two of its customers, and scores the
//! neighbor by total solution distance. The Metropolis criterion accepts any
//! improvement and a worsening of Δ with probability `exp(-Δ / T)`. After
//! `iterations_per_level` trials the temperature is multiplied by the cooling
//! factor; the run ends once it is no longer above the final temperature.
//!
//! The best solution is kept apart from the current one, so uphill moves
//! never overwrite it.
//!
//! # Reference
//!
//! Kirkpatrick, S., Gelatt, C.D. & Vecchi, M.P. (1983). "Optimization by
//! Simulated Annealing", *Science* 220(4598), 671-680.

use std::sync::atomic::{AtomicBool, Ordering};

use rand::Rng;
use serde::Serialize;
use tracing::{debug, warn};

use super::neighbor::{perturbable_routes, propose_swap};
use super::AnnealingConfig;
use crate::distance::DistanceMatrix;
use crate::error::ConfigError;
use crate::evaluation::Evaluator;
use crate::models::Solution;

/// Counters collected during one annealing run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnnealingStats {
    /// Trials performed.
    pub trials: u64,
    /// Trials that selected a route too short to swap.
    pub idle_trials: u64,
    /// Neighbors accepted as the new current solution.
    pub accepted: u64,
    /// Times the best solution improved.
    pub improvements: u64,
    /// Temperature levels completed.
    pub levels: usize,
    /// Whether the run stopped on the cancellation flag.
    pub cancelled: bool,
    /// Best cost at the end of each completed level.
    pub best_cost_per_level: Vec<f64>,
}

/// Outcome of [`refine`].
#[derive(Debug, Clone)]
pub struct AnnealingResult {
    /// Lowest-cost solution observed.
    pub best: Solution,
    /// Total distance of `best`.
    pub best_cost: f64,
    /// Run counters.
    pub stats: AnnealingStats,
}

/// Improves route ordering by simulated annealing.
///
/// Only the order inside each route changes; route membership, and with it
/// coverage and capacity feasibility, is preserved. When no route has two or
/// more customers, the input comes back unchanged without running trials.
///
/// `cancel` is polled before every trial; once it reads `true` the best
/// solution so far is returned.
///
/// # Errors
///
/// Fails only when `config` does not describe a valid schedule.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use u_cvrp::models::{Node, Route, Solution};
/// use u_cvrp::distance::DistanceMatrix;
/// use u_cvrp::annealing::{refine, AnnealingConfig};
///
/// let nodes = vec![
///     Node::depot(0, 0.0, 0.0),
///     Node::new(1, 1.0, 0.0, 1),
///     Node::new(2, 2.0, 0.0, 1),
///     Node::new(3, 3.0, 0.0, 1),
/// ];
/// let dm = DistanceMatrix::from_nodes(&nodes);
/// let initial = Solution::from_routes(vec![Route::new(0, vec![3, 1, 2])]);
/// let config = AnnealingConfig::default()
///     .with_initial_temperature(10.0)
///     .with_cooling_factor(0.9)
///     .with_iterations_per_level(50);
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(42);
/// let result = refine(&initial, &dm, &config, &mut rng, None).unwrap();
/// assert!((result.best_cost - 6.0).abs() < 1e-10);
/// ```
pub fn refine<R: Rng + ?Sized>(
    initial: &Solution,
    distances: &DistanceMatrix,
    config: &AnnealingConfig,
    rng: &mut R,
    cancel: Option<&AtomicBool>,
) -> Result<AnnealingResult, ConfigError> {
    config.validate()?;

    let evaluator = Evaluator::new(distances);
    let mut route_costs = evaluator.route_distances(initial);
    let mut current_cost: f64 = route_costs.iter().sum();
    let mut stats = AnnealingStats::default();

    let perturbable = perturbable_routes(initial);
    if perturbable.is_empty() {
        debug!(cost = current_cost, "no route can be perturbed, skipping annealing");
        return Ok(AnnealingResult {
            best: initial.clone(),
            best_cost: current_cost,
            stats,
        });
    }

    let mut current = initial.clone();
    let mut best = initial.clone();
    let mut best_cost = current_cost;
    let mut temp = config.initial_temperature;

    'schedule: while temp > config.final_temperature {
        for _ in 0..config.iterations_per_level {
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                stats.cancelled = true;
                break 'schedule;
            }
            stats.trials += 1;

            let Some(mv) = propose_swap(&current, config.route_selection, &perturbable, rng)
            else {
                stats.idle_trials += 1;
                continue;
            };

            let route = &mut current.routes_mut()[mv.route];
            route.swap_customers(mv.a, mv.b);
            let route_cost = evaluator.route_distance(route);
            let neighbor_cost: f64 = route_costs
                .iter()
                .enumerate()
                .map(|(k, &c)| if k == mv.route { route_cost } else { c })
                .sum();

            let accept = neighbor_cost < current_cost
                || ((current_cost - neighbor_cost) / temp).exp() > rng.random::<f64>();

            if accept {
                route_costs[mv.route] = route_cost;
                current_cost = neighbor_cost;
                stats.accepted += 1;
                if current_cost < best_cost {
                    best = current.clone();
                    best_cost = current_cost;
                    stats.improvements += 1;
                }
            } else {
                current.routes_mut()[mv.route].swap_customers(mv.a, mv.b);
            }
        }

        stats.levels += 1;
        stats.best_cost_per_level.push(best_cost);
        debug!(temp, current_cost, best_cost, "temperature level done");
        temp *= config.cooling_factor;
    }

    if stats.cancelled {
        warn!(trials = stats.trials, best_cost, "annealing cancelled");
    }
    debug!(
        trials = stats.trials,
        accepted = stats.accepted,
        improvements = stats.improvements,
        levels = stats.levels,
        best_cost,
        "annealing finished"
    );

    Ok(AnnealingResult {
        best_cost: evaluator.total_distance(&best),
        best,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annealing::RouteSelection;
    use crate::models::{Instance, Node, Route};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::{Arc, Mutex};

    fn quick() -> AnnealingConfig {
        AnnealingConfig::default()
            .with_initial_temperature(10.0)
            .with_final_temperature(0.1)
            .with_cooling_factor(0.9)
            .with_iterations_per_level(100)
    }

    fn line_matrix() -> DistanceMatrix {
        DistanceMatrix::from_nodes(&[
            Node::depot(0, 0.0, 0.0),
            Node::new(1, 1.0, 0.0, 1),
            Node::new(2, 2.0, 0.0, 1),
            Node::new(3, 3.0, 0.0, 1),
            Node::new(4, -1.0, 0.0, 1),
            Node::new(5, -2.0, 0.0, 1),
        ])
    }

    #[test]
    fn test_finds_straight_line_order() {
        let dm = line_matrix();
        let initial = Solution::from_routes(vec![Route::new(0, vec![3, 1, 2])]);
        let mut rng = StdRng::seed_from_u64(1);
        let result = refine(&initial, &dm, &quick(), &mut rng, None).expect("valid config");
        assert!((result.best_cost - 6.0).abs() < 1e-10);
        let mut customers = result.best.routes()[0].customers().to_vec();
        customers.sort();
        assert_eq!(customers, vec![1, 2, 3]);
    }

    #[test]
    fn test_never_worse_than_initial() {
        let dm = line_matrix();
        let initial = Solution::from_routes(vec![
            Route::new(0, vec![2, 1, 3]),
            Route::new(0, vec![5, 4]),
        ]);
        let initial_cost = Evaluator::new(&dm).total_distance(&initial);
        let mut rng = StdRng::seed_from_u64(5);
        let result = refine(&initial, &dm, &quick(), &mut rng, None).expect("valid config");
        assert!(result.best_cost <= initial_cost);
        assert_eq!(result.best.num_routes(), 2);
    }

    #[test]
    fn test_cost_matches_evaluator() {
        let dm = line_matrix();
        let initial = Solution::from_routes(vec![Route::new(0, vec![3, 5, 1, 4, 2])]);
        let mut rng = StdRng::seed_from_u64(8);
        let result = refine(&initial, &dm, &quick(), &mut rng, None).expect("valid config");
        assert_eq!(result.best_cost, Evaluator::new(&dm).total_distance(&result.best));
    }

    #[test]
    fn test_best_cost_is_monotonic() {
        let dm = line_matrix();
        let initial = Solution::from_routes(vec![Route::new(0, vec![3, 5, 1, 4, 2])]);
        let mut rng = StdRng::seed_from_u64(13);
        let config = quick();
        let result = refine(&initial, &dm, &config, &mut rng, None).expect("valid config");
        let history = &result.stats.best_cost_per_level;
        assert_eq!(history.len(), config.levels().expect("valid"));
        assert_eq!(result.stats.levels, history.len());
        assert!(history.windows(2).all(|w| w[1] <= w[0]));
        assert_eq!(history.last().copied(), Some(result.best_cost));
    }

    #[test]
    fn test_preserves_route_membership() {
        let nodes = vec![
            Node::depot(0, 0.0, 0.0),
            Node::new(1, 1.0, 0.0, 1),
            Node::new(2, 2.0, 0.0, 1),
            Node::new(3, 3.0, 0.0, 1),
            Node::new(4, -1.0, 0.0, 1),
            Node::new(5, -2.0, 0.0, 1),
        ];
        let inst = Instance::new(nodes, 0, 3, 2).expect("valid");
        let initial = Solution::from_routes(vec![
            Route::new(0, vec![2, 3, 1]),
            Route::new(0, vec![5, 4]),
        ]);
        let mut rng = StdRng::seed_from_u64(21);
        let result = refine(&initial, inst.distances(), &quick(), &mut rng, None)
            .expect("valid config");
        assert!(result.best.violations(&inst).is_empty());
        for (before, after) in initial.routes().iter().zip(result.best.routes()) {
            let mut a = before.customers().to_vec();
            let mut b = after.customers().to_vec();
            a.sort();
            b.sort();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_singletons_returned_unchanged() {
        let dm = line_matrix();
        let initial = Solution::from_routes(vec![Route::singleton(0, 1), Route::singleton(0, 4)]);
        let mut rng = StdRng::seed_from_u64(0);
        let result = refine(&initial, &dm, &quick(), &mut rng, None).expect("valid config");
        assert_eq!(result.best, initial);
        assert!((result.best_cost - 4.0).abs() < 1e-10);
        assert_eq!(result.stats.trials, 0);
    }

    #[test]
    fn test_empty_solution() {
        let dm = line_matrix();
        let mut rng = StdRng::seed_from_u64(0);
        let result = refine(&Solution::new(), &dm, &quick(), &mut rng, None).expect("valid config");
        assert_eq!(result.best_cost, 0.0);
        assert_eq!(result.best.num_routes(), 0);
    }

    #[test]
    fn test_cancelled_before_first_trial() {
        let dm = line_matrix();
        let initial = Solution::from_routes(vec![Route::new(0, vec![3, 1, 2])]);
        let flag = AtomicBool::new(true);
        let mut rng = StdRng::seed_from_u64(0);
        let result = refine(&initial, &dm, &quick(), &mut rng, Some(&flag)).expect("valid config");
        assert!(result.stats.cancelled);
        assert_eq!(result.stats.trials, 0);
        assert_eq!(result.best, initial);
        assert!((result.best_cost - 8.0).abs() < 1e-10);
    }

    #[test]
    fn test_same_seed_same_result() {
        let dm = line_matrix();
        let initial = Solution::from_routes(vec![Route::new(0, vec![3, 5, 1, 4, 2])]);
        let a = refine(&initial, &dm, &quick(), &mut StdRng::seed_from_u64(77), None)
            .expect("valid config");
        let b = refine(&initial, &dm, &quick(), &mut StdRng::seed_from_u64(77), None)
            .expect("valid config");
        assert_eq!(a.best, b.best);
        assert_eq!(a.stats, b.stats);
    }

    #[test]
    fn test_selection_policy_controls_idle_trials() {
        let dm = line_matrix();
        let initial = Solution::from_routes(vec![
            Route::singleton(0, 4),
            Route::new(0, vec![3, 1, 2]),
            Route::singleton(0, 5),
        ]);

        let uniform = refine(&initial, &dm, &quick(), &mut StdRng::seed_from_u64(4), None)
            .expect("valid config");
        assert!(uniform.stats.idle_trials > 0);

        let config = quick().with_route_selection(RouteSelection::Perturbable);
        let focused = refine(&initial, &dm, &config, &mut StdRng::seed_from_u64(4), None)
            .expect("valid config");
        assert_eq!(focused.stats.idle_trials, 0);
        assert_eq!(focused.stats.trials, uniform.stats.trials);
    }

    #[derive(Clone)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().expect("lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_level_progress_logged_at_debug() {
        let dm = line_matrix();
        let initial = Solution::from_routes(vec![Route::new(0, vec![3, 1, 2])]);
        let buf = Arc::new(Mutex::new(Vec::new()));
        let writer = Captured(Arc::clone(&buf));
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .without_time()
            .with_writer(move || writer.clone())
            .finish();

        let result = tracing::subscriber::with_default(subscriber, || {
            let mut rng = StdRng::seed_from_u64(8);
            refine(&initial, &dm, &quick(), &mut rng, None).expect("valid config")
        });

        let out = String::from_utf8(buf.lock().expect("lock").clone()).expect("utf-8");
        let levels: Vec<&str> = out
            .lines()
            .filter(|l| l.contains("temperature level done"))
            .collect();
        assert_eq!(levels.len(), result.stats.levels);
        assert!(levels.iter().all(|l| l.contains("DEBUG")));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let dm = line_matrix();
        let initial = Solution::from_routes(vec![Route::new(0, vec![3, 1, 2])]);
        let config = quick().with_cooling_factor(1.0);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            refine(&initial, &dm, &config, &mut rng, None).unwrap_err(),
            ConfigError::CoolingFactorOutOfRange(1.0)
        );
    }
}
