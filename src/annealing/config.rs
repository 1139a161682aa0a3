//! Simulated annealing configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How a trial picks the route to perturb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteSelection {
    /// Every route is equally likely. Picking a route with fewer than two
    /// customers makes the trial a no-op.
    #[default]
    Uniform,
    /// Uniform among routes with at least two customers, so every trial
    /// proposes a real swap.
    Perturbable,
}

/// Configuration parameters for the annealing refiner.
///
/// The temperature starts at `initial_temperature`; each level runs
/// `iterations_per_level` trials and then multiplies the temperature by
/// `cooling_factor`, until it is no longer above `final_temperature`.
///
/// # Examples
///
/// ```
/// use u_cvrp::annealing::{AnnealingConfig, RouteSelection};
///
/// let config = AnnealingConfig::default()
///     .with_initial_temperature(100.0)
///     .with_cooling_factor(0.9)
///     .with_route_selection(RouteSelection::Perturbable)
///     .with_seed(42);
/// assert_eq!(config.initial_temperature, 100.0);
/// assert_eq!(config.final_temperature, 1.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnealingConfig {
    /// Starting temperature.
    pub initial_temperature: f64,
    /// The schedule stops once the temperature is at or below this value.
    pub final_temperature: f64,
    /// Geometric cooling factor applied after each level, in (0, 1).
    pub cooling_factor: f64,
    /// Perturbation trials per temperature level.
    pub iterations_per_level: usize,
    /// Route selection policy for each trial.
    pub route_selection: RouteSelection,
    /// Random seed (None draws one from the operating system).
    pub seed: Option<u64>,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 1000.0,
            final_temperature: 1.0,
            cooling_factor: 0.995,
            iterations_per_level: 500,
            route_selection: RouteSelection::Uniform,
            seed: None,
        }
    }
}

impl AnnealingConfig {
    /// Sets the starting temperature.
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    /// Sets the final temperature.
    pub fn with_final_temperature(mut self, t: f64) -> Self {
        self.final_temperature = t;
        self
    }

    /// Sets the geometric cooling factor.
    pub fn with_cooling_factor(mut self, factor: f64) -> Self {
        self.cooling_factor = factor;
        self
    }

    /// Sets the number of trials per temperature level.
    pub fn with_iterations_per_level(mut self, n: usize) -> Self {
        self.iterations_per_level = n;
        self
    }

    /// Sets the route selection policy.
    pub fn with_route_selection(mut self, selection: RouteSelection) -> Self {
        self.route_selection = selection;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks that the schedule terminates and every level does work.
    ///
    /// # Errors
    ///
    /// A [`ConfigError`] describing the first invalid parameter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (initial, final_) = (self.initial_temperature, self.final_temperature);
        if !initial.is_finite() || !final_.is_finite() || initial <= 0.0 || final_ <= 0.0 {
            return Err(ConfigError::InvalidTemperature { initial, final_ });
        }
        if final_ >= initial {
            return Err(ConfigError::FinalNotBelowInitial { initial, final_ });
        }
        if !(self.cooling_factor > 0.0 && self.cooling_factor < 1.0) {
            return Err(ConfigError::CoolingFactorOutOfRange(self.cooling_factor));
        }
        if self.iterations_per_level == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        Ok(())
    }

    /// Number of temperature levels the schedule runs.
    ///
    /// # Errors
    ///
    /// Same as [`validate`](Self::validate).
    pub fn levels(&self) -> Result<usize, ConfigError> {
        self.validate()?;
        let mut levels = 0;
        let mut temp = self.initial_temperature;
        while temp > self.final_temperature {
            levels += 1;
            temp *= self.cooling_factor;
        }
        Ok(levels)
    }
}
