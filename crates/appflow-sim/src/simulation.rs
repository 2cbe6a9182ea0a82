//! Monte Carlo path-confidence simulator
//!
//! TigerStyle: Reproducible batches with explicit configuration.
//!
//! A batch runs `trials` independent walks over a read-only [`Dfg`]. Walks
//! share nothing but the graph, so they run on the rayon pool without
//! locks; each worker folds outcomes into its own [`PathTally`] and the
//! tallies are reduced at the end.
//!
//! # Example
//!
//! ```rust,ignore
//! use appflow_sim::{SimulationConfig, SimulationRequest, Simulator};
//!
//! let simulator = Simulator::new(SimulationConfig::default().with_seed(42))?;
//! let request = SimulationRequest::parse("1000", 0.1, "Screen on", "Screen off")?;
//! let result = simulator.simulate(&dfg, &request);
//! for path in &result.paths {
//!     println!("{:.3}  {}", path.confidence, path.render());
//! }
//! ```

use crate::request::SimulationRequest;
use crate::result::{PathConfidence, SimulationResult};
use crate::rng::DeterministicRng;
use crate::tally::PathTally;
use crate::trial::Walk;
use appflow_core::{Dfg, Result, SimulationSettings, SIMULATION_WALK_STEPS_MAX_DEFAULT};
use rayon::prelude::*;
use std::time::Instant;

/// Configuration for a simulator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Maximum transitions per walk
    pub walk_steps_max: usize,
    /// Run trials on the rayon pool
    pub parallel: bool,
    /// Fixed seed; when absent each batch draws one (see `APPFLOW_SEED`)
    pub seed: Option<u64>,
}

impl SimulationConfig {
    /// Set a fixed seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the transition budget per walk
    pub fn with_walk_steps_max(mut self, steps: usize) -> Self {
        self.walk_steps_max = steps;
        self
    }

    /// Run trials on the calling thread only
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Validate the configuration against the same limits as the config file
    pub fn validate(&self) -> Result<()> {
        SimulationSettings::from(self).validate()
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            walk_steps_max: SIMULATION_WALK_STEPS_MAX_DEFAULT,
            parallel: true,
            seed: None,
        }
    }
}

impl From<&SimulationConfig> for SimulationSettings {
    fn from(config: &SimulationConfig) -> Self {
        Self {
            walk_steps_max: config.walk_steps_max,
            parallel: config.parallel,
            seed: config.seed,
        }
    }
}

impl From<&SimulationSettings> for SimulationConfig {
    fn from(settings: &SimulationSettings) -> Self {
        Self {
            walk_steps_max: settings.walk_steps_max,
            parallel: settings.parallel,
            seed: settings.seed,
        }
    }
}

/// Path-confidence simulator
#[derive(Debug, Clone)]
pub struct Simulator {
    config: SimulationConfig,
}

impl Simulator {
    /// Create a simulator with a validated configuration
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get the configuration
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Estimate how likely each path from `start` to `end` is
    ///
    /// Never fails: unknown apps give an empty result, and trials that hit
    /// a dead end or the step bound simply do not contribute confidence.
    /// When start and end are the same known app every trial succeeds
    /// immediately with the single-app path.
    pub fn simulate(&self, dfg: &Dfg, request: &SimulationRequest) -> SimulationResult {
        debug_assert!(request.validate().is_ok());

        let seed = self
            .config
            .seed
            .unwrap_or_else(DeterministicRng::seed_from_env_or_random);
        let trials = request.trials;

        let (start, end) = match (dfg.node_id(&request.start), dfg.node_id(&request.end)) {
            (Some(start), Some(end)) => (start, end),
            (start, end) => {
                tracing::warn!(
                    start = %request.start,
                    end = %request.end,
                    start_known = start.is_some(),
                    end_known = end.is_some(),
                    "Simulation names an unknown app, returning empty result"
                );
                return SimulationResult::unknown(seed, trials);
            }
        };

        if start == end {
            tracing::debug!(app = %request.start, "Start equals end, trivial success");
            return SimulationResult {
                seed,
                trials,
                successes: trials,
                dead_ends: 0,
                step_limited: 0,
                unknown_state: false,
                paths: vec![PathConfidence {
                    path: vec![request.start.clone()],
                    count: trials,
                    confidence: 1.0,
                }],
            };
        }

        let walk = Walk {
            start,
            end,
            exploration: request.exploration,
            steps_max: self.config.walk_steps_max,
        };

        let started = Instant::now();
        let tally = if self.config.parallel {
            (0..trials)
                .into_par_iter()
                .fold(PathTally::default, |mut tally, trial| {
                    let mut rng = DeterministicRng::for_stream(seed, trial);
                    tally.record(trial, walk.run(dfg, &mut rng));
                    tally
                })
                .reduce(PathTally::default, PathTally::merge)
        } else {
            (0..trials).fold(PathTally::default(), |mut tally, trial| {
                let mut rng = DeterministicRng::for_stream(seed, trial);
                tally.record(trial, walk.run(dfg, &mut rng));
                tally
            })
        };
        debug_assert_eq!(tally.recorded(), trials);

        let distinct_paths = tally.distinct_paths();
        let result = tally.rank(dfg, seed, trials);

        tracing::info!(
            start = %request.start,
            end = %request.end,
            trials,
            exploration = request.exploration,
            successes = result.successes,
            dead_ends = result.dead_ends,
            step_limited = result.step_limited,
            distinct_paths,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Simulation complete"
        );
        result
    }
}
