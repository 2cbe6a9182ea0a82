//! Ranked simulation results

use appflow_core::PATH_SEPARATOR;
use serde::{Deserialize, Serialize};

/// One distinct successful path and how often it occurred
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathConfidence {
    /// Apps visited from start to end, inclusive
    pub path: Vec<String>,
    /// Trials that produced exactly this path
    pub count: u64,
    /// `count / trials`
    pub confidence: f64,
}

impl PathConfidence {
    /// Render the path as `A -> B -> C`
    pub fn render(&self) -> String {
        self.path.join(PATH_SEPARATOR)
    }
}

/// Outcome of a simulation batch
///
/// Paths are sorted by confidence descending; equal confidences keep the
/// order in which the paths were first discovered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Seed of the batch (replay with `APPFLOW_SEED`)
    pub seed: u64,
    /// Trials requested
    pub trials: u64,
    /// Trials that reached the end app
    pub successes: u64,
    /// Trials that stopped at an app without outgoing transitions
    pub dead_ends: u64,
    /// Trials that used up the transition budget
    pub step_limited: u64,
    /// Start or end app was not in the graph
    pub unknown_state: bool,
    pub paths: Vec<PathConfidence>,
}

impl SimulationResult {
    /// Empty result for a query naming an app the graph does not know
    pub fn unknown(seed: u64, trials: u64) -> Self {
        Self {
            seed,
            trials,
            successes: 0,
            dead_ends: 0,
            step_limited: 0,
            unknown_state: true,
            paths: Vec::new(),
        }
    }

    /// Check if no trial reached the end app
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Sum of path confidences, equal to `successes / trials`
    pub fn total_confidence(&self) -> f64 {
        self.paths.iter().map(|p| p.confidence).sum()
    }

    /// Share of trials that failed to reach the end app
    pub fn failure_rate(&self) -> f64 {
        if self.trials == 0 {
            return 0.0;
        }
        (self.trials - self.successes) as f64 / self.trials as f64
    }
}
