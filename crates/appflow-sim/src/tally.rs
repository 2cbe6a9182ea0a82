//! Aggregation of trial outcomes
//!
//! A tally counts successful trials by their exact node path and remembers
//! the lowest trial index that produced each path. Tallies from different
//! workers merge by addition, so the final ranking does not depend on how
//! trials were split across threads.

use crate::result::{PathConfidence, SimulationResult};
use crate::trial::TrialOutcome;
use appflow_core::{Dfg, NodeId};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PathEntry {
    count: u64,
    first_trial: u64,
}

/// Running counts of trial outcomes keyed by path
#[derive(Debug, Clone, Default)]
pub struct PathTally {
    paths: HashMap<Vec<NodeId>, PathEntry>,
    successes: u64,
    dead_ends: u64,
    step_limited: u64,
}

impl PathTally {
    /// Record the outcome of trial number `trial`
    pub fn record(&mut self, trial: u64, outcome: TrialOutcome) {
        match outcome {
            TrialOutcome::Success(path) => {
                self.successes += 1;
                let entry = self.paths.entry(path).or_insert(PathEntry {
                    count: 0,
                    first_trial: trial,
                });
                entry.count += 1;
                entry.first_trial = entry.first_trial.min(trial);
            }
            TrialOutcome::DeadEnd => self.dead_ends += 1,
            TrialOutcome::StepLimit => self.step_limited += 1,
        }
    }

    /// Combine two tallies
    pub fn merge(mut self, other: Self) -> Self {
        let (mut into, from) = if self.paths.len() >= other.paths.len() {
            (std::mem::take(&mut self.paths), other.paths)
        } else {
            (other.paths, std::mem::take(&mut self.paths))
        };

        for (path, entry) in from {
            into.entry(path)
                .and_modify(|e| {
                    e.count += entry.count;
                    e.first_trial = e.first_trial.min(entry.first_trial);
                })
                .or_insert(entry);
        }

        Self {
            paths: into,
            successes: self.successes + other.successes,
            dead_ends: self.dead_ends + other.dead_ends,
            step_limited: self.step_limited + other.step_limited,
        }
    }

    /// Trials recorded so far
    pub fn recorded(&self) -> u64 {
        self.successes + self.dead_ends + self.step_limited
    }

    /// Number of distinct successful paths
    pub fn distinct_paths(&self) -> usize {
        self.paths.len()
    }

    /// Rank paths by count (ties by first discovery) into a result
    pub fn rank(self, dfg: &Dfg, seed: u64, trials: u64) -> SimulationResult {
        debug_assert!(trials > 0);
        debug_assert_eq!(self.recorded(), trials);

        let mut ranked: Vec<(Vec<NodeId>, PathEntry)> = self.paths.into_iter().collect();
        ranked.sort_by(|(_, a), (_, b)| {
            b.count
                .cmp(&a.count)
                .then(a.first_trial.cmp(&b.first_trial))
        });

        let paths = ranked
            .into_iter()
            .map(|(path, entry)| PathConfidence {
                path: path.iter().map(|&n| dfg.app(n).to_string()).collect(),
                count: entry.count,
                confidence: entry.count as f64 / trials as f64,
            })
            .collect();

        SimulationResult {
            seed,
            trials,
            successes: self.successes,
            dead_ends: self.dead_ends,
            step_limited: self.step_limited,
            unknown_state: false,
            paths,
        }
    }
}
