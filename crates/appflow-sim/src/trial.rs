//! A single random walk
//!
//! A trial is a pure function of the graph, the walk parameters and its own
//! RNG. It never mutates the graph and never fails: dead ends and the step
//! bound are ordinary outcomes.

use crate::rng::DeterministicRng;
use appflow_core::{Dfg, NodeId, Transition};

/// How a single walk ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrialOutcome {
    /// The walk reached the end node along this exact path
    Success(Vec<NodeId>),
    /// The walk stopped at a node without outgoing edges
    DeadEnd,
    /// The walk used up its transition budget
    StepLimit,
}

impl TrialOutcome {
    /// Check if the walk reached the end node
    pub fn is_success(&self) -> bool {
        matches!(self, TrialOutcome::Success(_))
    }
}

/// Parameters shared by every walk of a batch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Walk {
    pub start: NodeId,
    pub end: NodeId,
    /// Probability of picking a neighbor uniformly instead of by frequency
    pub exploration: f64,
    /// Transitions allowed before the walk is abandoned
    pub steps_max: usize,
}

impl Walk {
    /// Run one walk
    pub fn run(&self, dfg: &Dfg, rng: &mut DeterministicRng) -> TrialOutcome {
        debug_assert!((0.0..=1.0).contains(&self.exploration));
        debug_assert!(self.steps_max > 0);

        let mut current = self.start;
        let mut path = vec![current];

        loop {
            if current == self.end {
                return TrialOutcome::Success(path);
            }

            let transitions = dfg.outgoing(current);
            if transitions.is_empty() {
                return TrialOutcome::DeadEnd;
            }
            if path.len() > self.steps_max {
                return TrialOutcome::StepLimit;
            }

            current = choose_next(
                transitions,
                dfg.outgoing_total(current),
                self.exploration,
                rng,
            );
            path.push(current);
        }
    }
}

/// Pick the next node among `transitions`
///
/// With probability `exploration` every neighbor is equally likely;
/// otherwise a neighbor is drawn in proportion to its observed count.
/// `total` is the sum of the transition counts.
pub fn choose_next(
    transitions: &[Transition],
    total: u64,
    exploration: f64,
    rng: &mut DeterministicRng,
) -> NodeId {
    assert!(!transitions.is_empty(), "node has no outgoing transitions");
    debug_assert_eq!(total, transitions.iter().map(|t| t.count).sum::<u64>());

    if rng.next_bool(exploration) {
        return transitions[rng.next_index(transitions.len())].node;
    }

    let mut remaining = rng.next_below(total);
    for transition in transitions {
        if remaining < transition.count {
            return transition.node;
        }
        remaining -= transition.count;
    }
    unreachable!("draw below total always lands on a transition")
}
