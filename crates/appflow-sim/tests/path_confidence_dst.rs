//! Deterministic simulation tests for path confidence
//!
//! TigerStyle: Fixed seeds, explicit tolerances, statistical bounds.
//!
//! These tests build small usage logs, turn them into directly-follows
//! graphs and check the simulator's statistical and boundary behaviour.

use appflow_core::{Dfg, EventRecord};
use appflow_sim::{SimulationConfig, SimulationRequest, Simulator};
use chrono::{DateTime, Duration, TimeZone, Utc};

// =============================================================================
// Constants (TigerStyle: explicit units and bounds)
// =============================================================================

/// Session break span in seconds
const BREAK_SPAN_SECS: i64 = 10;

/// Gap between sessions in seconds (well above the break span)
const SESSION_GAP_SECS: i64 = 1000;

/// Seed used unless a test needs several
const SEED: u64 = 0x5EED;

/// Absolute tolerance for sampled shares
const SHARE_TOLERANCE: f64 = 0.03;

// =============================================================================
// Helpers
// =============================================================================

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_600_000_000 + secs, 0).unwrap()
}

/// Build a graph from sessions, each a list of apps one second apart
fn graph_from_sessions(sessions: &[&[&str]]) -> Dfg {
    let mut events = Vec::new();
    let mut clock = 0;
    for session in sessions {
        for app in *session {
            events.push(EventRecord::new(*app, at(clock)));
            clock += 1;
        }
        clock += SESSION_GAP_SECS;
    }
    Dfg::build(&events, Duration::seconds(BREAK_SPAN_SECS))
}

/// A -> B observed `b` times, A -> C observed `c` times, C is a dead end
fn fork_graph(b: usize, c: usize) -> Dfg {
    const A_TO_B: &[&str] = &["A", "B"];
    const A_TO_C: &[&str] = &["A", "C"];

    let mut sessions: Vec<&[&str]> = Vec::new();
    sessions.extend(std::iter::repeat(A_TO_B).take(b));
    sessions.extend(std::iter::repeat(A_TO_C).take(c));
    graph_from_sessions(&sessions)
}

fn simulator(seed: u64) -> Simulator {
    Simulator::new(SimulationConfig::default().with_seed(seed)).unwrap()
}

fn share_of(result: &appflow_sim::SimulationResult, rendered: &str) -> f64 {
    result
        .paths
        .iter()
        .find(|p| p.render() == rendered)
        .map(|p| p.confidence)
        .unwrap_or(0.0)
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_frequency_weighted_fork() {
    let dfg = fork_graph(3, 1);
    let a = dfg.node_id("A").unwrap();
    let b = dfg.node_id("B").unwrap();
    assert_eq!(dfg.edge_count_between(a, b), 3);

    let request = SimulationRequest::new("A", "B", 1000, 0.0).unwrap();
    let result = simulator(SEED).simulate(&dfg, &request);

    assert_eq!(result.paths.len(), 1);
    assert_eq!(result.paths[0].render(), "A -> B");
    assert!(
        (result.paths[0].confidence - 0.75).abs() < 0.05,
        "confidence was {}",
        result.paths[0].confidence
    );
    // Every failed trial went through C and stopped there
    assert_eq!(result.dead_ends, 1000 - result.successes);
}

#[test]
fn test_zero_exploration_favors_dominant_edge() {
    let dfg = fork_graph(9, 1);
    let request = SimulationRequest::new("A", "B", 20_000, 0.0).unwrap();
    let result = simulator(SEED).simulate(&dfg, &request);

    let share = share_of(&result, "A -> B");
    assert!(share > 0.85, "dominant edge share was {}", share);
    assert!((share - 0.9).abs() < SHARE_TOLERANCE);
}

#[test]
fn test_full_exploration_is_uniform() {
    let dfg = fork_graph(9, 1);
    let request = SimulationRequest::new("A", "B", 20_000, 1.0).unwrap();
    let result = simulator(SEED).simulate(&dfg, &request);

    let share = share_of(&result, "A -> B");
    assert!((share - 0.5).abs() < SHARE_TOLERANCE, "share was {}", share);
}

#[test]
fn test_partial_exploration_blends_policies() {
    // P(A -> B) = (1 - e) * 0.9 + e * 0.5
    let dfg = fork_graph(9, 1);
    let exploration = 0.5;
    let request = SimulationRequest::new("A", "B", 20_000, exploration).unwrap();
    let result = simulator(SEED).simulate(&dfg, &request);

    let expected = (1.0 - exploration) * 0.9 + exploration * 0.5;
    let share = share_of(&result, "A -> B");
    assert!((share - expected).abs() < SHARE_TOLERANCE, "share was {}", share);
}

#[test]
fn test_confidence_sum_matches_successes() {
    let sessions: [&[&str]; 4] = [
        &["A", "B", "C", "A", "D"],
        &["A", "C", "B", "D"],
        &["B", "A", "C", "C", "D", "A"],
        &["A", "E"],
    ];
    let dfg = graph_from_sessions(&sessions);
    let request = SimulationRequest::new("A", "D", 5000, 0.2).unwrap();

    for seed in 0..5 {
        let result = simulator(seed).simulate(&dfg, &request);
        let total = result.total_confidence();
        assert!(total <= 1.0 + 1e-9);
        assert!((total - result.successes as f64 / result.trials as f64).abs() < 1e-9);
        assert_eq!(
            result.successes + result.dead_ends + result.step_limited,
            result.trials
        );

        // Ranked by confidence, descending
        for pair in result.paths.windows(2) {
            assert!(pair[0].confidence >= pair[1].confidence);
        }
        // Every path starts at A and ends at D
        for path in &result.paths {
            assert_eq!(path.path.first().map(String::as_str), Some("A"));
            assert_eq!(path.path.last().map(String::as_str), Some("D"));
        }
    }
}

#[test]
fn test_same_seed_same_result() {
    let dfg = graph_from_sessions(&[&["A", "B", "C", "A", "C", "D", "B", "D"]]);
    let request = SimulationRequest::new("A", "D", 3000, 0.4).unwrap();

    let first = simulator(SEED).simulate(&dfg, &request);
    let second = simulator(SEED).simulate(&dfg, &request);
    assert_eq!(first, second);
    assert_eq!(first.seed, SEED);
}

#[test]
fn test_dead_end_start_terminates() {
    let dfg = graph_from_sessions(&[&["A", "B"]]);
    let request = SimulationRequest::new("B", "A", 500, 0.3).unwrap();
    let result = simulator(SEED).simulate(&dfg, &request);

    assert!(result.is_empty());
    assert_eq!(result.dead_ends, 500);
}

#[test]
fn test_cycle_without_exit_hits_step_bound() {
    // A <-> B forever; C only ever precedes A
    let dfg = graph_from_sessions(&[&["C", "A", "B", "A", "B", "A"]]);
    let config = SimulationConfig::default()
        .with_seed(SEED)
        .with_walk_steps_max(50);
    let request = SimulationRequest::new("A", "C", 200, 0.5).unwrap();
    let result = Simulator::new(config).unwrap().simulate(&dfg, &request);

    assert!(result.is_empty());
    assert_eq!(result.step_limited, 200);
}

#[test]
fn test_start_equals_end_is_trivial_success() {
    let dfg = fork_graph(3, 1);
    let request = SimulationRequest::new("A", "A", 1000, 0.7).unwrap();
    let result = simulator(SEED).simulate(&dfg, &request);

    assert_eq!(result.paths.len(), 1);
    assert_eq!(result.paths[0].render(), "A");
    assert_eq!(result.paths[0].confidence, 1.0);
}

#[test]
fn test_unknown_start_is_empty() {
    let dfg = fork_graph(3, 1);
    let request = SimulationRequest::new("Z", "B", 1000, 0.1).unwrap();
    let result = simulator(SEED).simulate(&dfg, &request);

    assert!(result.is_empty());
    assert!(result.unknown_state);
}
