//! Request handlers
//!
//! Each handler takes the shared [`AppState`] by reference, validates its
//! inputs and returns a serializable response. Handlers never mutate state,
//! so any front end can call them concurrently.

use crate::state::AppState;
use appflow_core::{
    AppUsage, DfgView, Error, NodeTransitions, Result, ViewFilter, USAGE_HOURS_COUNT,
};
use appflow_sim::{SimulationRequest, SimulationResult};
use serde::Serialize;

/// Filtered graph plus totals of the full graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphView {
    pub sessions: usize,
    pub apps_total: usize,
    pub edges_total: usize,
    pub resolution: u8,
    pub view: DfgView,
}

/// Build the graph panel
///
/// `resolution` falls back to the configured default.
pub fn graph_view(state: &AppState, top: Option<usize>, resolution: Option<u8>) -> Result<GraphView> {
    let resolution = resolution.unwrap_or(state.config().view.resolution);
    let filter = ViewFilter::new(top, resolution)?;
    let dfg = state.dfg();

    Ok(GraphView {
        sessions: dfg.session_count(),
        apps_total: dfg.node_count(),
        edges_total: dfg.edge_count(),
        resolution,
        view: dfg.view(&filter)?,
    })
}

/// Transition tables and usage figures for one app
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeDetails {
    pub app: String,
    pub event_count: u64,
    pub mean_usage_secs: Option<f64>,
    pub hourly: [u64; USAGE_HOURS_COUNT],
    pub transitions: NodeTransitions,
}

/// Build the node panel
///
/// An app that never occurs in the log is an `UnknownApp` error.
pub fn node_details(state: &AppState, app: &str) -> Result<NodeDetails> {
    let unknown = || Error::UnknownApp {
        app: app.to_string(),
    };
    let transitions = state.dfg().transitions_of(app).ok_or_else(unknown)?;
    let usage = state.usage().get(app).ok_or_else(unknown)?;

    Ok(NodeDetails {
        app: app.to_string(),
        event_count: usage.event_count,
        mean_usage_secs: usage.mean_secs(),
        hourly: usage.hourly,
        transitions,
    })
}

/// One row of the time-distribution table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppUsageRow {
    pub app: String,
    pub total_secs: f64,
    pub event_count: u64,
    pub mean_secs: Option<f64>,
}

impl From<&AppUsage> for AppUsageRow {
    fn from(usage: &AppUsage) -> Self {
        Self {
            app: usage.app.clone(),
            total_secs: usage.total_secs(),
            event_count: usage.event_count,
            mean_secs: usage.mean_secs(),
        }
    }
}

/// Build the time-distribution panel, longest total usage first
pub fn time_distribution(state: &AppState, top: Option<usize>) -> Vec<AppUsageRow> {
    state
        .usage()
        .by_total_time(top)
        .into_iter()
        .map(AppUsageRow::from)
        .collect()
}

/// One row of the simulation table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationRow {
    pub path: String,
    pub confidence: f64,
}

/// Simulation panel: rendered rows plus the raw result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationTable {
    pub rows: Vec<SimulationRow>,
    pub result: SimulationResult,
}

/// Validate a simulation query and run it
///
/// The trial count arrives as text. Invalid input is rejected before any
/// walk runs; unknown apps produce an empty table.
pub fn simulate(
    state: &AppState,
    trials: &str,
    exploration: f64,
    start: &str,
    end: &str,
) -> Result<SimulationTable> {
    let request = SimulationRequest::parse(trials, exploration, start, end)?;
    let result = state.simulator().simulate(state.dfg(), &request);

    Ok(SimulationTable {
        rows: result
            .paths
            .iter()
            .map(|p| SimulationRow {
                path: p.render(),
                confidence: p.confidence,
            })
            .collect(),
        result,
    })
}
