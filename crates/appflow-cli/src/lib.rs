//! Appflow CLI library
//!
//! Application state and request handlers behind the `appflow` binary.

pub mod handlers;
pub mod state;

pub use handlers::{
    graph_view, node_details, simulate, time_distribution, AppUsageRow, GraphView, NodeDetails,
    SimulationRow, SimulationTable,
};
pub use state::AppState;
