//! Appflow Core
//!
//! Event logs, directly-follows graphs, and usage statistics for app-usage
//! process mining.
//!
//! # Overview
//!
//! An event log of `(app, timestamp)` records is split into sessions by a
//! break span. Consecutive in-session records become weighted edges of a
//! directly-follows graph ([`Dfg`]), whose per-node transition
//! distributions feed the path simulator in `appflow-sim`.
//!
//! # TigerStyle
//!
//! - Explicit limits with big-endian naming (e.g., `SIMULATION_TRIALS_COUNT_MAX`)
//! - Built once, read-only afterwards
//! - No recursion (bounded iteration only)

pub mod config;
pub mod constants;
pub mod dfg;
pub mod error;
pub mod event;
pub mod session;
pub mod telemetry;
pub mod usage;
pub mod view;

pub use config::{parse_seed, AppflowConfig, SimulationSettings, ViewSettings};
pub use constants::*;
pub use dfg::{Dfg, NodeId, NodeTransitions, Transition, TransitionRow};
pub use error::{Error, Result};
pub use event::{EventLog, EventRecord};
pub use session::{is_session_break, split_sessions};
pub use telemetry::{init_telemetry, TelemetryConfig};
pub use usage::{AppUsage, UsageStats};
pub use view::{DfgView, ViewEdge, ViewFilter, ViewNode};
