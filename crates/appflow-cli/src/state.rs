//! Application state
//!
//! Everything derived from the event log is computed once at start-up and
//! shared read-only with every handler.

use appflow_core::{AppflowConfig, Dfg, EventLog, Result, UsageStats};
use appflow_sim::{SimulationConfig, Simulator};

/// Immutable state shared by all request handlers
#[derive(Debug)]
pub struct AppState {
    config: AppflowConfig,
    log: EventLog,
    dfg: Dfg,
    usage: UsageStats,
    simulator: Simulator,
}

impl AppState {
    /// Build state from a validated configuration and a loaded log
    pub fn new(config: AppflowConfig, log: EventLog) -> Result<Self> {
        config.validate()?;

        let break_span = config.break_span();
        let dfg = Dfg::from_log(&log, break_span);
        let usage = UsageStats::compute(log.records(), break_span);
        let simulator = Simulator::new(SimulationConfig::from(&config.simulation))?;

        tracing::info!(
            records = log.len(),
            apps = dfg.node_count(),
            edges = dfg.edge_count(),
            sessions = dfg.session_count(),
            "Application state ready"
        );

        Ok(Self {
            config,
            log,
            dfg,
            usage,
            simulator,
        })
    }

    /// Load the log named by the configuration and build state
    pub fn load(config: AppflowConfig) -> Result<Self> {
        let log = EventLog::load(&config.log_file)?;
        Self::new(config, log)
    }

    pub fn config(&self) -> &AppflowConfig {
        &self.config
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn dfg(&self) -> &Dfg {
        &self.dfg
    }

    pub fn usage(&self) -> &UsageStats {
        &self.usage
    }

    pub fn simulator(&self) -> &Simulator {
        &self.simulator
    }
}
