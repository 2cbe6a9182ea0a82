//! Appflow CLI
//!
//! TigerStyle: Command-line dashboard for app-usage logs with explicit error handling.

use anyhow::{Context, Result};
use appflow_cli::handlers::{self, GraphView, NodeDetails, SimulationTable};
use appflow_cli::{AppState, AppUsageRow};
use appflow_core::{
    init_telemetry, AppflowConfig, TelemetryConfig, SIMULATION_EXPLORATION_DEFAULT,
    SIMULATION_TRIALS_COUNT_DEFAULT,
};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

/// Appflow CLI
#[derive(Parser, Debug)]
#[command(name = "appflow")]
#[command(about = "Process-mining dashboard for app-usage event logs")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file path
    #[arg(short, long, default_value = "appflow.toml", global = true)]
    config: PathBuf,

    /// Event log to load (overrides the configuration)
    #[arg(short, long, global = true)]
    log: Option<PathBuf>,

    /// Session break span in seconds (overrides the configuration)
    #[arg(long, global = true)]
    break_span: Option<i64>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the directly-follows graph
    Graph {
        /// Only the N most used apps
        #[arg(short, long)]
        top: Option<usize>,

        /// Percentage of edges to show, heaviest first
        #[arg(short, long)]
        resolution: Option<u8>,
    },

    /// Show transitions and usage time of one app
    Node {
        /// App identifier
        app: String,
    },

    /// Show total usage time per app
    Usage {
        /// Only the N apps with the most usage time
        #[arg(short, long)]
        top: Option<usize>,
    },

    /// Estimate path confidence with Monte Carlo walks
    Simulate {
        /// App the walks start from
        start: String,

        /// App the walks try to reach
        end: String,

        /// Number of walks
        #[arg(short = 'n', long, default_value_t = SIMULATION_TRIALS_COUNT_DEFAULT.to_string())]
        trials: String,

        /// How irrational the walker is (0 = follow habits, 1 = uniform)
        #[arg(short, long, default_value_t = SIMULATION_EXPLORATION_DEFAULT)]
        exploration: f64,

        /// Fixed seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_telemetry(&TelemetryConfig::new("appflow").with_verbosity(cli.verbose))
        .context("Failed to initialize logging")?;

    let config = load_config(&cli)?;
    let state = AppState::load(config).context("Failed to load event log")?;

    match cli.command {
        Commands::Graph { top, resolution } => cmd_graph(&state, top, resolution, cli.json),
        Commands::Node { ref app } => cmd_node(&state, app, cli.json),
        Commands::Usage { top } => cmd_usage(&state, top, cli.json),
        Commands::Simulate {
            ref start,
            ref end,
            ref trials,
            exploration,
            ..
        } => cmd_simulate(&state, trials, exploration, start, end, cli.json),
    }
}

/// Read the configuration file (defaults when absent) and apply CLI overrides
fn load_config(cli: &Cli) -> Result<AppflowConfig> {
    let mut config = if cli.config.exists() {
        AppflowConfig::load(&cli.config)
            .with_context(|| format!("Failed to load config: {}", cli.config.display()))?
    } else {
        tracing::info!(path = %cli.config.display(), "No config file, using defaults");
        let mut config = AppflowConfig::default();
        config
            .apply_env_overrides()
            .context("Invalid environment override")?;
        config
    };

    if let Some(ref log) = cli.log {
        config.log_file = log.clone();
    }
    if let Some(secs) = cli.break_span {
        config.break_span_secs = secs;
    }
    if let Commands::Simulate {
        seed: Some(seed), ..
    } = cli.command
    {
        config.simulation.seed = Some(seed);
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn format_secs(secs: f64) -> String {
    if secs >= 3600.0 {
        format!("{:.1}h", secs / 3600.0)
    } else if secs >= 60.0 {
        format!("{:.1}m", secs / 60.0)
    } else {
        format!("{:.0}s", secs)
    }
}

/// Show the graph
fn cmd_graph(state: &AppState, top: Option<usize>, resolution: Option<u8>, json: bool) -> Result<()> {
    let graph: GraphView =
        handlers::graph_view(state, top, resolution).context("Failed to build graph view")?;

    if json {
        return print_json(&graph);
    }

    println!();
    println!(
        "{} ({} apps, {} edges, {} sessions; showing {}% of edges)",
        "Directly Follows Graph".bold(),
        graph.apps_total,
        graph.edges_total,
        graph.sessions,
        graph.resolution
    );
    println!("{}", "-".repeat(60));

    for node in &graph.view.nodes {
        println!("  {} {}", node.app.cyan(), format!("({})", node.event_count).dimmed());
    }
    println!();
    for edge in &graph.view.edges {
        println!(
            "  {:>6}  {} -> {}",
            edge.count.to_string().bold(),
            edge.source,
            edge.target
        );
    }
    println!();
    Ok(())
}

/// Show one app
fn cmd_node(state: &AppState, app: &str, json: bool) -> Result<()> {
    let details: NodeDetails = handlers::node_details(state, app)
        .with_context(|| format!("App '{}' does not occur in the log", app))?;

    if json {
        return print_json(&details);
    }

    println!();
    println!("{} {}", "App:".bold(), details.app.cyan());
    println!("  {} {}", "Events:".bold(), details.event_count);
    match details.mean_usage_secs {
        Some(secs) => println!("  {} {}", "Average usage time:".bold(), format_secs(secs)),
        None => println!("  {} {}", "Average usage time:".bold(), "n/a".dimmed()),
    }

    println!();
    println!("{}", "Directly previous apps".bold());
    for row in &details.transitions.previous {
        println!("  {:>6}  {:>6.1}%  {}", row.count, row.frequency * 100.0, row.app);
    }

    println!();
    println!("{}", "Directly next apps".bold());
    for row in &details.transitions.next {
        println!("  {:>6}  {:>6.1}%  {}", row.count, row.frequency * 100.0, row.app);
    }

    println!();
    println!("{}", "Events by hour (UTC)".bold());
    let peak = details.hourly.iter().copied().max().unwrap_or(0).max(1);
    for (hour, count) in details.hourly.iter().enumerate() {
        let bar = "#".repeat((*count * 40 / peak) as usize);
        println!("  {:02}  {:>5}  {}", hour, count, bar.green());
    }
    println!();
    Ok(())
}

/// Show the usage-time distribution
fn cmd_usage(state: &AppState, top: Option<usize>, json: bool) -> Result<()> {
    let rows: Vec<AppUsageRow> = handlers::time_distribution(state, top);

    if json {
        return print_json(&rows);
    }

    println!();
    println!("{} ({} apps)", "Usage Time Distribution".bold(), rows.len());
    println!("{}", "-".repeat(60));
    for row in &rows {
        let mean = row
            .mean_secs
            .map(format_secs)
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "  {:>8}  {:>6} events  avg {:>6}  {}",
            format_secs(row.total_secs).bold(),
            row.event_count,
            mean,
            row.app.cyan()
        );
    }
    println!();
    Ok(())
}

/// Run a path simulation
fn cmd_simulate(
    state: &AppState,
    trials: &str,
    exploration: f64,
    start: &str,
    end: &str,
    json: bool,
) -> Result<()> {
    let table: SimulationTable = handlers::simulate(state, trials, exploration, start, end)
        .context("Invalid simulation request")?;

    if json {
        return print_json(&table);
    }

    let result = &table.result;
    println!();
    println!(
        "{} {} {} {}",
        "Paths".bold(),
        start.cyan(),
        "->".dimmed(),
        end.cyan()
    );
    println!(
        "{}",
        format!(
            "{} trials, exploration {}, seed {} (replay with APPFLOW_SEED={})",
            result.trials, exploration, result.seed, result.seed
        )
        .dimmed()
    );
    println!("{}", "-".repeat(60));

    if result.unknown_state {
        println!("{}", "Start or end app does not occur in the log.".yellow());
    } else if result.is_empty() {
        println!("{}", "No walk reached the end app.".yellow());
    }

    for row in &table.rows {
        println!("  {:>7.3}  {}", row.confidence, row.path);
    }

    println!();
    println!(
        "  {} {:.3}  {} {:.3}  {} {}  {} {}",
        "reached:".bold(),
        result.total_confidence(),
        "failed:".bold(),
        result.failure_rate(),
        "dead ends:".bold(),
        result.dead_ends,
        "step limit:".bold(),
        result.step_limited
    );
    println!();
    Ok(())
}
