//! Configuration for Appflow
//!
//! TigerStyle: Explicit defaults, validation, reasonable limits.

use crate::constants::*;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration for Appflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppflowConfig {
    /// Event log to analyse (JSON Lines)
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,

    /// Gap that splits the event stream into sessions (seconds)
    #[serde(default = "default_break_span_secs")]
    pub break_span_secs: i64,

    /// Path simulation configuration
    #[serde(default)]
    pub simulation: SimulationSettings,

    /// DFG view configuration
    #[serde(default)]
    pub view: ViewSettings,
}

fn default_log_file() -> PathBuf {
    PathBuf::from("usage.jsonl")
}

fn default_break_span_secs() -> i64 {
    BREAK_SPAN_SECS_DEFAULT
}

impl Default for AppflowConfig {
    fn default() -> Self {
        Self {
            log_file: default_log_file(),
            break_span_secs: default_break_span_secs(),
            simulation: SimulationSettings::default(),
            view: ViewSettings::default(),
        }
    }
}

impl AppflowConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| Error::ConfigReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let config = Self::parse(&contents).map_err(|e| match e {
            Error::ConfigParseFailed { reason, .. } => Error::ConfigParseFailed {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })?;
        tracing::debug!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Parse and validate configuration text
    pub fn parse(contents: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(contents).map_err(|e| Error::ConfigParseFailed {
            path: "<inline>".into(),
            reason: e.to_string(),
        })?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides
    ///
    /// Reads `APPFLOW_SEED` to pin the simulation seed. A value that is not
    /// an unsigned integer is rejected, not ignored.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(text) = std::env::var(SIMULATION_SEED_ENV) {
            self.simulation.seed = Some(parse_seed(&text)?);
        }
        Ok(())
    }

    /// Session break span as a duration
    pub fn break_span(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.break_span_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.log_file.as_os_str().is_empty() {
            return Err(Error::invalid_configuration("log_file", "must not be empty"));
        }

        if self.break_span_secs < 1 || self.break_span_secs > BREAK_SPAN_SECS_MAX {
            return Err(Error::invalid_configuration(
                "break_span_secs",
                format!(
                    "{} outside [1, {}]",
                    self.break_span_secs, BREAK_SPAN_SECS_MAX
                ),
            ));
        }

        self.simulation.validate()?;
        self.view.validate()?;
        Ok(())
    }
}

/// Parse a seed override such as the value of `APPFLOW_SEED`
pub fn parse_seed(text: &str) -> Result<u64> {
    text.trim().parse().map_err(|e| {
        Error::invalid_configuration(
            SIMULATION_SEED_ENV,
            format!("{:?} is not an unsigned integer: {}", text, e),
        )
    })
}

/// Path simulation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationSettings {
    /// Maximum transitions per walk before the trial counts as failed
    #[serde(default = "default_walk_steps_max")]
    pub walk_steps_max: usize,

    /// Run trials on all cores
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    /// Fixed seed (random when absent)
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_walk_steps_max() -> usize {
    SIMULATION_WALK_STEPS_MAX_DEFAULT
}

fn default_parallel() -> bool {
    true
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            walk_steps_max: default_walk_steps_max(),
            parallel: default_parallel(),
            seed: None,
        }
    }
}

impl SimulationSettings {
    /// Validate the simulation settings
    pub fn validate(&self) -> Result<()> {
        if self.walk_steps_max == 0 || self.walk_steps_max > SIMULATION_WALK_STEPS_MAX {
            return Err(Error::invalid_configuration(
                "simulation.walk_steps_max",
                format!(
                    "{} outside [1, {}]",
                    self.walk_steps_max, SIMULATION_WALK_STEPS_MAX
                ),
            ));
        }
        Ok(())
    }
}

/// DFG view configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewSettings {
    /// Percentage of edges shown, heaviest first
    #[serde(default = "default_resolution")]
    pub resolution: u8,
}

fn default_resolution() -> u8 {
    VIEW_RESOLUTION_PERCENT_DEFAULT
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            resolution: default_resolution(),
        }
    }
}

impl ViewSettings {
    fn validate(&self) -> Result<()> {
        if self.resolution > VIEW_RESOLUTION_PERCENT_MAX {
            return Err(Error::invalid_configuration(
                "view.resolution",
                format!(
                    "{} exceeds limit {}",
                    self.resolution, VIEW_RESOLUTION_PERCENT_MAX
                ),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppflowConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.break_span().num_seconds(), BREAK_SPAN_SECS_DEFAULT);
    }

    #[test]
    fn test_parse_full_config() {
        let config = AppflowConfig::parse(
            r#"
            log_file = "phone.jsonl"
            break_span_secs = 300

            [simulation]
            walk_steps_max = 50
            parallel = false

            [view]
            resolution = 80
            "#,
        )
        .unwrap();

        assert_eq!(config.log_file, PathBuf::from("phone.jsonl"));
        assert_eq!(config.break_span_secs, 300);
        assert_eq!(config.simulation.walk_steps_max, 50);
        assert!(!config.simulation.parallel);
        assert_eq!(config.view.resolution, 80);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppflowConfig::parse("").unwrap();
        assert_eq!(config.break_span_secs, BREAK_SPAN_SECS_DEFAULT);
        assert_eq!(
            config.simulation.walk_steps_max,
            SIMULATION_WALK_STEPS_MAX_DEFAULT
        );
    }

    #[test]
    fn test_invalid_break_span() {
        let mut config = AppflowConfig::default();
        config.break_span_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_invalid_walk_steps() {
        let mut config = AppflowConfig::default();
        config.simulation.walk_steps_max = SIMULATION_WALK_STEPS_MAX + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_resolution() {
        let result = AppflowConfig::parse("[view]\nresolution = 150\n");
        assert!(matches!(result, Err(Error::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_malformed_toml() {
        let result = AppflowConfig::parse("break_span_secs = \"ten\"");
        assert!(matches!(result, Err(Error::ConfigParseFailed { .. })));
    }

    #[test]
    fn test_parse_seed() {
        assert_eq!(parse_seed("42").unwrap(), 42);
        assert_eq!(parse_seed(" 7\n").unwrap(), 7);

        for bad in ["abc", "-1", "", "1.5"] {
            match parse_seed(bad) {
                Err(Error::InvalidConfiguration { field, .. }) => {
                    assert_eq!(field, SIMULATION_SEED_ENV)
                }
                other => panic!("expected invalid seed for {:?}, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "break_span_secs = 42").unwrap();
        let config = AppflowConfig::load(file.path()).unwrap();
        assert_eq!(config.break_span_secs, 42);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppflowConfig::load(dir.path().join("appflow.toml"));
        assert!(matches!(result, Err(Error::ConfigReadFailed { .. })));
    }
}
