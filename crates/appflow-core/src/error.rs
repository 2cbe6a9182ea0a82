//! Error types for Appflow
//!
//! TigerStyle: Explicit error types with context, using thiserror.
//!
//! Unknown states and unreachable targets are not errors: the simulator
//! reports them as an empty result.

use thiserror::Error;

/// Result type alias for Appflow operations
pub type Result<T> = std::result::Result<T, Error>;

/// Appflow error types
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Request Errors
    // =========================================================================
    #[error("Invalid trial count: {value:?}, reason: {reason}")]
    InvalidTrialCount { value: String, reason: String },

    #[error("Invalid exploration factor: {value}, must lie in [0, 1]")]
    InvalidExploration { value: f64 },

    #[error("Invalid resolution: {value}, must lie in [0, {max}]")]
    InvalidResolution { value: u8, max: u8 },

    #[error("Unknown app: {app}")]
    UnknownApp { app: String },

    // =========================================================================
    // Event Log Errors
    // =========================================================================
    #[error("Log read failed: {path}, reason: {reason}")]
    LogReadFailed { path: String, reason: String },

    #[error("Log parse failed at line {line}: {reason}")]
    LogParseFailed { line: usize, reason: String },

    #[error("Invalid event: {reason}")]
    InvalidEvent { reason: String },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Config read failed: {path}, reason: {reason}")]
    ConfigReadFailed { path: String, reason: String },

    #[error("Config parse failed: {path}, reason: {reason}")]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid configuration: {field}, reason: {reason}")]
    InvalidConfiguration { field: String, reason: String },

    // =========================================================================
    // Internal Errors
    // =========================================================================
    #[error("Internal error: {reason}")]
    Internal { reason: String },
}

impl Error {
    /// Create an invalid trial count error
    pub fn invalid_trial_count(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTrialCount {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_configuration(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid event error
    pub fn invalid_event(reason: impl Into<String>) -> Self {
        Self::InvalidEvent {
            reason: reason.into(),
        }
    }

    /// Create an internal error
    pub fn internal(reason: impl Into<String>) -> Self {
        Self::Internal {
            reason: reason.into(),
        }
    }
}
