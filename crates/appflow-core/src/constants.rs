//! TigerStyle constants for Appflow
//!
//! All limits are explicit, use big-endian naming (most significant first),
//! and include units in the name.

// =============================================================================
// Event Log Limits
// =============================================================================

/// Maximum length of an app identifier in bytes
pub const APP_ID_LENGTH_BYTES_MAX: usize = 512;

/// Maximum length of a single log line in bytes (64 KB)
pub const LOG_LINE_SIZE_BYTES_MAX: usize = 64 * 1024;

/// Default gap that splits the event stream into sessions (10 min)
pub const BREAK_SPAN_SECS_DEFAULT: i64 = 10 * 60;

/// Maximum session break span (7 days)
pub const BREAK_SPAN_SECS_MAX: i64 = 7 * 24 * 60 * 60;

/// Hours in the usage histogram
pub const USAGE_HOURS_COUNT: usize = 24;

// =============================================================================
// Simulation Limits
// =============================================================================

/// Maximum number of trials in a single simulation batch
pub const SIMULATION_TRIALS_COUNT_MAX: u64 = 10_000_000;

/// Default number of trials used by front ends
pub const SIMULATION_TRIALS_COUNT_DEFAULT: u64 = 1000;

/// Default exploration factor used by front ends
pub const SIMULATION_EXPLORATION_DEFAULT: f64 = 0.1;

/// Default bound on transitions per walk
///
/// Realistic usage paths are a few dozen hops; the bound only has to stop
/// walks that circle forever.
pub const SIMULATION_WALK_STEPS_MAX_DEFAULT: usize = 1000;

/// Hard upper bound on transitions per walk
pub const SIMULATION_WALK_STEPS_MAX: usize = 100_000;

/// Environment variable that pins the simulation seed
pub const SIMULATION_SEED_ENV: &str = "APPFLOW_SEED";

// =============================================================================
// View Limits
// =============================================================================

/// Default share of DFG edges shown, in percent
pub const VIEW_RESOLUTION_PERCENT_DEFAULT: u8 = 60;

/// Maximum DFG resolution, in percent
pub const VIEW_RESOLUTION_PERCENT_MAX: u8 = 100;

/// Separator used when a path is rendered as text
pub const PATH_SEPARATOR: &str = " -> ";

// Compile-time assertions for constant validity
const _: () = {
    assert!(BREAK_SPAN_SECS_DEFAULT > 0);
    assert!(BREAK_SPAN_SECS_DEFAULT <= BREAK_SPAN_SECS_MAX);
    assert!(SIMULATION_WALK_STEPS_MAX_DEFAULT <= SIMULATION_WALK_STEPS_MAX);
    assert!(SIMULATION_TRIALS_COUNT_DEFAULT <= SIMULATION_TRIALS_COUNT_MAX);
    assert!(VIEW_RESOLUTION_PERCENT_DEFAULT <= VIEW_RESOLUTION_PERCENT_MAX);
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exploration_default_is_probability() {
        assert!((0.0..=1.0).contains(&SIMULATION_EXPLORATION_DEFAULT));
    }

    #[test]
    fn test_limits_have_units_in_names() {
        // All byte limits end in _BYTES_, time limits carry _SECS_,
        // count limits carry _COUNT_
        let _: usize = APP_ID_LENGTH_BYTES_MAX;
        let _: i64 = BREAK_SPAN_SECS_MAX;
        let _: u64 = SIMULATION_TRIALS_COUNT_MAX;
    }
}
