//! Simulation requests
//!
//! TigerStyle: Requests are validated before any simulation work begins.

use appflow_core::{Error, Result, SIMULATION_TRIALS_COUNT_MAX};
use serde::{Deserialize, Serialize};

/// A validated path-confidence query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    /// App the walks start from
    pub start: String,
    /// App the walks try to reach
    pub end: String,
    /// Number of independent walks
    pub trials: u64,
    /// Probability of ignoring observed frequencies at each step
    pub exploration: f64,
}

impl SimulationRequest {
    /// Create and validate a request
    pub fn new(
        start: impl Into<String>,
        end: impl Into<String>,
        trials: u64,
        exploration: f64,
    ) -> Result<Self> {
        let request = Self {
            start: start.into(),
            end: end.into(),
            trials,
            exploration,
        };
        request.validate()?;
        Ok(request)
    }

    /// Create a request from a textual trial count
    ///
    /// Front ends collect the trial count as free text.
    pub fn parse(
        trials: &str,
        exploration: f64,
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Result<Self> {
        let text = trials.trim();
        let count: u64 = text
            .parse()
            .map_err(|_| Error::invalid_trial_count(text, "not a positive integer"))?;
        Self::new(start, end, count, exploration)
    }

    /// Validate the request
    pub fn validate(&self) -> Result<()> {
        if self.trials == 0 {
            return Err(Error::invalid_trial_count("0", "must be at least 1"));
        }
        if self.trials > SIMULATION_TRIALS_COUNT_MAX {
            return Err(Error::invalid_trial_count(
                self.trials.to_string(),
                format!("exceeds limit {}", SIMULATION_TRIALS_COUNT_MAX),
            ));
        }
        if !self.exploration.is_finite() || !(0.0..=1.0).contains(&self.exploration) {
            return Err(Error::InvalidExploration {
                value: self.exploration,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_request() {
        let request = SimulationRequest::parse(" 1000 ", 0.1, "a", "b").unwrap();
        assert_eq!(request.trials, 1000);
        assert_eq!(request.start, "a");
        assert_eq!(request.end, "b");
    }

    #[test]
    fn test_parse_rejects_text() {
        for bad in ["", "ten", "-5", "1.5", "0"] {
            let result = SimulationRequest::parse(bad, 0.1, "a", "b");
            assert!(
                matches!(result, Err(Error::InvalidTrialCount { .. })),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_trials_over_limit() {
        let result = SimulationRequest::new("a", "b", SIMULATION_TRIALS_COUNT_MAX + 1, 0.0);
        assert!(matches!(result, Err(Error::InvalidTrialCount { .. })));
    }

    #[test]
    fn test_exploration_bounds() {
        assert!(SimulationRequest::new("a", "b", 1, 0.0).is_ok());
        assert!(SimulationRequest::new("a", "b", 1, 1.0).is_ok());
        for bad in [-0.01, 1.01, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                SimulationRequest::new("a", "b", 1, bad),
                Err(Error::InvalidExploration { .. })
            ));
        }
    }
}
