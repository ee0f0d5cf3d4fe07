//! Pass/fail thresholds for the uniformity check.

use super::statistics::UniformityStatistics;
use crate::config::ConfigError;
use serde::{Deserialize, Serialize};

/// Thresholds applied to [`UniformityStatistics`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UniformityThresholds {
    /// One-sided normal quantile for the chi-squared cutoff.
    pub z_score: f64,
    /// Minimum expected observations per outcome for the test to mean anything.
    pub min_expected_per_outcome: f64,
    /// Maximum relative deviation of any single outcome.
    pub max_relative_deviation: f64,
}

impl Default for UniformityThresholds {
    fn default() -> Self {
        Self {
            z_score: 3.0902, // alpha = 0.001
            min_expected_per_outcome: 5.0,
            max_relative_deviation: 0.1,
        }
    }
}

impl UniformityThresholds {
    /// Stricter thresholds: flags more, false alarms more often.
    pub fn conservative() -> Self {
        Self {
            z_score: 2.3263, // alpha = 0.01
            min_expected_per_outcome: 10.0,
            max_relative_deviation: 0.05,
        }
    }

    /// Looser thresholds (for testing).
    pub fn permissive() -> Self {
        Self {
            z_score: 4.7534, // alpha = 1e-6
            min_expected_per_outcome: 5.0,
            max_relative_deviation: 0.25,
        }
    }

    /// Validates threshold values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.z_score.is_finite() && self.z_score > 0.0) {
            return Err(ConfigError::InvalidThreshold("z_score must be positive"));
        }
        if !(self.min_expected_per_outcome > 0.0) {
            return Err(ConfigError::InvalidThreshold(
                "min_expected_per_outcome must be positive",
            ));
        }
        if !(self.max_relative_deviation > 0.0) {
            return Err(ConfigError::InvalidThreshold(
                "max_relative_deviation must be positive",
            ));
        }
        Ok(())
    }

    /// Checks statistics against thresholds.
    pub fn check(&self, stats: &UniformityStatistics) -> Result<(), UniformityViolation> {
        if stats.expected < self.min_expected_per_outcome {
            return Err(UniformityViolation::InsufficientSamples {
                expected: stats.expected,
                required: self.min_expected_per_outcome,
            });
        }

        let critical = stats.critical_value(self.z_score);
        if stats.chi_squared > critical {
            return Err(UniformityViolation::ChiSquaredExceeded {
                observed: stats.chi_squared,
                critical,
                degrees_of_freedom: stats.degrees_of_freedom,
            });
        }

        if stats.max_relative_deviation > self.max_relative_deviation {
            return Err(UniformityViolation::OutcomeDeviation {
                outcome: stats.worst_outcome,
                observed: stats.max_relative_deviation,
                threshold: self.max_relative_deviation,
            });
        }

        Ok(())
    }
}

/// Threshold violation types.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UniformityViolation {
    #[error("{expected:.2} expected observations per outcome, need {required:.2}")]
    InsufficientSamples { expected: f64, required: f64 },

    #[error("chi-squared {observed:.2} exceeds critical value {critical:.2} ({degrees_of_freedom} df)")]
    ChiSquaredExceeded {
        observed: f64,
        critical: f64,
        degrees_of_freedom: usize,
    },

    #[error("outcome {outcome} deviates {observed:.4} from expectation, threshold {threshold:.4}")]
    OutcomeDeviation {
        outcome: usize,
        observed: f64,
        threshold: f64,
    },
}
