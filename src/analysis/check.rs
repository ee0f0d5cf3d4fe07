//! Uniformity self-check.
//!
//! Calls the generator repeatedly for one bound, tallies the results and
//! judges the histogram against [`UniformityThresholds`]. Values are not
//! kept, only counted.

use std::fmt;

use rand_core::{CryptoRng, RngCore};
use thiserror::Error;

use super::{
    statistics::UniformityStatistics,
    threshold::{UniformityThresholds, UniformityViolation},
};
use crate::bounded::{RandomError, SecureRandom};

/// Largest histogram the check will allocate (one bucket per outcome).
pub const MAX_CHECK_OUTCOMES: usize = 1 << 20;

/// Errors that prevent the check from producing a report.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("bound {bound} needs {outcomes} histogram buckets, limit is {limit}")]
    TooManyOutcomes {
        bound: u32,
        outcomes: usize,
        limit: usize,
    },
    #[error("uniformity check needs at least one draw")]
    NoDraws,
    #[error(transparent)]
    Random(#[from] RandomError),
}

/// Outcome of one uniformity check.
#[derive(Debug, Clone)]
pub struct UniformityReport {
    /// Inclusive bound that was sampled.
    pub bound: u32,
    /// Histogram statistics.
    pub statistics: UniformityStatistics,
    /// Chi-squared cutoff that was applied.
    pub critical_value: f64,
    /// First failed threshold, if any.
    pub violation: Option<UniformityViolation>,
}

impl UniformityReport {
    /// Returns true if every threshold passed.
    pub fn is_uniform(&self) -> bool {
        self.violation.is_none()
    }
}

impl fmt::Display for UniformityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = &self.statistics;
        writeln!(f, "bound:              {}", self.bound)?;
        writeln!(f, "draws:              {}", stats.draws)?;
        writeln!(f, "expected/outcome:   {:.2}", stats.expected)?;
        writeln!(
            f,
            "chi-squared:        {:.4} (critical {:.4}, {} df)",
            stats.chi_squared, self.critical_value, stats.degrees_of_freedom
        )?;
        writeln!(
            f,
            "max deviation:      {:.4} (outcome {})",
            stats.max_relative_deviation, stats.worst_outcome
        )?;
        match &self.violation {
            None => write!(f, "result:             uniform"),
            Some(violation) => write!(f, "result:             FAILED: {}", violation),
        }
    }
}

/// Runs uniformity checks with fixed thresholds.
#[derive(Debug, Clone, Default)]
pub struct UniformityCheck {
    thresholds: UniformityThresholds,
}

impl UniformityCheck {
    /// Creates a check with the given thresholds.
    pub fn new(thresholds: UniformityThresholds) -> Self {
        Self { thresholds }
    }

    /// Returns the thresholds in use.
    pub fn thresholds(&self) -> &UniformityThresholds {
        &self.thresholds
    }

    /// Calls `generator.generate(bound)` `draws` times and judges the tally.
    pub fn run<R>(
        &self,
        generator: &mut SecureRandom<R>,
        bound: u32,
        draws: u64,
    ) -> Result<UniformityReport, AnalysisError>
    where
        R: RngCore + CryptoRng,
    {
        let outcomes = bound as usize + 1;
        if outcomes > MAX_CHECK_OUTCOMES {
            return Err(AnalysisError::TooManyOutcomes {
                bound,
                outcomes,
                limit: MAX_CHECK_OUTCOMES,
            });
        }
        if draws == 0 {
            return Err(AnalysisError::NoDraws);
        }

        tracing::debug!(bound, draws, "Starting uniformity check");

        let mut counts = vec![0u64; outcomes];
        for _ in 0..draws {
            let value = generator.generate(i64::from(bound))?;
            counts[value as usize] += 1;
        }

        Ok(self.evaluate(bound, counts))
    }

    /// Judges an existing histogram for `bound`.
    pub fn evaluate(&self, bound: u32, counts: Vec<u64>) -> UniformityReport {
        let statistics = UniformityStatistics::from_counts(counts);
        let critical_value = statistics.critical_value(self.thresholds.z_score);
        let violation = self.thresholds.check(&statistics).err();

        match &violation {
            None => tracing::info!(
                bound,
                draws = statistics.draws,
                chi_squared = statistics.chi_squared,
                critical_value,
                "Uniformity check passed"
            ),
            Some(violation) => tracing::warn!(
                bound,
                draws = statistics.draws,
                violation = %violation,
                "Uniformity check failed"
            ),
        }

        UniformityReport {
            bound,
            statistics,
            critical_value,
            violation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::testing::FailingRng;
    use crate::source::CountingRng;
    use rand_chacha::ChaCha20Rng;
    use rand_core::SeedableRng;

    fn seeded(seed: u64) -> SecureRandom<ChaCha20Rng> {
        SecureRandom::new(ChaCha20Rng::seed_from_u64(seed))
    }

    #[test]
    fn test_six_outcomes_uniform() {
        let check = UniformityCheck::new(UniformityThresholds::permissive());
        let report = check.run(&mut seeded(1), 5, 600_000).unwrap();

        assert_eq!(report.statistics.outcomes(), 6);
        assert_eq!(report.statistics.draws, 600_000);
        assert!(report.is_uniform(), "{report}");
    }

    #[test]
    fn test_non_power_of_two_byte_range_uniform() {
        let check = UniformityCheck::new(UniformityThresholds::permissive());
        let report = check.run(&mut seeded(2), 200, 200_000).unwrap();

        assert!(report.is_uniform(), "{report}");
    }

    #[test]
    fn test_zero_bound_single_outcome() {
        let report = UniformityCheck::default()
            .run(&mut seeded(3), 0, 100)
            .unwrap();

        assert_eq!(report.statistics.counts, vec![100]);
        assert_eq!(report.critical_value, 0.0);
        assert!(report.is_uniform());
    }

    #[test]
    fn test_each_call_counted_once_on_fast_path() {
        let mut generator = SecureRandom::new(CountingRng::new(ChaCha20Rng::seed_from_u64(4)));
        UniformityCheck::default()
            .run(&mut generator, 7, 1_000)
            .unwrap();

        assert_eq!(generator.source().draws(), 1_000);
    }

    #[test]
    fn test_insufficient_draws_reported() {
        let report = UniformityCheck::default()
            .run(&mut seeded(5), 99, 100)
            .unwrap();

        assert!(matches!(
            report.violation,
            Some(UniformityViolation::InsufficientSamples { .. })
        ));
    }

    #[test]
    fn test_oversized_bound_rejected() {
        let result = UniformityCheck::default().run(&mut seeded(6), u32::MAX >> 1, 10);
        assert!(matches!(result, Err(AnalysisError::TooManyOutcomes { .. })));
    }

    #[test]
    fn test_zero_draws_rejected() {
        let result = UniformityCheck::default().run(&mut seeded(7), 5, 0);
        assert!(matches!(result, Err(AnalysisError::NoDraws)));
    }

    #[test]
    fn test_entropy_failure_aborts_check() {
        let mut generator = SecureRandom::new(FailingRng);
        let result = UniformityCheck::default().run(&mut generator, 5, 10);

        assert!(matches!(
            result,
            Err(AnalysisError::Random(RandomError::Entropy(_)))
        ));
    }

    #[test]
    fn test_report_display() {
        let report = UniformityCheck::default().evaluate(1, vec![50, 50]);
        let text = report.to_string();

        assert!(text.contains("draws:              100"));
        assert!(text.ends_with("uniform"));
    }
}
