//! Goodness-of-fit statistics for bounded output.
//!
//! These tests catch gross bias such as a forgotten rejection step. They
//! cannot prove uniformity, and passing them says nothing about
//! unpredictability.

/// Tally-based statistics for one bound.
#[derive(Debug, Clone)]
pub struct UniformityStatistics {
    /// Observations per outcome, indexed by value.
    pub counts: Vec<u64>,
    /// Total observations.
    pub draws: u64,
    /// Expected observations per outcome under uniformity.
    pub expected: f64,
    /// Pearson chi-squared statistic.
    pub chi_squared: f64,
    /// Degrees of freedom (`outcomes - 1`).
    pub degrees_of_freedom: usize,
    /// Largest `|observed - expected| / expected` over all outcomes.
    pub max_relative_deviation: f64,
    /// Outcome with the largest relative deviation.
    pub worst_outcome: usize,
}

impl UniformityStatistics {
    /// Computes statistics from a histogram of observed values.
    pub fn from_counts(counts: Vec<u64>) -> Self {
        let draws: u64 = counts.iter().sum();
        let degrees_of_freedom = counts.len().saturating_sub(1);

        if draws == 0 {
            return Self {
                counts,
                draws,
                expected: 0.0,
                chi_squared: 0.0,
                degrees_of_freedom,
                max_relative_deviation: 0.0,
                worst_outcome: 0,
            };
        }

        let expected = draws as f64 / counts.len() as f64;
        let mut chi_squared = 0.0;
        let mut max_relative_deviation = 0.0;
        let mut worst_outcome = 0;

        for (outcome, &observed) in counts.iter().enumerate() {
            let diff = observed as f64 - expected;
            chi_squared += diff * diff / expected;

            let relative = diff.abs() / expected;
            if relative > max_relative_deviation {
                max_relative_deviation = relative;
                worst_outcome = outcome;
            }
        }

        Self {
            counts,
            draws,
            expected,
            chi_squared,
            degrees_of_freedom,
            max_relative_deviation,
            worst_outcome,
        }
    }

    /// Number of distinct outcomes.
    pub fn outcomes(&self) -> usize {
        self.counts.len()
    }

    /// Chi-squared cutoff for this sample at normal quantile `z`.
    pub fn critical_value(&self, z: f64) -> f64 {
        critical_value(self.degrees_of_freedom, z)
    }
}

/// Upper chi-squared quantile via the Wilson–Hilferty approximation.
///
/// `z` is the one-sided standard normal quantile of the wanted
/// significance (3.09 for 0.001). Zero degrees of freedom gives zero.
pub fn critical_value(degrees_of_freedom: usize, z: f64) -> f64 {
    if degrees_of_freedom == 0 {
        return 0.0;
    }

    let k = degrees_of_freedom as f64;
    let h = 2.0 / (9.0 * k);
    k * (1.0 - h + z * h.sqrt()).powi(3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfectly_uniform_counts() {
        let stats = UniformityStatistics::from_counts(vec![1000; 6]);

        assert_eq!(stats.draws, 6000);
        assert_eq!(stats.degrees_of_freedom, 5);
        assert_eq!(stats.chi_squared, 0.0);
        assert_eq!(stats.max_relative_deviation, 0.0);
    }

    #[test]
    fn test_skewed_counts() {
        let stats = UniformityStatistics::from_counts(vec![150, 50]);

        // expected 100: (50^2 + 50^2) / 100
        assert!((stats.chi_squared - 50.0).abs() < 1e-9);
        assert!((stats.max_relative_deviation - 0.5).abs() < 1e-9);
        assert_eq!(stats.worst_outcome, 0);
    }

    #[test]
    fn test_empty_tally() {
        let stats = UniformityStatistics::from_counts(vec![0; 4]);
        assert_eq!(stats.draws, 0);
        assert_eq!(stats.chi_squared, 0.0);
    }

    #[test]
    fn test_critical_value_close_to_table() {
        // Table values at alpha = 0.001: df 5 -> 20.515, df 255 -> 330.52
        assert!((critical_value(5, 3.0902) - 20.515).abs() < 0.5);
        assert!((critical_value(255, 3.0902) - 330.52).abs() < 1.0);
        assert_eq!(critical_value(0, 3.0902), 0.0);
    }
}
