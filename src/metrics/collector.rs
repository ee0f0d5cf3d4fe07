//! Metrics collection and registry.

use prometheus::{Encoder, Gauge, IntCounter, IntGauge, Registry, TextEncoder};
use rand_core::{CryptoRng, RngCore};
use thiserror::Error;

use crate::analysis::UniformityReport;
use crate::source::CountingRng;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// A snapshot of generator state for metrics update.
#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    /// Requests made to the entropy source.
    pub entropy_draws: u64,
    /// Bytes read from the entropy source.
    pub entropy_bytes: u64,
    /// Bounded values produced.
    pub values: u64,
    /// Whether the latest uniformity check passed.
    pub is_uniform: bool,
    /// Chi-squared statistic from the latest check.
    pub chi_squared: Option<f64>,
    /// Critical value applied in the latest check.
    pub chi_squared_critical: Option<f64>,
    /// Largest per-outcome relative deviation in the latest check.
    pub max_relative_deviation: Option<f64>,
}

impl MetricsSnapshot {
    /// Builds a snapshot from a check report and the counting source it ran on.
    pub fn from_components<R: RngCore + CryptoRng>(
        report: &UniformityReport,
        rng: &CountingRng<R>,
    ) -> Self {
        let stats = &report.statistics;
        Self {
            entropy_draws: rng.draws(),
            entropy_bytes: rng.bytes(),
            values: stats.draws,
            is_uniform: report.is_uniform(),
            chi_squared: Some(stats.chi_squared),
            chi_squared_critical: Some(report.critical_value),
            max_relative_deviation: Some(stats.max_relative_deviation),
        }
    }

    /// Fraction of entropy draws that were rejected.
    pub fn rejection_ratio(&self) -> f64 {
        if self.entropy_draws == 0 {
            return 0.0;
        }
        let rejected = self.entropy_draws.saturating_sub(self.values);
        rejected as f64 / self.entropy_draws as f64
    }
}

/// Prometheus metrics registry for the generator.
pub struct MetricsRegistry {
    registry: Registry,

    // Entropy consumption
    entropy_draws_total: IntCounter,
    entropy_bytes_total: IntCounter,
    values_total: IntCounter,
    rejection_ratio: Gauge,

    // Uniformity check
    uniformity_status: IntGauge,
    chi_squared: Gauge,
    chi_squared_critical: Gauge,
    max_relative_deviation: Gauge,
}

impl MetricsRegistry {
    /// Creates a new registry with all generator metrics registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let entropy_draws_total = IntCounter::new(
            "unbiased_csprng_entropy_draws_total",
            "Total requests made to the secure entropy source",
        )?;
        let entropy_bytes_total = IntCounter::new(
            "unbiased_csprng_entropy_bytes_total",
            "Total bytes read from the secure entropy source",
        )?;
        let values_total = IntCounter::new(
            "unbiased_csprng_values_total",
            "Total bounded values produced",
        )?;
        let rejection_ratio = Gauge::new(
            "unbiased_csprng_rejection_ratio",
            "Fraction of entropy draws discarded by rejection sampling",
        )?;

        let uniformity_status = IntGauge::new(
            "unbiased_csprng_uniformity_status",
            "Latest uniformity check result (1=uniform, 0=failed)",
        )?;
        let chi_squared = Gauge::new(
            "unbiased_csprng_chi_squared",
            "Chi-squared statistic from the latest uniformity check",
        )?;
        let chi_squared_critical = Gauge::new(
            "unbiased_csprng_chi_squared_critical",
            "Chi-squared critical value applied in the latest uniformity check",
        )?;
        let max_relative_deviation = Gauge::new(
            "unbiased_csprng_max_relative_deviation",
            "Largest per-outcome relative deviation in the latest uniformity check",
        )?;

        registry.register(Box::new(entropy_draws_total.clone()))?;
        registry.register(Box::new(entropy_bytes_total.clone()))?;
        registry.register(Box::new(values_total.clone()))?;
        registry.register(Box::new(rejection_ratio.clone()))?;
        registry.register(Box::new(uniformity_status.clone()))?;
        registry.register(Box::new(chi_squared.clone()))?;
        registry.register(Box::new(chi_squared_critical.clone()))?;
        registry.register(Box::new(max_relative_deviation.clone()))?;

        Ok(Self {
            registry,
            entropy_draws_total,
            entropy_bytes_total,
            values_total,
            rejection_ratio,
            uniformity_status,
            chi_squared,
            chi_squared_critical,
            max_relative_deviation,
        })
    }

    /// Updates all metrics from a snapshot.
    pub fn update(&self, snapshot: &MetricsSnapshot) {
        // Counters only move forward; add the difference
        advance(&self.entropy_draws_total, snapshot.entropy_draws);
        advance(&self.entropy_bytes_total, snapshot.entropy_bytes);
        advance(&self.values_total, snapshot.values);
        self.rejection_ratio.set(snapshot.rejection_ratio());

        self.uniformity_status
            .set(if snapshot.is_uniform { 1 } else { 0 });
        if let Some(chi) = snapshot.chi_squared {
            self.chi_squared.set(chi);
        }
        if let Some(critical) = snapshot.chi_squared_critical {
            self.chi_squared_critical.set(critical);
        }
        if let Some(deviation) = snapshot.max_relative_deviation {
            self.max_relative_deviation.set(deviation);
        }
    }

    /// Returns the underlying Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

fn advance(counter: &IntCounter, total: u64) {
    let current = counter.get();
    if total > current {
        counter.inc_by(total - current);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::UniformityCheck;
    use crate::bounded::SecureRandom;
    use rand_chacha::ChaCha20Rng;
    use rand_core::SeedableRng;

    #[test]
    fn test_registry_creation() {
        assert!(MetricsRegistry::new().is_ok());
    }

    #[test]
    fn test_metrics_update() {
        let registry = MetricsRegistry::new().unwrap();

        let snapshot = MetricsSnapshot {
            entropy_draws: 200,
            entropy_bytes: 800,
            values: 150,
            is_uniform: true,
            chi_squared: Some(3.5),
            chi_squared_critical: Some(20.75),
            max_relative_deviation: Some(0.01),
        };
        registry.update(&snapshot);

        let output = registry.encode().unwrap();
        assert!(output.contains("unbiased_csprng_entropy_draws_total 200"));
        assert!(output.contains("unbiased_csprng_values_total 150"));
        assert!(output.contains("unbiased_csprng_rejection_ratio 0.25"));
        assert!(output.contains("unbiased_csprng_uniformity_status 1"));
    }

    #[test]
    fn test_counters_never_go_backwards() {
        let registry = MetricsRegistry::new().unwrap();
        registry.update(&MetricsSnapshot {
            entropy_draws: 10,
            ..Default::default()
        });
        registry.update(&MetricsSnapshot {
            entropy_draws: 4,
            ..Default::default()
        });

        let output = registry.encode().unwrap();
        assert!(output.contains("unbiased_csprng_entropy_draws_total 10"));
    }

    #[test]
    fn test_snapshot_from_check() {
        let mut generator = SecureRandom::new(CountingRng::new(ChaCha20Rng::seed_from_u64(9)));
        let report = UniformityCheck::default()
            .run(&mut generator, 3, 1_000)
            .unwrap();

        let snapshot = MetricsSnapshot::from_components(&report, generator.source());

        assert_eq!(snapshot.values, 1_000);
        // bound 3 is a power-of-two range: one 4-byte draw per value
        assert_eq!(snapshot.entropy_draws, 1_000);
        assert_eq!(snapshot.entropy_bytes, 4_000);
        assert_eq!(snapshot.rejection_ratio(), 0.0);
    }
}
