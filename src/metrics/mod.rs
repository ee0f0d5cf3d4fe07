//! Prometheus metrics for the generator.
//!
//! # Metrics Exposed
//!
//! ## Entropy Consumption
//! - `unbiased_csprng_entropy_draws_total` - Requests made to the entropy source
//! - `unbiased_csprng_entropy_bytes_total` - Bytes read from the entropy source
//! - `unbiased_csprng_values_total` - Bounded values produced
//! - `unbiased_csprng_rejection_ratio` - Fraction of draws discarded
//!
//! ## Uniformity Check
//! - `unbiased_csprng_uniformity_status` - Latest result (1=uniform, 0=failed)
//! - `unbiased_csprng_chi_squared` - Chi-squared statistic
//! - `unbiased_csprng_chi_squared_critical` - Critical value applied
//! - `unbiased_csprng_max_relative_deviation` - Worst per-outcome deviation
//!
//! # Example
//!
//! ```
//! use unbiased_csprng::metrics::{MetricsRegistry, MetricsSnapshot};
//!
//! let registry = MetricsRegistry::new().expect("Failed to create registry");
//!
//! let snapshot = MetricsSnapshot {
//!     entropy_draws: 1200,
//!     entropy_bytes: 4800,
//!     values: 1000,
//!     is_uniform: true,
//!     chi_squared: Some(4.2),
//!     chi_squared_critical: Some(20.75),
//!     max_relative_deviation: Some(0.02),
//! };
//!
//! registry.update(&snapshot);
//! assert!(registry.encode().unwrap().contains("unbiased_csprng_values_total 1000"));
//! ```

mod collector;

pub use collector::{MetricsError, MetricsRegistry, MetricsSnapshot};
