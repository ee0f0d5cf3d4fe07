//! Unbiased bounded random integers from a secure source.
//!
//! Produces a uniformly distributed integer in `[0, max]` using rejection
//! sampling over samples from a cryptographically secure entropy source,
//! so no value is favoured when `max + 1` does not divide the sample
//! space.
//!
//! # Architecture
//!
//! ```text
//! source (OsRng / any CryptoRng) → bounded (rejection sampling) → value
//!                                         ↓
//!                          analysis (uniformity self-check) → metrics
//! ```
//!
//! # Design Principles
//!
//! - **No modulo bias**: samples in the top partial range are discarded
//! - **No iteration cap**: the rejection loop runs until acceptance
//! - **Secure sources only**: the `CryptoRng` bound rules out weak generators
//! - **Errors, not sentinels**: invalid bounds and source failures are
//!   distinct `Result` errors; a `-1` sentinel form exists for callers
//!   that want it
//!
//! # Example
//!
//! ```
//! use unbiased_csprng::{RandomError, SecureRandom};
//!
//! let mut rng = SecureRandom::from_os_entropy();
//!
//! let die = rng.generate(5).unwrap() + 1;
//! assert!((1..=6).contains(&die));
//!
//! assert!(matches!(rng.generate(-1), Err(RandomError::InvalidBound { .. })));
//! assert_eq!(rng.generate_or_sentinel(1 << 31).unwrap(), -1);
//!
//! let byte = rng.up_to(200u8).unwrap();
//! assert!(byte <= 200);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod analysis;
pub mod bounded;
pub mod config;
pub mod metrics;
pub mod source;

// Re-export commonly used types at crate root
pub use analysis::{UniformityCheck, UniformityReport, UniformityThresholds};
pub use bounded::{
    generate, secure_random, validate_bound, BoundedWord, RandomError, SecureRandom,
    INVALID_BOUND_SENTINEL, MAX_BOUND,
};
pub use config::{FileConfig, GeneratorConfig};
pub use source::{CountingRng, EntropyError, OsRng};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
