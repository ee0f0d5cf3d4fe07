//! Bounded secure random generator.
//!
//! Produces a uniformly distributed integer in `[0, bound]` for any
//! `bound` in `[0, 2^31 - 1]`, with no modulo bias.
//!
//! # Algorithm
//!
//! - If `bound + 1` is a power of two, one 32-bit sample masked with
//!   `bound` is already uniform. Exactly one draw.
//! - Otherwise samples are masked to 31 bits and rejected unless they
//!   fall below `skip = 0x7fff_ffff - 0x7fff_ffff % (bound + 1)`, the
//!   largest multiple of the range that fits. The accepted sample is
//!   reduced modulo `bound + 1`.
//!
//! Each draw is rejected with probability below one half, so the
//! expected number of draws is at most two. There is no iteration cap.

use rand_core::{CryptoRng, OsRng, RngCore};
use thiserror::Error;

use super::word::{sample_up_to, BoundedWord};
use crate::config::GeneratorConfig;
use crate::source::EntropyError;

/// Largest accepted bound, `2^31 - 1`.
pub const MAX_BOUND: u32 = 0x7fff_ffff;

/// Value returned by the sentinel API for an out-of-range bound.
pub const INVALID_BOUND_SENTINEL: i64 = -1;

/// Errors that can occur while generating a bounded value.
#[derive(Debug, Error)]
pub enum RandomError {
    #[error("bound {bound} outside valid range 0..=2147483647")]
    InvalidBound { bound: i64 },
    #[error(transparent)]
    Entropy(#[from] EntropyError),
}

/// Checks that `bound` lies in `[0, MAX_BOUND]`.
///
/// Never touches the entropy source.
pub fn validate_bound(bound: i64) -> Result<u32, RandomError> {
    u32::try_from(bound)
        .ok()
        .filter(|&b| b <= MAX_BOUND)
        .ok_or(RandomError::InvalidBound { bound })
}

/// Unbiased bounded generator over an injected secure source.
///
/// The source must be a [`CryptoRng`]. Use [`SecureRandom::from_os_entropy`]
/// in production; anything else is for tests and instrumentation.
///
/// The generator holds no state between calls besides the source itself.
#[derive(Debug)]
pub struct SecureRandom<R> {
    /// Secure entropy source.
    rng: R,
    /// Diagnostic settings.
    config: GeneratorConfig,
}

impl SecureRandom<OsRng> {
    /// Creates a generator backed by the operating system CSPRNG.
    pub fn from_os_entropy() -> Self {
        Self::new(OsRng)
    }
}

impl<R: RngCore + CryptoRng> SecureRandom<R> {
    /// Creates a generator over `rng` with default diagnostics.
    pub fn new(rng: R) -> Self {
        Self::with_config(rng, GeneratorConfig::default())
    }

    /// Creates a generator with explicit diagnostic settings.
    pub fn with_config(rng: R, config: GeneratorConfig) -> Self {
        Self { rng, config }
    }

    /// Returns a uniform value in `[0, bound]`.
    ///
    /// Fails with [`RandomError::InvalidBound`] when `bound` is negative or
    /// above [`MAX_BOUND`]; no entropy is consumed in that case. A failing
    /// source surfaces as [`RandomError::Entropy`].
    pub fn generate(&mut self, bound: i64) -> Result<u32, RandomError> {
        let max = validate_bound(bound)?;
        let value = sample_up_to(
            &mut self.rng,
            max,
            MAX_BOUND,
            self.config.rejection_warn_threshold,
        )?;
        Ok(value)
    }

    /// Like [`generate`](Self::generate), but reports an invalid bound as
    /// [`INVALID_BOUND_SENTINEL`] (`-1`).
    ///
    /// A source failure is still an `Err`; it is never folded into `-1`.
    pub fn generate_or_sentinel(&mut self, bound: i64) -> Result<i64, EntropyError> {
        match self.generate(bound) {
            Ok(value) => Ok(i64::from(value)),
            Err(RandomError::InvalidBound { bound }) => {
                tracing::debug!(bound, "Invalid bound, returning sentinel");
                Ok(INVALID_BOUND_SENTINEL)
            }
            Err(RandomError::Entropy(e)) => Err(e),
        }
    }

    /// Returns a uniform value in `[0, max]` for a fixed-width word.
    ///
    /// Every `max` is valid, including `T::MAX` (a full-width draw).
    pub fn up_to<T: BoundedWord>(&mut self, max: T) -> Result<T, EntropyError> {
        sample_up_to(
            &mut self.rng,
            max,
            T::MAX,
            self.config.rejection_warn_threshold,
        )
    }

    /// Returns the diagnostic settings.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Returns the underlying source.
    pub fn source(&self) -> &R {
        &self.rng
    }

    /// Consumes the generator and returns its source.
    pub fn into_inner(self) -> R {
        self.rng
    }
}

/// Returns a uniform value in `[0, bound]` from the OS CSPRNG.
pub fn generate(bound: i64) -> Result<u32, RandomError> {
    SecureRandom::from_os_entropy().generate(bound)
}

/// Returns a uniform value in `[0, bound]` from the OS CSPRNG, or `-1`
/// when `bound` is outside `[0, 2^31 - 1]`.
pub fn secure_random(bound: i64) -> Result<i64, EntropyError> {
    SecureRandom::from_os_entropy().generate_or_sentinel(bound)
}
