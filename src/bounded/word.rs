//! Unbiased sampling over fixed-width unsigned words.
//!
//! Both the 31-bit generator and the per-width variants reduce to one
//! routine: draw a word, clip it to a ceiling, and reject anything at or
//! above the largest multiple of the range that fits under the ceiling.

use std::fmt;
use std::ops::{BitAnd, Rem, Sub};

use rand_core::RngCore;

use crate::source::{draw_bytes, EntropyError};

mod sealed {
    pub trait Sealed {}
}

/// Unsigned word widths the generator can sample directly.
///
/// Implemented for `u8`, `u16`, `u32` and `u64`. Sealed.
pub trait BoundedWord:
    Copy
    + Ord
    + fmt::Debug
    + fmt::Display
    + BitAnd<Output = Self>
    + Rem<Output = Self>
    + Sub<Output = Self>
    + sealed::Sealed
{
    /// Zero.
    const ZERO: Self;
    /// Largest value of the word.
    const MAX: Self;

    /// `self + 1`, wrapping to zero at `MAX`.
    #[doc(hidden)]
    fn wrapping_succ(self) -> Self;

    /// Draws one word from the source in a single request.
    #[doc(hidden)]
    fn draw<R: RngCore + ?Sized>(rng: &mut R) -> Result<Self, EntropyError>;
}

macro_rules! impl_bounded_word {
    ($($t:ty),+) => {$(
        impl sealed::Sealed for $t {}

        impl BoundedWord for $t {
            const ZERO: Self = 0;
            const MAX: Self = <$t>::MAX;

            #[inline]
            fn wrapping_succ(self) -> Self {
                self.wrapping_add(1)
            }

            #[inline]
            fn draw<R: RngCore + ?Sized>(rng: &mut R) -> Result<Self, EntropyError> {
                draw_bytes(rng).map(<$t>::from_le_bytes)
            }
        }
    )+};
}

impl_bounded_word!(u8, u16, u32, u64);

/// Returns true when `max + 1` is a power of two (all low bits set),
/// counting `MAX` whose successor wraps to zero.
#[inline]
pub(crate) fn is_low_mask<T: BoundedWord>(max: T) -> bool {
    (max.wrapping_succ() & max) == T::ZERO
}

/// Samples uniformly from `[0, max]`.
///
/// `ceiling` is the largest sample kept after masking (`T::MAX` for the
/// full-width variants, `0x7fff_ffff` for the 31-bit generator) and must
/// be all ones in its low bits with `max <= ceiling`. The loop has no
/// iteration cap; `warn_after` only controls a diagnostic.
pub(crate) fn sample_up_to<T, R>(
    rng: &mut R,
    max: T,
    ceiling: T,
    warn_after: u32,
) -> Result<T, EntropyError>
where
    T: BoundedWord,
    R: RngCore + ?Sized,
{
    debug_assert!(max <= ceiling);

    if is_low_mask(max) {
        return Ok(T::draw(rng)? & max);
    }

    // Not a power-of-two range, so `max < ceiling` and `max + 1` cannot wrap.
    let range = max.wrapping_succ();
    let skip = ceiling - ceiling % range;

    let mut attempts: u32 = 0;
    loop {
        let sample = T::draw(rng)? & ceiling;
        attempts = attempts.saturating_add(1);

        if sample < skip {
            if attempts > 1 {
                tracing::trace!(%max, attempts, "Rejection sampling accepted after retries");
            }
            return Ok(sample % range);
        }

        if warn_after != 0 && attempts == warn_after {
            tracing::warn!(
                %max,
                attempts,
                "Implausible run of rejected samples; entropy source may be degraded"
            );
        }
    }
}
