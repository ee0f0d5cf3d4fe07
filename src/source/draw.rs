//! Raw fixed-width draws.

use rand_core::RngCore;
use thiserror::Error;

/// Errors raised by the underlying entropy source.
///
/// There is no fallback: a failed draw is reported to the caller and
/// never replaced with output from a weaker generator.
#[derive(Debug, Error)]
pub enum EntropyError {
    /// The platform source could not produce random bytes.
    #[error("secure entropy source failed: {0}")]
    SourceFailed(#[from] rand_core::Error),
}

/// Fills a fresh `N`-byte buffer with a single request to the source.
#[inline]
pub(crate) fn draw_bytes<const N: usize, R>(rng: &mut R) -> Result<[u8; N], EntropyError>
where
    R: RngCore + ?Sized,
{
    let mut buf = [0u8; N];
    rng.try_fill_bytes(&mut buf)?;
    Ok(buf)
}
