//! Draw-counting wrapper around a secure source.
//!
//! Passes every request straight through to the wrapped source and
//! keeps totals for diagnostics and metrics. Output is untouched, so a
//! wrapped `CryptoRng` stays a `CryptoRng`.

use rand_core::{CryptoRng, RngCore};

/// A transparent `RngCore` adapter that counts what it forwards.
///
/// One *draw* is one request to the underlying source, whatever its
/// width. The bounded generator issues exactly one request per sample,
/// so `draws()` is the number of samples consumed.
#[derive(Debug, Default)]
pub struct CountingRng<R> {
    /// The wrapped source.
    inner: R,
    /// Requests forwarded.
    draws: u64,
    /// Bytes forwarded.
    bytes: u64,
}

impl<R: RngCore + CryptoRng> CountingRng<R> {
    /// Wraps a secure source with zeroed counters.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            draws: 0,
            bytes: 0,
        }
    }

    /// Returns the number of requests forwarded.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Returns the number of bytes forwarded.
    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    /// Zeroes both counters.
    pub fn reset(&mut self) {
        self.draws = 0;
        self.bytes = 0;
    }

    /// Returns the wrapped source.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn record(&mut self, len: usize) {
        self.draws += 1;
        self.bytes += len as u64;
    }
}

impl<R: RngCore + CryptoRng> RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.record(4);
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.record(8);
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.record(dest.len());
        self.inner.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.record(dest.len());
        self.inner.try_fill_bytes(dest)
    }
}

impl<R: RngCore + CryptoRng> CryptoRng for CountingRng<R> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::testing::{FailingRng, ScriptedRng};
    use rand_core::OsRng;

    #[test]
    fn test_counts_requests_and_bytes() {
        let mut rng = CountingRng::new(OsRng);

        let mut buf = [0u8; 100];
        rng.fill_bytes(&mut buf);
        rng.next_u32();

        assert_eq!(rng.draws(), 2);
        assert_eq!(rng.bytes(), 104);
    }

    #[test]
    fn test_output_passes_through() {
        let mut rng = CountingRng::new(ScriptedRng::new([0xDEAD_BEEF]));
        assert_eq!(rng.next_u32(), 0xDEAD_BEEF);
        assert_eq!(rng.into_inner().remaining(), 0);
    }

    #[test]
    fn test_failed_request_still_counted() {
        let mut rng = CountingRng::new(FailingRng);
        let mut buf = [0u8; 4];

        assert!(rng.try_fill_bytes(&mut buf).is_err());
        assert_eq!(rng.draws(), 1);
    }

    #[test]
    fn test_reset_zeroes_counters() {
        let mut rng = CountingRng::new(OsRng);
        rng.next_u64();
        rng.reset();

        assert_eq!(rng.draws(), 0);
        assert_eq!(rng.bytes(), 0);
    }
}
