//! Deterministic stand-ins for the secure source, test builds only.

use std::collections::VecDeque;

use rand_core::{CryptoRng, RngCore};

/// Replays a fixed list of 32-bit samples.
///
/// Every 4-byte chunk of a fill request consumes one sample, written
/// little-endian; a shorter tail takes the sample's low bytes. Panics
/// when the script runs out, which flags an unexpected extra draw.
#[derive(Debug, Default)]
pub(crate) struct ScriptedRng {
    samples: VecDeque<u32>,
    draws: usize,
}

impl ScriptedRng {
    pub(crate) fn new(samples: impl IntoIterator<Item = u32>) -> Self {
        Self {
            samples: samples.into_iter().collect(),
            draws: 0,
        }
    }

    /// Number of fill requests served.
    pub(crate) fn draws(&self) -> usize {
        self.draws
    }

    /// Samples not consumed yet.
    pub(crate) fn remaining(&self) -> usize {
        self.samples.len()
    }
}

impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        let mut buf = [0u8; 4];
        self.fill_bytes(&mut buf);
        u32::from_le_bytes(buf)
    }

    fn next_u64(&mut self) -> u64 {
        let mut buf = [0u8; 8];
        self.fill_bytes(&mut buf);
        u64::from_le_bytes(buf)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws += 1;
        for chunk in dest.chunks_mut(4) {
            let sample = self
                .samples
                .pop_front()
                .expect("scripted entropy exhausted");
            chunk.copy_from_slice(&sample.to_le_bytes()[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl CryptoRng for ScriptedRng {}

/// A source whose every request fails, as an exhausted or missing
/// platform CSPRNG would.
#[derive(Debug, Default)]
pub(crate) struct FailingRng;

impl RngCore for FailingRng {
    fn next_u32(&mut self) -> u32 {
        panic!("entropy unavailable")
    }

    fn next_u64(&mut self) -> u64 {
        panic!("entropy unavailable")
    }

    fn fill_bytes(&mut self, _dest: &mut [u8]) {
        panic!("entropy unavailable")
    }

    fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand_core::Error> {
        Err(rand_core::Error::new("entropy unavailable"))
    }
}

impl CryptoRng for FailingRng {}
