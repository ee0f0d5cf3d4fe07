//! Secure entropy sources.
//!
//! The generator never talks to the operating system directly. It draws
//! from any source implementing [`rand_core::RngCore`] and
//! [`rand_core::CryptoRng`]; the `CryptoRng` bound keeps non-cryptographic
//! generators out at compile time. Production wiring uses [`OsRng`].

mod counting;
mod draw;
#[cfg(test)]
pub(crate) mod testing;

pub use counting::CountingRng;
pub use draw::EntropyError;
pub use rand_core::OsRng;

pub(crate) use draw::draw_bytes;
