//! Unbiased bounded integer generation.
//!
//! [`SecureRandom::generate`] is the core primitive: a uniform integer in
//! `[0, bound]` for `bound` up to `2^31 - 1`. [`SecureRandom::up_to`] is
//! the same rejection sampler over full-width `u8`/`u16`/`u32`/`u64`.

mod generator;
mod word;

pub use generator::{
    generate, secure_random, validate_bound, RandomError, SecureRandom, INVALID_BOUND_SENTINEL,
    MAX_BOUND,
};
pub use word::BoundedWord;
