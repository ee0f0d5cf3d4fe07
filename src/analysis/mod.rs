//! Uniformity testing.
//!
//! Statistical self-checks for the bounded generator. These are sanity
//! checks for gross bias, not cryptographic proofs.

mod check;
mod statistics;
mod threshold;

pub use check::{AnalysisError, UniformityCheck, UniformityReport, MAX_CHECK_OUTCOMES};
pub use statistics::{critical_value, UniformityStatistics};
pub use threshold::{UniformityThresholds, UniformityViolation};
