//! Simulator statistics normalization for single-path equivalence checking.
//!
//! The cycle-accurate simulator prints a verbose profiling report on its
//! diagnostic stream. Most of it is noise for equivalence purposes; this crate
//! reduces a report to its canonical form:
//! - **Fetch counts:** per-instruction fetches, summed over both issue slots
//! - **Cycle count:** total cycles of the run
//! - **Call counts:** per-function invocation counts
//!
//! Two runs of single-path code are equivalent iff their canonical forms are
//! textually identical.

pub mod canonical;
pub mod diff;
pub mod error;
pub mod normalize;

pub use canonical::{CanonicalStats, StatEntry};
pub use diff::unified_diff;
pub use error::{Result, StatsError};
pub use normalize::normalize;
