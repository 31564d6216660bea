//! Mark analysis
//!
//! Descriptive statistics, grade distributions, per-offering summaries
//! and the ID join used to compare two offerings.

pub mod compare;
pub mod distribution;
pub mod offering;
pub mod stats;

// Re-export commonly used items
pub use compare::{ComparedStudent, Comparison, TransitionMatrix, compare};
pub use distribution::{GradeDistribution, GradeShare};
pub use offering::{OfferingSummary, natural_cmp, trend};
pub use stats::{Summary, describe};
