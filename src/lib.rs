//! markdash compares student-mark exports across course offerings.
//!
//! A mark export is a CSV with a student identifier column and a combined
//! "final mark" column such as `"78 DN"`. The crate parses those exports into
//! [`MarkTable`]s, summarizes each offering and joins two offerings on the
//! student identifier.
//!
//! ```
//! use markdash::Grade;
//! use markdash::marks::parse_final_mark;
//!
//! let mark = parse_final_mark("78 DN");
//! assert_eq!(mark.mark, Some(78.0));
//! assert_eq!(mark.grade, Some(Grade::DN));
//! ```

pub mod analysis;
pub mod config;
pub mod core;
pub mod discovery;
pub mod marks;
pub mod reporting;
pub mod ui;

pub use analysis::{Comparison, OfferingSummary, Summary, compare, describe};
pub use config::{CliConfig, Config};
pub use crate::core::{FinalMark, Grade, MarkdashError, MarkTable, Result, StudentRecord};
pub use marks::{Source, TableOptions};
