//! Mark table loading
//!
//! This module turns LMS grade exports (local CSV files or remote
//! downloads) into normalized `MarkTable`s.

pub mod parser;
pub mod source;
pub mod table;

// Re-export commonly used items
pub use parser::{normalize_header, normalize_id, parse_final_mark};
pub use source::{FetchCsv, HttpFetcher, Source, load_sources, load_sources_with};
pub use table::{TableOptions, load_table};
