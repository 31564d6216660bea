//! Mark file discovery
//!
//! This module checks input folders and expands directories into the
//! mark files they contain.

pub mod inspect;
pub mod path_utils;

// Re-export commonly used items
pub use inspect::{FolderEntry, FolderReport, inspect_folder};
pub use path_utils::expand_paths;
