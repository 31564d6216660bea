//! User interface and interaction
//!
//! CLI parsing, terminal rendering, progress reporting and shell completion.

pub mod cli;
pub mod color;
pub mod completion;
pub mod output;
pub mod progress;

// Re-export commonly used items
pub use cli::{Cli, Commands, cli_to_config};
pub use completion::{install_completion, write_completions};
pub use output::{render_comparison, render_folder_report, render_summaries};
pub use progress::ProgressReporter;
