// Command-line interface definitions and parsing for markdash

use crate::config::CliConfig;
use crate::core::constants::output_formats;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub options: GlobalOptions,
}

#[derive(Args, Debug, Default)]
pub struct GlobalOptions {
    // Table Layout
    /// Column holding the student identifier (default: "Student ID")
    #[arg(long, global = true, value_name = "NAME", help_heading = "Table Layout")]
    pub id_column: Option<String>,

    /// Column holding the final mark, e.g. "78 DN" (default: "Final Mark")
    #[arg(long, global = true, value_name = "NAME", help_heading = "Table Layout")]
    pub mark_column: Option<String>,

    /// Metadata rows to drop after the header (default: 1)
    #[arg(long, global = true, value_name = "COUNT", help_heading = "Table Layout")]
    pub skip_rows: Option<usize>,

    /// Derive missing grades from the mark band
    #[arg(long, global = true, help_heading = "Table Layout")]
    pub infer_grades: bool,

    // Sources
    /// Timeout for remote sources in seconds (default: 30)
    #[arg(
        short = 't',
        long,
        global = true,
        value_name = "SECONDS",
        help_heading = "Sources"
    )]
    pub timeout: Option<u64>,

    // Output & Verbosity
    /// Suppress progress and informational output
    #[arg(short = 'q', long, global = true, help_heading = "Output & Verbosity")]
    pub quiet: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long, global = true, help_heading = "Output & Verbosity")]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, value_name = "FORMAT", value_parser = output_formats::ALL, help_heading = "Output & Verbosity")]
    pub format: Option<String>,

    /// Disable progress bars
    #[arg(long, global = true, help_heading = "Output & Verbosity")]
    pub no_progress: bool,

    /// Compared students listed in text output (default: 50)
    #[arg(long, global = true, value_name = "COUNT", help_heading = "Output & Verbosity")]
    pub max_rows: Option<usize>,

    // Reports
    /// Export results to a .csv, .json or .md file
    #[arg(long, global = true, value_name = "PATH", help_heading = "Reports")]
    pub export: Option<String>,

    /// Generate HTML dashboard report
    #[arg(long, global = true, value_name = "PATH", help_heading = "Reports")]
    pub html_dashboard: Option<String>,

    // Configuration
    /// Use specific config file
    #[arg(long, global = true, value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Ignore config files
    #[arg(long, global = true, help_heading = "Configuration")]
    pub no_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that a folder of mark exports exists and list what it holds
    Inspect {
        /// Folder to check
        folder: String,
    },
    /// Summarize marks and grade distribution per offering
    Summary {
        /// Mark files, directories or http(s) URLs
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Recursively process directories
        #[arg(short = 'r', long)]
        recursive: bool,

        /// File extensions to load from directories (default: csv)
        #[arg(long, value_name = "EXTENSIONS")]
        include: Option<String>,
    },
    /// Compare the students two offerings have in common
    Compare {
        /// First offering (file or http(s) URL)
        first: String,

        /// Second offering (file or http(s) URL)
        second: String,
    },
    /// Generate shell completions
    #[command(name = "completion-generate", arg_required_else_help = true)]
    CompletionGenerate {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Install shell completions to standard location
    #[command(name = "completion-install", arg_required_else_help = true)]
    CompletionInstall {
        /// The shell to install completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Split a comma separated list, dropping blank items
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Convert parsed CLI arguments into the `CliConfig` merged over the config file
pub fn cli_to_config(cli: &Cli) -> CliConfig {
    let options = &cli.options;

    let file_types = match cli.command {
        Commands::Summary {
            include: Some(ref include),
            ..
        } => Some(split_list(include)),
        _ => None,
    };

    CliConfig {
        id_column: options.id_column.clone(),
        mark_column: options.mark_column.clone(),
        skip_rows: options.skip_rows,
        infer_grades: options.infer_grades,
        file_types,
        timeout: options.timeout,
        quiet: options.quiet,
        verbose: options.verbose,
        output_format: options.format.clone(),
        no_progress: options.no_progress,
        max_rows_displayed: options.max_rows,
        config_file: options.config.clone(),
        no_config: options.no_config,
        export_path: options.export.clone(),
        html_dashboard_path: options.html_dashboard.clone(),
    }
}
