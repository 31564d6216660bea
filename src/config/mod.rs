//! Configuration management
//!
//! This module handles loading and managing configuration from
//! TOML files and CLI arguments.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::constants::{columns, display, files, output_formats, timeouts};
use crate::core::error::{MarkdashError, Result};
use crate::marks::TableOptions;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Column holding the student identifier
    pub id_column: Option<String>,

    /// Column holding the composite final mark
    pub mark_column: Option<String>,

    /// Metadata rows to drop after the header
    pub skip_rows: Option<usize>,

    /// Derive a missing grade from the mark band
    pub infer_grades: Option<bool>,

    /// File extensions to load from directories
    pub file_types: Option<Vec<String>>,

    /// Timeout in seconds for remote sources
    pub timeout: Option<u64>,

    /// Output format (text, json, minimal)
    pub output_format: Option<String>,

    /// Enable verbose logging
    pub verbose: Option<bool>,

    /// Export results to this path (.csv, .json or .md)
    pub export_path: Option<String>,

    /// Generate HTML dashboard report
    pub html_dashboard_path: Option<String>,

    /// Compared students listed in text output
    pub max_rows_displayed: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            id_column: Some(columns::DEFAULT_ID_COLUMN.to_string()),
            mark_column: Some(columns::DEFAULT_MARK_COLUMN.to_string()),
            skip_rows: Some(columns::DEFAULT_SKIP_ROWS),
            infer_grades: Some(false),
            file_types: Some(
                files::TABLE_EXTENSIONS
                    .iter()
                    .map(|ext| ext.to_string())
                    .collect(),
            ),
            timeout: Some(timeouts::DEFAULT_TIMEOUT_SECONDS),
            output_format: Some(output_formats::DEFAULT.to_string()),
            verbose: Some(false),
            export_path: None,
            html_dashboard_path: None,
            max_rows_displayed: Some(display::DEFAULT_MAX_ROWS),
        }
    }
}

impl Config {
    /// Load configuration from file. Fields left out of the file keep their defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            MarkdashError::Config(format!(
                "Could not read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let loaded: Config =
            toml::from_str(&content).map_err(|source| MarkdashError::TomlParsing {
                path: path.display().to_string(),
                source,
            })?;

        let mut config = Config::default();
        config.overlay(loaded);
        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Find a config file in `dir` or up to three of its parents, falling back to defaults
    pub fn load_from_standard_locations_in(dir: &Path) -> Self {
        let mut candidate: Option<PathBuf> = Some(dir.to_path_buf());

        for _ in 0..=files::CONFIG_SEARCH_DEPTH {
            let Some(current) = candidate else {
                break;
            };
            let path = current.join(files::CONFIG_FILE_NAME);
            if path.is_file() {
                match Self::load_from_file(&path) {
                    Ok(config) => return config,
                    Err(e) => warn!("Ignoring config file {}: {}", path.display(), e),
                }
            }
            candidate = current.parent().map(Path::to_path_buf);
        }

        Self::default()
    }

    /// Find a config file from the current directory upwards
    pub fn load_from_standard_locations() -> Self {
        match std::env::current_dir() {
            Ok(dir) => Self::load_from_standard_locations_in(&dir),
            Err(_) => Self::default(),
        }
    }

    /// Replace fields with the ones set in `other`
    fn overlay(&mut self, other: Config) {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if other.$field.is_some() { self.$field = other.$field; })*
            };
        }
        take!(
            id_column,
            mark_column,
            skip_rows,
            infer_grades,
            file_types,
            timeout,
            output_format,
            verbose,
            export_path,
            html_dashboard_path,
            max_rows_displayed
        );
    }

    /// Merge this config with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli_config: &CliConfig) {
        // Table layout
        if let Some(ref id_column) = cli_config.id_column {
            self.id_column = Some(id_column.clone());
        }
        if let Some(ref mark_column) = cli_config.mark_column {
            self.mark_column = Some(mark_column.clone());
        }
        if let Some(skip_rows) = cli_config.skip_rows {
            self.skip_rows = Some(skip_rows);
        }
        if cli_config.infer_grades {
            self.infer_grades = Some(true);
        }

        // Inputs
        if let Some(ref file_types) = cli_config.file_types {
            self.file_types = Some(file_types.clone());
        }
        if let Some(timeout) = cli_config.timeout {
            self.timeout = Some(timeout);
        }

        // Output & format
        if cli_config.verbose {
            self.verbose = Some(true);
        }
        if let Some(ref output_format) = cli_config.output_format {
            self.output_format = Some(output_format.clone());
        }
        if let Some(max_rows) = cli_config.max_rows_displayed {
            self.max_rows_displayed = Some(max_rows);
        }

        // Reports
        if let Some(ref export_path) = cli_config.export_path {
            self.export_path = Some(export_path.clone());
        }
        if let Some(ref dashboard_path) = cli_config.html_dashboard_path {
            self.html_dashboard_path = Some(dashboard_path.clone());
        }
    }

    /// Convert file_types to a lowercased HashSet for path expansion
    pub fn file_types_as_set(&self) -> Option<HashSet<String>> {
        self.file_types.as_ref().map(|types| {
            types
                .iter()
                .map(|t| t.trim().trim_start_matches('.').to_ascii_lowercase())
                .collect()
        })
    }

    /// Get timeout as Duration
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout.unwrap_or(timeouts::DEFAULT_TIMEOUT_SECONDS))
    }

    /// Options for turning raw exports into tables
    pub fn table_options(&self) -> TableOptions {
        let defaults = TableOptions::default();
        TableOptions {
            id_column: self.id_column.clone().unwrap_or(defaults.id_column),
            mark_column: self.mark_column.clone().unwrap_or(defaults.mark_column),
            skip_rows: self.skip_rows.unwrap_or(defaults.skip_rows),
            infer_grades: self.infer_grades.unwrap_or(defaults.infer_grades),
        }
    }

    pub fn output_format(&self) -> &str {
        self.output_format
            .as_deref()
            .unwrap_or(output_formats::DEFAULT)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err(MarkdashError::Config(
                    "Timeout cannot be 0. Expected a positive integer representing seconds."
                        .to_string(),
                ));
            }
            if timeout > timeouts::MAX_TIMEOUT_SECONDS {
                return Err(MarkdashError::Config(format!(
                    "Timeout of {timeout} seconds is too large. Expected at most {} seconds.",
                    timeouts::MAX_TIMEOUT_SECONDS
                )));
            }
        }

        for (name, value) in [
            ("id_column", &self.id_column),
            ("mark_column", &self.mark_column),
        ] {
            if let Some(column) = value
                && column.trim().is_empty()
            {
                return Err(MarkdashError::Config(format!(
                    "{name} cannot be empty. Expected a column header name."
                )));
            }
        }

        if let Some(skip_rows) = self.skip_rows
            && skip_rows > columns::MAX_SKIP_ROWS
        {
            return Err(MarkdashError::Config(format!(
                "skip_rows of {skip_rows} is too large. Expected at most {}.",
                columns::MAX_SKIP_ROWS
            )));
        }

        if let Some(ref format) = self.output_format
            && !output_formats::ALL.contains(&format.as_str())
        {
            return Err(MarkdashError::Config(format!(
                "Invalid output format '{format}'. Expected one of: {}.",
                output_formats::ALL.join(", ")
            )));
        }

        Ok(())
    }
}

/// Configuration options that can come from CLI
#[derive(Debug, Default)]
pub struct CliConfig {
    // Table layout
    pub id_column: Option<String>,   // --id-column
    pub mark_column: Option<String>, // --mark-column
    pub skip_rows: Option<usize>,    // --skip-rows
    pub infer_grades: bool,          // --infer-grades

    // Inputs
    pub file_types: Option<Vec<String>>, // --include
    pub timeout: Option<u64>,            // --timeout

    // Output & format
    pub quiet: bool,                       // --quiet
    pub verbose: bool,                     // --verbose
    pub output_format: Option<String>,     // --format
    pub no_progress: bool,                 // --no-progress
    pub max_rows_displayed: Option<usize>, // --max-rows

    // Configuration
    pub config_file: Option<String>, // --config
    pub no_config: bool,             // --no-config

    // Reports
    pub export_path: Option<String>,         // --export
    pub html_dashboard_path: Option<String>, // --html-dashboard
}
