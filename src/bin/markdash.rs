use clap::Parser;
use markdash::analysis::{Comparison, OfferingSummary, compare, trend};
use markdash::config::{CliConfig, Config};
use markdash::core::constants::output_formats;
use markdash::core::{MarkTable, MarkdashError};
use markdash::discovery::{expand_paths, inspect_folder};
use markdash::marks::{Source, load_sources};
use markdash::reporting::export::{ExportData, ExportFormat, export_results};
use markdash::reporting::logging;
use markdash::reporting::{DashboardData, HtmlDashboard};
use markdash::ui::completion::{install_completion, write_completions};
use markdash::ui::output;
use markdash::ui::{Cli, Commands, ProgressReporter, cli_to_config};

use std::path::Path;

type AppResult<T> = Result<T, Box<dyn std::error::Error>>;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Handle completion commands first
    if let Some(exit_code) = handle_completion_commands(&cli) {
        std::process::exit(exit_code);
    }

    match run_markdash(&cli).await {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Handle completion commands and return exit code if a completion command was processed
pub fn handle_completion_commands(cli: &Cli) -> Option<i32> {
    match cli.command {
        Commands::CompletionGenerate { shell } => {
            write_completions(shell, &mut std::io::stdout());
            Some(0)
        }
        Commands::CompletionInstall { shell } => match install_completion(shell) {
            Ok(message) => {
                println!("{message}");
                Some(0)
            }
            Err(e) => {
                eprintln!("Error: {e}");
                Some(1)
            }
        },
        _ => None,
    }
}

/// Run the selected subcommand and return the process exit code
pub async fn run_markdash(cli: &Cli) -> AppResult<i32> {
    let cli_config = cli_to_config(cli);
    let config = load_and_merge_config(&cli_config)?;

    let settings = setup_output_settings(&cli_config, &config);
    logging::init_logger(settings.verbose, settings.quiet);
    logging::log_config_info(&config);

    // Reject an unusable export target before any work is done
    if let Some(ref export_path) = config.export_path {
        ExportFormat::from_path(Path::new(export_path))?;
    }

    match cli.command {
        Commands::Inspect { ref folder } => run_inspect(folder, &settings),
        Commands::Summary {
            ref inputs,
            recursive,
            ..
        } => run_summary(inputs, recursive, &config, &settings).await,
        Commands::Compare {
            ref first,
            ref second,
        } => run_compare(first, second, &config, &settings).await,
        Commands::CompletionGenerate { .. } | Commands::CompletionInstall { .. } => Ok(0),
    }
}

/// Load configuration from file or standard locations and merge with CLI config
pub fn load_and_merge_config(cli_config: &CliConfig) -> AppResult<Config> {
    let mut config = if cli_config.no_config {
        Config::default()
    } else if let Some(ref config_file) = cli_config.config_file {
        Config::load_from_file(config_file).inspect_err(|e| {
            logging::log_error(
                &format!("Could not load config file '{config_file}'"),
                Some(e),
            );
        })?
    } else {
        Config::load_from_standard_locations()
    };

    // Merge CLI arguments with configuration (CLI takes precedence)
    config.merge_with_cli(cli_config);
    config.validate()?;
    Ok(config)
}

/// Settings for output formatting and display
pub struct OutputSettings {
    pub quiet: bool,
    pub verbose: bool,
    pub output_format: String,
    pub show_progress: bool,
    pub max_rows: usize,
}

impl OutputSettings {
    pub fn is_text(&self) -> bool {
        self.output_format == output_formats::TEXT
    }

    pub fn should_show_info(&self) -> bool {
        !self.quiet && self.is_text()
    }
}

/// Setup output settings based on CLI and config
pub fn setup_output_settings(cli_config: &CliConfig, config: &Config) -> OutputSettings {
    let quiet = cli_config.quiet;

    OutputSettings {
        quiet,
        verbose: config.verbose.unwrap_or(false),
        output_format: config.output_format().to_string(),
        show_progress: !quiet && !cli_config.no_progress,
        max_rows: config
            .max_rows_displayed
            .unwrap_or(markdash::core::constants::display::DEFAULT_MAX_ROWS),
    }
}

fn run_inspect(folder: &str, settings: &OutputSettings) -> AppResult<i32> {
    let report = inspect_folder(Path::new(folder));
    print!(
        "{}",
        output::render_folder_report(&report, &settings.output_format)?
    );

    if report.is_usable() {
        Ok(0)
    } else {
        Ok(1)
    }
}

/// Turn command-line inputs into sources, expanding local directories
pub fn collect_sources(inputs: &[String], recursive: bool, config: &Config) -> AppResult<Vec<Source>> {
    let file_types = config.file_types_as_set();
    let mut sources = Vec::new();

    for input in inputs {
        match Source::parse(input) {
            Source::Remote(url) => sources.push(Source::Remote(url)),
            Source::Local(path) => {
                if !path.exists() {
                    let error = MarkdashError::FileNotFound(path.display().to_string());
                    logging::log_error("Input is missing", Some(&error));
                    return Err(error.into());
                }
                let expanded = expand_paths(vec![path.as_path()], recursive, file_types.as_ref())
                    .inspect_err(|e| logging::log_error("Could not expand input paths", Some(e)))?;
                sources.extend(expanded.into_iter().map(Source::Local));
            }
        }
    }

    if sources.is_empty() {
        return Err(MarkdashError::InvalidArgument("No mark files found to load".to_string()).into());
    }
    Ok(sources)
}

/// Load tables, showing a progress bar when several are loaded in text mode
async fn load_tables(
    sources: &[Source],
    config: &Config,
    settings: &OutputSettings,
) -> AppResult<Vec<MarkTable>> {
    let inputs: Vec<String> = sources.iter().map(Source::to_string).collect();
    logging::log_input_info(&inputs);

    let mut progress = ProgressReporter::new(
        settings.show_progress && settings.is_text() && sources.len() > 1,
    );
    progress.start_loading(sources.len());

    let result = load_sources(
        sources,
        &config.table_options(),
        config.timeout_duration(),
        Some(&progress),
    )
    .await;
    progress.finish_loading();

    let tables = result?;
    for table in &tables {
        logging::log_table_loaded(table);
    }
    Ok(tables)
}

async fn run_summary(
    inputs: &[String],
    recursive: bool,
    config: &Config,
    settings: &OutputSettings,
) -> AppResult<i32> {
    let sources = collect_sources(inputs, recursive, config)?;
    let tables = load_tables(&sources, config, settings).await?;

    let summaries = trend(tables.iter().map(OfferingSummary::from_table).collect());
    logging::log_summaries(&summaries);

    print!(
        "{}",
        output::render_summaries(&summaries, &settings.output_format)?
    );

    write_reports(
        config,
        settings,
        ExportData::Offerings(&summaries),
        || DashboardData::for_offerings(&summaries, generated_at()),
    )?;
    Ok(0)
}

async fn run_compare(
    first: &str,
    second: &str,
    config: &Config,
    settings: &OutputSettings,
) -> AppResult<i32> {
    let mut sources = Vec::with_capacity(2);
    for input in [first, second] {
        let source = Source::parse(input);
        if let Source::Local(ref path) = source {
            if !path.exists() {
                return Err(MarkdashError::FileNotFound(path.display().to_string()).into());
            }
            if path.is_dir() {
                return Err(MarkdashError::InvalidArgument(format!(
                    "'{}' is a directory; compare takes two mark files",
                    path.display()
                ))
                .into());
            }
        }
        sources.push(source);
    }

    let tables = load_tables(&sources, config, settings).await?;
    let [a, b] = tables.as_slice() else {
        return Err(MarkdashError::InvalidArgument(format!(
            "Expected two tables, loaded {}",
            tables.len()
        ))
        .into());
    };

    let comparison: Comparison = compare(a, b);
    logging::log_comparison(&comparison);

    print!(
        "{}",
        output::render_comparison(&comparison, &settings.output_format, settings.max_rows)?
    );

    write_reports(
        config,
        settings,
        ExportData::Comparison(&comparison),
        || DashboardData::for_comparison(&comparison, generated_at()),
    )?;
    Ok(0)
}

fn generated_at() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%d %H:%M:%S UTC")
        .to_string()
}

/// Write the export file and HTML dashboard when configured
fn write_reports<F>(
    config: &Config,
    settings: &OutputSettings,
    data: ExportData<'_>,
    dashboard: F,
) -> AppResult<()>
where
    F: FnOnce() -> DashboardData,
{
    if let Some(ref export_path) = config.export_path {
        let path = Path::new(export_path);
        export_results(data, path)
            .inspect_err(|e| logging::log_error("Could not export results", Some(e)))?;
        logging::log_report_written("Export", path);
        if settings.should_show_info() {
            println!("💾 Results exported: {export_path}");
        }
    }

    if let Some(ref dashboard_path) = config.html_dashboard_path {
        match HtmlDashboard::generate_dashboard(&dashboard(), dashboard_path) {
            Ok(()) => {
                logging::log_report_written("HTML dashboard", Path::new(dashboard_path));
                if settings.should_show_info() {
                    println!("📊 HTML dashboard generated: {dashboard_path}");
                }
            }
            Err(e) => eprintln!("Warning: Failed to generate HTML dashboard: {e}"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn cli_config() -> CliConfig {
        CliConfig {
            no_config: true,
            ..CliConfig::default()
        }
    }

    #[test]
    fn test_handle_completion_commands_none() {
        let cli = Cli::parse_from(["markdash", "inspect", "."]);
        assert_eq!(handle_completion_commands(&cli), None);
    }

    #[test]
    fn test_load_and_merge_config_rejects_invalid_timeout() {
        let mut cli = cli_config();
        cli.timeout = Some(0);
        assert!(load_and_merge_config(&cli).is_err());
    }

    #[test]
    fn test_setup_output_settings() {
        let mut cli = cli_config();
        cli.quiet = true;
        cli.output_format = Some("json".to_string());
        let config = load_and_merge_config(&cli).unwrap();

        let settings = setup_output_settings(&cli, &config);
        assert!(settings.quiet);
        assert!(!settings.show_progress);
        assert!(!settings.is_text());
        assert!(!settings.should_show_info());
        assert_eq!(settings.max_rows, 50);
    }

    #[test]
    fn test_collect_sources_expands_directories() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("2020.csv"), "").unwrap();
        fs::write(dir.path().join("2019.csv"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        let config = Config::default();

        let inputs = vec![
            dir.path().to_string_lossy().to_string(),
            "https://example.com/2021.csv".to_string(),
        ];
        let sources = collect_sources(&inputs, true, &config).unwrap();

        assert_eq!(sources.len(), 3);
        assert_eq!(sources[0], Source::Local(dir.path().join("2019.csv")));
        assert_eq!(sources[1], Source::Local(dir.path().join("2020.csv")));
        assert!(sources[2].is_remote());
    }

    #[test]
    fn test_collect_sources_missing_file() {
        let config = Config::default();
        let err = collect_sources(&["does-not-exist.csv".to_string()], false, &config).unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }

    #[test]
    fn test_collect_sources_nothing_to_load() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        let config = Config::default();

        let inputs = vec![dir.path().to_string_lossy().to_string()];
        assert!(collect_sources(&inputs, true, &config).is_err());
    }
}
