use crate::analysis::{Comparison, OfferingSummary};
use crate::config::Config;
use crate::core::types::MarkTable;
use log::{LevelFilter, debug, error, info, warn};
use std::path::Path;

/// Level forced by the CLI flags, `None` when `RUST_LOG` should decide
fn level_override(verbose: bool, quiet: bool, env_configured: bool) -> Option<LevelFilter> {
    if quiet {
        Some(LevelFilter::Off)
    } else if verbose {
        Some(LevelFilter::Debug)
    } else if env_configured {
        None
    } else {
        Some(LevelFilter::Off)
    }
}

/// Initialize the logger with appropriate level based on verbosity
pub fn init_logger(verbose: bool, quiet: bool) {
    let env_configured = std::env::var_os("RUST_LOG").is_some();
    let mut builder = env_logger::Builder::from_default_env();

    if let Some(level) = level_override(verbose, quiet, env_configured) {
        builder.filter_level(level);
    }

    // A second initialization (tests, embedding) keeps the first logger
    if builder
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .try_init()
        .is_ok()
    {
        debug!("Logger initialized (verbose={verbose}, quiet={quiet})");
    }
}

/// Log the effective configuration
pub fn log_config_info(config: &Config) {
    let options = config.table_options();
    info!(
        "Columns: id='{}', mark='{}', skip_rows={}, infer_grades={}",
        options.id_column, options.mark_column, options.skip_rows, options.infer_grades
    );
    info!(
        "Output: format={}, timeout={}s",
        config.output_format(),
        config.timeout_duration().as_secs()
    );
    if let Some(ref types) = config.file_types {
        debug!("Directory extensions: {}", types.join(", "));
    }
}

/// Log the inputs about to be loaded
pub fn log_input_info<S: AsRef<str>>(inputs: &[S]) {
    info!("Loading {} mark table(s)", inputs.len());
    for (i, input) in inputs.iter().enumerate() {
        debug!("  {}. {}", i + 1, input.as_ref());
    }
}

/// Log a table once it has been parsed
pub fn log_table_loaded(table: &MarkTable) {
    info!(
        "Loaded '{}': {} students, {} blank rows skipped",
        table.label,
        table.len(),
        table.skipped_rows
    );
    debug!("  columns: {}", table.columns.join(", "));
}

/// Log the outcome of the summary analysis
pub fn log_summaries(summaries: &[OfferingSummary]) {
    for summary in summaries {
        info!(
            "Offering '{}': {} marks, {} graded",
            summary.label, summary.marks.count, summary.distribution.graded
        );
        if !summary.distribution.unrecognized.is_empty() {
            warn!(
                "Offering '{}' has unrecognized grade tokens: {}",
                summary.label,
                summary.distribution.unrecognized.join(", ")
            );
        }
    }
}

/// Log the outcome of a comparison
pub fn log_comparison(comparison: &Comparison) {
    info!(
        "Compared '{}' and '{}': {} common, {} only in first, {} only in second",
        comparison.label_a,
        comparison.label_b,
        comparison.common_ids.len(),
        comparison.only_in_a.len(),
        comparison.only_in_b.len()
    );
    if comparison.common_ids.is_empty() {
        warn!("No common students between the two offerings");
    }
}

/// Log a written report file
pub fn log_report_written(kind: &str, path: &Path) {
    info!("{kind} written to {}", path.display());
}

/// Log error information
pub fn log_error(message: &str, source: Option<&dyn std::error::Error>) {
    match source {
        Some(err) => error!("{message}: {err}"),
        None => error!("{message}"),
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use crate::analysis::compare;
    use crate::marks::TableOptions;

    fn sample_table(label: &str) -> MarkTable {
        let options = TableOptions {
            skip_rows: 0,
            ..TableOptions::default()
        };
        MarkTable::from_reader(
            "Student ID,Final Mark\n1,70 CR\n2,12 XX\n".as_bytes(),
            label,
            label,
            &options,
        )
        .unwrap()
    }

    #[test]
    fn test_level_override__quiet_wins() {
        assert_eq!(level_override(true, true, true), Some(LevelFilter::Off));
        assert_eq!(level_override(false, true, false), Some(LevelFilter::Off));
    }

    #[test]
    fn test_level_override__verbose_is_debug() {
        assert_eq!(level_override(true, false, false), Some(LevelFilter::Debug));
        assert_eq!(level_override(true, false, true), Some(LevelFilter::Debug));
    }

    #[test]
    fn test_level_override__defers_to_rust_log() {
        assert_eq!(level_override(false, false, true), None);
        assert_eq!(level_override(false, false, false), Some(LevelFilter::Off));
    }

    #[test]
    fn test_init_logger__twice_does_not_panic() {
        init_logger(true, false);
        init_logger(false, true);
    }

    #[test]
    fn test_log_helpers__do_not_panic() {
        let a = sample_table("2019");
        let b = sample_table("2020");

        log_config_info(&Config::default());
        log_input_info(&["a.csv", "https://example.com/b.csv"]);
        log_input_info::<&str>(&[]);
        log_table_loaded(&a);
        log_summaries(&[OfferingSummary::from_table(&a)]);
        log_comparison(&compare(&a, &b));
        log_report_written("Export", Path::new("out.json"));
        log_error("failed", Some(&std::io::Error::other("boom")));
        log_error("failed", None);
    }
}
