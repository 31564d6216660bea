//! Rendering of folder reports, offering summaries and comparisons
//!
//! Every view is rendered to a `String` first so the three output formats
//! can be tested without capturing stdout.

use crate::analysis::{Comparison, GradeDistribution, OfferingSummary, Summary};
use crate::core::Result;
use crate::core::constants::{display, output_formats};
use crate::core::types::Grade;
use crate::discovery::FolderReport;
use crate::ui::color::{Colors, colorize, grade_color, heading};
use serde::Serialize;
use std::fmt::Write;

/// JSON envelope for the `summary` command
#[derive(Debug, Serialize)]
struct SummaryReport<'a> {
    offerings: &'a [OfferingSummary],
}

/// Format an optional statistic, `-` when absent
pub fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "-".to_string(),
    }
}

/// Format an optional grade, `-` when absent
pub fn format_grade(grade: Option<Grade>) -> &'static str {
    grade.map(|g| g.as_str()).unwrap_or("-")
}

/// Fixed-width text bar for a percentage
pub fn text_bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), ".".repeat(width - filled))
}

fn signed(value: Option<f64>) -> String {
    match value {
        Some(v) if v > 0.0 => format!("+{v:.2}"),
        other => format_value(other),
    }
}

// Inspect

pub fn render_folder_report(report: &FolderReport, format: &str) -> Result<String> {
    match format {
        output_formats::JSON => Ok(serde_json::to_string_pretty(report)?),
        output_formats::MINIMAL => Ok(render_folder_minimal(report)),
        _ => Ok(render_folder_text(report)),
    }
}

fn render_folder_minimal(report: &FolderReport) -> String {
    let mut out = String::new();
    let status = if report.is_usable() { "ok" } else { "unusable" };
    let _ = writeln!(out, "{status}\t{}", report.path.display());
    let _ = writeln!(out, "items\t{}", report.item_count);
    let _ = writeln!(out, "csv\t{}", report.csv_files.len());
    let _ = writeln!(out, "excel\t{}", report.excel_files.len());
    for name in &report.csv_files {
        let _ = writeln!(out, "csv_file\t{name}");
    }
    if let Some(ref suggestion) = report.suggestion {
        let _ = writeln!(out, "suggestion\t{}", suggestion.display());
    }
    out
}

fn render_folder_text(report: &FolderReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {}: {}",
        display::FOLDER_EMOJI,
        heading("Folder"),
        report.path.display()
    );

    if !report.exists {
        let _ = writeln!(
            out,
            "{} {}",
            colorize(display::ERROR_EMOJI, Colors::BRIGHT_RED),
            colorize("Folder does not exist", Colors::BRIGHT_RED)
        );
        if let Some(ref suggestion) = report.suggestion {
            let _ = writeln!(
                out,
                "{} Did you mean {}?",
                colorize(display::WARNING_EMOJI, Colors::BRIGHT_YELLOW),
                colorize(&suggestion.display().to_string(), Colors::BRIGHT_WHITE)
            );
        }
        return out;
    }

    if !report.is_dir {
        let _ = writeln!(
            out,
            "{} {}",
            colorize(display::ERROR_EMOJI, Colors::BRIGHT_RED),
            colorize("Path is not a folder", Colors::BRIGHT_RED)
        );
        return out;
    }

    if !report.readable {
        let _ = writeln!(
            out,
            "{} {}: {}",
            colorize(display::ERROR_EMOJI, Colors::BRIGHT_RED),
            colorize("Folder cannot be read", Colors::BRIGHT_RED),
            report.read_error.as_deref().unwrap_or("unknown error")
        );
        return out;
    }

    let _ = writeln!(
        out,
        "{} {} ({} items)",
        colorize(display::SUCCESS_EMOJI, Colors::BRIGHT_GREEN),
        colorize("Folder is readable", Colors::BRIGHT_GREEN),
        report.item_count
    );

    for entry in &report.preview {
        let marker = if entry.is_dir {
            display::FOLDER_EMOJI
        } else {
            display::FILE_EMOJI
        };
        let kind = if entry.is_dir {
            "dir".to_string()
        } else if entry.extension.is_empty() {
            "file".to_string()
        } else {
            entry.extension.clone()
        };
        let _ = writeln!(
            out,
            "  {marker} {} {}",
            entry.name,
            colorize(&format!("({kind})"), Colors::DIM)
        );
    }
    if report.item_count > report.preview.len() {
        let _ = writeln!(
            out,
            "  ... and {} more",
            report.item_count - report.preview.len()
        );
    }

    let _ = writeln!(
        out,
        "{} CSV files: {}",
        display::CHART_EMOJI,
        colorize(&report.csv_files.len().to_string(), Colors::BRIGHT_WHITE)
    );
    for name in report.csv_files.iter().take(display::MAX_CSV_LISTED) {
        let _ = writeln!(out, "  - {name}");
    }
    if report.csv_files.len() > display::MAX_CSV_LISTED {
        let _ = writeln!(
            out,
            "  ... and {} more",
            report.csv_files.len() - display::MAX_CSV_LISTED
        );
    }

    let _ = writeln!(
        out,
        "{} Excel files: {}",
        display::CHART_EMOJI,
        colorize(&report.excel_files.len().to_string(), Colors::BRIGHT_WHITE)
    );
    if !report.excel_files.is_empty() {
        let _ = writeln!(
            out,
            "{} Excel workbooks are listed only; save them as CSV to load them",
            colorize(display::WARNING_EMOJI, Colors::BRIGHT_YELLOW)
        );
    }
    out
}

// Summary

pub fn render_summaries(summaries: &[OfferingSummary], format: &str) -> Result<String> {
    match format {
        output_formats::JSON => Ok(serde_json::to_string_pretty(&SummaryReport {
            offerings: summaries,
        })?),
        output_formats::MINIMAL => Ok(render_summaries_minimal(summaries)),
        _ => Ok(render_summaries_text(summaries)),
    }
}

fn render_summaries_minimal(summaries: &[OfferingSummary]) -> String {
    let mut out = String::new();
    let grades: Vec<&str> = Grade::ALL.iter().map(Grade::as_str).collect();
    let _ = writeln!(
        out,
        "label\trecords\tmean\tmedian\tpass_rate\t{}",
        grades.join("\t")
    );
    for summary in summaries {
        let counts: Vec<String> = Grade::ALL
            .iter()
            .map(|g| summary.distribution.count(*g).to_string())
            .collect();
        let _ = writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}",
            summary.label,
            summary.records,
            format_value(summary.marks.mean),
            format_value(summary.marks.median),
            format_value(summary.pass_rate),
            counts.join("\t")
        );
    }
    out
}

fn render_summaries_text(summaries: &[OfferingSummary]) -> String {
    let mut out = String::new();
    if summaries.is_empty() {
        let _ = writeln!(
            out,
            "{} No mark tables found",
            colorize(display::WARNING_EMOJI, Colors::BRIGHT_YELLOW)
        );
        return out;
    }

    for summary in summaries {
        let _ = writeln!(
            out,
            "{} {} ({} students)",
            display::CHART_EMOJI,
            heading(&summary.label),
            summary.records
        );
        let _ = writeln!(out, "  {}", colorize(&summary.source, Colors::DIM));
        out.push_str(&render_stats_text(&summary.marks, "  "));
        out.push_str(&render_distribution_text(&summary.distribution, "  "));
        let _ = writeln!(out, "  Pass rate: {}%", format_value(summary.pass_rate));
        let _ = writeln!(out);
    }

    if summaries.len() > 1 {
        let _ = writeln!(out, "{}", heading("Trend"));
        let _ = writeln!(
            out,
            "  {:<20} {:>8} {:>8} {:>10}",
            "Offering", "Mean", "Median", "Pass rate"
        );
        for summary in summaries {
            let _ = writeln!(
                out,
                "  {:<20} {:>8} {:>8} {:>10}",
                summary.label,
                format_value(summary.marks.mean),
                format_value(summary.marks.median),
                format_value(summary.pass_rate)
            );
        }
    }
    out
}

fn render_stats_text(summary: &Summary, indent: &str) -> String {
    format!(
        "{indent}count {}  mean {}  std {}  min {}  25% {}  50% {}  75% {}  max {}\n",
        summary.count,
        format_value(summary.mean),
        format_value(summary.std),
        format_value(summary.min),
        format_value(summary.q1),
        format_value(summary.median),
        format_value(summary.q3),
        format_value(summary.max),
    )
}

fn render_distribution_text(distribution: &GradeDistribution, indent: &str) -> String {
    let mut out = String::new();
    for share in &distribution.shares {
        let _ = writeln!(
            out,
            "{indent}{:<2} {} {:>4} {:>6.1}%",
            share.grade.as_str(),
            colorize(
                &text_bar(share.percent, display::BAR_WIDTH),
                grade_color(share.grade)
            ),
            share.count,
            share.percent
        );
    }
    if distribution.ungraded > 0 {
        let _ = writeln!(
            out,
            "{indent}{} {} without a recognized grade",
            colorize(display::WARNING_EMOJI, Colors::BRIGHT_YELLOW),
            distribution.ungraded
        );
    }
    if !distribution.unrecognized.is_empty() {
        let _ = writeln!(
            out,
            "{indent}Unrecognized grade tokens: {}",
            distribution.unrecognized.join(", ")
        );
    }
    out
}

// Compare

pub fn render_comparison(comparison: &Comparison, format: &str, max_rows: usize) -> Result<String> {
    match format {
        output_formats::JSON => Ok(serde_json::to_string_pretty(comparison)?),
        output_formats::MINIMAL => Ok(render_comparison_minimal(comparison)),
        _ => Ok(render_comparison_text(comparison, max_rows)),
    }
}

fn render_comparison_minimal(comparison: &Comparison) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "id\tmark_a\tgrade_a\tmark_b\tgrade_b\tdelta");
    for row in &comparison.rows {
        let _ = writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}",
            row.id,
            format_value(row.mark_a),
            format_grade(row.grade_a),
            format_value(row.mark_b),
            format_grade(row.grade_b),
            format_value(row.delta)
        );
    }
    out
}

fn render_comparison_text(comparison: &Comparison, max_rows: usize) -> String {
    let mut out = String::new();
    let a = &comparison.label_a;
    let b = &comparison.label_b;

    let _ = writeln!(
        out,
        "{} {} {} {}",
        display::CHART_EMOJI,
        heading(a),
        colorize("vs", Colors::DIM),
        heading(b)
    );
    let _ = writeln!(
        out,
        "  Common students: {}",
        colorize(&comparison.common_ids.len().to_string(), Colors::BRIGHT_WHITE)
    );
    let _ = writeln!(out, "  Only in {a}: {}", comparison.only_in_a.len());
    let _ = writeln!(out, "  Only in {b}: {}", comparison.only_in_b.len());
    if comparison.duplicates_a + comparison.duplicates_b > 0 {
        let _ = writeln!(
            out,
            "  {} Duplicate IDs ignored: {} in {a}, {} in {b}",
            colorize(display::WARNING_EMOJI, Colors::BRIGHT_YELLOW),
            comparison.duplicates_a,
            comparison.duplicates_b
        );
    }

    if comparison.common_ids.is_empty() {
        let _ = writeln!(
            out,
            "{} No common students to compare",
            colorize(display::WARNING_EMOJI, Colors::BRIGHT_YELLOW)
        );
        return out;
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", heading(&format!("Marks in {a}")));
    out.push_str(&render_stats_text(&comparison.summary_a, "  "));
    out.push_str(&render_distribution_text(&comparison.distribution_a, "  "));
    let _ = writeln!(out, "{}", heading(&format!("Marks in {b}")));
    out.push_str(&render_stats_text(&comparison.summary_b, "  "));
    out.push_str(&render_distribution_text(&comparison.distribution_b, "  "));
    let _ = writeln!(out, "{}", heading("Change"));
    out.push_str(&render_stats_text(&comparison.delta_summary, "  "));
    let _ = writeln!(
        out,
        "  {} improved, {} declined, {} unchanged",
        colorize(&comparison.improved.to_string(), Colors::BRIGHT_GREEN),
        colorize(&comparison.declined.to_string(), Colors::BRIGHT_RED),
        comparison.unchanged
    );

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", heading("Grade transitions (rows: first, columns: second)"));
    let header: String = Grade::ALL.iter().map(|g| format!("{:>5}", g.as_str())).collect();
    let _ = writeln!(out, "      {header}");
    for from in Grade::ALL {
        let cells: String = Grade::ALL
            .iter()
            .map(|to| format!("{:>5}", comparison.transitions.get(from, *to)))
            .collect();
        let _ = writeln!(out, "  {:<4}{cells}", from.as_str());
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", heading("Students"));
    let _ = writeln!(
        out,
        "  {:<14} {:>8} {:>4} {:>8} {:>4} {:>8}",
        "ID", "Mark A", "", "Mark B", "", "Delta"
    );
    for row in comparison.rows.iter().take(max_rows) {
        let delta = signed(row.delta);
        let delta = match row.delta {
            Some(d) if d > 0.0 => colorize(&format!("{delta:>8}"), Colors::GREEN),
            Some(d) if d < 0.0 => colorize(&format!("{delta:>8}"), Colors::RED),
            _ => format!("{delta:>8}"),
        };
        let _ = writeln!(
            out,
            "  {:<14} {:>8} {:>4} {:>8} {:>4} {delta}",
            row.id,
            format_value(row.mark_a),
            format_grade(row.grade_a),
            format_value(row.mark_b),
            format_grade(row.grade_b),
        );
    }
    if comparison.rows.len() > max_rows {
        let _ = writeln!(
            out,
            "  ... and {} more (use --max-rows or --export to see all)",
            comparison.rows.len() - max_rows
        );
    }
    out
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use crate::analysis::compare;
    use crate::marks::TableOptions;
    use crate::core::types::MarkTable;

    type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;

    fn table(label: &str, csv: &str) -> MarkTable {
        let options = TableOptions {
            skip_rows: 0,
            ..TableOptions::default()
        };
        MarkTable::from_reader(csv.as_bytes(), label, label, &options).unwrap()
    }

    fn sample_comparison() -> Comparison {
        let a = table(
            "2019",
            "Student ID,Final Mark\n1,78 DN\n2,45 FL\n3,90 HD\n",
        );
        let b = table(
            "2020",
            "Student ID,Final Mark\n1,88 HD\n2,45 FL\n4,60 PS\n",
        );
        compare(&a, &b)
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(Some(78.0)), "78.00");
        assert_eq!(format_value(None), "-");
        assert_eq!(signed(Some(10.0)), "+10.00");
        assert_eq!(signed(Some(-2.5)), "-2.50");
    }

    #[test]
    fn test_text_bar__bounds() {
        assert_eq!(text_bar(0.0, 4), "....");
        assert_eq!(text_bar(50.0, 4), "##..");
        assert_eq!(text_bar(100.0, 4), "####");
        assert_eq!(text_bar(250.0, 4), "####");
    }

    #[test]
    fn test_render_comparison__minimal() -> TestResult {
        let output = render_comparison(&sample_comparison(), output_formats::MINIMAL, 50)?;
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "id\tmark_a\tgrade_a\tmark_b\tgrade_b\tdelta");
        assert_eq!(lines[1], "1\t78.00\tDN\t88.00\tHD\t10.00");
        assert_eq!(lines[2], "2\t45.00\tFL\t45.00\tFL\t0.00");
        assert_eq!(lines.len(), 3);
        Ok(())
    }

    #[test]
    fn test_render_comparison__json() -> TestResult {
        let output = render_comparison(&sample_comparison(), output_formats::JSON, 50)?;
        let value: serde_json::Value = serde_json::from_str(&output)?;

        assert_eq!(value["common_ids"], serde_json::json!(["1", "2"]));
        assert_eq!(value["only_in_a"], serde_json::json!(["3"]));
        assert_eq!(value["improved"], 1);
        Ok(())
    }

    #[test]
    fn test_render_comparison__text_truncates_rows() -> TestResult {
        let output = render_comparison(&sample_comparison(), output_formats::TEXT, 1)?;

        assert!(output.contains("Common students: 2"));
        assert!(output.contains("1 improved, 0 declined, 1 unchanged"));
        assert!(output.contains("... and 1 more"));
        Ok(())
    }

    #[test]
    fn test_render_comparison__text_without_common_students() -> TestResult {
        let a = table("a", "Student ID,Final Mark\n1,50 PS\n");
        let b = table("b", "Student ID,Final Mark\n2,50 PS\n");
        let output = render_comparison(&compare(&a, &b), output_formats::TEXT, 50)?;

        assert!(output.contains("No common students"));
        assert!(!output.contains("Grade transitions"));
        Ok(())
    }

    #[test]
    fn test_render_summaries__minimal_and_text() -> TestResult {
        let summary = OfferingSummary::from_table(&table(
            "2019",
            "Student ID,Final Mark\n1,78 DN\n2,45 FL\n3,\n",
        ));
        let summaries = vec![summary];

        let minimal = render_summaries(&summaries, output_formats::MINIMAL)?;
        let row = minimal.lines().nth(1).unwrap_or_default();
        assert_eq!(row, "2019\t3\t61.50\t61.50\t50.00\t0\t1\t0\t0\t1");

        let text = render_summaries(&summaries, output_formats::TEXT)?;
        assert!(text.contains("2019 (3 students)"));
        assert!(text.contains("Pass rate: 50.00%"));
        assert!(text.contains("1 without a recognized grade"));
        assert!(!text.contains("Trend"));
        Ok(())
    }

    #[test]
    fn test_render_summaries__json_envelope() -> TestResult {
        let output = render_summaries(&[], output_formats::JSON)?;
        let value: serde_json::Value = serde_json::from_str(&output)?;
        assert_eq!(value["offerings"], serde_json::json!([]));
        Ok(())
    }

    #[test]
    fn test_render_folder_report__missing_folder() -> TestResult {
        let dir = tempfile::TempDir::new()?;
        let report = crate::discovery::inspect_folder(&dir.path().join("no such"));

        let text = render_folder_report(&report, output_formats::TEXT)?;
        assert!(text.contains("Folder does not exist"));

        let minimal = render_folder_report(&report, output_formats::MINIMAL)?;
        assert!(minimal.starts_with("unusable\t"));
        Ok(())
    }

    #[test]
    fn test_render_folder_report__lists_csv_files() -> TestResult {
        let dir = tempfile::TempDir::new()?;
        std::fs::write(dir.path().join("2019.csv"), "a\n")?;
        std::fs::write(dir.path().join("2020.xlsx"), "")?;
        let report = crate::discovery::inspect_folder(dir.path());

        let text = render_folder_report(&report, output_formats::TEXT)?;
        assert!(text.contains("Folder is readable (2 items)"));
        assert!(text.contains("- 2019.csv"));
        assert!(text.contains("Excel files: 1"));
        Ok(())
    }
}
