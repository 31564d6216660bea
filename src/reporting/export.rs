//! File export of summaries and comparisons
//!
//! The format follows the extension of the target path: `.csv`, `.json` or `.md`.

use crate::analysis::{Comparison, OfferingSummary};
use crate::core::types::Grade;
use crate::core::{MarkdashError, Result};
use crate::ui::output::{format_grade, format_value};
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Markdown,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("csv") => Ok(ExportFormat::Csv),
            Some("json") => Ok(ExportFormat::Json),
            Some("md") | Some("markdown") => Ok(ExportFormat::Markdown),
            _ => Err(MarkdashError::InvalidArgument(format!(
                "Unsupported export format for '{}' (use .csv, .json or .md)",
                path.display()
            ))),
        }
    }
}

/// Result set to export
#[derive(Debug, Clone, Copy)]
pub enum ExportData<'a> {
    Offerings(&'a [OfferingSummary]),
    Comparison(&'a Comparison),
}

#[derive(Serialize)]
struct OfferingRow<'a> {
    label: &'a str,
    source: &'a str,
    records: usize,
    count: usize,
    mean: Option<f64>,
    std: Option<f64>,
    min: Option<f64>,
    q1: Option<f64>,
    median: Option<f64>,
    q3: Option<f64>,
    max: Option<f64>,
    pass_rate: Option<f64>,
    hd: usize,
    dn: usize,
    cr: usize,
    ps: usize,
    fl: usize,
    ungraded: usize,
}

impl<'a> From<&'a OfferingSummary> for OfferingRow<'a> {
    fn from(summary: &'a OfferingSummary) -> Self {
        let d = &summary.distribution;
        Self {
            label: &summary.label,
            source: &summary.source,
            records: summary.records,
            count: summary.marks.count,
            mean: summary.marks.mean,
            std: summary.marks.std,
            min: summary.marks.min,
            q1: summary.marks.q1,
            median: summary.marks.median,
            q3: summary.marks.q3,
            max: summary.marks.max,
            pass_rate: summary.pass_rate,
            hd: d.count(Grade::HD),
            dn: d.count(Grade::DN),
            cr: d.count(Grade::CR),
            ps: d.count(Grade::PS),
            fl: d.count(Grade::FL),
            ungraded: d.ungraded,
        }
    }
}

#[derive(Serialize)]
struct JsonSummaries<'a> {
    offerings: &'a [OfferingSummary],
}

/// Write `data` to `path` in the format its extension names
pub fn export_results(data: ExportData<'_>, path: &Path) -> Result<()> {
    let format = ExportFormat::from_path(path)?;
    let content = render_export(data, format)?;
    fs::write(path, content)?;
    Ok(())
}

pub fn render_export(data: ExportData<'_>, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Csv => render_csv(data),
        ExportFormat::Json => Ok(match data {
            ExportData::Offerings(summaries) => serde_json::to_string_pretty(&JsonSummaries {
                offerings: summaries,
            })?,
            ExportData::Comparison(comparison) => serde_json::to_string_pretty(comparison)?,
        }),
        ExportFormat::Markdown => Ok(render_markdown(data)),
    }
}

fn render_csv(data: ExportData<'_>) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    match data {
        ExportData::Offerings(summaries) => {
            for summary in summaries {
                writer.serialize(OfferingRow::from(summary))?;
            }
        }
        ExportData::Comparison(comparison) => {
            writer.write_record(["id", "mark_a", "grade_a", "mark_b", "grade_b", "delta"])?;
            for row in &comparison.rows {
                writer.serialize((
                    &row.id,
                    row.mark_a,
                    row.grade_a.map(|g| g.as_str()),
                    row.mark_b,
                    row.grade_b.map(|g| g.as_str()),
                    row.delta,
                ))?;
            }
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| MarkdashError::Io(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| MarkdashError::InvalidArgument(format!("Export is not UTF-8: {e}")))
}

/// Escape a Markdown table cell
fn md_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

fn render_markdown(data: ExportData<'_>) -> String {
    let mut out = String::new();
    match data {
        ExportData::Offerings(summaries) => {
            let _ = writeln!(out, "# Offering Summary\n");
            let _ = writeln!(
                out,
                "| Offering | Students | Mean | Std | Min | Median | Max | Pass rate | HD | DN | CR | PS | FL |"
            );
            let _ = writeln!(
                out,
                "|---|---:|---:|---:|---:|---:|---:|---:|---:|---:|---:|---:|---:|"
            );
            for s in summaries {
                let d = &s.distribution;
                let _ = writeln!(
                    out,
                    "| {} | {} | {} | {} | {} | {} | {} | {} | {} | {} | {} | {} | {} |",
                    md_cell(&s.label),
                    s.records,
                    format_value(s.marks.mean),
                    format_value(s.marks.std),
                    format_value(s.marks.min),
                    format_value(s.marks.median),
                    format_value(s.marks.max),
                    format_value(s.pass_rate),
                    d.count(Grade::HD),
                    d.count(Grade::DN),
                    d.count(Grade::CR),
                    d.count(Grade::PS),
                    d.count(Grade::FL),
                );
            }
        }
        ExportData::Comparison(c) => {
            let a = md_cell(&c.label_a);
            let b = md_cell(&c.label_b);
            let _ = writeln!(out, "# {a} vs {b}\n");
            let _ = writeln!(out, "- Common students: {}", c.common_ids.len());
            let _ = writeln!(out, "- Only in {a}: {}", c.only_in_a.len());
            let _ = writeln!(out, "- Only in {b}: {}", c.only_in_b.len());
            let _ = writeln!(
                out,
                "- Improved: {}, declined: {}, unchanged: {}",
                c.improved, c.declined, c.unchanged
            );
            let _ = writeln!(out, "- Mean change: {}\n", format_value(c.delta_summary.mean));

            let _ = writeln!(out, "## Grade distribution\n");
            let _ = writeln!(out, "| Grade | {a} | {a} % | {b} | {b} % |");
            let _ = writeln!(out, "|---|---:|---:|---:|---:|");
            for grade in Grade::ALL {
                let _ = writeln!(
                    out,
                    "| {} | {} | {:.1} | {} | {:.1} |",
                    grade.as_str(),
                    c.distribution_a.count(grade),
                    c.distribution_a.percent(grade),
                    c.distribution_b.count(grade),
                    c.distribution_b.percent(grade),
                );
            }

            let _ = writeln!(out, "\n## Students\n");
            let _ = writeln!(out, "| ID | {a} mark | {a} grade | {b} mark | {b} grade | Change |");
            let _ = writeln!(out, "|---|---:|---|---:|---|---:|");
            for row in &c.rows {
                let _ = writeln!(
                    out,
                    "| {} | {} | {} | {} | {} | {} |",
                    md_cell(&row.id),
                    format_value(row.mark_a),
                    format_grade(row.grade_a),
                    format_value(row.mark_b),
                    format_grade(row.grade_b),
                    format_value(row.delta),
                );
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use crate::analysis::compare;
    use crate::core::types::MarkTable;
    use crate::marks::TableOptions;
    use tempfile::TempDir;

    type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;

    fn table(label: &str, csv: &str) -> MarkTable {
        let options = TableOptions {
            skip_rows: 0,
            ..TableOptions::default()
        };
        MarkTable::from_reader(csv.as_bytes(), label, label, &options).unwrap()
    }

    fn sample_comparison() -> Comparison {
        let a = table("2019", "Student ID,Final Mark\n1,78 DN\n2,45 FL\n3,\n");
        let b = table("2020", "Student ID,Final Mark\n1,88 HD\n2,45 FL\n3,60 PS\n");
        compare(&a, &b)
    }

    #[test]
    fn test_export_format__from_path() {
        assert_eq!(
            ExportFormat::from_path(Path::new("out.CSV")).unwrap(),
            ExportFormat::Csv
        );
        assert_eq!(
            ExportFormat::from_path(Path::new("out.json")).unwrap(),
            ExportFormat::Json
        );
        assert_eq!(
            ExportFormat::from_path(Path::new("report.md")).unwrap(),
            ExportFormat::Markdown
        );
    }

    #[test]
    fn test_export_format__rejects_unknown_extension() {
        for path in ["out.xlsx", "out", "out.txt"] {
            let err = ExportFormat::from_path(Path::new(path)).unwrap_err();
            assert!(matches!(err, MarkdashError::InvalidArgument(_)), "{path}");
        }
    }

    #[test]
    fn test_render_csv__comparison_rows() -> TestResult {
        let csv = render_export(ExportData::Comparison(&sample_comparison()), ExportFormat::Csv)?;
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "id,mark_a,grade_a,mark_b,grade_b,delta");
        assert_eq!(lines[1], "1,78.0,DN,88.0,HD,10.0");
        assert_eq!(lines[2], "2,45.0,FL,45.0,FL,0.0");
        assert_eq!(lines[3], "3,,,60.0,PS,");
        Ok(())
    }

    #[test]
    fn test_render_csv__offering_rows() -> TestResult {
        let summaries = vec![OfferingSummary::from_table(&table(
            "2019",
            "Student ID,Final Mark\n1,78 DN\n2,45 FL\n",
        ))];
        let csv = render_export(ExportData::Offerings(&summaries), ExportFormat::Csv)?;

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let headers = reader.headers()?.clone();
        assert_eq!(&headers[0], "label");
        assert!(headers.iter().any(|h| h == "pass_rate"));

        let record = reader.records().next().ok_or("missing row")??;
        assert_eq!(&record[0], "2019");
        assert_eq!(&record[2], "2");
        Ok(())
    }

    #[test]
    fn test_render_markdown__comparison() -> TestResult {
        let md = render_export(
            ExportData::Comparison(&sample_comparison()),
            ExportFormat::Markdown,
        )?;

        assert!(md.starts_with("# 2019 vs 2020"));
        assert!(md.contains("- Common students: 3"));
        assert!(md.contains("| 1 | 78.00 | DN | 88.00 | HD | 10.00 |"));
        assert!(md.contains("| 3 | - | - | 60.00 | PS | - |"));
        Ok(())
    }

    #[test]
    fn test_md_cell__escapes_pipes() {
        assert_eq!(md_cell("a|b\nc"), "a\\|b c");
    }

    #[test]
    fn test_export_results__writes_json() -> TestResult {
        let dir = TempDir::new()?;
        let path = dir.path().join("compare.json");

        export_results(ExportData::Comparison(&sample_comparison()), &path)?;

        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
        assert_eq!(value["label_a"], "2019");
        assert_eq!(value["rows"].as_array().map(Vec::len), Some(3));
        Ok(())
    }

    #[test]
    fn test_export_results__unknown_extension_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("compare.html");

        assert!(export_results(ExportData::Comparison(&sample_comparison()), &path).is_err());
        assert!(!path.exists());
    }
}
