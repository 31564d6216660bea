use crate::analysis::{Comparison, GradeDistribution, OfferingSummary, Summary};
use crate::core::types::Grade;
use crate::ui::output::{format_grade, format_value};
use std::fmt::Write;
use std::fs;
use std::io;

/// Constants for dashboard styling and layout
mod dashboard_constants {
    /// Pass rate thresholds for card styling
    pub const GOOD_PASS_RATE: f64 = 80.0;
    pub const FAIR_PASS_RATE: f64 = 60.0;

    /// Element holding the embedded JSON copy of the results
    pub const DATA_ELEMENT_ID: &str = "markdash-data";
}

/// What the dashboard shows
#[derive(Debug, Clone)]
pub enum DashboardBody {
    Offerings(Vec<OfferingSummary>),
    Comparison(Box<Comparison>),
}

/// Data structure containing all information needed for dashboard generation
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub title: String,
    pub body: DashboardBody,
    /// Timestamp when the dashboard was generated
    pub timestamp: String,
}

impl DashboardData {
    pub fn for_offerings(summaries: &[OfferingSummary], timestamp: String) -> Self {
        Self {
            title: "Offering Summary".to_string(),
            body: DashboardBody::Offerings(summaries.to_vec()),
            timestamp,
        }
    }

    pub fn for_comparison(comparison: &Comparison, timestamp: String) -> Self {
        Self {
            title: format!("{} vs {}", comparison.label_a, comparison.label_b),
            body: DashboardBody::Comparison(Box::new(comparison.clone())),
            timestamp,
        }
    }
}

/// Error type for dashboard generation
#[derive(Debug)]
pub enum DashboardError {
    FileWrite(io::Error),
    Serialization(serde_json::Error),
}

impl std::fmt::Display for DashboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DashboardError::FileWrite(e) => write!(f, "Failed to write dashboard file: {e}"),
            DashboardError::Serialization(e) => write!(f, "Failed to serialize data: {e}"),
        }
    }
}

impl std::error::Error for DashboardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DashboardError::FileWrite(e) => Some(e),
            DashboardError::Serialization(e) => Some(e),
        }
    }
}

impl From<io::Error> for DashboardError {
    fn from(e: io::Error) -> Self {
        DashboardError::FileWrite(e)
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(e: serde_json::Error) -> Self {
        DashboardError::Serialization(e)
    }
}

/// Escape text for use in HTML element content and attribute values
pub fn html_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Static HTML dashboard for offering summaries and comparisons
pub struct HtmlDashboard;

impl HtmlDashboard {
    /// Generate and write an HTML dashboard to the specified path
    pub fn generate_dashboard(
        data: &DashboardData,
        output_path: &str,
    ) -> Result<(), DashboardError> {
        let html_content = Self::generate_html_content(data)?;
        fs::write(output_path, html_content)?;
        Ok(())
    }

    /// Generate the complete HTML document content
    pub fn generate_html_content(data: &DashboardData) -> Result<String, DashboardError> {
        let body_content = Self::generate_body_content(data);
        let data_island = Self::generate_data_island(data)?;

        Ok(format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - markdash</title>
    <style>{}</style>
</head>
<body>
    {}
    {}
</body>
</html>"#,
            html_escape(&data.title),
            Self::generate_css(),
            body_content,
            data_island
        ))
    }

    fn generate_css() -> &'static str {
        r#"
        :root {
            --primary-color: #2563eb;
            --success-color: #059669;
            --warning-color: #d97706;
            --error-color: #dc2626;
            --bg-color: #f8fafc;
            --card-bg: #ffffff;
            --border-color: #e2e8f0;
            --text-primary: #1e293b;
            --text-secondary: #64748b;
            --grade-hd: #7c3aed;
            --grade-dn: #2563eb;
            --grade-cr: #0891b2;
            --grade-ps: #059669;
            --grade-fl: #dc2626;
        }

        * { margin: 0; padding: 0; box-sizing: border-box; }

        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background-color: var(--bg-color);
            color: var(--text-primary);
            line-height: 1.6;
        }

        .container { max-width: 1100px; margin: 0 auto; padding: 2rem; }
        .header { text-align: center; margin-bottom: 2rem; }
        .header h1 { font-size: 2rem; margin-bottom: 0.25rem; }
        .header p { color: var(--text-secondary); }

        .stats-grid {
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
            gap: 1rem;
            margin-bottom: 2rem;
        }

        .stat-card, .section {
            background: var(--card-bg);
            border: 1px solid var(--border-color);
            border-radius: 0.75rem;
            padding: 1.25rem;
        }

        .section { margin-bottom: 1.5rem; }
        .section h2 { font-size: 1.2rem; margin-bottom: 1rem; }
        .stat-value { font-size: 1.75rem; font-weight: 700; }
        .stat-label { color: var(--text-secondary); font-size: 0.9rem; }
        .stat-value.success { color: var(--success-color); }
        .stat-value.warning { color: var(--warning-color); }
        .stat-value.error { color: var(--error-color); }

        .bar-row { display: flex; align-items: center; gap: 0.75rem; margin: 0.3rem 0; }
        .bar-label { width: 2.5rem; font-weight: 600; }
        .bar-track { flex: 1; background: var(--border-color); border-radius: 0.25rem; height: 1rem; }
        .bar { height: 100%; border-radius: 0.25rem; }
        .bar-value { width: 7rem; text-align: right; color: var(--text-secondary); }
        .grade-hd { background: var(--grade-hd); }
        .grade-dn { background: var(--grade-dn); }
        .grade-cr { background: var(--grade-cr); }
        .grade-ps { background: var(--grade-ps); }
        .grade-fl { background: var(--grade-fl); }

        table { width: 100%; border-collapse: collapse; font-size: 0.9rem; }
        th, td { padding: 0.4rem 0.6rem; border-bottom: 1px solid var(--border-color); text-align: right; }
        th:first-child, td:first-child { text-align: left; }
        th { color: var(--text-secondary); font-weight: 600; }
        td.up { color: var(--success-color); }
        td.down { color: var(--error-color); }
        .note { color: var(--text-secondary); font-size: 0.85rem; margin-top: 0.5rem; }
        "#
    }

    fn generate_body_content(data: &DashboardData) -> String {
        let sections = match data.body {
            DashboardBody::Offerings(ref summaries) => Self::generate_offering_sections(summaries),
            DashboardBody::Comparison(ref comparison) => {
                Self::generate_comparison_sections(comparison)
            }
        };

        format!(
            r#"
            <div class="container">
                {}
                {}
            </div>
            "#,
            Self::generate_header_section(&data.title, &data.timestamp),
            sections
        )
    }

    fn generate_header_section(title: &str, timestamp: &str) -> String {
        format!(
            r#"
            <div class="header">
                <h1>{}</h1>
                <p>Generated on {} by markdash</p>
            </div>
            "#,
            html_escape(title),
            html_escape(timestamp)
        )
    }

    fn generate_stat_card(value: &str, label: &str, style_class: &str) -> String {
        format!(
            r#"
                <div class="stat-card">
                    <div class="stat-value {}">{}</div>
                    <div class="stat-label">{}</div>
                </div>"#,
            style_class,
            html_escape(value),
            html_escape(label)
        )
    }

    fn pass_rate_style(pass_rate: Option<f64>) -> &'static str {
        match pass_rate {
            Some(rate) if rate >= dashboard_constants::GOOD_PASS_RATE => "success",
            Some(rate) if rate >= dashboard_constants::FAIR_PASS_RATE => "warning",
            Some(_) => "error",
            None => "",
        }
    }

    /// Grade bars sized by CSS width
    fn generate_distribution_bars(distribution: &GradeDistribution) -> String {
        let mut out = String::new();
        for share in &distribution.shares {
            let _ = write!(
                out,
                r#"
                <div class="bar-row">
                    <span class="bar-label">{grade}</span>
                    <div class="bar-track"><div class="bar grade-{class}" style="width: {width:.1}%"></div></div>
                    <span class="bar-value">{count} ({percent:.1}%)</span>
                </div>"#,
                grade = share.grade.as_str(),
                class = share.grade.as_str().to_ascii_lowercase(),
                width = share.percent.clamp(0.0, 100.0),
                count = share.count,
                percent = share.percent,
            );
        }
        if distribution.ungraded > 0 {
            let _ = write!(
                out,
                r#"<p class="note">{} record(s) without a recognized grade</p>"#,
                distribution.ungraded
            );
        }
        out
    }

    fn generate_summary_table(rows: &[(&str, &Summary)]) -> String {
        let mut out = String::from(
            "<table><thead><tr><th></th><th>Count</th><th>Mean</th><th>Std</th><th>Min</th>\
             <th>25%</th><th>50%</th><th>75%</th><th>Max</th></tr></thead><tbody>",
        );
        for (label, summary) in rows {
            let _ = write!(
                out,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                html_escape(label),
                summary.count,
                format_value(summary.mean),
                format_value(summary.std),
                format_value(summary.min),
                format_value(summary.q1),
                format_value(summary.median),
                format_value(summary.q3),
                format_value(summary.max),
            );
        }
        out.push_str("</tbody></table>");
        out
    }

    fn generate_offering_sections(summaries: &[OfferingSummary]) -> String {
        let students: usize = summaries.iter().map(|s| s.records).sum();
        let mut out = format!(
            r#"<div class="stats-grid">{}{}</div>"#,
            Self::generate_stat_card(&summaries.len().to_string(), "Offerings", ""),
            Self::generate_stat_card(&students.to_string(), "Student records", ""),
        );

        let rows: Vec<(&str, &Summary)> = summaries
            .iter()
            .map(|s| (s.label.as_str(), &s.marks))
            .collect();
        let _ = write!(
            out,
            r#"<div class="section"><h2>Marks by offering</h2>{}</div>"#,
            Self::generate_summary_table(&rows)
        );

        let mut trend = String::from(
            "<table><thead><tr><th>Offering</th><th>Source</th><th>Students</th><th>Graded</th><th>Pass rate</th></tr></thead><tbody>",
        );
        for summary in summaries {
            let _ = write!(
                trend,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                html_escape(&summary.label),
                html_escape(&summary.source),
                summary.records,
                summary.distribution.graded,
                format_value(summary.pass_rate),
            );
        }
        trend.push_str("</tbody></table>");
        let _ = write!(
            out,
            r#"<div class="section"><h2>Trend</h2>{trend}</div>"#
        );

        for summary in summaries {
            let _ = write!(
                out,
                r#"<div class="section"><h2>{} grade distribution</h2>{}{}</div>"#,
                html_escape(&summary.label),
                Self::generate_stat_card(
                    &format!("{}%", format_value(summary.pass_rate)),
                    "Pass rate",
                    Self::pass_rate_style(summary.pass_rate)
                ),
                Self::generate_distribution_bars(&summary.distribution)
            );
        }
        out
    }

    fn generate_comparison_sections(comparison: &Comparison) -> String {
        let a = comparison.label_a.as_str();
        let b = comparison.label_b.as_str();

        let mut out = format!(
            r#"<div class="stats-grid">{}{}{}{}</div>"#,
            Self::generate_stat_card(
                &comparison.common_ids.len().to_string(),
                "Common students",
                ""
            ),
            Self::generate_stat_card(
                &comparison.only_in_a.len().to_string(),
                &format!("Only in {a}"),
                ""
            ),
            Self::generate_stat_card(
                &comparison.only_in_b.len().to_string(),
                &format!("Only in {b}"),
                ""
            ),
            Self::generate_stat_card(
                &format_value(comparison.delta_summary.mean),
                "Mean change",
                match comparison.delta_summary.mean {
                    Some(d) if d > 0.0 => "success",
                    Some(d) if d < 0.0 => "error",
                    _ => "",
                }
            ),
        );

        let _ = write!(
            out,
            r#"<div class="section"><h2>Marks of common students</h2>{}<p class="note">{} improved, {} declined, {} unchanged</p></div>"#,
            Self::generate_summary_table(&[
                (a, &comparison.summary_a),
                (b, &comparison.summary_b),
                ("Change", &comparison.delta_summary),
            ]),
            comparison.improved,
            comparison.declined,
            comparison.unchanged
        );

        let _ = write!(
            out,
            r#"<div class="section"><h2>{} grade distribution</h2>{}</div><div class="section"><h2>{} grade distribution</h2>{}</div>"#,
            html_escape(a),
            Self::generate_distribution_bars(&comparison.distribution_a),
            html_escape(b),
            Self::generate_distribution_bars(&comparison.distribution_b),
        );

        let mut matrix = String::from("<table><thead><tr><th></th>");
        for grade in Grade::ALL {
            let _ = write!(matrix, "<th>{}</th>", grade.as_str());
        }
        matrix.push_str("</tr></thead><tbody>");
        for from in Grade::ALL {
            let _ = write!(matrix, "<tr><td>{}</td>", from.as_str());
            for to in Grade::ALL {
                let _ = write!(matrix, "<td>{}</td>", comparison.transitions.get(from, to));
            }
            matrix.push_str("</tr>");
        }
        matrix.push_str("</tbody></table>");
        let _ = write!(
            out,
            r#"<div class="section"><h2>Grade transitions</h2><p class="note">Rows: {}, columns: {}</p>{}</div>"#,
            html_escape(a),
            html_escape(b),
            matrix
        );

        let mut students = format!(
            "<table><thead><tr><th>Student ID</th><th>{a_escaped} mark</th><th>{a_escaped} grade</th><th>{b_escaped} mark</th><th>{b_escaped} grade</th><th>Change</th></tr></thead><tbody>",
            a_escaped = html_escape(a),
            b_escaped = html_escape(b),
        );
        for row in &comparison.rows {
            let class = match row.delta {
                Some(d) if d > 0.0 => "up",
                Some(d) if d < 0.0 => "down",
                _ => "",
            };
            let _ = write!(
                students,
                r#"<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td class="{}">{}</td></tr>"#,
                html_escape(&row.id),
                format_value(row.mark_a),
                format_grade(row.grade_a),
                format_value(row.mark_b),
                format_grade(row.grade_b),
                class,
                format_value(row.delta),
            );
        }
        students.push_str("</tbody></table>");
        let _ = write!(
            out,
            r#"<div class="section"><h2>Common students</h2>{students}</div>"#
        );
        out
    }

    /// JSON copy of the results for downstream tooling; never executed
    fn generate_data_island(data: &DashboardData) -> Result<String, DashboardError> {
        let json = match data.body {
            DashboardBody::Offerings(ref summaries) => serde_json::to_string(summaries)?,
            DashboardBody::Comparison(ref comparison) => serde_json::to_string(comparison)?,
        };
        Ok(format!(
            r#"<script type="application/json" id="{}">{}</script>"#,
            dashboard_constants::DATA_ELEMENT_ID,
            json.replace("</", "<\\/")
        ))
    }
}
