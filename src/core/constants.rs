/// Application-wide constants to avoid magic values throughout the codebase.
///
/// This module centralizes all magic strings, numbers, and other literal values
/// used across the application, making them easier to maintain and modify.
/// Output format constants
pub mod output_formats {
    /// Text output format - colorful tables for a human reviewer
    pub const TEXT: &str = "text";
    /// JSON output format - structured output for automation
    pub const JSON: &str = "json";
    /// Minimal output format - tab separated lines without colors
    pub const MINIMAL: &str = "minimal";

    /// Default output format
    pub const DEFAULT: &str = TEXT;

    /// All valid output formats
    pub const ALL: [&str; 3] = [TEXT, JSON, MINIMAL];
}

/// Column defaults for LMS grade exports
pub mod columns {
    /// Column holding the student identifier
    pub const DEFAULT_ID_COLUMN: &str = "Student ID";
    /// Column holding the composite "mark grade" text
    pub const DEFAULT_MARK_COLUMN: &str = "Final Mark";
    /// Rows directly after the header that carry metadata (e.g. "Points Possible")
    pub const DEFAULT_SKIP_ROWS: usize = 1;
    /// Upper bound accepted for skip_rows
    pub const MAX_SKIP_ROWS: usize = 100;
}

/// Lower mark bound (inclusive) of each grade band
pub mod grade_bands {
    pub const HIGH_DISTINCTION: f64 = 85.0;
    pub const DISTINCTION: f64 = 75.0;
    pub const CREDIT: f64 = 65.0;
    pub const PASS: f64 = 50.0;
}

/// Timeout constants for remote sources
pub mod timeouts {
    /// Default fetch timeout in seconds
    pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
    /// Maximum accepted timeout in seconds (1 hour)
    pub const MAX_TIMEOUT_SECONDS: u64 = 3600;
    /// Maximum redirects followed when fetching a remote file
    pub const MAX_REDIRECTS: usize = 10;
}

/// File processing constants
pub mod files {
    /// Extensions loaded as mark tables
    pub const TABLE_EXTENSIONS: [&str; 1] = ["csv"];
    /// Spreadsheet extensions recognised (but not loaded) by folder inspection
    pub const EXCEL_EXTENSIONS: [&str; 2] = ["xlsx", "xls"];
    /// Project config file name
    pub const CONFIG_FILE_NAME: &str = ".markdash.toml";
    /// Parent directories searched for a config file
    pub const CONFIG_SEARCH_DEPTH: usize = 3;
}

/// Display and formatting constants
pub mod display {
    /// Entries shown by folder inspection
    pub const MAX_PREVIEW_ITEMS: usize = 10;
    /// CSV names listed by folder inspection
    pub const MAX_CSV_LISTED: usize = 5;
    /// Default number of compared students listed in text output
    pub const DEFAULT_MAX_ROWS: usize = 50;
    /// Width of text histogram bars
    pub const BAR_WIDTH: usize = 30;
    pub const SUCCESS_EMOJI: &str = "✅";
    pub const ERROR_EMOJI: &str = "❌";
    pub const WARNING_EMOJI: &str = "⚠️";
    pub const FOLDER_EMOJI: &str = "📁";
    pub const FILE_EMOJI: &str = "📄";
    pub const CHART_EMOJI: &str = "📊";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_formats_constants() {
        assert_eq!(output_formats::TEXT, "text");
        assert_eq!(output_formats::JSON, "json");
        assert_eq!(output_formats::MINIMAL, "minimal");
        assert_eq!(output_formats::DEFAULT, "text");
        assert_eq!(output_formats::ALL.len(), 3);
    }

    #[test]
    fn test_grade_bands_are_descending() {
        assert!(grade_bands::HIGH_DISTINCTION > grade_bands::DISTINCTION);
        assert!(grade_bands::DISTINCTION > grade_bands::CREDIT);
        assert!(grade_bands::CREDIT > grade_bands::PASS);
    }

    #[test]
    fn test_column_defaults() {
        assert_eq!(columns::DEFAULT_ID_COLUMN, "Student ID");
        assert_eq!(columns::DEFAULT_MARK_COLUMN, "Final Mark");
        assert_eq!(columns::DEFAULT_SKIP_ROWS, 1);
    }
}
