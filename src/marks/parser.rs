use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::types::{FinalMark, Grade};

/// Leading signed decimal, e.g. "78", "85.5" or "-5". ASCII digits only.
const MARK_PATTERN: &str = r"(?-u)^\s*(?P<mark>[-+]?[0-9]+(?:\.[0-9]+)?)";

/// A run of ASCII letters anywhere after the mark
const GRADE_TOKEN_PATTERN: &str = r"(?-u)[A-Za-z]+";

static MARK_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(MARK_PATTERN).expect("Failed to compile mark pattern"));

static GRADE_TOKEN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(GRADE_TOKEN_PATTERN).expect("Failed to compile grade token pattern"));

/// Split a composite final mark cell into its mark and grade.
///
/// The mark is the numeric prefix of the cell. The grade is the first
/// letter token after it that names a grade, so separators such as
/// `"78 - DN"`, `"78/100 DN"` or `"78 (DN)"` are accepted. When no token
/// names a grade, the first token is kept in `raw_grade` so it can be
/// reported as unrecognized.
///
/// # Examples
/// ```
/// use markdash::marks::parse_final_mark;
/// use markdash::Grade;
///
/// let parsed = parse_final_mark("78 DN");
/// assert_eq!(parsed.mark, Some(78.0));
/// assert_eq!(parsed.grade, Some(Grade::DN));
/// ```
pub fn parse_final_mark(text: &str) -> FinalMark {
    let (mark, rest) = match MARK_REGEX.captures(text).and_then(|c| c.name("mark")) {
        Some(m) => (m.as_str().parse::<f64>().ok(), &text[m.end()..]),
        None => (None, text),
    };

    let mut first_token = None;
    for token in GRADE_TOKEN_REGEX.find_iter(rest).map(|t| t.as_str()) {
        if let Some(grade) = Grade::parse(token) {
            return FinalMark {
                mark,
                grade: Some(grade),
                raw_grade: Some(token.to_string()),
            };
        }
        first_token.get_or_insert(token);
    }

    FinalMark {
        mark,
        grade: None,
        raw_grade: first_token.map(str::to_string),
    }
}

/// Normalize a student identifier cell.
///
/// Spreadsheet exports often coerce numeric IDs to floats, so a trailing
/// `.0` is dropped: `" 12345.0 "` becomes `"12345"`.
pub fn normalize_id(text: &str) -> String {
    let trimmed = text.trim();
    match trimmed.strip_suffix(".0") {
        Some(stem) if !stem.is_empty() && stem.bytes().all(|b| b.is_ascii_digit()) => {
            stem.to_string()
        }
        _ => trimmed.to_string(),
    }
}

/// Normalize a header cell: strip a UTF-8 BOM and surrounding whitespace
pub fn normalize_header(text: &str) -> String {
    text.trim_start_matches('\u{feff}').trim().to_string()
}
