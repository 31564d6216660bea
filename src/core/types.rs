use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::constants::grade_bands;

/// Ordinal grade bucket, declared best to worst.
///
/// The derived `Ord` follows declaration order, so `Grade::HD < Grade::FL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    HD,
    DN,
    CR,
    PS,
    FL,
}

impl Grade {
    /// Every bucket in reporting order
    pub const ALL: [Grade; 5] = [Grade::HD, Grade::DN, Grade::CR, Grade::PS, Grade::FL];

    /// Parse a grade token, ignoring case and surrounding whitespace.
    ///
    /// # Examples
    /// ```
    /// use markdash::Grade;
    ///
    /// assert_eq!(Grade::parse(" dn "), Some(Grade::DN));
    /// assert_eq!(Grade::parse("AF"), None);
    /// ```
    pub fn parse(token: &str) -> Option<Grade> {
        match token.trim().to_ascii_uppercase().as_str() {
            "HD" => Some(Grade::HD),
            "DN" => Some(Grade::DN),
            "CR" => Some(Grade::CR),
            "PS" => Some(Grade::PS),
            "FL" => Some(Grade::FL),
            _ => None,
        }
    }

    /// Grade band a numeric mark falls into
    pub fn from_mark(mark: f64) -> Grade {
        if mark >= grade_bands::HIGH_DISTINCTION {
            Grade::HD
        } else if mark >= grade_bands::DISTINCTION {
            Grade::DN
        } else if mark >= grade_bands::CREDIT {
            Grade::CR
        } else if mark >= grade_bands::PASS {
            Grade::PS
        } else {
            Grade::FL
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::HD => "HD",
            Grade::DN => "DN",
            Grade::CR => "CR",
            Grade::PS => "PS",
            Grade::FL => "FL",
        }
    }

    pub fn is_pass(&self) -> bool {
        *self != Grade::FL
    }

    /// Position within `Grade::ALL`
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A final mark cell split into its numeric and grade parts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinalMark {
    pub mark: Option<f64>,
    pub grade: Option<Grade>,
    /// Grade token as written in the cell
    pub raw_grade: Option<String>,
}

impl FinalMark {
    pub fn is_blank(&self) -> bool {
        self.mark.is_none() && self.grade.is_none() && self.raw_grade.is_none()
    }
}

/// One student row of an offering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub id: String,
    pub final_mark: FinalMark,
    /// Unparsed final mark cell
    pub raw: String,
}

impl StudentRecord {
    pub fn mark(&self) -> Option<f64> {
        self.final_mark.mark
    }

    pub fn grade(&self) -> Option<Grade> {
        self.final_mark.grade
    }
}

/// The normalized rows of one course offering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkTable {
    /// Short name of the offering, usually the file stem
    pub label: String,
    /// Path or URL the table was read from
    pub source: String,
    /// Normalized column names
    pub columns: Vec<String>,
    pub records: Vec<StudentRecord>,
    /// Blank rows dropped while parsing, not counting skipped metadata rows
    pub skipped_rows: usize,
}

impl MarkTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Marks of every record that has one, in row order
    pub fn marks(&self) -> Vec<f64> {
        self.records.iter().filter_map(StudentRecord::mark).collect()
    }
}
