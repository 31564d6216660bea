use serde::Serialize;
use std::cmp::Ordering;

use crate::analysis::distribution::GradeDistribution;
use crate::analysis::stats::{Summary, describe};
use crate::core::types::MarkTable;

/// Headline numbers for one course offering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OfferingSummary {
    pub label: String,
    pub source: String,
    pub records: usize,
    pub marks: Summary,
    pub distribution: GradeDistribution,
    /// Percentage of graded students not in FL
    pub pass_rate: Option<f64>,
}

impl OfferingSummary {
    pub fn from_table(table: &MarkTable) -> Self {
        let distribution = GradeDistribution::from_records(&table.records);
        Self {
            label: table.label.clone(),
            source: table.source.clone(),
            records: table.len(),
            marks: describe(&table.marks()),
            pass_rate: distribution.pass_rate(),
            distribution,
        }
    }
}

/// Order offerings by label so that `2019` sorts before `2020` and `S2` before `S10`
pub fn trend(mut summaries: Vec<OfferingSummary>) -> Vec<OfferingSummary> {
    summaries.sort_by(|a, b| natural_cmp(&a.label, &b.label));
    summaries
}

/// Compare strings treating runs of ASCII digits as numbers
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = chunks(a);
    let mut right = chunks(b);

    loop {
        match (left.next(), right.next()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => {
                let ordering = match (is_digits(l), is_digits(r)) {
                    (true, true) => {
                        let l = l.trim_start_matches('0');
                        let r = r.trim_start_matches('0');
                        l.len().cmp(&r.len()).then_with(|| l.cmp(r))
                    }
                    _ => l.cmp(r),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
        }
    }
}

fn is_digits(chunk: &str) -> bool {
    chunk.bytes().next().is_some_and(|b| b.is_ascii_digit())
}

/// Split into alternating digit / non-digit runs
fn chunks(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        let first = rest.bytes().next()?;
        let digit = first.is_ascii_digit();
        let end = rest
            .bytes()
            .position(|b| b.is_ascii_digit() != digit)
            .unwrap_or(rest.len());
        let (chunk, tail) = rest.split_at(end);
        rest = tail;
        Some(chunk)
    })
}
