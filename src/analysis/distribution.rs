use serde::Serialize;
use std::collections::BTreeSet;

use crate::core::types::{Grade, StudentRecord};

/// Count and share of one grade bucket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeShare {
    pub grade: Grade,
    pub count: usize,
    /// Percentage of graded records, 0-100
    pub percent: f64,
}

/// Grade counts in `Grade::ALL` order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeDistribution {
    pub shares: Vec<GradeShare>,
    /// Records with a recognised grade
    pub graded: usize,
    /// Records without a recognised grade
    pub ungraded: usize,
    /// Distinct grade tokens that did not map to a bucket
    pub unrecognized: Vec<String>,
}

impl GradeDistribution {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a StudentRecord>,
    {
        let mut counts = [0usize; Grade::ALL.len()];
        let mut ungraded = 0;
        let mut unrecognized = BTreeSet::new();

        for record in records {
            match record.grade() {
                Some(grade) => counts[grade.index()] += 1,
                None => {
                    ungraded += 1;
                    if let Some(ref token) = record.final_mark.raw_grade {
                        unrecognized.insert(token.to_ascii_uppercase());
                    }
                }
            }
        }

        Self::from_counts(counts, ungraded, unrecognized.into_iter().collect())
    }

    fn from_counts(
        counts: [usize; Grade::ALL.len()],
        ungraded: usize,
        unrecognized: Vec<String>,
    ) -> Self {
        let graded: usize = counts.iter().sum();
        let shares = Grade::ALL
            .iter()
            .map(|&grade| {
                let count = counts[grade.index()];
                let percent = if graded > 0 {
                    count as f64 * 100.0 / graded as f64
                } else {
                    0.0
                };
                GradeShare {
                    grade,
                    count,
                    percent,
                }
            })
            .collect();

        Self {
            shares,
            graded,
            ungraded,
            unrecognized,
        }
    }

    pub fn count(&self, grade: Grade) -> usize {
        self.shares[grade.index()].count
    }

    pub fn percent(&self, grade: Grade) -> f64 {
        self.shares[grade.index()].percent
    }

    /// Share of graded records that passed, or `None` when nothing is graded
    pub fn pass_rate(&self) -> Option<f64> {
        if self.graded == 0 {
            return None;
        }
        let passed: usize = self
            .shares
            .iter()
            .filter(|share| share.grade.is_pass())
            .map(|share| share.count)
            .sum();
        Some(passed as f64 * 100.0 / self.graded as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marks::parse_final_mark;

    fn records(cells: &[&str]) -> Vec<StudentRecord> {
        cells
            .iter()
            .enumerate()
            .map(|(i, cell)| StudentRecord {
                id: i.to_string(),
                final_mark: parse_final_mark(cell),
                raw: cell.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_distribution_counts_in_grade_order() {
        let records = records(&["90 HD", "78 DN", "80 DN", "45 FL", "0 AF", "", "55 ps"]);
        let dist = GradeDistribution::from_records(&records);

        let order: Vec<Grade> = dist.shares.iter().map(|s| s.grade).collect();
        assert_eq!(order, Grade::ALL.to_vec());
        assert_eq!(dist.count(Grade::HD), 1);
        assert_eq!(dist.count(Grade::DN), 2);
        assert_eq!(dist.count(Grade::CR), 0);
        assert_eq!(dist.count(Grade::PS), 1);
        assert_eq!(dist.count(Grade::FL), 1);
        assert_eq!(dist.graded, 5);
        assert_eq!(dist.ungraded, 2);
        assert_eq!(dist.unrecognized, vec!["AF".to_string()]);
        assert!((dist.percent(Grade::DN) - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_percentages_sum_to_hundred() {
        let records = records(&["90 HD", "70 CR", "71 CR"]);
        let dist = GradeDistribution::from_records(&records);

        let total: f64 = dist.shares.iter().map(|s| s.percent).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_graded_records() {
        let records = records(&["", "12"]);
        let dist = GradeDistribution::from_records(&records);

        assert_eq!(dist.graded, 0);
        assert_eq!(dist.ungraded, 2);
        assert!(dist.shares.iter().all(|s| s.percent == 0.0));
        assert_eq!(dist.pass_rate(), None);
    }

    #[test]
    fn test_pass_rate() {
        let records = records(&["90 HD", "45 FL", "60 PS", "20 FL"]);
        let dist = GradeDistribution::from_records(&records);
        assert_eq!(dist.pass_rate(), Some(50.0));
    }
}
