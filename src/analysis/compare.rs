use log::{debug, warn};
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::analysis::distribution::GradeDistribution;
use crate::analysis::offering::natural_cmp;
use crate::analysis::stats::{Summary, describe};
use crate::core::types::{Grade, MarkTable, StudentRecord};

/// One student present in both offerings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparedStudent {
    pub id: String,
    pub mark_a: Option<f64>,
    pub grade_a: Option<Grade>,
    pub mark_b: Option<f64>,
    pub grade_b: Option<Grade>,
    /// `mark_b - mark_a` when both marks exist
    pub delta: Option<f64>,
}

/// Grade in A (rows) against grade in B (columns), both in `Grade::ALL` order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransitionMatrix {
    pub counts: [[usize; 5]; 5],
}

impl TransitionMatrix {
    pub fn get(&self, from: Grade, to: Grade) -> usize {
        self.counts[from.index()][to.index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }
}

/// Result of joining two offerings on student ID
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub label_a: String,
    pub label_b: String,
    pub common_ids: Vec<String>,
    pub only_in_a: Vec<String>,
    pub only_in_b: Vec<String>,
    /// Repeated IDs ignored in A (first occurrence kept)
    pub duplicates_a: usize,
    pub duplicates_b: usize,
    pub rows: Vec<ComparedStudent>,
    pub summary_a: Summary,
    pub summary_b: Summary,
    pub delta_summary: Summary,
    pub distribution_a: GradeDistribution,
    pub distribution_b: GradeDistribution,
    pub transitions: TransitionMatrix,
    pub improved: usize,
    pub declined: usize,
    pub unchanged: usize,
}

/// Index records by ID, keeping the first occurrence.
///
/// Returns the index and the number of repeated IDs skipped.
fn index_by_id(table: &MarkTable) -> (FxHashMap<&str, &StudentRecord>, usize) {
    let mut index = FxHashMap::default();
    let mut duplicates = 0;

    for record in table.records.iter().filter(|r| !r.id.is_empty()) {
        if index.contains_key(record.id.as_str()) {
            duplicates += 1;
        } else {
            index.insert(record.id.as_str(), record);
        }
    }

    if duplicates > 0 {
        warn!(
            "{} repeated student ID(s) in {}; keeping first occurrence",
            duplicates, table.label
        );
    }

    (index, duplicates)
}

fn sorted_ids<'a>(ids: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut ids: Vec<String> = ids.map(str::to_string).collect();
    ids.sort_by(|a, b| natural_cmp(a, b));
    ids
}

/// Join `a` and `b` on student ID and compare the common students
pub fn compare(a: &MarkTable, b: &MarkTable) -> Comparison {
    let (index_a, duplicates_a) = index_by_id(a);
    let (index_b, duplicates_b) = index_by_id(b);

    let common_ids = sorted_ids(
        index_a
            .keys()
            .filter(|id| index_b.contains_key(*id))
            .copied(),
    );
    let only_in_a = sorted_ids(
        index_a
            .keys()
            .filter(|id| !index_b.contains_key(*id))
            .copied(),
    );
    let only_in_b = sorted_ids(
        index_b
            .keys()
            .filter(|id| !index_a.contains_key(*id))
            .copied(),
    );

    debug!(
        "{} vs {}: {} common, {} only in first, {} only in second",
        a.label,
        b.label,
        common_ids.len(),
        only_in_a.len(),
        only_in_b.len()
    );

    let pairs: Vec<(&StudentRecord, &StudentRecord)> = common_ids
        .iter()
        .map(|id| (index_a[id.as_str()], index_b[id.as_str()]))
        .collect();

    let mut transitions = TransitionMatrix::default();
    let mut improved = 0;
    let mut declined = 0;
    let mut unchanged = 0;

    let rows: Vec<ComparedStudent> = pairs
        .iter()
        .map(|(ra, rb)| {
            let delta = match (ra.mark(), rb.mark()) {
                (Some(ma), Some(mb)) => Some(mb - ma),
                _ => None,
            };
            match delta {
                Some(d) if d > 0.0 => improved += 1,
                Some(d) if d < 0.0 => declined += 1,
                Some(_) => unchanged += 1,
                None => {}
            }
            if let (Some(ga), Some(gb)) = (ra.grade(), rb.grade()) {
                transitions.counts[ga.index()][gb.index()] += 1;
            }
            ComparedStudent {
                id: ra.id.clone(),
                mark_a: ra.mark(),
                grade_a: ra.grade(),
                mark_b: rb.mark(),
                grade_b: rb.grade(),
                delta,
            }
        })
        .collect();

    let marks_a: Vec<f64> = rows.iter().filter_map(|r| r.mark_a).collect();
    let marks_b: Vec<f64> = rows.iter().filter_map(|r| r.mark_b).collect();
    let deltas: Vec<f64> = rows.iter().filter_map(|r| r.delta).collect();

    Comparison {
        label_a: a.label.clone(),
        label_b: b.label.clone(),
        common_ids,
        only_in_a,
        only_in_b,
        duplicates_a,
        duplicates_b,
        summary_a: describe(&marks_a),
        summary_b: describe(&marks_b),
        delta_summary: describe(&deltas),
        distribution_a: GradeDistribution::from_records(pairs.iter().map(|(ra, _)| *ra)),
        distribution_b: GradeDistribution::from_records(pairs.iter().map(|(_, rb)| *rb)),
        rows,
        transitions,
        improved,
        declined,
        unchanged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marks::TableOptions;

    fn table(label: &str, rows: &[(&str, &str)]) -> MarkTable {
        let mut content = String::from("Student ID,Final Mark\nPoints Possible,100\n");
        for (id, mark) in rows {
            content.push_str(&format!("{id},{mark}\n"));
        }
        MarkTable::from_reader(content.as_bytes(), label, "inline", &TableOptions::default())
            .expect("fixture should parse")
    }

    fn fixtures() -> (MarkTable, MarkTable) {
        let a = table(
            "2019",
            &[
                ("10", "70 CR"),
                ("2", "50 PS"),
                ("3", "90 HD"),
                ("4", "40 FL"),
                ("2", "99 HD"),
            ],
        );
        let b = table(
            "2020",
            &[("2", "60 PS"), ("3", "80 DN"), ("10", "70 CR"), ("5", "77 DN")],
        );
        (a, b)
    }

    #[test]
    fn test_compare_sets() {
        let (a, b) = fixtures();
        let comparison = compare(&a, &b);

        assert_eq!(comparison.common_ids, vec!["2", "3", "10"]);
        assert_eq!(comparison.only_in_a, vec!["4"]);
        assert_eq!(comparison.only_in_b, vec!["5"]);
        assert_eq!(comparison.duplicates_a, 1);
        assert_eq!(comparison.duplicates_b, 0);
    }

    #[test]
    fn test_compare_rows_use_first_occurrence() {
        let (a, b) = fixtures();
        let comparison = compare(&a, &b);

        let row = &comparison.rows[0];
        assert_eq!(row.id, "2");
        assert_eq!(row.mark_a, Some(50.0));
        assert_eq!(row.mark_b, Some(60.0));
        assert_eq!(row.delta, Some(10.0));
    }

    #[test]
    fn test_compare_counts_and_transitions() {
        let (a, b) = fixtures();
        let comparison = compare(&a, &b);

        assert_eq!(comparison.improved, 1);
        assert_eq!(comparison.declined, 1);
        assert_eq!(comparison.unchanged, 1);
        assert_eq!(comparison.transitions.get(Grade::HD, Grade::DN), 1);
        assert_eq!(comparison.transitions.get(Grade::PS, Grade::PS), 1);
        assert_eq!(comparison.transitions.get(Grade::CR, Grade::CR), 1);
        assert_eq!(comparison.transitions.total(), 3);
        assert_eq!(comparison.summary_a.count, 3);
        assert_eq!(comparison.summary_a.mean, Some(70.0));
        assert_eq!(comparison.delta_summary.median, Some(0.0));
        assert_eq!(comparison.distribution_b.count(Grade::DN), 1);
        assert_eq!(comparison.distribution_b.graded, 3);
    }

    #[test]
    fn test_compare_is_symmetric() {
        let (a, b) = fixtures();
        let forward = compare(&a, &b);
        let backward = compare(&b, &a);

        assert_eq!(forward.common_ids, backward.common_ids);
        assert_eq!(forward.only_in_a, backward.only_in_b);
        assert_eq!(forward.only_in_b, backward.only_in_a);
        for (f, r) in forward.rows.iter().zip(&backward.rows) {
            assert_eq!(f.delta, r.delta.map(|d| -d));
        }
    }

    #[test]
    fn test_compare_blank_ids_are_excluded() {
        let a = table("a", &[("", "70 CR"), ("1", "60 PS")]);
        let b = table("b", &[("", "70 CR"), ("1", "65 CR")]);
        let comparison = compare(&a, &b);

        assert_eq!(comparison.common_ids, vec!["1"]);
        assert!(comparison.only_in_a.is_empty());
    }

    #[test]
    fn test_compare_without_common_students() {
        let a = table("a", &[("1", "60 PS")]);
        let b = table("b", &[("2", "65 CR")]);
        let comparison = compare(&a, &b);

        assert!(comparison.common_ids.is_empty());
        assert!(comparison.rows.is_empty());
        assert_eq!(comparison.summary_a.count, 0);
        assert_eq!(comparison.transitions.total(), 0);
    }
}
