use serde::Serialize;
use statrs::statistics::Statistics;

/// Descriptive statistics of a set of marks.
///
/// Mirrors the usual `describe()` columns: count, mean, sample standard
/// deviation, min, quartiles and max.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (n - 1); needs at least two values
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub q3: Option<f64>,
    pub max: Option<f64>,
}

/// Summarize `values`; NaNs are ignored
pub fn describe(values: &[f64]) -> Summary {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return Summary::default();
    }
    sorted.sort_by(f64::total_cmp);

    let count = sorted.len();
    let std = if count > 1 {
        Some(Statistics::std_dev(&sorted))
    } else {
        None
    };

    Summary {
        count,
        mean: Some(Statistics::mean(&sorted)),
        std,
        min: Some(Statistics::min(&sorted)),
        q1: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q3: quantile(&sorted, 0.75),
        max: Some(Statistics::max(&sorted)),
    }
}

/// Quantile of already sorted values, interpolating linearly between the
/// two closest ranks at position `(n - 1) * p`
pub fn quantile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&p) {
        return None;
    }

    let position = (sorted.len() - 1) as f64 * p;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}
