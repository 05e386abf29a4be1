//! Ranking of evaluated models by goodness of fit

use crate::evaluation::ModelResult;
use std::cmp::Ordering;

/// The full model collection ordered by R² descending.
///
/// The sort is stable, so ties keep the driver's enumeration order and two
/// rankings of the same collection are always identical. NaN R² (a fit that
/// produced no usable score) sorts last.
#[derive(Debug, Clone)]
pub struct RankedResultSet {
    results: Vec<ModelResult>,
}

impl RankedResultSet {
    /// Rank a result collection. Input order is the tie-break.
    pub fn from_results(mut results: Vec<ModelResult>) -> Self {
        results.sort_by(|a, b| compare_r2_desc(a.r2, b.r2));
        Self { results }
    }

    /// The first `n` entries; the full set when `n` exceeds the size.
    pub fn top_n(&self, n: usize) -> &[ModelResult] {
        &self.results[..n.min(self.results.len())]
    }

    /// The best-fitting model, if any results exist
    pub fn best(&self) -> Option<&ModelResult> {
        self.results.first()
    }

    /// All results in ranked order
    pub fn iter(&self) -> impl Iterator<Item = &ModelResult> {
        self.results.iter()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

fn compare_r2_desc(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}
