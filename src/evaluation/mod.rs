//! Single-model evaluation: seeded splits, standardized fits, test metrics

mod evaluator;
mod metrics;
mod split;

pub use evaluator::{FittedSplit, SplitEvaluator};
pub use metrics::RegressionMetrics;
pub use split::{shuffle_split, Partition, SplitSpec};

use serde::{Deserialize, Serialize};

/// One evaluated (feature subset, split) pair.
///
/// Immutable after creation. `coefficients` holds exactly one entry per
/// feature in `features`, in the same order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelResult {
    /// Feature subset, in candidate-list order
    pub features: Vec<String>,
    /// Train/test split this result was evaluated under
    pub split: SplitSpec,
    /// Fitted coefficient per feature, aligned with `features`
    pub coefficients: Vec<f64>,
    /// Fitted intercept
    pub intercept: f64,
    /// Mean squared error on the test partition
    pub mse: f64,
    /// Root mean squared error on the test partition
    pub rmse: f64,
    /// Coefficient of determination on the test partition
    pub r2: f64,
}

impl ModelResult {
    /// Fitted coefficient for a named feature, if it is in the subset
    pub fn coefficient_for(&self, feature: &str) -> Option<f64> {
        self.features
            .iter()
            .position(|f| f == feature)
            .map(|i| self.coefficients[i])
    }

    /// Comma-delimited feature list, as persisted in the results table
    pub fn feature_list(&self) -> String {
        self.features.join(",")
    }
}
