//! Per-feature standardization with train-partition statistics

use crate::error::{Result, SweepError};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Z-score standardizer: (x - mean) / std.
///
/// Statistics are always computed from the training partition and applied
/// unchanged to the test partition, so no test information leaks into the
/// transform. A zero-variance training feature gets a unit scale, which maps
/// every training value to exactly 0 instead of dividing by zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Standardizer {
    means: Vec<f64>,
    scales: Vec<f64>,
    is_fitted: bool,
}

impl Default for Standardizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Standardizer {
    /// Create an unfitted standardizer
    pub fn new() -> Self {
        Self {
            means: Vec::new(),
            scales: Vec::new(),
            is_fitted: false,
        }
    }

    /// Fit to a training matrix, one (mean, std) pair per column.
    ///
    /// Uses population statistics (ddof = 0).
    pub fn fit(&mut self, x_train: &Array2<f64>) -> Result<&mut Self> {
        if x_train.nrows() == 0 {
            return Err(SweepError::DataError(
                "cannot fit standardizer on an empty training partition".to_string(),
            ));
        }

        let means = x_train
            .mean_axis(Axis(0))
            .ok_or_else(|| SweepError::ComputationError("mean of empty axis".to_string()))?;
        let stds = x_train.std_axis(Axis(0), 0.0);

        self.means = means.to_vec();
        self.scales = stds
            .iter()
            .map(|&s| if s == 0.0 { 1.0 } else { s })
            .collect();
        self.is_fitted = true;
        Ok(self)
    }

    /// Apply the fitted transform to any matrix with the same column layout
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(SweepError::NotFitted);
        }
        if x.ncols() != self.means.len() {
            return Err(SweepError::DataError(format!(
                "standardizer fitted on {} columns, input has {}",
                self.means.len(),
                x.ncols()
            )));
        }

        let mut out = x.clone();
        for (j, mut col) in out.axis_iter_mut(Axis(1)).enumerate() {
            let mean = self.means[j];
            let scale = self.scales[j];
            col.mapv_inplace(|v| (v - mean) / scale);
        }
        Ok(out)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, x_train: &Array2<f64>) -> Result<Array2<f64>> {
        self.fit(x_train)?;
        self.transform(x_train)
    }

    /// Per-column means computed at fit time
    pub fn means(&self) -> &[f64] {
        &self.means
    }

    /// Per-column scales computed at fit time
    pub fn scales(&self) -> &[f64] {
        &self.scales
    }
}
