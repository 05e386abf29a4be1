//! Ordinary least squares linear regression

use crate::error::{Result, SweepError};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Cholesky factorization of a symmetric positive-definite matrix.
/// Returns the lower triangular factor, or None if the matrix is not PD.
fn cholesky(a: &Array2<f64>) -> Option<Array2<f64>> {
    let n = a.nrows();
    let mut l = Array2::zeros((n, n));

    for i in 0..n {
        for j in 0..=i {
            let sum: f64 = (0..j).map(|k| l[[i, k]] * l[[j, k]]).sum();
            if i == j {
                let diag = a[[i, i]] - sum;
                if diag <= 0.0 {
                    return None;
                }
                l[[i, j]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }
    Some(l)
}

/// Solve A x = b given the lower Cholesky factor of A.
fn solve_with_factor(l: &Array2<f64>, b: &Array1<f64>) -> Array1<f64> {
    let n = l.nrows();

    // Forward substitution: L y = b
    let mut y = Array1::zeros(n);
    for i in 0..n {
        let sum: f64 = (0..i).map(|j| l[[i, j]] * y[j]).sum();
        y[i] = (b[i] - sum) / l[[i, i]];
    }

    // Backward substitution: L^T x = y
    let mut x = Array1::zeros(n);
    for i in (0..n).rev() {
        let sum: f64 = ((i + 1)..n).map(|j| l[[j, i]] * x[j]).sum();
        x[i] = (y[i] - sum) / l[[i, i]];
    }
    x
}

/// Solve the normal equations (X^T X) w = X^T y.
///
/// Retries once with a small ridge jitter on the diagonal when the Gram
/// matrix is not positive definite (collinear or constant columns).
fn solve_normal_equations(x: &Array2<f64>, y: &Array1<f64>) -> Result<Array1<f64>> {
    let xtx = x.t().dot(x);
    let xty = x.t().dot(y);
    let n = xtx.nrows();

    if let Some(l) = cholesky(&xtx) {
        return Ok(solve_with_factor(&l, &xty));
    }

    let mut jittered = xtx.clone();
    let ridge = 1e-8 * xtx.diag().iter().map(|v| v.abs()).sum::<f64>() / n as f64;
    for k in 0..n {
        jittered[[k, k]] += ridge.max(1e-12);
    }

    match cholesky(&jittered) {
        Some(l) => Ok(solve_with_factor(&l, &xty)),
        None => Err(SweepError::ComputationError(
            "normal equations are singular, cannot solve least squares".to_string(),
        )),
    }
}

/// Ordinary least squares with an intercept.
///
/// Inputs are expected to be standardized features; the target stays raw.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegression {
    coefficients: Option<Vec<f64>>,
    intercept: Option<f64>,
    is_fitted: bool,
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearRegression {
    /// Create an unfitted model
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: None,
            is_fitted: false,
        }
    }

    /// Fit on training data
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        if x.nrows() != y.len() {
            return Err(SweepError::DataError(format!(
                "feature matrix has {} rows, target has {}",
                x.nrows(),
                y.len()
            )));
        }
        if x.nrows() == 0 {
            return Err(SweepError::DataError(
                "cannot fit on an empty training partition".to_string(),
            ));
        }

        // Center, solve for slopes, then recover the intercept
        let x_mean = x
            .mean_axis(Axis(0))
            .ok_or_else(|| SweepError::ComputationError("mean of empty axis".to_string()))?;
        let y_mean = y.mean().unwrap_or(0.0);

        let x_centered = x - &x_mean.clone().insert_axis(Axis(0));
        let y_centered = y - y_mean;

        let coefficients = solve_normal_equations(&x_centered, &y_centered)?;
        let intercept = y_mean - coefficients.dot(&x_mean);

        self.coefficients = Some(coefficients.to_vec());
        self.intercept = Some(intercept);
        self.is_fitted = true;
        Ok(self)
    }

    /// Predict for a feature matrix with the training column layout
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let coefficients = self.coefficients.as_ref().ok_or(SweepError::NotFitted)?;
        let intercept = self.intercept.ok_or(SweepError::NotFitted)?;

        let w = Array1::from_vec(coefficients.clone());
        Ok(x.dot(&w) + intercept)
    }

    /// Fitted slope per feature, in training column order
    pub fn coefficients(&self) -> Result<&[f64]> {
        self.coefficients
            .as_deref()
            .ok_or(SweepError::NotFitted)
    }

    /// Fitted intercept
    pub fn intercept(&self) -> Result<f64> {
        self.intercept.ok_or(SweepError::NotFitted)
    }
}
