//! Capped, reproducible per-point prediction sampling

use crate::dataset::Dataset;
use crate::error::{Result, SweepError};
use crate::evaluation::{ModelResult, SplitEvaluator};
use serde::Serialize;

/// One sampled test-partition point with its model's flattened summary.
///
/// `values` holds the raw (non-standardized) feature values in the subset's
/// order, aligned with `result.features`.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionRecord {
    pub model_id: usize,
    pub features: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    pub train_fraction: f64,
    pub test_fraction: f64,
    pub mse: f64,
    pub rmse: f64,
    pub r2: f64,
    pub actual: f64,
    pub predicted: f64,
    pub values: Vec<f64>,
}

/// Rehydrates a ranked result into per-point prediction records.
///
/// The partition is re-derived from (split, run seed) and refit with the
/// evaluator's exact procedure, so no partition or prediction state has to
/// be stored between the search pass and the sampling pass. The row draw is
/// seeded from (run seed, model_id), making every sample byte-identical
/// across repeated calls and safe to run concurrently per model.
pub struct PredictionSampler<'a> {
    dataset: &'a Dataset,
    seed: u64,
    cap: usize,
}

impl<'a> PredictionSampler<'a> {
    /// Create a sampler with the run's seed and per-model point cap
    pub fn new(dataset: &'a Dataset, seed: u64, cap: usize) -> Result<Self> {
        if cap == 0 {
            return Err(SweepError::invalid_argument(
                "sample_cap",
                0,
                "must be positive",
            ));
        }
        Ok(Self { dataset, seed, cap })
    }

    /// Sample up to `cap` prediction records for one ranked result.
    ///
    /// `model_id` is the result's stable rank index for this run; it is both
    /// persisted and mixed into the draw seed.
    pub fn sample(&self, model_id: usize, result: &ModelResult) -> Result<Vec<PredictionRecord>> {
        let evaluator = SplitEvaluator::new(self.dataset, self.seed);
        let fitted = evaluator.fit_split(&result.features, result.split)?;

        let n_test = fitted.y_test.len();
        let rows: Vec<usize> = if n_test > self.cap {
            let mut rng = draw_rng(self.seed, model_id);
            rand::seq::index::sample(&mut rng, n_test, self.cap).into_vec()
        } else {
            (0..n_test).collect()
        };

        let n_features = result.features.len();
        let records = rows
            .into_iter()
            .map(|row| PredictionRecord {
                model_id,
                features: result.features.clone(),
                coefficients: result.coefficients.clone(),
                intercept: result.intercept,
                train_fraction: result.split.train_fraction(),
                test_fraction: result.split.test_fraction(),
                mse: result.mse,
                rmse: result.rmse,
                r2: result.r2,
                actual: fitted.y_test[row],
                predicted: fitted.y_pred[row],
                values: (0..n_features)
                    .map(|j| fitted.x_test_raw[[row, j]])
                    .collect(),
            })
            .collect();

        Ok(records)
    }
}

/// Generator for the row draw, deterministic in (run seed, model identity)
fn draw_rng(seed: u64, model_id: usize) -> rand_chacha::ChaCha8Rng {
    use rand::SeedableRng;
    let mixed = seed ^ (model_id as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    rand_chacha::ChaCha8Rng::seed_from_u64(mixed)
}
