//! Evaluation of one (feature subset, split) pair

use super::{shuffle_split, ModelResult, Partition, RegressionMetrics, SplitSpec};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::preprocessing::Standardizer;
use crate::training::LinearRegression;
use ndarray::{Array1, Array2, Axis};

/// A refit of one result's exact partition, with everything the sampler
/// needs: the test rows' original indices, raw feature values, actuals and
/// predictions.
#[derive(Debug, Clone)]
pub struct FittedSplit {
    pub partition: Partition,
    pub model: LinearRegression,
    pub x_test_raw: Array2<f64>,
    pub y_test: Array1<f64>,
    pub y_pred: Array1<f64>,
}

/// Fits and scores a single feature subset under a single split.
///
/// The whole run shares one seed; the split derivation is deterministic so
/// the sampler can reconstruct the identical partition later.
pub struct SplitEvaluator<'a> {
    dataset: &'a Dataset,
    seed: u64,
}

impl<'a> SplitEvaluator<'a> {
    /// Create an evaluator over a dataset with the run's fixed seed
    pub fn new(dataset: &'a Dataset, seed: u64) -> Self {
        Self { dataset, seed }
    }

    /// Evaluate one pair and return its immutable result record
    pub fn evaluate(&self, features: &[String], split: SplitSpec) -> Result<ModelResult> {
        let fitted = self.fit_split(features, split)?;
        let metrics = RegressionMetrics::compute(&fitted.y_test, &fitted.y_pred);

        Ok(ModelResult {
            features: features.to_vec(),
            split,
            coefficients: fitted.model.coefficients()?.to_vec(),
            intercept: fitted.model.intercept()?,
            mse: metrics.mse,
            rmse: metrics.rmse,
            r2: metrics.r2,
        })
    }

    /// Derive the partition, standardize on the training statistics, fit and
    /// predict. Shared between first-pass evaluation and sampling-time refit
    /// so both produce bit-identical numbers.
    pub fn fit_split(&self, features: &[String], split: SplitSpec) -> Result<FittedSplit> {
        self.dataset.validate_schema(features)?;

        let x = self.dataset.feature_matrix(features)?;
        let y = self.dataset.target()?;

        let partition = shuffle_split(self.dataset.n_rows(), split, self.seed)?;

        let x_train = x.select(Axis(0), &partition.train_indices);
        let x_test_raw = x.select(Axis(0), &partition.test_indices);
        let y_train = y.select(Axis(0), &partition.train_indices);
        let y_test = y.select(Axis(0), &partition.test_indices);

        let mut standardizer = Standardizer::new();
        let x_train_scaled = standardizer.fit_transform(&x_train)?;
        let x_test_scaled = standardizer.transform(&x_test_raw)?;

        let mut model = LinearRegression::new();
        model.fit(&x_train_scaled, &y_train)?;
        let y_pred = model.predict(&x_test_scaled)?;

        Ok(FittedSplit {
            partition,
            model,
            x_test_raw,
            y_test,
            y_pred,
        })
    }
}
