//! Artifact writing with a stable union schema and atomic publishing

use crate::error::{Result, SweepError};
use crate::sampling::PredictionRecord;
use crate::search::{RankedResultSet, SkippedPair};
use polars::prelude::*;
use serde_json::json;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

/// One-row summary of a completed run
#[derive(Debug, Clone, serde::Serialize)]
pub struct RunMetadata {
    pub target: String,
    pub total_models: usize,
    pub best_r2: f64,
    pub best_features: String,
    pub best_split: String,
    pub generated_date: String,
    pub max_points_per_model: usize,
    pub n_skipped: usize,
}

impl RunMetadata {
    /// Summarize a ranked run. An empty ranking (fully cancelled run) still
    /// produces a valid row with zeroed best-model fields.
    pub fn from_run(
        target: impl Into<String>,
        ranked: &RankedResultSet,
        sample_cap: usize,
        n_skipped: usize,
    ) -> Self {
        let (best_r2, best_features, best_split) = match ranked.best() {
            Some(best) => (best.r2, best.feature_list(), best.split.label()),
            None => (f64::NAN, String::new(), String::new()),
        };

        Self {
            target: target.into(),
            total_models: ranked.len(),
            best_r2,
            best_features,
            best_split,
            generated_date: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            max_points_per_model: sample_cap,
            n_skipped,
        }
    }
}

/// Paths of the published artifacts
#[derive(Debug, Clone)]
pub struct StorePaths {
    pub predictions: PathBuf,
    pub metadata: PathBuf,
    pub top_models: PathBuf,
}

/// Writes the three run artifacts.
///
/// The predictions table carries a schema-union column set: one `coef_<f>`
/// and one `value_<f>` column for every feature in the run's universe, with
/// null marking "not applicable", so every row has the identical column
/// count regardless of which subset produced it. All artifacts are staged as
/// temporary siblings first and only renamed into place once every write has
/// succeeded, so a failed run publishes nothing.
pub struct ResultStoreWriter {
    out_dir: PathBuf,
    feature_universe: Vec<String>,
}

impl ResultStoreWriter {
    /// Create a writer targeting `out_dir`, with the run's full candidate
    /// feature list as the column universe.
    pub fn new(out_dir: impl Into<PathBuf>, feature_universe: Vec<String>) -> Self {
        Self {
            out_dir: out_dir.into(),
            feature_universe,
        }
    }

    /// Write all three artifacts; fatal on the first failure, and a failure
    /// at any point publishes nothing.
    pub fn write_all(
        &self,
        records: &[PredictionRecord],
        ranked: &RankedResultSet,
        metadata: &RunMetadata,
        skipped: &[SkippedPair],
        top_n: usize,
    ) -> Result<StorePaths> {
        std::fs::create_dir_all(&self.out_dir)
            .map_err(|e| SweepError::StorageFailure(e.to_string()))?;

        const NAMES: [&str; 3] = [
            "model_results.parquet",
            "model_metadata.parquet",
            "top_models.json",
        ];
        let tmp_path = |name: &str| self.out_dir.join(format!("{name}.tmp"));

        let mut predictions = self.predictions_frame(records)?;
        let mut meta_frame = metadata_frame(metadata)?;
        let document = top_models_document(ranked, metadata, skipped, top_n);

        // Stage every artifact before any rename: the store is published
        // all-or-nothing.
        let mut stage_all = || -> Result<()> {
            write_parquet(&tmp_path(NAMES[0]), &mut predictions)?;
            write_parquet(&tmp_path(NAMES[1]), &mut meta_frame)?;
            write_json(&tmp_path(NAMES[2]), &document)?;
            Ok(())
        };
        if let Err(e) = stage_all() {
            for name in NAMES {
                let _ = std::fs::remove_file(tmp_path(name));
            }
            return Err(e);
        }

        let mut published: Vec<PathBuf> = Vec::with_capacity(NAMES.len());
        for name in NAMES {
            let final_path = self.out_dir.join(name);
            if let Err(e) = std::fs::rename(tmp_path(name), &final_path) {
                // Roll back: drop unrenamed stages and anything already
                // renamed, leaving the directory as it was.
                for name in NAMES {
                    let _ = std::fs::remove_file(tmp_path(name));
                }
                for path in &published {
                    let _ = std::fs::remove_file(path);
                }
                return Err(SweepError::StorageFailure(e.to_string()));
            }
            published.push(final_path);
        }

        info!(
            n_records = records.len(),
            n_models = ranked.len(),
            out_dir = %self.out_dir.display(),
            "published result store"
        );

        Ok(StorePaths {
            predictions: self.out_dir.join(NAMES[0]),
            metadata: self.out_dir.join(NAMES[1]),
            top_models: self.out_dir.join(NAMES[2]),
        })
    }

    /// Flatten records into the stable union schema: common columns first,
    /// then `coef_<f>` per universe feature, then actual/predicted, then
    /// `value_<f>` per universe feature.
    fn predictions_frame(&self, records: &[PredictionRecord]) -> Result<DataFrame> {
        let n = records.len();

        let mut model_id = Vec::with_capacity(n);
        let mut features = Vec::with_capacity(n);
        let mut num_features = Vec::with_capacity(n);
        let mut train_size = Vec::with_capacity(n);
        let mut test_size = Vec::with_capacity(n);
        let mut mse = Vec::with_capacity(n);
        let mut rmse = Vec::with_capacity(n);
        let mut r2 = Vec::with_capacity(n);
        let mut intercept = Vec::with_capacity(n);
        let mut actual = Vec::with_capacity(n);
        let mut predicted = Vec::with_capacity(n);

        for record in records {
            model_id.push(record.model_id as i64);
            features.push(record.features.join(","));
            num_features.push(record.features.len() as i64);
            train_size.push(record.train_fraction);
            test_size.push(record.test_fraction);
            mse.push(record.mse);
            rmse.push(record.rmse);
            r2.push(record.r2);
            intercept.push(record.intercept);
            actual.push(record.actual);
            predicted.push(record.predicted);
        }

        let mut columns = vec![
            Column::new("model_id".into(), model_id),
            Column::new("features".into(), features),
            Column::new("num_features".into(), num_features),
            Column::new("train_size".into(), train_size),
            Column::new("test_size".into(), test_size),
            Column::new("mse".into(), mse),
            Column::new("rmse".into(), rmse),
            Column::new("r2".into(), r2),
            Column::new("intercept".into(), intercept),
        ];

        for feature in &self.feature_universe {
            let coefs: Vec<Option<f64>> = records
                .iter()
                .map(|record| {
                    record
                        .features
                        .iter()
                        .position(|f| f == feature)
                        .map(|i| record.coefficients[i])
                })
                .collect();
            columns.push(Column::new(format!("coef_{feature}").into(), coefs));
        }

        columns.push(Column::new("actual".into(), actual));
        columns.push(Column::new("predicted".into(), predicted));

        for feature in &self.feature_universe {
            let values: Vec<Option<f64>> = records
                .iter()
                .map(|record| {
                    record
                        .features
                        .iter()
                        .position(|f| f == feature)
                        .map(|i| record.values[i])
                })
                .collect();
            columns.push(Column::new(format!("value_{feature}").into(), values));
        }

        DataFrame::new(columns).map_err(|e| SweepError::StorageFailure(e.to_string()))
    }
}

fn write_parquet(path: &Path, frame: &mut DataFrame) -> Result<()> {
    let file = File::create(path).map_err(|e| SweepError::StorageFailure(e.to_string()))?;
    ParquetWriter::new(file)
        .finish(frame)
        .map_err(|e| SweepError::StorageFailure(e.to_string()))?;
    Ok(())
}

fn write_json(path: &Path, document: &serde_json::Value) -> Result<()> {
    let text = serde_json::to_string_pretty(document)?;
    std::fs::write(path, text).map_err(|e| SweepError::StorageFailure(e.to_string()))?;
    Ok(())
}

fn metadata_frame(metadata: &RunMetadata) -> Result<DataFrame> {
    let frame = df!(
        "target" => &[metadata.target.clone()],
        "total_models" => &[metadata.total_models as i64],
        "best_r2" => &[metadata.best_r2],
        "best_features" => &[metadata.best_features.clone()],
        "best_split" => &[metadata.best_split.clone()],
        "generated_date" => &[metadata.generated_date.clone()],
        "max_points_per_model" => &[metadata.max_points_per_model as i64],
        "n_skipped" => &[metadata.n_skipped as i64]
    )
    .map_err(|e| SweepError::StorageFailure(e.to_string()))?;
    Ok(frame)
}

/// Summary-level document for consumers that never touch the point table
fn top_models_document(
    ranked: &RankedResultSet,
    metadata: &RunMetadata,
    skipped: &[SkippedPair],
    top_n: usize,
) -> serde_json::Value {
    let top_models: Vec<serde_json::Value> = ranked
        .top_n(top_n)
        .iter()
        .map(|result| {
            let mut coefficients = serde_json::Map::new();
            for (feature, coef) in result.features.iter().zip(result.coefficients.iter()) {
                coefficients.insert(feature.clone(), json!(coef));
            }
            json!({
                "features": result.features,
                "train_size": result.split.label(),
                "mse": result.mse,
                "rmse": result.rmse,
                "r2": result.r2,
                "coefficients": coefficients,
                "intercept": result.intercept,
            })
        })
        .collect();

    json!({
        "target": metadata.target,
        "top_models": top_models,
        "metadata": {
            "total_models": metadata.total_models,
            "best_r2": metadata.best_r2,
            "best_features": metadata.best_features,
            "best_split": metadata.best_split,
            "generated_date": metadata.generated_date,
            "max_points_per_model": metadata.max_points_per_model,
            "skipped_pairs": skipped,
        },
    })
}
