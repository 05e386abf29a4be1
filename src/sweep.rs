//! End-to-end sweep orchestration

use crate::config::SweepConfig;
use crate::dataset::Dataset;
use crate::error::{Result, SweepError};
use crate::sampling::{PredictionRecord, PredictionSampler};
use crate::search::{ModelSearchDriver, RankedResultSet};
use crate::store::{ResultStoreWriter, RunMetadata, StorePaths};
use rayon::prelude::*;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

/// What a completed run produced, for callers that report on it
#[derive(Debug)]
pub struct SweepReport {
    pub ranked: RankedResultSet,
    pub metadata: RunMetadata,
    pub n_records: usize,
    pub n_skipped: usize,
    pub paths: StorePaths,
}

/// Runs the whole pipeline: enumerate, evaluate, rank, sample, persist.
pub struct SweepRunner {
    config: SweepConfig,
}

impl SweepRunner {
    /// Create a runner; the configuration is validated up front
    pub fn new(config: SweepConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Execute a full sweep against `dataset` and publish artifacts under
    /// `out_dir`.
    pub fn run(&self, dataset: &Dataset, out_dir: &Path) -> Result<SweepReport> {
        self.run_with_cancel(dataset, out_dir, &Arc::new(AtomicBool::new(false)))
    }

    /// Execute a sweep with a cooperative cancellation flag; a partial
    /// result set is ranked and persisted like a complete one.
    ///
    /// When a thread bound is configured, one pool is built here and both
    /// parallel stages (search fan-out and per-model sampling) run inside it.
    pub fn run_with_cancel(
        &self,
        dataset: &Dataset,
        out_dir: &Path,
        cancel: &Arc<AtomicBool>,
    ) -> Result<SweepReport> {
        match self.config.n_threads {
            Some(n) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| SweepError::ComputationError(e.to_string()))?;
                pool.install(|| self.execute(dataset, out_dir, cancel))
            }
            None => self.execute(dataset, out_dir, cancel),
        }
    }

    fn execute(
        &self,
        dataset: &Dataset,
        out_dir: &Path,
        cancel: &Arc<AtomicBool>,
    ) -> Result<SweepReport> {
        let driver = ModelSearchDriver::new(self.config.clone())?;
        let outcome = driver.search_on_current_pool(dataset, cancel)?;
        let n_skipped = outcome.skipped.len();

        let ranked = RankedResultSet::from_results(outcome.results);
        if let Some(best) = ranked.best() {
            info!(
                best_features = %best.feature_list(),
                best_split = %best.split.label(),
                best_r2 = best.r2,
                "ranking complete"
            );
        }

        // Model identity is the rank index, stable for this run
        let sampler =
            PredictionSampler::new(dataset, self.config.random_seed, self.config.sample_cap)?;
        let per_model: Vec<Vec<PredictionRecord>> = ranked
            .iter()
            .enumerate()
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|(model_id, result)| sampler.sample(model_id, result))
            .collect::<Result<Vec<_>>>()?;
        let records: Vec<PredictionRecord> = per_model.into_iter().flatten().collect();

        let metadata = RunMetadata::from_run(
            dataset.target_column(),
            &ranked,
            self.config.sample_cap,
            n_skipped,
        );

        let writer = ResultStoreWriter::new(out_dir, self.config.candidate_features.clone());
        let paths = writer.write_all(
            &records,
            &ranked,
            &metadata,
            &outcome.skipped,
            self.config.top_n,
        )?;

        Ok(SweepReport {
            n_records: records.len(),
            n_skipped,
            metadata,
            ranked,
            paths,
        })
    }
}
