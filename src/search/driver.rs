//! Parallel fan-out over (subset, split) pairs

use super::FeatureCombinations;
use crate::config::SweepConfig;
use crate::dataset::Dataset;
use crate::error::{Result, SweepError};
use crate::evaluation::{ModelResult, SplitEvaluator, SplitSpec};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A (subset, split) pair the driver skipped under best-effort policy
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SkippedPair {
    pub features: Vec<String>,
    pub split: SplitSpec,
    pub reason: String,
}

/// Everything a driver run produced. `results` keeps enumeration order, which
/// the ranker uses as its tie-break; a partial set (after cancellation) is
/// still valid ranking input.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub results: Vec<ModelResult>,
    pub skipped: Vec<SkippedPair>,
    pub cancelled: bool,
}

/// Drives the enumerator, crossed with the configured splits, through the
/// evaluator.
///
/// Each evaluation is pure and independent, so the fan-out runs on rayon;
/// results are reassembled in enumeration order afterwards.
pub struct ModelSearchDriver {
    config: SweepConfig,
}

impl ModelSearchDriver {
    /// Create a driver; the configuration is validated up front
    pub fn new(config: SweepConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Run the full sweep
    pub fn run(&self, dataset: &Dataset) -> Result<SearchOutcome> {
        self.run_with_cancel(dataset, &Arc::new(AtomicBool::new(false)))
    }

    /// Run the sweep with a cooperative cancellation flag. Pairs not yet
    /// evaluated when the flag flips are dropped; already-collected results
    /// are returned intact.
    pub fn run_with_cancel(
        &self,
        dataset: &Dataset,
        cancel: &Arc<AtomicBool>,
    ) -> Result<SearchOutcome> {
        match self.config.n_threads {
            Some(n) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| SweepError::ComputationError(e.to_string()))?;
                pool.install(|| self.search_on_current_pool(dataset, cancel))
            }
            None => self.search_on_current_pool(dataset, cancel),
        }
    }

    /// Run the fan-out on whatever rayon pool is current. The orchestrator
    /// installs one bounded pool for the whole run and calls this directly,
    /// so search and sampling share the same workers.
    pub(crate) fn search_on_current_pool(
        &self,
        dataset: &Dataset,
        cancel: &Arc<AtomicBool>,
    ) -> Result<SearchOutcome> {
        dataset.validate_schema(&self.config.candidate_features)?;

        let splits = self.config.split_specs()?;
        let jobs: Vec<(Vec<String>, SplitSpec)> = FeatureCombinations::new(
            &self.config.candidate_features,
            self.config.max_subset_size,
        )
        .flat_map(|subset| splits.iter().map(move |&split| (subset.clone(), split)))
        .collect();

        info!(
            n_subsets = jobs.len() / splits.len(),
            n_splits = splits.len(),
            n_jobs = jobs.len(),
            "starting model search"
        );

        let evaluator = SplitEvaluator::new(dataset, self.config.random_seed);

        let evaluate_all = || -> Vec<(usize, std::result::Result<ModelResult, SkippedPair>)> {
            jobs.par_iter()
                .enumerate()
                .filter_map(|(idx, (features, split))| {
                    if cancel.load(Ordering::Relaxed) {
                        return None;
                    }
                    let outcome = evaluator.evaluate(features, *split).map_err(|e| {
                        SkippedPair {
                            features: features.clone(),
                            split: *split,
                            reason: e.to_string(),
                        }
                    });
                    Some((idx, outcome))
                })
                .collect()
        };

        let mut evaluated = evaluate_all();

        // Parallel collection scrambles order; restore the enumeration order
        // the ranker's tie-break depends on.
        evaluated.sort_by_key(|(idx, _)| *idx);
        let cancelled = evaluated.len() < jobs.len();

        let mut results = Vec::with_capacity(evaluated.len());
        let mut skipped = Vec::new();
        for (_, outcome) in evaluated {
            match outcome {
                Ok(result) => results.push(result),
                Err(pair) => {
                    if self.config.fail_fast {
                        return Err(SweepError::ComputationError(format!(
                            "evaluation failed for [{}] at {}: {}",
                            pair.features.join(","),
                            pair.split.label(),
                            pair.reason
                        )));
                    }
                    warn!(
                        features = %pair.features.join(","),
                        split = %pair.split.label(),
                        reason = %pair.reason,
                        "skipping failed evaluation"
                    );
                    skipped.push(pair);
                }
            }
        }

        debug!(
            n_results = results.len(),
            n_skipped = skipped.len(),
            cancelled,
            "model search finished"
        );

        Ok(SearchOutcome {
            results,
            skipped,
            cancelled,
        })
    }

    /// The configuration this driver runs with
    pub fn config(&self) -> &SweepConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn dataset() -> Dataset {
        let n = 50;
        let a: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let b: Vec<f64> = (0..n).map(|i| ((i * 13) % 17) as f64).collect();
        let y: Vec<f64> = a
            .iter()
            .zip(b.iter())
            .map(|(a, b)| 2.0 * a - b + 3.0)
            .collect();
        Dataset::new(df!("a" => a, "b" => b, "y" => y).unwrap(), "y").unwrap()
    }

    fn config() -> SweepConfig {
        SweepConfig::new("y", vec!["a".to_string(), "b".to_string()])
            .with_max_subset_size(2)
            .with_test_fractions(vec![0.3, 0.2])
    }

    #[test]
    fn test_run_produces_full_cross_product() {
        let driver = ModelSearchDriver::new(config()).unwrap();
        let outcome = driver.run(&dataset()).unwrap();

        // 3 subsets x 2 splits
        assert_eq!(outcome.results.len(), 6);
        assert!(outcome.skipped.is_empty());
        assert!(!outcome.cancelled);
    }

    #[test]
    fn test_results_keep_enumeration_order() {
        let driver = ModelSearchDriver::new(config()).unwrap();
        let outcome = driver.run(&dataset()).unwrap();

        let keys: Vec<(String, String)> = outcome
            .results
            .iter()
            .map(|r| (r.feature_list(), r.split.label()))
            .collect();

        assert_eq!(
            keys,
            vec![
                ("a".to_string(), "70-30".to_string()),
                ("a".to_string(), "80-20".to_string()),
                ("b".to_string(), "70-30".to_string()),
                ("b".to_string(), "80-20".to_string()),
                ("a,b".to_string(), "70-30".to_string()),
                ("a,b".to_string(), "80-20".to_string()),
            ]
        );
    }

    #[test]
    fn test_missing_candidate_aborts_before_fitting() {
        let bad = SweepConfig::new("y", vec!["a".to_string(), "ghost".to_string()]);
        let driver = ModelSearchDriver::new(bad).unwrap();
        let result = driver.run(&dataset());
        assert!(matches!(result, Err(SweepError::SchemaMismatch(_))));
    }

    #[test]
    fn test_pre_cancelled_run_returns_empty_partial() {
        let driver = ModelSearchDriver::new(config()).unwrap();
        let cancel = Arc::new(AtomicBool::new(true));
        let outcome = driver.run_with_cancel(&dataset(), &cancel).unwrap();

        assert!(outcome.results.is_empty());
        assert!(outcome.cancelled);
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let config = SweepConfig::new("y", vec![]);
        assert!(ModelSearchDriver::new(config).is_err());
    }

    #[test]
    fn test_bounded_thread_pool_gives_same_results() {
        let unbounded = ModelSearchDriver::new(config()).unwrap();
        let bounded = ModelSearchDriver::new(config().with_threads(2)).unwrap();

        let ds = dataset();
        let a = unbounded.run(&ds).unwrap();
        let b = bounded.run(&ds).unwrap();

        assert_eq!(a.results.len(), b.results.len());
        for (ra, rb) in a.results.iter().zip(b.results.iter()) {
            assert_eq!(ra.r2.to_bits(), rb.r2.to_bits());
        }
    }
}
