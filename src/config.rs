//! Sweep configuration

use crate::error::{Result, SweepError};
use crate::evaluation::SplitSpec;
use serde::{Deserialize, Serialize};

/// Configuration for an exhaustive feature-combination sweep.
///
/// All run parameters are threaded explicitly; there is no process-wide
/// mutable configuration and no implicit RNG state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Target column name
    pub target_column: String,

    /// Candidate feature columns the enumerator draws subsets from
    pub candidate_features: Vec<String>,

    /// Maximum subset size (K); subsets of size 1..=K are evaluated
    pub max_subset_size: usize,

    /// Test fractions evaluated for every subset
    pub test_fractions: Vec<f64>,

    /// Seed reused for both the initial split and the later re-derivation
    /// at sampling time
    pub random_seed: u64,

    /// Maximum prediction points sampled per model
    pub sample_cap: usize,

    /// Number of models carried into the structured top-models document
    pub top_n: usize,

    /// Abort on the first failing (subset, split) pair instead of skipping it
    pub fail_fast: bool,

    /// Number of worker threads (None = rayon default)
    pub n_threads: Option<usize>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            target_column: "target".to_string(),
            candidate_features: Vec::new(),
            max_subset_size: 4,
            test_fractions: vec![0.4, 0.3, 0.2, 0.1],
            random_seed: 42,
            sample_cap: 1000,
            top_n: 10,
            fail_fast: false,
            n_threads: None,
        }
    }
}

impl SweepConfig {
    /// Create a configuration for a target column and candidate feature list
    pub fn new(target: impl Into<String>, candidate_features: Vec<String>) -> Self {
        Self {
            target_column: target.into(),
            candidate_features,
            ..Self::default()
        }
    }

    /// Set the maximum subset size
    pub fn with_max_subset_size(mut self, k: usize) -> Self {
        self.max_subset_size = k;
        self
    }

    /// Set the test fractions to evaluate
    pub fn with_test_fractions(mut self, fractions: Vec<f64>) -> Self {
        self.test_fractions = fractions;
        self
    }

    /// Set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    /// Set the per-model prediction sampling cap
    pub fn with_sample_cap(mut self, cap: usize) -> Self {
        self.sample_cap = cap;
        self
    }

    /// Set the number of models in the top-models document
    pub fn with_top_n(mut self, n: usize) -> Self {
        self.top_n = n;
        self
    }

    /// Abort the sweep on the first evaluation failure
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Bound the worker pool
    pub fn with_threads(mut self, n: usize) -> Self {
        self.n_threads = Some(n);
        self
    }

    /// The split specs evaluated for every subset, in configuration order
    pub fn split_specs(&self) -> Result<Vec<SplitSpec>> {
        self.test_fractions
            .iter()
            .map(|&f| SplitSpec::new(f))
            .collect()
    }

    /// Fail fast on arguments the sweep cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.candidate_features.is_empty() {
            return Err(SweepError::invalid_argument(
                "candidate_features",
                "[]",
                "at least one candidate feature is required",
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for name in &self.candidate_features {
            if !seen.insert(name.as_str()) {
                return Err(SweepError::invalid_argument(
                    "candidate_features",
                    name,
                    "duplicate candidate feature",
                ));
            }
        }
        if self.max_subset_size == 0 {
            return Err(SweepError::invalid_argument(
                "max_subset_size",
                0,
                "must be at least 1",
            ));
        }
        if self.test_fractions.is_empty() {
            return Err(SweepError::invalid_argument(
                "test_fractions",
                "[]",
                "at least one test fraction is required",
            ));
        }
        // Delegates fraction range checks to SplitSpec
        self.split_specs()?;
        if self.sample_cap == 0 {
            return Err(SweepError::invalid_argument(
                "sample_cap",
                0,
                "must be positive",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> SweepConfig {
        SweepConfig::new(
            "spent",
            vec!["hours".to_string(), "level".to_string()],
        )
    }

    #[test]
    fn test_default_matches_run_parameters() {
        let config = SweepConfig::default();
        assert_eq!(config.max_subset_size, 4);
        assert_eq!(config.test_fractions, vec![0.4, 0.3, 0.2, 0.1]);
        assert_eq!(config.random_seed, 42);
        assert_eq!(config.sample_cap, 1000);
    }

    #[test]
    fn test_validate_ok() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_candidates() {
        let config = SweepConfig::new("spent", vec![]);
        assert!(matches!(
            config.validate(),
            Err(SweepError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_duplicate_candidates() {
        let config = SweepConfig::new(
            "spent",
            vec!["hours".to_string(), "hours".to_string()],
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_subset_size() {
        let config = base_config().with_max_subset_size(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_cap() {
        let config = base_config().with_sample_cap(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_fraction() {
        let config = base_config().with_test_fractions(vec![0.2, 1.0]);
        assert!(config.validate().is_err());
    }
}
