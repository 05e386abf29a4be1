//! Seeded train/test partitioning

use crate::error::{Result, SweepError};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// A train/test proportion used to evaluate one model fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitSpec {
    test_fraction: f64,
}

impl SplitSpec {
    /// Create a split spec; the test fraction must lie strictly in (0, 1)
    pub fn new(test_fraction: f64) -> Result<Self> {
        if !(test_fraction > 0.0 && test_fraction < 1.0) {
            return Err(SweepError::invalid_argument(
                "test_fraction",
                test_fraction,
                "must be strictly between 0 and 1",
            ));
        }
        Ok(Self { test_fraction })
    }

    /// Held-out fraction
    pub fn test_fraction(&self) -> f64 {
        self.test_fraction
    }

    /// Training fraction
    pub fn train_fraction(&self) -> f64 {
        1.0 - self.test_fraction
    }

    /// Human-readable descriptor, e.g. `"80-20"`
    pub fn label(&self) -> String {
        format!(
            "{:.0}-{:.0}",
            self.train_fraction() * 100.0,
            self.test_fraction * 100.0
        )
    }
}

/// Row indices for one train/test partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
}

/// Derive the train/test partition for `(n_samples, spec, seed)`.
///
/// The same inputs always yield the identical partition; the sampler relies
/// on this to reconstruct a result's partition without re-storing it.
/// Test size is `ceil(n * test_fraction)`, clamped so both partitions are
/// non-empty.
pub fn shuffle_split(n_samples: usize, spec: SplitSpec, seed: u64) -> Result<Partition> {
    if n_samples < 2 {
        return Err(SweepError::DataError(format!(
            "need at least 2 rows to split, got {n_samples}"
        )));
    }

    let mut indices: Vec<usize> = (0..n_samples).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_test = ((n_samples as f64 * spec.test_fraction()).ceil() as usize)
        .clamp(1, n_samples - 1);

    let test_indices = indices[..n_test].to_vec();
    let train_indices = indices[n_test..].to_vec();

    Ok(Partition {
        train_indices,
        test_indices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_spec_bounds() {
        assert!(SplitSpec::new(0.2).is_ok());
        assert!(SplitSpec::new(0.0).is_err());
        assert!(SplitSpec::new(1.0).is_err());
        assert!(SplitSpec::new(-0.1).is_err());
    }

    #[test]
    fn test_label() {
        assert_eq!(SplitSpec::new(0.2).unwrap().label(), "80-20");
        assert_eq!(SplitSpec::new(0.4).unwrap().label(), "60-40");
    }

    #[test]
    fn test_partition_sizes_and_disjointness() {
        let spec = SplitSpec::new(0.2).unwrap();
        let partition = shuffle_split(100, spec, 42).unwrap();

        assert_eq!(partition.test_indices.len(), 20);
        assert_eq!(partition.train_indices.len(), 80);

        let mut all: Vec<usize> = partition
            .train_indices
            .iter()
            .chain(partition.test_indices.iter())
            .copied()
            .collect();
        all.sort_unstable();
        assert_eq!(all, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_same_seed_same_partition() {
        let spec = SplitSpec::new(0.3).unwrap();
        let a = shuffle_split(500, spec, 42).unwrap();
        let b = shuffle_split(500, spec, 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seed_different_partition() {
        let spec = SplitSpec::new(0.3).unwrap();
        let a = shuffle_split(500, spec, 42).unwrap();
        let b = shuffle_split(500, spec, 43).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_tiny_dataset_keeps_both_partitions_nonempty() {
        let spec = SplitSpec::new(0.9).unwrap();
        let partition = shuffle_split(2, spec, 1).unwrap();
        assert_eq!(partition.train_indices.len(), 1);
        assert_eq!(partition.test_indices.len(), 1);
    }

    #[test]
    fn test_too_few_rows() {
        let spec = SplitSpec::new(0.5).unwrap();
        assert!(shuffle_split(1, spec, 0).is_err());
    }
}
