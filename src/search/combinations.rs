//! Feature subset enumeration

/// Lazy enumerator over every feature subset of size 1..=K.
///
/// Subsets are grouped by ascending size; within a size they follow the
/// lexicographic order of candidate-list index positions. Downstream ranking
/// uses this enumeration order as its tie-break, so the order is part of the
/// contract. Cloning restarts the sequence.
#[derive(Debug, Clone)]
pub struct FeatureCombinations {
    candidates: Vec<String>,
    max_size: usize,
    // Index positions of the next subset to yield; empty = next size starts
    current: Vec<usize>,
    size: usize,
    done: bool,
}

impl FeatureCombinations {
    /// Enumerate subsets of `candidates` up to `max_size` features.
    ///
    /// `max_size` is clamped to the candidate count; an empty candidate list
    /// yields an empty sequence (the config layer rejects it up front).
    pub fn new(candidates: &[String], max_size: usize) -> Self {
        let candidates = candidates.to_vec();
        let max_size = max_size.min(candidates.len());
        Self {
            candidates,
            max_size,
            current: Vec::new(),
            size: 1,
            done: max_size == 0,
        }
    }

    /// Total number of subsets this enumerator yields: Σ C(M, k) for k in 1..=K
    pub fn total_count(&self) -> usize {
        let m = self.candidates.len();
        (1..=self.max_size).map(|k| binomial(m, k)).sum()
    }

    fn subset_at(&self, positions: &[usize]) -> Vec<String> {
        positions
            .iter()
            .map(|&i| self.candidates[i].clone())
            .collect()
    }

    /// Advance `current` to the next combination of `size` positions out of
    /// `m`, or return false when the size is exhausted.
    fn advance(&mut self) -> bool {
        let m = self.candidates.len();
        let k = self.size;

        let mut i = k;
        while i > 0 {
            i -= 1;
            if self.current[i] < m - (k - i) {
                self.current[i] += 1;
                for j in (i + 1)..k {
                    self.current[j] = self.current[j - 1] + 1;
                }
                return true;
            }
        }
        false
    }
}

impl Iterator for FeatureCombinations {
    type Item = Vec<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if self.current.is_empty() {
            self.current = (0..self.size).collect();
            return Some(self.subset_at(&self.current.clone()));
        }

        if self.advance() {
            return Some(self.subset_at(&self.current.clone()));
        }

        // Current size exhausted; move to the next one
        if self.size < self.max_size {
            self.size += 1;
            self.current = (0..self.size).collect();
            Some(self.subset_at(&self.current.clone()))
        } else {
            self.done = true;
            None
        }
    }
}

fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: usize = 1;
    for i in 0..k {
        result = result * (n - i) / (i + 1);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_enumerates_all_subsets_in_order() {
        let candidates = names(&["a", "b", "c"]);
        let subsets: Vec<Vec<String>> = FeatureCombinations::new(&candidates, 2).collect();

        assert_eq!(
            subsets,
            vec![
                names(&["a"]),
                names(&["b"]),
                names(&["c"]),
                names(&["a", "b"]),
                names(&["a", "c"]),
                names(&["b", "c"]),
            ]
        );
    }

    #[test]
    fn test_count_matches_binomial_sum() {
        // M = 13, K = 4: 13 + 78 + 286 + 715 = 1092
        let candidates: Vec<String> = (0..13).map(|i| format!("f{i}")).collect();
        let enumerator = FeatureCombinations::new(&candidates, 4);
        assert_eq!(enumerator.total_count(), 1092);

        let subsets: Vec<_> = enumerator.collect();
        assert_eq!(subsets.len(), 1092);

        // No duplicates and every subset within size bounds
        let mut seen = std::collections::HashSet::new();
        for subset in &subsets {
            assert!(!subset.is_empty() && subset.len() <= 4);
            assert!(seen.insert(subset.join(",")), "duplicate {subset:?}");
        }
    }

    #[test]
    fn test_repeat_runs_are_identical() {
        let candidates = names(&["a", "b", "c", "d", "e"]);
        let first: Vec<_> = FeatureCombinations::new(&candidates, 3).collect();
        let second: Vec<_> = FeatureCombinations::new(&candidates, 3).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_clone_restarts() {
        let candidates = names(&["a", "b", "c"]);
        let mut enumerator = FeatureCombinations::new(&candidates, 2);
        let restart = enumerator.clone();

        enumerator.next();
        enumerator.next();

        let consumed: Vec<_> = enumerator.collect();
        let fresh: Vec<_> = restart.collect();
        assert_eq!(fresh.len(), 6);
        assert_eq!(consumed.len(), 4);
    }

    #[test]
    fn test_max_size_clamped_to_candidate_count() {
        let candidates = names(&["a", "b"]);
        let subsets: Vec<_> = FeatureCombinations::new(&candidates, 10).collect();
        assert_eq!(subsets.len(), 3); // {a}, {b}, {a,b}
    }

    #[test]
    fn test_empty_candidates_yield_nothing() {
        let subsets: Vec<_> = FeatureCombinations::new(&[], 3).collect();
        assert!(subsets.is_empty());
    }
}
