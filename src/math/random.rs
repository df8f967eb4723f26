//! Seeded random source shared by layout generation and pattern placement

use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

/// Seeded random selector for reproducible stochastic choices
///
/// Every random decision in the crate goes through one of these so a seed
/// fully determines a layout.
#[derive(Debug, Clone)]
pub struct RandomSelector {
    rng: StdRng,
}

impl RandomSelector {
    /// Create a deterministic random selector
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform integer in `[low, high]`; returns `low` when the range is empty
    pub fn range_inclusive(&mut self, low: i32, high: i32) -> i32 {
        if high <= low {
            return low;
        }
        self.rng.random_range(low..=high)
    }

    /// Uniform index in `[0, len)`; `None` when `len == 0`
    pub fn index(&mut self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.rng.random_range(0..len))
    }

    /// Fair coin flip
    pub fn coin(&mut self) -> bool {
        self.rng.random_bool(0.5)
    }

    /// Fisher–Yates shuffle in place
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }

    /// Generic weighted random selection
    ///
    /// Returns an index into `weights` using the cumulative distribution.
    /// Non-positive weights are never chosen; `None` if all are non-positive.
    pub fn weighted_choice(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().filter(|&&weight| weight > 0.0).sum();
        if total <= 0.0 {
            return None;
        }

        let mut rand_val = self.rng.random::<f64>() * total;
        let mut last_positive = None;
        for (i, &weight) in weights.iter().enumerate() {
            if weight <= 0.0 {
                continue;
            }
            last_positive = Some(i);
            rand_val -= weight;
            if rand_val <= 0.0 {
                return Some(i);
            }
        }
        // Floating-point residue can leave rand_val marginally above zero
        last_positive
    }
}
