use std::mem;

use log::warn;

use super::UpdateStrategy;
use crate::vector::SparseVector;

/// Averaged perceptron (Collins, 2002)
///
/// Every snapshot handed to [`UpdateStrategy::update`] is summed; the
/// finalized model is that sum divided by `iterations * updates`.
#[derive(Debug, Clone, Default)]
pub struct Averaged {
    /// Configured number of passes
    iterations: usize,
    /// Number of snapshots recorded in this run
    updates: usize,
    /// Sum of recorded snapshots
    accumulated: SparseVector,
}

impl Averaged {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of snapshots recorded since the last `init`
    pub fn num_updates(&self) -> usize {
        self.updates
    }
}

impl UpdateStrategy for Averaged {
    fn init(&mut self, weights: &SparseVector, iterations: usize) {
        // Reset explicitly: the same strategy may be reused for another run
        self.updates = 0;
        self.iterations = iterations;
        self.accumulated = SparseVector::with_capacity(weights.len());
    }

    fn update(&mut self, weights: &SparseVector) {
        self.accumulated.add(weights);
        self.updates += 1;
    }

    fn finalize(&mut self, weights: SparseVector) -> SparseVector {
        if self.updates == 0 {
            warn!("no snapshots recorded, keeping current weights");
            return weights;
        }
        let mut averaged = mem::take(&mut self.accumulated);
        averaged.scalar_divide((self.iterations * self.updates) as f64);
        averaged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Feature;

    fn single(weight: f64) -> SparseVector {
        vec![(Feature::from("f1"), weight)].into_iter().collect()
    }

    #[test]
    fn test_average_of_snapshots() {
        let mut strategy = Averaged::new();
        strategy.init(&SparseVector::new(), 1);
        for w in [1.0, 3.0, 2.0] {
            strategy.update(&single(w));
        }
        assert_eq!(strategy.num_updates(), 3);
        let finalized = strategy.finalize(single(2.0));
        assert!((finalized.get("f1") - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_iterations_scale_denominator() {
        let mut strategy = Averaged::new();
        strategy.init(&SparseVector::new(), 2);
        strategy.update(&single(4.0));
        strategy.update(&single(4.0));
        let finalized = strategy.finalize(SparseVector::new());
        // (4 + 4) / (2 * 2)
        assert!((finalized.get("f1") - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_reinit_discards_previous_run() {
        let mut strategy = Averaged::new();
        strategy.init(&SparseVector::new(), 1);
        strategy.update(&single(100.0));
        strategy.update(&single(50.0));

        strategy.init(&SparseVector::new(), 1);
        assert_eq!(strategy.num_updates(), 0);
        strategy.update(&single(1.0));
        let finalized = strategy.finalize(SparseVector::new());
        assert_eq!(finalized, single(1.0));
    }

    #[test]
    fn test_finalize_without_updates_keeps_weights() {
        let mut strategy = Averaged::new();
        strategy.init(&single(7.0), 3);
        assert_eq!(strategy.finalize(single(7.0)), single(7.0));
    }
}
