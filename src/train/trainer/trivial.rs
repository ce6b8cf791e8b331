use super::UpdateStrategy;
use crate::vector::SparseVector;

/// Keeps the last weight snapshot as the model
#[derive(Debug, Clone, Copy, Default)]
pub struct Trivial;

impl UpdateStrategy for Trivial {
    fn init(&mut self, _weights: &SparseVector, _iterations: usize) {}

    fn update(&mut self, _weights: &SparseVector) {}

    fn finalize(&mut self, weights: SparseVector) -> SparseVector {
        weights
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Feature;

    #[test]
    fn test_finalize_is_identity() {
        let weights: SparseVector = vec![(Feature::from("f1"), 1.5), (Feature::from("f2"), -3.0)]
            .into_iter()
            .collect();
        let mut strategy = Trivial;
        strategy.init(&weights, 5);
        strategy.update(&weights);
        strategy.update(&SparseVector::new());
        assert_eq!(strategy.finalize(weights.clone()), weights);
    }
}
