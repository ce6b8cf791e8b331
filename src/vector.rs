use std::borrow::Borrow;
use std::collections::hash_map::{self, HashMap};
use std::hash::Hash;

use crate::feature::Feature;

/// Sparse mapping from feature to real-valued weight
///
/// Absent features have weight `0.0`. Reads never insert entries, so the
/// vector only grows when a weight is actually written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    weights: HashMap<Feature, f64>,
}

impl SparseVector {
    /// Create an empty vector
    pub fn new() -> Self {
        Self {
            weights: HashMap::new(),
        }
    }

    /// Create an empty vector with room for `capacity` features
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            weights: HashMap::with_capacity(capacity),
        }
    }

    /// Indicator-count vector of a feature sequence
    ///
    /// Every occurrence adds `1.0`, so a feature listed twice gets `2.0`.
    pub fn from_features(features: &[Feature]) -> Self {
        let mut counts = Self::with_capacity(features.len());
        for feature in features {
            *counts.weights.entry(feature.clone()).or_insert(0.0) += 1.0;
        }
        counts
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Returns `true` if no entry is stored
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Weight of a feature, `0.0` when absent
    pub fn get<Q>(&self, feature: &Q) -> f64
    where
        Feature: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.weights.get(feature).copied().unwrap_or(0.0)
    }

    /// Returns `true` if an entry is stored for the feature
    pub fn contains<Q>(&self, feature: &Q) -> bool
    where
        Feature: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.weights.contains_key(feature)
    }

    /// Set the weight of a feature, returning the previous one
    pub fn insert<F: Into<Feature>>(&mut self, feature: F, weight: f64) -> Option<f64> {
        self.weights.insert(feature.into(), weight)
    }

    /// Iterate over the stored `(feature, weight)` entries in arbitrary order
    pub fn iter(&self) -> hash_map::Iter<'_, Feature, f64> {
        self.weights.iter()
    }

    /// Sum of the weights of `features`
    ///
    /// Cost is linear in `features.len()`, independent of the vector size.
    pub fn dot_product(&self, features: &[Feature]) -> f64 {
        features.iter().map(|f| self.get(f)).sum()
    }

    /// Inner product with another sparse vector
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small
            .weights
            .iter()
            .map(|(feature, weight)| weight * large.get(feature))
            .sum()
    }

    /// Sub-vector restricted to `features`
    ///
    /// Only features with a stored entry appear in the result.
    pub fn weights_of(&self, features: &[Feature]) -> SparseVector {
        let mut restricted = SparseVector::with_capacity(features.len());
        for feature in features {
            if let Some(&weight) = self.weights.get(feature) {
                restricted.weights.insert(feature.clone(), weight);
            }
        }
        restricted
    }

    /// In place `self += other`
    pub fn add(&mut self, other: &SparseVector) -> &mut Self {
        self.add_scaled(other, 1.0)
    }

    /// In place `self -= other`
    pub fn subtract(&mut self, other: &SparseVector) -> &mut Self {
        self.add_scaled(other, -1.0)
    }

    /// In place `self += amount * other`
    pub fn add_scaled(&mut self, other: &SparseVector, amount: f64) -> &mut Self {
        for (feature, weight) in &other.weights {
            *self.weights.entry(feature.clone()).or_insert(0.0) += amount * weight;
        }
        self
    }

    /// Divide every stored weight by `k`
    pub fn scalar_divide(&mut self, k: f64) -> &mut Self {
        for weight in self.weights.values_mut() {
            *weight /= k;
        }
        self
    }
}

impl FromIterator<(Feature, f64)> for SparseVector {
    fn from_iter<T: IntoIterator<Item = (Feature, f64)>>(iter: T) -> Self {
        Self {
            weights: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SparseVector {
    type Item = (&'a Feature, &'a f64);
    type IntoIter = hash_map::Iter<'a, Feature, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.weights.iter()
    }
}
