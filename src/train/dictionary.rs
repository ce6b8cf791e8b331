use std::collections::HashMap;

use crate::feature::Feature;

/// A bidirectional dictionary between features and the integer IDs they
/// occupy in a model file
#[derive(Debug, Clone)]
pub struct Dictionary {
    /// Map from feature to ID
    feature_to_id: HashMap<Feature, u32>,
    /// Map from ID to feature
    id_to_feature: Vec<Feature>,
}

impl Dictionary {
    /// Create a new empty dictionary
    pub fn new() -> Self {
        Self {
            feature_to_id: HashMap::new(),
            id_to_feature: Vec::new(),
        }
    }

    /// Build a dictionary whose IDs follow the sorted order of `features`
    pub fn sorted<'a, I>(features: I) -> Self
    where
        I: IntoIterator<Item = &'a Feature>,
    {
        let mut sorted: Vec<&Feature> = features.into_iter().collect();
        sorted.sort();
        let mut dict = Self::new();
        for feature in sorted {
            dict.get_or_insert(feature);
        }
        dict
    }

    /// Get the number of entries in the dictionary
    pub fn len(&self) -> usize {
        self.id_to_feature.len()
    }

    /// Returns `true` if the dictionary contains no entries
    pub fn is_empty(&self) -> bool {
        self.id_to_feature.is_empty()
    }

    /// Get or create an ID for a feature
    pub fn get_or_insert(&mut self, feature: &Feature) -> u32 {
        if let Some(&id) = self.feature_to_id.get(feature) {
            id
        } else {
            let id = self.id_to_feature.len() as u32;
            self.feature_to_id.insert(feature.clone(), id);
            self.id_to_feature.push(feature.clone());
            id
        }
    }

    /// Iterate over all (feature, id) pairs in ID order
    pub fn iter(&self) -> impl Iterator<Item = (&Feature, u32)> + '_ {
        self.id_to_feature
            .iter()
            .enumerate()
            .map(|(id, feature)| (feature, id as u32))
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}
