#![allow(dead_code)]

use perceptrs::train::{Decoder, FeatureExtractor, Scorer};
use perceptrs::{Decoded, Feature};

/// A sentence tagged with one label per word
pub type Tagged = Decoded<Vec<String>, Vec<String>>;

pub fn tagged(words: &[&str], tags: &[&str]) -> Tagged {
    Decoded::new(
        words.iter().map(|w| w.to_string()).collect(),
        tags.iter().map(|t| t.to_string()).collect(),
    )
}

/// Word/tag emission features plus tag bigram transitions
pub struct WordTagFeatures;

impl FeatureExtractor<Tagged> for WordTagFeatures {
    fn features(&self, decoded: &Tagged) -> Vec<Feature> {
        let mut features = Vec::with_capacity(decoded.output.len() * 2);
        let mut prev = "<s>";
        for (word, tag) in decoded.instance.iter().zip(&decoded.output) {
            features.push(Feature::from(format!("w={}|t={}", word, tag)));
            features.push(Feature::from(format!("p={}|t={}", prev, tag)));
            prev = tag;
        }
        features
    }

    fn estimated_num_features(&self) -> usize {
        32
    }
}

/// Scores every tag sequence and keeps the first best one
pub struct ExhaustiveDecoder {
    tags: Vec<String>,
}

impl ExhaustiveDecoder {
    pub fn new(tags: &[&str]) -> Self {
        Self {
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl Decoder<Tagged> for ExhaustiveDecoder {
    fn decode(&self, words: &Vec<String>, scorer: &dyn Scorer<Tagged>) -> Tagged {
        let n = words.len();
        let mut indices = vec![0usize; n];
        let mut best: Option<(f64, Tagged)> = None;
        loop {
            let candidate = Decoded::new(
                words.clone(),
                indices.iter().map(|&i| self.tags[i].clone()).collect(),
            );
            let score = scorer.score(&candidate);
            if best.as_ref().map_or(true, |(s, _)| score > *s) {
                best = Some((score, candidate));
            }

            // odometer increment over tag indices
            let mut pos = n;
            loop {
                if pos == 0 {
                    return best.map(|(_, d)| d).expect("at least one candidate");
                }
                pos -= 1;
                indices[pos] += 1;
                if indices[pos] < self.tags.len() {
                    break;
                }
                indices[pos] = 0;
            }
        }
    }
}

pub fn weather_decoder() -> ExhaustiveDecoder {
    ExhaustiveDecoder::new(&["sunny", "rainy"])
}

pub fn weather_corpus() -> Vec<Tagged> {
    vec![
        tagged(&["walk", "shop"], &["sunny", "sunny"]),
        tagged(&["clean", "clean"], &["rainy", "rainy"]),
        tagged(&["walk", "clean"], &["sunny", "rainy"]),
        tagged(&["clean", "walk", "shop"], &["rainy", "sunny", "sunny"]),
    ]
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
