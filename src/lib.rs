//! Online linear structured perceptron
//!
//! The crate scores, corrects, averages and persists a sparse weight
//! vector. Feature extraction and the search for the best-scoring output
//! are supplied by the caller through [`FeatureExtractor`] and [`Decoder`].
//!
//! # Examples
//!
//! ## Training
//!
//! ```no_run
//! use perceptrs::train::{Averaged, Decoder, FeatureExtractor, Perceptron, Scorer};
//! use perceptrs::{Decoded, Feature};
//!
//! type Tagged = Decoded<String, String>;
//!
//! struct WordTag;
//!
//! impl FeatureExtractor<Tagged> for WordTag {
//!     fn features(&self, d: &Tagged) -> Vec<Feature> {
//!         vec![Feature::from(format!("w={}|t={}", d.instance, d.output))]
//!     }
//!
//!     fn estimated_num_features(&self) -> usize {
//!         64
//!     }
//! }
//!
//! struct BestTag;
//!
//! impl Decoder<Tagged> for BestTag {
//!     fn decode(&self, word: &String, scorer: &dyn Scorer<Tagged>) -> Tagged {
//!         let sunny = Decoded::new(word.clone(), "sunny".to_string());
//!         let rainy = Decoded::new(word.clone(), "rainy".to_string());
//!         if scorer.score(&rainy) > scorer.score(&sunny) { rainy } else { sunny }
//!     }
//! }
//!
//! let mut model = Perceptron::new(BestTag);
//! model.init(WordTag, Averaged::new());
//! let gold = vec![
//!     Decoded::new("walk".to_string(), "sunny".to_string()),
//!     Decoded::new("clean".to_string(), "rainy".to_string()),
//! ];
//! let summary = model.train(gold);
//! println!("{} mistakes", summary.mistakes);
//! model.save("model.perceptron")?;
//! # Ok::<(), perceptrs::Error>(())
//! ```
//!
//! ## Inspecting a saved model
//!
//! ```no_run
//! use perceptrs::Model;
//!
//! let data = std::fs::read("model.perceptron")?;
//! let model = Model::new(&data)?;
//! model.dump(&mut std::io::stdout())?;
//! # Ok::<(), perceptrs::Error>(())
//! ```

mod error;
mod feature;
mod instance;
mod model;
mod vector;

/// Training module containing the perceptron trainer and update strategies
pub mod train;

// Re-export main types
pub use self::error::{Error, Result};
pub use self::feature::Feature;
pub use self::instance::{Decoded, DecodedInstance};
pub use self::model::Model;
pub use self::vector::SparseVector;

// Re-export training types for convenience
pub use self::train::{
    Decoder, FeatureExtractor, Perceptron, Scorer, StrategyKind, UpdateStrategy,
};
