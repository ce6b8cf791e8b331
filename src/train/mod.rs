//! Training module for perceptron models
//!
//! This module contains the online training loop, the update strategies
//! and model serialization.

mod dictionary;
mod model_writer;
mod trainer;

// Re-export public types
pub use self::model_writer::ModelWriter;
pub use self::trainer::{
    Averaged, Decoder, FeatureExtractor, Perceptron, PerceptronParams, Scorer, State,
    StrategyKind, TrainSummary, Trivial, UpdateStrategy,
};
