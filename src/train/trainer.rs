use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info, trace, warn};

use super::model_writer::ModelWriter;
use crate::error::{Error, Result};
use crate::feature::Feature;
use crate::instance::DecodedInstance;
use crate::model::Model;
use crate::vector::SparseVector;

mod averaged;
mod trivial;

pub use self::averaged::Averaged;
pub use self::trivial::Trivial;

const NOT_INITIALIZED: &str = "model not initialized: call init before training or scoring";

/// Turns a decoded instance into the features it fires
pub trait FeatureExtractor<D> {
    /// Features of a decoded instance; a feature may repeat
    fn features(&self, decoded: &D) -> Vec<Feature>;

    /// Expected vocabulary size, used to presize the weight vector
    fn estimated_num_features(&self) -> usize;
}

/// Anything that can score a candidate output
pub trait Scorer<D> {
    fn score(&self, decoded: &D) -> f64;
}

/// Structured search producing the best-scoring output for an instance
///
/// Decoding must be deterministic for a fixed set of weights.
pub trait Decoder<D: DecodedInstance> {
    fn decode(&self, instance: &D::Instance, scorer: &dyn Scorer<D>) -> D;
}

/// Policy deciding which weights the model keeps once a run is over
pub trait UpdateStrategy {
    /// Reset per-run state
    fn init(&mut self, weights: &SparseVector, iterations: usize);

    /// Record the weights after one processed instance
    fn update(&mut self, weights: &SparseVector);

    /// Produce the weights that become the model
    fn finalize(&mut self, weights: SparseVector) -> SparseVector;
}

impl<S: UpdateStrategy + ?Sized> UpdateStrategy for Box<S> {
    fn init(&mut self, weights: &SparseVector, iterations: usize) {
        (**self).init(weights, iterations)
    }

    fn update(&mut self, weights: &SparseVector) {
        (**self).update(weights)
    }

    fn finalize(&mut self, weights: SparseVector) -> SparseVector {
        (**self).finalize(weights)
    }
}

/// Update strategy selectable by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Trivial,
    Averaged,
}

impl StrategyKind {
    /// Create a fresh strategy of this kind
    pub fn build(self) -> Box<dyn UpdateStrategy + Send + Sync> {
        match self {
            StrategyKind::Trivial => Box::new(Trivial),
            StrategyKind::Averaged => Box::new(Averaged::new()),
        }
    }
}

impl FromStr for StrategyKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "trivial" => Ok(StrategyKind::Trivial),
            "averaged" => Ok(StrategyKind::Averaged),
            _ => Err(Error::parameter(format!("unknown update strategy: {s}"))),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Trivial => f.write_str("trivial"),
            StrategyKind::Averaged => f.write_str("averaged"),
        }
    }
}

/// Perceptron training parameters.
#[derive(Debug, Clone)]
pub struct PerceptronParams {
    iterations: usize,
    step_size: f64,
}

impl Default for PerceptronParams {
    fn default() -> Self {
        Self {
            iterations: 1,
            step_size: 1.0,
        }
    }
}

impl PerceptronParams {
    /// Number of passes the caller feeds, the averaging denominator
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn set_iterations(&mut self, iterations: usize) -> Result<()> {
        if iterations < 1 {
            return Err(Error::parameter("iterations must be at least 1"));
        }
        self.iterations = iterations;
        Ok(())
    }

    /// Scale of each mistake correction
    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    pub fn set_step_size(&mut self, step_size: f64) -> Result<()> {
        if !step_size.is_finite() || step_size <= 0.0 {
            return Err(Error::parameter("step_size must be positive and finite"));
        }
        self.step_size = step_size;
        Ok(())
    }

    /// Set a parameter from its string form
    pub fn set(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "iterations" => {
                let iterations = value.parse().map_err(|_| {
                    Error::parameter(format!("invalid value for iterations: {value}"))
                })?;
                self.set_iterations(iterations)
            }
            "step_size" => {
                let step_size = value.parse().map_err(|_| {
                    Error::parameter(format!("invalid value for step_size: {value}"))
                })?;
                self.set_step_size(step_size)
            }
            _ => Err(Error::parameter(format!("unknown parameter: {name}"))),
        }
    }

    /// Get a parameter in string form
    pub fn get(&self, name: &str) -> Result<String> {
        match name {
            "iterations" => Ok(self.iterations.to_string()),
            "step_size" => Ok(self.step_size.to_string()),
            _ => Err(Error::parameter(format!("unknown parameter: {name}"))),
        }
    }
}

/// Lifecycle of a [`Perceptron`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// `init` has not been called
    Uninitialized,
    /// Collaborators bound, fresh weights
    Initialized,
    /// Inside `train`
    Training,
    /// A run finished or weights were loaded
    Ready,
}

/// Outcome of one training run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrainSummary {
    /// Instances consumed from the stream
    pub instances: usize,
    /// Instances whose prediction differed from the gold output
    pub mistakes: usize,
    /// Whether the run stopped on the cancellation flag
    pub cancelled: bool,
}

/// Linear structured perceptron
///
/// Owns the live weight vector. The decoder is bound at construction, the
/// feature extractor and update strategy by [`Perceptron::init`], which must
/// come before any scoring or training.
pub struct Perceptron<D: DecodedInstance> {
    weights: Option<SparseVector>,
    extractor: Option<Box<dyn FeatureExtractor<D> + Send + Sync>>,
    strategy: Option<Box<dyn UpdateStrategy + Send + Sync>>,
    decoder: Box<dyn Decoder<D> + Send + Sync>,
    params: PerceptronParams,
    state: State,
}

impl<D: DecodedInstance> fmt::Debug for Perceptron<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Perceptron")
            .field("state", &self.state)
            .field("params", &self.params)
            .field("num_weights", &self.weights.as_ref().map(SparseVector::len))
            .finish()
    }
}

impl<D: DecodedInstance> Perceptron<D> {
    /// Create an uninitialized perceptron around a decoder
    pub fn new<T>(decoder: T) -> Self
    where
        T: Decoder<D> + Send + Sync + 'static,
    {
        Self {
            weights: None,
            extractor: None,
            strategy: None,
            decoder: Box::new(decoder),
            params: PerceptronParams::default(),
            state: State::Uninitialized,
        }
    }

    /// Set iterations (builder pattern)
    pub fn with_iterations(mut self, iterations: usize) -> Result<Self> {
        self.params.set_iterations(iterations)?;
        Ok(self)
    }

    /// Set step size (builder pattern)
    pub fn with_step_size(mut self, step_size: f64) -> Result<Self> {
        self.params.set_step_size(step_size)?;
        Ok(self)
    }

    /// Get training parameters
    pub fn params(&self) -> &PerceptronParams {
        &self.params
    }

    /// Get training parameters for mutation
    pub fn params_mut(&mut self) -> &mut PerceptronParams {
        &mut self.params
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Bind the feature extractor and update strategy and allocate fresh
    /// weights
    ///
    /// Calling it again starts over with empty weights.
    pub fn init<E, S>(&mut self, extractor: E, strategy: S)
    where
        E: FeatureExtractor<D> + Send + Sync + 'static,
        S: UpdateStrategy + Send + Sync + 'static,
    {
        let capacity = extractor.estimated_num_features();
        self.weights = Some(SparseVector::with_capacity(capacity));
        self.extractor = Some(Box::new(extractor));
        self.strategy = Some(Box::new(strategy));
        self.state = State::Initialized;
        debug!("perceptron initialized: capacity={capacity}");
    }

    /// The live weight vector
    ///
    /// # Panics
    ///
    /// Panics if no weights were allocated or loaded yet.
    pub fn weights(&self) -> &SparseVector {
        match &self.weights {
            Some(weights) => weights,
            None => panic!("{NOT_INITIALIZED}"),
        }
    }

    /// Score a decoded instance under the current weights
    ///
    /// # Panics
    ///
    /// Panics if the model was not initialized.
    pub fn score(&self, decoded: &D) -> f64 {
        match (&self.extractor, &self.weights) {
            (Some(extractor), Some(weights)) => weights.dot_product(&extractor.features(decoded)),
            _ => panic!("{NOT_INITIALIZED}"),
        }
    }

    /// Run one pass over gold instances in arrival order
    ///
    /// Any iterator works, including the receiving end of a channel fed by a
    /// producer thread. Once the stream ends the update strategy's finalized
    /// weights replace the live ones.
    ///
    /// # Panics
    ///
    /// Panics if the model was not initialized.
    pub fn train<I>(&mut self, instances: I) -> TrainSummary
    where
        I: IntoIterator<Item = D>,
    {
        self.run(instances, None)
    }

    /// Like [`Perceptron::train`], but stops early once `stop` is set
    ///
    /// The flag is checked before each instance. Instances processed before
    /// the stop are finalized as usual.
    pub fn train_until<I>(&mut self, instances: I, stop: &AtomicBool) -> TrainSummary
    where
        I: IntoIterator<Item = D>,
    {
        self.run(instances, Some(stop))
    }

    fn run<I>(&mut self, instances: I, stop: Option<&AtomicBool>) -> TrainSummary
    where
        I: IntoIterator<Item = D>,
    {
        if self.weights.is_none() || self.extractor.is_none() || self.strategy.is_none() {
            panic!("{NOT_INITIALIZED}");
        }
        let iterations = self.params.iterations();
        let step_size = self.params.step_size();
        if let (Some(strategy), Some(weights)) = (self.strategy.as_mut(), self.weights.as_ref()) {
            strategy.init(weights, iterations);
        }
        self.state = State::Training;
        info!("training started: iterations={iterations} step_size={step_size}");

        let mut summary = TrainSummary::default();
        for gold in instances {
            if stop.map_or(false, |flag| flag.load(Ordering::Acquire)) {
                warn!("training cancelled after {n} instances", n = summary.instances);
                summary.cancelled = true;
                break;
            }

            let predicted = self.decoder.decode(gold.instance(), &*self);
            if gold != predicted {
                self.correct(&gold, &predicted, step_size);
                summary.mistakes += 1;
                debug!("mistake at instance {n}", n = summary.instances);
            }

            if let (Some(strategy), Some(weights)) = (self.strategy.as_mut(), self.weights.as_ref())
            {
                strategy.update(weights);
            }
            summary.instances += 1;
            trace!("processed instance {n}", n = summary.instances);
        }

        if let (Some(strategy), Some(weights)) = (self.strategy.as_mut(), self.weights.take()) {
            self.weights = Some(strategy.finalize(weights));
        }
        self.state = State::Ready;
        let TrainSummary {
            instances,
            mistakes,
            cancelled,
        } = summary;
        info!("training finished: instances={instances} mistakes={mistakes} cancelled={cancelled}");
        summary
    }

    /// Perceptron correction: `w += step_size * (phi(gold) - phi(predicted))`
    fn correct(&mut self, gold: &D, predicted: &D, step_size: f64) {
        let (gold_counts, predicted_counts) = match &self.extractor {
            Some(extractor) => (
                SparseVector::from_features(&extractor.features(gold)),
                SparseVector::from_features(&extractor.features(predicted)),
            ),
            None => panic!("{NOT_INITIALIZED}"),
        };
        if let Some(weights) = self.weights.as_mut() {
            weights
                .add_scaled(&gold_counts, step_size)
                .add_scaled(&predicted_counts, -step_size);
        }
    }

    /// Serialize the live weight vector
    ///
    /// # Panics
    ///
    /// Panics if no weights were allocated or loaded yet.
    pub fn write<W: Write>(&self, mut writer: W) -> Result<()> {
        ModelWriter::write(&mut writer, self.weights())
    }

    /// Replace the live weights with a serialized weight vector
    ///
    /// The input is decoded completely before anything is replaced; on error
    /// the current weights are left as they were. Loaded weights only make
    /// sense once `init` has bound an extractor, since `init` starts over
    /// with empty weights.
    ///
    /// # Panics
    ///
    /// Panics if the model was not initialized.
    pub fn read<R: Read>(&mut self, mut reader: R) -> Result<()> {
        if self.extractor.is_none() {
            panic!("{NOT_INITIALIZED}");
        }
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        let weights = Model::new(&buf)?.weights()?;
        info!("loaded {n} weights", n = weights.len());
        self.weights = Some(weights);
        self.state = State::Ready;
        Ok(())
    }

    /// Write the live weights to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())?;
        self.write(BufWriter::new(file))
    }

    /// Load weights from a file written by [`Perceptron::save`]
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let file = File::open(path.as_ref())?;
        self.read(BufReader::new(file))
    }
}

impl<D: DecodedInstance> Scorer<D> for Perceptron<D> {
    fn score(&self, decoded: &D) -> f64 {
        Perceptron::score(self, decoded)
    }
}
