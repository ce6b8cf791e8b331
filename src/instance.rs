/// A predicted or gold structured output attached to its input
///
/// Equality on the implementing type is how the trainer detects a
/// prediction mistake, so it has to cover both the input and the output.
pub trait DecodedInstance: PartialEq {
    /// The undecoded input
    type Instance: PartialEq;

    /// Input this output was decoded for
    fn instance(&self) -> &Self::Instance;
}

/// An instance paired with a decoded output
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decoded<I, O> {
    /// The input
    pub instance: I,
    /// The structured output
    pub output: O,
}

impl<I, O> Decoded<I, O> {
    /// Pair an input with an output decoded for it
    pub fn new(instance: I, output: O) -> Self {
        Self { instance, output }
    }
}

impl<I: PartialEq, O: PartialEq> DecodedInstance for Decoded<I, O> {
    type Instance = I;

    fn instance(&self) -> &I {
        &self.instance
    }
}
