use std::fmt;

use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::codec::binary::{reversed, BinaryCodec};
use crate::data::generator::{AdditionExample, ExampleGenerator};
use crate::math::matrix::Matrix;
use crate::network::network::SequenceModel;

/// Decoded result of running the model on one example.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub a: u64,
    pub b: u64,
    pub expected: u64,
    pub predicted: u64,
    /// Rounded outputs in LSB-first order (one per timestep).
    pub rounded: Vec<u8>,
}

impl ProbeResult {
    pub fn is_correct(&self) -> bool {
        self.predicted == self.expected
    }

    /// Rounded outputs as a `timesteps × 1` matrix.
    pub fn rounded_matrix(&self) -> Matrix {
        Matrix::from_data(self.rounded.iter().map(|&bit| vec![f64::from(bit)]).collect())
    }
}

impl fmt::Display for ProbeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}?={}", self.a, self.b, self.predicted)
    }
}

/// Forward pass only: rounds every timestep at 0.5, restores natural bit
/// order and decodes. No weights change and nothing random happens.
pub fn probe(model: &SequenceModel, example: &AdditionExample, codec: &BinaryCodec) -> ProbeResult {
    let output = model.predict(&example.inputs);
    let rounded: Vec<u8> = output.column(0).iter()
        .map(|&p| u8::from(p >= 0.5))
        .collect();
    let predicted = codec.decode(&reversed(&rounded));

    ProbeResult {
        a: example.a,
        b: example.b,
        expected: example.sum,
        predicted,
        rounded,
    }
}

/// `(2^width - 2) + 1`: the sum is all ones, so a carry-aware model has to
/// keep every bit set across the whole sequence.
pub fn adversarial_example(codec: &BinaryCodec) -> AdditionExample {
    AdditionExample::from_addends(codec, codec.capacity() - 2, 1)
}

/// Fraction of `samples` fresh examples whose decoded sum is exact.
pub fn accuracy<R: Rng>(
    model: &SequenceModel,
    generator: &mut ExampleGenerator<R>,
    samples: usize,
) -> f64 {
    if samples == 0 {
        return 0.0;
    }
    let codec = *generator.codec();
    let correct = generator.by_ref()
        .take(samples)
        .filter(|example| probe(model, example, &codec).is_correct())
        .count();
    correct as f64 / samples as f64
}
