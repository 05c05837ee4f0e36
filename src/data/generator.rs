use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::codec::binary::{reversed, BinaryCodec};
use crate::error::Result;
use crate::math::matrix::Matrix;

/// One addition problem laid out for the recurrent model.
///
/// `inputs` is `width × 2` and `target` is `width × 1`; row `t` holds the
/// bits of weight `2^t`, so the carry flows forward in time.
#[derive(Debug, Clone, PartialEq)]
pub struct AdditionExample {
    pub a: u64,
    pub b: u64,
    pub sum: u64,
    pub inputs: Matrix,
    pub target: Matrix,
}

impl AdditionExample {
    /// Builds the example for `a + b`.
    ///
    /// Precondition: `a + b < 2^width`. The random generator guarantees
    /// this by drawing each addend below `2^(width-1)`; hand-picked cases
    /// such as the all-ones carry chain must respect it themselves.
    pub fn from_addends(codec: &BinaryCodec, a: u64, b: u64) -> AdditionExample {
        let sum = a + b;
        debug_assert!(sum < codec.capacity(), "{a} + {b} overflows {} bits", codec.width());

        let a_bits = reversed(&codec.encode_masked(a));
        let b_bits = reversed(&codec.encode_masked(b));
        let sum_bits = reversed(&codec.encode_masked(sum));

        let inputs = Matrix::from_data(
            a_bits.iter().zip(b_bits.iter())
                .map(|(&x, &y)| vec![f64::from(x), f64::from(y)])
                .collect()
        );
        let target = Matrix::from_data(
            sum_bits.iter().map(|&s| vec![f64::from(s)]).collect()
        );

        AdditionExample { a, b, sum, inputs, target }
    }

    /// Target bits in LSB-first order, as the model sees them.
    pub fn target_bits(&self) -> Vec<u8> {
        self.target.column(0).iter().map(|&x| x as u8).collect()
    }
}

/// Endless stream of random addition problems.
pub struct ExampleGenerator<R: Rng> {
    codec: BinaryCodec,
    rng: R,
}

impl<R: Rng> ExampleGenerator<R> {
    pub fn new(codec: BinaryCodec, rng: R) -> ExampleGenerator<R> {
        ExampleGenerator { codec, rng }
    }

    pub fn codec(&self) -> &BinaryCodec {
        &self.codec
    }

    /// Exclusive upper bound for each addend, `2^(width-1)`.
    pub fn addend_bound(&self) -> u64 {
        self.codec.capacity() / 2
    }

    /// Draws two independent addends from `[0, 2^(width-1))`.
    pub fn next_example(&mut self) -> AdditionExample {
        let bound = self.addend_bound();
        let a = self.rng.gen_range(0..bound);
        let b = self.rng.gen_range(0..bound);
        AdditionExample::from_addends(&self.codec, a, b)
    }
}

impl ExampleGenerator<ChaCha8Rng> {
    /// Reproducible generator for a given width and seed.
    pub fn seeded(width: usize, seed: u64) -> Result<ExampleGenerator<ChaCha8Rng>> {
        Ok(ExampleGenerator::new(BinaryCodec::new(width)?, ChaCha8Rng::seed_from_u64(seed)))
    }
}

impl<R: Rng> Iterator for ExampleGenerator<R> {
    type Item = AdditionExample;

    fn next(&mut self) -> Option<AdditionExample> {
        Some(self.next_example())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_decodes_to_the_sum() {
        let mut generator = ExampleGenerator::seeded(8, 3).unwrap();
        let codec = *generator.codec();
        for example in generator.by_ref().take(500) {
            assert!(example.a < 128 && example.b < 128);
            assert_eq!(codec.decode(&reversed(&example.target_bits())), example.a + example.b);
        }
    }

    #[test]
    fn zero_plus_zero_is_all_zero() {
        let example = AdditionExample::from_addends(&BinaryCodec::default(), 0, 0);
        assert_eq!(example.target_bits(), vec![0; 8]);
        assert_eq!(example.inputs, Matrix::zeros(8, 2));
    }

    #[test]
    fn five_plus_three_is_eight() {
        let codec = BinaryCodec::default();
        let example = AdditionExample::from_addends(&codec, 5, 3);
        // LSB first: 8 = 0b0000_1000
        assert_eq!(example.target_bits(), vec![0, 0, 0, 1, 0, 0, 0, 0]);
        assert_eq!(codec.decode(&reversed(&example.target_bits())), 8);
        // 5 = 101, 3 = 011, least significant bit first
        assert_eq!(example.inputs.column(0)[..3], [1.0, 0.0, 1.0]);
        assert_eq!(example.inputs.column(1)[..3], [1.0, 1.0, 0.0]);
    }

    #[test]
    fn same_seed_same_stream() {
        let a: Vec<_> = ExampleGenerator::seeded(8, 9).unwrap().take(20).map(|e| (e.a, e.b)).collect();
        let b: Vec<_> = ExampleGenerator::seeded(8, 9).unwrap().take(20).map(|e| (e.a, e.b)).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn narrower_widths_keep_the_bound() {
        let mut generator = ExampleGenerator::seeded(4, 1).unwrap();
        assert_eq!(generator.addend_bound(), 8);
        for example in generator.by_ref().take(100) {
            assert!(example.sum < 16);
            assert_eq!(example.inputs.rows, 4);
        }
    }
}
