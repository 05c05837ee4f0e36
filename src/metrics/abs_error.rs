use crate::math::matrix::Matrix;

/// Sum of `|expected - predicted|` over every timestep and output.
///
/// Reported alongside the loss so progress reads as "bits wrong"; it is
/// never differentiated and plays no part in the weight update.
pub struct SumAbsoluteError;

impl SumAbsoluteError {
    pub fn compute(predicted: &Matrix, expected: &Matrix) -> f64 {
        assert_eq!(predicted.rows, expected.rows);
        assert_eq!(predicted.cols, expected.cols);
        predicted.iter().zip(expected.iter())
            .map(|(p, y)| (y - p).abs())
            .sum()
    }
}
