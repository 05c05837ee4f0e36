pub struct MseLoss;

impl MseLoss {
    /// Scalar MSE: mean((predicted - expected)²)
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        let n = predicted.len() as f64;
        predicted.iter().zip(expected.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>() / n
    }

    /// Per-output gradient of `loss`: 2·(predicted - expected) / n
    pub fn derivative(predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        let n = predicted.len() as f64;
        predicted.iter().zip(expected.iter())
            .map(|(a, b)| 2.0 * (a - b) / n)
            .collect()
    }
}
