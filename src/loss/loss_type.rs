use serde::{Serialize, Deserialize};

use crate::loss::bce::BceLoss;
use crate::loss::mse::MseLoss;
use crate::math::matrix::Matrix;

/// Selects which loss function the training loop uses.
///
/// - `BinaryCrossEntropy` - pair with a Sigmoid output; averaged over timesteps.
/// - `Mse`                - mean-squared error over timesteps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossType {
    #[default]
    BinaryCrossEntropy,
    Mse,
}

impl LossType {
    /// Scalar loss over a whole `timesteps × outputs` prediction.
    pub fn loss(&self, predicted: &Matrix, expected: &Matrix) -> f64 {
        let (p, y) = flatten_pair(predicted, expected);
        match self {
            LossType::BinaryCrossEntropy => BceLoss::loss(&p, &y),
            LossType::Mse                => MseLoss::loss(&p, &y),
        }
    }

    /// ∂L/∂predicted, same shape as `predicted`.
    pub fn derivative(&self, predicted: &Matrix, expected: &Matrix) -> Matrix {
        let (p, y) = flatten_pair(predicted, expected);
        let flat = match self {
            LossType::BinaryCrossEntropy => BceLoss::derivative(&p, &y),
            LossType::Mse                => MseLoss::derivative(&p, &y),
        };
        Matrix::from_data(
            flat.chunks(predicted.cols.max(1)).map(|row| row.to_vec()).collect()
        )
    }
}

fn flatten_pair(predicted: &Matrix, expected: &Matrix) -> (Vec<f64>, Vec<f64>) {
    assert_eq!(predicted.rows, expected.rows, "prediction and target lengths differ");
    assert_eq!(predicted.cols, expected.cols, "prediction and target widths differ");
    (predicted.iter().copied().collect(), expected.iter().copied().collect())
}
