use crate::math::matrix::Matrix;
use crate::network::network::{Gradients, SequenceModel};

/// Stochastic gradient descent with optional momentum, time-based decay and
/// Nesterov look-ahead. With the defaults (no momentum, no decay) each step
/// is exactly `θ ← θ − lr·g`.
#[derive(Debug, Clone)]
pub struct Sgd {
    pub learning_rate: f64,
    pub momentum: f64,
    pub decay: f64,
    pub nesterov: bool,
    iterations: u64,
    velocities: Vec<Matrix>,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd::with_momentum(learning_rate, 0.0, 0.0, false)
    }

    pub fn with_momentum(learning_rate: f64, momentum: f64, decay: f64, nesterov: bool) -> Sgd {
        Sgd {
            learning_rate,
            momentum,
            decay,
            nesterov,
            iterations: 0,
            velocities: Vec::new(),
        }
    }

    /// Number of updates applied so far.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Learning rate used by the next update: `lr / (1 + decay·iterations)`.
    pub fn current_learning_rate(&self) -> f64 {
        self.learning_rate / (1.0 + self.decay * self.iterations as f64)
    }

    /// Applies one update to every parameter of `model`.
    pub fn step(&mut self, model: &mut SequenceModel, grads: &Gradients) {
        let mut params = model.parameters_mut();
        assert_eq!(params.len(), grads.tensors.len(), "one gradient per parameter");

        if self.velocities.len() != params.len() {
            self.velocities = params.iter()
                .map(|p| Matrix::zeros(p.rows, p.cols))
                .collect();
        }

        let lr = self.current_learning_rate();
        for ((param, grad), velocity) in params.iter_mut()
            .zip(grads.tensors.iter())
            .zip(self.velocities.iter_mut())
        {
            apply_update(param, grad, velocity, lr, self.momentum, self.nesterov);
        }
        self.iterations += 1;
    }
}

fn apply_update(
    param: &mut Matrix,
    grad: &Matrix,
    velocity: &mut Matrix,
    lr: f64,
    momentum: f64,
    nesterov: bool,
) {
    for i in 0..param.rows {
        for j in 0..param.cols {
            let g = grad.data[i][j];
            let v = momentum * velocity.data[i][j] - lr * g;
            velocity.data[i][j] = v;
            param.data[i][j] += if nesterov { momentum * v - lr * g } else { v };
        }
    }
}
