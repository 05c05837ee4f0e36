use rand::Rng;

use crate::{math::matrix::Matrix, activation::activation::ActivationFunction};

/// Fully connected layer applied independently to every row of its input.
///
/// Each row is one timestep, so a `T × input_size` sequence maps to a
/// `T × size` sequence through the same weights at every position.
#[derive(Debug, Clone)]
pub struct Dense {
    pub size: usize,
    pub weights: Matrix,
    pub biases: Option<Matrix>,
    pub activator: ActivationFunction,
}

/// Values cached by [`Dense::forward`] for the backward pass.
#[derive(Debug, Clone)]
pub struct DenseTrace {
    /// Pre-activation values (z = xW + b), one row per timestep.
    pub pre_neurons: Matrix,
    pub neurons: Matrix,
}

/// Gradient of the loss with respect to a dense layer's parameters.
#[derive(Debug, Clone)]
pub struct DenseGradients {
    pub weights: Matrix,
    pub biases: Option<Matrix>,
}

impl Dense {
    pub fn new<R: Rng + ?Sized>(
        size: usize,
        input_size: usize,
        activation: ActivationFunction,
        use_bias: bool,
        rng: &mut R,
    ) -> Dense {
        Dense {
            size,
            weights: Matrix::xavier(input_size, size, rng),
            biases: use_bias.then(|| Matrix::zeros(1, size)),
            activator: activation,
        }
    }

    pub fn param_count(&self) -> usize {
        self.weights.len() + self.biases.as_ref().map_or(0, Matrix::len)
    }

    pub fn forward(&self, inputs: &Matrix) -> DenseTrace {
        let mut z = inputs.matmul(&self.weights);
        if let Some(biases) = &self.biases {
            for row in z.data.iter_mut() {
                for (x, b) in row.iter_mut().zip(biases.data[0].iter()) {
                    *x += b;
                }
            }
        }
        let act = self.activator;
        let a = z.map(|x| act.function(x));
        DenseTrace { pre_neurons: z, neurons: a }
    }

    /// Computes parameter gradients and ∂L/∂inputs.
    /// `output_grad` is ∂L/∂a for every timestep (same shape as `trace.neurons`).
    pub fn backward(
        &self,
        inputs: &Matrix,
        trace: &DenseTrace,
        output_grad: &Matrix,
    ) -> (DenseGradients, Matrix) {
        let act = self.activator;
        // δ = error ⊙ σ'(z)
        let delta = output_grad.hadamard(&trace.pre_neurons.map(|x| act.derivative(x)));

        let weights = inputs.transpose().matmul(&delta);
        let biases = self.biases.as_ref().map(|_| {
            Matrix::row_vector((0..delta.cols).map(|j| delta.column(j).iter().sum()).collect())
        });
        let input_grad = delta.matmul(&self.weights.transpose());

        (DenseGradients { weights, biases }, input_grad)
    }

    pub fn parameters_mut(&mut self) -> Vec<&mut Matrix> {
        let mut params = vec![&mut self.weights];
        if let Some(biases) = self.biases.as_mut() {
            params.push(biases);
        }
        params
    }
}

impl DenseGradients {
    pub fn into_tensors(self) -> Vec<Matrix> {
        let mut tensors = vec![self.weights];
        tensors.extend(self.biases);
        tensors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn same_weights_apply_to_every_timestep() {
        let mut layer = Dense::new(1, 2, ActivationFunction::Identity, false, &mut ChaCha8Rng::seed_from_u64(1));
        layer.weights = Matrix::from_data(vec![vec![2.0], vec![-1.0]]);
        let inputs = Matrix::from_data(vec![vec![1.0, 1.0], vec![3.0, 0.0], vec![1.0, 1.0]]);
        let trace = layer.forward(&inputs);
        assert_eq!(trace.neurons.column(0), vec![1.0, 6.0, 1.0]);
    }

    #[test]
    fn bias_is_optional() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let plain = Dense::new(1, 16, ActivationFunction::Sigmoid, false, &mut rng);
        let biased = Dense::new(1, 16, ActivationFunction::Sigmoid, true, &mut rng);
        assert_eq!(plain.param_count(), 16);
        assert_eq!(biased.param_count(), 17);
        assert_eq!(biased.clone().parameters_mut().len(), 2);
    }
}
