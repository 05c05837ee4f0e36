use rand::Rng;

use crate::{math::matrix::Matrix, activation::activation::ActivationFunction};

/// Elman-style recurrent layer: `h_t = σ(x_t·W_ih + h_{t-1}·W_hh + b)`.
///
/// The hidden state starts at zero for every sequence and is never carried
/// over between calls to [`SimpleRnn::forward`].
#[derive(Debug, Clone)]
pub struct SimpleRnn {
    pub units: usize,
    /// input_size × units
    pub input_weights: Matrix,
    /// units × units
    pub recurrent_weights: Matrix,
    pub biases: Option<Matrix>,
    pub activator: ActivationFunction,
}

/// Per-timestep values from one forward pass.
#[derive(Debug, Clone)]
pub struct RnnTrace {
    pub pre_states: Matrix,
    /// Row t holds h_t; every timestep is kept (full sequence output).
    pub states: Matrix,
}

#[derive(Debug, Clone)]
pub struct RnnGradients {
    pub input_weights: Matrix,
    pub recurrent_weights: Matrix,
    pub biases: Option<Matrix>,
}

impl SimpleRnn {
    pub fn new<R: Rng + ?Sized>(
        units: usize,
        input_size: usize,
        activation: ActivationFunction,
        use_bias: bool,
        rng: &mut R,
    ) -> SimpleRnn {
        SimpleRnn {
            units,
            input_weights: Matrix::xavier(input_size, units, rng),
            recurrent_weights: Matrix::xavier(units, units, rng),
            biases: use_bias.then(|| Matrix::zeros(1, units)),
            activator: activation,
        }
    }

    pub fn input_size(&self) -> usize {
        self.input_weights.rows
    }

    pub fn param_count(&self) -> usize {
        self.input_weights.len()
            + self.recurrent_weights.len()
            + self.biases.as_ref().map_or(0, Matrix::len)
    }

    pub fn forward(&self, inputs: &Matrix) -> RnnTrace {
        let steps = inputs.rows;
        let act = self.activator;
        let mut pre_states = Matrix::zeros(steps, self.units);
        let mut states = Matrix::zeros(steps, self.units);
        let mut hidden = Matrix::zeros(1, self.units);

        for t in 0..steps {
            let mut z = inputs.row(t).matmul(&self.input_weights)
                + hidden.matmul(&self.recurrent_weights);
            if let Some(biases) = &self.biases {
                z.add_assign(biases);
            }
            hidden = z.map(|x| act.function(x));
            pre_states.set_row(t, &z);
            states.set_row(t, &hidden);
        }

        RnnTrace { pre_states, states }
    }

    /// Backpropagation through time.
    ///
    /// `state_grads` row t is ∂L/∂h_t coming from the layer above. Gradient
    /// flowing back through the recurrence is added on top of it before the
    /// activation derivative is applied. Returns the parameter gradients and
    /// ∂L/∂x for every timestep.
    pub fn backward(
        &self,
        inputs: &Matrix,
        trace: &RnnTrace,
        state_grads: &Matrix,
    ) -> (RnnGradients, Matrix) {
        let steps = inputs.rows;
        let act = self.activator;
        let input_weights_t = self.input_weights.transpose();
        let recurrent_weights_t = self.recurrent_weights.transpose();

        let mut grads = RnnGradients {
            input_weights: Matrix::zeros(self.input_weights.rows, self.units),
            recurrent_weights: Matrix::zeros(self.units, self.units),
            biases: self.biases.as_ref().map(|_| Matrix::zeros(1, self.units)),
        };
        let mut input_grads = Matrix::zeros(steps, self.input_size());
        let mut carry = Matrix::zeros(1, self.units);

        for t in (0..steps).rev() {
            let mut dh = state_grads.row(t);
            dh.add_assign(&carry);
            let delta = dh.hadamard(&trace.pre_states.row(t).map(|x| act.derivative(x)));

            grads.input_weights.add_assign(&inputs.row(t).transpose().matmul(&delta));
            // h_{-1} is the zero vector, so step 0 adds nothing to W_hh.
            if t > 0 {
                grads.recurrent_weights
                    .add_assign(&trace.states.row(t - 1).transpose().matmul(&delta));
            }
            if let Some(biases) = grads.biases.as_mut() {
                biases.add_assign(&delta);
            }

            input_grads.set_row(t, &delta.matmul(&input_weights_t));
            carry = delta.matmul(&recurrent_weights_t);
        }

        (grads, input_grads)
    }

    pub fn parameters_mut(&mut self) -> Vec<&mut Matrix> {
        let mut params = vec![&mut self.input_weights, &mut self.recurrent_weights];
        if let Some(biases) = self.biases.as_mut() {
            params.push(biases);
        }
        params
    }
}

impl RnnTrace {
    /// h_T, the state after the final timestep.
    pub fn last_state(&self) -> Matrix {
        self.states.row(self.states.rows - 1)
    }
}

impl RnnGradients {
    pub fn into_tensors(self) -> Vec<Matrix> {
        let mut tensors = vec![self.input_weights, self.recurrent_weights];
        tensors.extend(self.biases);
        tensors
    }
}
