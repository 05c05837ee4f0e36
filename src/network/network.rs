use rand::Rng;

use crate::error::{Error, Result};
use crate::layers::dense::{Dense, DenseTrace};
use crate::layers::recurrent::{RnnTrace, SimpleRnn};
use crate::math::matrix::Matrix;
use crate::network::spec::ModelConfig;

/// Recurrent layer followed by a dense projection shared across timesteps.
///
/// The model owns its parameters outright; `forward` and `backward` only
/// read them, and the optimizer is the sole writer (through
/// [`SequenceModel::parameters_mut`]).
#[derive(Debug, Clone)]
pub struct SequenceModel {
    pub config: ModelConfig,
    pub recurrent: SimpleRnn,
    pub output: Dense,
}

/// Everything a forward pass produced, kept for backpropagation.
#[derive(Debug, Clone)]
pub struct ForwardTrace {
    pub inputs: Matrix,
    pub recurrent: RnnTrace,
    pub output: DenseTrace,
}

/// One gradient tensor per parameter, ordered like `parameters_mut()`.
#[derive(Debug, Clone)]
pub struct Gradients {
    pub tensors: Vec<Matrix>,
}

impl SequenceModel {
    pub fn new<R: Rng + ?Sized>(config: ModelConfig, rng: &mut R) -> Result<SequenceModel> {
        config.validate()?;
        let recurrent = SimpleRnn::new(
            config.hidden_size,
            config.input_size,
            config.hidden_activation,
            config.use_bias,
            rng,
        );
        let output = Dense::new(
            config.output_size,
            config.hidden_size,
            config.output_activation,
            config.use_bias,
            rng,
        );
        Ok(SequenceModel { config, recurrent, output })
    }

    pub fn param_count(&self) -> usize {
        self.recurrent.param_count() + self.output.param_count()
    }

    /// Runs the whole sequence from a zero hidden state.
    pub fn forward(&self, inputs: &Matrix) -> ForwardTrace {
        let recurrent = self.recurrent.forward(inputs);
        let output = self.output.forward(&recurrent.states);
        ForwardTrace { inputs: inputs.clone(), recurrent, output }
    }

    /// Output probabilities, one row per timestep.
    pub fn predict(&self, inputs: &Matrix) -> Matrix {
        self.forward(inputs).output.neurons
    }

    /// Same as `predict`, but rejects inputs whose feature width is wrong.
    pub fn try_predict(&self, inputs: &Matrix) -> Result<Matrix> {
        if inputs.cols != self.config.input_size {
            return Err(Error::ShapeMismatch {
                expected: format!("T × {}", self.config.input_size),
                actual: format!("{} × {}", inputs.rows, inputs.cols),
            });
        }
        Ok(self.predict(inputs))
    }

    pub fn loss(&self, trace: &ForwardTrace, target: &Matrix) -> f64 {
        self.config.loss.loss(&trace.output.neurons, target)
    }

    /// Backpropagation through time for the whole sequence.
    pub fn backward(&self, trace: &ForwardTrace, target: &Matrix) -> Gradients {
        let output_grad = self.config.loss.derivative(&trace.output.neurons, target);
        let (dense_grads, state_grads) =
            self.output.backward(&trace.recurrent.states, &trace.output, &output_grad);
        let (rnn_grads, _) = self.recurrent.backward(&trace.inputs, &trace.recurrent, &state_grads);

        let mut tensors = rnn_grads.into_tensors();
        tensors.extend(dense_grads.into_tensors());
        Gradients { tensors }
    }

    pub fn parameters_mut(&mut self) -> Vec<&mut Matrix> {
        let mut params = self.recurrent.parameters_mut();
        params.extend(self.output.parameters_mut());
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activation::ActivationFunction;
    use crate::loss::loss_type::LossType;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn model(config: ModelConfig) -> SequenceModel {
        SequenceModel::new(config, &mut ChaCha8Rng::seed_from_u64(42)).unwrap()
    }

    fn sample() -> (Matrix, Matrix) {
        let inputs = Matrix::from_data(vec![
            vec![1.0, 1.0], vec![0.0, 1.0], vec![1.0, 0.0], vec![0.0, 0.0],
        ]);
        let target = Matrix::from_data(vec![vec![0.0], vec![0.0], vec![0.0], vec![1.0]]);
        (inputs, target)
    }

    /// Compares analytic gradients with central differences on the loss.
    fn check_gradients(config: ModelConfig) {
        let mut net = model(config);
        let (inputs, target) = sample();
        let trace = net.forward(&inputs);
        let analytic = net.backward(&trace, &target);

        let h = 1e-5;
        let n_params = net.parameters_mut().len();
        assert_eq!(analytic.tensors.len(), n_params);
        for p in 0..n_params {
            let (rows, cols) = {
                let params = net.parameters_mut();
                (params[p].rows, params[p].cols)
            };
            for i in 0..rows {
                for j in 0..cols {
                    net.parameters_mut()[p].data[i][j] += h;
                    let up = net.loss(&net.forward(&inputs), &target);
                    net.parameters_mut()[p].data[i][j] -= 2.0 * h;
                    let down = net.loss(&net.forward(&inputs), &target);
                    net.parameters_mut()[p].data[i][j] += h;

                    let numeric = (up - down) / (2.0 * h);
                    let exact = analytic.tensors[p].data[i][j];
                    assert!(
                        (numeric - exact).abs() < 1e-6 + 1e-4 * exact.abs(),
                        "param {p} [{i}][{j}]: numeric {numeric} vs analytic {exact}"
                    );
                }
            }
        }
    }

    #[test]
    fn bptt_matches_finite_differences() {
        check_gradients(ModelConfig { hidden_size: 5, ..ModelConfig::default() });
    }

    #[test]
    fn bptt_matches_finite_differences_with_bias_and_mse() {
        check_gradients(ModelConfig {
            hidden_size: 3,
            use_bias: true,
            hidden_activation: ActivationFunction::Tanh,
            output_activation: ActivationFunction::Identity,
            loss: LossType::Mse,
            ..ModelConfig::default()
        });
    }

    #[test]
    fn parameter_count_matches_config() {
        let net = model(ModelConfig::default());
        assert_eq!(net.param_count(), 304);
        assert_eq!(net.param_count(), net.config.param_count());
        let biased = model(ModelConfig { use_bias: true, ..ModelConfig::default() });
        assert_eq!(biased.param_count(), 304 + 16 + 1);
    }

    #[test]
    fn forward_is_pure() {
        let net = model(ModelConfig::default());
        let (inputs, _) = sample();
        assert_eq!(net.predict(&inputs), net.predict(&inputs));
    }

    #[test]
    fn outputs_one_probability_per_timestep() {
        let net = model(ModelConfig::default());
        let out = net.predict(&Matrix::zeros(8, 2));
        assert_eq!((out.rows, out.cols), (8, 1));
        assert!(out.iter().all(|&p| p > 0.0 && p < 1.0));
    }

    #[test]
    fn try_predict_checks_feature_width() {
        let net = model(ModelConfig::default());
        assert!(matches!(net.try_predict(&Matrix::zeros(8, 3)), Err(Error::ShapeMismatch { .. })));
        assert!(net.try_predict(&Matrix::zeros(8, 2)).is_ok());
    }
}
