use crate::{
    data::generator::AdditionExample,
    metrics::abs_error::SumAbsoluteError,
    network::network::SequenceModel,
    optim::sgd::Sgd,
    train::step_stats::StepStats,
};

/// One stochastic gradient step on a single example (batch size 1).
///
/// Forward pass, loss and metric, backpropagation through time, then the
/// optimizer update. The reported loss and metric describe the weights
/// *before* the update.
pub fn train_step(
    model: &mut SequenceModel,
    optimizer: &mut Sgd,
    example: &AdditionExample,
) -> StepStats {
    let trace = model.forward(&example.inputs);

    let loss = model.loss(&trace, &example.target);
    // Monitoring only; the gradient comes from the loss alone.
    let abs_error = SumAbsoluteError::compute(&trace.output.neurons, &example.target);

    let grads = model.backward(&trace, &example.target);
    optimizer.step(model, &grads);

    StepStats { loss, abs_error }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::binary::BinaryCodec;
    use crate::network::spec::ModelConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn repeated_steps_on_one_example_lower_its_loss() {
        let mut model = SequenceModel::new(ModelConfig::default(), &mut ChaCha8Rng::seed_from_u64(3)).unwrap();
        let mut optimizer = Sgd::new(0.5);
        let example = AdditionExample::from_addends(&BinaryCodec::default(), 45, 70);

        let first = train_step(&mut model, &mut optimizer, &example);
        let mut last = first;
        for _ in 0..200 {
            last = train_step(&mut model, &mut optimizer, &example);
        }
        assert!(last.loss < first.loss, "{} !< {}", last.loss, first.loss);
        assert!(last.abs_error < first.abs_error);
        assert_eq!(optimizer.iterations(), 201);
    }

    #[test]
    fn step_changes_every_weight_matrix() {
        let mut model = SequenceModel::new(ModelConfig::default(), &mut ChaCha8Rng::seed_from_u64(4)).unwrap();
        let before = model.clone();
        let example = AdditionExample::from_addends(&BinaryCodec::default(), 99, 27);
        train_step(&mut model, &mut Sgd::new(1.0), &example);

        assert_ne!(model.recurrent.input_weights, before.recurrent.input_weights);
        assert_ne!(model.recurrent.recurrent_weights, before.recurrent.recurrent_weights);
        assert_ne!(model.output.weights, before.output.weights);
    }
}
