use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::{Error, Result};
use crate::loss::loss_type::LossType;

/// Architecture of the recurrent adder.
///
/// Fields:
/// - `input_size`        - features per timestep (one bit from each addend)
/// - `hidden_size`       - recurrent units
/// - `output_size`       - outputs per timestep (one sum bit)
/// - `hidden_activation` - applied inside the recurrence
/// - `output_activation` - applied by the per-timestep projection
/// - `use_bias`          - adds a bias row to both layers when `true`
/// - `return_sequences`  - the recurrent layer emits h_t for every timestep
/// - `loss`              - loss paired with the output activation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub input_size: usize,
    pub hidden_size: usize,
    pub output_size: usize,
    pub hidden_activation: ActivationFunction,
    pub output_activation: ActivationFunction,
    pub use_bias: bool,
    pub return_sequences: bool,
    pub loss: LossType,
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            input_size: 2,
            hidden_size: 16,
            output_size: 1,
            hidden_activation: ActivationFunction::Sigmoid,
            output_activation: ActivationFunction::Sigmoid,
            use_bias: false,
            return_sequences: true,
            loss: LossType::BinaryCrossEntropy,
        }
    }
}

impl ModelConfig {
    pub fn validate(&self) -> Result<()> {
        if self.input_size == 0 || self.hidden_size == 0 || self.output_size == 0 {
            return Err(Error::InvalidConfig(
                "input_size, hidden_size and output_size must all be positive".into(),
            ));
        }
        if !self.return_sequences {
            return Err(Error::InvalidConfig(
                "the per-timestep output layer needs return_sequences = true".into(),
            ));
        }
        if self.loss == LossType::BinaryCrossEntropy
            && self.output_activation != ActivationFunction::Sigmoid
        {
            return Err(Error::InvalidConfig(
                "binary cross-entropy expects a sigmoid output activation".into(),
            ));
        }
        Ok(())
    }

    /// Trainable parameters implied by this configuration.
    pub fn param_count(&self) -> usize {
        let (i, h, o) = (self.input_size, self.hidden_size, self.output_size);
        let weights = i * h + h * h + h * o;
        if self.use_bias { weights + h + o } else { weights }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_architecture_has_304_parameters() {
        assert_eq!(ModelConfig::default().param_count(), 304);
    }

    #[test]
    fn rejects_final_state_only_recurrence() {
        let config = ModelConfig { return_sequences: false, ..ModelConfig::default() };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: ModelConfig = serde_json::from_str(r#"{ "hidden_size": 8 }"#).unwrap();
        assert_eq!(config.hidden_size, 8);
        assert_eq!(config.input_size, 2);
        assert!(!config.use_bias);
        assert_eq!(config.param_count(), 2 * 8 + 8 * 8 + 8);
    }
}
