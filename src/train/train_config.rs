use serde::{Serialize, Deserialize};

use crate::codec::binary::DEFAULT_WIDTH;
use crate::error::{Error, Result};
use crate::network::spec::ModelConfig;
use crate::optim::sgd::Sgd;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `iterations`    - number of examples seen; one SGD step each
/// - `report_every`  - a progress report is emitted when
///                     `iteration % report_every == 0`
/// - `seed`          - seeds weight initialization and example generation;
///                     `None` draws a seed from the OS
/// - `width`         - bits per number (addends stay below `2^(width-1)`)
/// - `learning_rate`, `momentum`, `decay`, `nesterov` - SGD settings
/// - `model`         - architecture of the recurrent adder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub iterations: usize,
    pub report_every: usize,
    pub seed: Option<u64>,
    pub width: usize,
    pub learning_rate: f64,
    pub momentum: f64,
    pub decay: f64,
    pub nesterov: bool,
    pub model: ModelConfig,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            iterations: 100_000,
            report_every: 10_000,
            seed: None,
            width: DEFAULT_WIDTH,
            learning_rate: 1.0,
            momentum: 0.0,
            decay: 0.0,
            nesterov: false,
            model: ModelConfig::default(),
        }
    }
}

impl TrainConfig {
    /// Creates the reference configuration with a different iteration budget.
    pub fn new(iterations: usize) -> Self {
        TrainConfig { iterations, ..TrainConfig::default() }
    }

    pub fn validate(&self) -> Result<()> {
        if self.report_every == 0 {
            return Err(Error::InvalidConfig("report_every must be at least 1".into()));
        }
        if self.width < 2 {
            return Err(Error::InvalidConfig(format!(
                "width must be at least 2 to hold a carry, got {}", self.width
            )));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "learning_rate must be positive, got {}", self.learning_rate
            )));
        }
        if !(0.0..1.0).contains(&self.momentum) {
            return Err(Error::InvalidConfig(format!(
                "momentum must be in [0, 1), got {}", self.momentum
            )));
        }
        if self.decay < 0.0 {
            return Err(Error::InvalidConfig(format!("decay must be non-negative, got {}", self.decay)));
        }
        if self.model.input_size != 2 || self.model.output_size != 1 {
            return Err(Error::InvalidConfig(
                "binary addition needs input_size = 2 and output_size = 1".into(),
            ));
        }
        self.model.validate()
    }

    /// Builds the optimizer described by this config.
    pub fn optimizer(&self) -> Sgd {
        Sgd::with_momentum(self.learning_rate, self.momentum, self.decay, self.nesterov)
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes and validates a config from a JSON file.
    pub fn load_json(path: &str) -> Result<TrainConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config: TrainConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_plain_sgd_for_100k_steps() {
        let config = TrainConfig::default();
        assert_eq!(config.iterations, 100_000);
        assert_eq!(config.report_every, 10_000);
        assert_eq!(config.momentum, 0.0);
        assert_eq!(config.decay, 0.0);
        assert!(!config.nesterov);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("train.json");
        let path = path.to_str().unwrap();

        let config = TrainConfig { seed: Some(17), learning_rate: 0.5, ..TrainConfig::new(2_000) };
        config.save_json(path).unwrap();
        assert_eq!(TrainConfig::load_json(path).unwrap(), config);
    }

    #[test]
    fn load_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{ "report_every": 0 }"#).unwrap();
        let err = TrainConfig::load_json(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn load_reports_missing_file_and_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(TrainConfig::load_json(missing.to_str().unwrap()), Err(Error::Io(_))));

        let garbled = dir.path().join("garbled.json");
        std::fs::write(&garbled, "{ iterations: ").unwrap();
        assert!(matches!(TrainConfig::load_json(garbled.to_str().unwrap()), Err(Error::Json(_))));
    }

    #[test]
    fn rejects_momentum_of_one() {
        let config = TrainConfig { momentum: 1.0, ..TrainConfig::default() };
        assert!(config.validate().is_err());
    }
}
