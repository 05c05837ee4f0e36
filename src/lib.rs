//! A from-scratch recurrent network that learns binary addition.
//!
//! Two addends are fed one bit pair per timestep, least significant bit
//! first; a simple recurrent layer carries the carry forward in its hidden
//! state and a dense projection shared across timesteps emits one sum bit
//! per step.

pub mod error;
pub mod math;
pub mod activation;
pub mod codec;
pub mod data;
pub mod layers;
pub mod network;
pub mod loss;
pub mod metrics;
pub mod optim;
pub mod train;
pub mod eval;

// Convenience re-exports
pub use error::{Error, Result};
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use codec::binary::BinaryCodec;
pub use data::generator::{AdditionExample, ExampleGenerator};
pub use network::network::SequenceModel;
pub use network::spec::ModelConfig;
pub use loss::loss_type::LossType;
pub use metrics::abs_error::SumAbsoluteError;
pub use optim::sgd::Sgd;
pub use train::{train_loop, train_step, TrainConfig};
pub use eval::probe::{adversarial_example, probe, ProbeResult};
