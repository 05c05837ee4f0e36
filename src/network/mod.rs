pub mod network;
pub mod spec;

pub use network::{ForwardTrace, Gradients, SequenceModel};
pub use spec::ModelConfig;
