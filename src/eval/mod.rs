pub mod probe;

pub use probe::{accuracy, adversarial_example, probe, ProbeResult};
