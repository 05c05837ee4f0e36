pub mod generator;

pub use generator::{AdditionExample, ExampleGenerator};
