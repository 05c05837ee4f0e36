pub mod binary;

pub use binary::{reversed, BinaryCodec, DEFAULT_WIDTH};
