use thiserror::Error;

/// Errors surfaced by the codec, configuration and I/O paths.
///
/// Matrix shape mismatches inside arithmetic are programming errors and
/// still panic; this enum only covers inputs that come from outside.
#[derive(Debug, Error)]
pub enum Error {
    #[error("bit width {0} is not supported (expected 1..=32)")]
    InvalidWidth(usize),

    #[error("value {value} does not fit in {width} bits")]
    ValueOutOfRange { value: u64, width: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
