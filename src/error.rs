//! Error type shared by the whole crate.

use std::fmt;

/// Error returned by fallible operations (dataset construction, file decoding,
/// configuration and the training loop).
///
/// Tensor kernels themselves do not return errors: a shape mismatch inside a
/// backend operation is a programming error and panics.
#[derive(Debug)]
pub enum Error {
    /// Shape mismatch between expected and actual dimensions.
    InvalidShape { expected: String, got: String },
    /// Invalid hyperparameter or argument value.
    InvalidParameter(String),
    /// Empty data provided where non-empty was required.
    EmptyData(String),
    /// Numerical breakdown during training (NaN or infinite loss).
    NumericalError(String),
    /// Malformed input file (bad magic number, truncated payload, ...).
    Format(String),
    /// I/O error during file operations.
    Io(String),
    /// Serialization or deserialization error.
    Serialization(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidShape { expected, got } => {
                write!(f, "Invalid shape: expected {}, got {}", expected, got)
            }
            Error::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            Error::EmptyData(msg) => write!(f, "Empty data: {}", msg),
            Error::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
            Error::Format(msg) => write!(f, "Format error: {}", msg),
            Error::Io(msg) => write!(f, "I/O error: {}", msg),
            Error::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
