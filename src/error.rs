use thiserror::Error;

/// Result type for movie rating operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a serialization error
    pub fn serialization(msg: impl Into<String>) -> Self {
        Error::Serialization(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Error::NotFound(msg.into())
    }

    /// Create a model unavailable error
    pub fn model_unavailable(msg: impl Into<String>) -> Self {
        Error::ModelUnavailable(msg.into())
    }

    /// Create an inference error
    pub fn inference(msg: impl Into<String>) -> Self {
        Error::Inference(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Error::Internal(msg.into())
    }

    /// Which side of the request is at fault for this error.
    pub fn class(&self) -> ErrorClass {
        match self {
            Error::InvalidInput(_) => ErrorClass::Client,
            Error::ModelUnavailable(_) => ErrorClass::Unavailable,
            _ => ErrorClass::Server,
        }
    }
}

/// Coarse error classes surfaced to HTTP clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Bad, missing or out-of-range request fields
    Client,
    /// No usable model is loaded
    Unavailable,
    /// Inference, deserialization or any other unexpected failure
    Server,
}

/// Error context trait for adding context to errors
pub trait WithErrorContext {
    fn with_context(self, context: impl Into<String>) -> Self;
}

impl<T> WithErrorContext for Result<T> {
    fn with_context(self, context: impl Into<String>) -> Self {
        // The variant is kept so the error class survives the extra context.
        self.map_err(|e| {
            let context_str = context.into();
            match e {
                Error::Config(msg) => Error::Config(format!("{}: {}", context_str, msg)),
                Error::Serialization(msg) => Error::Serialization(format!("{}: {}", context_str, msg)),
                Error::Io(err) => Error::Io(std::io::Error::new(err.kind(), format!("{}: {}", context_str, err))),
                Error::InvalidInput(msg) => Error::InvalidInput(format!("{}: {}", context_str, msg)),
                Error::NotFound(msg) => Error::NotFound(format!("{}: {}", context_str, msg)),
                Error::ModelUnavailable(msg) => Error::ModelUnavailable(format!("{}: {}", context_str, msg)),
                Error::Inference(msg) => Error::Inference(format!("{}: {}", context_str, msg)),
                Error::Internal(msg) => Error::Internal(format!("{}: {}", context_str, msg)),
            }
        })
    }
}

/// Main error type for the rating server
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/Deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input or parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// No usable model is loaded
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// The model raised during inference
    #[error("Inference error: {0}")]
    Inference(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

// Implement From for common error types
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<rmp_serde::decode::Error> for Error {
    fn from(err: rmp_serde::decode::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<rmp_serde::encode::Error> for Error {
    fn from(err: rmp_serde::encode::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
