//! Error types for the dosemix_core library.

use crate::Field;
use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for dosemix_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing error
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A field (or a value derived from it) cannot be used in the calculation
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: Field, reason: String },

    /// A derived value overflowed or lost meaning despite valid input
    #[error("Derived value {0} is not a finite number")]
    NonFinite(&'static str),

    /// QR code could not be generated
    #[error("QR code error: {0}")]
    Qr(String),
}

impl Error {
    pub(crate) fn invalid(field: Field, reason: impl Into<String>) -> Self {
        Error::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}
