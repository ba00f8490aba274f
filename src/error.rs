//! Crate-level error types.
//!
//! [`RemitError`] unifies every error source (configuration, HTTP, JSON,
//! file output, mail delivery) behind a single enum so callers can match on
//! the variant they care about while still using the `?` operator for easy
//! propagation.

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RemitError>;

/// Top-level error type returned by all public APIs.
#[derive(Debug, thiserror::Error)]
pub enum RemitError {
    /// A required configuration value is missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),

    /// An HTTP request failed at the transport level.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A filesystem operation failed.
    #[error("io error: {0}")]
    Io(String),

    /// The seller configuration file could not be read or parsed.
    #[error("seller config error: {0}")]
    Sellers(String),

    /// Writing the report artifact failed.
    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] csv::Error),

    /// A notification message could not be composed.
    #[error("mail error: {0}")]
    Mail(String),

    /// SMTP delivery failed.
    #[error("smtp error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}
