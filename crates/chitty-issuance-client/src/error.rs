//! Issuance client error types.

use chitty_core::GateError;

/// Errors from issuance service calls.
#[derive(Debug, thiserror::Error)]
pub enum IssuanceError {
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The service returned a non-2xx status.
    #[error("issuance service {endpoint} returned {status}: {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Response deserialization failed.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The service answered 2xx without an identifier.
    #[error("issuance service {endpoint} returned no chitty_id")]
    MissingIdentifier { endpoint: String },
    /// The service returned an identifier the pipeline gate refuses.
    #[error("issuance service returned non-canonical identifier \"{identifier}\": {source}")]
    NonCanonical {
        identifier: String,
        source: GateError,
    },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}
