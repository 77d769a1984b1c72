//! # chitty-issuance-client -- Typed Rust client for the ChittyID issuance service
//!
//! The issuance service at `id.chitty.cc` is the only legitimate source of
//! official ChittyIDs. This crate is the only path the workspace uses to
//! reach it; no other crate issues HTTP requests to the service.
//!
//! Every identifier the service hands back passes through
//! [`chitty_core::evaluate`] before a caller sees it. A legacy or malformed
//! identifier from the service is reported as
//! [`IssuanceError::NonCanonical`], never passed on.

pub mod config;
pub mod error;
pub mod mint;
pub(crate) mod retry;

pub use config::{ConfigError, IssuanceConfig};
pub use error::IssuanceError;
pub use mint::MintRequest;

use std::time::Duration;

use chitty_core::ParsedIdentifier;

/// Top-level issuance client.
#[derive(Debug, Clone)]
pub struct IssuanceClient {
    mint: mint::MintClient,
}

impl IssuanceClient {
    /// Create a new client from configuration.
    pub fn new(config: IssuanceConfig) -> Result<Self, IssuanceError> {
        let mut auth = reqwest::header::HeaderValue::from_str(&format!(
            "Bearer {}",
            config.api_token.as_str()
        ))
        .map_err(|_| IssuanceError::Config(ConfigError::InvalidToken))?;
        auth.set_sensitive(true);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(reqwest::header::AUTHORIZATION, auth);
                headers
            })
            .build()
            .map_err(|e| IssuanceError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            mint: mint::MintClient::new(http, config.base_url),
        })
    }

    /// Access the mint endpoint client.
    pub fn mint_client(&self) -> &mint::MintClient {
        &self.mint
    }

    /// Request a new identifier. Shorthand for `mint_client().mint(req)`.
    pub async fn mint(&self, req: &MintRequest) -> Result<ParsedIdentifier, IssuanceError> {
        self.mint.mint(req).await
    }
}
