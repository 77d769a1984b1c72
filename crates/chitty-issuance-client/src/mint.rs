//! Mint endpoint of the ChittyID issuance service.
//!
//! | Method | Path       | Operation                        |
//! |--------|------------|----------------------------------|
//! | POST   | `/v1/mint` | Issue an identifier for metadata |
//!
//! Response body: `{ "chitty_id": "CT-A-CHI-0001-T-2401-A-01" }`.

use chitty_core::{evaluate, legacy_namespace, EntityType, ParsedIdentifier};
use serde::{Deserialize, Serialize};

use crate::error::IssuanceError;

/// Path of the mint endpoint relative to the service base URL.
const MINT_PATH: &str = "v1/mint";

/// Default domain for ChittySchema evidence.
pub const DEFAULT_DOMAIN: &str = "LEGAL";

/// Metadata sent to the issuance service with a mint request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MintRequest {
    pub entity_type: EntityType,
    pub domain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filepath: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
}

impl MintRequest {
    /// A request for the given entity type in the default domain.
    pub fn new(entity_type: EntityType) -> Self {
        Self {
            entity_type,
            domain: DEFAULT_DOMAIN.to_string(),
            case: None,
            filepath: None,
            file_size: None,
        }
    }

    /// Override the domain.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Attach a case reference.
    pub fn with_case(mut self, case: impl Into<String>) -> Self {
        self.case = Some(case.into());
        self
    }

    /// Attach the source file of an evidence item.
    pub fn with_file(mut self, filepath: impl Into<String>, file_size: u64) -> Self {
        self.filepath = Some(filepath.into());
        self.file_size = Some(file_size);
        self
    }
}

#[derive(Debug, Deserialize)]
struct MintResponse {
    #[serde(default)]
    chitty_id: Option<String>,
}

/// Client for the mint endpoint.
#[derive(Debug, Clone)]
pub struct MintClient {
    http: reqwest::Client,
    base_url: url::Url,
}

impl MintClient {
    pub(crate) fn new(http: reqwest::Client, base_url: url::Url) -> Self {
        Self { http, base_url }
    }

    /// Request a new identifier from the issuance service.
    ///
    /// Calls `POST {base_url}/v1/mint`. The returned identifier is run
    /// through the pipeline gate before it is handed back; anything other
    /// than an official identifier is an error.
    pub async fn mint(&self, req: &MintRequest) -> Result<ParsedIdentifier, IssuanceError> {
        let endpoint = "POST /v1/mint";
        let url = format!("{}{}", self.base_url, MINT_PATH);

        let resp = crate::retry::retry_send(|| self.http.post(&url).json(req).send())
            .await
            .map_err(|e| IssuanceError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(IssuanceError::Api {
                endpoint: endpoint.into(),
                status,
                body,
            });
        }

        let body: MintResponse =
            resp.json()
                .await
                .map_err(|e| IssuanceError::Deserialization {
                    endpoint: endpoint.into(),
                    source: e,
                })?;

        let identifier = body
            .chitty_id
            .ok_or_else(|| IssuanceError::MissingIdentifier {
                endpoint: endpoint.into(),
            })?;

        match evaluate(Some(&identifier)).into_result() {
            Ok(parsed) => {
                tracing::info!(
                    namespace = %parsed.namespace(),
                    entity_type = parsed.entity_type().as_str(),
                    "identifier issued"
                );
                Ok(parsed)
            }
            Err(source) => {
                tracing::error!(
                    legacy_namespace = legacy_namespace(&identifier).unwrap_or(""),
                    error = %source,
                    "issuance service returned an identifier the gate rejects"
                );
                Err(IssuanceError::NonCanonical { identifier, source })
            }
        }
    }
}
