//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! Holds the service configuration, the evidence ledger, and the optional
//! Prometheus handle used to render `/metrics`.

use std::collections::HashMap;
use std::sync::Arc;

use chitty_core::{DocumentType, EmailHeaders};
use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Default issuance service advertised to callers that arrive without an identifier.
pub const DEFAULT_ISSUANCE_URL: &str = "https://id.chitty.cc";

/// Default port for the HTTP server.
pub const DEFAULT_PORT: u16 = 8080;

// -- Evidence ledger ----------------------------------------------------------

/// Evidence entry recorded under a gated ChittyID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EvidenceRecord {
    /// The ChittyID the evidence is filed under.
    pub chitty_id: String,
    /// File name as submitted.
    pub filename: String,
    /// Path of the file at the submitting site, if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_path: Option<String>,
    /// Lowercase hex SHA-256 of the file contents.
    pub sha256: String,
    /// File size in bytes.
    pub file_size: u64,
    /// Document type, given or inferred from the file name.
    #[schema(value_type = String, example = "EMAIL")]
    pub document_type: DocumentType,
    /// `From`/`To`/`Subject`/`Date` headers, for email evidence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub email: Option<EmailHeaders>,
    /// When this entry was first recorded.
    pub first_ingested_at: DateTime<Utc>,
    /// When this entry was last written.
    pub ingested_at: DateTime<Utc>,
}

/// Thread-safe evidence ledger keyed by ChittyID.
///
/// The RwLock is `parking_lot` and never held across `.await` points.
#[derive(Debug, Default, Clone)]
pub struct EvidenceLedger {
    data: Arc<RwLock<HashMap<String, EvidenceRecord>>>,
}

impl EvidenceLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `record.chitty_id`.
    ///
    /// On replacement the original `first_ingested_at` is kept. Returns the
    /// stored record and whether an entry already existed.
    pub fn upsert(&self, mut record: EvidenceRecord) -> (EvidenceRecord, bool) {
        let mut guard = self.data.write();
        let existed = match guard.get(&record.chitty_id) {
            Some(previous) => {
                record.first_ingested_at = previous.first_ingested_at;
                true
            }
            None => false,
        };
        guard.insert(record.chitty_id.clone(), record.clone());
        (record, existed)
    }

    /// Retrieve the entry for a ChittyID.
    pub fn get(&self, chitty_id: &str) -> Option<EvidenceRecord> {
        self.data.read().get(chitty_id).cloned()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the ledger is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// -- Configuration ------------------------------------------------------------

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Issuance service URL returned in 426 responses.
    pub issuance_url: String,
}

impl AppConfig {
    /// Build configuration from `PORT` and `CHITTY_ID_SERVICE_URL`.
    ///
    /// Unset or unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let issuance_url = std::env::var("CHITTY_ID_SERVICE_URL")
            .ok()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ISSUANCE_URL.to_string());
        Self { port, issuance_url }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            issuance_url: DEFAULT_ISSUANCE_URL.to_string(),
        }
    }
}

// -- AppState -----------------------------------------------------------------

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub evidence: EvidenceLedger,
    /// Present when a Prometheus recorder has been installed.
    pub metrics: Option<PrometheusHandle>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("evidence_entries", &self.evidence.len())
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}

impl AppState {
    /// State with an empty ledger and no metrics recorder.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            evidence: EvidenceLedger::new(),
            metrics: None,
        }
    }

    /// Attach the handle used to render `/metrics`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}
