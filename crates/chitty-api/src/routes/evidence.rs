//! # Evidence Ledger
//!
//! Gated endpoints. Every request here has passed the ChittyID gate; the
//! admitted identifier is the ledger key.
//!
//! | Method | Path                          | Operation                      |
//! |--------|-------------------------------|--------------------------------|
//! | POST   | `/v1/evidence`                | Record (upsert) evidence       |
//! | GET    | `/v1/evidence/{chitty_id}`    | Fetch the caller's evidence    |

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chitty_core::{DocumentType, EmailHeaders, EvidenceError, FileDigest};
use chrono::Utc;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::middleware::gate::GatedIdentity;
use crate::state::{AppState, EvidenceRecord};

/// Evidence submission.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordEvidenceRequest {
    /// File name, used to infer the document type when none is given.
    pub filename: String,
    /// Path of the file at the submitting site.
    #[serde(default)]
    pub original_path: Option<String>,
    /// Hex SHA-256 of the file contents (64 characters).
    pub sha256: String,
    /// File size in bytes.
    pub file_size: u64,
    /// Explicit document type; inferred from `filename` when absent.
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "PDF")]
    pub document_type: Option<DocumentType>,
    /// Message headers, for email evidence.
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub email: Option<EmailHeaders>,
}

/// A submission whose metadata has been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceSubmission {
    pub filename: String,
    pub original_path: Option<String>,
    pub sha256: FileDigest,
    pub file_size: u64,
    pub document_type: DocumentType,
    pub email: Option<EmailHeaders>,
}

impl TryFrom<RecordEvidenceRequest> for EvidenceSubmission {
    type Error = EvidenceError;

    fn try_from(req: RecordEvidenceRequest) -> Result<Self, Self::Error> {
        if req.filename.trim().is_empty() {
            return Err(EvidenceError::EmptyFilename);
        }
        let sha256 = FileDigest::from_hex(&req.sha256)?;
        let document_type = req
            .document_type
            .unwrap_or_else(|| DocumentType::from_filename(&req.filename));
        Ok(Self {
            filename: req.filename,
            original_path: req.original_path,
            sha256,
            file_size: req.file_size,
            document_type,
            email: req.email.filter(|h| !h.is_empty()),
        })
    }
}

/// Build the evidence router. Mount behind the gate middleware.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/evidence", post(record_evidence))
        .route("/v1/evidence/{chitty_id}", get(get_evidence))
}

/// POST /v1/evidence — Record evidence under the gated ChittyID.
///
/// Re-submitting under the same identifier replaces the entry.
#[utoipa::path(
    post,
    path = "/v1/evidence",
    request_body = RecordEvidenceRequest,
    params(("X-ChittyID" = String, Header, description = "Official ChittyID")),
    responses(
        (status = 201, description = "Evidence recorded", body = EvidenceRecord),
        (status = 200, description = "Existing entry replaced", body = EvidenceRecord),
        (status = 400, description = "Legacy or malformed ChittyID", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid evidence metadata", body = crate::error::ErrorBody),
        (status = 426, description = "ChittyID required", body = crate::error::ErrorBody),
    ),
    tag = "evidence"
)]
pub async fn record_evidence(
    State(state): State<AppState>,
    GatedIdentity(identifier): GatedIdentity,
    body: Result<Json<RecordEvidenceRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<EvidenceRecord>), AppError> {
    let Json(req) = body?;
    let submission = EvidenceSubmission::try_from(req)?;
    let now = Utc::now();

    let record = EvidenceRecord {
        chitty_id: identifier.to_string(),
        filename: submission.filename,
        original_path: submission.original_path,
        sha256: submission.sha256.to_hex(),
        file_size: submission.file_size,
        document_type: submission.document_type,
        email: submission.email,
        first_ingested_at: now,
        ingested_at: now,
    };

    let (stored, existed) = state.evidence.upsert(record);
    tracing::info!(
        namespace = %identifier.namespace(),
        document_type = %stored.document_type,
        replaced = existed,
        "evidence recorded"
    );

    let status = if existed {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(stored)))
}

/// GET /v1/evidence/{chitty_id} — Fetch evidence filed under the caller's ChittyID.
#[utoipa::path(
    get,
    path = "/v1/evidence/{chitty_id}",
    params(
        ("chitty_id" = String, Path, description = "ChittyID the evidence is filed under"),
        ("X-ChittyID" = String, Header, description = "Official ChittyID; must equal the path"),
    ),
    responses(
        (status = 200, description = "Evidence found", body = EvidenceRecord),
        (status = 403, description = "Path does not match the gated ChittyID", body = crate::error::ErrorBody),
        (status = 404, description = "No evidence recorded", body = crate::error::ErrorBody),
        (status = 426, description = "ChittyID required", body = crate::error::ErrorBody),
    ),
    tag = "evidence"
)]
pub async fn get_evidence(
    State(state): State<AppState>,
    GatedIdentity(identifier): GatedIdentity,
    Path(chitty_id): Path<String>,
) -> Result<Json<EvidenceRecord>, AppError> {
    if chitty_id != identifier.to_string() {
        return Err(AppError::Forbidden(
            "requested ChittyID does not match X-ChittyID".into(),
        ));
    }
    state
        .evidence
        .get(&chitty_id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("no evidence recorded for {chitty_id}")))
}
