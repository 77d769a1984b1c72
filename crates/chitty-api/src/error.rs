//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps gate decisions and identifier errors from chitty-core to HTTP status
//! codes with JSON bodies carrying an error code, message, and details.
//! Internal error details are never exposed in responses.

use axum::extract::rejection::JsonRejection;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chitty_core::{EvidenceError, IdentifierError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Protocol token advertised in the `Upgrade` header of 426 responses.
pub const UPGRADE_PROTOCOL: &str = "ChittyID";

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "CHITTY_ID_REQUIRED", "MALFORMED_ID").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional context, present only where the caller can act on it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// No ChittyID supplied on a gated route (426).
    #[error("{reason}")]
    IssuanceRequired {
        /// Gate reason.
        reason: String,
        /// Where the caller can obtain an identifier.
        issuance_url: String,
    },

    /// Supplied identifier uses the prohibited `CHITTY-` format (400).
    #[error("{0}")]
    LegacyProhibited(String),

    /// Supplied identifier fails the grammar (400).
    #[error("{0}")]
    MalformedIdentifier(String),

    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request validation failed (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Request body could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Gated identity does not match the requested resource (403).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::IssuanceRequired { .. } => (StatusCode::UPGRADE_REQUIRED, "CHITTY_ID_REQUIRED"),
            Self::LegacyProhibited(_) => (StatusCode::BAD_REQUEST, "LEGACY_ID_PROHIBITED"),
            Self::MalformedIdentifier(_) => (StatusCode::BAD_REQUEST, "MALFORMED_ID"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose internal error messages to clients.
        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        if matches!(&self, Self::Internal(_)) {
            tracing::error!(error = %self, "internal server error");
        }

        let details = match &self {
            Self::IssuanceRequired { issuance_url, .. } => {
                Some(serde_json::json!({ "issuance_url": issuance_url }))
            }
            _ => None,
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details,
            },
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UPGRADE_REQUIRED {
            response
                .headers_mut()
                .insert(header::UPGRADE, HeaderValue::from_static(UPGRADE_PROTOCOL));
        }
        response
    }
}

/// Convert parse failures on inspection routes to API errors.
///
/// Legacy tokens keep their dedicated code; any other grammar failure is a
/// validation error on the submitted value.
impl From<IdentifierError> for AppError {
    fn from(err: IdentifierError) -> Self {
        match err {
            IdentifierError::LegacyProhibited(_) => Self::LegacyProhibited(err.to_string()),
            IdentifierError::SegmentCount { .. } | IdentifierError::InvalidSegment { .. } => {
                Self::Validation(err.to_string())
            }
        }
    }
}

impl From<EvidenceError> for AppError {
    fn from(err: EvidenceError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// An unreadable JSON body is a 400, whatever the route.
impl From<JsonRejection> for AppError {
    fn from(err: JsonRejection) -> Self {
        Self::BadRequest(err.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn issuance_required_status_code() {
        let err = AppError::IssuanceRequired {
            reason: "missing".into(),
            issuance_url: "https://id.chitty.cc".into(),
        };
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::UPGRADE_REQUIRED);
        assert_eq!(code, "CHITTY_ID_REQUIRED");
    }

    #[test]
    fn identifier_rejection_status_codes() {
        let (status, code) = AppError::LegacyProhibited("x".into()).status_and_code();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "LEGACY_ID_PROHIBITED");

        let (status, code) = AppError::MalformedIdentifier("x".into()).status_and_code();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "MALFORMED_ID");
    }

    #[test]
    fn generic_status_codes() {
        assert_eq!(
            AppError::NotFound("x".into()).status_and_code(),
            (StatusCode::NOT_FOUND, "NOT_FOUND")
        );
        assert_eq!(
            AppError::Validation("x".into()).status_and_code(),
            (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR")
        );
        assert_eq!(
            AppError::BadRequest("x".into()).status_and_code(),
            (StatusCode::BAD_REQUEST, "BAD_REQUEST")
        );
        assert_eq!(
            AppError::Forbidden("x".into()).status_and_code(),
            (StatusCode::FORBIDDEN, "FORBIDDEN")
        );
        assert_eq!(
            AppError::Internal("x".into()).status_and_code(),
            (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
        );
    }

    #[tokio::test]
    async fn issuance_required_response_carries_upgrade_and_url() {
        let response = AppError::IssuanceRequired {
            reason: "identifier required".into(),
            issuance_url: "https://id.chitty.cc".into(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::UPGRADE_REQUIRED);
        assert_eq!(response.headers()[header::UPGRADE], "ChittyID");

        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "CHITTY_ID_REQUIRED");
        assert_eq!(json["error"]["message"], "identifier required");
        assert_eq!(json["error"]["details"]["issuance_url"], "https://id.chitty.cc");
    }

    #[tokio::test]
    async fn internal_error_hides_message() {
        let response = AppError::Internal("parser disagreed with classifier".into()).into_response();
        assert!(response.headers().get(header::UPGRADE).is_none());

        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "INTERNAL_ERROR");
        assert_eq!(json["error"]["message"], "An internal error occurred");
        assert!(json["error"].get("details").is_none());
    }

    #[test]
    fn identifier_error_conversion() {
        let legacy: AppError = IdentifierError::LegacyProhibited("CHITTY-X".into()).into();
        assert!(matches!(legacy, AppError::LegacyProhibited(_)));

        let count: AppError = IdentifierError::SegmentCount {
            token: "AB".into(),
            found: 1,
        }
        .into();
        assert!(matches!(count, AppError::Validation(_)));
    }

    #[test]
    fn evidence_error_conversion() {
        let err: AppError = EvidenceError::InvalidDigest("zz".into()).into();
        assert!(matches!(err, AppError::Validation(ref m) if m.contains("zz")));
    }
}
