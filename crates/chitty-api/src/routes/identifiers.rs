//! # Identifier Inspection
//!
//! Ungated endpoints for checking a token before it is used. Classification
//! never answers 426; it reports what the token is.
//!
//! | Method | Path                         | Operation                 |
//! |--------|------------------------------|---------------------------|
//! | POST   | `/v1/identifiers/classify`   | Classify any token        |
//! | GET    | `/v1/identifiers/{token}`    | Parse an official token   |

use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::routing::{get, post};
use axum::{Json, Router};
use chitty_core::{classify, parse, IdentifierClass, ParsedIdentifier};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::state::AppState;

/// Classification request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ClassifyRequest {
    /// Token to classify. May be any string.
    pub token: String,
}

/// Named segments of an official ChittyID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ParsedIdentifierView {
    /// Canonical token.
    pub identifier: String,
    pub version: String,
    pub geography: String,
    pub location: String,
    pub sequence: String,
    /// One of `PERSON`, `LOCATION`, `THING`, `EVENT`.
    pub entity_type: String,
    pub year_month: String,
    pub check_code: String,
    pub sub_index: String,
    /// `version-geography-location` prefix used for routing.
    pub namespace: String,
    /// First day of the issue month, when the year-month segment is numeric.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_month: Option<NaiveDate>,
}

impl From<&ParsedIdentifier> for ParsedIdentifierView {
    fn from(id: &ParsedIdentifier) -> Self {
        Self {
            identifier: id.to_string(),
            version: id.version().to_string(),
            geography: id.geography().to_string(),
            location: id.location().to_string(),
            sequence: id.sequence().to_string(),
            entity_type: id.entity_type().as_str().to_ascii_uppercase(),
            year_month: id.year_month().to_string(),
            check_code: id.check_code().to_string(),
            sub_index: id.sub_index().to_string(),
            namespace: id.namespace(),
            issue_month: id.issue_month(),
        }
    }
}

/// Classification result.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClassifyResponse {
    /// `official`, `legacy_prohibited`, or `malformed`.
    #[schema(value_type = String, example = "official")]
    pub class: IdentifierClass,
    /// Parsed segments, present only for official tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parsed: Option<ParsedIdentifierView>,
}

/// Build the identifier inspection router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/identifiers/classify", post(classify_identifier))
        .route("/v1/identifiers/{token}", get(get_identifier))
}

/// POST /v1/identifiers/classify — Classify a token.
#[utoipa::path(
    post,
    path = "/v1/identifiers/classify",
    request_body = ClassifyRequest,
    responses(
        (status = 200, description = "Token classified", body = ClassifyResponse),
        (status = 400, description = "Unreadable body", body = crate::error::ErrorBody),
    ),
    tag = "identifiers"
)]
pub async fn classify_identifier(
    body: Result<Json<ClassifyRequest>, JsonRejection>,
) -> Result<Json<ClassifyResponse>, AppError> {
    let Json(req) = body?;
    let class = classify(Some(&req.token));
    let parsed = match class {
        IdentifierClass::Official => {
            let id = parse(&req.token).map_err(|e| {
                AppError::Internal(format!("official token failed to parse: {e}"))
            })?;
            Some(ParsedIdentifierView::from(&id))
        }
        IdentifierClass::LegacyProhibited | IdentifierClass::Malformed => None,
    };
    Ok(Json(ClassifyResponse { class, parsed }))
}

/// GET /v1/identifiers/{token} — Parse an official token.
#[utoipa::path(
    get,
    path = "/v1/identifiers/{token}",
    params(("token" = String, Path, description = "Token to parse")),
    responses(
        (status = 200, description = "Official identifier", body = ParsedIdentifierView),
        (status = 400, description = "Legacy CHITTY- identifier", body = crate::error::ErrorBody),
        (status = 422, description = "Malformed identifier", body = crate::error::ErrorBody),
    ),
    tag = "identifiers"
)]
pub async fn get_identifier(
    Path(token): Path<String>,
) -> Result<Json<ParsedIdentifierView>, AppError> {
    let id = parse(&token)?;
    Ok(Json(ParsedIdentifierView::from(&id)))
}
