//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec served
//! at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "ChittySchema API",
        version = "0.1.0",
        description = "ChittyID pipeline gate, identifier inspection, and evidence ledger.",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        crate::routes::identifiers::classify_identifier,
        crate::routes::identifiers::get_identifier,
        crate::routes::evidence::record_evidence,
        crate::routes::evidence::get_evidence,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::state::EvidenceRecord,
        crate::routes::identifiers::ClassifyRequest,
        crate::routes::identifiers::ClassifyResponse,
        crate::routes::identifiers::ParsedIdentifierView,
        crate::routes::evidence::RecordEvidenceRequest,
    )),
    tags(
        (name = "identifiers", description = "ChittyID classification and parsing"),
        (name = "evidence", description = "Evidence ledger behind the ChittyID gate"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
