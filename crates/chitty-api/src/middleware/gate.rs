//! # ChittyID Gate Middleware
//!
//! Applies the pipeline gate to every request on a gated router. The
//! identifier travels in the `X-ChittyID` header.
//!
//! | Gate decision                  | Response                         |
//! |--------------------------------|----------------------------------|
//! | `Allow`                        | handler runs, [`GatedIdentity`] set |
//! | `RequireIssuance`              | 426 `CHITTY_ID_REQUIRED`         |
//! | `Reject` legacy                | 400 `LEGACY_ID_PROHIBITED`       |
//! | `Reject` malformed             | 400 `MALFORMED_ID`               |
//! | `Reject` internal inconsistency| 500 `INTERNAL_ERROR`             |
//!
//! ## GatedIdentity
//!
//! Handlers extract the admitted identifier via the `FromRequestParts`
//! impl on [`GatedIdentity`].

use axum::extract::Request;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chitty_core::{evaluate, legacy_namespace, GateDecision, ParsedIdentifier, RejectionKind};

use crate::error::AppError;
use crate::middleware::metrics::record_gate_decision;

/// Request header carrying the caller's ChittyID.
pub const CHITTY_ID_HEADER: &str = "x-chittyid";

/// Gate configuration injected into request extensions.
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Issuance service advertised in 426 responses.
    pub issuance_url: String,
}

/// Identifier admitted by the gate for the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatedIdentity(pub ParsedIdentifier);

/// Extracts the identity that the gate middleware injected into extensions.
/// Returns 500 if none is present: the route was mounted outside the gate.
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for GatedIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<GatedIdentity>()
            .cloned()
            .ok_or_else(|| AppError::Internal("no gated identity in request context".into()))
    }
}

/// Map a gate decision onto the request outcome.
///
/// `supplied` is only used for diagnostics on legacy rejections.
pub fn decision_to_result(
    decision: GateDecision,
    supplied: Option<&str>,
    config: &GateConfig,
) -> Result<ParsedIdentifier, AppError> {
    match decision {
        GateDecision::Allow { identifier } => Ok(identifier),
        GateDecision::RequireIssuance { reason } => {
            tracing::info!("request without ChittyID, issuance required");
            Err(AppError::IssuanceRequired {
                reason: reason.to_string(),
                issuance_url: config.issuance_url.clone(),
            })
        }
        GateDecision::Reject { kind, reason } => match kind {
            RejectionKind::LegacyProhibited => {
                tracing::warn!(
                    legacy_namespace = supplied.and_then(legacy_namespace).unwrap_or(""),
                    "legacy CHITTY- identifier rejected"
                );
                Err(AppError::LegacyProhibited(reason.to_string()))
            }
            RejectionKind::MalformedIdentifier => {
                tracing::debug!("malformed ChittyID rejected");
                Err(AppError::MalformedIdentifier(reason.to_string()))
            }
            RejectionKind::InternalInconsistency => Err(AppError::Internal(format!(
                "gate inconsistency: {reason}"
            ))),
        },
    }
}

/// Read `X-ChittyID`, evaluate the gate, and either admit or refuse the request.
///
/// A header that is not valid UTF-8 is evaluated lossily; it can never
/// satisfy the grammar, so it is refused as malformed (or legacy, if the
/// prefix survives).
pub async fn gate_middleware(mut request: Request, next: Next) -> Response {
    let config = request
        .extensions()
        .get::<GateConfig>()
        .cloned()
        .unwrap_or_else(|| GateConfig {
            issuance_url: crate::state::DEFAULT_ISSUANCE_URL.to_string(),
        });

    let supplied = request
        .headers()
        .get(CHITTY_ID_HEADER)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());

    let decision = evaluate(supplied.as_deref());
    record_gate_decision(decision.outcome());

    match decision_to_result(decision, supplied.as_deref(), &config) {
        Ok(identifier) => {
            tracing::debug!(namespace = %identifier.namespace(), "ChittyID admitted");
            request.extensions_mut().insert(GatedIdentity(identifier));
            next.run(request).await
        }
        Err(err) => err.into_response(),
    }
}
