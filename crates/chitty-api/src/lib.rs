//! # chitty-api — Axum Gate Service for ChittySchema
//!
//! Applies the ChittyID pipeline gate to HTTP traffic. Gated routes read
//! the `X-ChittyID` header and proceed only for official identifiers issued
//! by the ChittyID service; callers without one are pointed at the issuance
//! service with a 426.
//!
//! ## API Surface
//!
//! | Prefix                | Module                     | Gated |
//! |-----------------------|----------------------------|-------|
//! | `/v1/identifiers/*`   | [`routes::identifiers`]    | no    |
//! | `/v1/evidence/*`      | [`routes::evidence`]       | yes   |
//! | `/metrics`            | [`routes::metrics`]        | no    |
//! | `/openapi.json`       | [`openapi`]                | no    |
//! | `/health/*`           | health checks              | no    |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → GateMiddleware (gated routes only) → Handler
//! ```

pub mod error;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

pub use error::AppError;
pub use state::{AppConfig, AppState};

use axum::middleware::from_fn;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::middleware::gate::GateConfig;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let gate_config = GateConfig {
        issuance_url: state.config.issuance_url.clone(),
    };

    // Routes that require an official ChittyID.
    let gated = routes::evidence::router()
        .route_layer(from_fn(middleware::gate::gate_middleware))
        .layer(axum::Extension(gate_config));

    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new()
        .merge(health)
        .merge(gated)
        .merge(routes::identifiers::router())
        .merge(routes::metrics::router())
        .merge(openapi::router())
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness check: 200 while the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness check: the service has no external dependencies to wait on.
async fn readiness() -> &'static str {
    "ready"
}
