//! `GET /metrics` — Prometheus text exposition.

use axum::extract::State;
use axum::routing::get;
use axum::Router;

use crate::error::AppError;
use crate::state::AppState;

/// Build the metrics router.
pub fn router() -> Router<AppState> {
    Router::new().route("/metrics", get(render_metrics))
}

/// Render the installed recorder, or 404 when none is configured.
pub async fn render_metrics(State(state): State<AppState>) -> Result<String, AppError> {
    state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .ok_or_else(|| AppError::NotFound("metrics recorder not installed".into()))
}
