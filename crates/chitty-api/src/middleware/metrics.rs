//! # Prometheus Metrics
//!
//! Counters recorded through the `metrics` facade. Without an installed
//! recorder they are no-ops; the binary installs the Prometheus exporter and
//! `/metrics` renders its handle.
//!
//! | Metric                             | Labels             |
//! |------------------------------------|--------------------|
//! | `chitty_http_requests_total`       | `method`, `status` |
//! | `chitty_gate_decisions_total`      | `outcome`          |

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

/// Counter of HTTP requests by method and response status.
pub const HTTP_REQUESTS_TOTAL: &str = "chitty_http_requests_total";

/// Counter of gate decisions by outcome.
pub const GATE_DECISIONS_TOTAL: &str = "chitty_gate_decisions_total";

/// Count one gate decision. `outcome` is [`chitty_core::GateDecision::outcome`].
pub fn record_gate_decision(outcome: &'static str) {
    metrics::counter!(GATE_DECISIONS_TOTAL, "outcome" => outcome).increment(1);
}

/// Middleware that counts every request once its response is known.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();

    let response = next.run(request).await;

    metrics::counter!(
        HTTP_REQUESTS_TOTAL,
        "method" => method,
        "status" => response.status().as_u16().to_string()
    )
    .increment(1);

    response
}
