//! # Middleware
//!
//! Tower/Axum middleware layers for the ChittySchema API.
//!
//! - [`gate`]: ChittyID pipeline gate on the `X-ChittyID` header.
//! - [`metrics`]: request and gate-decision counters.

pub mod gate;
pub mod metrics;
