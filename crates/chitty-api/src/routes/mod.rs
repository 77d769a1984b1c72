//! # API Route Modules
//!
//! - [`identifiers`]: ungated identifier inspection.
//! - [`evidence`]: gated evidence ledger.
//! - [`metrics`]: Prometheus exposition.

pub mod evidence;
pub mod identifiers;
pub mod metrics;
