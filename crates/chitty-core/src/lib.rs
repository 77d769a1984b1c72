#![deny(missing_docs)]

//! # chitty-core — Foundational Types for ChittySchema
//!
//! This crate defines the identifier rules that every other crate in the
//! workspace depends on. It has no internal crate dependencies — only `serde`,
//! `thiserror`, `chrono`, and `sha2` from the external ecosystem.
//!
//! ## Key Design Principles
//!
//! 1. **Classification before parsing.** [`classify`] decides whether a token
//!    is an official ChittyID, a prohibited legacy `CHITTY-` token, or
//!    malformed. The legacy prefix check always runs first.
//!
//! 2. **[`ParsedIdentifier`] is the only parsed form.** It can only be built
//!    through [`parse`] (or `FromStr`), which re-validates every segment
//!    regardless of what the caller already checked.
//!
//! 3. **Single gate.** [`evaluate`] is the one policy function deciding
//!    whether an operation may proceed. HTTP handlers, CLI commands, and the
//!    issuance client all route through it.
//!
//! 4. **Evidence metadata.** [`FileDigest`], [`DocumentType`] and
//!    [`EmailHeaders`] describe a file admitted under an identifier; the API
//!    ledger and the CLI intake and scan commands share them.
//!
//! 5. **No generation.** Identifiers are issued exclusively by the external
//!    issuance service. Nothing in this crate mints, derives, or repairs one.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `chitty-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code, no I/O, no logging.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod evidence;
pub mod gate;
pub mod identity;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{EvidenceError, GateError, IdentifierError};
pub use evidence::{
    extract_email_headers, is_evidence_file, DocumentType, EmailHeaders, FileDigest,
    FileDigestBuilder, EMAIL_HEADER_LINES, EVIDENCE_EXTENSIONS,
};
pub use gate::{evaluate, GateDecision, RejectionKind};
pub use identity::{
    classify, is_legacy, legacy_namespace, parse, EntityType, IdentifierClass, ParsedIdentifier,
    LEGACY_PREFIX, MAX_LEGACY_NAMESPACE_LEN, SEGMENT_COUNT,
};
