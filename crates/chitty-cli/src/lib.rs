//! # chitty-cli — CLI Tool for ChittySchema
//!
//! Provides the `chitty` command-line interface over the ChittyID rules in
//! `chitty-core` and the issuance client.
//!
//! ## Subcommands
//!
//! - `chitty classify` — Report whether a token is official, legacy, or malformed.
//! - `chitty parse` — Break an official ChittyID into named segments.
//! - `chitty gate` — Evaluate the pipeline gate; the exit code carries the decision.
//! - `chitty mint` — Request a new ChittyID from the issuance service.
//! - `chitty intake` — Mint a ChittyID for an evidence file and print its record.
//! - `chitty scan` — File every evidence document under a directory.
//!
//! ```bash
//! chitty gate "$CHITTY_ID" || echo "blocked"
//! chitty intake retainer.eml --case ARDC_SCHATZ_2025
//! chitty scan ~/evidence --case ARDC_SCHATZ_2025 > ledger.jsonl
//! ```

pub mod identifier;
pub mod intake;
pub mod issuance;
pub mod scan;
