//! # Intake Subcommand
//!
//! Files one piece of evidence: mints a ChittyID for it, hashes the file,
//! infers its document type, reads message headers from `.eml` files, and
//! prints the evidence record as JSON.
//!
//! The minted identifier has already passed the pipeline gate inside the
//! issuance client; a legacy or malformed identifier aborts the intake
//! before anything is printed.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;

use chitty_core::{
    extract_email_headers, DocumentType, EmailHeaders, EntityType, FileDigest, FileDigestBuilder,
};
use chitty_issuance_client::mint::DEFAULT_DOMAIN;
use chitty_issuance_client::{IssuanceClient, MintRequest};

use crate::issuance::{block_on, client_from_env};

/// Read size for hashing.
const CHUNK_SIZE: usize = 4096;

/// Arguments for `chitty intake`.
#[derive(Args, Debug)]
pub struct IntakeArgs {
    /// Evidence file to file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Case reference to attach to the minted identifier.
    #[arg(long)]
    pub case: Option<String>,

    /// Issuing domain.
    #[arg(long, default_value = DEFAULT_DOMAIN)]
    pub domain: String,
}

/// Evidence record printed by `chitty intake`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntakeRecord {
    pub chitty_id: String,
    pub filename: String,
    pub original_path: String,
    pub sha256: FileDigest,
    pub file_size: u64,
    pub document_type: DocumentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<EmailHeaders>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case: Option<String>,
    pub ingested_at: DateTime<Utc>,
}

/// SHA-256 and byte count of a file, read in fixed-size chunks.
pub fn hash_file(path: &Path) -> Result<(FileDigest, u64)> {
    let mut file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut builder = FileDigestBuilder::new();
    let mut buf = [0u8; CHUNK_SIZE];
    let mut total: u64 = 0;
    loop {
        let n = file
            .read(&mut buf)
            .with_context(|| format!("failed to read {}", path.display()))?;
        if n == 0 {
            break;
        }
        builder.update(&buf[..n]);
        total += n as u64;
    }
    Ok((builder.finalize(), total))
}

/// Message headers of an `.eml` file. Unreadable files and messages
/// without any of the headers yield `None`; the intake still proceeds.
pub fn read_email_headers(path: &Path) -> Option<EmailHeaders> {
    match std::fs::read(path) {
        Ok(bytes) => Some(extract_email_headers(&String::from_utf8_lossy(&bytes)))
            .filter(|h| !h.is_empty()),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "could not read email headers");
            None
        }
    }
}

/// Mint an identifier for `args.file` and build its evidence record.
pub async fn intake(client: &IssuanceClient, args: &IntakeArgs) -> Result<IntakeRecord> {
    intake_file(client, &args.file, args.case.as_deref(), &args.domain).await
}

/// Mint an identifier for one file and build its evidence record.
pub async fn intake_file(
    client: &IssuanceClient,
    file: &Path,
    case: Option<&str>,
    domain: &str,
) -> Result<IntakeRecord> {
    if !file.is_file() {
        bail!("file not found: {}", file.display());
    }
    let filename = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("no file name in {}", file.display()))?;
    let original_path = file.display().to_string();

    let (sha256, file_size) = hash_file(file)?;
    let document_type = DocumentType::from_filename(&filename);
    let email = match document_type {
        DocumentType::Email => read_email_headers(file),
        _ => None,
    };

    let mut req = MintRequest::new(EntityType::Thing)
        .with_domain(domain)
        .with_file(original_path.clone(), file_size);
    if let Some(case) = case {
        req = req.with_case(case);
    }

    let id = client
        .mint(&req)
        .await
        .with_context(|| format!("could not obtain a ChittyID for {filename}"))?;

    tracing::info!(
        namespace = %id.namespace(),
        document_type = %document_type,
        file_size,
        "evidence filed"
    );

    Ok(IntakeRecord {
        chitty_id: id.to_string(),
        filename,
        original_path,
        sha256,
        file_size,
        document_type,
        email,
        case: case.map(str::to_string),
        ingested_at: Utc::now(),
    })
}

/// Execute `chitty intake`.
pub fn run_intake(args: &IntakeArgs) -> Result<u8> {
    let client = client_from_env()?;
    let record = block_on(intake(&client, args))??;
    println!(
        "{}",
        serde_json::to_string_pretty(&record).context("failed to serialize evidence record")?
    );
    Ok(0)
}
