//! # Scan Subcommand
//!
//! Files every evidence document under a directory. The walk is recursive
//! and keeps `.eml`, `.msg`, `.pdf`, `.txt` and `.docx` files, matching
//! extensions case-insensitively. Each file goes through the same intake as
//! `chitty intake`; a file that fails is logged and skipped, and the scan
//! carries on with the rest.
//!
//! Records are printed one JSON object per line; the processed count goes
//! to stderr.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;

use chitty_core::is_evidence_file;
use chitty_issuance_client::mint::DEFAULT_DOMAIN;
use chitty_issuance_client::IssuanceClient;

use crate::intake::{intake_file, IntakeRecord};
use crate::issuance::{block_on, client_from_env};

/// Arguments for `chitty scan`.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Directory to scan recursively.
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Case reference to attach to every minted identifier.
    #[arg(long)]
    pub case: Option<String>,

    /// Issuing domain.
    #[arg(long, default_value = DEFAULT_DOMAIN)]
    pub domain: String,
}

/// Result of a directory scan.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Records for every file that was filed, in path order.
    pub records: Vec<IntakeRecord>,
    /// Files that matched but could not be filed.
    pub failed: Vec<PathBuf>,
}

impl ScanOutcome {
    /// Number of files filed.
    pub fn processed(&self) -> usize {
        self.records.len()
    }
}

/// Recursively collect evidence files under `dir`, sorted by path.
pub fn collect_evidence_paths(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))? {
        let entry = entry.with_context(|| format!("failed to read entry in {}", dir.display()))?;
        entries.push(entry.path());
    }
    entries.sort();

    for path in entries {
        if path.is_dir() {
            if let Err(e) = collect_evidence_paths(&path, out) {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable directory");
            }
        } else if path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(is_evidence_file)
        {
            out.push(path);
        }
    }
    Ok(())
}

/// File every evidence document under `args.dir`.
pub async fn scan(client: &IssuanceClient, args: &ScanArgs) -> Result<ScanOutcome> {
    if !args.dir.is_dir() {
        bail!("directory not found: {}", args.dir.display());
    }
    let mut paths = Vec::new();
    collect_evidence_paths(&args.dir, &mut paths)?;
    tracing::info!(dir = %args.dir.display(), found = paths.len(), "scanning for evidence");

    let mut outcome = ScanOutcome::default();
    for path in paths {
        match intake_file(client, &path, args.case.as_deref(), &args.domain).await {
            Ok(record) => outcome.records.push(record),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %format!("{e:#}"), "evidence not filed");
                outcome.failed.push(path);
            }
        }
    }
    Ok(outcome)
}

/// Execute `chitty scan`.
pub fn run_scan(args: &ScanArgs) -> Result<u8> {
    let client = client_from_env()?;
    let outcome = block_on(scan(&client, args))??;
    for record in &outcome.records {
        println!(
            "{}",
            serde_json::to_string(record).context("failed to serialize evidence record")?
        );
    }
    eprintln!(
        "Processed {} documents ({} failed)",
        outcome.processed(),
        outcome.failed.len()
    );
    Ok(0)
}
