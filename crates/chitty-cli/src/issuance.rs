//! # Mint Subcommand
//!
//! Requests a new ChittyID from the issuance service. Configuration comes
//! from the environment (`CHITTY_ID_TOKEN`, `CHITTY_ID_SERVICE_URL`,
//! `CHITTY_ID_TIMEOUT_SECS`).

use anyhow::{Context, Result};
use clap::Args;

use chitty_core::EntityType;
use chitty_issuance_client::mint::DEFAULT_DOMAIN;
use chitty_issuance_client::{IssuanceClient, IssuanceConfig, MintRequest};

/// Arguments for `chitty mint`.
#[derive(Args, Debug)]
pub struct MintArgs {
    /// Entity type: P, L, T, E (or person, location, thing, event).
    #[arg(long, value_name = "TYPE")]
    pub entity_type: EntityType,

    /// Issuing domain.
    #[arg(long, default_value = DEFAULT_DOMAIN)]
    pub domain: String,

    /// Case reference to attach.
    #[arg(long)]
    pub case: Option<String>,
}

impl MintArgs {
    /// Request metadata for these arguments.
    pub fn to_request(&self) -> MintRequest {
        let req = MintRequest::new(self.entity_type).with_domain(self.domain.clone());
        match &self.case {
            Some(case) => req.with_case(case.clone()),
            None => req,
        }
    }
}

/// Build the issuance client from the environment.
pub fn client_from_env() -> Result<IssuanceClient> {
    let config = IssuanceConfig::from_env().context("issuance service not configured")?;
    tracing::debug!(?config, "issuance client configured");
    IssuanceClient::new(config).context("failed to build issuance client")
}

/// Run an async issuance call on a single-threaded runtime.
pub fn block_on<F: std::future::Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    Ok(runtime.block_on(future))
}

/// Execute `chitty mint`.
pub fn run_mint(args: &MintArgs) -> Result<u8> {
    let client = client_from_env()?;
    let id = block_on(client.mint(&args.to_request()))?.context("mint request failed")?;
    println!("{id}");
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_from_args() {
        let args = MintArgs {
            entity_type: EntityType::Event,
            domain: "LEGAL".into(),
            case: Some("ARDC_SCHATZ_2025".into()),
        };
        let req = args.to_request();
        assert_eq!(req.entity_type, EntityType::Event);
        assert_eq!(req.domain, "LEGAL");
        assert_eq!(req.case.as_deref(), Some("ARDC_SCHATZ_2025"));
        assert!(req.filepath.is_none());
    }

    #[test]
    fn block_on_runs_future() {
        assert_eq!(block_on(async { 7 }).unwrap(), 7);
    }
}
