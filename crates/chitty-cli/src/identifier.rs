//! # Identifier Subcommands
//!
//! Offline checks that never contact the issuance service.
//!
//! | Command             | Exit codes                                        |
//! |---------------------|---------------------------------------------------|
//! | `chitty classify`   | 0                                                 |
//! | `chitty parse`      | 0 parsed, 1 rejected                              |
//! | `chitty gate`       | 0 allow, 2 reject, 3 require issuance, 4 internal |

use anyhow::{Context, Result};
use clap::Args;

use chitty_core::{classify, evaluate, parse, GateDecision, ParsedIdentifier, RejectionKind};

/// Exit code for an admitted identifier.
pub const EXIT_ALLOW: u8 = 0;
/// Exit code for a failed parse.
pub const EXIT_PARSE_FAILED: u8 = 1;
/// Exit code for a legacy or malformed identifier.
pub const EXIT_REJECT: u8 = 2;
/// Exit code when no identifier was supplied.
pub const EXIT_REQUIRE_ISSUANCE: u8 = 3;
/// Exit code for a gate internal inconsistency.
pub const EXIT_INTERNAL: u8 = 4;

/// Arguments for `chitty classify`.
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Token to classify.
    pub token: String,
}

/// Arguments for `chitty parse`.
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Official ChittyID to break into segments.
    pub token: String,

    /// Print the segments as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `chitty gate`.
#[derive(Args, Debug)]
pub struct GateArgs {
    /// Identifier to evaluate. Omit to evaluate a missing identifier.
    pub token: Option<String>,

    /// Print the decision as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute `chitty classify`.
pub fn run_classify(args: &ClassifyArgs) -> Result<u8> {
    println!("{}", classify(Some(&args.token)));
    Ok(EXIT_ALLOW)
}

/// Execute `chitty parse`.
pub fn run_parse(args: &ParseArgs) -> Result<u8> {
    match parse(&args.token) {
        Ok(id) => {
            if args.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&id).context("failed to serialize identifier")?
                );
            } else {
                print!("{}", render_segments(&id));
            }
            Ok(EXIT_ALLOW)
        }
        Err(e) => {
            eprintln!("REJECTED: {e}");
            Ok(EXIT_PARSE_FAILED)
        }
    }
}

/// Execute `chitty gate`.
pub fn run_gate(args: &GateArgs) -> Result<u8> {
    let decision = evaluate(args.token.as_deref());
    log_decision(&decision);
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&decision).context("failed to serialize decision")?
        );
    } else {
        println!("{}", render_decision(&decision));
    }
    Ok(gate_exit_code(&decision))
}

/// Gate internal inconsistencies are defects and are logged at `error`.
fn log_decision(decision: &GateDecision) {
    if let GateDecision::Reject {
        kind: RejectionKind::InternalInconsistency,
        reason,
    } = decision
    {
        tracing::error!(reason = *reason, "gate internal inconsistency");
    }
}

/// Map a gate decision onto the process exit code.
pub fn gate_exit_code(decision: &GateDecision) -> u8 {
    match decision {
        GateDecision::Allow { .. } => EXIT_ALLOW,
        GateDecision::RequireIssuance { .. } => EXIT_REQUIRE_ISSUANCE,
        GateDecision::Reject { kind, .. } => match kind {
            RejectionKind::LegacyProhibited | RejectionKind::MalformedIdentifier => EXIT_REJECT,
            RejectionKind::InternalInconsistency => EXIT_INTERNAL,
        },
    }
}

/// One `name: value` line per segment, plus derived fields.
pub fn render_segments(id: &ParsedIdentifier) -> String {
    let mut out = String::new();
    let names = [
        "version",
        "geography",
        "location",
        "sequence",
        "entity_type",
        "year_month",
        "check_code",
        "sub_index",
    ];
    for (name, value) in names.iter().zip(id.segments()) {
        out.push_str(&format!("{name:<12} {value}\n"));
    }
    out.push_str(&format!("{:<12} {}\n", "entity", id.entity_type().as_str()));
    out.push_str(&format!("{:<12} {}\n", "namespace", id.namespace()));
    if let Some(month) = id.issue_month() {
        out.push_str(&format!("{:<12} {}\n", "issued", month.format("%Y-%m")));
    }
    out
}

/// Single-line human summary of a gate decision.
pub fn render_decision(decision: &GateDecision) -> String {
    match decision {
        GateDecision::Allow { identifier } => format!("ALLOW {identifier}"),
        GateDecision::RequireIssuance { reason } => format!("REQUIRE_ISSUANCE: {reason}"),
        GateDecision::Reject { kind, reason } => format!("REJECT ({kind}): {reason}"),
    }
}
