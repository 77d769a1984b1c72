//! # Pipeline Gate
//!
//! Decides whether an operation may proceed based on the identifier the
//! caller supplied.
//!
//! | Input                      | Decision                                  |
//! |----------------------------|-------------------------------------------|
//! | absent                     | `RequireIssuance`                         |
//! | `CHITTY-` prefix           | `Reject(LegacyProhibited)`                |
//! | malformed                  | `Reject(MalformedIdentifier)`             |
//! | official, parse succeeds   | `Allow(ParsedIdentifier)`                 |
//! | official, parse fails      | `Reject(InternalInconsistency)`           |
//!
//! The gate is stateless and deterministic: a second call with the same
//! token always yields the same decision, so it never retries. Mapping a
//! decision to an HTTP status or exit code is the caller's job.

use serde::{Deserialize, Serialize};

use crate::error::{GateError, IdentifierError};
use crate::identity::{self, IdentifierClass, ParsedIdentifier};

/// Reason attached to `RequireIssuance`.
pub const REASON_MISSING: &str =
    "no identifier supplied; must be obtained from the identity issuance service";
/// Reason attached to legacy rejections.
pub const REASON_LEGACY: &str = "prohibited legacy format";
/// Reason attached to malformed rejections.
pub const REASON_MALFORMED: &str = "malformed identifier";
/// Reason attached when `classify` and `parse` disagree.
pub const REASON_INCONSISTENT: &str = "parse failure after classification";

/// Which rejection rule fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionKind {
    /// Token carries the banned legacy prefix. Fatal for that token.
    LegacyProhibited,
    /// Token matches no recognized grammar.
    MalformedIdentifier,
    /// `classify` said official but `parse` failed: a bug, not a caller error.
    InternalInconsistency,
}

impl RejectionKind {
    /// Return the snake_case name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LegacyProhibited => "legacy_prohibited",
            Self::MalformedIdentifier => "malformed_identifier",
            Self::InternalInconsistency => "internal_inconsistency",
        }
    }
}

impl std::fmt::Display for RejectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of [`evaluate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GateDecision {
    /// The operation may proceed.
    Allow {
        /// The parsed identifier, for routing and audit logging.
        identifier: ParsedIdentifier,
    },
    /// No identifier was supplied.
    RequireIssuance {
        /// Human-readable reason.
        reason: &'static str,
    },
    /// The supplied identifier is unacceptable.
    Reject {
        /// Which rule fired.
        kind: RejectionKind,
        /// Human-readable reason.
        reason: &'static str,
    },
}

impl GateDecision {
    /// Whether the operation may proceed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow { .. })
    }

    /// The reason string, absent on `Allow`.
    pub fn reason(&self) -> Option<&'static str> {
        match self {
            Self::Allow { .. } => None,
            Self::RequireIssuance { reason } | Self::Reject { reason, .. } => Some(*reason),
        }
    }

    /// The parsed identifier, present only on `Allow`.
    pub fn identifier(&self) -> Option<&ParsedIdentifier> {
        match self {
            Self::Allow { identifier } => Some(identifier),
            _ => None,
        }
    }

    /// Short outcome label: `allow`, `require_issuance`, or the rejection kind.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Allow { .. } => "allow",
            Self::RequireIssuance { .. } => "require_issuance",
            Self::Reject { kind, .. } => kind.as_str(),
        }
    }

    /// Convert into a `Result` for `?` propagation.
    ///
    /// # Errors
    ///
    /// Returns [`GateError`] for every decision other than `Allow`.
    pub fn into_result(self) -> Result<ParsedIdentifier, GateError> {
        match self {
            Self::Allow { identifier } => Ok(identifier),
            Self::RequireIssuance { reason } => Err(GateError::IssuanceRequired { reason }),
            Self::Reject { kind, reason } => Err(GateError::Rejected { kind, reason }),
        }
    }
}

/// Evaluate the supplied identifier (or its absence).
pub fn evaluate(supplied: Option<&str>) -> GateDecision {
    evaluate_with(supplied, identity::parse)
}

fn evaluate_with(
    supplied: Option<&str>,
    parser: fn(&str) -> Result<ParsedIdentifier, IdentifierError>,
) -> GateDecision {
    let Some(token) = supplied else {
        return GateDecision::RequireIssuance {
            reason: REASON_MISSING,
        };
    };

    match identity::classify(Some(token)) {
        IdentifierClass::LegacyProhibited => GateDecision::Reject {
            kind: RejectionKind::LegacyProhibited,
            reason: REASON_LEGACY,
        },
        IdentifierClass::Malformed => GateDecision::Reject {
            kind: RejectionKind::MalformedIdentifier,
            reason: REASON_MALFORMED,
        },
        IdentifierClass::Official => match parser(token) {
            Ok(identifier) => GateDecision::Allow { identifier },
            Err(_) => GateDecision::Reject {
                kind: RejectionKind::InternalInconsistency,
                reason: REASON_INCONSISTENT,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::EntityType;

    #[test]
    fn absent_requires_issuance() {
        let decision = evaluate(None);
        assert_eq!(
            decision,
            GateDecision::RequireIssuance {
                reason: REASON_MISSING
            }
        );
        assert_eq!(decision.outcome(), "require_issuance");
        assert!(decision.identifier().is_none());
    }

    #[test]
    fn legacy_is_rejected() {
        let decision = evaluate(Some("CHITTY-PROP-ABC123"));
        assert_eq!(
            decision,
            GateDecision::Reject {
                kind: RejectionKind::LegacyProhibited,
                reason: "prohibited legacy format",
            }
        );
    }

    #[test]
    fn empty_string_is_rejected_not_missing() {
        let decision = evaluate(Some(""));
        assert_eq!(decision.reason(), Some(REASON_MALFORMED));
    }

    #[test]
    fn lowercase_official_is_rejected_malformed() {
        let decision = evaluate(Some("ct-a-chi-0001-t-2401-a-01"));
        assert_eq!(
            decision,
            GateDecision::Reject {
                kind: RejectionKind::MalformedIdentifier,
                reason: REASON_MALFORMED,
            }
        );
    }

    #[test]
    fn official_is_allowed_with_parsed_segments() {
        let decision = evaluate(Some("CT-A-CHI-0001-T-2401-A-01"));
        assert!(decision.is_allowed());
        assert_eq!(decision.reason(), None);
        let id = decision.identifier().unwrap();
        assert_eq!(id.entity_type(), EntityType::Thing);
        assert_eq!(id.location(), "CHI");
    }

    #[test]
    fn parser_disagreement_is_internal_inconsistency() {
        fn broken(token: &str) -> Result<ParsedIdentifier, IdentifierError> {
            Err(IdentifierError::SegmentCount {
                token: token.to_string(),
                found: 0,
            })
        }
        let decision = evaluate_with(Some("CT-A-CHI-0001-T-2401-A-01"), broken);
        assert_eq!(
            decision,
            GateDecision::Reject {
                kind: RejectionKind::InternalInconsistency,
                reason: REASON_INCONSISTENT,
            }
        );
        assert_eq!(decision.outcome(), "internal_inconsistency");
    }

    #[test]
    fn into_result_maps_each_decision() {
        assert!(evaluate(Some("CT-A-CHI-0001-T-2401-A-01")).into_result().is_ok());
        assert!(matches!(
            evaluate(None).into_result(),
            Err(GateError::IssuanceRequired { .. })
        ));
        assert!(matches!(
            evaluate(Some("CHITTY-X")).into_result(),
            Err(GateError::Rejected {
                kind: RejectionKind::LegacyProhibited,
                ..
            })
        ));
    }

    #[test]
    fn decision_serializes_with_tag() {
        let json = serde_json::to_value(evaluate(Some("CHITTY-PROP-1"))).unwrap();
        assert_eq!(json["decision"], "reject");
        assert_eq!(json["kind"], "legacy_prohibited");
        assert_eq!(json["reason"], "prohibited legacy format");

        let json = serde_json::to_value(evaluate(Some("CT-A-CHI-0001-T-2401-A-01"))).unwrap();
        assert_eq!(json["decision"], "allow");
        assert_eq!(json["identifier"]["sequence"], "0001");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn evaluate_is_deterministic(token in proptest::option::of("\\PC{0,40}")) {
            prop_assert_eq!(evaluate(token.as_deref()), evaluate(token.as_deref()));
        }

        #[test]
        fn allow_iff_official(token in "\\PC{0,40}") {
            let allowed = evaluate(Some(&token)).is_allowed();
            let official = identity::classify(Some(&token)) == IdentifierClass::Official;
            prop_assert_eq!(allowed, official);
        }

        #[test]
        fn legacy_never_allowed(tail in "\\PC{0,30}") {
            let decision = evaluate(Some(&format!("chItTy-{tail}")));
            prop_assert_eq!(decision.reason(), Some(REASON_LEGACY));
        }
    }
}
