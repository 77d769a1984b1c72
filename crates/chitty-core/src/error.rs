//! # Error Hierarchy
//!
//! Structured error types for ChittyID handling, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! [`IdentifierError`] describes why a single token failed the grammar.
//! [`GateError`] is the `?`-friendly form of a non-`Allow` gate decision,
//! for callers that want to propagate instead of matching.

use thiserror::Error;

use crate::gate::RejectionKind;

/// Parse failures for ChittyID tokens.
///
/// Each variant carries the offending token so that operators can see
/// exactly what was submitted without re-running the request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    /// Token carries the banned `CHITTY-` prefix.
    #[error("prohibited legacy identifier: \"{0}\" (CHITTY- identifiers are never accepted)")]
    LegacyProhibited(String),

    /// Token does not split into exactly eight dash-delimited segments.
    #[error("malformed identifier \"{token}\": expected 8 dash-delimited segments, found {found}")]
    SegmentCount {
        /// The rejected token.
        token: String,
        /// Number of segments actually present.
        found: usize,
    },

    /// A segment has the wrong length or character class.
    #[error("malformed identifier \"{token}\": {segment} segment \"{value}\" must be {expected}")]
    InvalidSegment {
        /// The rejected token.
        token: String,
        /// Name of the failing segment (e.g. `"sequence"`).
        segment: &'static str,
        /// The segment text as submitted.
        value: String,
        /// Human-readable description of the accepted shape.
        expected: &'static str,
    },
}

impl IdentifierError {
    /// Map this parse failure onto the gate's rejection taxonomy.
    pub fn kind(&self) -> RejectionKind {
        match self {
            Self::LegacyProhibited(_) => RejectionKind::LegacyProhibited,
            Self::SegmentCount { .. } | Self::InvalidSegment { .. } => {
                RejectionKind::MalformedIdentifier
            }
        }
    }
}

/// A gate decision other than `Allow`, as an error value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    /// No identifier was supplied; the caller must complete an issuance
    /// round-trip first.
    #[error("identifier required: {reason}")]
    IssuanceRequired {
        /// Human-readable reason.
        reason: &'static str,
    },

    /// The supplied identifier was rejected.
    #[error("identifier rejected ({kind}): {reason}")]
    Rejected {
        /// Which rejection rule fired.
        kind: RejectionKind,
        /// Human-readable reason.
        reason: &'static str,
    },
}

impl GateError {
    /// The rejection rule that fired, if this is a rejection.
    pub fn rejection_kind(&self) -> Option<RejectionKind> {
        match self {
            Self::IssuanceRequired { .. } => None,
            Self::Rejected { kind, .. } => Some(*kind),
        }
    }

    /// Whether retrying with the same token can ever succeed.
    ///
    /// Always `false` for rejections; the gate is deterministic.
    pub fn is_retryable_with_same_token(&self) -> bool {
        false
    }

    /// Whether the caller can recover by obtaining a fresh identifier from
    /// the issuance service.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::IssuanceRequired { .. } => true,
            Self::Rejected { kind, .. } => *kind == RejectionKind::MalformedIdentifier,
        }
    }
}

/// Validation failures for evidence metadata.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvidenceError {
    /// Digest is not 64 hex characters.
    #[error("invalid SHA-256 digest: \"{0}\" (expected 64 hex characters)")]
    InvalidDigest(String),
    /// Evidence submitted without a file name.
    #[error("filename must not be empty")]
    EmptyFilename,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_error_maps_to_legacy_kind() {
        let err = IdentifierError::LegacyProhibited("CHITTY-PROP-1".into());
        assert_eq!(err.kind(), RejectionKind::LegacyProhibited);
        assert!(err.to_string().contains("CHITTY-PROP-1"));
    }

    #[test]
    fn segment_errors_map_to_malformed_kind() {
        let count = IdentifierError::SegmentCount {
            token: "AB".into(),
            found: 1,
        };
        let segment = IdentifierError::InvalidSegment {
            token: "CT-A-CHI-00X1-T-2401-A-01".into(),
            segment: "sequence",
            value: "00X1".into(),
            expected: "4 ASCII digits",
        };
        assert_eq!(count.kind(), RejectionKind::MalformedIdentifier);
        assert_eq!(segment.kind(), RejectionKind::MalformedIdentifier);
        assert!(segment.to_string().contains("sequence segment \"00X1\""));
    }

    #[test]
    fn legacy_rejection_is_not_recoverable() {
        let err = GateError::Rejected {
            kind: RejectionKind::LegacyProhibited,
            reason: "prohibited legacy format",
        };
        assert!(!err.is_recoverable());
        assert!(!err.is_retryable_with_same_token());
        assert_eq!(err.rejection_kind(), Some(RejectionKind::LegacyProhibited));
    }

    #[test]
    fn missing_identifier_is_recoverable() {
        let err = GateError::IssuanceRequired { reason: "none" };
        assert!(err.is_recoverable());
        assert!(err.to_string().starts_with("identifier required"));
    }
}
