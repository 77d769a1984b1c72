//! # Pipeline Scenarios
//!
//! End-to-end checks of the classify → parse → gate chain through the
//! public crate API, using fixed identifier fixtures only.

use std::sync::Arc;
use std::thread;

use chitty_core::gate::{REASON_LEGACY, REASON_MALFORMED, REASON_MISSING};
use chitty_core::{
    classify, evaluate, parse, EntityType, GateDecision, GateError, IdentifierClass,
    RejectionKind,
};

const FIXTURES: &[(&str, IdentifierClass)] = &[
    ("CT-A-CHI-0001-T-2401-A-01", IdentifierClass::Official),
    ("CP-1-NYC-9999-P-2512-7-00", IdentifierClass::Official),
    ("01-Z-LAX-0420-E-A1B2-K-42", IdentifierClass::Official),
    ("CHITTY-PROP-ABC123", IdentifierClass::LegacyProhibited),
    ("chitty-evnt-deadbeef", IdentifierClass::LegacyProhibited),
    ("CHITTY-", IdentifierClass::LegacyProhibited),
    ("ct-a-chi-0001-t-2401-a-01", IdentifierClass::Malformed),
    ("CT-xx-x-XXX-0001-x-2401-x-xx", IdentifierClass::Malformed),
    ("CT-A-CHI-0001-T-2401-A", IdentifierClass::Malformed),
    ("", IdentifierClass::Malformed),
];

#[test]
fn fixtures_classify_as_expected() {
    for (token, expected) in FIXTURES {
        assert_eq!(classify(Some(token)), *expected, "token {token:?}");
    }
}

#[test]
fn fixtures_gate_consistently_with_classification() {
    for (token, class) in FIXTURES {
        let decision = evaluate(Some(token));
        match class {
            IdentifierClass::Official => {
                let id = decision.identifier().expect("official token must be allowed");
                assert_eq!(id.to_string(), *token);
            }
            IdentifierClass::LegacyProhibited => {
                assert_eq!(decision.reason(), Some(REASON_LEGACY), "token {token:?}");
            }
            IdentifierClass::Malformed => {
                assert_eq!(decision.reason(), Some(REASON_MALFORMED), "token {token:?}");
            }
        }
    }
}

#[test]
fn missing_identifier_requires_issuance() {
    assert_eq!(
        evaluate(None),
        GateDecision::RequireIssuance {
            reason: REASON_MISSING
        }
    );
}

#[test]
fn allowed_identifier_exposes_routing_fields() {
    let id = evaluate(Some("CT-A-CHI-0001-T-2401-A-01"))
        .into_result()
        .unwrap();
    assert_eq!(id.entity_type(), EntityType::Thing);
    assert_eq!(id.location(), "CHI");
    assert_eq!(id.namespace(), "CT-A-CHI");
}

#[test]
fn legacy_rejection_propagates_through_question_mark() {
    fn admit(token: &str) -> Result<String, GateError> {
        let id = evaluate(Some(token)).into_result()?;
        Ok(id.namespace())
    }

    let err = admit("CHITTY-PROP-ABC123").unwrap_err();
    assert_eq!(
        err,
        GateError::Rejected {
            kind: RejectionKind::LegacyProhibited,
            reason: REASON_LEGACY,
        }
    );
    assert!(!err.is_recoverable());
    assert_eq!(admit("CP-1-NYC-9999-P-2512-7-00").unwrap(), "CP-1-NYC");
}

#[test]
fn parse_fails_cleanly_without_prior_classification() {
    assert!(parse("ct-a-chi-0001-t-2401-a-01").is_err());
    assert!(parse("CHITTY-CT-A-CHI-0001-T-2401-A-01").is_err());
}

#[test]
fn concurrent_evaluation_is_independent() {
    let tokens: Arc<Vec<Option<&'static str>>> = Arc::new(
        FIXTURES
            .iter()
            .map(|(t, _)| Some(*t))
            .chain(std::iter::once(None))
            .collect(),
    );
    let expected: Vec<GateDecision> = tokens.iter().map(|t| evaluate(*t)).collect();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let tokens = Arc::clone(&tokens);
            thread::spawn(move || {
                (0..50)
                    .flat_map(|_| tokens.iter().map(|t| evaluate(*t)).collect::<Vec<_>>())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        let results = handle.join().unwrap();
        for chunk in results.chunks(expected.len()) {
            assert_eq!(chunk, expected.as_slice());
        }
    }
}
