//! # ChittyID Grammar
//!
//! Classification and parsing of ChittyID tokens.
//!
//! ## Official Format
//!
//! ```text
//! VV-G-LLL-SSSS-T-YM-C-X
//! CT-A-CHI-0001-T-2401-A-01
//! ```
//!
//! | Segment | Field        | Shape                             |
//! |---------|--------------|-----------------------------------|
//! | `VV`    | version/type | 2 uppercase alphanumerics         |
//! | `G`     | geography    | 1 uppercase alphanumeric          |
//! | `LLL`   | location     | 3 uppercase alphanumerics         |
//! | `SSSS`  | sequence     | 4 digits                          |
//! | `T`     | entity type  | one of `P`, `L`, `T`, `E`         |
//! | `YM`    | year-month   | 4 uppercase alphanumerics         |
//! | `C`     | check code   | 1 uppercase alphanumeric          |
//! | `X`     | sub-index    | 2 digits                          |
//!
//! The grammar is anchored and case-sensitive. Identifiers arrive
//! pre-formatted from the issuance service; nothing here trims, uppercases,
//! or otherwise repairs a token.
//!
//! ## Security Invariant
//!
//! Any token starting with `CHITTY-` (ASCII case-insensitive) is a
//! prohibited legacy identifier. That check runs before the grammar and
//! cannot be bypassed by an otherwise well-formed remainder.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::IdentifierError;

/// The banned legacy prefix, compared ASCII case-insensitively.
pub const LEGACY_PREFIX: &str = "CHITTY-";

/// Number of dash-delimited segments in an official identifier.
pub const SEGMENT_COUNT: usize = 8;

/// Longest legacy namespace fragment [`legacy_namespace`] will return.
pub const MAX_LEGACY_NAMESPACE_LEN: usize = 32;

// ---------------------------------------------------------------------------
// Grammar table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum CharClass {
    UpperAlnum,
    Digit,
    EntityCode,
}

impl CharClass {
    fn admits(self, b: u8) -> bool {
        match self {
            Self::UpperAlnum => b.is_ascii_uppercase() || b.is_ascii_digit(),
            Self::Digit => b.is_ascii_digit(),
            Self::EntityCode => EntityType::from_code(b as char).is_some(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct SegmentRule {
    name: &'static str,
    len: usize,
    class: CharClass,
    expected: &'static str,
}

const GRAMMAR: [SegmentRule; SEGMENT_COUNT] = [
    SegmentRule {
        name: "version",
        len: 2,
        class: CharClass::UpperAlnum,
        expected: "2 uppercase alphanumeric characters",
    },
    SegmentRule {
        name: "geography",
        len: 1,
        class: CharClass::UpperAlnum,
        expected: "1 uppercase alphanumeric character",
    },
    SegmentRule {
        name: "location",
        len: 3,
        class: CharClass::UpperAlnum,
        expected: "3 uppercase alphanumeric characters",
    },
    SegmentRule {
        name: "sequence",
        len: 4,
        class: CharClass::Digit,
        expected: "4 ASCII digits",
    },
    SegmentRule {
        name: "entity type",
        len: 1,
        class: CharClass::EntityCode,
        expected: "one of P, L, T, E",
    },
    SegmentRule {
        name: "year-month",
        len: 4,
        class: CharClass::UpperAlnum,
        expected: "4 uppercase alphanumeric characters",
    },
    SegmentRule {
        name: "check code",
        len: 1,
        class: CharClass::UpperAlnum,
        expected: "1 uppercase alphanumeric character",
    },
    SegmentRule {
        name: "sub-index",
        len: 2,
        class: CharClass::Digit,
        expected: "2 ASCII digits",
    },
];

impl SegmentRule {
    fn admits(&self, segment: &str) -> bool {
        segment.len() == self.len && segment.bytes().all(|b| self.class.admits(b))
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Outcome of [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierClass {
    /// Matches the official 8-segment grammar exactly.
    Official,
    /// Carries the banned `CHITTY-` prefix.
    LegacyProhibited,
    /// Anything else, including absent and empty input.
    Malformed,
}

impl IdentifierClass {
    /// Return the snake_case name of this class.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Official => "official",
            Self::LegacyProhibited => "legacy_prohibited",
            Self::Malformed => "malformed",
        }
    }
}

impl std::fmt::Display for IdentifierClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether `token` starts with the legacy prefix, ignoring ASCII case.
///
/// `"CHITTY-"` alone is legacy; the prefix match is sufficient.
pub fn is_legacy(token: &str) -> bool {
    let prefix = LEGACY_PREFIX.as_bytes();
    token
        .as_bytes()
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Namespace fragment of a legacy token, for audit logging only.
///
/// For `CHITTY-PROP-ABC123` this returns `Some("PROP")`. The fragment is
/// diagnostic; a legacy token is never reinterpreted or upgraded. At most
/// [`MAX_LEGACY_NAMESPACE_LEN`] bytes are returned, cut on a char boundary.
pub fn legacy_namespace(token: &str) -> Option<&str> {
    if !is_legacy(token) {
        return None;
    }
    let rest = token.get(LEGACY_PREFIX.len()..)?;
    let fragment = rest.split('-').next().unwrap_or("");
    let mut end = fragment.len().min(MAX_LEGACY_NAMESPACE_LEN);
    while !fragment.is_char_boundary(end) {
        end -= 1;
    }
    Some(&fragment[..end])
}

fn matches_grammar(token: &str) -> bool {
    let mut count = 0;
    for segment in token.split('-') {
        match GRAMMAR.get(count) {
            Some(rule) if rule.admits(segment) => count += 1,
            _ => return false,
        }
    }
    count == SEGMENT_COUNT
}

/// Classify a token. Absent input is [`IdentifierClass::Malformed`].
///
/// Rules, first match wins:
/// 1. legacy prefix → `LegacyProhibited`
/// 2. exact official grammar → `Official`
/// 3. otherwise → `Malformed`
pub fn classify(token: Option<&str>) -> IdentifierClass {
    let Some(token) = token else {
        return IdentifierClass::Malformed;
    };
    if is_legacy(token) {
        IdentifierClass::LegacyProhibited
    } else if matches_grammar(token) {
        IdentifierClass::Official
    } else {
        IdentifierClass::Malformed
    }
}

// ---------------------------------------------------------------------------
// Entity type
// ---------------------------------------------------------------------------

/// Entity-type code carried in the `T` segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    /// `P` — a natural or legal person.
    Person,
    /// `L` — a place or jurisdiction.
    Location,
    /// `T` — a thing: document, exhibit, asset.
    Thing,
    /// `E` — an event: filing, hearing, transaction.
    Event,
}

impl EntityType {
    /// All entity types in grammar order.
    pub const ALL: [EntityType; 4] = [Self::Person, Self::Location, Self::Thing, Self::Event];

    /// Single-character code used in the identifier.
    pub fn code(&self) -> char {
        match self {
            Self::Person => 'P',
            Self::Location => 'L',
            Self::Thing => 'T',
            Self::Event => 'E',
        }
    }

    /// Look up an entity type by its code. Case-sensitive.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'P' => Some(Self::Person),
            'L' => Some(Self::Location),
            'T' => Some(Self::Thing),
            'E' => Some(Self::Event),
            _ => None,
        }
    }

    /// Lowercase name, for logs and CLI output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Location => "location",
            Self::Thing => "thing",
            Self::Event => "event",
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for EntityType {
    type Err = String;

    /// Accepts the single-letter code or the full name, any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let mut chars = upper.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if let Some(t) = Self::from_code(c) {
                return Ok(t);
            }
        }
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(&upper))
            .ok_or_else(|| format!("unknown entity type: {s} (expected P, L, T, or E)"))
    }
}

// ---------------------------------------------------------------------------
// Parsed identifier
// ---------------------------------------------------------------------------

/// Named-segment breakdown of an official ChittyID.
///
/// Only constructible through [`parse`]. Immutable; joining the segments
/// with `-` reproduces the source token exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ParsedIdentifier {
    version: String,
    geography: String,
    location: String,
    sequence: String,
    entity_type: EntityType,
    year_month: String,
    check_code: String,
    sub_index: String,
}

/// Parse an official ChittyID into its named segments.
///
/// Re-validates independently of [`classify`].
///
/// # Errors
///
/// - [`IdentifierError::LegacyProhibited`] for `CHITTY-` tokens.
/// - [`IdentifierError::SegmentCount`] when the token does not have exactly
///   eight segments.
/// - [`IdentifierError::InvalidSegment`] naming the first failing segment.
pub fn parse(token: &str) -> Result<ParsedIdentifier, IdentifierError> {
    if is_legacy(token) {
        return Err(IdentifierError::LegacyProhibited(token.to_string()));
    }

    let segments: Vec<&str> = token.split('-').collect();
    if segments.len() != SEGMENT_COUNT {
        return Err(IdentifierError::SegmentCount {
            token: token.to_string(),
            found: segments.len(),
        });
    }

    for (rule, segment) in GRAMMAR.iter().zip(&segments) {
        if !rule.admits(segment) {
            return Err(IdentifierError::InvalidSegment {
                token: token.to_string(),
                segment: rule.name,
                value: segment.to_string(),
                expected: rule.expected,
            });
        }
    }

    let entity_type = segments[4]
        .chars()
        .next()
        .and_then(EntityType::from_code)
        .ok_or_else(|| IdentifierError::InvalidSegment {
            token: token.to_string(),
            segment: GRAMMAR[4].name,
            value: segments[4].to_string(),
            expected: GRAMMAR[4].expected,
        })?;

    Ok(ParsedIdentifier {
        version: segments[0].to_string(),
        geography: segments[1].to_string(),
        location: segments[2].to_string(),
        sequence: segments[3].to_string(),
        entity_type,
        year_month: segments[5].to_string(),
        check_code: segments[6].to_string(),
        sub_index: segments[7].to_string(),
    })
}

impl ParsedIdentifier {
    /// `VV` — version/type code.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// `G` — geography code.
    pub fn geography(&self) -> &str {
        &self.geography
    }

    /// `LLL` — location code.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// `SSSS` — sequence, as written (leading zeros kept).
    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    /// Sequence as a number.
    pub fn sequence_number(&self) -> u16 {
        // Four ASCII digits always fit in u16.
        self.sequence.parse().unwrap_or_default()
    }

    /// `T` — entity type.
    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    /// `YM` — year-month code, as written.
    pub fn year_month(&self) -> &str {
        &self.year_month
    }

    /// `C` — check code.
    pub fn check_code(&self) -> &str {
        &self.check_code
    }

    /// `X` — sub-index, as written.
    pub fn sub_index(&self) -> &str {
        &self.sub_index
    }

    /// Issuing namespace: version, geography, and location (`CT-A-CHI`).
    pub fn namespace(&self) -> String {
        format!("{}-{}-{}", self.version, self.geography, self.location)
    }

    /// First day of the issue month when `YM` is numeric `YYMM`.
    ///
    /// Returns `None` for alphanumeric year-month codes or months outside
    /// `01..=12`; those are still valid identifiers.
    pub fn issue_month(&self) -> Option<NaiveDate> {
        if !self.year_month.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let yy: i32 = self.year_month[..2].parse().ok()?;
        let mm: u32 = self.year_month[2..].parse().ok()?;
        NaiveDate::from_ymd_opt(2000 + yy, mm, 1)
    }

    /// All eight segments in grammar order.
    pub fn segments(&self) -> [&str; SEGMENT_COUNT] {
        [
            self.version.as_str(),
            self.geography.as_str(),
            self.location.as_str(),
            self.sequence.as_str(),
            self.entity_code(),
            self.year_month.as_str(),
            self.check_code.as_str(),
            self.sub_index.as_str(),
        ]
    }

    fn entity_code(&self) -> &'static str {
        match self.entity_type {
            EntityType::Person => "P",
            EntityType::Location => "L",
            EntityType::Thing => "T",
            EntityType::Event => "E",
        }
    }
}

impl std::fmt::Display for ParsedIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.segments().join("-"))
    }
}

impl std::str::FromStr for ParsedIdentifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OFFICIAL: &str = "CT-A-CHI-0001-T-2401-A-01";

    // -- classify --

    #[test]
    fn official_example_classifies_official() {
        assert_eq!(classify(Some(OFFICIAL)), IdentifierClass::Official);
    }

    #[test]
    fn absent_and_empty_are_malformed() {
        assert_eq!(classify(None), IdentifierClass::Malformed);
        assert_eq!(classify(Some("")), IdentifierClass::Malformed);
    }

    #[test]
    fn legacy_prefix_any_case() {
        assert_eq!(classify(Some("CHITTY-PROP-ABC123")), IdentifierClass::LegacyProhibited);
        assert_eq!(classify(Some("Chitty-PROP-xyz")), IdentifierClass::LegacyProhibited);
        assert_eq!(classify(Some("chitty-evnt-0f0f")), IdentifierClass::LegacyProhibited);
    }

    #[test]
    fn bare_legacy_prefix_is_legacy_not_malformed() {
        assert_eq!(classify(Some("CHITTY-")), IdentifierClass::LegacyProhibited);
        assert_eq!(classify(Some("CHITTY")), IdentifierClass::Malformed);
    }

    #[test]
    fn legacy_uuid_form_is_legacy() {
        assert_eq!(
            classify(Some("CHITTY-550e8400-e29b-41d4-a716-446655440000")),
            IdentifierClass::LegacyProhibited
        );
    }

    #[test]
    fn lowercase_official_is_malformed() {
        assert_eq!(classify(Some("ct-a-chi-0001-t-2401-a-01")), IdentifierClass::Malformed);
        assert_eq!(classify(Some("CT-A-chi-0001-T-2401-A-01")), IdentifierClass::Malformed);
    }

    #[test]
    fn whitespace_is_not_tolerated() {
        assert_eq!(classify(Some(" CT-A-CHI-0001-T-2401-A-01")), IdentifierClass::Malformed);
        assert_eq!(classify(Some("CT-A-CHI-0001-T-2401-A-01\n")), IdentifierClass::Malformed);
    }

    #[test]
    fn wrong_segment_shapes_are_malformed() {
        // unknown entity type
        assert_eq!(classify(Some("CT-A-CHI-0001-X-2401-A-01")), IdentifierClass::Malformed);
        // letter in sequence
        assert_eq!(classify(Some("CT-A-CHI-00A1-T-2401-A-01")), IdentifierClass::Malformed);
        // short location
        assert_eq!(classify(Some("CT-A-CH-0001-T-2401-A-01")), IdentifierClass::Malformed);
        // nine segments
        assert_eq!(classify(Some("CT-A-CHI-0001-T-2401-A-01-9")), IdentifierClass::Malformed);
        // trailing dash
        assert_eq!(classify(Some("CT-A-CHI-0001-T-2401-A-01-")), IdentifierClass::Malformed);
    }

    #[test]
    fn unicode_is_malformed_without_panicking() {
        assert_eq!(classify(Some("ÇT-A-CHI-0001-T-2401-A-01")), IdentifierClass::Malformed);
        assert_eq!(classify(Some("CHITTÝ-PROP")), IdentifierClass::Malformed);
        assert_eq!(classify(Some("日本")), IdentifierClass::Malformed);
    }

    // -- parse --

    #[test]
    fn parse_extracts_named_segments() {
        let id = parse(OFFICIAL).unwrap();
        assert_eq!(id.version(), "CT");
        assert_eq!(id.geography(), "A");
        assert_eq!(id.location(), "CHI");
        assert_eq!(id.sequence(), "0001");
        assert_eq!(id.sequence_number(), 1);
        assert_eq!(id.entity_type(), EntityType::Thing);
        assert_eq!(id.year_month(), "2401");
        assert_eq!(id.check_code(), "A");
        assert_eq!(id.sub_index(), "01");
        assert_eq!(id.namespace(), "CT-A-CHI");
    }

    #[test]
    fn parse_roundtrips_losslessly() {
        let id = parse(OFFICIAL).unwrap();
        assert_eq!(id.segments().join("-"), OFFICIAL);
        assert_eq!(id.to_string(), OFFICIAL);
    }

    #[test]
    fn parse_rejects_legacy_with_legacy_error() {
        let err = parse("CHITTY-PROP-ABC123").unwrap_err();
        assert!(matches!(err, IdentifierError::LegacyProhibited(_)));
    }

    #[test]
    fn parse_reports_segment_count() {
        match parse("CT-A-CHI").unwrap_err() {
            IdentifierError::SegmentCount { found, .. } => assert_eq!(found, 3),
            other => panic!("expected SegmentCount, got {other:?}"),
        }
        match parse("").unwrap_err() {
            IdentifierError::SegmentCount { found, .. } => assert_eq!(found, 1),
            other => panic!("expected SegmentCount, got {other:?}"),
        }
    }

    #[test]
    fn parse_names_first_failing_segment() {
        match parse("CT-A-CHI-0001-Q-2401-A-1").unwrap_err() {
            IdentifierError::InvalidSegment { segment, value, .. } => {
                assert_eq!(segment, "entity type");
                assert_eq!(value, "Q");
            }
            other => panic!("expected InvalidSegment, got {other:?}"),
        }
    }

    #[test]
    fn from_str_delegates_to_parse() {
        let id: ParsedIdentifier = "AB-9-NYC-4321-P-25AB-Z-99".parse().unwrap();
        assert_eq!(id.entity_type(), EntityType::Person);
        assert_eq!(id.year_month(), "25AB");
        assert!("nope".parse::<ParsedIdentifier>().is_err());
    }

    #[test]
    fn issue_month_for_numeric_codes() {
        let id = parse(OFFICIAL).unwrap();
        assert_eq!(id.issue_month(), NaiveDate::from_ymd_opt(2024, 1, 1));

        let alpha = parse("AB-9-NYC-4321-P-25AB-Z-99").unwrap();
        assert_eq!(alpha.issue_month(), None);

        let bad_month = parse("AB-9-NYC-4321-P-2513-Z-99").unwrap();
        assert_eq!(bad_month.issue_month(), None);
    }

    #[test]
    fn parsed_identifier_serializes_segments() {
        let json = serde_json::to_value(parse(OFFICIAL).unwrap()).unwrap();
        assert_eq!(json["location"], "CHI");
        assert_eq!(json["entity_type"], "THING");
    }

    // -- legacy namespace --

    #[test]
    fn legacy_namespace_extraction() {
        assert_eq!(legacy_namespace("CHITTY-PROP-ABC123"), Some("PROP"));
        assert_eq!(legacy_namespace("chitty-"), Some(""));
        assert_eq!(legacy_namespace(OFFICIAL), None);
    }

    #[test]
    fn legacy_namespace_is_capped() {
        let long = format!("CHITTY-{}-ABC", "N".repeat(10_000));
        assert_eq!(
            legacy_namespace(&long).map(str::len),
            Some(MAX_LEGACY_NAMESPACE_LEN)
        );

        // 31 ASCII bytes then a 2-byte char straddling the cap.
        let straddle = format!("CHITTY-{}\u{e9}Z", "A".repeat(31));
        assert_eq!(legacy_namespace(&straddle), Some("A".repeat(31).as_str()));
    }

    // -- entity type --

    #[test]
    fn entity_type_codes_roundtrip() {
        for t in EntityType::ALL {
            assert_eq!(EntityType::from_code(t.code()), Some(t));
        }
        assert_eq!(EntityType::from_code('p'), None);
    }

    #[test]
    fn entity_type_from_str_accepts_code_or_name() {
        assert_eq!("T".parse::<EntityType>().unwrap(), EntityType::Thing);
        assert_eq!("event".parse::<EntityType>().unwrap(), EntityType::Event);
        assert_eq!("Person".parse::<EntityType>().unwrap(), EntityType::Person);
        assert!("X".parse::<EntityType>().is_err());
    }
}
