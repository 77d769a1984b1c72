//! # Evidence Metadata
//!
//! Types describing an evidence file admitted under a ChittyID: its
//! SHA-256 content digest, its document type, and for messages the
//! headers read from the top of the file.
//!
//! Everything here is pure; callers feed bytes or text in, nothing here
//! opens files.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::EvidenceError;

/// SHA-256 digest of an evidence file, rendered as 64 lowercase hex chars.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FileDigest([u8; 32]);

impl FileDigest {
    /// Digest a complete byte slice.
    pub fn sha256(bytes: &[u8]) -> Self {
        Self(Sha256::digest(bytes).into())
    }

    /// Parse a 64-character hex digest. Upper- or lowercase accepted.
    ///
    /// # Errors
    ///
    /// Returns [`EvidenceError::InvalidDigest`] on wrong length or non-hex
    /// characters.
    pub fn from_hex(hex: &str) -> Result<Self, EvidenceError> {
        if hex.len() != 64 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(EvidenceError::InvalidDigest(hex.to_string()));
        }
        let mut bytes = [0u8; 32];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16)
                .map_err(|_| EvidenceError::InvalidDigest(hex.to_string()))?;
        }
        Ok(Self(bytes))
    }

    /// Lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Display for FileDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for FileDigest {
    type Error = EvidenceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<FileDigest> for String {
    fn from(d: FileDigest) -> Self {
        d.to_hex()
    }
}

/// Incremental SHA-256 for files read in chunks.
#[derive(Debug, Clone, Default)]
pub struct FileDigestBuilder {
    hasher: Sha256,
}

impl FileDigestBuilder {
    /// Start an empty digest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next chunk.
    pub fn update(&mut self, chunk: &[u8]) {
        self.hasher.update(chunk);
    }

    /// Finish and return the digest.
    pub fn finalize(self) -> FileDigest {
        FileDigest(self.hasher.finalize().into())
    }
}

/// Document type inferred from the evidence file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    /// `.eml` message.
    Email,
    /// `.pdf` document.
    Pdf,
    /// `.txt` plain text.
    Text,
    /// Anything else.
    Unknown,
}

impl DocumentType {
    /// Infer from a file name's extension, case-insensitively.
    pub fn from_filename(name: &str) -> Self {
        match extension(name).as_str() {
            "eml" => Self::Email,
            "pdf" => Self::Pdf,
            "txt" => Self::Text,
            _ => Self::Unknown,
        }
    }

    /// Uppercase name as stored in the ledger.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "EMAIL",
            Self::Pdf => "PDF",
            Self::Text => "TEXT",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extensions a directory scan files as evidence, lowercase.
///
/// `.msg` and `.docx` are collected but classify as
/// [`DocumentType::Unknown`].
pub const EVIDENCE_EXTENSIONS: [&str; 5] = ["eml", "msg", "pdf", "txt", "docx"];

/// Whether a directory scan should file `name`. Extension compared
/// case-insensitively.
pub fn is_evidence_file(name: &str) -> bool {
    EVIDENCE_EXTENSIONS.contains(&extension(name).as_str())
}

fn extension(name: &str) -> String {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default()
}

/// Number of leading lines searched for message headers.
pub const EMAIL_HEADER_LINES: usize = 50;

/// Headers read from the top of an `.eml` message.
///
/// Absent headers are `None`; a header present with an empty value is
/// `Some("")`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailHeaders {
    /// `From:` value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// `To:` value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// `Subject:` value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// `Date:` value, verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl EmailHeaders {
    /// Whether no header was found.
    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none() && self.subject.is_none() && self.date.is_none()
    }
}

/// Read `From:`, `To:`, `Subject:` and `Date:` from the first
/// [`EMAIL_HEADER_LINES`] lines of a message.
///
/// Header names are matched case-sensitively at the start of the line and
/// values are trimmed. Folded continuation lines are not joined. When a
/// header repeats inside the window the last occurrence wins.
pub fn extract_email_headers(text: &str) -> EmailHeaders {
    let mut headers = EmailHeaders::default();
    for line in text.split('\n').take(EMAIL_HEADER_LINES) {
        let slot = if let Some(v) = line.strip_prefix("From:") {
            Some((&mut headers.from, v))
        } else if let Some(v) = line.strip_prefix("To:") {
            Some((&mut headers.to, v))
        } else if let Some(v) = line.strip_prefix("Subject:") {
            Some((&mut headers.subject, v))
        } else {
            line.strip_prefix("Date:").map(|v| (&mut headers.date, v))
        };
        if let Some((field, value)) = slot {
            *field = Some(value.trim().to_string());
        }
    }
    headers
}
