//! Error types
//!
//! Three failure families, kept apart so callers can match on them:
//! - `InvalidNameError`: a tag or attribute name was rejected at assignment
//! - `ParseError`: the text is not a well-formed document
//! - `ReadError`: loading text from a stream or byte buffer failed

use std::fmt;

use thiserror::Error;

/// Maximum number of characters of offending input kept in a `ParseError`
const FRAGMENT_LIMIT: usize = 120;

/// What kind of name failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    /// Element (tag) name
    Element,
    /// Attribute name
    Attribute,
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameKind::Element => f.write_str("element"),
            NameKind::Attribute => f.write_str("attribute"),
        }
    }
}

/// A name contains whitespace or one of `< > ' " & /`, or is empty
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{name:?} is not a valid {kind} name: names must be non-empty and must not contain whitespace or any of < > ' \" & /")]
pub struct InvalidNameError {
    pub kind: NameKind,
    pub name: String,
}

impl InvalidNameError {
    pub(crate) fn new(kind: NameKind, name: &str) -> Self {
        InvalidNameError {
            kind,
            name: name.to_string(),
        }
    }
}

/// Failure to turn document text into a tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A tag or attribute in the document has an unusable name
    #[error(transparent)]
    InvalidName(#[from] InvalidNameError),

    /// Structural problem: unmatched `<`/`>`, missing closing tag, and so on
    #[error("malformed XML: {reason} in {fragment:?}")]
    Malformed {
        reason: &'static str,
        fragment: String,
    },
}

impl ParseError {
    /// Build a `Malformed` error carrying (a bounded prefix of) the offending text
    pub(crate) fn malformed(reason: &'static str, fragment: &str) -> Self {
        let mut chars = fragment.chars();
        let mut kept: String = chars.by_ref().take(FRAGMENT_LIMIT).collect();
        if chars.next().is_some() {
            kept.push_str("...");
        }
        ParseError::Malformed {
            reason,
            fragment: kept,
        }
    }

    /// True for structural errors (as opposed to name errors)
    pub fn is_malformed(&self) -> bool {
        matches!(self, ParseError::Malformed { .. })
    }
}

/// Failure while loading a document from a stream or raw bytes
#[derive(Debug, Error)]
pub enum ReadError {
    /// The underlying reader failed
    #[error("failed to read XML source")]
    Io(#[from] std::io::Error),

    /// The bytes are not valid UTF-8 / UTF-16
    #[error("failed to decode XML source: {reason}")]
    Encoding { reason: String },

    /// The text was read but does not parse
    #[error(transparent)]
    Parse(#[from] ParseError),
}
