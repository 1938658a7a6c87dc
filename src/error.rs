//! Error types for reading and importing documents.

use thiserror::Error;

/// Syntax error reported by the event reader.
///
/// `position` is a byte offset into the decoded (UTF-8) document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at byte {position}")]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, position: usize) -> Self {
        ParseError {
            message: message.into(),
            position,
        }
    }
}

/// Element structure that cannot be paired into spans.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    /// An end tag with no open element of that name.
    #[error("end tag </{name}> has no matching start tag")]
    UnmatchedEnd { name: String },

    /// The document ended while an element was still open.
    #[error("element <{name}> is never closed")]
    Unclosed { name: String },
}

/// Configurable ceilings on document size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Elements,
    Depth,
}

impl std::fmt::Display for Limit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Limit::Elements => f.write_str("element count"),
            Limit::Depth => f.write_str("nesting depth"),
        }
    }
}

/// Fatal error for one document's import.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("malformed structure: {0}")]
    MalformedStructure(#[from] StructureError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("{limit} limit of {value} exceeded")]
    LimitExceeded { limit: Limit, value: usize },
}

impl ImportError {
    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ImportError::MalformedStructure(_) => "malformed_structure",
            ImportError::Parse(_) => "parse_error",
            ImportError::LimitExceeded { .. } => "limit_exceeded",
        }
    }
}

/// An import failure tagged with the document it came from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("document {document}: {source}")]
pub struct DocumentError {
    pub document: String,
    #[source]
    pub source: ImportError,
}

pub type Result<T> = std::result::Result<T, ImportError>;
