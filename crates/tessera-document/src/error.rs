//! Error types for tessera-document.

use thiserror::Error;

/// Result type for document decoding.
pub type Result<T> = std::result::Result<T, DocumentError>;

/// Errors raised while decoding a JSON document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Malformed JSON, a missing required field, an unknown enumerated
    /// value or a matrix of the wrong length.
    #[error("invalid glTF document: {0}")]
    Json(#[from] serde_json::Error),
}

/// A reference resolved against a collection too short to hold it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind} index {index} out of range ({len} available)")]
pub struct IndexError {
    /// Name of the target collection, e.g. "accessors".
    pub kind: &'static str,
    pub index: usize,
    pub len: usize,
}

/// An enumerated field holding a value outside its reserved set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {field} value {value}")]
pub struct UnknownValue {
    pub field: &'static str,
    pub value: String,
}

impl UnknownValue {
    pub(crate) fn new(field: &'static str, value: impl ToString) -> Self {
        Self { field, value: value.to_string() }
    }
}
