//! JSON blob codec for the note collection.
//!
//! # Invariants
//! - Encoded blobs are a JSON array of `{ id, title, content, updatedAt }`.
//! - Decoding rejects any top-level value that is not an array.

use crate::model::note::Note;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Blob encode/decode failures.
#[derive(Debug)]
pub enum CodecError {
    /// Serializing the collection failed.
    Encode(serde_json::Error),
    /// Blob is not valid JSON, or a record does not have the note shape.
    Malformed(serde_json::Error),
    /// Blob parsed, but the top-level value is not a sequence.
    NotASequence(&'static str),
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "failed to encode notes: {err}"),
            Self::Malformed(err) => write!(f, "malformed notes blob: {err}"),
            Self::NotASequence(kind) => {
                write!(f, "notes blob must be an array, found {kind}")
            }
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Encode(err) | Self::Malformed(err) => Some(err),
            Self::NotASequence(_) => None,
        }
    }
}

/// Serializes notes into the persisted blob shape.
pub fn encode_notes(notes: &[Note]) -> Result<String, CodecError> {
    serde_json::to_string(notes).map_err(CodecError::Encode)
}

/// Parses a persisted blob back into notes, preserving blob order.
pub fn decode_notes(blob: &str) -> Result<Vec<Note>, CodecError> {
    let value: Value = serde_json::from_str(blob).map_err(CodecError::Malformed)?;
    match value {
        Value::Array(_) => serde_json::from_value(value).map_err(CodecError::Malformed),
        other => Err(CodecError::NotASequence(json_kind(&other))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
