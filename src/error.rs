//! Crate-level error types.

use std::fmt;

use crate::scene::PrimitiveId;

/// Errors produced by the seqview crate.
#[derive(Debug)]
pub enum SeqViewError {
    /// A positional attribute write received a non-finite value.
    MalformedCoordinate {
        /// Logical attribute being written (`"y"`, `"height"`, ...).
        attribute: &'static str,
        /// The offending value.
        value: f64,
    },
    /// Path data could not be parsed while rewriting its vertical position.
    MalformedPath {
        /// The path data as stored on the primitive.
        data: String,
        /// What went wrong.
        reason: String,
    },
    /// Bounding box requested for a primitive that is removed or detached
    /// from the scene tree.
    GeometryUnavailable(PrimitiveId),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Generic I/O failure.
    Io(std::io::Error),
}

impl fmt::Display for SeqViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedCoordinate { attribute, value } => {
                write!(f, "malformed coordinate for '{attribute}': {value}")
            }
            Self::MalformedPath { data, reason } => {
                write!(f, "malformed path data '{data}': {reason}")
            }
            Self::GeometryUnavailable(id) => {
                write!(f, "no geometry available for primitive {id:?}")
            }
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for SeqViewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SeqViewError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Reject NaN and infinities before they reach the scene.
pub(crate) fn finite(
    attribute: &'static str,
    value: f64,
) -> Result<f64, SeqViewError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SeqViewError::MalformedCoordinate { attribute, value })
    }
}
