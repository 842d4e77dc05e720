//! Error types for the secure input core.
//!
//! Nothing here touches I/O, so every error is a local contract violation:
//! a token the presented layout doesn't know, an event for a field the
//! session doesn't own, or an insert past the configured cap.

use thiserror::Error;

use crate::types::FieldId;

pub type Result<T> = std::result::Result<T, SafeKeyboardError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SafeKeyboardError {
    /// The rendering surface sent a token that isn't on the presented layout.
    #[error("unrecognized key token: {0:?}")]
    UnrecognizedKey(String),

    #[error("no field currently owns the keyboard")]
    NoActiveField,

    #[error("unknown field: {0}")]
    UnknownField(FieldId),

    #[error("input already holds the maximum of {max} characters")]
    MaxLengthExceeded { max: usize },

    #[error("field declared twice: {0}")]
    DuplicateField(FieldId),

    #[error("a session needs at least one field")]
    EmptySession,
}
