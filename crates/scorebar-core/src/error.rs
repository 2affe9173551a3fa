//! Error types for scorebar

use thiserror::Error;

use crate::ProtocolEra;

/// Core scorebar errors
#[derive(Error, Debug)]
pub enum ScorebarError {
    // Wire errors
    #[error("Malformed varint: too many continuation groups")]
    MalformedVarInt,

    #[error("Buffer too short: expected {expected}, got {actual}")]
    BufferTooShort { expected: usize, actual: usize },

    #[error("Collection length {len} exceeds limit {max}")]
    CollectionTooLarge { len: usize, max: usize },

    #[error("Invalid wire format: {0}")]
    InvalidWireFormat(String),

    #[error("Unknown {kind} value: {value}")]
    UnknownEnumValue { kind: &'static str, value: i32 },

    // Registry errors
    #[error("Unknown packet id: {0}")]
    UnknownPacketId(i32),

    #[error("Duplicate packet id: {0}")]
    DuplicatePacketId(i32),

    // Era gating
    #[error("{feature} not supported in the {era} era")]
    UnsupportedForEra {
        feature: &'static str,
        era: ProtocolEra,
    },

    // Caller precondition violations
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Line index {0} out of range")]
    InvalidIndex(usize),

    #[error("Legacy sidebar text cannot exceed 32 characters, got {len}")]
    LineTooLong { len: usize },

    #[error("Sidebar has already been destroyed")]
    AlreadyDestroyed,
}

/// Result type for scorebar operations
pub type ScorebarResult<T> = Result<T, ScorebarError>;
