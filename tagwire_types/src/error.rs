use crate::serde::{OpcodeWidth, WireKind};
use crate::types::RuntimeType;
use thiserror::Error;

pub type CodecResult<T> = Result<T, CodecError>;

/// Every failure a codec call can report.
///
/// None of these are recovered from internally. Bytes already written before
/// the failure stay in the buffer; the call as a whole produced nothing usable.
#[derive(Error, Debug, PartialEq)]
pub enum CodecError {
    #[error("Writing {requested} bytes at position {position} exceeds the buffer capacity {capacity}.")]
    CapacityExceeded {
        position: usize,
        requested: usize,
        capacity: usize,
    },

    #[error("Reading {requested} bytes at position {position} runs past the end of the input ({len} bytes).")]
    UnexpectedEof {
        position: usize,
        requested: usize,
        len: usize,
    },

    #[error("Unsupported field {type_name}::{field}: {reason}")]
    UnsupportedField {
        type_name: String,
        field: String,
        reason: String,
    },

    #[error("No registered type matches the opcode at position {position}.")]
    UnknownType { position: usize },

    #[error("Type {0} is not registered.")]
    UnregisteredType(String),

    #[error("Malformed {kind:?} length prefix: {value}")]
    MalformedLength { kind: WireKind, value: i128 },

    #[error("No coercion from {from:?} to {to:?}")]
    MissingCoercion { from: RuntimeType, to: RuntimeType },

    #[error("Opcode {value} ({width:?}) of {new_type} is already taken by {existing_type}.")]
    OpcodeCollision {
        width: OpcodeWidth,
        value: u32,
        existing_type: String,
        new_type: String,
    },

    #[error("Type {0} is registered twice.")]
    DuplicateType(String),

    #[error("Expected opcode {expected} ({width:?}) for {type_name}, found {found}.")]
    OpcodeMismatch {
        type_name: String,
        width: OpcodeWidth,
        expected: u32,
        found: u32,
    },

    #[error("Record of {type_name} has no value for field {field}.")]
    MissingField { type_name: String, field: String },

    #[error("Field {type_name}::{field} has fixed length {expected} but holds {actual} elements.")]
    FixedLengthMismatch {
        type_name: String,
        field: String,
        expected: u32,
        actual: usize,
    },
}

impl CodecError {
    pub fn unsupported(type_name: &str, field: &str, reason: impl Into<String>) -> Self {
        Self::UnsupportedField {
            type_name: type_name.to_owned(),
            field: field.to_owned(),
            reason: reason.into(),
        }
    }
}
