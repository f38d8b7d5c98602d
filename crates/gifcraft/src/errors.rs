//! Error types for schema compilation and decoding.

use thiserror::Error;

/// Errors produced when compiling [crate::node::Node]s into a [crate::schema::Schema].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// Node label is empty.
    #[error("node label must not be empty")]
    InvalidLabel,
    /// Two siblings store their result under the same label.
    #[error("duplicate label `{0}`")]
    DuplicateLabel(String),
    /// Bit descriptor does not fit inside a single byte.
    #[error("bit field `{field}` (index {index}, length {length}) does not fit in one byte")]
    MalformedBitField {
        field: String,
        index: u8,
        length: u8,
    },
    /// Bit-field node declares no sub-fields.
    #[error("bit-field node `{0}` has no fields")]
    EmptyBitField(String),
    /// A loop predicate was attached to a node that is not composite.
    #[error("node `{0}` repeats but has no parts")]
    InvalidRepeat(String),
    /// Array element stride is zero.
    #[error("array node `{0}` has a zero stride")]
    InvalidArrayStride(String),
}

/// Errors produced while walking a schema over a byte buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A read or peek asked for more bytes than remain.
    #[error("end of stream at byte {position}: needed {needed}, {remaining} remaining")]
    EndOfStream {
        position: usize,
        needed: usize,
        remaining: usize,
    },
    /// A repeated block matched its loop gate but none of its alternatives applied.
    #[error("unrecognized block 0x{code:02X} at byte {position}")]
    UnrecognizedBlock { position: usize, code: u8 },
    /// A gate or extractor referenced a field that has not been parsed.
    #[error("field `{0}` is not present in the result")]
    MissingField(String),
    /// A referenced field holds a value of the wrong shape.
    #[error("field `{path}` is not {expected}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
    },
    /// The built-in schema failed to compile.
    #[error("invalid schema: {0}")]
    Schema(#[from] CompileError),
}
