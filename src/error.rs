//! Error types for the bind layer.

use thiserror::Error;

use crate::types::{TypeTag, ValueKind};

/// Result type alias for bind operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for column, selection and factory operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Value carrier or width is incompatible with the column representation.
    #[error("Type mismatch on column {column}: expected {expected}, got {found}")]
    TypeMismatch {
        column: String,
        expected: ValueKind,
        found: String,
    },

    /// Selection or lookup referenced an undeclared column.
    #[error("Unknown column: {name}")]
    UnknownColumn { name: String },

    /// Schema source has no table of this name.
    #[error("Unknown table: {name}")]
    UnknownTable { name: String },

    /// Column index out of bounds.
    #[error("Column index {index} out of bounds (columns: {count})")]
    ColumnIndexOutOfBounds { index: usize, count: usize },

    /// Two declared columns share a name.
    #[error("Duplicate column: {name}")]
    DuplicateColumn { name: String },

    /// No column-type mapping exists for a tag.
    #[error("Unsupported type tag: {tag}")]
    UnsupportedTag { tag: TypeTag },

    /// Schema field carries a wire type this layer cannot bind.
    #[error("Unsupported wire type code {code} for field {field}")]
    UnsupportedWireType { field: String, code: u32 },

    /// Byte-sequence write larger than the column capacity (reject policy only).
    #[error("Value of {supplied} bytes exceeds capacity {capacity} of column {column}")]
    CapacityExceeded {
        column: String,
        capacity: usize,
        supplied: usize,
    },

    /// The execution primitive flagged a column after execution.
    #[error("Native execution error on column {column}")]
    NativeExecution { column: String },

    /// Temporal record cannot be converted.
    #[error("Invalid time value: {message}")]
    InvalidTime { message: String },

    /// Opaque failure reported by the statement execution primitive.
    #[error("Statement error: {message}")]
    Statement { message: String },
}

impl Error {
    /// Create a type mismatch error.
    pub fn type_mismatch(
        column: impl Into<String>,
        expected: ValueKind,
        found: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            column: column.into(),
            expected,
            found: found.into(),
        }
    }

    /// Create an unknown column error.
    pub fn unknown_column(name: impl Into<String>) -> Self {
        Self::UnknownColumn { name: name.into() }
    }

    /// Create a statement error.
    pub fn statement(message: impl Into<String>) -> Self {
        Self::Statement {
            message: message.into(),
        }
    }

    /// Create an invalid time error.
    pub fn invalid_time(message: impl Into<String>) -> Self {
        Self::InvalidTime {
            message: message.into(),
        }
    }
}
