//! Schema validation and field decoding errors.

use bitstream::BitError;
use fieldpath::{FieldPath, FieldPathError};
use thiserror::Error;

use crate::ClassId;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur when building a class table or reading fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SchemaError {
    /// A leaf value ran past the end of the payload.
    #[error("truncated field value: {0}")]
    Bitstream(#[from] BitError),

    /// The field path stream could not be decoded.
    #[error(transparent)]
    FieldPath(#[from] FieldPathError),

    /// A decoded path names no field of the class.
    #[error("class {class} has no field at {path}")]
    UnknownField { class: ClassId, path: FieldPath },

    /// A class table entry is not at the position its id names.
    #[error("class {found} registered at position {position}")]
    ClassIdMismatch { position: usize, found: ClassId },

    /// Two fields of a class share a path.
    #[error("duplicate field {path} in class {class}")]
    DuplicateField { class: ClassId, path: FieldPath },

    /// Invalid bit width for fixed-width integers.
    #[error("invalid bit width {bits}, must be 1..=64")]
    InvalidBitWidth { bits: u8 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_unknown_field() {
        let err = SchemaError::UnknownField {
            class: ClassId(12),
            path: FieldPath::from_slice(&[3, 1]).unwrap(),
        };
        assert_eq!(err.to_string(), "class 12 has no field at 3/1");
    }

    #[test]
    fn error_from_field_path_error() {
        let inner = FieldPathError::TooManyPaths { limit: 4 };
        let err: SchemaError = inner.clone().into();
        assert_eq!(err, SchemaError::FieldPath(inner));
        assert!(err.to_string().contains("limit 4"));
    }
}
