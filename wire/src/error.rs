//! Error types for packet-entities decoding.

use std::fmt;

use bitstream::BitError;
use thiserror::Error;

/// Result type for wire operations.
pub type WireResult<T> = Result<T, DecodeError>;

/// Errors raised while reading the packet-entities message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DecodeError {
    /// The entity data ended mid-directive.
    #[error("truncated entity data: {0}")]
    Bitstream(#[from] BitError),

    /// Limits exceeded.
    #[error("{kind} limit exceeded: {actual} > {limit}")]
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },

    /// The baseline selector is neither 0 nor 1.
    #[error("invalid baseline selector {found}")]
    InvalidBaselineSelector { found: u8 },

    /// An index delta carried the entity index past `u32::MAX`.
    #[error("entity index overflow: {previous:?} + {delta}")]
    IndexOverflow { previous: Option<u32>, delta: u32 },
}

/// Specific wire limits that can be exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    UpdatedEntries,
    EntityDataBytes,
    Deletions,
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::UpdatedEntries => "updated entries",
            Self::EntityDataBytes => "entity data bytes",
            Self::Deletions => "deletions",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_limits() {
        let err = DecodeError::LimitsExceeded {
            kind: LimitKind::UpdatedEntries,
            limit: 10,
            actual: 11,
        };
        assert_eq!(err.to_string(), "updated entries limit exceeded: 11 > 10");
    }

    #[test]
    fn error_from_bit_error() {
        let err: DecodeError = BitError::UnexpectedEof {
            requested: 2,
            available: 0,
        }
        .into();
        assert!(matches!(err, DecodeError::Bitstream(_)));
        assert!(err.to_string().starts_with("truncated entity data"));
    }
}
