//! Cursor errors.

use thiserror::Error;

pub type BitResult<T> = Result<T, BitError>;

/// A failed cursor read or write.
///
/// Capture data is assumed byte-exact, so every variant is fatal to the
/// message being decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BitError {
    /// A read needed more bits than the buffer holds.
    #[error("truncated: needed {requested} bits, {available} left")]
    UnexpectedEof { requested: usize, available: usize },

    /// A fixed-width read or write asked for more bits than its integer holds.
    #[error("bit width {bits} exceeds {max_bits}")]
    InvalidBitCount { bits: u8, max_bits: u8 },

    /// A written value does not fit its field.
    #[error("{value} does not fit in {bits} bits")]
    ValueOutOfRange { value: u64, bits: u8 },

    /// Every group of a varint had its continuation bit set.
    #[error("varint longer than {max_bytes} groups")]
    InvalidVarint { max_bytes: usize },
}
