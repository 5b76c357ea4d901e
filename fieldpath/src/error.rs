//! Error types for field path decoding.

use thiserror::Error;

use crate::op::FieldOp;
use crate::path::MAX_DEPTH;

/// Result type for field path operations.
pub type FieldPathResult<T> = Result<T, FieldPathError>;

/// Errors that can occur while decoding or building field paths.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldPathError {
    /// The bit cursor ran out mid-opcode or mid-operand.
    #[error("truncated field path stream: {0}")]
    Bitstream(#[from] bitstream::BitError),

    /// An opcode tried to push past the maximum path depth.
    #[error("{op:?} would push field path past depth {max}", max = MAX_DEPTH)]
    DepthOverflow { op: FieldOp },

    /// An opcode tried to pop or address a segment below the root.
    #[error("{op:?} would pop {requested} segments from a path of depth {depth}")]
    DepthUnderflow {
        op: FieldOp,
        requested: usize,
        depth: usize,
    },

    /// The bit sequence does not lead to any opcode.
    #[error("no opcode matches prefix after {bits_read} bits")]
    UnknownPrefix { bits_read: usize },

    /// More paths than the configured maximum were produced by one update.
    #[error("field path count exceeds limit {limit}")]
    TooManyPaths { limit: usize },

    /// A path literal is empty or deeper than [`MAX_DEPTH`].
    #[error("invalid field path length {len}, must be 1..={max}", max = MAX_DEPTH)]
    InvalidLength { len: usize },
}
