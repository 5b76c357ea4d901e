//! Entity engine errors.

use bitstream::BitError;
use schema::{ClassId, SchemaError};
use thiserror::Error;
use wire::DecodeError;

use crate::reset::ResetPhase;

/// Result type for entity engine operations.
pub type EntityResult<T> = Result<T, EntityError>;

/// Errors raised while applying entity messages.
///
/// Every error is fatal for the decode session: state already applied by
/// the failing packet is not rolled back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum EntityError {
    /// A directive field ran past the end of the entity data.
    #[error("truncated entity data: {0}")]
    Bitstream(#[from] BitError),

    /// Message structure is invalid.
    #[error(transparent)]
    Wire(#[from] DecodeError),

    /// Field data could not be applied.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A delta message references the current tick.
    #[error("self-referential delta update for tick {tick}")]
    SelfReferentialDelta { tick: i32 },

    /// No class is registered for an id.
    #[error("unknown class id {class}")]
    UnknownClass { class: ClassId },

    /// No raw baseline blob has been registered for a class.
    #[error("no baseline for class {name} ({class})")]
    BaselineMissing { class: ClassId, name: String },

    /// A baseline table key is not a decimal class id.
    #[error("invalid baseline key {key:?}")]
    InvalidBaselineKey { key: String },

    /// A directive or deletion names a slot outside the frame.
    #[error("entity index {index} out of range for {count} slots")]
    IndexOutOfRange { index: u32, count: usize },

    /// A reset phase arrived without a preceding START.
    #[error("reset {phase:?} without START")]
    ResetNotStarted { phase: ResetPhase },

    /// Handle layout does not fit in 32 bits or the frame is too large.
    #[error("invalid handle layout: {index_bits} index bits, {serial_bits} serial bits")]
    InvalidConfig { index_bits: u8, serial_bits: u8 },

    /// START arrived while a reset was already in progress.
    #[error("reset already in progress")]
    ResetInProgress,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_self_referential() {
        let err = EntityError::SelfReferentialDelta { tick: 1200 };
        assert_eq!(err.to_string(), "self-referential delta update for tick 1200");
    }

    #[test]
    fn error_display_baseline_missing() {
        let err = EntityError::BaselineMissing {
            class: ClassId(3),
            name: "CUnit".into(),
        };
        assert_eq!(err.to_string(), "no baseline for class CUnit (3)");
    }

    #[test]
    fn lower_layer_errors_convert() {
        let bit = BitError::UnexpectedEof {
            requested: 1,
            available: 0,
        };
        let err: EntityError = DecodeError::from(bit.clone()).into();
        assert_eq!(err, EntityError::Wire(DecodeError::Bitstream(bit)));
    }
}
