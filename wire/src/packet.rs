//! The packet-entities message.

use crate::error::{DecodeError, LimitKind, WireResult};
use crate::limits::Limits;

/// One decoded packet-entities message.
///
/// Framing is done upstream; `entity_data` is the bit-packed directive
/// payload borrowed from the message buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketEntities<'a> {
    /// The update is relative to the frame at `delta_from`.
    pub is_delta: bool,
    /// Reference tick, meaningful only when `is_delta` is set.
    pub delta_from: i32,
    /// Number of directives in `entity_data`.
    pub updated_entries: u32,
    /// Which entity baseline buffer (0 or 1) seeds delta creates.
    pub baseline: u8,
    /// Copy the selected baseline buffer into the other before applying.
    pub update_baseline: bool,
    pub entity_data: &'a [u8],
}

impl<'a> PacketEntities<'a> {
    /// Creates a full (non-delta) update.
    #[must_use]
    pub const fn full(updated_entries: u32, entity_data: &'a [u8]) -> Self {
        Self {
            is_delta: false,
            delta_from: -1,
            updated_entries,
            baseline: 0,
            update_baseline: false,
            entity_data,
        }
    }

    /// Creates a delta update against the frame at `delta_from`.
    #[must_use]
    pub const fn delta(delta_from: i32, updated_entries: u32, entity_data: &'a [u8]) -> Self {
        Self {
            is_delta: true,
            delta_from,
            updated_entries,
            baseline: 0,
            update_baseline: false,
            entity_data,
        }
    }

    /// Sets the baseline selector and swap flag.
    #[must_use]
    pub const fn with_baseline(mut self, baseline: u8, update_baseline: bool) -> Self {
        self.baseline = baseline;
        self.update_baseline = update_baseline;
        self
    }

    /// Checks the message against `limits`.
    pub fn validate(&self, limits: &Limits) -> WireResult<()> {
        if self.baseline > 1 {
            return Err(DecodeError::InvalidBaselineSelector {
                found: self.baseline,
            });
        }
        let entries = self.updated_entries as usize;
        if entries > limits.max_updated_entries {
            return Err(DecodeError::LimitsExceeded {
                kind: LimitKind::UpdatedEntries,
                limit: limits.max_updated_entries,
                actual: entries,
            });
        }
        if self.entity_data.len() > limits.max_entity_data_bytes {
            return Err(DecodeError::LimitsExceeded {
                kind: LimitKind::EntityDataBytes,
                limit: limits.max_entity_data_bytes,
                actual: self.entity_data.len(),
            });
        }
        Ok(())
    }
}
