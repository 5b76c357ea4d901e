//! Engine configuration.

use fieldpath::{DecoderOptions, MAX_PATHS};

use crate::error::{EntityError, EntityResult};
use crate::types::Handle;

/// Widest slot index an engine will allocate a frame for.
pub const MAX_INDEX_BITS: u8 = 20;

/// Engine-variant parameters of the entity protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Width of a slot index; the frame holds `1 << index_bits` slots.
    pub index_bits: u8,

    /// Width of the serial read on CREATE.
    pub serial_bits: u8,

    /// Delta messages end with an explicit deletion list.
    pub handle_deletions: bool,

    /// CREATE carries an extra var-uint after the serial.
    pub create_trailer_varuint: bool,

    /// Maximum number of field paths in one entity update.
    pub max_paths_per_update: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::source2()
    }
}

impl EngineConfig {
    /// Parameters for Source 1 captures.
    #[must_use]
    pub const fn source1() -> Self {
        Self {
            index_bits: 11,
            serial_bits: 10,
            handle_deletions: true,
            create_trailer_varuint: false,
            max_paths_per_update: MAX_PATHS,
        }
    }

    /// Parameters for Source 2 captures.
    #[must_use]
    pub const fn source2() -> Self {
        Self {
            index_bits: 14,
            serial_bits: 17,
            handle_deletions: false,
            create_trailer_varuint: true,
            max_paths_per_update: MAX_PATHS,
        }
    }

    /// A small index space with a deletion list, for tests.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            index_bits: 6,
            serial_bits: 10,
            handle_deletions: true,
            create_trailer_varuint: false,
            max_paths_per_update: 64,
        }
    }

    /// Number of entity slots.
    #[must_use]
    pub const fn entity_count(&self) -> usize {
        1 << self.index_bits
    }

    /// Combines a slot index and serial into a handle.
    #[must_use]
    pub const fn handle_for(&self, index: u32, serial: u32) -> Handle {
        Handle::new(index | serial.wrapping_shl(self.index_bits as u32))
    }

    /// Extracts the slot index from a handle.
    #[must_use]
    pub const fn index_for_handle(&self, handle: Handle) -> u32 {
        let mask = match 1u32.checked_shl(self.index_bits as u32) {
            Some(count) => count - 1,
            None => u32::MAX,
        };
        handle.raw() & mask
    }

    /// Checks that handles fit in 32 bits and the frame is allocatable.
    pub fn validate(&self) -> EntityResult<()> {
        let bits = self.index_bits as u32 + self.serial_bits as u32;
        if self.index_bits == 0 || self.index_bits > MAX_INDEX_BITS || bits > u32::BITS {
            return Err(EntityError::InvalidConfig {
                index_bits: self.index_bits,
                serial_bits: self.serial_bits,
            });
        }
        Ok(())
    }

    /// Field path decoder options derived from this configuration.
    #[must_use]
    pub const fn decoder_options(&self) -> DecoderOptions {
        DecoderOptions {
            max_paths: self.max_paths_per_update,
            signed_non_topo_deltas: false,
        }
    }
}
