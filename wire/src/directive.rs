//! Per-entity directive headers.

use bitstream::BitReader;

use crate::error::{DecodeError, WireResult};

/// The lifecycle operation a directive applies to its slot.
///
/// On the wire bit 0 marks a leave and bit 1 a create, so a delete is a
/// leave with the create bit set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DirectiveKind {
    Update = 0,
    Leave = 1,
    Create = 2,
    Delete = 3,
}

impl DirectiveKind {
    /// Decodes the kind from its two wire bits; higher bits are ignored.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => Self::Update,
            1 => Self::Leave,
            2 => Self::Create,
            _ => Self::Delete,
        }
    }

    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

/// A directive header: the target slot and what happens to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityHeader {
    pub index: u32,
    pub kind: DirectiveKind,
}

/// Reads the next directive header.
///
/// The index is coded as the distance past `previous_index` minus one, so
/// indices within a message are strictly increasing. Pass `None` for the
/// first directive.
pub fn read_entity_header(
    reader: &mut BitReader<'_>,
    previous_index: Option<u32>,
) -> WireResult<EntityHeader> {
    let delta = reader.read_ubit_var()?;
    let base = match previous_index {
        None => Some(0),
        Some(previous) => previous.checked_add(1),
    };
    let index = base
        .and_then(|base| base.checked_add(delta))
        .ok_or(DecodeError::IndexOverflow {
            previous: previous_index,
            delta,
        })?;
    // Cannot truncate: two bits were read.
    let kind = DirectiveKind::from_bits(reader.read_bits(2)? as u8);
    Ok(EntityHeader { index, kind })
}
