//! Leaf codecs and decoded values.

use bitstream::{BitReader, BitResult};

/// The encoding of one leaf field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldCodec {
    /// One bit.
    Bool,

    /// Fixed-width unsigned field.
    UInt { bits: u8 },

    /// Signed two's-complement integer with fixed bit width.
    SInt { bits: u8 },

    /// Protobuf-style varint.
    VarUInt,

    /// Zigzag varint.
    VarSInt,
}

impl FieldCodec {
    #[must_use]
    pub const fn bool() -> Self {
        Self::Bool
    }

    #[must_use]
    pub const fn uint(bits: u8) -> Self {
        Self::UInt { bits }
    }

    /// Sign-extended from bit `bits - 1`.
    #[must_use]
    pub const fn sint(bits: u8) -> Self {
        Self::SInt { bits }
    }

    #[must_use]
    pub const fn var_uint() -> Self {
        Self::VarUInt
    }

    #[must_use]
    pub const fn var_sint() -> Self {
        Self::VarSInt
    }

    /// Returns the zero value this codec decodes into.
    #[must_use]
    pub const fn default_value(self) -> FieldValue {
        match self {
            Self::Bool => FieldValue::Bool(false),
            Self::UInt { .. } | Self::VarUInt => FieldValue::UInt(0),
            Self::SInt { .. } | Self::VarSInt => FieldValue::SInt(0),
        }
    }

    /// Reads one value from `reader`.
    pub fn read(self, reader: &mut BitReader<'_>) -> BitResult<FieldValue> {
        Ok(match self {
            Self::Bool => FieldValue::Bool(reader.read_bit()?),
            Self::UInt { bits } => FieldValue::UInt(reader.read_bits(bits)?),
            Self::SInt { bits } => FieldValue::SInt(sign_extend(reader.read_bits(bits)?, bits)),
            Self::VarUInt => FieldValue::UInt(reader.read_var_u64()?),
            Self::VarSInt => FieldValue::SInt(reader.read_var_s64()?),
        })
    }
}

fn sign_extend(raw: u64, bits: u8) -> i64 {
    if bits == 0 || bits >= 64 {
        return raw as i64;
    }
    let shift = 64 - u32::from(bits);
    ((raw << shift) as i64) >> shift
}

/// A decoded leaf value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldValue {
    Bool(bool),
    UInt(u64),
    SInt(i64),
}

impl FieldValue {
    #[must_use]
    pub const fn as_bool(self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_u64(self) -> Option<u64> {
        match self {
            Self::UInt(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_i64(self) -> Option<i64> {
        match self {
            Self::SInt(value) => Some(value),
            _ => None,
        }
    }
}
