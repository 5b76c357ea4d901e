//! LSB-first bit cursor.

use crate::error::{BitError, BitResult};

const VARU32_MAX_BYTES: usize = 5;
const VARU64_MAX_BYTES: usize = 10;

/// Sequential reader over a borrowed byte buffer.
///
/// Bits are taken from the low end of each byte first, and a multi-bit
/// field is assembled little-endian: the first bit consumed is bit 0 of the
/// result. A failed read reports the shortfall and does not move the
/// cursor.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> BitReader<'a> {
    #[must_use]
    pub const fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bits left between the cursor and the end of the buffer.
    #[must_use]
    pub const fn bits_remaining(&self) -> usize {
        (self.buf.len() * 8).saturating_sub(self.pos)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bits_remaining() == 0
    }

    /// Bits consumed so far.
    #[must_use]
    pub const fn bit_position(&self) -> usize {
        self.pos
    }

    pub fn read_bit(&mut self) -> BitResult<bool> {
        self.require(1)?;
        let bit = self.buf[self.pos >> 3] >> (self.pos & 7) & 1;
        self.pos += 1;
        Ok(bit != 0)
    }

    /// Reads a fixed-width field of up to 64 bits.
    pub fn read_bits(&mut self, bits: u8) -> BitResult<u64> {
        if bits > 64 {
            return Err(BitError::InvalidBitCount { bits, max_bits: 64 });
        }
        self.require(usize::from(bits))?;

        let mut value = 0u64;
        let mut filled = 0u32;
        let wanted = u32::from(bits);
        while filled < wanted {
            let offset = (self.pos & 7) as u32;
            let take = (8 - offset).min(wanted - filled);
            let chunk = u64::from(self.buf[self.pos >> 3] >> offset) & ((1 << take) - 1);
            value |= chunk << filled;
            filled += take;
            self.pos += take as usize;
        }
        Ok(value)
    }

    /// Reads a fixed-width field of up to 32 bits.
    pub fn read_bits_u32(&mut self, bits: u8) -> BitResult<u32> {
        if bits > 32 {
            return Err(BitError::InvalidBitCount { bits, max_bits: 32 });
        }
        // At most 32 bits were assembled.
        Ok(self.read_bits(bits)? as u32)
    }

    pub fn skip_bits(&mut self, bits: usize) -> BitResult<()> {
        self.require(bits)?;
        self.pos += bits;
        Ok(())
    }

    /// Reads a `UBitVar`: a 6-bit head whose bits 4..=5 select how many
    /// extra bits (0, 4, 8 or 28) extend the low nibble.
    pub fn read_ubit_var(&mut self) -> BitResult<u32> {
        self.or_rewind(|reader| {
            let head = reader.read_bits_u32(6)?;
            let extra = match head >> 4 {
                0 => return Ok(head),
                1 => 4,
                2 => 8,
                _ => 28,
            };
            Ok(head & 0x0F | reader.read_bits_u32(extra)? << 4)
        })
    }

    /// Reads a protobuf varint of at most five 8-bit groups.
    pub fn read_var_u32(&mut self) -> BitResult<u32> {
        // Bits above 32 in the fifth group are dropped.
        Ok(self.read_groups(VARU32_MAX_BYTES)? as u32)
    }

    /// Reads a protobuf varint of at most ten 8-bit groups.
    pub fn read_var_u64(&mut self) -> BitResult<u64> {
        self.read_groups(VARU64_MAX_BYTES)
    }

    /// Reads a zigzag varint.
    pub fn read_var_s32(&mut self) -> BitResult<i32> {
        let raw = self.read_var_u32()?;
        Ok((raw >> 1) as i32 ^ -((raw & 1) as i32))
    }

    pub fn read_var_s64(&mut self) -> BitResult<i64> {
        let raw = self.read_var_u64()?;
        Ok((raw >> 1) as i64 ^ -((raw & 1) as i64))
    }

    fn read_groups(&mut self, max_bytes: usize) -> BitResult<u64> {
        self.or_rewind(|reader| {
            let mut value = 0u64;
            for group in 0..max_bytes {
                let byte = reader.read_bits(8)?;
                value |= (byte & 0x7F).checked_shl(7 * group as u32).unwrap_or(0);
                if byte & 0x80 == 0 {
                    return Ok(value);
                }
            }
            Err(BitError::InvalidVarint { max_bytes })
        })
    }

    /// Runs a multi-part read, restoring the cursor if any part fails.
    fn or_rewind<T>(&mut self, read: impl FnOnce(&mut Self) -> BitResult<T>) -> BitResult<T> {
        let start = self.pos;
        let result = read(self);
        if result.is_err() {
            self.pos = start;
        }
        result
    }

    fn require(&self, bits: usize) -> BitResult<()> {
        let available = self.bits_remaining();
        if bits <= available {
            Ok(())
        } else {
            Err(BitError::UnexpectedEof {
                requested: bits,
                available,
            })
        }
    }
}
