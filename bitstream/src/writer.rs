//! Payload assembly in the layout [`BitReader`](crate::BitReader) reads.

use crate::error::{BitError, BitResult};

/// Appends fields LSB-first into a growing byte buffer.
///
/// Used to build entity payloads in tests and fuzz seeds. The final
/// partial byte is zero-padded by [`finish`](Self::finish).
#[derive(Debug, Default, Clone)]
pub struct BitWriter {
    buf: Vec<u8>,
    len: usize,
}

impl BitWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a writer with room for `bytes` bytes.
    #[must_use]
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            buf: Vec::with_capacity(bytes),
            len: 0,
        }
    }

    #[must_use]
    pub const fn bits_written(&self) -> usize {
        self.len
    }

    pub fn write_bit(&mut self, bit: bool) {
        if self.len & 7 == 0 {
            self.buf.push(0);
        }
        if bit {
            if let Some(last) = self.buf.last_mut() {
                *last |= 1 << (self.len & 7);
            }
        }
        self.len += 1;
    }

    /// Appends the low `bits` bits of `value`.
    ///
    /// `value` must fit in `bits`; nothing is written otherwise.
    pub fn write_bits(&mut self, value: u64, bits: u8) -> BitResult<()> {
        if bits > 64 {
            return Err(BitError::InvalidBitCount { bits, max_bits: 64 });
        }
        if u32::from(bits) < u64::BITS && value >> bits != 0 {
            return Err(BitError::ValueOutOfRange { value, bits });
        }
        (0..bits).for_each(|i| self.write_bit(value >> i & 1 == 1));
        Ok(())
    }

    /// Appends one bit per `'0'` or `'1'`, in string order.
    ///
    /// Other characters are skipped, so prefixes may be grouped for
    /// readability (`"1101_1000"`).
    pub fn write_bit_string(&mut self, pattern: &str) {
        pattern
            .bytes()
            .filter(|c| matches!(c, b'0' | b'1'))
            .for_each(|c| self.write_bit(c == b'1'));
    }

    /// Appends a `UBitVar` in its shortest form.
    pub fn write_ubit_var(&mut self, value: u32) -> BitResult<()> {
        let (tag, extra) = match value {
            0..=0x0F => return self.write_bits(u64::from(value), 6),
            0x10..=0xFF => (0x10, 4),
            0x100..=0xFFF => (0x20, 8),
            _ => (0x30, 28),
        };
        self.write_bits(u64::from(value & 0x0F | tag), 6)?;
        self.write_bits(u64::from(value >> 4), extra)
    }

    pub fn write_var_u32(&mut self, value: u32) -> BitResult<()> {
        self.write_var_u64(u64::from(value))
    }

    /// Appends a protobuf varint as 8-bit groups.
    pub fn write_var_u64(&mut self, mut value: u64) -> BitResult<()> {
        while value > 0x7F {
            self.write_bits(value & 0x7F | 0x80, 8)?;
            value >>= 7;
        }
        self.write_bits(value, 8)
    }

    /// Appends a zigzag varint.
    pub fn write_var_s32(&mut self, value: i32) -> BitResult<()> {
        self.write_var_u32((value << 1 ^ value >> 31) as u32)
    }

    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_fill_from_the_low_end() {
        let mut writer = BitWriter::new();
        writer.write_bit(true);
        assert_eq!(writer.bits_written(), 1);
        writer.write_bits(0b10, 2).unwrap();
        assert_eq!(writer.finish(), vec![0b0000_0101]);
    }

    #[test]
    fn whole_bytes() {
        let mut writer = BitWriter::with_capacity(2);
        writer.write_bits(0xA5, 8).unwrap();
        writer.write_bits(0x3C, 8).unwrap();
        assert_eq!(writer.finish(), vec![0xA5, 0x3C]);
    }

    #[test]
    fn oversized_value_writes_nothing() {
        let mut writer = BitWriter::new();
        assert_eq!(
            writer.write_bits(16, 4),
            Err(BitError::ValueOutOfRange { value: 16, bits: 4 })
        );
        assert_eq!(writer.bits_written(), 0);
        assert!(writer.write_bits(u64::MAX, 64).is_ok());
    }

    #[test]
    fn bit_strings() {
        let mut writer = BitWriter::new();
        writer.write_bit_string("1101_0000");
        assert_eq!(writer.bits_written(), 8);
        assert_eq!(writer.finish(), vec![0b0000_1011]);
    }

    #[test]
    fn varint_layouts() {
        let mut writer = BitWriter::new();
        writer.write_var_u32(300).unwrap();
        writer.write_var_s32(-1).unwrap();
        writer.write_var_s32(2).unwrap();
        assert_eq!(writer.finish(), vec![0xAC, 0x02, 0x01, 0x04]);
    }
}
