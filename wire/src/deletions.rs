//! The explicit deletion list trailing a delta message.

use bitstream::{BitReader, BitResult, BitWriter};

use crate::error::{DecodeError, LimitKind, WireResult};

/// Reads `flag, index` pairs until a clear flag, appending each index to
/// `out`. Returns the number of indices read.
///
/// At most `max` entries are accepted; a list longer than that is an error.
pub fn read_deletions(
    reader: &mut BitReader<'_>,
    index_bits: u8,
    max: usize,
    out: &mut Vec<u32>,
) -> WireResult<usize> {
    let start = out.len();
    while reader.read_bit()? {
        if out.len() - start == max {
            return Err(DecodeError::LimitsExceeded {
                kind: LimitKind::Deletions,
                limit: max,
                actual: max + 1,
            });
        }
        out.push(reader.read_bits_u32(index_bits)?);
    }
    Ok(out.len() - start)
}

/// Writes a deletion list in the layout [`read_deletions`] consumes.
pub fn write_deletions(writer: &mut BitWriter, index_bits: u8, indices: &[u32]) -> BitResult<()> {
    for &index in indices {
        writer.write_bit(true);
        writer.write_bits(u64::from(index), index_bits)?;
    }
    writer.write_bit(false);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_is_one_clear_bit() {
        let mut writer = BitWriter::new();
        write_deletions(&mut writer, 11, &[]).unwrap();
        assert_eq!(writer.bits_written(), 1);
        let bytes = writer.finish();
        let mut out = Vec::new();
        assert_eq!(read_deletions(&mut BitReader::new(&bytes), 11, 8, &mut out).unwrap(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn indices_in_order() {
        let mut writer = BitWriter::new();
        write_deletions(&mut writer, 11, &[3, 2047, 0]).unwrap();
        let bytes = writer.finish();
        let mut out = Vec::new();
        let n = read_deletions(&mut BitReader::new(&bytes), 11, 8, &mut out).unwrap();
        assert_eq!(n, 3);
        assert_eq!(out, vec![3, 2047, 0]);
    }

    #[test]
    fn list_longer_than_max_is_rejected() {
        let mut writer = BitWriter::new();
        write_deletions(&mut writer, 4, &[1, 2, 3]).unwrap();
        let bytes = writer.finish();
        let err = read_deletions(&mut BitReader::new(&bytes), 4, 2, &mut Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::LimitsExceeded {
                kind: LimitKind::Deletions,
                limit: 2,
                ..
            }
        ));
    }

    #[test]
    fn missing_terminator_is_truncation() {
        let mut writer = BitWriter::new();
        writer.write_bit(true);
        writer.write_bits(0b111_1111, 7).unwrap();
        let bytes = writer.finish();
        let err = read_deletions(&mut BitReader::new(&bytes), 4, 8, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, DecodeError::Bitstream(_)));
    }
}
