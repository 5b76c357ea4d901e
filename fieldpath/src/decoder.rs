//! Field path stream decoding.

use bitstream::BitReader;

use crate::error::{FieldPathError, FieldPathResult};
use crate::op::FieldOp;
use crate::path::FieldPath;
use crate::tree::PrefixTree;

/// Maximum number of paths one update may carry.
pub const MAX_PATHS: usize = 0x3fff;

/// Options controlling field path decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DecoderOptions {
    /// Maximum number of paths per update.
    pub max_paths: usize,
    /// Decode non-topographical deltas as zigzag varints.
    ///
    /// Off by default: capture data is read as unsigned varints.
    pub signed_non_topo_deltas: bool,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            max_paths: MAX_PATHS,
            signed_non_topo_deltas: false,
        }
    }
}

impl DecoderOptions {
    /// Creates options suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_paths: 64,
            signed_non_topo_deltas: false,
        }
    }
}

/// Decodes prefix-coded opcode streams into field paths.
#[derive(Debug, Clone, Default)]
pub struct FieldPathDecoder {
    options: DecoderOptions,
}

impl FieldPathDecoder {
    /// Creates a decoder with the given options.
    #[must_use]
    pub const fn new(options: DecoderOptions) -> Self {
        Self { options }
    }

    /// Returns the decoder options.
    #[must_use]
    pub const fn options(&self) -> &DecoderOptions {
        &self.options
    }

    /// Decodes the next opcode without executing it.
    pub fn decode_next(&self, reader: &mut BitReader<'_>) -> FieldPathResult<FieldOp> {
        PrefixTree::get().decode(reader)
    }

    /// Decodes opcodes until the terminal one, calling `on_path` with each
    /// completed path. Returns the number of paths produced.
    ///
    /// The path passed to `on_path` is the decoder's accumulator and changes
    /// on the next opcode; copy it to retain it.
    pub fn decode_all<F>(&self, reader: &mut BitReader<'_>, mut on_path: F) -> FieldPathResult<usize>
    where
        F: FnMut(usize, &FieldPath),
    {
        let mut fp = FieldPath::new();
        let mut count = 0usize;
        loop {
            let op = self.decode_next(reader)?;
            if op.is_terminal() {
                return Ok(count);
            }
            op.execute(&mut fp, reader, &self.options)?;
            if count >= self.options.max_paths {
                return Err(FieldPathError::TooManyPaths {
                    limit: self.options.max_paths,
                });
            }
            on_path(count, &fp);
            count += 1;
        }
    }

    /// Decodes into `paths`, replacing its contents.
    pub fn decode_into(
        &self,
        reader: &mut BitReader<'_>,
        paths: &mut Vec<FieldPath>,
    ) -> FieldPathResult<usize> {
        paths.clear();
        self.decode_all(reader, |_, fp| paths.push(*fp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitstream::BitWriter;

    fn decode(bytes: &[u8]) -> FieldPathResult<Vec<FieldPath>> {
        let mut reader = BitReader::new(bytes);
        let mut paths = Vec::new();
        FieldPathDecoder::default().decode_into(&mut reader, &mut paths)?;
        Ok(paths)
    }

    #[test]
    fn finish_alone_yields_no_paths() {
        let mut writer = BitWriter::new();
        writer.write_bit_string(FieldOp::FieldPathEncodeFinish.prefix());
        let bytes = writer.finish();
        assert!(decode(&bytes).unwrap().is_empty());
    }

    #[test]
    fn consecutive_plus_ones_walk_fields() {
        let mut writer = BitWriter::new();
        writer.write_bit_string("0 0 0");
        writer.write_bit_string(FieldOp::FieldPathEncodeFinish.prefix());
        let bytes = writer.finish();
        let paths = decode(&bytes).unwrap();
        let flat: Vec<_> = paths.iter().map(|p| p.as_slice().to_vec()).collect();
        assert_eq!(flat, vec![vec![0], vec![1], vec![2]]);
    }

    #[test]
    fn missing_terminal_is_truncation() {
        let mut writer = BitWriter::new();
        writer.write_bit_string("0");
        let bytes = writer.finish();
        // Padding decodes as further PlusOne opcodes until the bytes run out.
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(err, FieldPathError::Bitstream(_)));
    }

    #[test]
    fn path_limit_enforced() {
        let mut writer = BitWriter::new();
        writer.write_bit_string("0000");
        writer.write_bit_string(FieldOp::FieldPathEncodeFinish.prefix());
        let bytes = writer.finish();
        let decoder = FieldPathDecoder::new(DecoderOptions {
            max_paths: 3,
            ..DecoderOptions::default()
        });
        let mut reader = BitReader::new(&bytes);
        let err = decoder.decode_all(&mut reader, |_, _| {}).unwrap_err();
        assert_eq!(err, FieldPathError::TooManyPaths { limit: 3 });
    }
}
