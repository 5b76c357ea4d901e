//! Field path opcode decoding for entity updates.
//!
//! An entity update names the fields it touches as a stream of prefix-coded
//! opcodes. Each opcode mutates a small path accumulator; every opcode except
//! the terminal one completes a [`FieldPath`] addressing one leaf of the
//! class's field tree.
//!
//! # Example
//!
//! ```
//! use bitstream::{BitReader, BitWriter};
//! use fieldpath::{FieldOp, FieldPathDecoder};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bit_string(FieldOp::PlusOne.prefix());
//! writer.write_bit_string(FieldOp::PlusTwo.prefix());
//! writer.write_bit_string(FieldOp::FieldPathEncodeFinish.prefix());
//! let bytes = writer.finish();
//!
//! let mut paths = Vec::new();
//! let mut reader = BitReader::new(&bytes);
//! FieldPathDecoder::default().decode_into(&mut reader, &mut paths).unwrap();
//! assert_eq!(paths[0].as_slice(), &[0]);
//! assert_eq!(paths[1].as_slice(), &[2]);
//! ```

mod decoder;
mod error;
mod op;
mod path;
mod tree;

pub use decoder::{DecoderOptions, FieldPathDecoder, MAX_PATHS};
pub use error::{FieldPathError, FieldPathResult};
pub use op::{read_tiered, FieldOp, TIER_WIDTHS};
pub use path::{FieldPath, MAX_DEPTH};
