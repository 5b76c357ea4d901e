//! Bit cursor for capture entity payloads.
//!
//! [`BitReader`] walks a byte buffer least-significant bit first and
//! understands the integer forms entity data is built from: fixed-width
//! fields, the tagged `UBitVar`, and protobuf-style varints read as 8-bit
//! groups. [`BitWriter`] produces the same layout and exists so tests can
//! assemble payloads.
//!
//! Reads never panic. Running out of data yields
//! [`BitError::UnexpectedEof`] and leaves the cursor where it was.
//!
//! ```
//! use bitstream::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! writer.write_ubit_var(4000).unwrap();
//! writer.write_bits(2, 2).unwrap();
//! writer.write_var_s32(-9).unwrap();
//! let bytes = writer.finish();
//!
//! let mut reader = BitReader::new(&bytes);
//! assert_eq!(reader.read_ubit_var().unwrap(), 4000);
//! assert_eq!(reader.read_bits(2).unwrap(), 2);
//! assert_eq!(reader.read_var_s32().unwrap(), -9);
//! ```

mod error;
mod reader;
mod writer;

pub use error::{BitError, BitResult};
pub use reader::BitReader;
pub use writer::BitWriter;
