//! The field path opcode vocabulary.

use bitstream::{BitReader, BitResult};

use crate::decoder::DecoderOptions;
use crate::error::FieldPathResult;
use crate::path::FieldPath;

/// Bit widths of the five-tier selector integer, shortest first.
pub const TIER_WIDTHS: [u8; 5] = [2, 4, 10, 17, 30];

/// One instruction of the prefix-coded field path vocabulary.
///
/// Every opcode mutates the path accumulator and, apart from
/// [`FieldPathEncodeFinish`](Self::FieldPathEncodeFinish), completes one
/// field path. Prefixes are the canonical Huffman code of the weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FieldOp {
    PlusOne,
    PlusTwo,
    PlusThree,
    PlusFour,
    PlusN,
    PushOneLeftDeltaZeroRightZero,
    PushOneLeftDeltaZeroRightNonZero,
    PushOneLeftDeltaOneRightZero,
    PushOneLeftDeltaOneRightNonZero,
    PushOneLeftDeltaNRightZero,
    PushOneLeftDeltaNRightNonZero,
    PushOneLeftDeltaNRightNonZeroPack6Bits,
    PushOneLeftDeltaNRightNonZeroPack8Bits,
    PushTwoLeftDeltaZero,
    PushTwoPack5LeftDeltaZero,
    PushThreeLeftDeltaZero,
    PushThreePack5LeftDeltaZero,
    PushTwoLeftDeltaOne,
    PushTwoPack5LeftDeltaOne,
    PushThreeLeftDeltaOne,
    PushThreePack5LeftDeltaOne,
    PushTwoLeftDeltaN,
    PushTwoPack5LeftDeltaN,
    PushThreeLeftDeltaN,
    PushThreePack5LeftDeltaN,
    PushN,
    PushNAndNonTopographical,
    PopOnePlusOne,
    PopOnePlusN,
    PopAllButOnePlusOne,
    PopAllButOnePlusN,
    PopAllButOnePlusNPack3Bits,
    PopAllButOnePlusNPack6Bits,
    PopNPlusOne,
    PopNPlusN,
    PopNAndNonTopographical,
    NonTopoComplex,
    NonTopoPenultimatePlusOne,
    NonTopoComplexPack4Bits,
    FieldPathEncodeFinish,
}

impl FieldOp {
    /// Every opcode, in table order.
    pub const ALL: [Self; 40] = [
        Self::PlusOne,
        Self::PlusTwo,
        Self::PlusThree,
        Self::PlusFour,
        Self::PlusN,
        Self::PushOneLeftDeltaZeroRightZero,
        Self::PushOneLeftDeltaZeroRightNonZero,
        Self::PushOneLeftDeltaOneRightZero,
        Self::PushOneLeftDeltaOneRightNonZero,
        Self::PushOneLeftDeltaNRightZero,
        Self::PushOneLeftDeltaNRightNonZero,
        Self::PushOneLeftDeltaNRightNonZeroPack6Bits,
        Self::PushOneLeftDeltaNRightNonZeroPack8Bits,
        Self::PushTwoLeftDeltaZero,
        Self::PushTwoPack5LeftDeltaZero,
        Self::PushThreeLeftDeltaZero,
        Self::PushThreePack5LeftDeltaZero,
        Self::PushTwoLeftDeltaOne,
        Self::PushTwoPack5LeftDeltaOne,
        Self::PushThreeLeftDeltaOne,
        Self::PushThreePack5LeftDeltaOne,
        Self::PushTwoLeftDeltaN,
        Self::PushTwoPack5LeftDeltaN,
        Self::PushThreeLeftDeltaN,
        Self::PushThreePack5LeftDeltaN,
        Self::PushN,
        Self::PushNAndNonTopographical,
        Self::PopOnePlusOne,
        Self::PopOnePlusN,
        Self::PopAllButOnePlusOne,
        Self::PopAllButOnePlusN,
        Self::PopAllButOnePlusNPack3Bits,
        Self::PopAllButOnePlusNPack6Bits,
        Self::PopNPlusOne,
        Self::PopNPlusN,
        Self::PopNAndNonTopographical,
        Self::NonTopoComplex,
        Self::NonTopoPenultimatePlusOne,
        Self::NonTopoComplexPack4Bits,
        Self::FieldPathEncodeFinish,
    ];

    /// Relative frequency the prefix code was built from.
    #[must_use]
    pub const fn weight(self) -> u32 {
        match self {
            Self::PlusOne => 36271,
            Self::PlusTwo => 10334,
            Self::PlusThree => 1375,
            Self::PlusFour => 646,
            Self::PlusN => 4128,
            Self::PushOneLeftDeltaZeroRightZero => 35,
            Self::PushOneLeftDeltaZeroRightNonZero => 3,
            Self::PushOneLeftDeltaOneRightZero => 521,
            Self::PushOneLeftDeltaOneRightNonZero => 2942,
            Self::PushOneLeftDeltaNRightZero => 560,
            Self::PushOneLeftDeltaNRightNonZero => 471,
            Self::PushOneLeftDeltaNRightNonZeroPack6Bits => 10530,
            Self::PushOneLeftDeltaNRightNonZeroPack8Bits => 251,
            Self::PushNAndNonTopographical => 310,
            Self::PopOnePlusOne => 2,
            Self::PopAllButOnePlusOne => 1837,
            Self::PopAllButOnePlusN => 149,
            Self::PopAllButOnePlusNPack3Bits => 300,
            Self::PopAllButOnePlusNPack6Bits => 634,
            Self::PopNAndNonTopographical => 1,
            Self::NonTopoComplex => 76,
            Self::NonTopoPenultimatePlusOne => 271,
            Self::NonTopoComplexPack4Bits => 99,
            Self::FieldPathEncodeFinish => 25474,
            Self::PushTwoLeftDeltaZero
            | Self::PushTwoPack5LeftDeltaZero
            | Self::PushThreeLeftDeltaZero
            | Self::PushThreePack5LeftDeltaZero
            | Self::PushTwoLeftDeltaOne
            | Self::PushTwoPack5LeftDeltaOne
            | Self::PushThreeLeftDeltaOne
            | Self::PushThreePack5LeftDeltaOne
            | Self::PushTwoLeftDeltaN
            | Self::PushTwoPack5LeftDeltaN
            | Self::PushThreeLeftDeltaN
            | Self::PushThreePack5LeftDeltaN
            | Self::PushN
            | Self::PopOnePlusN
            | Self::PopNPlusOne
            | Self::PopNPlusN => 0,
        }
    }

    /// The prefix bits in stream order.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::PlusOne => "0",
            Self::PlusTwo => "1110",
            Self::PlusThree => "110010",
            Self::PlusFour => "11011111",
            Self::PlusN => "11010",
            Self::PushOneLeftDeltaZeroRightZero => "110110001101",
            Self::PushOneLeftDeltaZeroRightNonZero => "110110001100101",
            Self::PushOneLeftDeltaOneRightZero => "11011010",
            Self::PushOneLeftDeltaOneRightNonZero => "11000",
            Self::PushOneLeftDeltaNRightZero => "11011100",
            Self::PushOneLeftDeltaNRightNonZero => "11011001",
            Self::PushOneLeftDeltaNRightNonZeroPack6Bits => "1111",
            Self::PushOneLeftDeltaNRightNonZeroPack8Bits => "110110110",
            Self::PushTwoLeftDeltaZero => "1101100011001000",
            Self::PushTwoPack5LeftDeltaZero => "11011000110010011",
            Self::PushThreeLeftDeltaZero => "11011000110010010",
            Self::PushThreePack5LeftDeltaZero => "11011000110011101",
            Self::PushTwoLeftDeltaOne => "11011000110011100",
            Self::PushTwoPack5LeftDeltaOne => "11011000110011111",
            Self::PushThreeLeftDeltaOne => "11011000110011110",
            Self::PushThreePack5LeftDeltaOne => "11011000110011001",
            Self::PushTwoLeftDeltaN => "11011000110011000",
            Self::PushTwoPack5LeftDeltaN => "11011000110011011",
            Self::PushThreeLeftDeltaN => "11011000110011010",
            Self::PushThreePack5LeftDeltaN => "1101100011000101",
            Self::PushN => "1101100011000100",
            Self::PushNAndNonTopographical => "110111011",
            Self::PopOnePlusOne => "110110001100001",
            Self::PopOnePlusN => "1101100011000111",
            Self::PopAllButOnePlusOne => "110011",
            Self::PopAllButOnePlusN => "110110000",
            Self::PopAllButOnePlusNPack3Bits => "110111010",
            Self::PopAllButOnePlusNPack6Bits => "11011110",
            Self::PopNPlusOne => "1101100011000110",
            Self::PopNPlusN => "1101100011000001",
            Self::PopNAndNonTopographical => "1101100011000000",
            Self::NonTopoComplex => "11011000111",
            Self::NonTopoPenultimatePlusOne => "110110111",
            Self::NonTopoComplexPack4Bits => "1101100010",
            Self::FieldPathEncodeFinish => "10",
        }
    }

    /// Returns `true` for the sentinel that ends an update's path list.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::FieldPathEncodeFinish)
    }

    /// Applies this opcode to `fp`, reading any operands from `reader`.
    pub fn execute(
        self,
        fp: &mut FieldPath,
        reader: &mut BitReader<'_>,
        options: &DecoderOptions,
    ) -> FieldPathResult<()> {
        match self {
            Self::PlusOne => fp.add_top(1),
            Self::PlusTwo => fp.add_top(2),
            Self::PlusThree => fp.add_top(3),
            Self::PlusFour => fp.add_top(4),
            Self::PlusN => {
                if let Some(value) = read_tiered(reader)? {
                    fp.add_top(value as i32 + 5);
                }
            }
            Self::PushOneLeftDeltaZeroRightZero => fp.push(self, 0)?,
            Self::PushOneLeftDeltaZeroRightNonZero => {
                if let Some(value) = read_tiered(reader)? {
                    fp.push(self, value as i32)?;
                }
            }
            Self::PushOneLeftDeltaOneRightZero => {
                fp.add_top(1);
                fp.push(self, 0)?;
            }
            Self::PushOneLeftDeltaOneRightNonZero => {
                fp.add_top(1);
                if let Some(value) = read_tiered(reader)? {
                    fp.push(self, value as i32)?;
                }
            }
            Self::PushOneLeftDeltaNRightZero => {
                fp.add_top(tiered_or_zero(reader)? as i32);
                fp.push(self, 0)?;
            }
            Self::PushOneLeftDeltaNRightNonZero => {
                fp.add_top(tiered_or_zero(reader)? as i32 + 2);
                let value = tiered_or_zero(reader)? as i32 + 1;
                fp.push(self, value)?;
            }
            Self::PushOneLeftDeltaNRightNonZeroPack6Bits => {
                fp.add_top(reader.read_bits_u32(3)? as i32 + 2);
                let value = reader.read_bits_u32(3)? as i32 + 1;
                fp.push(self, value)?;
            }
            Self::PushOneLeftDeltaNRightNonZeroPack8Bits => {
                fp.add_top(reader.read_bits_u32(4)? as i32 + 2);
                let value = reader.read_bits_u32(4)? as i32 + 1;
                fp.push(self, value)?;
            }
            Self::PushTwoLeftDeltaZero => {
                fp.push(self, 0)?;
                fp.push(self, 0)?;
            }
            Self::PushTwoPack5LeftDeltaZero => push_pack5(self, fp, reader, 2)?,
            Self::PushThreeLeftDeltaZero => push_tiered(self, fp, reader, 3)?,
            Self::PushThreePack5LeftDeltaZero => push_pack5(self, fp, reader, 3)?,
            Self::PushTwoLeftDeltaOne => {
                fp.add_top(1);
                push_tiered(self, fp, reader, 2)?;
            }
            Self::PushTwoPack5LeftDeltaOne => {
                fp.add_top(1);
                push_pack5(self, fp, reader, 2)?;
            }
            Self::PushThreeLeftDeltaOne => {
                fp.add_top(1);
                push_tiered(self, fp, reader, 3)?;
            }
            Self::PushThreePack5LeftDeltaOne => {
                fp.add_top(1);
                push_pack5(self, fp, reader, 3)?;
            }
            Self::PushTwoLeftDeltaN => {
                fp.add_top(reader.read_ubit_var()? as i32 + 2);
                push_tiered(self, fp, reader, 2)?;
            }
            Self::PushTwoPack5LeftDeltaN => {
                fp.add_top(reader.read_ubit_var()? as i32 + 2);
                push_pack5(self, fp, reader, 2)?;
            }
            Self::PushThreeLeftDeltaN => {
                fp.add_top(reader.read_ubit_var()? as i32 + 2);
                push_tiered(self, fp, reader, 3)?;
            }
            Self::PushThreePack5LeftDeltaN => {
                fp.add_top(reader.read_ubit_var()? as i32 + 2);
                push_pack5(self, fp, reader, 3)?;
            }
            Self::PushN => {
                let count = reader.read_ubit_var()? as usize;
                fp.add_top(reader.read_ubit_var()? as i32);
                push_tiered(self, fp, reader, count)?;
            }
            Self::PushNAndNonTopographical => {
                for i in 0..=fp.last() {
                    if reader.read_bit()? {
                        fp.add_at(i, read_signed_delta(reader, options)?.wrapping_add(1));
                    }
                }
                let count = reader.read_ubit_var()? as usize;
                push_tiered(self, fp, reader, count)?;
            }
            Self::PopOnePlusOne => {
                fp.pop(self, 1)?;
                fp.add_top(1);
            }
            Self::PopOnePlusN => {
                fp.pop(self, 1)?;
                fp.add_top(tiered_or_zero(reader)? as i32 + 1);
            }
            Self::PopAllButOnePlusOne => {
                fp.pop_all_but_one();
                fp.add_top(1);
            }
            Self::PopAllButOnePlusN => {
                fp.pop_all_but_one();
                fp.add_top(tiered_or_zero(reader)? as i32 + 1);
            }
            Self::PopAllButOnePlusNPack3Bits => {
                fp.pop_all_but_one();
                fp.add_top(reader.read_bits_u32(3)? as i32 + 1);
            }
            Self::PopAllButOnePlusNPack6Bits => {
                fp.pop_all_but_one();
                fp.add_top(reader.read_bits_u32(6)? as i32 + 1);
            }
            Self::PopNPlusOne => {
                if let Some(count) = read_tiered(reader)? {
                    fp.pop(self, count as usize)?;
                    fp.add_top(1);
                }
            }
            Self::PopNPlusN => {
                fp.pop(self, tiered_or_zero(reader)? as usize)?;
                fp.add_top(read_signed_delta(reader, options)?);
            }
            Self::PopNAndNonTopographical => {
                fp.pop(self, tiered_or_zero(reader)? as usize)?;
                non_topo_signed(fp, reader, options)?;
            }
            Self::NonTopoComplex => non_topo_signed(fp, reader, options)?,
            Self::NonTopoPenultimatePlusOne => {
                if fp.last() == 0 {
                    return Err(crate::FieldPathError::DepthUnderflow {
                        op: self,
                        requested: 1,
                        depth: fp.depth(),
                    });
                }
                fp.add_at(fp.last() - 1, 1);
            }
            Self::NonTopoComplexPack4Bits => {
                for i in 0..=fp.last() {
                    if reader.read_bit()? {
                        fp.add_at(i, reader.read_bits_u32(4)? as i32 - 7);
                    }
                }
            }
            Self::FieldPathEncodeFinish => {}
        }
        Ok(())
    }
}

/// Reads the five-tier selector integer.
///
/// Selector bits are consumed one at a time; the first set bit commits to
/// the matching width in [`TIER_WIDTHS`]. Five clear selector bits yield
/// `None`, and opcodes that carry a tiered operand leave the path untouched.
pub fn read_tiered(reader: &mut BitReader<'_>) -> BitResult<Option<u32>> {
    for width in TIER_WIDTHS {
        if reader.read_bit()? {
            return reader.read_bits_u32(width).map(Some);
        }
    }
    Ok(None)
}

// Operand of a delta or count where an absent tier means no change.
fn tiered_or_zero(reader: &mut BitReader<'_>) -> BitResult<u32> {
    Ok(read_tiered(reader)?.unwrap_or(0))
}

/// Reads a non-topographical delta.
///
/// Capture data is decoded as an unsigned varint reinterpreted as `i32`,
/// which is wrong for negative deltas; `signed_non_topo_deltas` switches to
/// a zigzag decode.
fn read_signed_delta(reader: &mut BitReader<'_>, options: &DecoderOptions) -> BitResult<i32> {
    if options.signed_non_topo_deltas {
        reader.read_var_s32()
    } else {
        Ok(reader.read_var_u32()? as i32)
    }
}

fn non_topo_signed(
    fp: &mut FieldPath,
    reader: &mut BitReader<'_>,
    options: &DecoderOptions,
) -> FieldPathResult<()> {
    for i in 0..=fp.last() {
        if reader.read_bit()? {
            fp.add_at(i, read_signed_delta(reader, options)?);
        }
    }
    Ok(())
}

fn push_tiered(
    op: FieldOp,
    fp: &mut FieldPath,
    reader: &mut BitReader<'_>,
    count: usize,
) -> FieldPathResult<()> {
    for _ in 0..count {
        let value = tiered_or_zero(reader)? as i32;
        fp.push(op, value)?;
    }
    Ok(())
}

fn push_pack5(
    op: FieldOp,
    fp: &mut FieldPath,
    reader: &mut BitReader<'_>,
    count: usize,
) -> FieldPathResult<()> {
    for _ in 0..count {
        let value = reader.read_bits_u32(5)? as i32;
        fp.push(op, value)?;
    }
    Ok(())
}
