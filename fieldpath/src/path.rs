//! Field path accumulator.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{FieldPathError, FieldPathResult};
use crate::op::FieldOp;

/// Maximum number of segments in a field path.
pub const MAX_DEPTH: usize = 7;

/// A fully-qualified address into a class's field tree.
///
/// Holds up to [`MAX_DEPTH`] segments plus the index of the topmost valid
/// one. Segments above `last` are stale and never observed: equality,
/// ordering and hashing only look at [`as_slice`](Self::as_slice).
///
/// The type is `Copy`; decoders reuse one accumulator across opcodes, so
/// anything that must outlive the current step keeps a copy.
#[derive(Clone, Copy)]
pub struct FieldPath {
    segments: [i32; MAX_DEPTH],
    last: usize,
}

impl FieldPath {
    /// Creates the decode starting point `[-1]`, so that the first
    /// increment addresses field 0.
    #[must_use]
    pub const fn new() -> Self {
        let mut segments = [0; MAX_DEPTH];
        segments[0] = -1;
        Self { segments, last: 0 }
    }

    /// Creates a path from explicit segments.
    pub fn from_slice(segments: &[i32]) -> FieldPathResult<Self> {
        if segments.is_empty() || segments.len() > MAX_DEPTH {
            return Err(FieldPathError::InvalidLength {
                len: segments.len(),
            });
        }
        let mut path = Self {
            segments: [0; MAX_DEPTH],
            last: segments.len() - 1,
        };
        path.segments[..segments.len()].copy_from_slice(segments);
        Ok(path)
    }

    /// Returns the valid segments, root first.
    #[must_use]
    pub fn as_slice(&self) -> &[i32] {
        &self.segments[..=self.last]
    }

    /// Returns the index of the topmost valid segment.
    #[must_use]
    pub const fn last(&self) -> usize {
        self.last
    }

    /// Returns the number of valid segments.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.last + 1
    }

    /// Returns the segment at `index`, if it is valid.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<i32> {
        self.as_slice().get(index).copied()
    }

    /// Returns the topmost segment.
    #[must_use]
    pub const fn top(&self) -> i32 {
        self.segments[self.last]
    }

    pub(crate) fn add_top(&mut self, delta: i32) {
        self.segments[self.last] = self.segments[self.last].wrapping_add(delta);
    }

    pub(crate) fn add_at(&mut self, index: usize, delta: i32) {
        self.segments[index] = self.segments[index].wrapping_add(delta);
    }

    pub(crate) fn push(&mut self, op: FieldOp, value: i32) -> FieldPathResult<()> {
        if self.last + 1 >= MAX_DEPTH {
            return Err(FieldPathError::DepthOverflow { op });
        }
        self.last += 1;
        self.segments[self.last] = value;
        Ok(())
    }

    pub(crate) fn pop(&mut self, op: FieldOp, count: usize) -> FieldPathResult<()> {
        if count > self.last {
            return Err(FieldPathError::DepthUnderflow {
                op,
                requested: count,
                depth: self.depth(),
            });
        }
        self.last -= count;
        Ok(())
    }

    pub(crate) fn pop_all_but_one(&mut self) {
        self.last = 0;
    }
}

impl Default for FieldPath {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for FieldPath {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for FieldPath {}

impl PartialOrd for FieldPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FieldPath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl Hash for FieldPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl fmt::Debug for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldPath({self})")
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.as_slice().iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl TryFrom<&[i32]> for FieldPath {
    type Error = FieldPathError;

    fn try_from(segments: &[i32]) -> FieldPathResult<Self> {
        Self::from_slice(segments)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for FieldPath {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.as_slice())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for FieldPath {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let segments = Vec::<i32>::deserialize(deserializer)?;
        Self::from_slice(&segments).map_err(serde::de::Error::custom)
    }
}
