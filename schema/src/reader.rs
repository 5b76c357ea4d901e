//! Reading changed fields from an entity payload.

use bitstream::BitReader;
use fieldpath::{DecoderOptions, FieldPath, FieldPathDecoder};

use crate::error::{SchemaError, SchemaResult};
use crate::{ClassDescriptor, EntityState};

/// Applies one entity's field updates from a payload onto a state.
pub trait FieldReader {
    /// Reads the changed fields of `class` into `state`, appending each
    /// changed path to `changed`. Returns the number of fields read.
    fn read_fields(
        &mut self,
        reader: &mut BitReader<'_>,
        class: &ClassDescriptor,
        state: &mut EntityState,
        changed: &mut Vec<FieldPath>,
    ) -> SchemaResult<usize>;
}

/// Field reader for path-addressed payloads.
///
/// The payload is the opcode stream for every changed path followed by one
/// leaf value per path in the same order.
#[derive(Debug, Clone, Default)]
pub struct PathFieldReader {
    decoder: FieldPathDecoder,
    paths: Vec<FieldPath>,
}

impl PathFieldReader {
    #[must_use]
    pub fn new(options: DecoderOptions) -> Self {
        Self {
            decoder: FieldPathDecoder::new(options),
            paths: Vec::new(),
        }
    }

    #[must_use]
    pub const fn decoder(&self) -> &FieldPathDecoder {
        &self.decoder
    }
}

impl FieldReader for PathFieldReader {
    fn read_fields(
        &mut self,
        reader: &mut BitReader<'_>,
        class: &ClassDescriptor,
        state: &mut EntityState,
        changed: &mut Vec<FieldPath>,
    ) -> SchemaResult<usize> {
        let count = self.decoder.decode_into(reader, &mut self.paths)?;
        for path in &self.paths {
            let field = class
                .field_at(path)
                .ok_or(SchemaError::UnknownField {
                    class: class.id,
                    path: *path,
                })?;
            state.set(*path, field.codec.read(reader)?);
            changed.push(*path);
        }
        Ok(count)
    }
}
