//! Class descriptors and the class registry.

use std::collections::HashSet;
use std::fmt;

use fieldpath::FieldPath;

use crate::error::{SchemaError, SchemaResult};
use crate::{EntityState, FieldCodec};

/// Numeric id of a server class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ClassId(pub u32);

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One leaf field of a class, addressed by its field path.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldDef {
    pub path: FieldPath,
    pub name: String,
    pub codec: FieldCodec,
}

impl FieldDef {
    #[must_use]
    pub fn new(path: FieldPath, name: impl Into<String>, codec: FieldCodec) -> Self {
        Self {
            path,
            name: name.into(),
            codec,
        }
    }
}

/// The flattened field layout of a server class.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassDescriptor {
    pub id: ClassId,
    pub name: String,
    pub fields: Vec<FieldDef>,
}

impl ClassDescriptor {
    /// Creates a class with no fields.
    #[must_use]
    pub fn new(id: ClassId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Adds a field to the class.
    #[must_use]
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Looks up the field declared at `path`.
    #[must_use]
    pub fn field_at(&self, path: &FieldPath) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.path == *path)
    }

    /// Returns the zero-valued state holding every declared field.
    #[must_use]
    pub fn empty_state(&self) -> EntityState {
        self.fields
            .iter()
            .map(|field| (field.path, field.codec.default_value()))
            .collect()
    }

    /// Validates field invariants.
    pub fn validate(&self) -> SchemaResult<()> {
        let mut paths = HashSet::new();
        for field in &self.fields {
            if !paths.insert(field.path) {
                return Err(SchemaError::DuplicateField {
                    class: self.id,
                    path: field.path,
                });
            }
            validate_codec(field.codec)?;
        }
        Ok(())
    }
}

fn validate_codec(codec: FieldCodec) -> SchemaResult<()> {
    match codec {
        FieldCodec::UInt { bits } | FieldCodec::SInt { bits } => {
            if bits == 0 || bits > 64 {
                return Err(SchemaError::InvalidBitWidth { bits });
            }
        }
        FieldCodec::Bool | FieldCodec::VarUInt | FieldCodec::VarSInt => {}
    }
    Ok(())
}

/// Number of bits a class id occupies on the wire: `ceil(log2(count))`.
#[must_use]
pub const fn class_bits(count: usize) -> u8 {
    if count <= 1 {
        return 0;
    }
    (usize::BITS - (count - 1).leading_zeros()) as u8
}

/// Resolves class ids to descriptors.
pub trait ClassRegistry {
    /// Number of classes known to the server.
    fn class_count(&self) -> usize;

    /// Width of the class id field in a CREATE directive.
    fn class_bits(&self) -> u8 {
        class_bits(self.class_count())
    }

    /// Looks up a class by id.
    fn for_class_id(&self, id: ClassId) -> Option<&ClassDescriptor>;
}

/// A dense registry where each class id equals its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassTable {
    classes: Vec<ClassDescriptor>,
}

impl ClassTable {
    /// Creates a table after validation.
    pub fn new(classes: Vec<ClassDescriptor>) -> SchemaResult<Self> {
        for (position, class) in classes.iter().enumerate() {
            if class.id.0 as usize != position {
                return Err(SchemaError::ClassIdMismatch {
                    position,
                    found: class.id,
                });
            }
            class.validate()?;
        }
        Ok(Self { classes })
    }

    /// Looks up a class by name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&ClassDescriptor> {
        self.classes.iter().find(|class| class.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassDescriptor> + '_ {
        self.classes.iter()
    }
}

impl ClassRegistry for ClassTable {
    fn class_count(&self) -> usize {
        self.classes.len()
    }

    fn for_class_id(&self, id: ClassId) -> Option<&ClassDescriptor> {
        self.classes.get(id.0 as usize)
    }
}
