//! Class layouts and entity state for capture decoding.
//!
//! This crate describes how an entity's fields are laid out and decoded:
//! - Class descriptors mapping field paths to names and leaf codecs
//! - A class registry resolving class ids read from CREATE directives
//! - Ordered entity state keyed by field path
//! - A field reader applying one update's changed fields onto a state
//!
//! Class layouts are supplied by the caller; this crate does not derive them
//! from capture send tables.

mod class;
mod error;
mod field;
mod reader;
mod state;

pub use class::{class_bits, ClassDescriptor, ClassId, ClassRegistry, ClassTable, FieldDef};
pub use error::{SchemaError, SchemaResult};
pub use field::{FieldCodec, FieldValue};
pub use reader::{FieldReader, PathFieldReader};
pub use state::EntityState;
