//! Decoded entity state.

use std::collections::btree_map;
use std::collections::BTreeMap;

use fieldpath::FieldPath;

use crate::FieldValue;

/// Leaf values of one entity keyed by field path, in path order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityState {
    fields: BTreeMap<FieldPath, FieldValue>,
}

impl EntityState {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[must_use]
    pub fn get(&self, path: &FieldPath) -> Option<FieldValue> {
        self.fields.get(path).copied()
    }

    /// Writes a value, returning the previous one.
    pub fn set(&mut self, path: FieldPath, value: FieldValue) -> Option<FieldValue> {
        self.fields.insert(path, value)
    }

    /// Iterates every present field path in path order.
    pub fn field_paths(&self) -> impl Iterator<Item = &FieldPath> + '_ {
        self.fields.keys()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, FieldPath, FieldValue> {
        self.fields.iter()
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }
}

impl FromIterator<(FieldPath, FieldValue)> for EntityState {
    fn from_iter<I: IntoIterator<Item = (FieldPath, FieldValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a EntityState {
    type Item = (&'a FieldPath, &'a FieldValue);
    type IntoIter = btree_map::Iter<'a, FieldPath, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
