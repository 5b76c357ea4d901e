//! Entities that no longer occupy a frame slot.

use std::collections::HashMap;

use crate::entity::Entity;
use crate::types::Handle;

/// Retired entities addressable by handle.
///
/// A slot's last occupant stays reachable here after deletion so that
/// updates naming the vacated slot can still be decoded, and a reset can
/// report deletions for entities discarded by CLEAR. At most one entity per
/// slot is kept; retiring another evicts the earlier one.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    retired: HashMap<Handle, Entity>,
    by_slot: HashMap<u32, Handle>,
}

impl EntityRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.retired.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.retired.is_empty()
    }

    #[must_use]
    pub fn get(&self, handle: Handle) -> Option<&Entity> {
        self.retired.get(&handle)
    }

    pub(crate) fn get_mut(&mut self, handle: Handle) -> Option<&mut Entity> {
        self.retired.get_mut(&handle)
    }

    pub(crate) fn retire(&mut self, entity: Entity) {
        let handle = entity.handle();
        if let Some(previous) = self.by_slot.insert(entity.index(), handle) {
            if previous != handle {
                self.retired.remove(&previous);
            }
        }
        self.retired.insert(handle, entity);
    }

    /// Drops a stale entry about to be superseded by a new entity.
    pub(crate) fn forget(&mut self, handle: Handle) {
        if let Some(entity) = self.retired.remove(&handle) {
            self.by_slot.remove(&entity.index());
        }
    }
}
