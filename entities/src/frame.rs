//! The live entity table and reset capsules.

use crate::entity::Entity;
use crate::types::Handle;

/// Every entity slot for the current tick.
///
/// Slots remember the handle of their last occupant after it is removed.
#[derive(Debug)]
pub struct ClientFrame {
    entities: Vec<Option<Entity>>,
    last_handles: Vec<Option<Handle>>,
}

impl ClientFrame {
    /// Creates a frame with `count` empty slots.
    #[must_use]
    pub fn new(count: usize) -> Self {
        let mut entities = Vec::with_capacity(count);
        entities.resize_with(count, || None);
        Self {
            entities,
            last_handles: vec![None; count],
        }
    }

    /// Number of slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn get(&self, index: u32) -> Option<&Entity> {
        self.entities.get(index as usize)?.as_ref()
    }

    pub(crate) fn get_mut(&mut self, index: u32) -> Option<&mut Entity> {
        self.entities.get_mut(index as usize)?.as_mut()
    }

    /// Handle of the last entity installed at `index`.
    #[must_use]
    pub fn last_handle(&self, index: u32) -> Option<Handle> {
        self.last_handles.get(index as usize).copied().flatten()
    }

    /// Installs an entity in its slot, returning any previous occupant.
    pub(crate) fn insert(&mut self, entity: Entity) -> Option<Entity> {
        let index = entity.index() as usize;
        debug_assert!(index < self.entities.len(), "slot {index} out of range");
        let slot = self.entities.get_mut(index)?;
        self.last_handles[index] = Some(entity.handle());
        slot.replace(entity)
    }

    pub(crate) fn remove(&mut self, index: u32) -> Option<Entity> {
        self.entities.get_mut(index as usize)?.take()
    }

    /// Removes every live entity, keeping the slot count.
    pub(crate) fn drain(&mut self) -> impl Iterator<Item = Entity> + '_ {
        self.last_handles.iter_mut().for_each(|handle| *handle = None);
        self.entities.iter_mut().filter_map(Option::take)
    }

    /// Iterates live entities in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.iter().flatten()
    }

    /// Records existence, activity and handle of every slot.
    #[must_use]
    pub fn capsule(&self) -> Capsule {
        let slots = self
            .entities
            .iter()
            .map(|slot| {
                slot.as_ref()
                    .filter(|entity| entity.is_existent())
                    .map(|entity| CapsuleSlot {
                        handle: entity.handle(),
                        active: entity.is_active(),
                    })
            })
            .collect();
        Capsule { slots }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CapsuleSlot {
    handle: Handle,
    active: bool,
}

/// A frozen record of a frame taken at reset START.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capsule {
    slots: Box<[Option<CapsuleSlot>]>,
}

impl Capsule {
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub fn is_existent(&self, index: u32) -> bool {
        self.slot(index).is_some()
    }

    #[must_use]
    pub fn is_active(&self, index: u32) -> bool {
        self.slot(index).is_some_and(|slot| slot.active)
    }

    #[must_use]
    pub fn handle(&self, index: u32) -> Option<Handle> {
        self.slot(index).map(|slot| slot.handle)
    }

    fn slot(&self, index: u32) -> Option<CapsuleSlot> {
        self.slots.get(index as usize).copied().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schema::{ClassId, EntityState};

    fn entity(index: u32, serial: u32) -> Entity {
        Entity::new(
            index,
            serial,
            Handle::new(index | serial << 4),
            ClassId(1),
            "CPlayer".into(),
            EntityState::new(),
        )
    }

    #[test]
    fn insert_records_last_handle() {
        let mut frame = ClientFrame::new(16);
        frame.insert(entity(3, 9));
        assert_eq!(frame.get(3).map(Entity::serial), Some(9));
        frame.remove(3);
        assert!(frame.get(3).is_none());
        assert_eq!(frame.last_handle(3), Some(Handle::new(3 | 9 << 4)));
        assert_eq!(frame.last_handle(4), None);
    }

    #[test]
    fn out_of_range_lookups_are_none() {
        let frame = ClientFrame::new(4);
        assert!(frame.get(4).is_none());
        assert_eq!(frame.last_handle(400), None);
    }

    #[test]
    fn capsule_is_independent_of_later_changes() {
        let mut frame = ClientFrame::new(8);
        frame.insert(entity(2, 1));
        frame.get_mut(2).unwrap().set_active(true);
        frame.insert(entity(5, 4));

        let capsule = frame.capsule();
        frame.remove(2);
        frame.get_mut(5).unwrap().set_active(true);

        assert!(capsule.is_existent(2));
        assert!(capsule.is_active(2));
        assert!(capsule.is_existent(5));
        assert!(!capsule.is_active(5));
        assert_eq!(capsule.handle(5), Some(Handle::new(5 | 4 << 4)));
        assert!(!capsule.is_existent(0));
        assert_eq!(capsule.len(), 8);
    }

    #[test]
    fn drain_empties_every_slot() {
        let mut frame = ClientFrame::new(8);
        frame.insert(entity(1, 1));
        frame.insert(entity(7, 1));
        assert_eq!(frame.drain().count(), 2);
        assert_eq!(frame.iter().count(), 0);
        assert_eq!(frame.last_handle(7), None);
        assert_eq!(frame.capacity(), 8);
    }
}
