//! Live and retired entities.

use schema::{ClassId, EntityState};

use crate::types::Handle;

/// One networked object occupying a frame slot.
///
/// An entity is *existent* while it occupies its slot and *active* while it
/// is visible to the client; an entity can exist without being active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    index: u32,
    serial: u32,
    handle: Handle,
    class_id: ClassId,
    class_name: String,
    state: EntityState,
    existent: bool,
    active: bool,
}

impl Entity {
    pub(crate) fn new(
        index: u32,
        serial: u32,
        handle: Handle,
        class_id: ClassId,
        class_name: String,
        state: EntityState,
    ) -> Self {
        Self {
            index,
            serial,
            handle,
            class_id,
            class_name,
            state,
            existent: true,
            active: false,
        }
    }

    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }

    #[must_use]
    pub const fn serial(&self) -> u32 {
        self.serial
    }

    #[must_use]
    pub const fn handle(&self) -> Handle {
        self.handle
    }

    #[must_use]
    pub const fn class_id(&self) -> ClassId {
        self.class_id
    }

    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    #[must_use]
    pub const fn state(&self) -> &EntityState {
        &self.state
    }

    #[must_use]
    pub const fn is_existent(&self) -> bool {
        self.existent
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn state_mut(&mut self) -> &mut EntityState {
        &mut self.state
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub(crate) fn set_existent(&mut self, existent: bool) {
        self.existent = existent;
    }
}
