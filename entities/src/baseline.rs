//! Per-class and per-entity baselines.

use std::collections::HashMap;
use std::sync::Arc;

use bitstream::BitReader;
use schema::{ClassId, ClassRegistry, EntityState, FieldReader};

use crate::error::{EntityError, EntityResult};

/// One of the two entity baseline buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaselineSlot {
    Primary,
    Secondary,
}

impl BaselineSlot {
    /// Maps the message's baseline selector bit to a buffer.
    #[must_use]
    pub const fn from_bit(bit: u8) -> Self {
        if bit & 1 == 0 {
            Self::Primary
        } else {
            Self::Secondary
        }
    }

    /// The buffer not selected by `self`.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Primary => Self::Secondary,
            Self::Secondary => Self::Primary,
        }
    }
}

/// A state snapshot tagged with the class it was decoded for.
///
/// States are shared and never written in place; entities seed from a
/// deep copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Baseline {
    class: Option<ClassId>,
    state: Option<Arc<EntityState>>,
}

impl Baseline {
    #[must_use]
    pub fn new(class: ClassId, state: Arc<EntityState>) -> Self {
        Self {
            class: Some(class),
            state: Some(state),
        }
    }

    #[must_use]
    pub const fn class(&self) -> Option<ClassId> {
        self.class
    }

    #[must_use]
    pub fn state(&self) -> Option<&Arc<EntityState>> {
        self.state.as_ref()
    }

    /// Returns the state if it was materialized for `class`.
    #[must_use]
    pub fn state_for(&self, class: ClassId) -> Option<&Arc<EntityState>> {
        self.state.as_ref().filter(|_| self.class == Some(class))
    }

    fn reset(&mut self) {
        self.state = None;
    }
}

/// The two baseline buffers of one entity slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaselinePair {
    primary: Baseline,
    secondary: Baseline,
}

impl BaselinePair {
    #[must_use]
    pub const fn get(&self, slot: BaselineSlot) -> &Baseline {
        match slot {
            BaselineSlot::Primary => &self.primary,
            BaselineSlot::Secondary => &self.secondary,
        }
    }

    pub fn set(&mut self, slot: BaselineSlot, baseline: Baseline) {
        *self.get_mut(slot) = baseline;
    }

    /// Copies the `from` buffer into the other one.
    pub fn copy_across(&mut self, from: BaselineSlot) {
        let source = self.get(from).clone();
        self.set(from.other(), source);
    }

    fn get_mut(&mut self, slot: BaselineSlot) -> &mut Baseline {
        match slot {
            BaselineSlot::Primary => &mut self.primary,
            BaselineSlot::Secondary => &mut self.secondary,
        }
    }

    fn reset(&mut self) {
        self.primary.reset();
        self.secondary.reset();
    }
}

/// Class baselines built from raw blobs plus per-slot entity baselines.
#[derive(Debug)]
pub struct BaselineStore {
    raw: HashMap<ClassId, Vec<u8>>,
    classes: HashMap<ClassId, Arc<EntityState>>,
    entities: Vec<BaselinePair>,
}

impl BaselineStore {
    /// Creates a store for `entity_count` slots with no raw blobs.
    #[must_use]
    pub fn new(entity_count: usize) -> Self {
        Self {
            raw: HashMap::new(),
            classes: HashMap::new(),
            entities: vec![BaselinePair::default(); entity_count],
        }
    }

    /// Registers the raw blob for a class and drops its decoded baseline.
    pub fn register_raw(&mut self, class: ClassId, blob: Vec<u8>) {
        self.raw.insert(class, blob);
        self.invalidate(class);
    }

    /// Drops the decoded baseline of a class.
    pub fn invalidate(&mut self, class: ClassId) {
        self.classes.remove(&class);
    }

    /// Drops every decoded baseline, class and entity alike.
    ///
    /// Raw blobs are kept; class baselines rebuild from them on demand.
    pub fn clear(&mut self) {
        self.classes.clear();
        self.entities.iter_mut().for_each(BaselinePair::reset);
    }

    /// Returns the seed state for a new entity of `class` at `index`.
    ///
    /// Delta creates prefer the slot's baseline in buffer `slot` when it was
    /// built for the same class; otherwise the class baseline is used,
    /// decoding it from its raw blob on first access.
    pub fn get<C, R>(
        &mut self,
        class: ClassId,
        slot: BaselineSlot,
        index: u32,
        is_delta: bool,
        classes: &C,
        fields: &mut R,
    ) -> EntityResult<Arc<EntityState>>
    where
        C: ClassRegistry + ?Sized,
        R: FieldReader + ?Sized,
    {
        if is_delta {
            if let Some(state) = self
                .entities
                .get(index as usize)
                .and_then(|pair| pair.get(slot).state_for(class))
            {
                return Ok(Arc::clone(state));
            }
        }
        if let Some(state) = self.classes.get(&class) {
            return Ok(Arc::clone(state));
        }

        let descriptor = classes
            .for_class_id(class)
            .ok_or(EntityError::UnknownClass { class })?;
        let raw = self
            .raw
            .get(&class)
            .ok_or_else(|| EntityError::BaselineMissing {
                class,
                name: descriptor.name.clone(),
            })?;
        let mut state = descriptor.empty_state();
        if !raw.is_empty() {
            let mut changed = Vec::new();
            fields.read_fields(&mut BitReader::new(raw), descriptor, &mut state, &mut changed)?;
        }
        tracing::debug!(class = %class, name = %descriptor.name, "materialized class baseline");

        let state = Arc::new(state);
        self.classes.insert(class, Arc::clone(&state));
        Ok(state)
    }

    /// Returns the baselines of one slot.
    #[must_use]
    pub fn entity(&self, index: u32) -> Option<&BaselinePair> {
        self.entities.get(index as usize)
    }

    /// Stores `state` as the `slot` baseline of entity `index`.
    pub fn set_entity(&mut self, index: u32, slot: BaselineSlot, class: ClassId, state: Arc<EntityState>) {
        if let Some(pair) = self.entities.get_mut(index as usize) {
            pair.set(slot, Baseline::new(class, state));
        }
    }

    /// Copies buffer `from` into the other buffer for every slot.
    pub fn copy_across_all(&mut self, from: BaselineSlot) {
        self.entities
            .iter_mut()
            .for_each(|pair| pair.copy_across(from));
    }
}
