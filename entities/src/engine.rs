//! The packet-entities state machine.

use std::sync::Arc;

use bitstream::BitReader;
use fieldpath::FieldPath;
use schema::{ClassDescriptor, ClassId, ClassRegistry, EntityState, FieldReader, PathFieldReader};
use tracing::{debug, trace, warn};
use wire::{read_deletions, read_entity_header, DirectiveKind, Limits, PacketEntities};

use crate::baseline::{BaselineSlot, BaselineStore};
use crate::config::EngineConfig;
use crate::entity::Entity;
use crate::error::{EntityError, EntityResult};
use crate::events::{EntityEvent, EntityFilter, Listeners, SubscriptionId};
use crate::frame::{Capsule, ClientFrame};
use crate::registry::EntityRegistry;
use crate::types::{Handle, ServerTick};

/// Reconstructs entity state from packet-entities messages.
///
/// The engine owns the live frame, the retired-entity registry and all
/// baselines. Messages are applied one at a time; a returned error leaves
/// the engine in whatever state it had reached and ends the session.
#[derive(Debug)]
pub struct EntityEngine<C, R = PathFieldReader> {
    pub(crate) config: EngineConfig,
    pub(crate) limits: Limits,
    pub(crate) classes: C,
    pub(crate) fields: R,
    pub(crate) world: World,
    pub(crate) baselines: BaselineStore,
    pub(crate) server_tick: ServerTick,
    pub(crate) reset: Option<Capsule>,
    deletions: Vec<u32>,
}

/// Entity tables and listeners, split from the engine so that a class
/// descriptor borrowed from the registry can stay live across mutations.
#[derive(Debug)]
pub(crate) struct World {
    pub(crate) frame: ClientFrame,
    pub(crate) registry: EntityRegistry,
    pub(crate) listeners: Listeners,
    pub(crate) changed: Vec<FieldPath>,
}

impl<C: ClassRegistry> EntityEngine<C, PathFieldReader> {
    /// Creates an engine reading fields with a [`PathFieldReader`] bounded
    /// by the configured path limit.
    pub fn with_path_reader(config: EngineConfig, classes: C) -> EntityResult<Self> {
        let fields = PathFieldReader::new(config.decoder_options());
        Self::new(config, classes, fields)
    }
}

impl<C: ClassRegistry, R: FieldReader> EntityEngine<C, R> {
    /// Creates an engine after validating `config`.
    pub fn new(config: EngineConfig, classes: C, fields: R) -> EntityResult<Self> {
        config.validate()?;
        let count = config.entity_count();
        Ok(Self {
            limits: Limits::default(),
            classes,
            fields,
            world: World {
                frame: ClientFrame::new(count),
                registry: EntityRegistry::new(),
                listeners: Listeners::new(),
                changed: Vec::new(),
            },
            baselines: BaselineStore::new(count),
            server_tick: ServerTick::default(),
            reset: None,
            deletions: Vec::new(),
            config,
        })
    }

    /// Replaces the message limits.
    #[must_use]
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub const fn classes(&self) -> &C {
        &self.classes
    }

    #[must_use]
    pub const fn server_tick(&self) -> ServerTick {
        self.server_tick
    }

    #[must_use]
    pub const fn frame(&self) -> &ClientFrame {
        &self.world.frame
    }

    #[must_use]
    pub const fn registry(&self) -> &EntityRegistry {
        &self.world.registry
    }

    #[must_use]
    pub const fn baselines(&self) -> &BaselineStore {
        &self.baselines
    }

    /// Registers a listener; see [`Listeners::subscribe`].
    pub fn subscribe<F>(&mut self, filter: Option<EntityFilter>, callback: F) -> SubscriptionId
    where
        F: FnMut(&EntityEvent<'_>) + 'static,
    {
        self.world.listeners.subscribe(filter, callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.world.listeners.unsubscribe(id)
    }

    /// Records the current server tick.
    pub fn on_tick(&mut self, tick: i32) {
        self.server_tick = ServerTick::new(tick);
    }

    /// Registers a raw class baseline from the baseline string table.
    ///
    /// `key` is the class id in decimal.
    pub fn on_baseline_entry(&mut self, key: &str, blob: &[u8]) -> EntityResult<()> {
        let class = key
            .parse::<u32>()
            .map(ClassId)
            .map_err(|_| EntityError::InvalidBaselineKey { key: key.to_owned() })?;
        self.baselines.register_raw(class, blob.to_vec());
        debug!(class = %class, bytes = blob.len(), "registered raw baseline");
        Ok(())
    }

    /// Applies one packet-entities message.
    pub fn on_packet_entities(&mut self, packet: &PacketEntities<'_>) -> EntityResult<()> {
        packet.validate(&self.limits)?;
        debug!(
            tick = self.server_tick.raw(),
            delta_from = packet.delta_from,
            updated_entries = packet.updated_entries,
            baseline = packet.baseline,
            update_baseline = packet.update_baseline,
            "processing packet entities"
        );

        if packet.is_delta {
            if self.server_tick.raw() == packet.delta_from {
                return Err(EntityError::SelfReferentialDelta {
                    tick: self.server_tick.raw(),
                });
            }
            debug!(delta_from = packet.delta_from, "performing delta update");
        } else {
            debug!("performing full update");
        }

        let slot = BaselineSlot::from_bit(packet.baseline);
        if packet.update_baseline {
            self.baselines.copy_across_all(slot);
        }

        let mut reader = BitReader::new(packet.entity_data);
        let mut previous = None;
        for _ in 0..packet.updated_entries {
            let header = read_entity_header(&mut reader, previous)?;
            previous = Some(header.index);
            let index = self.check_index(header.index)?;
            match header.kind {
                DirectiveKind::Create => self.create(&mut reader, index, packet, slot)?,
                DirectiveKind::Update => self.update(&mut reader, index)?,
                DirectiveKind::Leave => {
                    if self.world.frame.get(index).is_some_and(Entity::is_active) {
                        self.world.leave(index);
                    }
                }
                DirectiveKind::Delete => self.world.delete(index),
            }
        }

        if self.config.handle_deletions && packet.is_delta {
            self.deletions.clear();
            read_deletions(
                &mut reader,
                self.config.index_bits,
                self.limits.max_deletions,
                &mut self.deletions,
            )?;
            for i in 0..self.deletions.len() {
                let index = self.check_index(self.deletions[i])?;
                self.world.delete(index);
            }
        }

        debug!(tick = self.server_tick.raw(), "update finished");
        self.world.listeners.emit(&EntityEvent::UpdatesCompleted);
        Ok(())
    }

    fn check_index(&self, index: u32) -> EntityResult<u32> {
        let count = self.config.entity_count();
        if index as usize >= count {
            return Err(EntityError::IndexOutOfRange { index, count });
        }
        Ok(index)
    }

    fn create(
        &mut self,
        reader: &mut BitReader<'_>,
        index: u32,
        packet: &PacketEntities<'_>,
        slot: BaselineSlot,
    ) -> EntityResult<()> {
        let class_id = ClassId(reader.read_bits_u32(self.classes.class_bits())?);
        let class = self
            .classes
            .for_class_id(class_id)
            .ok_or(EntityError::UnknownClass { class: class_id })?;
        let serial = reader.read_bits_u32(self.config.serial_bits)?;
        if self.config.create_trailer_varuint {
            reader.read_var_u32()?;
        }
        let handle = self.config.handle_for(index, serial);

        if let Some(existing) = self.world.frame.get(index) {
            if existing.handle() == handle {
                if !existing.is_active() {
                    self.world.enter(index);
                }
                return self.world.update_live(reader, index, class, &mut self.fields);
            }
            if existing.is_active() {
                self.world.leave(index);
            }
            self.world.delete(index);
        }

        let seed = self.baselines.get(
            class_id,
            slot,
            index,
            packet.is_delta,
            &self.classes,
            &mut self.fields,
        )?;
        let state = EntityState::clone(&seed);
        self.world
            .create(reader, index, serial, handle, class, state, &mut self.fields)?;

        if packet.update_baseline {
            if let Some(entity) = self.world.frame.get(index) {
                let state = Arc::new(entity.state().clone());
                self.baselines
                    .set_entity(index, slot.other(), class_id, state);
            }
        }
        Ok(())
    }

    fn update(&mut self, reader: &mut BitReader<'_>, index: u32) -> EntityResult<()> {
        let Some(class_id) = self
            .world
            .frame
            .get(index)
            .or_else(|| {
                let handle = self.world.frame.last_handle(index)?;
                self.world.registry.get(handle)
            })
            .map(Entity::class_id)
        else {
            warn!(index, "update for empty slot with no previous occupant");
            return Ok(());
        };
        let class = self
            .classes
            .for_class_id(class_id)
            .ok_or(EntityError::UnknownClass { class: class_id })?;

        if self.world.frame.get(index).is_some() {
            self.world.update_live(reader, index, class, &mut self.fields)
        } else {
            self.world.update_retired(reader, index, class, &mut self.fields)
        }
    }

    /// Looks up the live entity in slot `index`.
    #[must_use]
    pub fn by_index(&self, index: u32) -> Option<&Entity> {
        self.world.frame.get(index)
    }

    /// Looks up a live entity by handle; stale handles resolve to `None`.
    #[must_use]
    pub fn by_handle(&self, handle: Handle) -> Option<&Entity> {
        self.by_index(self.config.index_for_handle(handle))
            .filter(|entity| entity.handle() == handle)
    }

    /// Iterates live entities in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.world.frame.iter()
    }

    pub fn iter_matching<'a, P>(&'a self, mut predicate: P) -> impl Iterator<Item = &'a Entity> + 'a
    where
        P: FnMut(&Entity) -> bool + 'a,
    {
        self.iter().filter(move |entity| predicate(entity))
    }

    pub fn find<P>(&self, mut predicate: P) -> Option<&Entity>
    where
        P: FnMut(&Entity) -> bool,
    {
        self.iter().find(|entity| predicate(entity))
    }

    pub fn iter_by_class_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Entity> + 'a {
        self.iter().filter(move |entity| entity.class_name() == name)
    }

    #[must_use]
    pub fn find_by_class_name(&self, name: &str) -> Option<&Entity> {
        self.find(|entity| entity.class_name() == name)
    }
}

impl World {
    #[allow(clippy::too_many_arguments)]
    fn create<R: FieldReader>(
        &mut self,
        reader: &mut BitReader<'_>,
        index: u32,
        serial: u32,
        handle: Handle,
        class: &ClassDescriptor,
        mut state: EntityState,
        fields: &mut R,
    ) -> EntityResult<()> {
        self.changed.clear();
        fields.read_fields(reader, class, &mut state, &mut self.changed)?;
        let entity = Entity::new(index, serial, handle, class.id, class.name.clone(), state);
        self.registry.forget(handle);
        self.frame.insert(entity);
        if let Some(entity) = self.frame.get(index) {
            log_modification("CREATE", entity);
            self.listeners.emit(&EntityEvent::Created(entity));
        }
        self.enter(index);
        Ok(())
    }

    fn update_live<R: FieldReader>(
        &mut self,
        reader: &mut BitReader<'_>,
        index: u32,
        class: &ClassDescriptor,
        fields: &mut R,
    ) -> EntityResult<()> {
        let Some(entity) = self.frame.get_mut(index) else {
            return Ok(());
        };
        self.changed.clear();
        fields.read_fields(reader, class, entity.state_mut(), &mut self.changed)?;
        log_modification("UPDATE", entity);
        self.listeners.emit(&EntityEvent::Updated {
            entity,
            changed: &self.changed,
        });
        Ok(())
    }

    /// Decodes an update into the slot's last occupant without notifying
    /// anyone; the bits still have to be consumed.
    fn update_retired<R: FieldReader>(
        &mut self,
        reader: &mut BitReader<'_>,
        index: u32,
        class: &ClassDescriptor,
        fields: &mut R,
    ) -> EntityResult<()> {
        let Some(entity) = self
            .frame
            .last_handle(index)
            .and_then(|handle| self.registry.get_mut(handle))
        else {
            return Ok(());
        };
        self.changed.clear();
        fields.read_fields(reader, class, entity.state_mut(), &mut self.changed)?;
        log_modification("UPDATE", entity);
        Ok(())
    }

    pub(crate) fn enter(&mut self, index: u32) {
        let Some(entity) = self.frame.get_mut(index) else {
            return;
        };
        debug_assert!(!entity.is_active(), "entity {index} entered twice");
        entity.set_active(true);
        log_modification("ENTER", entity);
        self.listeners.emit(&EntityEvent::Entered(entity));
    }

    pub(crate) fn leave(&mut self, index: u32) {
        let Some(entity) = self.frame.get_mut(index) else {
            return;
        };
        debug_assert!(entity.is_active(), "entity {index} left while inactive");
        entity.set_active(false);
        log_modification("LEAVE", entity);
        self.listeners.emit(&EntityEvent::Left(entity));
    }

    /// Removes the occupant of `index`, leaving first if it is active.
    pub(crate) fn delete(&mut self, index: u32) {
        if self.frame.get(index).is_some_and(Entity::is_active) {
            self.leave(index);
        }
        let Some(mut entity) = self.frame.remove(index) else {
            return;
        };
        entity.set_existent(false);
        log_modification("DELETE", &entity);
        self.listeners.emit(&EntityEvent::Deleted(&entity));
        self.registry.retire(entity);
    }
}

fn log_modification(which: &str, entity: &Entity) {
    trace!(
        op = which,
        index = entity.index(),
        serial = entity.serial(),
        handle = entity.handle().raw(),
        class = entity.class_name(),
        "entity modified"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use schema::{ClassTable, FieldCodec, FieldDef};

    fn engine() -> EntityEngine<ClassTable> {
        let classes = ClassTable::new(vec![
            ClassDescriptor::new(ClassId(0), "CWorld"),
            ClassDescriptor::new(ClassId(1), "CPlayer").field(FieldDef::new(
                FieldPath::from_slice(&[0]).unwrap(),
                "m_iHealth",
                FieldCodec::uint(8),
            )),
        ])
        .unwrap();
        EntityEngine::with_path_reader(EngineConfig::for_testing(), classes).unwrap()
    }

    #[test]
    fn invalid_baseline_key() {
        let mut engine = engine();
        assert_eq!(
            engine.on_baseline_entry("CPlayer", &[]),
            Err(EntityError::InvalidBaselineKey {
                key: "CPlayer".into()
            })
        );
        assert!(engine.on_baseline_entry("1", &[]).is_ok());
    }

    #[test]
    fn self_referential_delta_rejected_before_reading() {
        let mut engine = engine();
        engine.on_tick(50);
        let packet = PacketEntities::delta(50, 1, &[]);
        assert_eq!(
            engine.on_packet_entities(&packet),
            Err(EntityError::SelfReferentialDelta { tick: 50 })
        );
    }

    #[test]
    fn empty_full_packet_completes() {
        let mut engine = engine();
        let packet = PacketEntities::full(0, &[]);
        engine.on_packet_entities(&packet).unwrap();
        assert_eq!(engine.iter().count(), 0);
    }

    #[test]
    fn limits_checked_first() {
        let mut engine = engine().with_limits(Limits::for_testing());
        let packet = PacketEntities::full(1000, &[]);
        assert!(matches!(
            engine.on_packet_entities(&packet),
            Err(EntityError::Wire(_))
        ));
    }
}
