//! Full-state reset diffing.

use schema::{ClassRegistry, FieldReader};
use tracing::{debug, warn};

use crate::engine::EntityEngine;
use crate::error::{EntityError, EntityResult};
use crate::events::EntityEvent;

/// Phase of a full-state reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResetPhase {
    /// Capture the live frame and mute listeners.
    Start,
    /// Discard live entities and every decoded baseline.
    Clear,
    /// Diff the rebuilt frame against the capture and report the result.
    Complete,
}

impl<C: ClassRegistry, R: FieldReader> EntityEngine<C, R> {
    /// Drives one phase of a full-state reset.
    ///
    /// Between START and COMPLETE packets are applied as usual but nothing
    /// is delivered to listeners. COMPLETE then reports, per slot, a leave
    /// and delete for an occupant that is gone or replaced, a create (and
    /// enter if active) for a new occupant, or a full-state update for an
    /// occupant that survived, followed by one `UpdatesCompleted`.
    pub fn on_reset(&mut self, phase: ResetPhase) -> EntityResult<()> {
        debug!(?phase, tick = self.server_tick.raw(), "reset");
        match phase {
            ResetPhase::Start => {
                if self.reset.is_some() {
                    return Err(EntityError::ResetInProgress);
                }
                self.reset = Some(self.world.frame.capsule());
                self.world.listeners.set_muted(true);
            }
            ResetPhase::Clear => {
                if self.reset.is_none() {
                    return Err(EntityError::ResetNotStarted { phase });
                }
                let world = &mut self.world;
                for mut entity in world.frame.drain() {
                    entity.set_existent(false);
                    world.registry.retire(entity);
                }
                self.baselines.clear();
            }
            ResetPhase::Complete => {
                let capsule = self
                    .reset
                    .take()
                    .ok_or(EntityError::ResetNotStarted { phase })?;
                let world = &mut self.world;
                world.listeners.set_muted(false);

                for index in 0..world.frame.capacity() as u32 {
                    let current = world.frame.get(index);
                    let current_handle = current.map(|entity| entity.handle());

                    if let Some(old) = capsule.handle(index) {
                        if current_handle != Some(old) {
                            match world.registry.get(old) {
                                Some(deleted) => {
                                    if capsule.is_active(index) {
                                        world.listeners.emit(&EntityEvent::Left(deleted));
                                    }
                                    world.listeners.emit(&EntityEvent::Deleted(deleted));
                                }
                                None => warn!(index, handle = old.raw(), "reset lost track of entity"),
                            }
                        }
                    }

                    let Some(entity) = current else {
                        continue;
                    };
                    if capsule.handle(index) == current_handle {
                        world.changed.clear();
                        world.changed.extend(entity.state().field_paths().copied());
                        world.listeners.emit(&EntityEvent::Updated {
                            entity,
                            changed: &world.changed,
                        });
                    } else {
                        world.listeners.emit(&EntityEvent::Created(entity));
                        if entity.is_active() {
                            world.listeners.emit(&EntityEvent::Entered(entity));
                        }
                    }
                }

                world.listeners.emit(&EntityEvent::UpdatesCompleted);
            }
        }
        Ok(())
    }

    /// Returns `true` between reset START and COMPLETE.
    #[must_use]
    pub const fn is_reset_in_progress(&self) -> bool {
        self.reset.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EngineConfig;
    use schema::{ClassDescriptor, ClassId, ClassTable};

    fn engine() -> EntityEngine<ClassTable> {
        let classes = ClassTable::new(vec![ClassDescriptor::new(ClassId(0), "CWorld")]).unwrap();
        EntityEngine::with_path_reader(EngineConfig::for_testing(), classes).unwrap()
    }

    #[test]
    fn complete_without_start() {
        let mut engine = engine();
        assert_eq!(
            engine.on_reset(ResetPhase::Complete),
            Err(EntityError::ResetNotStarted {
                phase: ResetPhase::Complete
            })
        );
    }

    #[test]
    fn clear_without_start() {
        let mut engine = engine();
        assert!(matches!(
            engine.on_reset(ResetPhase::Clear),
            Err(EntityError::ResetNotStarted { .. })
        ));
    }

    #[test]
    fn double_start() {
        let mut engine = engine();
        engine.on_reset(ResetPhase::Start).unwrap();
        assert!(engine.is_reset_in_progress());
        assert_eq!(engine.on_reset(ResetPhase::Start), Err(EntityError::ResetInProgress));
    }

    #[test]
    fn empty_reset_signals_completion_once() {
        let mut engine = engine();
        let completions = std::rc::Rc::new(std::cell::Cell::new(0));
        let sink = std::rc::Rc::clone(&completions);
        engine.subscribe(None, move |_| sink.set(sink.get() + 1));

        engine.on_reset(ResetPhase::Start).unwrap();
        engine.on_reset(ResetPhase::Clear).unwrap();
        engine
            .on_packet_entities(&wire::PacketEntities::full(0, &[]))
            .unwrap();
        assert_eq!(completions.get(), 0);
        engine.on_reset(ResetPhase::Complete).unwrap();
        assert_eq!(completions.get(), 1);
        assert!(!engine.is_reset_in_progress());
    }
}
