//! Entity reconstruction for capture replay decoding.
//!
//! [`EntityEngine`] consumes packet-entities messages and maintains:
//! - The live [`ClientFrame`] of entities, one per slot
//! - Class and double-buffered per-entity baselines ([`BaselineStore`])
//! - A registry of retired entities addressable by [`Handle`]
//! - Lifecycle events delivered to registered listeners
//!
//! Full-state resets go through [`EntityEngine::on_reset`], which rebuilds
//! the frame silently and then reports the difference to the state seen
//! before the reset.
//!
//! # Example
//!
//! ```
//! use entities::{EngineConfig, EntityEngine};
//! use schema::{ClassDescriptor, ClassId, ClassTable};
//! use wire::PacketEntities;
//!
//! let classes = ClassTable::new(vec![ClassDescriptor::new(ClassId(0), "CWorld")]).unwrap();
//! let mut engine = EntityEngine::with_path_reader(EngineConfig::source1(), classes).unwrap();
//!
//! engine.on_tick(100);
//! engine.on_packet_entities(&PacketEntities::full(0, &[])).unwrap();
//! assert_eq!(engine.iter().count(), 0);
//! ```

mod baseline;
mod config;
mod engine;
mod entity;
mod error;
mod events;
mod frame;
mod registry;
mod reset;
mod types;

pub use baseline::{Baseline, BaselinePair, BaselineSlot, BaselineStore};
pub use config::{EngineConfig, MAX_INDEX_BITS};
pub use engine::EntityEngine;
pub use entity::Entity;
pub use error::{EntityError, EntityResult};
pub use events::{EntityEvent, EntityFilter, EventKind, Listeners, SubscriptionId};
pub use frame::{Capsule, ClientFrame};
pub use registry::EntityRegistry;
pub use reset::ResetPhase;
pub use types::{Handle, ServerTick};
