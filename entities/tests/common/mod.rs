#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use bitstream::BitWriter;
use entities::{EngineConfig, EntityEngine, EntityFilter, EntityResult, EventKind, Handle};
use fieldpath::{FieldOp, FieldPath};
use schema::{ClassDescriptor, ClassId, ClassTable, FieldCodec, FieldDef};
use tracing_subscriber::EnvFilter;
use wire::{write_deletions, DirectiveKind, PacketEntities};

pub const WORLD: u32 = 0;
pub const PLAYER: u32 = 1;
pub const PROJECTILE: u32 = 2;
pub const UNIT: u32 = 3;

pub const HEALTH: i32 = 0;
pub const ALIVE: i32 = 1;
pub const TEAM: i32 = 2;

pub type Engine = EntityEngine<ClassTable>;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_test_writer()
        .try_init();
}

pub fn path(segments: &[i32]) -> FieldPath {
    FieldPath::from_slice(segments).unwrap()
}

fn with_unit_fields(class: ClassDescriptor) -> ClassDescriptor {
    class
        .field(FieldDef::new(path(&[HEALTH]), "m_iHealth", FieldCodec::uint(8)))
        .field(FieldDef::new(path(&[ALIVE]), "m_bAlive", FieldCodec::bool()))
        .field(FieldDef::new(path(&[TEAM]), "m_iTeamNum", FieldCodec::uint(6)))
}

/// World, player and projectile classes; two class id bits.
pub fn classes_without_unit() -> Vec<ClassDescriptor> {
    vec![
        ClassDescriptor::new(ClassId(WORLD), "CWorld"),
        with_unit_fields(ClassDescriptor::new(ClassId(PLAYER), "CPlayer")),
        ClassDescriptor::new(ClassId(PROJECTILE), "CProjectile").field(FieldDef::new(
            path(&[0]),
            "m_nBounces",
            FieldCodec::uint(6),
        )),
    ]
}

pub fn classes() -> ClassTable {
    let mut classes = classes_without_unit();
    classes.push(with_unit_fields(ClassDescriptor::new(ClassId(UNIT), "CUnit")));
    ClassTable::new(classes).unwrap()
}

/// An engine with empty raw baselines registered for every class.
pub fn engine() -> Engine {
    engine_with(EngineConfig::for_testing())
}

pub fn engine_with(config: EngineConfig) -> Engine {
    let mut engine = EntityEngine::with_path_reader(config, classes()).unwrap();
    for class in [WORLD, PLAYER, PROJECTILE, UNIT] {
        engine.on_baseline_entry(&class.to_string(), &[]).unwrap();
    }
    engine
}

pub fn handle(index: u32, serial: u32) -> Handle {
    EngineConfig::for_testing().handle_for(index, serial)
}

/// A leaf value as written to the payload.
#[derive(Debug, Clone, Copy)]
pub enum Leaf {
    UInt(u64, u8),
    Bool(bool),
}

/// Builds entity data for the testing configuration: six index bits, ten
/// serial bits, two class id bits.
#[derive(Debug, Default)]
pub struct Payload {
    writer: BitWriter,
    previous: Option<u32>,
    entries: u32,
}

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(mut self, index: u32, class: u32, serial: u32, fields: &[(i32, Leaf)]) -> Self {
        self.header(index, DirectiveKind::Create);
        self.writer.write_bits(u64::from(class), 2).unwrap();
        self.writer.write_bits(u64::from(serial), 10).unwrap();
        self.fields(fields);
        self
    }

    /// A CREATE carrying the var-uint some engines write after the serial.
    pub fn create_with_trailer(
        mut self,
        index: u32,
        class: u32,
        serial: u32,
        trailer: u32,
        fields: &[(i32, Leaf)],
    ) -> Self {
        self.header(index, DirectiveKind::Create);
        self.writer.write_bits(u64::from(class), 2).unwrap();
        self.writer.write_bits(u64::from(serial), 10).unwrap();
        self.writer.write_var_u32(trailer).unwrap();
        self.fields(fields);
        self
    }

    pub fn update(mut self, index: u32, fields: &[(i32, Leaf)]) -> Self {
        self.header(index, DirectiveKind::Update);
        self.fields(fields);
        self
    }

    /// An update directive with no field data, for slots nothing can decode.
    pub fn bare_update(mut self, index: u32) -> Self {
        self.header(index, DirectiveKind::Update);
        self
    }

    pub fn leave(mut self, index: u32) -> Self {
        self.header(index, DirectiveKind::Leave);
        self
    }

    pub fn delete(mut self, index: u32) -> Self {
        self.header(index, DirectiveKind::Delete);
        self
    }

    /// Raw header with an explicit index delta.
    pub fn raw_header(mut self, delta: u32, kind: DirectiveKind) -> Self {
        self.writer.write_ubit_var(delta).unwrap();
        self.writer.write_bits(u64::from(kind.bits()), 2).unwrap();
        self.entries += 1;
        self
    }

    pub fn finish(self) -> (u32, Vec<u8>) {
        (self.entries, self.writer.finish())
    }

    pub fn finish_with_deletions(mut self, deletions: &[u32]) -> (u32, Vec<u8>) {
        write_deletions(&mut self.writer, 6, deletions).unwrap();
        self.finish()
    }

    fn header(&mut self, index: u32, kind: DirectiveKind) {
        let delta = match self.previous {
            None => index,
            Some(previous) => index - previous - 1,
        };
        self.previous = Some(index);
        self.writer.write_ubit_var(delta).unwrap();
        self.writer.write_bits(u64::from(kind.bits()), 2).unwrap();
        self.entries += 1;
    }

    /// Top-level fields only, ascending.
    fn fields(&mut self, fields: &[(i32, Leaf)]) {
        let mut previous = -1;
        for &(field, _) in fields {
            let step = field - previous - 1;
            assert!((0..64).contains(&step), "field {field} after {previous}");
            self.writer
                .write_bit_string(FieldOp::PopAllButOnePlusNPack6Bits.prefix());
            self.writer.write_bits(step as u64, 6).unwrap();
            previous = field;
        }
        self.writer
            .write_bit_string(FieldOp::FieldPathEncodeFinish.prefix());
        for &(_, leaf) in fields {
            match leaf {
                Leaf::UInt(value, bits) => self.writer.write_bits(value, bits).unwrap(),
                Leaf::Bool(value) => self.writer.write_bit(value),
            }
        }
    }
}

pub fn full(engine: &mut Engine, payload: Payload) -> EntityResult<()> {
    let (entries, data) = payload.finish();
    engine.on_packet_entities(&PacketEntities::full(entries, &data))
}

pub fn delta(engine: &mut Engine, from: i32, payload: Payload, deletions: &[u32]) -> EntityResult<()> {
    let (entries, data) = payload.finish_with_deletions(deletions);
    engine.on_packet_entities(&PacketEntities::delta(from, entries, &data))
}

/// One delivered event, reduced to owned data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    pub kind: EventKind,
    pub handle: Option<Handle>,
    pub changed: Vec<FieldPath>,
}

#[derive(Debug, Clone, Default)]
pub struct Recorder(Rc<RefCell<Vec<Recorded>>>);

impl Recorder {
    pub fn attach(engine: &mut Engine, filter: Option<EntityFilter>) -> Self {
        let recorder = Self::default();
        let sink = Rc::clone(&recorder.0);
        engine.subscribe(filter, move |event| {
            let changed = match event {
                entities::EntityEvent::Updated { changed, .. } => changed.to_vec(),
                _ => Vec::new(),
            };
            sink.borrow_mut().push(Recorded {
                kind: event.kind(),
                handle: event.entity().map(entities::Entity::handle),
                changed,
            });
        });
        recorder
    }

    /// Drains recorded events as `(kind, handle)` pairs.
    pub fn take(&self) -> Vec<(EventKind, Option<Handle>)> {
        self.take_full()
            .into_iter()
            .map(|event| (event.kind, event.handle))
            .collect()
    }

    pub fn take_full(&self) -> Vec<Recorded> {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}
