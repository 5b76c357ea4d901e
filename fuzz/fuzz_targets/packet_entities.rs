#![no_main]

use entities::{EngineConfig, EntityEngine, ResetPhase};
use fieldpath::FieldPath;
use libfuzzer_sys::fuzz_target;
use schema::{ClassDescriptor, ClassId, ClassTable, FieldCodec, FieldDef};
use wire::{Limits, PacketEntities};

fn classes() -> ClassTable {
    let path = |i| FieldPath::from_slice(&[i]).unwrap();
    ClassTable::new(vec![
        ClassDescriptor::new(ClassId(0), "CWorld"),
        ClassDescriptor::new(ClassId(1), "CPlayer")
            .field(FieldDef::new(path(0), "m_iHealth", FieldCodec::uint(8)))
            .field(FieldDef::new(path(1), "m_bAlive", FieldCodec::bool()))
            .field(FieldDef::new(path(2), "m_vecOrigin", FieldCodec::var_sint())),
        ClassDescriptor::new(ClassId(2), "CProjectile")
            .field(FieldDef::new(path(0), "m_nBounces", FieldCodec::uint(6))),
    ])
    .unwrap()
}

fuzz_target!(|data: &[u8]| {
    let Ok(engine) = EntityEngine::with_path_reader(EngineConfig::for_testing(), classes()) else {
        return;
    };
    let mut engine = engine.with_limits(Limits::for_testing());
    for class in 0..3 {
        let _ = engine.on_baseline_entry(&class.to_string(), &[]);
    }

    // Each chunk: control byte, entry count, length, then entity data.
    let mut rest = data;
    let mut tick = 0;
    while let [control, entries, len, tail @ ..] = rest {
        let len = (*len as usize).min(tail.len());
        let (entity_data, next) = tail.split_at(len);
        rest = next;
        tick += 1;
        engine.on_tick(tick);

        match control % 8 {
            0 => {
                let _ = engine.on_reset(ResetPhase::Start);
            }
            1 => {
                let _ = engine.on_reset(ResetPhase::Clear);
            }
            2 => {
                let _ = engine.on_reset(ResetPhase::Complete);
            }
            _ => {
                let packet = if control & 0x10 == 0 {
                    PacketEntities::full(u32::from(*entries), entity_data)
                } else {
                    PacketEntities::delta(tick - 1, u32::from(*entries), entity_data)
                }
                .with_baseline(control >> 7, control & 0x20 != 0);
                if engine.on_packet_entities(&packet).is_err() {
                    return;
                }
            }
        }

        for entity in engine.iter() {
            assert!(entity.is_existent());
            assert_eq!(engine.by_handle(entity.handle()).map(|e| e.index()), Some(entity.index()));
        }
    }
});
