mod common;

use common::*;
use entities::EventKind::{Created, Deleted, Entered, Left, Updated, UpdatesCompleted};
use entities::{EntityError, ResetPhase};

fn populated() -> Engine {
    let mut engine = engine();
    engine.on_tick(1);
    full(
        &mut engine,
        Payload::new()
            .create(5, UNIT, 1, &[(HEALTH, Leaf::UInt(10, 8))])
            .create(6, PLAYER, 1, &[]),
    )
    .unwrap();
    engine
}

#[test]
fn rebuild_is_silent_and_diffed_on_complete() {
    let mut engine = populated();
    let events = Recorder::attach(&mut engine, None);

    engine.on_reset(ResetPhase::Start).unwrap();
    engine.on_reset(ResetPhase::Clear).unwrap();
    assert_eq!(engine.iter().count(), 0);
    engine.on_tick(2);
    full(
        &mut engine,
        Payload::new()
            .create(5, PLAYER, 2, &[])
            .create(6, PLAYER, 1, &[(HEALTH, Leaf::UInt(7, 8))]),
    )
    .unwrap();
    assert!(events.take().is_empty());

    engine.on_reset(ResetPhase::Complete).unwrap();
    let (old5, new5, h6) = (handle(5, 1), handle(5, 2), handle(6, 1));
    let recorded = events.take_full();
    let kinds: Vec<_> = recorded.iter().map(|event| (event.kind, event.handle)).collect();
    assert_eq!(
        kinds,
        vec![
            (Left, Some(old5)),
            (Deleted, Some(old5)),
            (Created, Some(new5)),
            (Entered, Some(new5)),
            (Updated, Some(h6)),
            (UpdatesCompleted, None),
        ]
    );
    // A surviving entity reports its whole state.
    assert_eq!(
        recorded[4].changed,
        vec![path(&[HEALTH]), path(&[ALIVE]), path(&[TEAM])]
    );
    assert!(!engine.is_reset_in_progress());
}

#[test]
fn entity_missing_after_rebuild_is_deleted() {
    let mut engine = populated();
    let events = Recorder::attach(&mut engine, None);

    engine.on_reset(ResetPhase::Start).unwrap();
    engine.on_reset(ResetPhase::Clear).unwrap();
    engine.on_tick(2);
    full(&mut engine, Payload::new().create(6, PLAYER, 1, &[])).unwrap();
    engine.on_reset(ResetPhase::Complete).unwrap();

    let (h5, h6) = (handle(5, 1), handle(6, 1));
    assert_eq!(
        events.take(),
        vec![
            (Left, Some(h5)),
            (Deleted, Some(h5)),
            (Updated, Some(h6)),
            (UpdatesCompleted, None),
        ]
    );
    assert!(engine.by_index(5).is_none());
    let gone = engine.registry().get(h5).unwrap();
    assert!(!gone.is_existent());
}

#[test]
fn inactive_entity_is_deleted_without_leave() {
    let mut engine = populated();
    engine.on_tick(2);
    delta(&mut engine, 1, Payload::new().leave(5), &[]).unwrap();
    let events = Recorder::attach(&mut engine, None);

    engine.on_reset(ResetPhase::Start).unwrap();
    engine.on_reset(ResetPhase::Clear).unwrap();
    engine.on_reset(ResetPhase::Complete).unwrap();

    let (h5, h6) = (handle(5, 1), handle(6, 1));
    assert_eq!(
        events.take(),
        vec![
            (Deleted, Some(h5)),
            (Left, Some(h6)),
            (Deleted, Some(h6)),
            (UpdatesCompleted, None),
        ]
    );
}

#[test]
fn clear_drops_entity_baselines_but_keeps_raw_blobs() {
    let mut engine = populated();
    engine.on_tick(2);
    let (entries, data) = Payload::new()
        .create(7, UNIT, 1, &[(HEALTH, Leaf::UInt(99, 8))])
        .finish_with_deletions(&[]);
    engine
        .on_packet_entities(&wire::PacketEntities::delta(1, entries, &data).with_baseline(0, true))
        .unwrap();
    assert!(engine
        .baselines()
        .entity(7)
        .unwrap()
        .get(entities::BaselineSlot::Secondary)
        .state()
        .is_some());

    engine.on_reset(ResetPhase::Start).unwrap();
    engine.on_reset(ResetPhase::Clear).unwrap();
    assert!(engine
        .baselines()
        .entity(7)
        .unwrap()
        .get(entities::BaselineSlot::Secondary)
        .state()
        .is_none());

    // Class baselines rebuild from the raw blobs.
    engine.on_tick(3);
    full(&mut engine, Payload::new().create(7, UNIT, 2, &[])).unwrap();
    engine.on_reset(ResetPhase::Complete).unwrap();
    assert_eq!(
        engine.by_index(7).unwrap().state().get(&path(&[HEALTH])),
        Some(schema::FieldValue::UInt(0))
    );
}

#[test]
fn phases_out_of_order() {
    let mut engine = populated();
    assert_eq!(
        engine.on_reset(ResetPhase::Complete),
        Err(EntityError::ResetNotStarted {
            phase: ResetPhase::Complete
        })
    );
    engine.on_reset(ResetPhase::Start).unwrap();
    assert_eq!(engine.on_reset(ResetPhase::Start), Err(EntityError::ResetInProgress));
    engine.on_reset(ResetPhase::Complete).unwrap();

    // Start then Complete with no Clear: every entity survives as an update.
    assert_eq!(engine.iter().count(), 2);
}

#[test]
fn listeners_resume_after_complete() {
    let mut engine = populated();
    let events = Recorder::attach(&mut engine, None);
    engine.on_reset(ResetPhase::Start).unwrap();
    engine.on_reset(ResetPhase::Complete).unwrap();
    events.take();

    engine.on_tick(5);
    delta(&mut engine, 4, Payload::new().leave(6), &[]).unwrap();
    let h6 = handle(6, 1);
    assert_eq!(events.take(), vec![(Left, Some(h6)), (UpdatesCompleted, None)]);
}
