//! The uniqueness invariant across creates and edits.

use koyomi_test::engine::{CalendarEngine, EditScope, EventDraft, EventPatch, EventSelector};

use super::helpers::*;

#[test_log::test]
fn duplicate_create_is_a_conflict() {
    let engine = CalendarEngine::default();
    let draft = EventDraft::timed("A", at(2025, 1, 1, 10, 0), at(2025, 1, 1, 11, 0));
    engine.create(&draft).expect("first create");

    let err = engine.create(&draft).expect_err("identical triple");
    assert!(matches!(err, CoreError::Conflict { .. }));
}

#[test_log::test]
fn subject_case_does_not_make_a_distinct_identity() {
    let engine = CalendarEngine::default();
    engine
        .create(&EventDraft::timed(
            "Standup",
            at(2025, 1, 1, 10, 0),
            at(2025, 1, 1, 11, 0),
        ))
        .expect("first create");

    let err = engine
        .create(&EventDraft::timed(
            "STANDUP",
            at(2025, 1, 1, 10, 0),
            at(2025, 1, 1, 11, 0),
        ))
        .expect_err("case-folded duplicate");
    assert!(matches!(err, CoreError::Conflict { .. }));
}

#[test_log::test]
fn conflicting_patch_leaves_the_event_untouched() {
    let engine = CalendarEngine::default();
    engine
        .create(&EventDraft::timed(
            "A",
            at(2025, 1, 1, 10, 0),
            at(2025, 1, 1, 11, 0),
        ))
        .expect("first");
    engine
        .create(&EventDraft::timed(
            "B",
            at(2025, 1, 1, 10, 0),
            at(2025, 1, 1, 11, 0),
        ))
        .expect("second");

    // Renaming B to A would collide with A's derived key.
    let err = engine
        .update(
            &EventSelector::new("B", at(2025, 1, 1, 10, 0)),
            &EventPatch::rename("A"),
            EditScope::Single,
        )
        .expect_err("key collision");
    assert!(matches!(err, CoreError::Conflict { .. }));

    // B survives unchanged and both events are still live.
    let b = engine
        .resolve(&EventSelector::new("B", at(2025, 1, 1, 10, 0)))
        .expect("B still resolvable");
    assert_eq!(b.subject(), "B");
    assert_eq!(engine.all_events().len(), 2);
}

#[test_log::test]
fn patch_that_keeps_the_key_is_not_a_self_conflict() {
    let engine = CalendarEngine::default();
    engine
        .create(&EventDraft::timed(
            "A",
            at(2025, 1, 1, 10, 0),
            at(2025, 1, 1, 11, 0),
        ))
        .expect("create");

    // Same subject/start/end; only the description changes.
    engine
        .update(
            &EventSelector::new("A", at(2025, 1, 1, 10, 0)),
            &EventPatch::default().with_description("notes"),
            EditScope::Single,
        )
        .expect("no-op key swap");
    assert_eq!(
        engine
            .resolve(&EventSelector::new("A", at(2025, 1, 1, 10, 0)))
            .expect("still live")
            .description(),
        Some("notes")
    );
}

#[test_log::test]
fn freed_slot_can_be_reused_after_an_edit() {
    let engine = CalendarEngine::default();
    engine
        .create(&EventDraft::timed(
            "A",
            at(2025, 1, 1, 10, 0),
            at(2025, 1, 1, 11, 0),
        ))
        .expect("create");

    engine
        .update(
            &EventSelector::new("A", at(2025, 1, 1, 10, 0)),
            &EventPatch::move_start(at(2025, 1, 1, 12, 0)).with_end(at(2025, 1, 1, 13, 0)),
            EditScope::Single,
        )
        .expect("move away");

    // The old triple is free again.
    engine
        .create(&EventDraft::timed(
            "A",
            at(2025, 1, 1, 10, 0),
            at(2025, 1, 1, 11, 0),
        ))
        .expect("slot was vacated");
    assert_eq!(engine.all_events().len(), 2);
}

#[test_log::test]
fn blank_subject_is_rejected() {
    let engine = CalendarEngine::default();
    let err = engine
        .create(&EventDraft::timed(
            "   ",
            at(2025, 1, 1, 10, 0),
            at(2025, 1, 1, 11, 0),
        ))
        .expect_err("blank subject");
    assert!(matches!(err, CoreError::ValidationError(_)));
}

#[test_log::test]
fn end_must_be_strictly_after_start() {
    let engine = CalendarEngine::default();
    let err = engine
        .create(&EventDraft::timed(
            "A",
            at(2025, 1, 1, 11, 0),
            at(2025, 1, 1, 11, 0),
        ))
        .expect_err("zero-length event");
    assert!(matches!(err, CoreError::ValidationError(_)));
}
