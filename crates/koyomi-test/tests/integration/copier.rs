//! Cross-calendar copying between differently zoned calendars.

use chrono_tz::America::New_York;
use chrono_tz::Asia::Tokyo;
use chrono_tz::Europe::Paris;

use koyomi_test::engine::copy::convert_wall_clock;
use koyomi_test::engine::{CalendarCopier, CalendarEngine, Event, EventDraft};

use super::helpers::*;

#[test_log::test]
fn copy_event_uses_the_target_start_verbatim() {
    let new_york = CalendarEngine::default();
    let paris = CalendarEngine::default();
    new_york
        .create(
            &EventDraft::timed("Planning", at(2025, 5, 5, 10, 0), at(2025, 5, 5, 11, 0))
                .with_location("NYC office"),
        )
        .expect("source event");

    let copier = CalendarCopier::new(&new_york, New_York, &paris, Paris);
    let id = copier
        .copy_event("Planning", at(2025, 5, 5, 10, 0), at(2025, 5, 5, 11, 0))
        .expect("copy");

    // The caller-supplied start is target-local already: 11:00-12:00 Paris
    // time, duration preserved, no reconversion of the source wall clock.
    let copied = paris.event(id).expect("copied event");
    assert_eq!(copied.start(), at(2025, 5, 5, 11, 0));
    assert_eq!(copied.end(), at(2025, 5, 5, 12, 0));
    assert_eq!(copied.location(), Some("NYC office"));
}

#[test_log::test]
fn copy_event_on_missing_source_is_not_found() {
    let new_york = CalendarEngine::default();
    let paris = CalendarEngine::default();
    let copier = CalendarCopier::new(&new_york, New_York, &paris, Paris);

    let err = copier
        .copy_event("Planning", at(2025, 5, 5, 10, 0), at(2025, 5, 5, 11, 0))
        .expect_err("nothing to copy");
    assert!(matches!(err, CoreError::NotFound { .. }));
}

#[test_log::test]
fn copy_events_on_converts_zone_and_shifts_days() {
    let new_york = CalendarEngine::default();
    let tokyo = CalendarEngine::default();
    new_york
        .create(&EventDraft::timed(
            "Sync",
            at(2025, 5, 5, 10, 0),
            at(2025, 5, 5, 11, 0),
        ))
        .expect("source event");

    let copier = CalendarCopier::new(&new_york, New_York, &tokyo, Tokyo);
    let report = copier
        .copy_events_on(date(2025, 5, 5), date(2025, 5, 12))
        .expect("batch copy");
    assert_eq!(report.copied.len(), 1);
    assert!(report.failed.is_empty());

    // 10:00 EDT is 23:00 the same day in Tokyo; plus the one-week offset.
    let copied = tokyo.event(report.copied[0]).expect("copied event");
    assert_eq!(copied.start(), at(2025, 5, 12, 23, 0));
    assert_eq!(copied.end(), at(2025, 5, 13, 0, 0));
}

#[test_log::test]
fn copied_timestamp_converts_back_to_the_source_instant() {
    let new_york = CalendarEngine::default();
    let tokyo = CalendarEngine::default();
    let source_start = at(2025, 5, 5, 10, 0);
    new_york
        .create(&EventDraft::timed(
            "Sync",
            source_start,
            at(2025, 5, 5, 11, 0),
        ))
        .expect("source event");

    let copier = CalendarCopier::new(&new_york, New_York, &tokyo, Tokyo);
    let report = copier
        .copy_events_on(date(2025, 5, 5), date(2025, 5, 5))
        .expect("same-day copy");
    let copied = tokyo.event(report.copied[0]).expect("copied event");

    let back = convert_wall_clock(copied.start(), Tokyo, New_York).expect("convert back");
    assert_eq!(back, source_start);
}

#[test_log::test]
fn conflicting_member_is_skipped_without_aborting_the_batch() {
    let new_york = CalendarEngine::default();
    let tokyo = CalendarEngine::default();
    for (subject, start_h) in [("Sync", 9), ("Retro", 11)] {
        new_york
            .create(&EventDraft::timed(
                subject,
                at(2025, 5, 5, start_h, 0),
                at(2025, 5, 5, start_h + 1, 0),
            ))
            .expect("source event");
    }
    // Occupy the slot "Sync" would land in: 09:00 EDT -> 22:00 Tokyo.
    tokyo
        .create(&EventDraft::timed(
            "Sync",
            at(2025, 5, 5, 22, 0),
            at(2025, 5, 5, 23, 0),
        ))
        .expect("pre-existing target event");

    let copier = CalendarCopier::new(&new_york, New_York, &tokyo, Tokyo);
    let report = copier
        .copy_events_on(date(2025, 5, 5), date(2025, 5, 5))
        .expect("batch copy");

    assert_eq!(report.copied.len(), 1);
    assert_eq!(report.failed.len(), 1);
    // The failure names the offending subject.
    assert!(matches!(
        &report.failed[0],
        CoreError::Conflict { subject, .. } if subject == "sync"
    ));
    assert_eq!(
        tokyo.event(report.copied[0]).expect("copied event").subject(),
        "Retro"
    );
}

#[test_log::test]
fn copy_events_between_anchors_the_first_day() {
    let new_york = CalendarEngine::default();
    let paris = CalendarEngine::default();
    for day in [5, 6] {
        new_york
            .create(&EventDraft::timed(
                "Workshop",
                at(2025, 5, day, 9, 0),
                at(2025, 5, day, 12, 0),
            ))
            .expect("source event");
    }

    let copier = CalendarCopier::new(&new_york, New_York, &paris, Paris);
    let report = copier
        .copy_events_between(date(2025, 5, 5), date(2025, 5, 6), date(2025, 6, 2))
        .expect("range copy");
    assert_eq!(report.copied.len(), 2);

    // 09:00 EDT is 15:00 Paris; the 28-day offset lands the pair on
    // June 2 and June 3.
    let starts: Vec<_> = paris.all_events().iter().map(Event::start).collect();
    assert_eq!(starts, [at(2025, 6, 2, 15, 0), at(2025, 6, 3, 15, 0)]);
}

#[test_log::test]
fn inverted_range_is_rejected() {
    let new_york = CalendarEngine::default();
    let paris = CalendarEngine::default();
    let copier = CalendarCopier::new(&new_york, New_York, &paris, Paris);

    let err = copier
        .copy_events_between(date(2025, 5, 6), date(2025, 5, 5), date(2025, 6, 2))
        .expect_err("range ends before it starts");
    assert!(matches!(err, CoreError::ValidationError(_)));
}
