#![allow(dead_code, clippy::expect_used, clippy::unwrap_used)]
//! Test helpers for integration tests: compact date/time constructors and
//! pre-built engine fixtures.

use std::num::NonZeroU32;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};

use koyomi_test::engine::{CalendarEngine, RecurrenceEnd, RecurrenceRule, SeriesDraft};

pub use koyomi_test::core::error::CoreError;
pub use koyomi_test::core::types::{Availability, SeriesToken};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).expect("valid test time")
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    date(y, m, d).and_time(time(h, min))
}

pub fn weekdays_rule(days: impl IntoIterator<Item = Weekday>, count: u32) -> RecurrenceRule {
    RecurrenceRule::new(
        days,
        RecurrenceEnd::Count(NonZeroU32::new(count).expect("non-zero count")),
    )
    .expect("valid test rule")
}

/// "Standup" on Mon/Wed 10:00-10:15, three occurrences from Monday
/// 2025-05-05: events on 05-05, 05-07, and 05-12.
pub fn standup_fixture() -> (CalendarEngine, SeriesToken) {
    let engine = CalendarEngine::default();
    let token = engine
        .create_series(&SeriesDraft::timed(
            "Standup",
            date(2025, 5, 5),
            time(10, 0),
            time(10, 15),
            weekdays_rule([Weekday::Mon, Weekday::Wed], 3),
        ))
        .expect("fixture series");
    (engine, token)
}
