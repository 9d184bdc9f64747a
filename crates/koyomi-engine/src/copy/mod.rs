//! Cross-calendar copying with wall-clock conversion between named zones.

use chrono::{LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone};
use chrono_tz::Tz;

use koyomi_core::error::{CoreError, CoreResult};
use koyomi_core::types::EventId;

use crate::engine::CalendarEngine;
use crate::model::draft::{EventDraft, EventSelector};
use crate::model::event::Event;

/// Copies events between two calendar engines, converting timestamps across
/// the calendars' named zones.
///
/// No cross-engine lock is taken: the source read and the target creates are
/// each atomic under their own engine's lock, but not jointly.
pub struct CalendarCopier<'a> {
    source: &'a CalendarEngine,
    source_zone: Tz,
    target: &'a CalendarEngine,
    target_zone: Tz,
}

/// Outcome of a batch copy: per-event failures do not abort the batch.
#[derive(Debug, Default)]
pub struct CopyReport {
    pub copied: Vec<EventId>,
    pub failed: Vec<CoreError>,
}

impl<'a> CalendarCopier<'a> {
    #[must_use]
    pub fn new(
        source: &'a CalendarEngine,
        source_zone: Tz,
        target: &'a CalendarEngine,
        target_zone: Tz,
    ) -> Self {
        Self {
            source,
            source_zone,
            target,
            target_zone,
        }
    }

    /// ## Summary
    /// Copies one event, placed at an explicit target start.
    ///
    /// The source event is resolved by (subject, start); the caller-supplied
    /// `target_start` is used directly as the new start — it is already a
    /// target-local wall-clock value, so no zone conversion is applied — and
    /// the end preserves the source duration.
    ///
    /// ## Errors
    /// `NotFound`/`AmbiguousSelection` from source resolution, and the target
    /// engine's normal creation errors (`Conflict`, `ValidationError`).
    pub fn copy_event(
        &self,
        subject: &str,
        source_start: NaiveDateTime,
        target_start: NaiveDateTime,
    ) -> CoreResult<EventId> {
        let source_event = self
            .source
            .resolve(&EventSelector::new(subject, source_start))?;
        let end = target_start + source_event.duration();
        tracing::debug!(
            subject = %source_event.subject(),
            %target_start,
            "copying event to explicit target start"
        );
        self.target.create(&replay_draft(&source_event, target_start, end))
    }

    /// ## Summary
    /// Copies every source event on `source_date` onto `target_date`.
    ///
    /// Timestamps are re-read in the target zone (same instant, new
    /// wall-clock) and shifted by the whole-day offset between the two
    /// anchor dates. A failing event is recorded in the report and skipped.
    ///
    /// ## Errors
    /// Only conversion-independent failures abort the whole batch; none
    /// currently do, so the result is always `Ok` with a report.
    pub fn copy_events_on(
        &self,
        source_date: NaiveDate,
        target_date: NaiveDate,
    ) -> CoreResult<CopyReport> {
        let events = self.source.events_on(source_date);
        let offset = target_date.signed_duration_since(source_date);
        Ok(self.replay(events, offset))
    }

    /// ## Summary
    /// Copies every source event overlapping the inclusive date range
    /// `from..=to`, anchoring the range's first day onto `target_anchor`.
    ///
    /// ## Errors
    /// `ValidationError` if `to` precedes `from`.
    pub fn copy_events_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        target_anchor: NaiveDate,
    ) -> CoreResult<CopyReport> {
        if to < from {
            return Err(CoreError::ValidationError(format!(
                "date range must not end before it starts ({from}..{to})"
            )));
        }
        let window_start = from.and_time(NaiveTime::MIN);
        let window_end = to
            .succ_opt()
            .map_or(NaiveDateTime::MAX, |next| next.and_time(NaiveTime::MIN));
        let events = self.source.events_overlapping(window_start, window_end)?;
        let offset = target_anchor.signed_duration_since(from);
        Ok(self.replay(events, offset))
    }

    fn replay(&self, events: Vec<Event>, day_offset: TimeDelta) -> CopyReport {
        let mut report = CopyReport::default();
        for event in events {
            match self.replay_one(&event, day_offset) {
                Ok(id) => report.copied.push(id),
                Err(err) => {
                    tracing::debug!(subject = %event.subject(), %err, "skipping event copy");
                    report.failed.push(err);
                }
            }
        }
        report
    }

    fn replay_one(&self, event: &Event, day_offset: TimeDelta) -> CoreResult<EventId> {
        let start =
            convert_wall_clock(event.start(), self.source_zone, self.target_zone)? + day_offset;
        let end = convert_wall_clock(event.end(), self.source_zone, self.target_zone)? + day_offset;
        self.target.create(&replay_draft(event, start, end))
    }
}

fn replay_draft(event: &Event, start: NaiveDateTime, end: NaiveDateTime) -> EventDraft {
    let mut draft =
        EventDraft::timed(event.subject(), start, end).with_visibility(event.visibility());
    draft.description = event.description().map(ToOwned::to_owned);
    draft.location = event.location().map(ToOwned::to_owned);
    draft
}

/// ## Summary
/// Re-reads a wall-clock value from one named zone in another: the same
/// absolute instant, expressed in the target zone's local time.
///
/// A DST fold resolves to the earliest occurrence.
///
/// ## Errors
/// `ValidationError` if the value falls in a DST gap and does not exist in
/// the source zone.
pub fn convert_wall_clock(local: NaiveDateTime, from: Tz, to: Tz) -> CoreResult<NaiveDateTime> {
    match from.from_local_datetime(&local) {
        LocalResult::None => Err(CoreError::ValidationError(format!(
            "{local} does not exist in {from} (DST gap)"
        ))),
        LocalResult::Single(instant) => Ok(instant.with_timezone(&to).naive_local()),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&to).naive_local()),
    }
}
