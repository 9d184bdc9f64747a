//! The calendar engine: owns the authoritative event table and both indices,
//! and keeps them consistent under one coarse per-engine lock.

mod patch;
mod resolve;

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use koyomi_core::config::CalendarPolicy;
use koyomi_core::error::{CoreError, CoreResult};
use koyomi_core::types::{Availability, EventId, SeriesToken};

use crate::index::series::SeriesIndex;
use crate::index::uniqueness::UniquenessIndex;
use crate::model::draft::{
    DraftWhen, EditScope, EventDraft, EventPatch, EventSelector, SeriesDraft, SeriesWindow,
};
use crate::model::event::Event;

/// Table and indices, mutated only as a unit.
#[derive(Debug, Default)]
pub(crate) struct EngineState {
    pub(crate) events: HashMap<EventId, Event>,
    pub(crate) uniqueness: UniquenessIndex,
    pub(crate) series: SeriesIndex,
}

/// In-memory calendar engine.
///
/// Every public operation, reads included, runs under the engine's single
/// mutual-exclusion boundary; no operation blocks indefinitely and none are
/// asynchronous.
#[derive(Debug, Default)]
pub struct CalendarEngine {
    policy: CalendarPolicy,
    inner: Mutex<EngineState>,
}

impl CalendarEngine {
    #[must_use]
    pub fn new(policy: CalendarPolicy) -> Self {
        Self {
            policy,
            inner: Mutex::new(EngineState::default()),
        }
    }

    #[must_use]
    pub fn policy(&self) -> &CalendarPolicy {
        &self.policy
    }

    /// Mutating sequences never unwind between state writes, so a poisoned
    /// lock still guards a consistent state and is safe to re-enter.
    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// ## Summary
    /// Creates one event from a draft: normalizes it into concrete start/end
    /// instants, validates, registers the uniqueness key, and stores it.
    ///
    /// ## Errors
    /// `ValidationError` for a blank subject or an end not after the start,
    /// `Conflict` if an event with the same derived key is already live.
    pub fn create(&self, draft: &EventDraft) -> CoreResult<EventId> {
        let (start, end) = self.normalize(draft.when);
        let event = Event::new(
            EventId::new(),
            draft.subject.clone(),
            start,
            end,
            draft.description.clone(),
            draft.location.clone(),
            draft.visibility.unwrap_or(self.policy.default_visibility),
        )?;

        let mut state = self.lock();
        state.uniqueness.add(event.key())?;
        let id = event.id();
        tracing::debug!(%id, subject = %event.subject(), start = %event.start(), "created event");
        state.events.insert(id, event);
        Ok(id)
    }

    /// ## Summary
    /// Creates a recurring block: prechecks the draft, expands the rule into
    /// dates, builds one event per date from the shared time-of-day template,
    /// and registers series membership over all created ids.
    ///
    /// Creation is all-or-nothing: every expanded date is checked against
    /// the uniqueness index before anything is inserted, so a conflicting
    /// date leaves no partial series behind.
    ///
    /// ## Errors
    /// `ValidationError` for a blank subject, an inverted timed window, or a
    /// malformed rule; `Conflict` naming the first conflicting occurrence.
    pub fn create_series(&self, draft: &SeriesDraft) -> CoreResult<SeriesToken> {
        if draft.subject.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "subject must not be blank".to_string(),
            ));
        }
        let (start_time, end_time) = match draft.window {
            SeriesWindow::AllDay => (self.policy.all_day_start, self.policy.all_day_end),
            SeriesWindow::Timed {
                start_time,
                end_time,
            } => {
                if end_time <= start_time {
                    return Err(CoreError::ValidationError(format!(
                        "series window must end after it starts ({start_time}..{end_time})"
                    )));
                }
                (start_time, end_time)
            }
        };

        let dates = draft.rule.expand(draft.start_date)?;
        let visibility = draft.visibility.unwrap_or(self.policy.default_visibility);
        let mut events = Vec::with_capacity(dates.len());
        for date in dates {
            events.push(Event::new(
                EventId::new(),
                draft.subject.clone(),
                date.and_time(start_time),
                date.and_time(end_time),
                draft.description.clone(),
                draft.location.clone(),
                visibility,
            )?);
        }

        let mut state = self.lock();
        for event in &events {
            if state.uniqueness.contains(&event.key()) {
                return Err(CoreError::Conflict {
                    subject: event.subject().to_owned(),
                    start: event.start(),
                    end: event.end(),
                });
            }
        }
        let mut ids = Vec::with_capacity(events.len());
        for event in events {
            state.uniqueness.add(event.key())?;
            ids.push(event.id());
            state.events.insert(event.id(), event);
        }
        let token = state.series.register(ids);
        tracing::debug!(%token, subject = %draft.subject, "created series");
        Ok(token)
    }

    /// ## Summary
    /// Resolves a selector to an anchor event and applies a patch at the
    /// requested scope.
    ///
    /// An anchor outside any series forces Single. A Single edit that moves
    /// the start detaches the anchor from its series first. A Following edit
    /// that moves the start splits the series at the anchor's start and
    /// patches the new tail series; without a start change it patches the
    /// members at or after the anchor in place. `EntireSeries` patches every
    /// member. Across multiple members, start/end changes land as
    /// time-of-day on each member's own date, preserving durations when no
    /// explicit end is given.
    ///
    /// ## Errors
    /// Resolution errors (`NotFound`, `AmbiguousSelection`) and per-event
    /// application errors (`ValidationError`, `Conflict`). A failure while
    /// patching a multi-event scope aborts the remaining members; already
    /// patched members keep their new values.
    pub fn update(
        &self,
        selector: &EventSelector,
        patch: &EventPatch,
        scope: EditScope,
    ) -> CoreResult<()> {
        let mut guard = self.lock();
        let state = &mut *guard;

        let anchor_id = resolve::resolve(&state.events, selector)?;
        let anchor_start = state
            .events
            .get(&anchor_id)
            .ok_or(CoreError::UnknownEvent(anchor_id))?
            .start();

        let Some(token) = state.series.series_of(anchor_id) else {
            // Not part of a series: every scope behaves as Single.
            return patch::apply(state, anchor_id, patch);
        };

        match scope {
            EditScope::Single => {
                if patch.changes_start() {
                    state.series.detach(anchor_id);
                }
                patch::apply(state, anchor_id, patch)
            }
            EditScope::Following => {
                let EngineState { events, series, .. } = &mut *state;
                let member_ids = if patch.changes_start() {
                    let tail = series.split_following(token, anchor_start, |id| {
                        events.get(&id).map(Event::start)
                    });
                    series.members(tail)
                } else {
                    series.following(token, anchor_start, |id| events.get(&id).map(Event::start))
                };
                apply_to_members(state, &member_ids, patch)
            }
            EditScope::EntireSeries => {
                let member_ids = state.series.members(token);
                apply_to_members(state, &member_ids, patch)
            }
        }
    }

    /// Events overlapping the civil day `date`, sorted by start.
    #[must_use]
    pub fn events_on(&self, date: NaiveDate) -> Vec<Event> {
        let from = date.and_time(NaiveTime::MIN);
        let to = date
            .succ_opt()
            .map_or(NaiveDateTime::MAX, |next| next.and_time(NaiveTime::MIN));
        self.collect_overlapping(from, to)
    }

    /// ## Summary
    /// Events whose `[start, end)` overlaps the half-open `[from, to)`,
    /// sorted by start.
    ///
    /// ## Errors
    /// `ValidationError` if `to` is not after `from`.
    pub fn events_overlapping(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> CoreResult<Vec<Event>> {
        if to <= from {
            return Err(CoreError::ValidationError(format!(
                "query range must end after it starts ({from}..{to})"
            )));
        }
        Ok(self.collect_overlapping(from, to))
    }

    /// Busy iff some event's `[start, end)` contains the instant.
    #[must_use]
    pub fn status_at(&self, instant: NaiveDateTime) -> Availability {
        let state = self.lock();
        if state.events.values().any(|event| event.contains(instant)) {
            Availability::Busy
        } else {
            Availability::Available
        }
    }

    /// Snapshot of one event by id.
    #[must_use]
    pub fn event(&self, id: EventId) -> Option<Event> {
        self.lock().events.get(&id).cloned()
    }

    /// ## Summary
    /// Snapshot of the single event a selector names.
    ///
    /// ## Errors
    /// Same as selector resolution: `NotFound` or `AmbiguousSelection`.
    pub fn resolve(&self, selector: &EventSelector) -> CoreResult<Event> {
        let state = self.lock();
        let id = resolve::resolve(&state.events, selector)?;
        state
            .events
            .get(&id)
            .cloned()
            .ok_or(CoreError::UnknownEvent(id))
    }

    /// The series an event belongs to, if any.
    #[must_use]
    pub fn series_of(&self, id: EventId) -> Option<SeriesToken> {
        self.lock().series.series_of(id)
    }

    /// Full snapshot, sorted by start ascending.
    #[must_use]
    pub fn all_events(&self) -> Vec<Event> {
        let state = self.lock();
        let mut events: Vec<Event> = state.events.values().cloned().collect();
        events.sort_by_key(|event| (event.start(), event.end()));
        events
    }

    fn collect_overlapping(&self, from: NaiveDateTime, to: NaiveDateTime) -> Vec<Event> {
        let state = self.lock();
        let mut events: Vec<Event> = state
            .events
            .values()
            .filter(|event| event.overlaps(from, to))
            .cloned()
            .collect();
        events.sort_by_key(|event| (event.start(), event.end()));
        events
    }

    fn normalize(&self, when: DraftWhen) -> (NaiveDateTime, NaiveDateTime) {
        match when {
            DraftWhen::AllDay(date) => self.all_day_window(date),
            DraftWhen::Timed {
                start,
                end: Some(end),
            } => (start, end),
            // A start with no end widens to the all-day window on its date.
            DraftWhen::Timed { start, end: None } => self.all_day_window(start.date()),
        }
    }

    fn all_day_window(&self, date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
        (
            date.and_time(self.policy.all_day_start),
            date.and_time(self.policy.all_day_end),
        )
    }
}

fn apply_to_members(state: &mut EngineState, ids: &[EventId], patch: &EventPatch) -> CoreResult<()> {
    for &id in ids {
        let member = state
            .events
            .get(&id)
            .ok_or(CoreError::UnknownEvent(id))?
            .clone();
        let derived = patch::materialize(patch, &member);
        patch::apply(state, id, &derived)?;
    }
    Ok(())
}
