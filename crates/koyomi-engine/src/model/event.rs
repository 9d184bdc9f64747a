use chrono::{NaiveDateTime, TimeDelta};
use serde::Serialize;

use koyomi_core::error::{CoreError, CoreResult};
use koyomi_core::types::{EventId, Visibility};

use crate::index::uniqueness::EventKey;

/// Immutable calendar event.
///
/// Identity and equality are the identifier alone. "Edits" never mutate a
/// stored value; the engine builds a replacement under the same identifier
/// and swaps it into the table.
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    id: EventId,
    subject: String,
    start: NaiveDateTime,
    end: NaiveDateTime,
    description: Option<String>,
    location: Option<String>,
    visibility: Visibility,
}

impl Event {
    /// ## Summary
    /// Builds a validated event. The engine is the only caller; all creation
    /// paths (drafts, series expansion, patch rebuilds) funnel through here.
    ///
    /// ## Errors
    /// Returns `ValidationError` if the subject is blank or the end is not
    /// strictly after the start.
    pub(crate) fn new(
        id: EventId,
        subject: String,
        start: NaiveDateTime,
        end: NaiveDateTime,
        description: Option<String>,
        location: Option<String>,
        visibility: Visibility,
    ) -> CoreResult<Self> {
        if subject.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "subject must not be blank".to_string(),
            ));
        }
        if end <= start {
            return Err(CoreError::ValidationError(format!(
                "end {end} is not after start {start}"
            )));
        }

        Ok(Self {
            id,
            subject,
            start,
            end,
            description,
            location,
            visibility,
        })
    }

    #[must_use]
    pub fn id(&self) -> EventId {
        self.id
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    #[must_use]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// The uniqueness key derived from this event's live fields.
    #[must_use]
    pub fn key(&self) -> EventKey {
        EventKey::derive(&self.subject, self.start, self.end)
    }

    /// True if `instant` falls inside the half-open `[start, end)` window.
    #[must_use]
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Half-open overlap test of `[start, end)` against `[from, to)`.
    #[must_use]
    pub fn overlaps(&self, from: NaiveDateTime, to: NaiveDateTime) -> bool {
        self.start < to && from < self.end
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Event {}

impl std::hash::Hash for Event {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
