//! Boundary types consumed by the engine: drafts, selectors, patches, and
//! edit scopes.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use koyomi_core::types::Visibility;

use super::recurrence::RecurrenceRule;

/// Placement of a drafted event: a date-only day or a concrete start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftWhen {
    /// A date-only event, concretized through the policy's all-day window.
    AllDay(NaiveDate),
    /// A concrete start. An omitted end turns the draft into an all-day
    /// window on the start's date.
    Timed {
        start: NaiveDateTime,
        end: Option<NaiveDateTime>,
    },
}

/// Input to [`crate::CalendarEngine::create`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    pub subject: String,
    pub when: DraftWhen,
    pub description: Option<String>,
    pub location: Option<String>,
    /// Falls back to the policy default when unset.
    pub visibility: Option<Visibility>,
}

impl EventDraft {
    #[must_use]
    pub fn timed(subject: impl Into<String>, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            subject: subject.into(),
            when: DraftWhen::Timed {
                start,
                end: Some(end),
            },
            description: None,
            location: None,
            visibility: None,
        }
    }

    /// A start with no end; normalization widens it to the all-day window.
    #[must_use]
    pub fn open_ended(subject: impl Into<String>, start: NaiveDateTime) -> Self {
        Self {
            subject: subject.into(),
            when: DraftWhen::Timed { start, end: None },
            description: None,
            location: None,
            visibility: None,
        }
    }

    #[must_use]
    pub fn all_day(subject: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            subject: subject.into(),
            when: DraftWhen::AllDay(date),
            description: None,
            location: None,
            visibility: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    #[must_use]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = Some(visibility);
        self
    }
}

/// Time-of-day template shared by every expanded occurrence of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesWindow {
    /// Every occurrence spans the policy's all-day window.
    AllDay,
    /// Every occurrence spans `start_time..end_time` on its own date.
    Timed {
        start_time: NaiveTime,
        end_time: NaiveTime,
    },
}

/// Input to [`crate::CalendarEngine::create_series`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesDraft {
    pub subject: String,
    pub start_date: NaiveDate,
    pub window: SeriesWindow,
    pub rule: RecurrenceRule,
    pub description: Option<String>,
    pub location: Option<String>,
    pub visibility: Option<Visibility>,
}

impl SeriesDraft {
    #[must_use]
    pub fn timed(
        subject: impl Into<String>,
        start_date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
        rule: RecurrenceRule,
    ) -> Self {
        Self {
            subject: subject.into(),
            start_date,
            window: SeriesWindow::Timed {
                start_time,
                end_time,
            },
            rule,
            description: None,
            location: None,
            visibility: None,
        }
    }

    #[must_use]
    pub fn all_day(subject: impl Into<String>, start_date: NaiveDate, rule: RecurrenceRule) -> Self {
        Self {
            subject: subject.into(),
            start_date,
            window: SeriesWindow::AllDay,
            rule,
            description: None,
            location: None,
            visibility: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    #[must_use]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = Some(visibility);
        self
    }
}

/// Pinpoints the event(s) an edit targets.
///
/// With `end` the match is exact; without it, a subject + start pair must
/// resolve to exactly one live event or the selection is ambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSelector {
    pub subject: String,
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
}

impl EventSelector {
    #[must_use]
    pub fn new(subject: impl Into<String>, start: NaiveDateTime) -> Self {
        Self {
            subject: subject.into(),
            start,
            end: None,
        }
    }

    #[must_use]
    pub fn with_end(mut self, end: NaiveDateTime) -> Self {
        self.end = Some(end);
        self
    }
}

/// Partial update; absent fields leave the current value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPatch {
    pub subject: Option<String>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub visibility: Option<Visibility>,
}

impl EventPatch {
    #[must_use]
    pub fn rename(subject: impl Into<String>) -> Self {
        Self {
            subject: Some(subject.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn move_start(start: NaiveDateTime) -> Self {
        Self {
            start: Some(start),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_end(mut self, end: NaiveDateTime) -> Self {
        self.end = Some(end);
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    #[must_use]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = Some(visibility);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subject.is_none()
            && self.start.is_none()
            && self.end.is_none()
            && self.description.is_none()
            && self.location.is_none()
            && self.visibility.is_none()
    }

    /// True if applying this patch moves the target's start instant.
    #[must_use]
    pub fn changes_start(&self) -> bool {
        self.start.is_some()
    }
}

/// How far an edit reaches when its anchor belongs to a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditScope {
    /// Only the anchor event.
    Single,
    /// The anchor and every later member of its series.
    Following,
    /// Every member of the series.
    EntireSeries,
}
