//! Weekday-set recurrence rules and their expansion into concrete dates.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::num::NonZeroU32;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use koyomi_core::error::{CoreError, CoreResult};

/// Termination of a recurrence: a fixed occurrence count or an inclusive
/// final date, never both and never neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceEnd {
    Count(NonZeroU32),
    Until(NaiveDate),
}

/// Immutable recurrence rule: a non-empty weekday set plus a termination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    weekdays: Vec<Weekday>,
    end: RecurrenceEnd,
}

impl RecurrenceRule {
    /// ## Summary
    /// Builds a rule from a weekday set (deduplicated, kept in Monday-first
    /// order) and a termination.
    ///
    /// ## Errors
    /// Returns `ValidationError` if the weekday set is empty.
    pub fn new(
        weekdays: impl IntoIterator<Item = Weekday>,
        end: RecurrenceEnd,
    ) -> CoreResult<Self> {
        let mut days: Vec<Weekday> = weekdays.into_iter().collect();
        days.sort_by_key(|day| day.num_days_from_monday());
        days.dedup();
        if days.is_empty() {
            return Err(CoreError::ValidationError(
                "recurrence rule needs at least one weekday".to_string(),
            ));
        }

        Ok(Self { weekdays: days, end })
    }

    #[must_use]
    pub fn weekdays(&self) -> &[Weekday] {
        &self.weekdays
    }

    #[must_use]
    pub fn end(&self) -> RecurrenceEnd {
        self.end
    }

    /// ## Summary
    /// Expands the rule into the ordered list of concrete dates on or after
    /// `start`.
    ///
    /// The count branch is a multi-way merge across the wanted weekdays'
    /// occurrence streams; the until branch is an inclusive day-by-day scan.
    /// For the same effective parameters both produce the same dates.
    ///
    /// ## Errors
    /// Returns `InvariantViolation` if the merge frontier is ever empty
    /// (unreachable past the constructor's non-empty check).
    pub fn expand(&self, start: NaiveDate) -> CoreResult<Vec<NaiveDate>> {
        match self.end {
            RecurrenceEnd::Count(count) => self.expand_counted(start, count.get()),
            RecurrenceEnd::Until(until) => Ok(self.expand_until(start, until)),
        }
    }

    fn expand_counted(&self, start: NaiveDate, count: u32) -> CoreResult<Vec<NaiveDate>> {
        // One pending occurrence per wanted weekday; drawing the earliest and
        // re-arming it a week later yields dates in ascending order.
        let mut frontier: BinaryHeap<Reverse<NaiveDate>> = self
            .weekdays
            .iter()
            .map(|&day| Reverse(first_on_or_after(start, day)))
            .collect();

        let mut dates = Vec::new();
        for _ in 0..count {
            let Some(Reverse(next)) = frontier.pop() else {
                return Err(CoreError::InvariantViolation(
                    "recurrence merge frontier is empty",
                ));
            };
            frontier.push(Reverse(next + Days::new(7)));
            dates.push(next);
        }

        Ok(dates)
    }

    fn expand_until(&self, start: NaiveDate, until: NaiveDate) -> Vec<NaiveDate> {
        let mut dates = Vec::new();
        let mut day = start;
        while day <= until {
            if self.weekdays.contains(&day.weekday()) {
                dates.push(day);
            }
            let Some(next) = day.succ_opt() else { break };
            day = next;
        }
        dates
    }
}

/// First occurrence of `day` on or after `start`.
fn first_on_or_after(start: NaiveDate, day: Weekday) -> NaiveDate {
    let ahead =
        (7 + day.num_days_from_monday() - start.weekday().num_days_from_monday()) % 7;
    start + Days::new(u64::from(ahead))
}
