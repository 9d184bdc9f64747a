//! Selector resolution against the live event table.

use std::collections::HashMap;

use koyomi_core::error::{CoreError, CoreResult};
use koyomi_core::types::EventId;

use crate::model::draft::EventSelector;
use crate::model::event::Event;

/// ## Summary
/// Finds the single live event a selector names.
///
/// With an end instant the match is exact on (subject-ci, start, end); without
/// one it is on (subject-ci, start), and several candidates mean the caller
/// must disambiguate by supplying the end.
///
/// ## Errors
/// `NotFound` on zero matches; `AmbiguousSelection` when an end-less selector
/// matches more than one event.
pub(crate) fn resolve(
    events: &HashMap<EventId, Event>,
    selector: &EventSelector,
) -> CoreResult<EventId> {
    let subject = selector.subject.to_lowercase();
    let matches: Vec<&Event> = events
        .values()
        .filter(|event| {
            event.subject().to_lowercase() == subject
                && event.start() == selector.start
                && selector.end.is_none_or(|end| event.end() == end)
        })
        .collect();

    match matches.as_slice() {
        [] => Err(CoreError::NotFound {
            subject: selector.subject.clone(),
            start: selector.start,
            end: selector.end,
        }),
        [event] => Ok(event.id()),
        _ if selector.end.is_none() => Err(CoreError::AmbiguousSelection {
            subject: selector.subject.clone(),
            start: selector.start,
        }),
        // Several live events sharing an exact (subject, start, end) triple
        // would mean the uniqueness index has been bypassed.
        _ => Err(CoreError::InvariantViolation(
            "duplicate derived keys in the live event table",
        )),
    }
}
