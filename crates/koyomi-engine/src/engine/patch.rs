//! Patch application: merge, rebuild under the same identifier, and swap
//! table entry and uniqueness key as one transaction.

use koyomi_core::error::{CoreError, CoreResult};
use koyomi_core::types::EventId;

use crate::model::draft::EventPatch;
use crate::model::event::Event;

use super::EngineState;

/// ## Summary
/// Applies a patch to one event: present fields merge over current values,
/// the result is rebuilt through the validating constructor with the same
/// identifier, and the uniqueness key swap and table swap succeed together
/// or not at all.
///
/// ## Errors
/// `UnknownEvent` if the id is not live, `ValidationError` if the merged
/// event is invalid, `Conflict` if its new key is already taken — in every
/// failure case the table and index are left untouched.
pub(crate) fn apply(state: &mut EngineState, id: EventId, patch: &EventPatch) -> CoreResult<()> {
    let current = state.events.get(&id).ok_or(CoreError::UnknownEvent(id))?;

    let updated = Event::new(
        id,
        patch
            .subject
            .clone()
            .unwrap_or_else(|| current.subject().to_owned()),
        patch.start.unwrap_or(current.start()),
        patch.end.unwrap_or(current.end()),
        patch
            .description
            .clone()
            .or_else(|| current.description().map(ToOwned::to_owned)),
        patch
            .location
            .clone()
            .or_else(|| current.location().map(ToOwned::to_owned)),
        patch.visibility.unwrap_or(current.visibility()),
    )?;

    let old_key = current.key();
    state.uniqueness.replace(&old_key, updated.key())?;
    tracing::trace!(%id, subject = %updated.subject(), start = %updated.start(), "patched event");
    state.events.insert(id, updated);
    Ok(())
}

/// ## Summary
/// Rewrites a patch for one member of a multi-event scope.
///
/// A new start or end lands as a time-of-day on the member's own date rather
/// than as an absolute instant, and a start change without an explicit end
/// shifts the member's end by the same delta, preserving its duration.
#[must_use]
pub(crate) fn materialize(patch: &EventPatch, member: &Event) -> EventPatch {
    let date = member.start().date();
    let mut derived = patch.clone();

    if let Some(new_start) = patch.start {
        let start = date.and_time(new_start.time());
        derived.start = Some(start);
        if patch.end.is_none() {
            derived.end = Some(member.end() + (start - member.start()));
        }
    }
    if let Some(new_end) = patch.end {
        derived.end = Some(date.and_time(new_end.time()));
    }

    derived
}
