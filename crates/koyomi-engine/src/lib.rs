//! In-memory calendar engine: discrete and recurring events, uniqueness and
//! validity invariants, three-tier edit scopes, and timezone-aware copying
//! between calendars.

pub mod copy;
pub mod engine;
pub mod index;
pub mod model;

pub use copy::{CalendarCopier, CopyReport};
pub use engine::CalendarEngine;
pub use model::draft::{
    DraftWhen, EditScope, EventDraft, EventPatch, EventSelector, SeriesDraft, SeriesWindow,
};
pub use model::event::Event;
pub use model::recurrence::{RecurrenceEnd, RecurrenceRule};
