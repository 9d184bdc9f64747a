use chrono::NaiveDateTime;
use thiserror::Error;

use crate::types::EventId;

/// Coarse classification of engine errors, for callers that branch on the
/// failure class rather than the concrete variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or logically inconsistent input.
    Validation,
    /// The operation would produce two live events with the same derived key.
    Conflict,
    /// A selector or lookup key does not resolve to any live entity.
    NotFound,
    /// A selector without an end time resolves to more than one candidate.
    Ambiguous,
}

/// Core error type with minimal dependencies
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Conflict: an event \"{subject}\" from {start} to {end} already exists")]
    Conflict {
        subject: String,
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("Not found: no event \"{subject}\" starting at {start}")]
    NotFound {
        subject: String,
        start: NaiveDateTime,
        end: Option<NaiveDateTime>,
    },

    #[error("Not found: event {0} is not live")]
    UnknownEvent(EventId),

    #[error("Ambiguous selection: more than one event \"{subject}\" starts at {start}")]
    AmbiguousSelection {
        subject: String,
        start: NaiveDateTime,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(&'static str),
}

impl CoreError {
    /// ## Summary
    /// Maps the concrete variant onto the caller-facing [`ErrorKind`].
    ///
    /// Ambiguous selection signals insufficient specificity from the caller,
    /// so it sits beside the validation class but keeps its own kind for
    /// callers that want to prompt for disambiguation.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ValidationError(_)
            | Self::InvalidConfiguration(_)
            | Self::InvariantViolation(_) => ErrorKind::Validation,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::NotFound { .. } | Self::UnknownEvent(_) => ErrorKind::NotFound,
            Self::AmbiguousSelection { .. } => ErrorKind::Ambiguous,
        }
    }
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
