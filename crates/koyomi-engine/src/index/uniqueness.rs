use std::collections::HashSet;

use chrono::NaiveDateTime;

use koyomi_core::error::{CoreError, CoreResult};

/// Derived identity of a live event: case-folded subject plus the exact
/// start and end instants.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventKey {
    subject: String,
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl EventKey {
    /// Lowercases the subject so case differences do not count as distinct
    /// identities.
    #[must_use]
    pub fn derive(subject: &str, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            subject: subject.to_lowercase(),
            start,
            end,
        }
    }

    fn conflict(&self) -> CoreError {
        CoreError::Conflict {
            subject: self.subject.clone(),
            start: self.start,
            end: self.end,
        }
    }
}

/// The set of derived keys of all live events.
///
/// Kept in 1:1 correspondence with the event table at every observable
/// point; no key is dropped without its event going away and no event is
/// stored without its key.
#[derive(Debug, Default)]
pub struct UniquenessIndex {
    live: HashSet<EventKey>,
}

impl UniquenessIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// ## Summary
    /// Registers a new key.
    ///
    /// ## Errors
    /// Returns `Conflict` if the key is already live; the index is unchanged.
    pub fn add(&mut self, key: EventKey) -> CoreResult<()> {
        if self.live.contains(&key) {
            return Err(key.conflict());
        }
        self.live.insert(key);
        Ok(())
    }

    /// ## Summary
    /// Atomically swaps `old` for `new`. Equal keys are a no-op.
    ///
    /// ## Errors
    /// Returns `Conflict` if `new` is already live; the index is unchanged.
    pub fn replace(&mut self, old: &EventKey, new: EventKey) -> CoreResult<()> {
        if *old == new {
            return Ok(());
        }
        if self.live.contains(&new) {
            return Err(new.conflict());
        }
        self.live.remove(old);
        self.live.insert(new);
        Ok(())
    }

    #[must_use]
    pub fn contains(&self, key: &EventKey) -> bool {
        self.live.contains(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}
