use std::collections::HashMap;

use chrono::NaiveDateTime;

use koyomi_core::types::{EventId, SeriesToken};

/// Bidirectional membership map between events and recurrence series.
///
/// Every id in one map appears consistently in the other; a series whose
/// last member leaves is pruned immediately. Start instants live in the
/// event table, so time-based operations take a `start_of` lookup.
#[derive(Debug, Default)]
pub struct SeriesIndex {
    series_of: HashMap<EventId, SeriesToken>,
    members: HashMap<SeriesToken, Vec<EventId>>,
}

impl SeriesIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints a fresh token and stores full membership in the given order.
    pub fn register(&mut self, ids: Vec<EventId>) -> SeriesToken {
        let token = SeriesToken::new();
        for &id in &ids {
            self.series_of.insert(id, token);
        }
        tracing::debug!(%token, members = ids.len(), "registered series");
        self.members.insert(token, ids);
        token
    }

    #[must_use]
    pub fn series_of(&self, id: EventId) -> Option<SeriesToken> {
        self.series_of.get(&id).copied()
    }

    /// Every member of `token`, in storage order.
    #[must_use]
    pub fn members(&self, token: SeriesToken) -> Vec<EventId> {
        self.members.get(&token).cloned().unwrap_or_default()
    }

    /// Members starting at or after `cutoff`, ordered by start.
    #[must_use]
    pub fn following<F>(&self, token: SeriesToken, cutoff: NaiveDateTime, start_of: F) -> Vec<EventId>
    where
        F: Fn(EventId) -> Option<NaiveDateTime>,
    {
        let Some(ids) = self.members.get(&token) else {
            return Vec::new();
        };
        let mut picked: Vec<(NaiveDateTime, EventId)> = ids
            .iter()
            .filter_map(|&id| start_of(id).filter(|&start| start >= cutoff).map(|s| (s, id)))
            .collect();
        picked.sort_unstable();
        picked.into_iter().map(|(_, id)| id).collect()
    }

    /// Removes one event from its series, pruning the series if it empties.
    pub fn detach(&mut self, id: EventId) {
        let Some(token) = self.series_of.remove(&id) else {
            return;
        };
        if let Some(ids) = self.members.get_mut(&token) {
            ids.retain(|&member| member != id);
            if ids.is_empty() {
                self.members.remove(&token);
            }
        }
        tracing::trace!(%id, %token, "detached event from series");
    }

    /// ## Summary
    /// Partitions the series at `cutoff`: members starting at or after it
    /// move to a brand-new token, earlier members stay put.
    ///
    /// If nothing qualifies to move, the original token is returned and no
    /// token is minted. If everything moves, the original is pruned.
    pub fn split_following<F>(
        &mut self,
        token: SeriesToken,
        cutoff: NaiveDateTime,
        start_of: F,
    ) -> SeriesToken
    where
        F: Fn(EventId) -> Option<NaiveDateTime>,
    {
        let Some(ids) = self.members.get(&token) else {
            return token;
        };

        let (moved, kept): (Vec<EventId>, Vec<EventId>) = ids
            .iter()
            .copied()
            .partition(|&id| start_of(id).is_some_and(|start| start >= cutoff));
        if moved.is_empty() {
            return token;
        }

        let fresh = SeriesToken::new();
        for &id in &moved {
            self.series_of.insert(id, fresh);
        }
        if kept.is_empty() {
            self.members.remove(&token);
        } else {
            self.members.insert(token, kept);
        }
        self.members.insert(fresh, moved);
        tracing::debug!(%token, %fresh, %cutoff, "split series");
        fresh
    }
}
