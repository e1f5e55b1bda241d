//! Per-track like bookkeeping
//!
//! Every mutation is stamped with an epoch from a single counter. A refresh
//! remembers the epoch it started at, so its snapshot can tell which local
//! entries it has already seen and which settled while it was in flight.

use std::collections::HashMap;
use tunebox_core::TrackId;

/// Local knowledge about one track
///
/// A track without an entry is not liked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeEntry {
    /// Last confirmed state, from a toggle reply, rollback or refresh
    Settled { liked: bool, epoch: u64 },

    /// A toggle is in flight
    Pending { optimistic: bool, previous: bool },
}

impl LikeEntry {
    /// State shown to the user
    pub fn is_liked(self) -> bool {
        match self {
            Self::Settled { liked, .. } => liked,
            Self::Pending { optimistic, .. } => optimistic,
        }
    }

    pub fn is_pending(self) -> bool {
        matches!(self, Self::Pending { .. })
    }
}

/// Fold a liked-ID snapshot into local entries
///
/// `started` is the epoch the snapshot was requested at. Pending entries and
/// entries settled after `started` are newer than the snapshot and survive;
/// everything else is replaced by what the server reported.
pub fn merge_refresh(
    entries: HashMap<TrackId, LikeEntry>,
    server_liked: impl IntoIterator<Item = TrackId>,
    started: u64,
) -> HashMap<TrackId, LikeEntry> {
    let mut merged: HashMap<TrackId, LikeEntry> = entries
        .into_iter()
        .filter(|(_, entry)| match entry {
            LikeEntry::Pending { .. } => true,
            LikeEntry::Settled { epoch, .. } => *epoch > started,
        })
        .collect();

    for id in server_liked {
        merged.entry(id).or_insert(LikeEntry::Settled {
            liked: true,
            epoch: started,
        });
    }

    merged
}

/// Handle for one in-flight toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Ticket {
    pub optimistic: bool,
    pub started: u64,
}

#[derive(Debug, Default)]
pub(crate) struct LikeState {
    entries: HashMap<TrackId, LikeEntry>,
    epoch: u64,
    last_refresh: u64,
    cleared_at: u64,
}

impl LikeState {
    pub fn entry(&self, id: &TrackId) -> Option<LikeEntry> {
        self.entries.get(id).copied()
    }

    pub fn is_liked(&self, id: &TrackId) -> bool {
        self.entry(id).is_some_and(LikeEntry::is_liked)
    }

    pub fn is_pending(&self, id: &TrackId) -> bool {
        self.entry(id).is_some_and(LikeEntry::is_pending)
    }

    /// Sorted IDs the user currently sees as liked
    pub fn liked_ids(&self) -> Vec<TrackId> {
        let mut ids: Vec<TrackId> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_liked())
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Flip the visible state and mark the track pending
    ///
    /// Returns `None` when a toggle is already in flight for the track.
    pub fn begin_toggle(&mut self, id: &TrackId) -> Option<Ticket> {
        let previous = match self.entry(id) {
            Some(LikeEntry::Pending { .. }) => return None,
            Some(entry) => entry.is_liked(),
            None => false,
        };
        let optimistic = !previous;

        self.entries.insert(
            id.clone(),
            LikeEntry::Pending {
                optimistic,
                previous,
            },
        );
        Some(Ticket {
            optimistic,
            started: self.epoch,
        })
    }

    /// Record the server's answer for a toggle
    pub fn settle(&mut self, id: &TrackId, ticket: Ticket, liked: bool) -> bool {
        if !self.owns(id, ticket) {
            return false;
        }
        let epoch = self.next_epoch();
        self.entries
            .insert(id.clone(), LikeEntry::Settled { liked, epoch });
        true
    }

    /// Restore the state from before a failed toggle
    pub fn rollback(&mut self, id: &TrackId, ticket: Ticket) -> bool {
        if !self.owns(id, ticket) {
            return false;
        }
        let Some(LikeEntry::Pending { previous, .. }) = self.entry(id) else {
            return false;
        };
        let epoch = self.next_epoch();
        self.entries.insert(
            id.clone(),
            LikeEntry::Settled {
                liked: previous,
                epoch,
            },
        );
        true
    }

    pub fn begin_refresh(&mut self) -> u64 {
        self.next_epoch()
    }

    /// Apply a full snapshot; stale snapshots are discarded
    pub fn apply_refresh(&mut self, started: u64, server_liked: Vec<TrackId>) -> bool {
        if started < self.last_refresh || started < self.cleared_at {
            return false;
        }
        self.last_refresh = started;
        let entries = std::mem::take(&mut self.entries);
        self.entries = merge_refresh(entries, server_liked, started);
        true
    }

    /// Apply a single-track answer requested at `started`
    pub fn apply_single(&mut self, id: &TrackId, started: u64, liked: bool) -> bool {
        if started < self.cleared_at {
            return false;
        }
        let newer = match self.entry(id) {
            Some(LikeEntry::Pending { .. }) => true,
            Some(LikeEntry::Settled { epoch, .. }) => epoch > started,
            None => false,
        };
        if newer {
            return false;
        }
        self.entries.insert(
            id.clone(),
            LikeEntry::Settled {
                liked,
                epoch: started,
            },
        );
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cleared_at = self.next_epoch();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the pending entry for `id` still belongs to `ticket`
    fn owns(&self, id: &TrackId, ticket: Ticket) -> bool {
        ticket.started >= self.cleared_at && self.is_pending(id)
    }

    fn next_epoch(&mut self) -> u64 {
        self.epoch += 1;
        self.epoch
    }
}
