//! The pending set: dispatched URLs that have not reached a terminal state.

use std::collections::VecDeque;
use std::time::{Duration, Instant};
use waypost_core::{PendingId, Url};

/// One dispatched URL awaiting a route and/or an action.
///
/// Path parameters are not stored; they are re-derived on every drain so a
/// route registered after the dispatch can still claim it.
#[derive(Debug)]
pub(crate) struct PendingEntry {
    id: PendingId,
    url: Url,
    enqueued_at: Instant,
}

impl PendingEntry {
    pub(crate) fn new(id: PendingId, url: Url) -> Self {
        Self {
            id,
            url,
            enqueued_at: Instant::now(),
        }
    }

    pub(crate) fn id(&self) -> PendingId {
        self.id
    }

    pub(crate) fn url(&self) -> &Url {
        &self.url
    }

    pub(crate) fn into_url(self) -> Url {
        self.url
    }

    /// Wall-clock time since `dispatch` was called.
    ///
    /// Measured with [`Instant`], not the context's clock, so a virtual
    /// clock such as `ManualContext` does not move it.
    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    pub(crate) fn waited(&self) -> Duration {
        self.enqueued_at.elapsed()
    }
}

/// FIFO of pending entries, keyed by identity for timeouts.
#[derive(Debug, Default)]
pub(crate) struct PendingQueue {
    entries: VecDeque<PendingEntry>,
}

impl PendingQueue {
    pub(crate) fn push(&mut self, entry: PendingEntry) {
        debug_assert!(
            !self.contains(entry.id()),
            "{} is already pending",
            entry.id()
        );
        self.entries.push_back(entry);
    }

    /// Remove and return everything, in enqueue order.
    pub(crate) fn take_all(&mut self) -> Vec<PendingEntry> {
        self.entries.drain(..).collect()
    }

    pub(crate) fn remove(&mut self, id: PendingId) -> Option<PendingEntry> {
        let index = self.entries.iter().position(|entry| entry.id() == id)?;
        self.entries.remove(index)
    }

    /// Drop everything, returning how many entries were dropped.
    pub(crate) fn clear(&mut self) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        dropped
    }

    pub(crate) fn contains(&self, id: PendingId) -> bool {
        self.entries.iter().any(|entry| entry.id() == id)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
