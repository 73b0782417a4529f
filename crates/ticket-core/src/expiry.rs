//! Expiry scheduler for pending reservations.
//!
//! A min-heap keyed by deadline gives the next reservation to expire in
//! O(1). Cancelling a heap entry in place is not possible, so the
//! scheduler also keeps a map of live deadlines: cancel removes the map
//! entry, and heap entries that no longer match the map are discarded
//! when they surface.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::time::SystemTime;

use crate::messages::ReservationId;

#[derive(Debug, Default)]
pub struct ExpiryScheduler {
    heap: BinaryHeap<Reverse<(SystemTime, ReservationId)>>,

    /// Reservation id -> deadline, for entries not yet fired or cancelled.
    live: HashMap<ReservationId, SystemTime>,
}

impl ExpiryScheduler {
    pub fn new() -> Self {
        ExpiryScheduler::default()
    }

    /// Register `id` to expire at `deadline`.
    pub fn schedule(&mut self, id: ReservationId, deadline: SystemTime) {
        self.live.insert(id, deadline);
        self.heap.push(Reverse((deadline, id)));
    }

    /// Drop the entry for `id`. Returns `false` if there was none.
    pub fn cancel(&mut self, id: ReservationId) -> bool {
        self.live.remove(&id).is_some()
    }

    pub fn is_scheduled(&self, id: ReservationId) -> bool {
        self.live.contains_key(&id)
    }

    /// Earliest live deadline, if any.
    pub fn next_deadline(&mut self) -> Option<SystemTime> {
        self.discard_stale();
        self.heap.peek().map(|Reverse((deadline, _))| *deadline)
    }

    /// Remove and return the next entry whose deadline is `<= now`.
    pub fn pop_due(&mut self, now: SystemTime) -> Option<ReservationId> {
        self.discard_stale();

        let Reverse((deadline, id)) = *self.heap.peek()?;
        if deadline > now {
            return None;
        }

        self.heap.pop();
        self.live.remove(&id);
        Some(id)
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    fn discard_stale(&mut self) {
        while let Some(Reverse((deadline, id))) = self.heap.peek() {
            if self.live.get(id) == Some(deadline) {
                break;
            }
            self.heap.pop();
        }
    }
}
