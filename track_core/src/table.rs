//! Fixed-capacity track table: a slot arena owned exclusively by the
//! manager, guarded by a single internal mutex.
//!
//! A track's slot index is stable only while the track is live; a freed
//! slot is reused by later inserts but the numeric track ID never is.
//! Readers get snapshot copies, never live references, so a consumer can
//! read concurrently with the next cycle's mutation.

use crate::track::Track;
use crate::types::TrackId;
use std::sync::Mutex;

/// The slot storage. Only the manager (via [`TrackTable::with_mut`]) sees it.
#[derive(Debug)]
pub(crate) struct Slots {
    slots: Vec<Option<Track>>,
    live: usize,
}

impl Slots {
    /// Insert into the first free slot. Returns `false` if the table is full.
    pub(crate) fn insert(&mut self, track: Track) -> bool {
        match self.slots.iter_mut().find(|s| s.is_none()) {
            Some(slot) => {
                *slot = Some(track);
                self.live += 1;
                true
            }
            None => false,
        }
    }

    /// Remove and return the track with the given ID, freeing its slot.
    pub(crate) fn remove(&mut self, id: TrackId) -> Option<Track> {
        for slot in self.slots.iter_mut() {
            if slot.as_ref().is_some_and(|t| t.id == id) {
                self.live -= 1;
                return slot.take();
            }
        }
        None
    }

    /// Remove the live track with the largest age (capacity pressure).
    pub(crate) fn evict_oldest(&mut self) -> Option<Track> {
        let victim = self
            .iter()
            .max_by(|a, b| a.age.total_cmp(&b.age))
            .map(|t| t.id)?;
        self.remove(victim)
    }

    /// Remove every track whose age exceeds `max_age`. Returns the evicted.
    pub(crate) fn remove_aged(&mut self, max_age: f64) -> Vec<Track> {
        let mut evicted = Vec::new();
        for slot in self.slots.iter_mut() {
            if slot.as_ref().is_some_and(|t| t.age > max_age) {
                evicted.push(slot.take().expect("slot checked live"));
                self.live -= 1;
            }
        }
        evicted
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Track> {
        self.slots.iter().filter_map(|s| s.as_ref())
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Track> {
        self.slots.iter_mut().filter_map(|s| s.as_mut())
    }

    pub(crate) fn len(&self) -> usize {
        self.live
    }

    pub(crate) fn is_full(&self) -> bool {
        self.live >= self.slots.len()
    }

    pub(crate) fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
        self.live = 0;
    }
}

/// Thread-safe fixed-capacity track storage.
#[derive(Debug)]
pub struct TrackTable {
    inner: Mutex<Slots>,
    capacity: usize,
}

impl TrackTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Slots {
                slots: (0..capacity).map(|_| None).collect(),
                live: 0,
            }),
            capacity,
        }
    }

    /// Number of live tracks. Always `<= capacity`.
    pub fn len(&self) -> usize {
        self.inner.lock().expect("table mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Copy up to `max` live tracks out of the table.
    ///
    /// Safe to call from any thread at any time; holds the table lock only
    /// for the duration of the copy.
    pub fn snapshot(&self, max: usize) -> Vec<Track> {
        let slots = self.inner.lock().expect("table mutex poisoned");
        slots.iter().take(max).cloned().collect()
    }

    /// Run the manager's cycle mutation under the table lock.
    pub(crate) fn with_mut<R>(&self, f: impl FnOnce(&mut Slots) -> R) -> R {
        let mut slots = self.inner.lock().expect("table mutex poisoned");
        f(&mut slots)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
