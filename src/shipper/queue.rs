//! Bounded entry queue shared between producers and the flush task

use parking_lot::Mutex;
use std::collections::VecDeque;

/// A thread-safe bounded FIFO of formatted entries.
///
/// Producers append through `try_push`, which rejects the new entry once
/// the queue is full; buffered entries are never evicted to make room.
/// The flush task is the only consumer: it pops from the front and, when a
/// send attempt fails after retry, returns the single in-flight entry to
/// the front through `push_front`. Occupancy can therefore reach
/// capacity + 1 for the duration of one failed cycle; `try_push` keeps
/// rejecting until the backlog drops below capacity again.
pub struct BoundedQueue {
    entries: Mutex<VecDeque<String>>,
    capacity: usize,
}

impl BoundedQueue {
    /// Create a queue holding at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity.min(1024))),
            capacity,
        }
    }

    /// Append an entry if capacity allows. Returns `false` when the queue
    /// is full and the entry was dropped.
    pub fn try_push(&self, entry: String) -> bool {
        let mut entries = self.entries.lock();
        if entries.len() < self.capacity {
            entries.push_back(entry);
            true
        } else {
            false
        }
    }

    /// Remove and return the oldest entry
    pub fn pop_front(&self) -> Option<String> {
        self.entries.lock().pop_front()
    }

    /// Return an in-flight entry to the front of the queue, preserving
    /// delivery order. Reserved for the flush task's failed-send path.
    pub fn push_front(&self, entry: String) {
        self.entries.lock().push_front(entry);
    }

    /// Number of currently buffered entries
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// True when nothing is buffered
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Configured maximum occupancy
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
