use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::delta::Delta;

static QUEUE_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// An ordered, append-only buffer of deltas with a drainable cursor.
///
/// `DeltaQueue` is a shared handle: cloning it with [`Clone::clone`] yields
/// another handle to the *same* underlying buffer (cheap, `Arc`-backed),
/// which is how a [`crate::ReportSession`] and the consumer endpoint holding
/// its queue both observe one logical stream. That is deliberately distinct
/// from [`DeltaQueue::fork`], which is the specification's `clone()`
/// operation: it snapshots the currently buffered deltas into a brand new,
/// independent queue.
#[derive(Debug, Clone)]
pub struct DeltaQueue {
    id: u64,
    buffer: Arc<Mutex<VecDeque<Delta>>>,
}

impl DeltaQueue {
    pub fn new() -> Self {
        Self {
            id: QUEUE_ID_COUNTER.fetch_add(1, Ordering::Relaxed),
            buffer: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Identity of this queue handle group, stable across [`Clone`] but
    /// fresh after [`DeltaQueue::fork`]. Used to find a consumer's queue
    /// again when detaching it from a session.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Append a delta at the tail. Never fails.
    pub fn append(&self, delta: Delta) {
        self.buffer.lock().push_back(delta);
    }

    /// Atomically remove and return everything currently buffered, in
    /// insertion order.
    pub fn drain(&self) -> Vec<Delta> {
        self.buffer.lock().drain(..).collect()
    }

    /// Snapshot the deltas currently buffered into a new, independent queue.
    /// Subsequent appends to `self` do not appear in the fork, and vice
    /// versa.
    pub fn fork(&self) -> Self {
        let snapshot: VecDeque<Delta> = self.buffer.lock().iter().cloned().collect();

        Self {
            id: QUEUE_ID_COUNTER.fetch_add(1, Ordering::Relaxed),
            buffer: Arc::new(Mutex::new(snapshot)),
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.buffer.lock().len()
    }
}

impl Default for DeltaQueue {
    fn default() -> Self {
        Self::new()
    }
}
