//! Bounded hand-off queue from workers to the coordinator.

use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

/// Default number of queued items before pushes start failing.
pub const DEFAULT_CAPACITY: usize = 100;

/// A bounded multi-producer queue.
///
/// The channel keeps both ends alive, so it never disconnects while any
/// clone exists. Clones share the same queue.
#[derive(Debug)]
pub struct ResultChannel<T> {
    tx: Sender<T>,
    rx: Receiver<T>,
}

impl<T> ResultChannel<T> {
    /// Creates a channel holding at most `capacity` items.
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = bounded(capacity);
        Self { tx, rx }
    }

    /// Pushes an item, blocking while the channel is full.
    pub fn push(&self, item: T) {
        // Cannot fail: `self.rx` keeps the channel connected.
        let _ = self.tx.send(item);
    }

    /// Pushes an item without blocking.
    ///
    /// Returns the item back if the channel is full.
    pub fn try_push(&self, item: T) -> Result<(), T> {
        self.tx.try_send(item).map_err(|e| match e {
            TrySendError::Full(item) | TrySendError::Disconnected(item) => item,
        })
    }

    /// Pops an item if one is queued.
    pub fn try_pop(&self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    /// Waits up to `timeout` for an item.
    pub fn pop_timeout(&self, timeout: Duration) -> Option<T> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// Returns the number of queued items.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Returns the maximum number of queued items.
    pub fn capacity(&self) -> usize {
        self.tx.capacity().unwrap_or(usize::MAX)
    }
}

impl<T> Clone for ResultChannel<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            rx: self.rx.clone(),
        }
    }
}

impl<T> Default for ResultChannel<T> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
