//! Bounded channel handles.
//!
//! A `Chan<T>` is either absent (the default) or a shared handle to a
//! bounded `std::sync::mpsc` channel. Cloning a present handle shares the
//! same underlying channel, so the handle behaves like a reference.

use std::fmt;
use std::sync::mpsc::{sync_channel, Receiver, SyncSender};
use std::sync::Arc;

struct Endpoints<T> {
    sender: SyncSender<T>,
    receiver: Receiver<T>,
    capacity: usize,
}

/// Optional handle to a bounded channel.
pub struct Chan<T> {
    inner: Option<Arc<Endpoints<T>>>,
}

impl<T> Chan<T> {
    /// A handle that refers to no channel.
    pub fn absent() -> Self {
        Self { inner: None }
    }

    /// Create a channel buffering up to `capacity` messages.
    ///
    /// A capacity of 0 makes every send a rendezvous with a receive.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, receiver) = sync_channel(capacity);
        Self {
            inner: Some(Arc::new(Endpoints {
                sender,
                receiver,
                capacity,
            })),
        }
    }

    pub fn is_absent(&self) -> bool {
        self.inner.is_none()
    }

    /// Buffer capacity, or `None` when absent.
    pub fn capacity(&self) -> Option<usize> {
        self.inner.as_ref().map(|e| e.capacity)
    }

    pub fn sender(&self) -> Option<&SyncSender<T>> {
        self.inner.as_ref().map(|e| &e.sender)
    }

    pub fn receiver(&self) -> Option<&Receiver<T>> {
        self.inner.as_ref().map(|e| &e.receiver)
    }
}

impl<T> Default for Chan<T> {
    fn default() -> Self {
        Self::absent()
    }
}

impl<T> Clone for Chan<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

// Two handles compare equal when they agree on presence and capacity. The
// identity of the underlying channel is not part of the comparison.
impl<T> PartialEq for Chan<T> {
    fn eq(&self, other: &Self) -> bool {
        self.capacity() == other.capacity()
    }
}

impl<T> fmt::Debug for Chan<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.capacity() {
            Some(capacity) => f.debug_struct("Chan").field("capacity", &capacity).finish(),
            None => f.write_str("Chan(absent)"),
        }
    }
}
