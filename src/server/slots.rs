use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Bounded admission counter for concurrently handled connections.
///
/// A slot is reserved before `accept()` is called and released when the
/// handling task finishes, so the number of in-flight connections never
/// exceeds the configured capacity.
#[derive(Clone)]
pub struct ConnectionSlots {
    capacity: usize,
    semaphore: Arc<Semaphore>,
}

/// A reserved slot. Dropping it frees the slot.
pub struct Slot {
    _permit: OwnedSemaphorePermit,
}

impl ConnectionSlots {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            semaphore: Arc::new(Semaphore::new(capacity)),
        }
    }

    /// Tries to reserve a slot without waiting.
    ///
    /// Returns `None` when all slots are taken; the acceptor backs off and
    /// retries instead of accepting the connection.
    pub fn try_reserve(&self) -> Option<Slot> {
        self.semaphore
            .clone()
            .try_acquire_owned()
            .ok()
            .map(|permit| Slot { _permit: permit })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of slots currently free.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}
