//! Correlation of in-flight requests with their responses.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard};

use amswire_codec::Response;
use tokio::sync::oneshot;

/// Single-use completion slot for one pending call.
pub type Slot = oneshot::Sender<Response>;

#[derive(Debug, Default)]
struct TableState {
    slots: HashMap<u32, Slot>,
    closed: bool,
}

/// Maps invoke ids to the completion slot of the call waiting on them.
///
/// Every access goes through one lock that is never held across I/O.
#[derive(Debug, Default)]
pub struct CorrelationTable {
    state: Mutex<TableState>,
}

impl CorrelationTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, TableState> {
        // A panic while holding the lock cannot leave the map half-updated.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a fresh slot for `invoke_id`.
    ///
    /// Returns `None` once the table has been drained by a terminated
    /// receive loop; nothing could ever complete the slot.
    pub fn register(&self, invoke_id: u32) -> Option<oneshot::Receiver<Response>> {
        let mut state = self.lock();
        if state.closed {
            return None;
        }
        let (tx, rx) = oneshot::channel();
        if state.slots.insert(invoke_id, tx).is_some() {
            tracing::warn!(invoke_id, "replaced pending call with duplicate invoke id");
        }
        Some(rx)
    }

    /// Remove and return the slot for `invoke_id`, if any.
    pub fn take(&self, invoke_id: u32) -> Option<Slot> {
        self.lock().slots.remove(&invoke_id)
    }

    /// Drop every pending slot and refuse further registrations.
    ///
    /// Waiters observe their slot closing. Returns how many were released.
    pub fn drain(&self) -> usize {
        let mut state = self.lock();
        state.closed = true;
        let released = state.slots.len();
        state.slots.clear();
        released
    }

    /// Number of calls currently waiting.
    pub fn len(&self) -> usize {
        self.lock().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, invoke_id: u32) -> bool {
        self.lock().slots.contains_key(&invoke_id)
    }
}

/// Removes a pending entry when the waiting call ends, however it ends.
pub(crate) struct PendingGuard<'a> {
    table: &'a CorrelationTable,
    invoke_id: u32,
}

impl<'a> PendingGuard<'a> {
    pub(crate) fn new(table: &'a CorrelationTable, invoke_id: u32) -> Self {
        Self { table, invoke_id }
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        let _ = self.table.take(self.invoke_id);
    }
}

/// Monotonic invoke-id counter scoped to one connection.
#[derive(Debug, Default)]
pub struct InvokeIds {
    next: AtomicU32,
}

impl InvokeIds {
    /// Start a counter whose first id is `first`.
    pub fn starting_at(first: u32) -> Self {
        Self {
            next: AtomicU32::new(first),
        }
    }

    /// Hand out the next id. Wraps after `u32::MAX`.
    pub fn next_id(&self) -> u32 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}
