//! In-memory pending-confirmation store: at most one unconfirmed action per
//! sender, held only until an explicit yes/no, a replacement request, an
//! admin wipe, or process exit. Nothing here is durable by design.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::domain::shift::ShiftRecord;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PendingKind {
    TimeEntry,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PendingAction {
    pub sender_id: String,
    pub kind: PendingKind,
    pub record: ShiftRecord,
}

pub trait PendingStore: Send + Sync {
    /// Stores the action, silently replacing any pending action the same
    /// sender already has.
    fn put(&self, action: PendingAction);

    /// Atomically removes and returns the sender's pending action. The
    /// confirmation path goes through this single call so two near-
    /// simultaneous replies cannot both observe the same action.
    fn take(&self, sender_id: &str) -> Option<PendingAction>;

    /// Wipes every pending action, returning how many were dropped.
    fn clear_all(&self) -> usize;

    fn pending_count(&self) -> usize;
}

#[derive(Debug, Default)]
pub struct InMemoryPendingStore {
    entries: Mutex<HashMap<String, PendingAction>>,
}

impl InMemoryPendingStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, PendingAction>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PendingStore for InMemoryPendingStore {
    fn put(&self, action: PendingAction) {
        self.entries().insert(action.sender_id.clone(), action);
    }

    fn take(&self, sender_id: &str) -> Option<PendingAction> {
        self.entries().remove(sender_id)
    }

    fn clear_all(&self) -> usize {
        let mut entries = self.entries();
        let dropped = entries.len();
        entries.clear();
        dropped
    }

    fn pending_count(&self) -> usize {
        self.entries().len()
    }
}
