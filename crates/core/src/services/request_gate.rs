use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;

use crate::actions::Operation;
use crate::models::kind::ResourceKind;

/// One in-flight request per (resource kind, operation).
///
/// A second request for a busy key waits (FIFO) until the first one has
/// dispatched its response or failure, so completions on one key never
/// interleave.
#[derive(Debug, Default)]
pub struct RequestGate {
    slots: Mutex<HashMap<(ResourceKind, Operation), Arc<tokio::sync::Mutex<()>>>>,
}

impl RequestGate {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, kind: ResourceKind, operation: Operation) -> Arc<tokio::sync::Mutex<()>> {
        Arc::clone(self.slots.lock().entry((kind, operation)).or_default())
    }

    /// Wait for the key to be free; it stays taken until the guard drops.
    pub async fn acquire(&self, kind: ResourceKind, operation: Operation) -> OwnedMutexGuard<()> {
        self.slot(kind, operation).lock_owned().await
    }

    #[must_use]
    pub fn is_busy(&self, kind: ResourceKind, operation: Operation) -> bool {
        self.slot(kind, operation).try_lock().is_err()
    }
}
