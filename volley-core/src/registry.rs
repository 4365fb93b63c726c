//! Concurrency-safe run membership registries

use crate::types::JobId;
use std::collections::HashSet;
use std::sync::Mutex;

/// Thread-safe membership set of job identifiers
///
/// Two independent instances track "currently running" and "stop requested"
/// jobs; they are never merged, since a job may be running without a pending
/// stop. All operations are idempotent and O(1) amortized; per-id operations
/// are linearized by the inner lock.
#[derive(Debug, Default)]
pub struct RunRegistry {
    inner: Mutex<HashSet<JobId>>,
}

impl RunRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an id; a no-op if it is already a member
    pub fn put(&self, id: JobId) {
        self.lock().insert(id);
    }

    /// Add an id unless it is already a member; returns whether it was added.
    /// This is the atomic check used to reject duplicate runs.
    pub fn try_put(&self, id: JobId) -> bool {
        self.lock().insert(id)
    }

    /// Whether the id is currently a member
    pub fn exists(&self, id: JobId) -> bool {
        self.lock().contains(&id)
    }

    /// Remove an id; a no-op if it is not a member
    pub fn delete(&self, id: JobId) {
        self.lock().remove(&id);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<JobId>> {
        // A poisoned lock only means another attack task panicked mid-insert;
        // the set itself is still usable.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}
