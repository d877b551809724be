//! Lock-protected vector store

use chrono::Utc;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::StoredRecord;

struct Inner<T> {
    records: Vec<T>,
    next_id: u64,
}

/// Append-only record collection shared across requests
pub struct MemoryStore<T> {
    inner: RwLock<Inner<T>>,
}

impl<T: StoredRecord> MemoryStore<T> {
    /// Create an empty store
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Create a store holding `records`; new ids continue after them
    pub fn with_records(records: Vec<T>) -> Self {
        let next_id = records.len() as u64 + 1;
        Self {
            inner: RwLock::new(Inner { records, next_id }),
        }
    }

    // Appends never leave a record half-written, so a poisoned lock still
    // guards consistent data.
    fn read(&self) -> RwLockReadGuard<'_, Inner<T>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner<T>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Assign id and timestamps, append, and return the stored record
    pub fn append(&self, mut record: T) -> T {
        let mut inner = self.write();

        let id = inner.next_id;
        inner.next_id += 1;

        record.assign_id(id);
        record.stamp(Utc::now());
        inner.records.push(record.clone());

        tracing::debug!(id, total = inner.records.len(), "Record appended");
        record
    }

    /// Snapshot of every record in insertion order
    pub fn list(&self) -> Vec<T> {
        self.read().records.clone()
    }

    /// Snapshot of the records matching `predicate`, in insertion order
    pub fn filter<F>(&self, predicate: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        self.read()
            .records
            .iter()
            .filter(|record| predicate(record))
            .cloned()
            .collect()
    }

    /// Find a record by id
    pub fn find(&self, id: u64) -> Option<T> {
        self.read().records.iter().find(|r| r.id() == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: StoredRecord> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}
