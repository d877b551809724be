//! In-memory data store
//!
//! The process-wide system of record for jobs and companies. The search
//! engine is only a read-optimized projection of what lives here.
//!
//! Records are appended, never mutated in place. Id assignment happens under
//! the write lock from a monotonic counter, so concurrent appends can never
//! hand out the same id. No method is async; callers never hold a lock
//! across an await point.

mod memory;

pub use memory::MemoryStore;

use chrono::{DateTime, Utc};

use crate::models::{Company, Job};

/// A record the store can own
pub trait StoredRecord: Clone + Send + Sync + 'static {
    /// Store-assigned identifier
    fn id(&self) -> u64;

    /// Overwrite the identifier at creation time
    fn assign_id(&mut self, id: u64);

    /// Set creation/update timestamps at creation time
    fn stamp(&mut self, now: DateTime<Utc>);
}

/// Job listings
pub type JobStore = MemoryStore<Job>;

/// Companies
pub type CompanyStore = MemoryStore<Company>;
