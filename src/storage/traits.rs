//! Storage traits and error types
//!
//! This module defines the trait interface for record stores and the
//! associated error types.

use crate::record::Record;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid store path: {0}")]
    InvalidPath(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A persisted set of records and the time it was written
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub records: Vec<Record>,
    pub saved_at: DateTime<Utc>,
}

impl Snapshot {
    /// Age of the snapshot relative to `now`
    pub fn age_at(&self, now: DateTime<Utc>) -> chrono::Duration {
        now.signed_duration_since(self.saved_at)
    }

    /// Age in fractional days relative to `now`
    pub fn age_days_at(&self, now: DateTime<Utc>) -> f64 {
        self.age_at(now).num_seconds() as f64 / 86_400.0
    }
}

/// Trait for record store implementations
///
/// A store holds at most one current snapshot. Saving replaces it.
pub trait RecordStore {
    /// Loads the current snapshot
    ///
    /// Returns `Ok(None)` if nothing has been saved yet.
    fn load(&self) -> StorageResult<Option<Snapshot>>;

    /// Replaces the current snapshot with `records`
    fn save(&self, records: &[Record]) -> StorageResult<()>;
}

impl<T: RecordStore + ?Sized> RecordStore for &T {
    fn load(&self) -> StorageResult<Option<Snapshot>> {
        (**self).load()
    }

    fn save(&self, records: &[Record]) -> StorageResult<()> {
        (**self).save(records)
    }
}
