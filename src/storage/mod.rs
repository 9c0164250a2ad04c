//! Storage module for persisting crawl results
//!
//! This module handles the on-disk record cache, including:
//! - Reading and writing the JSON snapshot
//! - Timestamped copies of every save
//! - The freshness policy that decides whether a cached snapshot is reused

mod json;
mod traits;

pub use json::JsonFileStore;
pub use traits::{RecordStore, Snapshot, StorageError, StorageResult};

use crate::config::CacheConfig;
use chrono::{DateTime, Utc};

/// Opens the JSON store configured in the `[cache]` section
pub fn open_store(config: &CacheConfig) -> JsonFileStore {
    JsonFileStore::new(&config.path)
}

/// When a cached snapshot may be reused instead of crawling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreshnessPolicy {
    /// Snapshot must be younger than this many days
    pub max_age_days: u32,

    /// Snapshot must hold strictly more records than this
    pub min_records: usize,
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self::from(&CacheConfig::default())
    }
}

impl From<&CacheConfig> for FreshnessPolicy {
    fn from(config: &CacheConfig) -> Self {
        Self {
            max_age_days: config.max_age_days,
            min_records: config.min_records,
        }
    }
}

impl FreshnessPolicy {
    /// Returns true if the snapshot may be served as of `now`
    pub fn is_fresh(&self, snapshot: &Snapshot, now: DateTime<Utc>) -> bool {
        snapshot.records.len() > self.min_records
            && snapshot.age_days_at(now) < f64::from(self.max_age_days)
    }
}

/// Loads the store's snapshot if it is fresh
///
/// An unreadable cache is logged and treated as missing.
pub fn load_fresh<S: RecordStore + ?Sized>(
    store: &S,
    policy: &FreshnessPolicy,
    now: DateTime<Utc>,
) -> Option<Snapshot> {
    let snapshot = match store.load() {
        Ok(Some(snapshot)) => snapshot,
        Ok(None) => return None,
        Err(e) => {
            tracing::error!("Error loading cached records: {}. Will crawl fresh data.", e);
            return None;
        }
    };

    let age_days = snapshot.age_days_at(now);
    tracing::info!(
        "Found cached snapshot with {} records from {:.1} days ago",
        snapshot.records.len(),
        age_days
    );

    if policy.is_fresh(&snapshot, now) {
        Some(snapshot)
    } else {
        tracing::info!(
            "Cache holds {} records and is {:.1} days old, refreshing",
            snapshot.records.len(),
            age_days
        );
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{sample_records, Record};
    use chrono::Duration;

    fn snapshot(count: usize, age: Duration, now: DateTime<Utc>) -> Snapshot {
        let records: Vec<Record> = sample_records().into_iter().cycle().take(count).collect();
        Snapshot {
            records,
            saved_at: now - age,
        }
    }

    #[test]
    fn test_fresh_requires_more_than_min_records() {
        let now = Utc::now();
        let policy = FreshnessPolicy::default();

        assert!(!policy.is_fresh(&snapshot(5, Duration::hours(1), now), now));
        assert!(policy.is_fresh(&snapshot(6, Duration::hours(1), now), now));
    }

    #[test]
    fn test_fresh_requires_age_below_limit() {
        let now = Utc::now();
        let policy = FreshnessPolicy::default();

        assert!(policy.is_fresh(&snapshot(10, Duration::days(6), now), now));
        assert!(!policy.is_fresh(&snapshot(10, Duration::days(7), now), now));
        assert!(!policy.is_fresh(&snapshot(10, Duration::days(30), now), now));
    }

    struct BrokenStore;

    impl RecordStore for BrokenStore {
        fn load(&self) -> StorageResult<Option<Snapshot>> {
            Err(StorageError::InvalidPath("broken".to_string()))
        }

        fn save(&self, _records: &[Record]) -> StorageResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_unreadable_cache_is_not_fresh() {
        assert!(load_fresh(&BrokenStore, &FreshnessPolicy::default(), Utc::now()).is_none());
    }
}
