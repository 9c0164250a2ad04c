//! JSON file record store
//!
//! The current snapshot lives at a fixed path and is rewritten on every save.
//! Each save also leaves a timestamped copy next to it, named
//! `<stem>_<YYYYmmdd_HHMMSS>.json`. The snapshot's age is the file's
//! modification time.

use super::traits::{RecordStore, Snapshot, StorageError, StorageResult};
use crate::record::Record;
use chrono::{DateTime, Local, Utc};
use std::fs;
use std::path::{Path, PathBuf};

/// Record store backed by a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    keep_snapshots: bool,
}

impl JsonFileStore {
    /// Creates a store for the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            keep_snapshots: true,
        }
    }

    /// Enables or disables the timestamped copy written on save
    pub fn with_snapshots(mut self, keep: bool) -> Self {
        self.keep_snapshots = keep;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the timestamped copy for a save at `at`
    pub fn snapshot_path(&self, at: DateTime<Local>) -> StorageResult<PathBuf> {
        let stem = self
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| StorageError::InvalidPath(self.path.display().to_string()))?;

        let name = format!("{}_{}.json", stem, at.format("%Y%m%d_%H%M%S"));
        Ok(self.path.with_file_name(name))
    }
}

impl RecordStore for JsonFileStore {
    fn load(&self) -> StorageResult<Option<Snapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let modified = fs::metadata(&self.path)?.modified()?;
        let contents = fs::read_to_string(&self.path)?;
        let records: Vec<Record> = serde_json::from_str(&contents)?;

        tracing::debug!(
            "Loaded {} records from {}",
            records.len(),
            self.path.display()
        );

        Ok(Some(Snapshot {
            records,
            saved_at: DateTime::<Utc>::from(modified),
        }))
    }

    fn save(&self, records: &[Record]) -> StorageResult<()> {
        let json = serde_json::to_string_pretty(records)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        if self.keep_snapshots {
            let snapshot = self.snapshot_path(Local::now())?;
            fs::write(&snapshot, &json)?;
            tracing::info!("Saved {} records to {}", records.len(), snapshot.display());
        }

        fs::write(&self.path, json)?;
        tracing::info!("Saved {} records to {}", records.len(), self.path.display());

        Ok(())
    }
}
