use crate::ports::outbound::{AnalysisCache, CacheEntry, CacheKey};
use crate::shared::error::CacheError;
use chrono::{Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// File-backed analysis cache
///
/// Entries live in a concurrent in-memory map and are persisted to a
/// single JSON file after every mutation. Writers are serialized: the
/// file is written to a sibling temp path under a lock and renamed into
/// place, so readers never observe a partially written store. A corrupt
/// or missing file loads as an empty cache.
pub struct FileCache {
    entries: DashMap<CacheKey, CacheEntry>,
    file_path: PathBuf,
    ttl: Duration,
    write_lock: Mutex<()>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedRecord {
    key: CacheKey,
    entry: CacheEntry,
}

impl FileCache {
    pub const DEFAULT_TTL_HOURS: i64 = 24 * 7;

    /// Opens (or creates) a cache at the given path.
    ///
    /// # Arguments
    /// * `file_path` - Location of the JSON store
    /// * `ttl_hours` - Age in hours after which entries are expirable
    pub fn open(file_path: impl AsRef<Path>, ttl_hours: i64) -> Self {
        let file_path = file_path.as_ref().to_path_buf();
        let entries = DashMap::new();

        if let Ok(content) = fs::read_to_string(&file_path) {
            if let Ok(records) = serde_json::from_str::<Vec<PersistedRecord>>(&content) {
                for record in records {
                    entries.insert(record.key, record.entry);
                }
            }
        }

        Self {
            entries,
            file_path,
            ttl: Duration::hours(ttl_hours.max(0)),
            write_lock: Mutex::new(()),
        }
    }

    fn persist(&self) -> Result<(), CacheError> {
        // One writer at a time: concurrent temp-file writes against the
        // same path could interleave truncate and rename.
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        let records: Vec<PersistedRecord> = self
            .entries
            .iter()
            .map(|item| PersistedRecord {
                key: item.key().clone(),
                entry: item.value().clone(),
            })
            .collect();

        let json = serde_json::to_string_pretty(&records).map_err(|e| CacheError::WriteFailure {
            path: self.file_path.clone(),
            details: e.to_string(),
        })?;

        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| CacheError::WriteFailure {
                    path: self.file_path.clone(),
                    details: e.to_string(),
                })?;
            }
        }

        let temp_path = self.file_path.with_extension("json.tmp");
        fs::write(&temp_path, json).map_err(|e| CacheError::WriteFailure {
            path: temp_path.clone(),
            details: e.to_string(),
        })?;
        fs::rename(&temp_path, &self.file_path).map_err(|e| CacheError::WriteFailure {
            path: self.file_path.clone(),
            details: e.to_string(),
        })?;

        Ok(())
    }

    fn is_expired(&self, entry: &CacheEntry) -> bool {
        entry.stored_at + self.ttl < Utc::now()
    }
}

impl AnalysisCache for FileCache {
    fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        let entry = self.entries.get(key)?;
        if self.is_expired(entry.value()) {
            return None;
        }
        Some(entry.value().clone())
    }

    fn put(&self, key: CacheKey, entry: CacheEntry) -> Result<(), CacheError> {
        self.entries.insert(key, entry);
        self.persist()
    }

    fn evict_expired(&self) -> Result<usize, CacheError> {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !self.is_expired(entry));
        let evicted = before - self.entries.len();

        if evicted > 0 {
            self.persist()?;
        }
        Ok(evicted)
    }

    fn entries_for(&self, provider: &str, model: &str) -> Vec<CacheEntry> {
        let mut entries: Vec<CacheEntry> = self
            .entries
            .iter()
            .filter(|item| {
                item.key().provider == provider
                    && item.key().model == model
                    && !self.is_expired(item.value())
            })
            .map(|item| item.value().clone())
            .collect();

        entries.sort_by(|a, b| a.coordinate.identity().cmp(&b.coordinate.identity()));
        entries
    }
}
