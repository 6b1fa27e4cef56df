//! Time-boxed cache for fetched repository data.
//!
//! A keyed store mapping repository coordinates to previously fetched
//! values plus the HTTP validators they were served with, so repeated
//! lookups can be revalidated instead of refetched. Entries expire after a
//! fixed retention window, checked lazily on read and periodically by a
//! sweep task. The whole store is snapshotted to one JSON file on every
//! mutation and on drop, and loaded once at construction.

use anyhow::{Context, Result};
use chrono::Utc;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::{log_debug, log_warn};

/// HTTP validators attached to a cached value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validators {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
}

impl Validators {
    pub fn is_empty(&self) -> bool {
        self.etag.is_none() && self.last_modified.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    data: serde_json::Value,
    /// Epoch milliseconds at the time of the `set`
    timestamp: i64,
    #[serde(flatten)]
    validators: Validators,
}

/// Process-wide cache with a fixed retention window.
///
/// Interior mutability covers the sweep task; the intended access pattern
/// is a single active traversal per user-initiated fetch.
pub struct CacheStore {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
    path: PathBuf,
}

impl CacheStore {
    /// Opens the store backed by the snapshot at `path`, dropping entries
    /// that expired while the snapshot was on disk.
    ///
    /// A missing snapshot starts empty; a malformed one is discarded with a
    /// warning rather than surfaced.
    pub fn open(path: PathBuf, ttl: Duration) -> Self {
        let entries = Self::load_snapshot(&path, ttl);
        Self {
            entries: Mutex::new(entries),
            ttl,
            path,
        }
    }

    /// Returns the value and validators stored under `key`, unless the
    /// entry has outlived the retention window - in which case it is
    /// evicted on the spot.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<(T, Validators)> {
        let mut entries = self.entries.lock();
        let entry = entries.get(key)?;

        if self.is_expired(entry) {
            log_debug!("Cache entry expired: {}", key);
            entries.remove(key);
            self.write_locked(&entries);
            return None;
        }

        let validators = entry.validators.clone();
        match serde_json::from_value(entry.data.clone()) {
            Ok(value) => Some((value, validators)),
            Err(e) => {
                // A shape mismatch means the entry was written by an
                // incompatible version; treat it as a miss.
                log_warn!("Discarding unreadable cache entry {}: {}", key, e);
                entries.remove(key);
                self.write_locked(&entries);
                None
            }
        }
    }

    /// Stores a value with the current timestamp and flushes the snapshot.
    pub fn set<T: Serialize>(&self, key: &str, value: &T, validators: Validators) {
        let data = match serde_json::to_value(value) {
            Ok(data) => data,
            Err(e) => {
                log_warn!("Failed to serialize cache entry {}: {}", key, e);
                return;
            }
        };

        let mut entries = self.entries.lock();
        entries.insert(
            key.to_string(),
            CacheEntry {
                data,
                timestamp: Utc::now().timestamp_millis(),
                validators,
            },
        );
        self.write_locked(&entries);
    }

    /// Evicts every expired entry, flushing only if something was evicted.
    /// Returns how many entries were removed.
    pub fn sweep(&self) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| !self.is_expired(entry));
        let evicted = before - entries.len();

        if evicted > 0 {
            log_debug!("Cache sweep evicted {} entries", evicted);
            self.write_locked(&entries);
        }
        evicted
    }

    /// Drops every entry and flushes the now-empty snapshot.
    pub fn clear(&self) {
        let mut entries = self.entries.lock();
        entries.clear();
        self.write_locked(&entries);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Age of the entry under `key`, if present.
    pub fn entry_age(&self, key: &str) -> Option<Duration> {
        let entries = self.entries.lock();
        let entry = entries.get(key)?;
        Some(Self::age_of(entry))
    }

    /// Key and age of every entry, oldest first.
    pub fn entry_ages(&self) -> Vec<(String, Duration)> {
        let entries = self.entries.lock();
        let mut ages: Vec<(String, Duration)> = entries
            .iter()
            .map(|(key, entry)| (key.clone(), Self::age_of(entry)))
            .collect();
        ages.sort_by(|a, b| b.1.cmp(&a.1));
        ages
    }

    /// Writes the snapshot out. Failures are logged, never surfaced.
    pub fn flush(&self) {
        let entries = self.entries.lock();
        self.write_locked(&entries);
    }

    fn is_expired(&self, entry: &CacheEntry) -> bool {
        Self::age_of(entry) > self.ttl
    }

    fn age_of(entry: &CacheEntry) -> Duration {
        let age_millis = Utc::now()
            .timestamp_millis()
            .saturating_sub(entry.timestamp);
        Duration::from_millis(age_millis.max(0).unsigned_abs())
    }

    fn load_snapshot(path: &Path, ttl: Duration) -> HashMap<String, CacheEntry> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => return HashMap::new(),
        };

        match serde_json::from_str::<HashMap<String, CacheEntry>>(&content) {
            Ok(mut entries) => {
                let now = Utc::now().timestamp_millis();
                entries.retain(|_, entry| {
                    let age = now.saturating_sub(entry.timestamp).max(0);
                    Duration::from_millis(age.unsigned_abs()) <= ttl
                });
                log_debug!(
                    "Loaded {} cache entries from {}",
                    entries.len(),
                    path.display()
                );
                entries
            }
            Err(e) => {
                log_warn!("Failed to load cache from {}: {}", path.display(), e);
                HashMap::new()
            }
        }
    }

    fn write_locked(&self, entries: &HashMap<String, CacheEntry>) {
        if let Err(e) = Self::write_snapshot(&self.path, entries) {
            log_warn!("Failed to save cache to {}: {}", self.path.display(), e);
        }
    }

    /// Atomic write using temp file + rename
    fn write_snapshot(path: &Path, entries: &HashMap<String, CacheEntry>) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create cache directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string(entries)?;

        let temp_path = path.with_extension("json.tmp");
        let mut file = fs::File::create(&temp_path)
            .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Drop for CacheStore {
    fn drop(&mut self) {
        self.flush();
    }
}

/// Spawns the periodic sweep, ticking once per retention window.
///
/// The handle can be aborted; short-lived commands simply drop it after
/// their fetch completes.
pub fn start_sweeper(store: Arc<CacheStore>) -> tokio::task::JoinHandle<()> {
    let period = store.ttl;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // The first tick fires immediately; skip it.
        interval.tick().await;
        loop {
            interval.tick().await;
            store.sweep();
        }
    })
}
