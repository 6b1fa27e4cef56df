use repo_atlas::cache::{CacheStore, Validators, start_sweeper};

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::sleep;
use std::time::Duration;
use tempfile::TempDir;

fn snapshot_path(dir: &TempDir) -> PathBuf {
    dir.path().join("cache.json")
}

fn validators(etag: &str) -> Validators {
    Validators {
        etag: Some(etag.to_string()),
        last_modified: Some("Wed, 01 Jan 2025 00:00:00 GMT".to_string()),
    }
}

#[test]
fn test_set_then_get_round_trips_value_and_validators() {
    let dir = TempDir::new().expect("Failed to create temporary directory");
    let store = CacheStore::open(snapshot_path(&dir), Duration::from_secs(3600));

    store.set("repo_structure:acme/widgets", &vec![1u64, 2, 3], validators("\"abc\""));

    let (value, meta) = store
        .get::<Vec<u64>>("repo_structure:acme/widgets")
        .expect("entry should be present");
    assert_eq!(value, vec![1, 2, 3]);
    assert_eq!(meta.etag.as_deref(), Some("\"abc\""));
    assert!(meta.last_modified.is_some());
}

#[test]
fn test_entries_expire_after_retention_window() {
    let dir = TempDir::new().expect("Failed to create temporary directory");
    let store = CacheStore::open(snapshot_path(&dir), Duration::from_millis(100));

    store.set("key", &"value".to_string(), Validators::default());
    assert!(store.get::<String>("key").is_some(), "fresh entry readable");

    sleep(Duration::from_millis(150));

    assert!(
        store.get::<String>("key").is_none(),
        "entry past the window is evicted"
    );
    assert!(store.get::<String>("key").is_none(), "and stays gone");
    assert_eq!(store.len(), 0);
}

#[test]
fn test_snapshot_survives_reopen() {
    let dir = TempDir::new().expect("Failed to create temporary directory");
    let path = snapshot_path(&dir);

    {
        let store = CacheStore::open(path.clone(), Duration::from_secs(3600));
        store.set("key", &42u32, validators("\"tag\""));
        // Drop flushes the snapshot
    }

    let reopened = CacheStore::open(path, Duration::from_secs(3600));
    let (value, meta) = reopened.get::<u32>("key").expect("persisted entry");
    assert_eq!(value, 42);
    assert_eq!(meta.etag.as_deref(), Some("\"tag\""));
}

#[test]
fn test_expired_entries_are_dropped_during_load() {
    let dir = TempDir::new().expect("Failed to create temporary directory");
    let path = snapshot_path(&dir);

    {
        let store = CacheStore::open(path.clone(), Duration::from_millis(50));
        store.set("key", &1u8, Validators::default());
    }

    sleep(Duration::from_millis(100));

    let reopened = CacheStore::open(path, Duration::from_millis(50));
    assert!(reopened.is_empty());
}

#[test]
fn test_malformed_snapshot_is_treated_as_empty() {
    let dir = TempDir::new().expect("Failed to create temporary directory");
    let path = snapshot_path(&dir);
    fs::write(&path, "{ not valid json").expect("Failed to write snapshot");

    let store = CacheStore::open(path, Duration::from_secs(3600));
    assert!(store.is_empty());

    // The store remains usable after discarding the bad blob
    store.set("key", &"ok".to_string(), Validators::default());
    assert!(store.get::<String>("key").is_some());
}

#[test]
fn test_clear_removes_everything_and_persists() {
    let dir = TempDir::new().expect("Failed to create temporary directory");
    let path = snapshot_path(&dir);

    let store = CacheStore::open(path.clone(), Duration::from_secs(3600));
    store.set("a", &1u8, Validators::default());
    store.set("b", &2u8, Validators::default());
    assert_eq!(store.len(), 2);

    store.clear();
    assert!(store.is_empty());
    drop(store);

    let reopened = CacheStore::open(path, Duration::from_secs(3600));
    assert!(reopened.is_empty());
}

#[test]
fn test_sweep_evicts_only_expired_entries() {
    let dir = TempDir::new().expect("Failed to create temporary directory");
    let store = CacheStore::open(snapshot_path(&dir), Duration::from_millis(100));

    store.set("old", &1u8, Validators::default());
    sleep(Duration::from_millis(150));
    store.set("fresh", &2u8, Validators::default());

    assert_eq!(store.sweep(), 1);
    assert!(store.get::<u8>("old").is_none());
    assert!(store.get::<u8>("fresh").is_some());
}

#[test]
fn test_entry_age_is_reported() {
    let dir = TempDir::new().expect("Failed to create temporary directory");
    let store = CacheStore::open(snapshot_path(&dir), Duration::from_secs(3600));

    store.set("key", &1u8, Validators::default());

    let age = store.entry_age("key").expect("entry exists");
    assert!(age < Duration::from_secs(5));
    assert!(store.entry_age("absent").is_none());

    let ages = store.entry_ages();
    assert_eq!(ages.len(), 1);
    assert_eq!(ages[0].0, "key");
}

#[test]
fn test_shape_mismatch_counts_as_miss() {
    let dir = TempDir::new().expect("Failed to create temporary directory");
    let store = CacheStore::open(snapshot_path(&dir), Duration::from_secs(3600));

    store.set("key", &"text".to_string(), Validators::default());

    assert!(store.get::<Vec<u64>>("key").is_none());
    assert!(store.get::<String>("key").is_none(), "mismatch evicts the entry");
}

#[tokio::test]
async fn test_background_sweeper_evicts_expired_entries() {
    let dir = TempDir::new().expect("Failed to create temporary directory");
    let store = Arc::new(CacheStore::open(
        snapshot_path(&dir),
        Duration::from_millis(100),
    ));

    store.set("key", &1u8, Validators::default());
    let handle = start_sweeper(Arc::clone(&store));

    tokio::time::sleep(Duration::from_millis(250)).await;
    handle.abort();

    assert_eq!(store.len(), 0, "sweeper removed the expired entry");
}
