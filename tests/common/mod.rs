#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use asset_tracker::{
    config::ConfigManager,
    core::{FixedClock, LedgerStore},
    storage::JsonStorage,
};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn day(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).expect("valid date")
}

/// Creates a unique base directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Opens a store over `base` whose clock is pinned to `today`.
pub fn open_store(base: &Path, today: NaiveDate) -> LedgerStore {
    let storage = JsonStorage::new(Some(base.to_path_buf()), Some(3)).expect("create json storage");
    LedgerStore::open(Box::new(storage), Box::new(FixedClock::new(today))).expect("open store")
}

/// Creates an isolated store and config manager sharing one temp directory.
pub fn setup_test_env() -> (LedgerStore, ConfigManager, PathBuf) {
    let base = temp_base();
    let store = open_store(&base, day(1, 31));
    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");
    (store, config_manager, base)
}
