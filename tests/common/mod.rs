#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use once_cell::sync::Lazy;
use tempfile::TempDir;
use wishcalc::{
    core::{AllocationEngine, WishListSession},
    domain::{Item, WishList},
    storage::JsonWishListStore,
};

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a unique directory that outlives the calling test.
pub fn temp_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// A session backed by an isolated store, plus the directory it lives in.
pub fn setup_session() -> (WishListSession, PathBuf) {
    let base = temp_dir();
    let store = JsonWishListStore::new(Some(base.join("backups")), Some(3));
    (WishListSession::new(Box::new(store)), base)
}

/// Builds and recalculates a flat list from `(name, cost)` pairs.
pub fn flat_list(cash: i64, refill: i64, items: &[(&str, i64)]) -> WishList {
    let mut list = WishList::with_cash(cash, refill);
    list.items = items
        .iter()
        .map(|(name, cost)| Item::new(*name, *cost))
        .collect();
    AllocationEngine::recalculate(&mut list);
    list
}

pub fn write_file(dir: &PathBuf, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write fixture");
    path
}
