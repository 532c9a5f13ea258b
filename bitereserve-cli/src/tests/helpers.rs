//! Test helpers for seeding SQLite databases and driving async commands.

use std::future::Future;

use bitereserve_core::RestaurantRecord;
use bitereserve_data::{DEFAULT_TABLE, SqliteRestaurantStore};
use camino::Utf8PathBuf;
use tempfile::TempDir;

/// A throwaway directory holding one SQLite database.
pub(super) struct SeededDatabase {
    _dir: TempDir,
    pub(super) path: Utf8PathBuf,
}

impl SeededDatabase {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        let path = root.join("restaurants.db");
        std::fs::write(&path, b"").expect("create database file");
        // Opening prepares the schema.
        SqliteRestaurantStore::open(&path, DEFAULT_TABLE).expect("prepare schema");
        Self { _dir: dir, path }
    }

    pub(super) fn insert(&self, record: &RestaurantRecord) {
        self.open().insert(record).expect("seed row");
    }

    pub(super) fn records(&self) -> Vec<RestaurantRecord> {
        use bitereserve_core::{PageRequest, RestaurantStore};

        let store = self.open();
        block_on(store.list_restaurants(PageRequest::first(1000))).expect("list rows")
    }

    fn open(&self) -> SqliteRestaurantStore {
        SqliteRestaurantStore::open(&self.path, DEFAULT_TABLE).expect("open database")
    }
}

/// Drive `future` to completion on a single-threaded runtime.
pub(super) fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("build test runtime")
        .block_on(future)
}
