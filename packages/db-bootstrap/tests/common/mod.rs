#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use db_bootstrap::{DialectConfig, SchemaReset, TestConfig};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

#[ctor::ctor]
fn init_logging() {
    test_support::logging::init();
}

/// Config with a single sqlite entry and `directory` as the storage dir.
pub fn sqlite_config(directory: &Path, storage: Option<PathBuf>) -> TestConfig {
    TestConfig::new(directory).with_dialect(
        "sqlite",
        DialectConfig {
            storage,
            ..DialectConfig::default()
        },
    )
}

/// Write `names` as regular files under `dir` and return their paths.
pub fn touch_files(dir: &Path, names: &[&str]) -> Vec<PathBuf> {
    names
        .iter()
        .map(|name| {
            let path = dir.join(name);
            fs::write(&path, b"fixture").expect("write fixture file");
            path
        })
        .collect()
}

/// Schema double that records drop calls and what the directory looked like
/// when the drop ran.
pub struct FakeSchema {
    pub fail: bool,
    pub watch_dir: PathBuf,
    drops: AtomicUsize,
    files_seen_at_drop: Mutex<Option<usize>>,
}

impl FakeSchema {
    pub fn new(watch_dir: &Path) -> Self {
        Self {
            fail: false,
            watch_dir: watch_dir.to_path_buf(),
            drops: AtomicUsize::new(0),
            files_seen_at_drop: Mutex::new(None),
        }
    }

    pub fn failing(watch_dir: &Path) -> Self {
        Self {
            fail: true,
            ..Self::new(watch_dir)
        }
    }

    pub fn drops(&self) -> usize {
        self.drops.load(Ordering::SeqCst)
    }

    pub fn files_seen_at_drop(&self) -> Option<usize> {
        *self.files_seen_at_drop.lock().expect("lock")
    }
}

#[async_trait]
impl SchemaReset for FakeSchema {
    async fn drop_all_tables(&self) -> Result<(), DbErr> {
        self.drops.fetch_add(1, Ordering::SeqCst);
        *self.files_seen_at_drop.lock().expect("lock") = Some(count_files(&self.watch_dir));
        if self.fail {
            return Err(DbErr::Custom("connection refused".to_string()));
        }
        Ok(())
    }
}

pub fn count_files(dir: &Path) -> usize {
    fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .filter(|e| e.path().is_file())
                .count()
        })
        .unwrap_or(0)
}

/// Single-connection in-memory sqlite database.
pub async fn memory_conn() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.min_connections(1).max_connections(1).sqlx_logging(false);
    Database::connect(opt).await.expect("connect sqlite")
}

/// File-backed sqlite pool allowed to open up to `max` connections.
pub async fn pooled_file_conn(path: &Path, max: u32) -> DatabaseConnection {
    let mut opt = ConnectOptions::new(format!("sqlite://{}?mode=rwc", path.display()));
    opt.min_connections(1).max_connections(max).sqlx_logging(false);
    Database::connect(opt).await.expect("connect sqlite pool")
}
