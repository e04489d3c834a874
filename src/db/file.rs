// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON file catalog backend.
//!
//! Accepts both the revisioned snapshot written here and a bare array of
//! routes (the legacy web client's local storage export, read as revision 0).
//!
//! Commits take an exclusive lock on a sibling `.lock` file for the whole
//! check, write and rename, so writers in separate processes sharing one
//! path are serialized as well.

use crate::db::{CatalogSnapshot, StoreError};
use crate::models::Route;
use fs2::FileExt;
use serde::Deserialize;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Distinguishes temp files of concurrent commits within one process.
static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredCatalog {
    Snapshot(CatalogSnapshot),
    Legacy(Vec<Route>),
}

/// Catalog persisted as a single JSON document on disk.
#[derive(Clone)]
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub(crate) async fn read(&self) -> Result<Option<CatalogSnapshot>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(read_error(&self.path, e)),
        };
        decode(&self.path, &bytes).map(Some)
    }

    pub(crate) async fn commit(
        &self,
        snapshot: &CatalogSnapshot,
        expected: u64,
    ) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(snapshot)
            .map_err(|e| StoreError::Corrupt(format!("Failed to encode catalog: {}", e)))?;

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || commit_locked(&path, &bytes, expected))
            .await
            .map_err(|e| StoreError::Io(format!("Catalog commit task failed: {}", e)))?
    }
}

fn decode(path: &Path, bytes: &[u8]) -> Result<CatalogSnapshot, StoreError> {
    let stored: StoredCatalog = serde_json::from_slice(bytes)
        .map_err(|e| StoreError::Corrupt(format!("{}: {}", path.display(), e)))?;

    Ok(match stored {
        StoredCatalog::Snapshot(snapshot) => snapshot,
        StoredCatalog::Legacy(routes) => {
            tracing::info!(
                path = %path.display(),
                routes = routes.len(),
                "Loaded legacy route array"
            );
            CatalogSnapshot {
                revision: 0,
                updated_at: String::new(),
                routes,
            }
        }
    })
}

fn read_error(path: &Path, e: std::io::Error) -> StoreError {
    StoreError::Io(format!("Failed to read {}: {}", path.display(), e))
}

/// `path` with `suffix` appended to its file name.
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("catalog"));
    name.push(suffix);
    path.with_file_name(name)
}

/// Revision check, write and rename, all under the exclusive file lock.
fn commit_locked(path: &Path, bytes: &[u8], expected: u64) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| StoreError::Io(format!("Failed to create {}: {}", parent.display(), e)))?;
    }

    let lock_path = sibling(path, ".lock");
    let lock_file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&lock_path)
        .map_err(|e| StoreError::Io(format!("Failed to open {}: {}", lock_path.display(), e)))?;
    lock_file
        .lock_exclusive()
        .map_err(|e| StoreError::Io(format!("Failed to lock {}: {}", lock_path.display(), e)))?;

    let found = match fs::read(path) {
        Ok(current) => decode(path, &current)?.revision,
        Err(e) if e.kind() == ErrorKind::NotFound => 0,
        Err(e) => return Err(read_error(path, e)),
    };
    if found != expected {
        return Err(StoreError::Conflict { expected, found });
    }

    let tmp_path = sibling(
        path,
        &format!(
            ".{}.{}.tmp",
            std::process::id(),
            TMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ),
    );
    let written = File::create(&tmp_path)
        .and_then(|mut tmp| {
            tmp.write_all(bytes)?;
            tmp.sync_all()
        })
        .and_then(|()| fs::rename(&tmp_path, path));

    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io(format!(
            "Failed to replace {}: {}",
            path.display(),
            e
        )));
    }

    // The lock is released when `lock_file` is closed.
    drop(lock_file);
    Ok(())
}
