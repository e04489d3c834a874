// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Route catalog storage.
//!
//! The catalog is read and written as one snapshot. Every mutation is
//! load → modify → commit, where the commit is a compare-and-swap on the
//! snapshot revision; a lost race is retried a bounded number of times.

pub mod file;
pub mod firestore;
pub mod memory;
pub mod seed;

pub use file::FileCatalog;
pub use firestore::FirestoreCatalog;
pub use memory::MemoryCatalog;

use crate::models::Route;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Collection and document names for the Firestore backend.
pub mod collections {
    pub const CATALOGS: &str = "catalogs";
    /// Single document holding the full route catalog
    pub const ROUTES_DOC: &str = "routes";
}

/// Commits attempted before a conflicting write is reported to the caller.
pub const MAX_COMMIT_ATTEMPTS: u32 = 3;

/// Durable catalog state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSnapshot {
    /// Incremented on every successful commit; 0 means never written.
    #[serde(default)]
    pub revision: u64,
    /// Time of the last commit (RFC3339)
    #[serde(default)]
    pub updated_at: String,
    pub routes: Vec<Route>,
}

impl CatalogSnapshot {
    /// Unwritten catalog holding the demo routes.
    pub fn seeded() -> Self {
        Self {
            revision: 0,
            updated_at: String::new(),
            routes: seed::seed_routes(),
        }
    }

    /// Id for the next created route.
    pub fn next_route_id(&self) -> u64 {
        next_route_id(&self.routes)
    }
}

/// One past the largest id in `routes`.
fn next_route_id(routes: &[Route]) -> u64 {
    routes.iter().map(|r| r.id).max().unwrap_or(0) + 1
}

/// Catalog storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Catalog I/O failed: {0}")]
    Io(String),

    #[error("Catalog snapshot is corrupt: {0}")]
    Corrupt(String),

    #[error("Catalog changed concurrently (expected revision {expected}, found {found})")]
    Conflict { expected: u64, found: u64 },

    /// The backend aborted the commit because of a concurrent writer.
    #[error("Catalog commit contended: {0}")]
    Contended(String),

    #[error("Catalog backend unavailable: {0}")]
    Unavailable(String),
}

/// Result of a catalog edit: whether the snapshot needs to be written.
pub enum Mutation<T> {
    Changed(T),
    Unchanged(T),
}

#[derive(Clone)]
enum Backend {
    Memory(MemoryCatalog),
    File(FileCatalog),
    Firestore(FirestoreCatalog),
}

impl Backend {
    async fn read(&self) -> Result<Option<CatalogSnapshot>, StoreError> {
        match self {
            Backend::Memory(m) => m.read(),
            Backend::File(f) => f.read().await,
            Backend::Firestore(db) => db.read().await,
        }
    }

    async fn commit(&self, snapshot: &CatalogSnapshot, expected: u64) -> Result<(), StoreError> {
        match self {
            Backend::Memory(m) => m.commit(snapshot, expected),
            Backend::File(f) => f.commit(snapshot, expected).await,
            Backend::Firestore(db) => db.commit(snapshot, expected).await,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Backend::Memory(_) => "memory",
            Backend::File(_) => "file",
            Backend::Firestore(_) => "firestore",
        }
    }
}

/// Route catalog store.
///
/// Read-modify-write commits from one process are serialized by
/// `commit_lock`; the revision check guards against other processes.
#[derive(Clone)]
pub struct CatalogStore {
    backend: Backend,
    commit_lock: Arc<Mutex<()>>,
}

impl CatalogStore {
    fn with_backend(backend: Backend) -> Self {
        Self {
            backend,
            commit_lock: Arc::new(Mutex::new(())),
        }
    }

    /// In-process catalog that starts from the seed routes.
    pub fn in_memory() -> Self {
        Self::with_backend(Backend::Memory(MemoryCatalog::new()))
    }

    /// In-process catalog preloaded with `routes` (no seeding).
    pub fn in_memory_with_routes(routes: Vec<Route>) -> Self {
        Self::with_backend(Backend::Memory(MemoryCatalog::with_routes(routes)))
    }

    /// JSON snapshot on the local filesystem.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::with_backend(Backend::File(FileCatalog::new(path)))
    }

    /// Single-document catalog in Firestore.
    pub async fn firestore(project_id: &str) -> Result<Self, StoreError> {
        Ok(Self::with_backend(Backend::Firestore(
            FirestoreCatalog::new(project_id).await?,
        )))
    }

    /// Store whose every operation fails (no backend connected).
    pub fn offline() -> Self {
        Self::with_backend(Backend::Firestore(FirestoreCatalog::new_offline()))
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    // ─── Snapshot Operations ─────────────────────────────────────

    /// Load the current catalog, falling back to the seed routes.
    ///
    /// Cached participant counts are re-derived from the rosters.
    pub async fn load_catalog(&self) -> Result<CatalogSnapshot, StoreError> {
        let mut snapshot = self
            .backend
            .read()
            .await?
            .unwrap_or_else(CatalogSnapshot::seeded);

        for route in &mut snapshot.routes {
            route.sync_participant_count();
        }
        Ok(snapshot)
    }

    /// Replace the durable catalog with `snapshot`.
    ///
    /// Fails with [`StoreError::Conflict`] if the stored revision is no longer
    /// `snapshot.revision`. Returns the new revision.
    pub async fn save_catalog(&self, snapshot: &CatalogSnapshot) -> Result<u64, StoreError> {
        let next = CatalogSnapshot {
            revision: snapshot.revision + 1,
            updated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            routes: snapshot.routes.clone(),
        };
        self.backend.commit(&next, snapshot.revision).await?;

        tracing::debug!(
            backend = self.backend.name(),
            revision = next.revision,
            routes = next.routes.len(),
            "Catalog committed"
        );
        Ok(next.revision)
    }

    /// Overwrite the catalog with the seed routes.
    pub async fn reset_catalog(&self) -> Result<(), StoreError> {
        self.commit_with(|routes: &mut Vec<Route>| {
            *routes = seed::seed_routes();
            Ok::<_, StoreError>(Mutation::Changed(()))
        })
        .await?;
        tracing::info!(backend = self.backend.name(), "Catalog reset to seed routes");
        Ok(())
    }

    /// Run `edit` against a fresh snapshot and commit the result.
    ///
    /// `edit` may run more than once: a revision conflict reloads the
    /// catalog and retries, up to [`MAX_COMMIT_ATTEMPTS`] times.
    pub async fn commit_with<T, E, F>(&self, mut edit: F) -> Result<T, E>
    where
        F: FnMut(&mut Vec<Route>) -> Result<Mutation<T>, E>,
        E: From<StoreError>,
    {
        let _guard = self.commit_lock.lock().await;

        let mut attempt = 1;
        loop {
            let mut snapshot = self.load_catalog().await?;
            let value = match edit(&mut snapshot.routes)? {
                Mutation::Unchanged(value) => return Ok(value),
                Mutation::Changed(value) => value,
            };

            for route in &mut snapshot.routes {
                route.sync_participant_count();
            }

            match self.save_catalog(&snapshot).await {
                Ok(_) => return Ok(value),
                Err(e @ (StoreError::Conflict { .. } | StoreError::Contended(_)))
                    if attempt < MAX_COMMIT_ATTEMPTS =>
                {
                    tracing::warn!(attempt, error = %e, "Catalog commit conflict, retrying");
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    // ─── Route Operations ────────────────────────────────────────

    /// Append `route` under the next free id and return the stored record.
    pub async fn create_route(&self, route: Route) -> Result<Route, StoreError> {
        self.commit_with(|routes: &mut Vec<Route>| {
            let mut created = route.clone();
            created.id = next_route_id(routes);
            created.sync_participant_count();
            routes.push(created.clone());
            Ok::<_, StoreError>(Mutation::Changed(created))
        })
        .await
    }

    pub async fn get_route_by_id(&self, id: u64) -> Result<Option<Route>, StoreError> {
        let snapshot = self.load_catalog().await?;
        Ok(snapshot.routes.into_iter().find(|r| r.id == id))
    }

    /// Apply `edit` to route `id` and commit.
    ///
    /// Returns `Ok(None)` without writing if no route has that id. An error
    /// from `edit` aborts the operation with nothing written.
    pub async fn update_route<T, E, F>(&self, id: u64, mut edit: F) -> Result<Option<T>, E>
    where
        F: FnMut(&mut Route) -> Result<T, E>,
        E: From<StoreError>,
    {
        self.commit_with(|routes: &mut Vec<Route>| {
            let Some(route) = routes.iter_mut().find(|r| r.id == id) else {
                return Ok(Mutation::Unchanged(None));
            };
            let value = edit(route)?;
            Ok(Mutation::Changed(Some(value)))
        })
        .await
    }

    /// Remove route `id`. Returns whether a route was removed.
    pub async fn delete_route(&self, id: u64) -> Result<bool, StoreError> {
        self.commit_with(|routes: &mut Vec<Route>| {
            let before = routes.len();
            routes.retain(|r| r.id != id);
            Ok::<_, StoreError>(if routes.len() == before {
                Mutation::Unchanged(false)
            } else {
                Mutation::Changed(true)
            })
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_snapshot_loads_seed() {
        let store = CatalogStore::in_memory();
        let snapshot = store.load_catalog().await.unwrap();
        assert_eq!(snapshot.revision, 0);
        assert_eq!(snapshot.routes.len(), 3);
        assert_eq!(snapshot.next_route_id(), 4);
    }

    #[tokio::test]
    async fn test_save_increments_revision() {
        let store = CatalogStore::in_memory_with_routes(vec![]);
        let snapshot = store.load_catalog().await.unwrap();
        let revision = store.save_catalog(&snapshot).await.unwrap();
        assert_eq!(revision, snapshot.revision + 1);
    }

    #[tokio::test]
    async fn test_stale_save_conflicts() {
        let store = CatalogStore::in_memory();
        let stale = store.load_catalog().await.unwrap();
        store.save_catalog(&stale).await.unwrap();

        let err = store.save_catalog(&stale).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict { expected: 0, found: 1 }));
    }

    #[tokio::test]
    async fn test_delete_missing_route_does_not_write() {
        let store = CatalogStore::in_memory();
        assert!(!store.delete_route(99).await.unwrap());
        // Nothing committed: still the unwritten seed
        assert_eq!(store.load_catalog().await.unwrap().revision, 0);
    }

    /// Commit a new revision behind the store's back, as another process would.
    fn bump_revision(mem: &MemoryCatalog) {
        let current = mem.read().unwrap().unwrap_or_else(CatalogSnapshot::seeded);
        let next = CatalogSnapshot {
            revision: current.revision + 1,
            ..current.clone()
        };
        mem.commit(&next, current.revision).unwrap();
    }

    #[tokio::test]
    async fn test_commit_retries_after_outside_write() {
        let mem = MemoryCatalog::new();
        let store = CatalogStore::with_backend(Backend::Memory(mem.clone()));

        let mut calls = 0;
        let id = store
            .commit_with(|routes: &mut Vec<Route>| {
                calls += 1;
                if calls == 1 {
                    bump_revision(&mem);
                }
                routes.retain(|r| r.id != 1);
                Ok::<_, StoreError>(Mutation::Changed(calls))
            })
            .await
            .unwrap();

        assert_eq!(id, 2);
        let snapshot = store.load_catalog().await.unwrap();
        // One outside write plus ours
        assert_eq!(snapshot.revision, 2);
        assert!(snapshot.routes.iter().all(|r| r.id != 1));
    }

    #[tokio::test]
    async fn test_commit_gives_up_after_max_attempts() {
        let mem = MemoryCatalog::new();
        let store = CatalogStore::with_backend(Backend::Memory(mem.clone()));

        let mut calls = 0;
        let err = store
            .commit_with(|routes: &mut Vec<Route>| {
                calls += 1;
                bump_revision(&mem);
                routes.clear();
                Ok::<_, StoreError>(Mutation::Changed(()))
            })
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Conflict { .. }));
        assert_eq!(calls, MAX_COMMIT_ATTEMPTS);
        // None of our edits landed
        let snapshot = store.load_catalog().await.unwrap();
        assert_eq!(snapshot.revision, MAX_COMMIT_ATTEMPTS as u64);
        assert_eq!(snapshot.routes.len(), 3);
    }

    #[tokio::test]
    async fn test_create_route_after_gap_uses_next_id() {
        let mut routes = seed::seed_routes();
        routes.retain(|r| r.id != 2);
        routes[1].id = 10;
        let store = CatalogStore::in_memory_with_routes(routes.clone());

        let created = store.create_route(routes[0].clone()).await.unwrap();
        assert_eq!(created.id, 11);
        assert_eq!(store.load_catalog().await.unwrap().next_route_id(), 12);
    }

    #[tokio::test]
    async fn test_offline_store_reports_unavailable() {
        let store = CatalogStore::offline();
        let err = store.load_catalog().await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }
}
