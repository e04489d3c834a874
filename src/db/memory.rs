// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process catalog backend for tests and local development.

use crate::db::{CatalogSnapshot, StoreError};
use crate::models::Route;
use std::sync::{Arc, Mutex};

/// Catalog held in memory; clones share the same snapshot.
#[derive(Clone, Default)]
pub struct MemoryCatalog {
    state: Arc<Mutex<Option<CatalogSnapshot>>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog that already holds `routes` (revision 0).
    pub fn with_routes(routes: Vec<Route>) -> Self {
        Self {
            state: Arc::new(Mutex::new(Some(CatalogSnapshot {
                revision: 0,
                updated_at: String::new(),
                routes,
            }))),
        }
    }

    pub(crate) fn read(&self) -> Result<Option<CatalogSnapshot>, StoreError> {
        let state = self
            .state
            .lock()
            .map_err(|_| StoreError::Unavailable("memory catalog lock poisoned".to_string()))?;
        Ok(state.clone())
    }

    pub(crate) fn commit(
        &self,
        snapshot: &CatalogSnapshot,
        expected: u64,
    ) -> Result<(), StoreError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| StoreError::Unavailable("memory catalog lock poisoned".to_string()))?;

        let found = state.as_ref().map(|s| s.revision).unwrap_or(0);
        if found != expected {
            return Err(StoreError::Conflict { expected, found });
        }

        *state = Some(snapshot.clone());
        Ok(())
    }
}
