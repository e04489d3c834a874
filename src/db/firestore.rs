// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore catalog backend.
//!
//! The whole catalog lives in one document (`catalogs/routes`). Commits
//! re-read the stored revision and write inside a Firestore transaction.
//! The read is bound to the transaction, so a concurrent commit from another
//! instance aborts ours instead of being overwritten.

use crate::db::{collections, CatalogSnapshot, StoreError};
use firestore::errors::FirestoreError;
use firestore::FirestoreConsistencySelector;

/// Aborted or otherwise retryable commits are contention, not I/O failure.
fn commit_error(e: FirestoreError) -> StoreError {
    match e {
        FirestoreError::DatabaseError(ref db) if db.retry_possible => {
            StoreError::Contended(e.to_string())
        }
        FirestoreError::DataConflictError(_) => StoreError::Contended(e.to_string()),
        other => StoreError::Io(format!("Transaction commit failed: {}", other)),
    }
}

/// Firestore-backed catalog.
#[derive(Clone)]
pub struct FirestoreCatalog {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreCatalog {
    /// Connect to Firestore.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, StoreError> {
        // The emulator accepts any token; skip credential discovery
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id).await.map_err(|e| {
            StoreError::Unavailable(format!("Failed to connect to Firestore: {}", e))
        })?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    async fn create_emulator_client(project_id: &str) -> Result<Self, StoreError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            StoreError::Unavailable(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Backend with no connection; every operation fails with
    /// [`StoreError::Unavailable`].
    pub fn new_offline() -> Self {
        Self { client: None }
    }

    fn get_client(&self) -> Result<&firestore::FirestoreDb, StoreError> {
        self.client
            .as_ref()
            .ok_or_else(|| StoreError::Unavailable("Database not connected (offline mode)".to_string()))
    }

    pub(crate) async fn read(&self) -> Result<Option<CatalogSnapshot>, StoreError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::CATALOGS)
            .obj()
            .one(collections::ROUTES_DOC)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))
    }

    pub(crate) async fn commit(
        &self,
        snapshot: &CatalogSnapshot,
        expected: u64,
    ) -> Result<(), StoreError> {
        let client = self.get_client()?;

        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| StoreError::Io(format!("Failed to begin transaction: {}", e)))?;

        // Reads through this client join the transaction
        let tx_client = client.clone_with_consistency_selector(
            FirestoreConsistencySelector::Transaction(transaction.transaction_id().clone()),
        );

        let current: Option<CatalogSnapshot> = tx_client
            .fluent()
            .select()
            .by_id_in(collections::CATALOGS)
            .obj()
            .one(collections::ROUTES_DOC)
            .await
            .map_err(|e| match e {
                FirestoreError::DatabaseError(ref db) if db.retry_possible => {
                    StoreError::Contended(e.to_string())
                }
                other => {
                    StoreError::Io(format!("Failed to read catalog in transaction: {}", other))
                }
            })?;

        let found = current.map(|s| s.revision).unwrap_or(0);
        if found != expected {
            let _ = transaction.rollback().await;
            return Err(StoreError::Conflict { expected, found });
        }

        client
            .fluent()
            .update()
            .in_col(collections::CATALOGS)
            .document_id(collections::ROUTES_DOC)
            .object(snapshot)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                StoreError::Io(format!("Failed to add catalog to transaction: {}", e))
            })?;

        transaction.commit().await.map_err(commit_error)?;

        tracing::debug!(revision = snapshot.revision, "Catalog document committed");
        Ok(())
    }
}
