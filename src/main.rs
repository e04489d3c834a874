// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ryda Routes API Server
//!
//! Serves the ride route catalog and manages who is riding each route.

use ryda_routes::{
    config::{CatalogBackend, Config},
    db::CatalogStore,
    services::RosterService,
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Ryda Routes API");

    let store = match config.catalog_backend {
        CatalogBackend::Memory => CatalogStore::in_memory(),
        CatalogBackend::File => CatalogStore::file(config.catalog_path.clone()),
        CatalogBackend::Firestore => CatalogStore::firestore(&config.gcp_project_id)
            .await
            .expect("Failed to connect to Firestore"),
    };
    tracing::info!(
        backend = store.backend_name(),
        path = %config.catalog_path.display(),
        "Catalog store initialized"
    );

    let roster = RosterService::new(store);
    let routes = roster
        .load_catalog()
        .await
        .expect("Failed to load route catalog");
    tracing::info!(count = routes.len(), "Route catalog loaded");

    if config.allow_catalog_reset {
        tracing::warn!("Catalog reset endpoint is enabled");
    }

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        roster,
    });

    // Build router
    let app = ryda_routes::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ryda_routes=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
