// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::Response;
use ryda_routes::config::Config;
use ryda_routes::db::CatalogStore;
use ryda_routes::middleware::auth::create_jwt;
use ryda_routes::models::{Difficulty, Identity, NewRoute, Route};
use ryda_routes::routes::create_router;
use ryda_routes::services::RosterService;
use ryda_routes::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a Firestore-backed store (requires the emulator).
#[allow(dead_code)]
pub async fn test_firestore_store() -> CatalogStore {
    CatalogStore::firestore("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Roster service over an empty in-memory catalog.
#[allow(dead_code)]
pub fn empty_roster() -> RosterService {
    RosterService::new(CatalogStore::in_memory_with_routes(vec![]))
}

/// Create a test app over the given store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app_with(store: CatalogStore, config: Config) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        config,
        roster: RosterService::new(store),
    });

    (create_router(state.clone()), state)
}

/// Create a test app over the seeded in-memory catalog.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with(CatalogStore::in_memory(), Config::test_default())
}

#[allow(dead_code)]
pub fn rider(key: &str, name: &str) -> Identity {
    Identity::new(key, name)
}

/// Bearer token for `identity` signed with the test key.
#[allow(dead_code)]
pub fn create_test_jwt(identity: &Identity) -> String {
    create_jwt(identity, &Config::test_default().jwt_signing_key).unwrap()
}

/// A complete route draft.
#[allow(dead_code)]
pub fn new_route(title: &str, max_participants: Option<i64>) -> NewRoute {
    NewRoute {
        title: title.to_string(),
        description: "Coastal loop with a coffee stop".to_string(),
        difficulty: Difficulty::Intermediate.to_string(),
        distance: "120 miles".to_string(),
        duration: "4 hours".to_string(),
        start_location: "Santa Monica, CA".to_string(),
        end_location: "Malibu, CA".to_string(),
        date: "2026-11-14".to_string(),
        time: "08:00".to_string(),
        meeting_point: "Pier parking lot".to_string(),
        max_participants,
        highlights: vec!["Ocean views".to_string()],
        requirements: vec!["Full gear".to_string()],
        map_image: None,
    }
}

/// Read a JSON response body.
#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Names on the roster, in order.
#[allow(dead_code)]
pub fn roster_names(route: &Route) -> Vec<String> {
    route.participants.iter().map(|p| p.name.clone()).collect()
}
