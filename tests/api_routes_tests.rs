// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP tests for the route catalog and roster endpoints.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use ryda_routes::config::Config;
use ryda_routes::db::CatalogStore;
use ryda_routes::models::Identity;
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;
use common::{body_json, create_test_app, create_test_app_with, create_test_jwt, rider};

fn request(method: &str, uri: &str, who: &Identity, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::AUTHORIZATION,
            format!("Bearer {}", create_test_jwt(who)),
        );

    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn draft(max_participants: Value) -> Value {
    json!({
        "title": "Big Sur Sunday",
        "description": "Carmel to Big Sur and back",
        "difficulty": "Advanced",
        "distance": "90 miles",
        "duration": "3 hours",
        "startLocation": "Carmel, CA",
        "endLocation": "Big Sur, CA",
        "date": "2026-11-22",
        "time": "09:00",
        "meetingPoint": "Carmel Plaza",
        "maxParticipants": max_participants,
        "highlights": ["Bixby Bridge", ""],
        "requirements": [],
        // Ignored on create
        "participants": [{"name": "Sneaky", "bike": "Other", "hasPassenger": false}],
        "currentParticipants": 9,
        "rating": 5.0
    })
}

#[tokio::test]
async fn test_list_routes_annotates_viewer() {
    let (app, _) = create_test_app();
    let response = app
        .oneshot(request("GET", "/api/routes", &rider("u-1", "Maya"), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let routes = body.as_array().unwrap();
    assert_eq!(routes.len(), 3);

    let first = &routes[0];
    assert_eq!(first["id"], 1);
    assert_eq!(first["title"], "Pacific Coast Highway Adventure");
    assert_eq!(first["currentParticipants"], 8);
    assert_eq!(first["spotsLeft"], 4);
    assert_eq!(first["rosterState"], "partial");
    assert_eq!(first["viewerJoined"], false);
    assert!(first["viewerParticipation"].is_null());
}

#[tokio::test]
async fn test_create_route_ignores_roster_fields() {
    let (app, _) = create_test_app();
    let creator = rider("u-1", "Maya");

    let response = app
        .oneshot(request("POST", "/api/routes", &creator, Some(draft(json!(10)))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["id"], 4);
    assert_eq!(body["participants"], json!([]));
    assert_eq!(body["currentParticipants"], 0);
    assert_eq!(body["rating"], 0.0);
    assert_eq!(body["creator"]["name"], "Maya");
    assert_eq!(body["highlights"], json!(["Bixby Bridge"]));
    assert_eq!(body["maxParticipants"], 10);
    assert_eq!(body["rosterState"], "empty");
}

#[tokio::test]
async fn test_create_route_unbounded() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(request(
            "POST",
            "/api/routes",
            &rider("u-1", "Maya"),
            Some(draft(json!(-1))),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["maxParticipants"], -1);
    assert!(body["spotsLeft"].is_null());
}

#[tokio::test]
async fn test_create_route_rejects_zero_capacity() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(request(
            "POST",
            "/api/routes",
            &rider("u-1", "Maya"),
            Some(draft(json!(0))),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_join_full_route_returns_conflict() {
    let (app, state) = create_test_app();
    let alice = rider("u-alice", "Alice");
    let bob = rider("u-bob", "Bob");

    let response = app
        .clone()
        .oneshot(request(
            "PATCH",
            "/api/routes/1",
            &alice,
            Some(json!({ "maxParticipants": 9 })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/routes/1/join",
            &alice,
            Some(json!({ "bike": "Yamaha MT-07", "hasPassenger": false })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["viewerJoined"], true);
    assert_eq!(body["viewerParticipation"]["bike"], "Yamaha MT-07");
    assert_eq!(body["rosterState"], "full");
    assert_eq!(body["spotsLeft"], 0);

    let response = app
        .oneshot(request(
            "POST",
            "/api/routes/1/join",
            &bob,
            Some(json!({ "bike": "Honda Rebel" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["error"], "route_full");

    let route = state.roster.get_route(1).await.unwrap();
    assert_eq!(route.current_participants, 9);
    assert!(!route.is_participant(&bob.key));
}

#[tokio::test]
async fn test_join_twice_returns_conflict() {
    let (app, _) = create_test_app();
    let alice = rider("u-alice", "Alice");
    let body = json!({ "bike": "Ducati Monster", "hasPassenger": true, "passengerName": "Jo" });

    let first = app
        .clone()
        .oneshot(request("POST", "/api/routes/3/join", &alice, Some(body.clone())))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .oneshot(request("POST", "/api/routes/3/join", &alice, Some(body)))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(second).await["error"], "conflict");
}

#[tokio::test]
async fn test_leave_route() {
    let (app, _) = create_test_app();
    let alice = rider("u-alice", "Alice");

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/routes/2/join",
            &alice,
            Some(json!({ "bike": "BMW S1000RR" })),
        ))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["currentParticipants"], 7);

    let response = app
        .clone()
        .oneshot(request("POST", "/api/routes/2/leave", &alice, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["currentParticipants"], 6);
    assert_eq!(body["viewerJoined"], false);

    // Leaving again is not a no-op success
    let response = app
        .oneshot(request("POST", "/api/routes/2/leave", &alice, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (app, _) = create_test_app();
    let who = rider("u-1", "Maya");

    for (method, uri) in [
        ("GET", "/api/routes/999"),
        ("POST", "/api/routes/999/leave"),
    ] {
        let response = app
            .clone()
            .oneshot(request(method, uri, &who, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{} {}", method, uri);
        assert_eq!(body_json(response).await["error"], "not_found");
    }
}

#[tokio::test]
async fn test_delete_route() {
    let (app, state) = create_test_app();
    let who = rider("u-1", "Maya");

    let response = app
        .clone()
        .oneshot(request("DELETE", "/api/routes/2", &who, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["deleted"], true);

    let response = app
        .oneshot(request("DELETE", "/api/routes/2", &who, None))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["deleted"], false);

    assert_eq!(state.roster.load_catalog().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_catalog_reset_restores_seed() {
    let (app, state) = create_test_app();
    let who = rider("u-1", "Maya");

    state.roster.delete_route(1).await.unwrap();

    let response = app
        .oneshot(request("POST", "/api/catalog/reset", &who, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(state.roster.load_catalog().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_catalog_reset_disabled() {
    let config = Config {
        allow_catalog_reset: false,
        ..Config::test_default()
    };
    let (app, _) = create_test_app_with(CatalogStore::in_memory(), config);

    let response = app
        .oneshot(request("POST", "/api/catalog/reset", &rider("u-1", "Maya"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_storage_failure_hides_details() {
    let (app, _) = create_test_app_with(CatalogStore::offline(), Config::test_default());

    let response = app
        .oneshot(request("GET", "/api/routes", &rider("u-1", "Maya"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "storage_error");
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn test_bikes_list_is_public() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/bikes")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let bikes = body["bikes"].as_array().unwrap();
    assert_eq!(bikes.first().unwrap(), "Harley Davidson");
    assert_eq!(bikes.last().unwrap(), "Other");
}
