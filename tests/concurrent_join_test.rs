// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Concurrent roster writers.
//!
//! Many riders racing for the last seats must never overfill a route, and
//! joins on different routes must not overwrite each other.

use ryda_routes::db::CatalogStore;
use ryda_routes::models::JoinRequest;
use ryda_routes::services::{RosterError, RosterService};

mod common;
use common::{empty_roster, new_route, rider};

const NUM_RIDERS: u32 = 20;
const SEATS: i64 = 5;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_joins_respect_capacity() {
    let roster = empty_roster();
    roster
        .create_route(&rider("u-lead", "Lead"), new_route("Rush", Some(SEATS)))
        .await
        .unwrap();

    let mut handles = vec![];
    for i in 0..NUM_RIDERS {
        let roster = roster.clone();
        handles.push(tokio::spawn(async move {
            let who = rider(&format!("u-{}", i), &format!("Rider {}", i));
            roster
                .join_route(1, &who, JoinRequest::solo("Yamaha MT-07"))
                .await
        }));
    }

    let mut joined = 0;
    let mut turned_away = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => joined += 1,
            Err(RosterError::CapacityExceeded { .. }) => turned_away += 1,
            Err(e) => panic!("unexpected error: {}", e),
        }
    }

    assert_eq!(joined, SEATS as u32);
    assert_eq!(turned_away, NUM_RIDERS - SEATS as u32);

    let route = roster.get_route(1).await.unwrap();
    assert_eq!(route.participants.len(), SEATS as usize);
    assert_eq!(route.current_participants, SEATS as u32);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_joins_on_different_routes_are_kept() {
    let roster = RosterService::new(CatalogStore::in_memory());

    // Routes 1..=3 are seeded; each gets its own stream of joiners
    let mut handles = vec![];
    for route_id in 1..=3u64 {
        for i in 0..3 {
            let roster = roster.clone();
            handles.push(tokio::spawn(async move {
                let who = rider(&format!("u-{}-{}", route_id, i), "Racer");
                roster
                    .join_route(route_id, &who, JoinRequest::solo("Kawasaki Ninja"))
                    .await
            }));
        }
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let counts: Vec<u32> = roster
        .load_catalog()
        .await
        .unwrap()
        .iter()
        .map(|r| r.current_participants)
        .collect();
    assert_eq!(counts, vec![11, 9, 15]);
}
