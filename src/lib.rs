// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ryda routes: group motorcycle ride catalog and rosters.
//!
//! This crate provides the backend API for publishing ride routes and
//! letting riders join and leave them within each route's capacity.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use services::RosterService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub roster: RosterService,
}
