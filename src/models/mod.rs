// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod bikes;
pub mod identity;
pub mod request;
pub mod route;

pub use identity::Identity;
pub use request::{JoinRequest, NewRoute, RouteUpdate};
pub use route::{Capacity, Creator, Difficulty, Participant, RosterState, Route};
