// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Request payloads accepted by the roster engine.
//!
//! Length limits are checked with `validator`; presence, trimming and enum
//! checks happen in the roster service.

use serde::Deserialize;
use validator::Validate;

/// Fields for a new route.
///
/// Roster fields (`participants`, `currentParticipants`), `rating`, `creator`
/// and `id` are not accepted; unknown JSON keys are ignored.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewRoute {
    #[validate(length(max = 200))]
    pub title: String,
    #[validate(length(max = 4000))]
    pub description: String,
    pub difficulty: String,
    #[validate(length(max = 100))]
    pub distance: String,
    #[validate(length(max = 100))]
    pub duration: String,
    #[validate(length(max = 200))]
    pub start_location: String,
    #[validate(length(max = 200))]
    pub end_location: String,
    #[validate(length(max = 100))]
    pub date: String,
    #[validate(length(max = 100))]
    pub time: String,
    #[validate(length(max = 200))]
    pub meeting_point: String,
    /// Positive limit, `-1` or absent for no limit
    #[serde(default)]
    pub max_participants: Option<i64>,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub highlights: Vec<String>,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub map_image: Option<String>,
}

/// Shallow update of a route's descriptive fields and capacity.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RouteUpdate {
    #[validate(length(max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 4000))]
    pub description: Option<String>,
    pub difficulty: Option<String>,
    #[validate(length(max = 100))]
    pub distance: Option<String>,
    #[validate(length(max = 100))]
    pub duration: Option<String>,
    #[validate(length(max = 200))]
    pub start_location: Option<String>,
    #[validate(length(max = 200))]
    pub end_location: Option<String>,
    #[validate(length(max = 100))]
    pub date: Option<String>,
    #[validate(length(max = 100))]
    pub time: Option<String>,
    #[validate(length(max = 200))]
    pub meeting_point: Option<String>,
    /// Positive limit or `-1` for no limit
    pub max_participants: Option<i64>,
    #[validate(length(max = 20))]
    pub highlights: Option<Vec<String>>,
    #[validate(length(max = 20))]
    pub requirements: Option<Vec<String>>,
    pub map_image: Option<String>,
}

/// Join details supplied by the rider.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    #[validate(length(max = 100))]
    pub bike: String,
    #[serde(default)]
    pub has_passenger: bool,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub passenger_name: Option<String>,
}

impl JoinRequest {
    pub fn solo(bike: impl Into<String>) -> Self {
        Self {
            bike: bike.into(),
            has_passenger: false,
            passenger_name: None,
        }
    }

    pub fn with_passenger(bike: impl Into<String>, passenger: impl Into<String>) -> Self {
        Self {
            bike: bike.into(),
            has_passenger: true,
            passenger_name: Some(passenger.into()),
        }
    }
}
