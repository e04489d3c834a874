// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Route roster engine.
//!
//! Owns route creation, capacity-bounded join, leave, and catalog edits.
//! Each roster change runs as one revision-checked catalog commit, so the
//! capacity gate is evaluated against the same snapshot that is written.

use crate::db::{CatalogStore, StoreError};
use crate::models::route::DEFAULT_MAP_IMAGE;
use crate::models::{
    Capacity, Difficulty, Identity, JoinRequest, NewRoute, Participant, Route, RouteUpdate,
};
use validator::Validate;

/// Errors from roster operations.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("Route {0} not found")]
    RouteNotFound(u64),

    #[error("Route {route_id} is full ({limit} riders)")]
    CapacityExceeded { route_id: u64, limit: u32 },

    #[error("Already joined route {0}")]
    AlreadyJoined(u64),

    #[error("Not a participant of route {0}")]
    NotParticipant(u64),

    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Roster engine over a [`CatalogStore`].
#[derive(Clone)]
pub struct RosterService {
    store: CatalogStore,
}

impl RosterService {
    pub fn new(store: CatalogStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    // ─── Queries ─────────────────────────────────────────────────

    /// All routes in catalog order.
    pub async fn load_catalog(&self) -> Result<Vec<Route>, RosterError> {
        Ok(self.store.load_catalog().await?.routes)
    }

    pub async fn get_route(&self, route_id: u64) -> Result<Route, RosterError> {
        self.store
            .get_route_by_id(route_id)
            .await?
            .ok_or(RosterError::RouteNotFound(route_id))
    }

    // ─── Catalog Edits ───────────────────────────────────────────

    /// Create a route owned by `creator`.
    ///
    /// The route always starts with an empty roster and zero rating,
    /// whatever the draft contained.
    pub async fn create_route(
        &self,
        creator: &Identity,
        draft: NewRoute,
    ) -> Result<Route, RosterError> {
        draft.validate().map_err(invalid_input)?;

        let route = Route {
            id: 0,
            title: required("title", draft.title)?,
            description: required("description", draft.description)?,
            difficulty: parse_difficulty(&draft.difficulty)?,
            distance: required("distance", draft.distance)?,
            duration: required("duration", draft.duration)?,
            start_location: required("startLocation", draft.start_location)?,
            end_location: required("endLocation", draft.end_location)?,
            date: required("date", draft.date)?,
            time: required("time", draft.time)?,
            max_participants: match draft.max_participants {
                Some(raw) => parse_capacity(raw)?,
                None => Capacity::Unbounded,
            },
            current_participants: 0,
            rating: 0.0,
            creator: creator.creator_snapshot(),
            meeting_point: required("meetingPoint", draft.meeting_point)?,
            highlights: clean_list(draft.highlights),
            requirements: clean_list(draft.requirements),
            participants: Vec::new(),
            map_image: draft
                .map_image
                .and_then(non_blank)
                .unwrap_or_else(|| DEFAULT_MAP_IMAGE.to_string()),
        };

        let created = self.store.create_route(route).await?;

        tracing::info!(
            route_id = created.id,
            creator = %creator.key,
            capacity = created.max_participants.to_raw(),
            "Route created"
        );
        Ok(created)
    }

    /// Merge `update` over route `route_id`.
    ///
    /// Fields absent from the update are kept. A bounded capacity may not
    /// drop below the current roster size.
    pub async fn update_route(
        &self,
        route_id: u64,
        update: RouteUpdate,
    ) -> Result<Route, RosterError> {
        update.validate().map_err(invalid_input)?;

        let updated = self
            .store
            .update_route(route_id, |route| {
                apply_update(route, update.clone())?;
                Ok::<_, RosterError>(route.clone())
            })
            .await?
            .ok_or(RosterError::RouteNotFound(route_id))?;

        tracing::info!(route_id, "Route updated");
        Ok(updated)
    }

    /// Delete route `route_id`. Returns whether it existed.
    pub async fn delete_route(&self, route_id: u64) -> Result<bool, RosterError> {
        let deleted = self.store.delete_route(route_id).await?;

        if deleted {
            tracing::info!(route_id, "Route deleted");
        } else {
            tracing::debug!(route_id, "Delete requested for unknown route");
        }
        Ok(deleted)
    }

    /// Replace the catalog with the seed routes.
    pub async fn reset_catalog(&self) -> Result<(), RosterError> {
        self.store.reset_catalog().await?;
        Ok(())
    }

    // ─── Roster Operations ───────────────────────────────────────

    /// Add `rider` to route `route_id`.
    ///
    /// Fails without writing if the route is missing, already holds this
    /// identity, or is at its bounded capacity.
    pub async fn join_route(
        &self,
        route_id: u64,
        rider: &Identity,
        request: JoinRequest,
    ) -> Result<Route, RosterError> {
        let participant = build_participant(rider, request)?;

        let result = self
            .store
            .update_route(route_id, |route| admit(route, &participant))
            .await;

        match result {
            Ok(Some(route)) => {
                tracing::info!(
                    route_id,
                    rider = %rider.key,
                    riders = route.current_participants,
                    has_passenger = participant.has_passenger,
                    "Rider joined route"
                );
                Ok(route)
            }
            Ok(None) => {
                tracing::debug!(route_id, rider = %rider.key, "Join for unknown route");
                Err(RosterError::RouteNotFound(route_id))
            }
            Err(err) => {
                tracing::warn!(route_id, rider = %rider.key, error = %err, "Join rejected");
                Err(err)
            }
        }
    }

    /// Remove the rider keyed `identity_key` from route `route_id`.
    ///
    /// Succeeds only if an entry was actually removed.
    pub async fn leave_route(
        &self,
        route_id: u64,
        identity_key: &str,
    ) -> Result<Route, RosterError> {
        if identity_key.trim().is_empty() {
            return Err(RosterError::InvalidInput(
                "participant key must not be empty".to_string(),
            ));
        }

        let result = self
            .store
            .update_route(route_id, |route| release(route, identity_key))
            .await;

        match result {
            Ok(Some(route)) => {
                tracing::info!(
                    route_id,
                    rider = identity_key,
                    riders = route.current_participants,
                    "Rider left route"
                );
                Ok(route)
            }
            Ok(None) => Err(RosterError::RouteNotFound(route_id)),
            Err(err) => {
                tracing::warn!(route_id, rider = identity_key, error = %err, "Leave rejected");
                Err(err)
            }
        }
    }
}

// ─── Roster Transitions ──────────────────────────────────────────

/// Capacity gate plus append.
fn admit(route: &mut Route, participant: &Participant) -> Result<Route, RosterError> {
    if route.is_participant(&participant.identity_key()) {
        return Err(RosterError::AlreadyJoined(route.id));
    }
    if !route.has_room() {
        return Err(RosterError::CapacityExceeded {
            route_id: route.id,
            limit: route.max_participants.limit().unwrap_or(u32::MAX),
        });
    }

    route.participants.push(participant.clone());
    route.sync_participant_count();
    Ok(route.clone())
}

fn release(route: &mut Route, identity_key: &str) -> Result<Route, RosterError> {
    let before = route.participants.len();
    route
        .participants
        .retain(|p| p.identity_key() != identity_key);

    if route.participants.len() == before {
        return Err(RosterError::NotParticipant(route.id));
    }

    route.sync_participant_count();
    Ok(route.clone())
}

// ─── Input Normalisation ─────────────────────────────────────────

fn invalid_input(err: validator::ValidationErrors) -> RosterError {
    RosterError::InvalidInput(err.to_string())
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn required(field: &str, value: String) -> Result<String, RosterError> {
    non_blank(value).ok_or_else(|| RosterError::InvalidInput(format!("{} is required", field)))
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items.into_iter().filter_map(non_blank).collect()
}

fn parse_difficulty(raw: &str) -> Result<Difficulty, RosterError> {
    raw.trim().parse().map_err(RosterError::InvalidInput)
}

fn parse_capacity(raw: i64) -> Result<Capacity, RosterError> {
    Capacity::from_raw(raw).ok_or_else(|| {
        RosterError::InvalidInput(format!(
            "maxParticipants must be a positive integer or -1 for no limit (got {})",
            raw
        ))
    })
}

fn build_participant(rider: &Identity, request: JoinRequest) -> Result<Participant, RosterError> {
    request.validate().map_err(invalid_input)?;

    let bike = required("bike", request.bike)?;
    let passenger_name = if request.has_passenger {
        let name = request.passenger_name.and_then(non_blank).ok_or_else(|| {
            RosterError::InvalidInput("passengerName is required with a passenger".to_string())
        })?;
        Some(name)
    } else {
        None
    };

    Ok(rider.participant(bike, passenger_name))
}

fn apply_update(route: &mut Route, update: RouteUpdate) -> Result<(), RosterError> {
    // Validate everything before touching the route
    let title = update.title.map(|v| required("title", v)).transpose()?;
    let description = update
        .description
        .map(|v| required("description", v))
        .transpose()?;
    let difficulty = update
        .difficulty
        .as_deref()
        .map(parse_difficulty)
        .transpose()?;
    let distance = update.distance.map(|v| required("distance", v)).transpose()?;
    let duration = update.duration.map(|v| required("duration", v)).transpose()?;
    let start_location = update
        .start_location
        .map(|v| required("startLocation", v))
        .transpose()?;
    let end_location = update
        .end_location
        .map(|v| required("endLocation", v))
        .transpose()?;
    let date = update.date.map(|v| required("date", v)).transpose()?;
    let time = update.time.map(|v| required("time", v)).transpose()?;
    let meeting_point = update
        .meeting_point
        .map(|v| required("meetingPoint", v))
        .transpose()?;
    let capacity = update.max_participants.map(parse_capacity).transpose()?;

    if let Some(Capacity::Bounded(limit)) = capacity {
        if (limit.get() as usize) < route.roster_len() {
            return Err(RosterError::InvalidInput(format!(
                "maxParticipants {} is below the {} riders already joined",
                limit,
                route.roster_len()
            )));
        }
    }

    if let Some(v) = title {
        route.title = v;
    }
    if let Some(v) = description {
        route.description = v;
    }
    if let Some(v) = difficulty {
        route.difficulty = v;
    }
    if let Some(v) = distance {
        route.distance = v;
    }
    if let Some(v) = duration {
        route.duration = v;
    }
    if let Some(v) = start_location {
        route.start_location = v;
    }
    if let Some(v) = end_location {
        route.end_location = v;
    }
    if let Some(v) = date {
        route.date = v;
    }
    if let Some(v) = time {
        route.time = v;
    }
    if let Some(v) = meeting_point {
        route.meeting_point = v;
    }
    if let Some(v) = capacity {
        route.max_participants = v;
    }
    if let Some(items) = update.highlights {
        route.highlights = clean_list(items);
    }
    if let Some(items) = update.requirements {
        route.requirements = clean_list(items);
    }
    if let Some(v) = update.map_image.and_then(non_blank) {
        route.map_image = v;
    }
    Ok(())
}
