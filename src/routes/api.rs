// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated riders.

use crate::error::{AppError, Result};
use crate::models::{Identity, JoinRequest, NewRoute, Participant, RosterState, Route, RouteUpdate};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/routes", get(list_routes).post(create_route))
        .route(
            "/api/routes/{id}",
            get(get_route).patch(update_route).delete(delete_route),
        )
        .route("/api/routes/{id}/join", post(join_route))
        .route("/api/routes/{id}/leave", post(leave_route))
        .route("/api/catalog/reset", post(reset_catalog))
}

// ─── Route Views ─────────────────────────────────────────────

/// A route as seen by the requesting rider.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct RouteView {
    #[serde(flatten)]
    pub route: Route,
    pub viewer_joined: bool,
    /// The viewer's own roster entry, if joined
    pub viewer_participation: Option<Participant>,
    pub roster_state: RosterState,
    /// `None` for routes without a rider limit
    pub spots_left: Option<u32>,
}

impl RouteView {
    fn new(route: Route, viewer: &Identity) -> Self {
        let viewer_participation = route.participant_info(&viewer.key).cloned();
        Self {
            viewer_joined: viewer_participation.is_some(),
            viewer_participation,
            roster_state: route.roster_state(),
            spots_left: route.spots_left(),
            route,
        }
    }
}

async fn list_routes(
    State(state): State<Arc<AppState>>,
    Extension(viewer): Extension<Identity>,
) -> Result<Json<Vec<RouteView>>> {
    let routes = state.roster.load_catalog().await?;
    tracing::debug!(count = routes.len(), viewer = %viewer.key, "Listing routes");

    Ok(Json(
        routes
            .into_iter()
            .map(|route| RouteView::new(route, &viewer))
            .collect(),
    ))
}

async fn get_route(
    State(state): State<Arc<AppState>>,
    Extension(viewer): Extension<Identity>,
    Path(id): Path<u64>,
) -> Result<Json<RouteView>> {
    let route = state.roster.get_route(id).await?;
    Ok(Json(RouteView::new(route, &viewer)))
}

// ─── Catalog Edits ───────────────────────────────────────────

async fn create_route(
    State(state): State<Arc<AppState>>,
    Extension(creator): Extension<Identity>,
    Json(draft): Json<NewRoute>,
) -> Result<(StatusCode, Json<RouteView>)> {
    let route = state.roster.create_route(&creator, draft).await?;
    Ok((StatusCode::CREATED, Json(RouteView::new(route, &creator))))
}

async fn update_route(
    State(state): State<Arc<AppState>>,
    Extension(viewer): Extension<Identity>,
    Path(id): Path<u64>,
    Json(update): Json<RouteUpdate>,
) -> Result<Json<RouteView>> {
    tracing::info!(route_id = id, requested_by = %viewer.key, "Route update requested");
    let route = state.roster.update_route(id, update).await?;
    Ok(Json(RouteView::new(route, &viewer)))
}

/// Response for route deletion.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DeleteRouteResponse {
    pub deleted: bool,
}

/// Delete a route. Deleting an unknown id is not an error.
async fn delete_route(
    State(state): State<Arc<AppState>>,
    Extension(viewer): Extension<Identity>,
    Path(id): Path<u64>,
) -> Result<Json<DeleteRouteResponse>> {
    tracing::info!(route_id = id, requested_by = %viewer.key, "Route deletion requested");
    let deleted = state.roster.delete_route(id).await?;
    Ok(Json(DeleteRouteResponse { deleted }))
}

/// Restore the seed catalog. Only exposed when explicitly enabled.
async fn reset_catalog(
    State(state): State<Arc<AppState>>,
    Extension(viewer): Extension<Identity>,
) -> Result<StatusCode> {
    if !state.config.allow_catalog_reset {
        return Err(AppError::NotFound("catalog reset is disabled".to_string()));
    }

    tracing::warn!(requested_by = %viewer.key, "Resetting route catalog to seed data");
    state.roster.reset_catalog().await?;
    Ok(StatusCode::NO_CONTENT)
}

// ─── Roster ──────────────────────────────────────────────────

async fn join_route(
    State(state): State<Arc<AppState>>,
    Extension(rider): Extension<Identity>,
    Path(id): Path<u64>,
    Json(request): Json<JoinRequest>,
) -> Result<Json<RouteView>> {
    let route = state.roster.join_route(id, &rider, request).await?;
    Ok(Json(RouteView::new(route, &rider)))
}

async fn leave_route(
    State(state): State<Arc<AppState>>,
    Extension(rider): Extension<Identity>,
    Path(id): Path<u64>,
) -> Result<Json<RouteView>> {
    let route = state.roster.leave_route(id, &rider.key).await?;
    Ok(Json(RouteView::new(route, &rider)))
}
