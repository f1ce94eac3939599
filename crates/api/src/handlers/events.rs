//! Handlers for announcement events.
//!
//! Create/read/update go straight to [`EventRepo`]; moderation and
//! broadcast go through the lifecycle engine held in [`AppState`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use bulletin_core::types::DbId;
use bulletin_db::models::event::{CreateEvent, EventListFilter, UpdateEvent};
use bulletin_db::repositories::EventRepo;
use serde::Deserialize;

use crate::error::AppResult;
use crate::query::EventListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of `POST /events/{id}/moderate`.
#[derive(Debug, Deserialize)]
pub struct ModerateRequest {
    /// `approved` or `rejected`.
    pub action: String,
    pub performed_by: DbId,
    /// Required when approving.
    pub channel: Option<String>,
}

/// Body of `POST /events/{id}/broadcast`.
#[derive(Debug, Deserialize)]
pub struct BroadcastRequest {
    pub performed_by: DbId,
}

/// GET /api/v1/events
///
/// Paged listing, newest scheduled first. Supports `channel`, `since`,
/// `page` and `size`.
pub async fn list_events(
    State(state): State<AppState>,
    Query(params): Query<EventListParams>,
) -> AppResult<impl IntoResponse> {
    let filter = EventListFilter {
        channel: params.channel.clone(),
        since: params.since()?,
        page: params.page.to_page_request(),
    };
    let events = EventRepo::list_paged(&state.pool, &filter).await?;

    Ok(Json(DataResponse { data: events }))
}

/// GET /api/v1/events/{id}
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let details = EventRepo::find_details(&state.pool, event_id).await?;

    Ok(Json(DataResponse { data: details }))
}

/// POST /api/v1/events
///
/// Create an event with its body and tags in one transaction.
pub async fn create_event(
    State(state): State<AppState>,
    Json(input): Json<CreateEvent>,
) -> AppResult<impl IntoResponse> {
    let event = EventRepo::create(&state.pool, &input, state.tx_timeout).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: event })))
}

/// PATCH /api/v1/events/{id}
///
/// Partial update; responds with the refreshed details.
pub async fn update_event(
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
    Json(input): Json<UpdateEvent>,
) -> AppResult<impl IntoResponse> {
    EventRepo::update(&state.pool, event_id, &input, state.tx_timeout).await?;
    let details = EventRepo::find_details(&state.pool, event_id).await?;

    Ok(Json(DataResponse { data: details }))
}

/// POST /api/v1/events/{id}/moderate
pub async fn moderate_event(
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
    Json(input): Json<ModerateRequest>,
) -> AppResult<impl IntoResponse> {
    let event = state
        .engine
        .moderate(
            event_id,
            &input.action,
            input.performed_by,
            input.channel.as_deref(),
        )
        .await?;

    Ok(Json(DataResponse { data: event }))
}

/// POST /api/v1/events/{id}/broadcast
///
/// Deliver an approved event to every channel it was approved for.
pub async fn broadcast_event(
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
    Json(input): Json<BroadcastRequest>,
) -> AppResult<impl IntoResponse> {
    let event = state.engine.broadcast(event_id, input.performed_by).await?;

    Ok(Json(DataResponse { data: event }))
}
