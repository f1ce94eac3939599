//! Route definitions for announcement events.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{events, tags};
use crate::state::AppState;

/// Event routes mounted at `/events`.
///
/// ```text
/// GET    /                  -> list_events
/// POST   /                  -> create_event
/// POST   /tag-suggest       -> suggest_tags_body
/// GET    /{id}              -> get_event
/// PATCH  /{id}              -> update_event
/// POST   /{id}/moderate     -> moderate_event
/// POST   /{id}/broadcast    -> broadcast_event
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(events::list_events).post(events::create_event))
        .route("/tag-suggest", post(tags::suggest_tags_body))
        .route("/{id}", get(events::get_event).patch(events::update_event))
        .route("/{id}/moderate", post(events::moderate_event))
        .route("/{id}/broadcast", post(events::broadcast_event))
}
