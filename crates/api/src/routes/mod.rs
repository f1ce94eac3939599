pub mod events;
pub mod health;
pub mod tags;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /events                                  list (GET), create (POST)
/// /events/tag-suggest                      tag autocomplete, JSON body (POST)
/// /events/{id}                             details (GET), partial update (PATCH)
/// /events/{id}/moderate                    approve or reject (POST)
/// /events/{id}/broadcast                   deliver to recorded channels (POST)
///
/// /tags                                    tag usage listing
/// /tags/suggest                            tag autocomplete (GET)
///
/// /users                                   user directory
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/events", events::router())
        .nest("/tags", tags::router())
        .nest("/users", users::router())
}
