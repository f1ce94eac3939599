//! Handlers for the tag catalogue and autocomplete.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use bulletin_db::repositories::TagRepo;

use crate::error::AppResult;
use crate::query::TagSuggestParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/tags
///
/// Every distinct tag with its usage count, most used first.
pub async fn list_tags(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let tags = TagRepo::list_usage(&state.pool).await?;

    Ok(Json(DataResponse { data: tags }))
}

/// GET /api/v1/tags/suggest
///
/// Autocomplete suggestions for a case-insensitive prefix, sorted by
/// usage count (most popular first).
pub async fn suggest_tags(
    State(state): State<AppState>,
    Query(params): Query<TagSuggestParams>,
) -> AppResult<impl IntoResponse> {
    let suggestions = TagRepo::suggest(&state.pool, &params.query, params.limit).await?;

    Ok(Json(DataResponse { data: suggestions }))
}

/// POST /api/v1/events/tag-suggest
///
/// Same as [`suggest_tags`] with the parameters in a JSON body.
pub async fn suggest_tags_body(
    State(state): State<AppState>,
    Json(params): Json<TagSuggestParams>,
) -> AppResult<impl IntoResponse> {
    let suggestions = TagRepo::suggest(&state.pool, &params.query, params.limit).await?;

    Ok(Json(DataResponse { data: suggestions }))
}
