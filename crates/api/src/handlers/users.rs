use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use bulletin_db::repositories::UserRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/users
pub async fn list_users(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let users = UserRepo::list(&state.pool).await?;

    Ok(Json(DataResponse { data: users }))
}
