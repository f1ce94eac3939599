//! Repository for the `users` table (read-only from this service).

use sqlx::PgPool;

use crate::models::user::UserSummary;

pub struct UserRepo;

impl UserRepo {
    /// List every user ordered by id.
    pub async fn list(pool: &PgPool) -> Result<Vec<UserSummary>, sqlx::Error> {
        sqlx::query_as::<_, UserSummary>("SELECT id, display_name FROM users ORDER BY id ASC")
            .fetch_all(pool)
            .await
    }
}
