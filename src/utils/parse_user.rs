// src/utils/parse_user.rs
use sqlx::PgPool;

use crate::errors::AppError;
use crate::middleware::auth::Claims;
use crate::models::user::Player;

/// Resolve the external auth identity carried in the JWT to the application
/// profile row. Ownership checks compare against `Player.id`, never against
/// the provider-side subject.
pub async fn resolve_profile(pool: &PgPool, claims: &Claims) -> Result<Player, AppError> {
    let auth_id = claims.auth_id().ok_or(AppError::AuthenticationRequired)?;

    let player = sqlx::query_as::<_, Player>("SELECT * FROM users WHERE auth_id = $1")
        .bind(auth_id)
        .fetch_optional(pool)
        .await?;

    match player {
        Some(player) => Ok(player),
        None => {
            tracing::warn!("No profile row for authenticated subject {}", auth_id);
            Err(AppError::AuthenticationRequired)
        }
    }
}
