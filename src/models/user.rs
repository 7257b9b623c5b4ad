// src/models/user.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Application profile row. `auth_id` is the opaque identifier minted by the
/// external identity provider; `id` is what every other table references.
#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Player {
    pub id: Uuid,
    pub auth_id: Uuid,
    pub nombre: String,
    pub email: String,
    pub rol: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Jugador,
    AdminClub,
    Superadmin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Jugador => "jugador",
            UserRole::AdminClub => "admin_club",
            UserRole::Superadmin => "superadmin",
        }
    }
}

impl From<String> for UserRole {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "admin_club" => UserRole::AdminClub,
            "superadmin" => UserRole::Superadmin,
            _ => UserRole::Jugador,
        }
    }
}
