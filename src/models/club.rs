// src/models/club.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Per-club reservation settings, keyed by the club-admin identity. The core
/// only reads this projection; the settings endpoint is the single writer.
#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct ClubConfig {
    pub club_id: Uuid,
    pub canchas_activas: Vec<i32>,
    pub slot_minutos: i32,
    pub precio_hora_base: i32,
    pub precio_fin_semana: i32,
    pub tiempo_cancelacion_minutos: i32,
    pub utc_offset_hours: i32,
    pub horarios_prime: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

/// Club name + the pieces of config the sweep and the grid actually need.
#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct ClubDeadline {
    pub nombre: String,
    pub tiempo_cancelacion_minutos: i32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ClubSettingsRequest {
    pub canchas_activas: Vec<i32>,
    pub slot_minutos: i32,
    pub precio_hora_base: i32,
    pub precio_fin_semana: i32,
    pub tiempo_cancelacion_minutos: i32,
    pub utc_offset_hours: Option<i32>,
    #[serde(default)]
    pub horarios_prime: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GridQuery {
    /// Civil date to render, "YYYY-MM-DD" in the club's local time.
    /// Defaults to today in the club's offset.
    pub date: Option<String>,
}
