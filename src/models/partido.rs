// src/models/partido.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// Every padel match is doubles: four players, always.
pub const MATCH_CAPACITY: i32 = 4;

/// A scheduled occupation of one club court for one time window.
///
/// `lugar` is the legacy display encoding of (club, court, bound player);
/// the structured columns next to it are the source of truth for placement
/// and for the slot uniqueness index. `crate::reservations::location` is the
/// only module that reads or writes the encoding.
#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Partido {
    pub id: Uuid,
    pub creador_id: Uuid,
    pub fecha: DateTime<Utc>,
    pub lugar: String,
    pub club_nombre: String,
    pub cancha_numero: Option<i32>,
    pub a_nombre_de: Option<String>,
    pub estado: MatchStatus,
    pub tipo_partido: String,
    pub nivel: String,
    pub sexo: String,
    pub cupos_totales: i32,
    pub cupos_disponibles: i32,
    pub precio_por_persona: i32,
    pub resultado: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Partido {
    /// A match is full exactly when no open slots remain.
    pub fn is_full(&self) -> bool {
        self.cupos_disponibles == 0
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Pendiente,
    Abierto,
    Cerrado,
    Cancelado,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Pendiente => "pendiente",
            MatchStatus::Abierto => "abierto",
            MatchStatus::Cerrado => "cerrado",
            MatchStatus::Cancelado => "cancelado",
        }
    }
}

impl From<String> for MatchStatus {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "pendiente" => MatchStatus::Pendiente,
            "cerrado" => MatchStatus::Cerrado,
            "cancelado" => MatchStatus::Cancelado,
            _ => MatchStatus::Abierto,
        }
    }
}

/// One player enrolled in one match (the creator is implicitly in and never
/// gets a row here). Unique per (partido, jugador).
#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Inscripcion {
    pub id: Uuid,
    pub partido_id: Uuid,
    pub jugador_id: Uuid,
    pub created_at: DateTime<Utc>,
}

// Request/Response DTOs

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateMatchRequest {
    pub fecha: DateTime<Utc>,
    pub club_nombre: String,
    pub cancha_numero: Option<i32>,
    pub nivel: String,
    pub sexo: String,
    /// How many players the creator is still looking for (1..=3).
    pub jugadores_faltantes: i32,
    pub precio_por_persona: i32,
}

impl fmt::Display for CreateMatchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "club: {}, fecha: {}, faltantes: {}",
            self.club_nombre, self.fecha, self.jugadores_faltantes
        )
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ManualReservationRequest {
    pub cancha_numero: i32,
    /// Civil date of the booking, club-local ("YYYY-MM-DD").
    pub dia: String,
    /// Slot label, club-local ("HH:MM").
    pub hora: String,
    /// Display name the court is held under.
    pub nombre: String,
    /// Also publish the booking as a joinable community match.
    #[serde(default)]
    pub abrir_partido: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MatchWithCreator {
    #[serde(flatten)]
    pub partido: Partido,
    pub creador_nombre: String,
    /// Display status derived from stored state + timestamp; "played" is
    /// never persisted (see matches::policy).
    pub estado_display: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MatchListQuery {
    pub club: Option<String>,
}
