// src/models/pareja.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Ratings start here for every new pair.
pub const DEFAULT_ELO: i32 = 1200;

/// A two-player doubles team — the ranked unit of the system. The player
/// pair is unordered: (A,B) and (B,A) resolve to the same row.
#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Pareja {
    pub id: Uuid,
    pub jugador1_id: Uuid,
    pub jugador2_id: Uuid,
    pub nombre_pareja: String,
    pub categoria: PairCategory,
    pub elo: i32,
    pub activa: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Competitive categories as the clubs run them: open 1ra..7ma plus the
/// Damas brackets.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "varchar")]
pub enum PairCategory {
    #[sqlx(rename = "1ra")]
    #[serde(rename = "1ra")]
    Primera,
    #[sqlx(rename = "2da")]
    #[serde(rename = "2da")]
    Segunda,
    #[sqlx(rename = "3ra")]
    #[serde(rename = "3ra")]
    Tercera,
    #[sqlx(rename = "4ta")]
    #[serde(rename = "4ta")]
    Cuarta,
    #[sqlx(rename = "5ta")]
    #[serde(rename = "5ta")]
    Quinta,
    #[sqlx(rename = "6ta")]
    #[serde(rename = "6ta")]
    Sexta,
    #[sqlx(rename = "7ma")]
    #[serde(rename = "7ma")]
    Septima,
    #[sqlx(rename = "Damas 6ta")]
    #[serde(rename = "Damas 6ta")]
    DamasSexta,
    #[sqlx(rename = "Damas 7ma")]
    #[serde(rename = "Damas 7ma")]
    DamasSeptima,
}

impl PairCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PairCategory::Primera => "1ra",
            PairCategory::Segunda => "2da",
            PairCategory::Tercera => "3ra",
            PairCategory::Cuarta => "4ta",
            PairCategory::Quinta => "5ta",
            PairCategory::Sexta => "6ta",
            PairCategory::Septima => "7ma",
            PairCategory::DamasSexta => "Damas 6ta",
            PairCategory::DamasSeptima => "Damas 7ma",
        }
    }
}

// Request/Response DTOs

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreatePairRequest {
    pub jugador2_id: Uuid,
    pub nombre_pareja: String,
    pub categoria: PairCategory,
}

/// A pair-vs-pair result reported by a player of the winning or losing side.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PairResultRequest {
    pub pareja1_id: Uuid,
    pub pareja2_id: Uuid,
    pub pareja1_gano: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RankingQuery {
    pub categoria: Option<PairCategory>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RankedPair {
    #[serde(flatten)]
    pub pareja: Pareja,
    pub posicion: i64,
}
