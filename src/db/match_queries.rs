// src/db/match_queries.rs
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Row};
use uuid::Uuid;

use crate::errors::{map_db_error, AppError};
use crate::matches::policy::SweepCandidate;
use crate::models::partido::{Inscripcion, MatchWithCreator, Partido};

#[derive(Debug)]
pub struct MatchQueries {
    pool: PgPool,
}

impl MatchQueries {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_match(&self, partido_id: Uuid) -> Result<Option<Partido>, sqlx::Error> {
        sqlx::query_as::<_, Partido>("SELECT * FROM partidos WHERE id = $1")
            .bind(partido_id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Open community matches still in the future, oldest first, with the
    /// organizer's display name attached.
    pub async fn get_open_matches(
        &self,
        now: DateTime<Utc>,
        club: Option<&str>,
    ) -> Result<Vec<MatchWithCreator>, sqlx::Error> {
        let rows = match club {
            Some(club) => {
                sqlx::query(
                    r#"
                    SELECT p.*, u.nombre AS creador_nombre
                    FROM partidos p
                    JOIN users u ON u.id = p.creador_id
                    WHERE p.estado = 'abierto' AND p.fecha >= $1 AND p.club_nombre = $2
                    ORDER BY p.fecha ASC
                    "#,
                )
                .bind(now)
                .bind(club)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT p.*, u.nombre AS creador_nombre
                    FROM partidos p
                    JOIN users u ON u.id = p.creador_id
                    WHERE p.estado = 'abierto' AND p.fecha >= $1
                    ORDER BY p.fecha ASC
                    "#,
                )
                .bind(now)
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.into_iter()
            .map(|row| {
                let partido = Partido::from_row(&row)?;
                let creador_nombre: String = row.try_get("creador_nombre")?;
                Ok(MatchWithCreator {
                    partido,
                    creador_nombre,
                    estado_display: String::new(),
                })
            })
            .collect()
    }

    /// Matches the player created or joined, any state, oldest first.
    pub async fn get_player_matches(
        &self,
        jugador_id: Uuid,
    ) -> Result<Vec<MatchWithCreator>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT p.*, u.nombre AS creador_nombre
            FROM partidos p
            JOIN users u ON u.id = p.creador_id
            WHERE p.creador_id = $1
               OR p.id IN (SELECT partido_id FROM partido_jugadores WHERE jugador_id = $1)
            ORDER BY p.fecha ASC
            "#,
        )
        .bind(jugador_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let partido = Partido::from_row(&row)?;
                let creador_nombre: String = row.try_get("creador_nombre")?;
                Ok(MatchWithCreator {
                    partido,
                    creador_nombre,
                    estado_display: String::new(),
                })
            })
            .collect()
    }

    /// One club's matches inside a UTC window (the grid's day bounds).
    pub async fn get_club_matches_between(
        &self,
        club_nombre: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Partido>, sqlx::Error> {
        sqlx::query_as::<_, Partido>(
            r#"
            SELECT * FROM partidos
            WHERE club_nombre = $1 AND fecha >= $2 AND fecha < $3
            ORDER BY fecha ASC
            "#,
        )
        .bind(club_nombre)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn insert_match(&self, partido: NewMatch<'_>) -> Result<Partido, AppError> {
        sqlx::query_as::<_, Partido>(
            r#"
            INSERT INTO partidos (
                creador_id, fecha, lugar, club_nombre, cancha_numero, a_nombre_de,
                estado, tipo_partido, nivel, sexo,
                cupos_totales, cupos_disponibles, precio_por_persona
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(partido.creador_id)
        .bind(partido.fecha)
        .bind(partido.lugar)
        .bind(partido.club_nombre)
        .bind(partido.cancha_numero)
        .bind(partido.a_nombre_de)
        .bind(partido.estado)
        .bind(partido.tipo_partido)
        .bind(partido.nivel)
        .bind(partido.sexo)
        .bind(partido.cupos_totales)
        .bind(partido.cupos_disponibles)
        .bind(partido.precio_por_persona)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    /// Who joined a match, oldest enrollment first. The organizer holds a
    /// seat without a row here.
    pub async fn get_enrollments(
        &self,
        partido_id: Uuid,
    ) -> Result<Vec<Inscripcion>, sqlx::Error> {
        sqlx::query_as::<_, Inscripcion>(
            r#"
            SELECT * FROM partido_jugadores
            WHERE partido_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(partido_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Under-filled open matches, the auto-cancel sweep's candidate set.
    pub async fn get_open_matches_missing_players(
        &self,
    ) -> Result<Vec<SweepCandidate>, sqlx::Error> {
        sqlx::query_as::<_, SweepCandidate>(
            r#"
            SELECT id, fecha, lugar, cupos_disponibles
            FROM partidos
            WHERE estado = 'abierto' AND cupos_disponibles > 0
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Batch-retire matches. The `estado = 'abierto'` guard makes re-runs
    /// no-ops for anything already cancelled in between.
    pub async fn cancel_matches(&self, ids: &[Uuid]) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE partidos
            SET estado = 'cancelado', updated_at = NOW()
            WHERE id = ANY($1) AND estado = 'abierto'
            "#,
        )
        .bind(ids)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}

/// Column values for a match insert; the lifecycle service owns the policy
/// that fills them.
#[derive(Debug)]
pub struct NewMatch<'a> {
    pub creador_id: Uuid,
    pub fecha: DateTime<Utc>,
    pub lugar: &'a str,
    pub club_nombre: &'a str,
    pub cancha_numero: Option<i32>,
    pub a_nombre_de: Option<&'a str>,
    pub estado: crate::models::partido::MatchStatus,
    pub tipo_partido: &'a str,
    pub nivel: &'a str,
    pub sexo: &'a str,
    pub cupos_totales: i32,
    pub cupos_disponibles: i32,
    pub precio_por_persona: i32,
}
