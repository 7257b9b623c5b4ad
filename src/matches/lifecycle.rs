// src/matches/lifecycle.rs
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::club_queries::ClubQueries;
use crate::db::match_queries::{MatchQueries, NewMatch};
use crate::errors::{map_db_error, AppError};
use crate::matches::policy;
use crate::models::partido::{
    CreateMatchRequest, ManualReservationRequest, MatchStatus, MatchWithCreator, Partido,
    MATCH_CAPACITY,
};
use crate::reservations::location::CourtLocation;
use crate::reservations::slot_grid::{club_offset, DEFAULT_UTC_OFFSET_HOURS};

/// Service owning the match state machine: creation, joins and leaves with
/// capacity accounting, and organizer cancellation. Capacity-affecting
/// writes are serialized at the data store through conditional updates; the
/// application layer never holds a lock across requests.
pub struct MatchLifecycleService {
    pool: PgPool,
    queries: MatchQueries,
    club_queries: ClubQueries,
}

impl MatchLifecycleService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            queries: MatchQueries::new(pool.clone()),
            club_queries: ClubQueries::new(pool.clone()),
            pool,
        }
    }

    /// Open a community match: the creator holds one seat and looks for 1–3
    /// more players.
    pub async fn create_open_match(
        &self,
        creador_id: Uuid,
        request: &CreateMatchRequest,
    ) -> Result<Partido, AppError> {
        if request.club_nombre.trim().is_empty() {
            return Err(AppError::ValidationFailed("a club or venue is required".into()));
        }
        policy::validate_missing_players(request.jugadores_faltantes)?;
        if request.precio_por_persona < 0 {
            return Err(AppError::ValidationFailed("price cannot be negative".into()));
        }

        let mut location = CourtLocation::new(request.club_nombre.trim());
        if let Some(cancha) = request.cancha_numero {
            if cancha < 1 {
                return Err(AppError::ValidationFailed("invalid court number".into()));
            }
            location = location.with_court(cancha);
        }

        let partido = self
            .queries
            .insert_match(NewMatch {
                creador_id,
                fecha: request.fecha,
                lugar: &location.encode(),
                club_nombre: &location.club_name,
                cancha_numero: location.court_number,
                a_nombre_de: None,
                estado: MatchStatus::Abierto,
                tipo_partido: "Amistoso",
                nivel: &request.nivel,
                sexo: &request.sexo,
                cupos_totales: MATCH_CAPACITY,
                cupos_disponibles: request.jugadores_faltantes,
                precio_por_persona: request.precio_por_persona,
            })
            .await?;

        tracing::info!(
            "Created open match {} at {} ({})",
            partido.id,
            partido.lugar,
            partido.fecha
        );
        Ok(partido)
    }

    /// Book a court by hand from the club desk, optionally publishing it as
    /// a joinable community match.
    pub async fn create_manual_reservation(
        &self,
        club_id: Uuid,
        club_nombre: &str,
        request: &ManualReservationRequest,
    ) -> Result<Partido, AppError> {
        if request.nombre.trim().is_empty() {
            return Err(AppError::ValidationFailed(
                "the reservation needs a player name".into(),
            ));
        }
        if request.cancha_numero < 1 {
            return Err(AppError::ValidationFailed("invalid court number".into()));
        }

        let dia = NaiveDate::parse_from_str(&request.dia, "%Y-%m-%d")
            .map_err(|_| AppError::ValidationFailed("invalid day, expected YYYY-MM-DD".into()))?;
        let hora = NaiveTime::parse_from_str(&request.hora, "%H:%M")
            .map_err(|_| AppError::ValidationFailed("invalid time, expected HH:MM".into()))?;

        // The booking form speaks club-local civil time; resolve the club's
        // offset before pinning the instant.
        let offset_hours = self
            .club_queries
            .get_club_config(club_id)
            .await?
            .map(|cfg| cfg.utc_offset_hours)
            .unwrap_or(DEFAULT_UTC_OFFSET_HOURS);
        let offset = club_offset(offset_hours);
        let fecha = offset
            .from_local_datetime(&dia.and_time(hora))
            .single()
            .ok_or_else(|| AppError::ValidationFailed("invalid reservation time".into()))?
            .with_timezone(&Utc);

        let location = CourtLocation::new(club_nombre)
            .with_court(request.cancha_numero)
            .with_bound_player(request.nombre.trim());

        let (estado, cupos_disponibles, tipo_partido) = if request.abrir_partido {
            (MatchStatus::Abierto, MATCH_CAPACITY, "Amistoso")
        } else {
            (MatchStatus::Pendiente, 0, "Reserva Manual")
        };

        let partido = self
            .queries
            .insert_match(NewMatch {
                creador_id: club_id,
                fecha,
                lugar: &location.encode(),
                club_nombre: &location.club_name,
                cancha_numero: location.court_number,
                a_nombre_de: location.bound_player_name.as_deref(),
                estado,
                tipo_partido,
                nivel: "intermedio",
                sexo: "mixto",
                cupos_totales: MATCH_CAPACITY,
                cupos_disponibles,
                precio_por_persona: 0,
            })
            .await?;

        tracing::info!(
            "Manual reservation {} for '{}' at {} cancha_{} ({})",
            partido.id,
            request.nombre,
            club_nombre,
            request.cancha_numero,
            fecha
        );
        Ok(partido)
    }

    /// Enroll a player. The enrollment insert and the guarded slot decrement
    /// commit together or not at all; the decrement's row count is the
    /// capacity verdict, so two joins racing for the last seat cannot both
    /// win.
    pub async fn join_match(&self, partido_id: Uuid, jugador_id: Uuid) -> Result<(), AppError> {
        let partido = self
            .queries
            .get_match(partido_id)
            .await?
            .ok_or(AppError::NotFound("match"))?;

        if partido.creador_id == jugador_id {
            return Err(AppError::ValidationFailed(
                "the organizer already holds a seat in this match".into(),
            ));
        }
        if partido.estado != MatchStatus::Abierto {
            return Err(AppError::ValidationFailed(
                "this match is not open for enrollment".into(),
            ));
        }
        if partido.is_full() {
            return Err(AppError::CapacityExceeded);
        }

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO partido_jugadores (partido_id, jugador_id) VALUES ($1, $2)",
        )
        .bind(partido_id)
        .bind(jugador_id)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let updated = sqlx::query(
            r#"
            UPDATE partidos
            SET cupos_disponibles = cupos_disponibles - 1, updated_at = NOW()
            WHERE id = $1 AND estado = 'abierto' AND cupos_disponibles > 0
            "#,
        )
        .bind(partido_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            // Lost the race for the last seat; dropping the transaction
            // rolls the enrollment back.
            return Err(AppError::CapacityExceeded);
        }

        tx.commit().await?;

        tracing::info!("Player {} joined match {}", jugador_id, partido_id);
        Ok(())
    }

    /// Drop an enrollment and free the seat, unless the match is inside the
    /// 2-hour protection window.
    pub async fn leave_match(&self, partido_id: Uuid, jugador_id: Uuid) -> Result<(), AppError> {
        let partido = self
            .queries
            .get_match(partido_id)
            .await?
            .ok_or(AppError::NotFound("match"))?;

        if !policy::can_leave(partido.fecha, Utc::now()) {
            return Err(AppError::PolicyWindowViolation(format!(
                "you can no longer leave within {} hours of start",
                policy::LEAVE_PROTECTION_HOURS
            )));
        }

        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query(
            "DELETE FROM partido_jugadores WHERE partido_id = $1 AND jugador_id = $2",
        )
        .bind(partido_id)
        .bind(jugador_id)
        .execute(&mut *tx)
        .await?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound("enrollment"));
        }

        // The range CHECK on the table backstops this against ever pushing
        // the counter past the capacity.
        sqlx::query(
            r#"
            UPDATE partidos
            SET cupos_disponibles = cupos_disponibles + 1, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(partido_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!("Player {} left match {}", jugador_id, partido_id);
        Ok(())
    }

    /// Organizer cancellation: creator-only, any time strictly before start,
    /// regardless of how many players already enrolled.
    pub async fn cancel_match(&self, partido_id: Uuid, caller_id: Uuid) -> Result<(), AppError> {
        let partido = self
            .queries
            .get_match(partido_id)
            .await?
            .ok_or(AppError::NotFound("match"))?;

        if partido.creador_id != caller_id {
            return Err(AppError::AuthorizationDenied(
                "only the organizer can cancel this match".into(),
            ));
        }
        if partido.estado == MatchStatus::Cancelado {
            return Err(AppError::ValidationFailed(
                "the match is already cancelled".into(),
            ));
        }
        if !policy::can_cancel(partido.fecha, Utc::now()) {
            return Err(AppError::PolicyWindowViolation(
                "the match already started and can no longer be cancelled".into(),
            ));
        }

        sqlx::query(
            r#"
            UPDATE partidos
            SET estado = 'cancelado', updated_at = NOW()
            WHERE id = $1 AND estado <> 'cancelado'
            "#,
        )
        .bind(partido_id)
        .execute(&self.pool)
        .await?;

        tracing::info!("Match {} cancelled by organizer {}", partido_id, caller_id);
        Ok(())
    }

    /// Open-match listing with display status resolved against the clock.
    pub async fn list_open_matches(
        &self,
        club: Option<&str>,
    ) -> Result<Vec<MatchWithCreator>, AppError> {
        let now = Utc::now();
        let mut matches = self.queries.get_open_matches(now, club).await?;
        for m in &mut matches {
            m.estado_display =
                policy::display_status(m.partido.estado, m.partido.fecha, now).to_string();
        }
        Ok(matches)
    }

    /// Everything the player organized or joined, past matches shown as
    /// played.
    pub async fn list_player_matches(
        &self,
        jugador_id: Uuid,
    ) -> Result<Vec<MatchWithCreator>, AppError> {
        let now = Utc::now();
        let mut matches = self.queries.get_player_matches(jugador_id).await?;
        for m in &mut matches {
            m.estado_display =
                policy::display_status(m.partido.estado, m.partido.fecha, now).to_string();
        }
        Ok(matches)
    }

    pub async fn get_match(&self, partido_id: Uuid) -> Result<Partido, AppError> {
        self.queries
            .get_match(partido_id)
            .await?
            .ok_or(AppError::NotFound("match"))
    }

    /// A match plus its enrollments, for the detail view.
    pub async fn get_match_detail(
        &self,
        partido_id: Uuid,
    ) -> Result<(Partido, Vec<crate::models::partido::Inscripcion>), AppError> {
        let partido = self.get_match(partido_id).await?;
        let inscripciones = self.queries.get_enrollments(partido_id).await?;
        Ok((partido, inscripciones))
    }
}
