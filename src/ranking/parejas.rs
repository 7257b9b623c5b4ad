// src/ranking/parejas.rs
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::pair_queries::PairQueries;
use crate::errors::AppError;
use crate::models::pareja::{CreatePairRequest, Pareja, PairCategory, RankedPair, DEFAULT_ELO};
use crate::ranking::rating::calculate_match_rankings;

/// Pair lifecycle and the rated-result path that feeds the rating engine.
pub struct PairService {
    pool: PgPool,
    queries: PairQueries,
}

impl PairService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            queries: PairQueries::new(pool.clone()),
            pool,
        }
    }

    /// Create the caller's pair with another player, or return the existing
    /// one — (A,B) and (B,A) are the same team. Sign-up flows share this
    /// path, renaming the pair when a fresh name is supplied.
    pub async fn find_or_create(
        &self,
        jugador1_id: Uuid,
        request: &CreatePairRequest,
    ) -> Result<Pareja, AppError> {
        if request.jugador2_id == jugador1_id {
            return Err(AppError::ValidationFailed(
                "you cannot form a pair with yourself".into(),
            ));
        }
        if request.nombre_pareja.trim().is_empty() {
            return Err(AppError::ValidationFailed("the pair needs a name".into()));
        }

        let partner_exists =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE id = $1")
                .bind(request.jugador2_id)
                .fetch_one(&self.pool)
                .await?;
        if partner_exists == 0 {
            return Err(AppError::NotFound("player"));
        }

        if let Some(existing) = self
            .queries
            .find_by_players(jugador1_id, request.jugador2_id)
            .await?
        {
            if existing.nombre_pareja != request.nombre_pareja.trim() {
                self.queries
                    .rename_pair(existing.id, request.nombre_pareja.trim())
                    .await?;
            }
            tracing::info!(
                "Pair {} already exists for these players, reusing it",
                existing.id
            );
            return self
                .queries
                .get_pair(existing.id)
                .await?
                .ok_or(AppError::NotFound("pair"));
        }

        let pareja = self
            .queries
            .insert_pair(
                jugador1_id,
                request.jugador2_id,
                request.nombre_pareja.trim(),
                request.categoria,
                DEFAULT_ELO,
            )
            .await?;

        tracing::info!(
            "Created pair {} '{}' ({})",
            pareja.id,
            pareja.nombre_pareja,
            pareja.categoria.as_str()
        );
        Ok(pareja)
    }

    /// Apply a completed pair-vs-pair result. Both new ratings come from the
    /// pre-match values and are written in one transaction; the reporter
    /// must play in one of the two pairs.
    pub async fn record_result(
        &self,
        reporter_id: Uuid,
        pareja1_id: Uuid,
        pareja2_id: Uuid,
        pareja1_gano: bool,
    ) -> Result<(Pareja, Pareja), AppError> {
        if pareja1_id == pareja2_id {
            return Err(AppError::ValidationFailed(
                "a pair cannot play against itself".into(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let pareja1 =
            sqlx::query_as::<_, Pareja>("SELECT * FROM parejas WHERE id = $1 FOR UPDATE")
                .bind(pareja1_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(AppError::NotFound("pair"))?;
        let pareja2 =
            sqlx::query_as::<_, Pareja>("SELECT * FROM parejas WHERE id = $1 FOR UPDATE")
                .bind(pareja2_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(AppError::NotFound("pair"))?;

        let plays_in = |p: &Pareja| p.jugador1_id == reporter_id || p.jugador2_id == reporter_id;
        if !plays_in(&pareja1) && !plays_in(&pareja2) {
            return Err(AppError::AuthorizationDenied(
                "only a player of either pair can report this result".into(),
            ));
        }

        let update = calculate_match_rankings(pareja1.elo, pareja2.elo, pareja1_gano);

        let pareja1 = sqlx::query_as::<_, Pareja>(
            "UPDATE parejas SET elo = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(pareja1_id)
        .bind(update.new_team1_rating)
        .fetch_one(&mut *tx)
        .await?;
        let pareja2 = sqlx::query_as::<_, Pareja>(
            "UPDATE parejas SET elo = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(pareja2_id)
        .bind(update.new_team2_rating)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            "Rated result: pair {} -> {}, pair {} -> {}",
            pareja1.id,
            pareja1.elo,
            pareja2.id,
            pareja2.elo
        );
        Ok((pareja1, pareja2))
    }

    /// Active pairs ranked by ELO, optionally within one category.
    pub async fn ranking(
        &self,
        categoria: Option<PairCategory>,
    ) -> Result<Vec<RankedPair>, AppError> {
        let pairs = self.queries.get_ranking(categoria).await?;
        Ok(pairs
            .into_iter()
            .enumerate()
            .map(|(i, pareja)| RankedPair {
                pareja,
                posicion: i as i64 + 1,
            })
            .collect())
    }

    /// Member-only deactivation; pairs never disappear from history.
    pub async fn deactivate(&self, pareja_id: Uuid, caller_id: Uuid) -> Result<(), AppError> {
        let pareja = self
            .queries
            .get_pair(pareja_id)
            .await?
            .ok_or(AppError::NotFound("pair"))?;

        if pareja.jugador1_id != caller_id && pareja.jugador2_id != caller_id {
            return Err(AppError::AuthorizationDenied(
                "only a member of the pair can deactivate it".into(),
            ));
        }

        self.queries.deactivate_pair(pareja_id).await?;
        tracing::info!("Pair {} deactivated by {}", pareja_id, caller_id);
        Ok(())
    }
}
