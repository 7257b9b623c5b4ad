// src/db/pair_queries.rs
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::{map_db_error, AppError};
use crate::models::pareja::{Pareja, PairCategory};

#[derive(Debug)]
pub struct PairQueries {
    pool: PgPool,
}

impl PairQueries {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_pair(&self, pareja_id: Uuid) -> Result<Option<Pareja>, sqlx::Error> {
        sqlx::query_as::<_, Pareja>("SELECT * FROM parejas WHERE id = $1")
            .bind(pareja_id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Unordered lookup: (A,B) and (B,A) are the same pair.
    pub async fn find_by_players(
        &self,
        jugador_a: Uuid,
        jugador_b: Uuid,
    ) -> Result<Option<Pareja>, sqlx::Error> {
        sqlx::query_as::<_, Pareja>(
            r#"
            SELECT * FROM parejas
            WHERE (jugador1_id = $1 AND jugador2_id = $2)
               OR (jugador1_id = $2 AND jugador2_id = $1)
            "#,
        )
        .bind(jugador_a)
        .bind(jugador_b)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn insert_pair(
        &self,
        jugador1_id: Uuid,
        jugador2_id: Uuid,
        nombre_pareja: &str,
        categoria: PairCategory,
        elo: i32,
    ) -> Result<Pareja, AppError> {
        sqlx::query_as::<_, Pareja>(
            r#"
            INSERT INTO parejas (jugador1_id, jugador2_id, nombre_pareja, categoria, elo)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(jugador1_id)
        .bind(jugador2_id)
        .bind(nombre_pareja)
        .bind(categoria)
        .bind(elo)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    pub async fn rename_pair(
        &self,
        pareja_id: Uuid,
        nombre_pareja: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE parejas SET nombre_pareja = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(pareja_id)
        .bind(nombre_pareja)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Active pairs ordered by rating, strongest first.
    pub async fn get_ranking(
        &self,
        categoria: Option<PairCategory>,
    ) -> Result<Vec<Pareja>, sqlx::Error> {
        match categoria {
            Some(categoria) => {
                sqlx::query_as::<_, Pareja>(
                    r#"
                    SELECT * FROM parejas
                    WHERE activa = TRUE AND categoria = $1
                    ORDER BY elo DESC, nombre_pareja ASC
                    "#,
                )
                .bind(categoria)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, Pareja>(
                    r#"
                    SELECT * FROM parejas
                    WHERE activa = TRUE
                    ORDER BY elo DESC, nombre_pareja ASC
                    "#,
                )
                .fetch_all(&self.pool)
                .await
            }
        }
    }

    /// Pairs are never hard-deleted, only switched off.
    pub async fn deactivate_pair(&self, pareja_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE parejas SET activa = FALSE, updated_at = NOW() WHERE id = $1 AND activa = TRUE",
        )
        .bind(pareja_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
