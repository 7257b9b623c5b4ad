// src/db/club_queries.rs
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::club::{ClubConfig, ClubDeadline, ClubSettingsRequest};

#[derive(Debug)]
pub struct ClubQueries {
    pool: PgPool,
}

impl ClubQueries {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_club_config(
        &self,
        club_id: Uuid,
    ) -> Result<Option<ClubConfig>, sqlx::Error> {
        sqlx::query_as::<_, ClubConfig>("SELECT * FROM club_settings WHERE club_id = $1")
            .bind(club_id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Settings projection for a club referenced the way matches reference
    /// it: by display name.
    pub async fn get_club_config_by_name(
        &self,
        club_nombre: &str,
    ) -> Result<Option<ClubConfig>, sqlx::Error> {
        sqlx::query_as::<_, ClubConfig>(
            r#"
            SELECT cs.* FROM club_settings cs
            JOIN users u ON u.id = cs.club_id
            WHERE u.nombre = $1 AND u.rol = 'admin_club'
            "#,
        )
        .bind(club_nombre)
        .fetch_optional(&self.pool)
        .await
    }

    /// Every club with its configured auto-cancel deadline; clubs that never
    /// saved settings fall back to the 120-minute default.
    pub async fn list_club_deadlines(&self) -> Result<Vec<ClubDeadline>, sqlx::Error> {
        sqlx::query_as::<_, ClubDeadline>(
            r#"
            SELECT u.nombre, COALESCE(cs.tiempo_cancelacion_minutos, 120) AS tiempo_cancelacion_minutos
            FROM users u
            LEFT JOIN club_settings cs ON cs.club_id = u.id
            WHERE u.rol = 'admin_club'
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    pub async fn upsert_settings(
        &self,
        club_id: Uuid,
        settings: &ClubSettingsRequest,
        default_offset_hours: i32,
    ) -> Result<ClubConfig, sqlx::Error> {
        sqlx::query_as::<_, ClubConfig>(
            r#"
            INSERT INTO club_settings (
                club_id, canchas_activas, slot_minutos, precio_hora_base,
                precio_fin_semana, tiempo_cancelacion_minutos, utc_offset_hours,
                horarios_prime, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW())
            ON CONFLICT (club_id) DO UPDATE SET
                canchas_activas = EXCLUDED.canchas_activas,
                slot_minutos = EXCLUDED.slot_minutos,
                precio_hora_base = EXCLUDED.precio_hora_base,
                precio_fin_semana = EXCLUDED.precio_fin_semana,
                tiempo_cancelacion_minutos = EXCLUDED.tiempo_cancelacion_minutos,
                utc_offset_hours = EXCLUDED.utc_offset_hours,
                horarios_prime = EXCLUDED.horarios_prime,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(club_id)
        .bind(&settings.canchas_activas)
        .bind(settings.slot_minutos)
        .bind(settings.precio_hora_base)
        .bind(settings.precio_fin_semana)
        .bind(settings.tiempo_cancelacion_minutos)
        .bind(settings.utc_offset_hours.unwrap_or(default_offset_hours))
        .bind(&settings.horarios_prime)
        .fetch_one(&self.pool)
        .await
    }
}
