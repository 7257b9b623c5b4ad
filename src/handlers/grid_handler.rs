// src/handlers/grid_handler.rs
use actix_web::{web, HttpResponse};
use chrono::{NaiveDate, Utc};
use serde_json::json;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::matches::AutoCancelService;
use crate::models::club::GridQuery;
use crate::reservations::SlotGridService;

/// Resolve one club-day grid: reservations placed on their cells plus the
/// free future slots a player can pick to pre-fill a new match.
#[tracing::instrument(name = "Get club grid", skip(query, pool), fields(club = %club_nombre))]
pub async fn get_club_grid(
    club_nombre: String,
    query: web::Query<GridQuery>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    // Retire stale under-filled matches before rendering availability.
    AutoCancelService::new(pool.get_ref().clone()).run_and_log().await;

    let date = match &query.date {
        Some(raw) => Some(
            NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                AppError::ValidationFailed("invalid date, expected YYYY-MM-DD".into())
            })?,
        ),
        None => None,
    };

    let now = Utc::now();
    let service = SlotGridService::new(pool.get_ref().clone());
    let grid = service.day_grid(&club_nombre, date, now).await?;

    let reservations: Vec<_> = grid.reservations().cloned().collect();
    let available = grid.available_slots(now);

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": {
            "club": grid.club_nombre,
            "date": grid.date,
            "courts": grid.courts,
            "time_slots": grid.time_slots,
            "reservations": reservations,
            "available": available,
        }
    })))
}
