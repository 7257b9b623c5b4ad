// src/handlers/club_handler.rs
use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::PgPool;

use crate::config::settings::PadelSettings;
use crate::db::club_queries::ClubQueries;
use crate::errors::AppError;
use crate::matches::MatchLifecycleService;
use crate::middleware::auth::Claims;
use crate::models::club::ClubSettingsRequest;
use crate::models::partido::ManualReservationRequest;
use crate::models::user::UserRole;
use crate::utils::parse_user::resolve_profile;

/// Create a manual court booking from the club desk
#[tracing::instrument(
    name = "Create manual reservation",
    skip(request, pool, claims),
    fields(club = %claims.nombre)
)]
pub async fn create_manual_reservation(
    request: web::Json<ManualReservationRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let club = resolve_profile(pool.get_ref(), &claims).await?;
    if club.rol != UserRole::AdminClub {
        return Err(AppError::AuthorizationDenied(
            "only club staff can book courts manually".into(),
        ));
    }

    let service = MatchLifecycleService::new(pool.get_ref().clone());
    let partido = service
        .create_manual_reservation(club.id, &club.nombre, &request)
        .await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Reserva registrada.",
        "data": partido
    })))
}

/// Save the club's reservation settings
#[tracing::instrument(
    name = "Save club settings",
    skip(request, pool, claims, padel),
    fields(club = %claims.nombre)
)]
pub async fn save_club_settings(
    request: web::Json<ClubSettingsRequest>,
    pool: web::Data<PgPool>,
    padel: web::Data<PadelSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let club = resolve_profile(pool.get_ref(), &claims).await?;
    if club.rol != UserRole::AdminClub {
        return Err(AppError::AuthorizationDenied(
            "only club staff can change club settings".into(),
        ));
    }

    if request.canchas_activas.is_empty() {
        return Err(AppError::ValidationFailed(
            "at least one court must stay active".into(),
        ));
    }
    if request.canchas_activas.iter().any(|n| *n < 1) {
        return Err(AppError::ValidationFailed("invalid court number".into()));
    }
    if request.slot_minutos != 60 && request.slot_minutos != 90 {
        return Err(AppError::ValidationFailed(
            "slot length must be 60 or 90 minutes".into(),
        ));
    }
    if request.tiempo_cancelacion_minutos < 0 {
        return Err(AppError::ValidationFailed(
            "the cancellation deadline cannot be negative".into(),
        ));
    }

    let queries = ClubQueries::new(pool.get_ref().clone());
    let config = queries
        .upsert_settings(club.id, &request, padel.default_utc_offset_hours)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Configuración guardada.",
        "data": config
    })))
}

/// Read the club's own settings
#[tracing::instrument(name = "Get club settings", skip(pool, claims), fields(club = %claims.nombre))]
pub async fn get_club_settings(
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let club = resolve_profile(pool.get_ref(), &claims).await?;

    let queries = ClubQueries::new(pool.get_ref().clone());
    let config = queries
        .get_club_config(club.id)
        .await?
        .ok_or(AppError::NotFound("club settings"))?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": config
    })))
}
