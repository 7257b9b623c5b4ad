// src/handlers/partido_handler.rs
use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matches::{AutoCancelService, MatchLifecycleService};
use crate::middleware::auth::Claims;
use crate::models::partido::{CreateMatchRequest, MatchListQuery};
use crate::utils::parse_user::resolve_profile;

/// Create an open community match
#[tracing::instrument(
    name = "Create open match",
    skip(request, pool, claims),
    fields(
        user = %claims.nombre,
        request = %request
    )
)]
pub async fn create_match(
    request: web::Json<CreateMatchRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let player = resolve_profile(pool.get_ref(), &claims).await?;

    let service = MatchLifecycleService::new(pool.get_ref().clone());
    let partido = service.create_open_match(player.id, &request).await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Tu partido ya está visible para la comunidad.",
        "data": partido
    })))
}

/// List open matches. The auto-cancel sweep runs first so under-filled
/// matches past their deadline never reach the listing.
#[tracing::instrument(name = "List open matches", skip(query, pool))]
pub async fn list_open_matches(
    query: web::Query<MatchListQuery>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    AutoCancelService::new(pool.get_ref().clone()).run_and_log().await;

    let service = MatchLifecycleService::new(pool.get_ref().clone());
    let matches = service.list_open_matches(query.club.as_deref()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": matches,
        "total_count": matches.len()
    })))
}

/// List the caller's created and joined matches
#[tracing::instrument(name = "List my matches", skip(pool, claims), fields(user = %claims.nombre))]
pub async fn list_my_matches(
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    AutoCancelService::new(pool.get_ref().clone()).run_and_log().await;

    let player = resolve_profile(pool.get_ref(), &claims).await?;
    let service = MatchLifecycleService::new(pool.get_ref().clone());
    let matches = service.list_player_matches(player.id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": matches,
        "total_count": matches.len()
    })))
}

/// Join an open match
#[tracing::instrument(
    name = "Join match",
    skip(pool, claims),
    fields(partido_id = %partido_id, user = %claims.nombre)
)]
pub async fn join_match(
    partido_id: Uuid,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let player = resolve_profile(pool.get_ref(), &claims).await?;

    let service = MatchLifecycleService::new(pool.get_ref().clone());
    service.join_match(partido_id, player.id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Te has apuntado al partido. Lleva tu mejor pala."
    })))
}

/// Leave a match outside the protection window
#[tracing::instrument(
    name = "Leave match",
    skip(pool, claims),
    fields(partido_id = %partido_id, user = %claims.nombre)
)]
pub async fn leave_match(
    partido_id: Uuid,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let player = resolve_profile(pool.get_ref(), &claims).await?;

    let service = MatchLifecycleService::new(pool.get_ref().clone());
    service.leave_match(partido_id, player.id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Has liberado tu cupo en este partido."
    })))
}

/// Cancel a match (organizer only)
#[tracing::instrument(
    name = "Cancel match",
    skip(pool, claims),
    fields(partido_id = %partido_id, user = %claims.nombre)
)]
pub async fn cancel_match(
    partido_id: Uuid,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let player = resolve_profile(pool.get_ref(), &claims).await?;

    let service = MatchLifecycleService::new(pool.get_ref().clone());
    service.cancel_match(partido_id, player.id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Partido cancelado. Se ha avisado a los inscritos."
    })))
}

/// Get a single match with its enrollments
#[tracing::instrument(name = "Get match", skip(pool), fields(partido_id = %partido_id))]
pub async fn get_match(
    partido_id: Uuid,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let service = MatchLifecycleService::new(pool.get_ref().clone());
    let (partido, inscripciones) = service.get_match_detail(partido_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": {
            "partido": partido,
            "inscripciones": inscripciones
        }
    })))
}
