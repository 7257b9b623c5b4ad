// src/handlers/ranking_handler.rs
use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::middleware::auth::Claims;
use crate::models::pareja::{CreatePairRequest, PairResultRequest, RankingQuery};
use crate::ranking::PairService;
use crate::utils::parse_user::resolve_profile;

/// Create (or reuse) a pair with another player
#[tracing::instrument(
    name = "Create pair",
    skip(request, pool, claims),
    fields(user = %claims.nombre)
)]
pub async fn create_pair(
    request: web::Json<CreatePairRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let player = resolve_profile(pool.get_ref(), &claims).await?;

    let service = PairService::new(pool.get_ref().clone());
    let pareja = service.find_or_create(player.id, &request).await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Pareja lista para competir.",
        "data": pareja
    })))
}

/// Record a pair-vs-pair result and re-rate both pairs
#[tracing::instrument(
    name = "Record pair result",
    skip(request, pool, claims),
    fields(user = %claims.nombre)
)]
pub async fn record_pair_result(
    request: web::Json<PairResultRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let player = resolve_profile(pool.get_ref(), &claims).await?;

    let service = PairService::new(pool.get_ref().clone());
    let (pareja1, pareja2) = service
        .record_result(
            player.id,
            request.pareja1_id,
            request.pareja2_id,
            request.pareja1_gano,
        )
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Resultado registrado y ranking actualizado.",
        "data": { "pareja1": pareja1, "pareja2": pareja2 }
    })))
}

/// The pairs ranking, strongest first
#[tracing::instrument(name = "Get ranking", skip(query, pool))]
pub async fn get_ranking(
    query: web::Query<RankingQuery>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let service = PairService::new(pool.get_ref().clone());
    let ranking = service.ranking(query.categoria).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": ranking,
        "total_count": ranking.len()
    })))
}

/// Deactivate a pair (member only)
#[tracing::instrument(
    name = "Deactivate pair",
    skip(pool, claims),
    fields(pareja_id = %pareja_id, user = %claims.nombre)
)]
pub async fn deactivate_pair(
    pareja_id: Uuid,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let player = resolve_profile(pool.get_ref(), &claims).await?;

    let service = PairService::new(pool.get_ref().clone());
    service.deactivate(pareja_id, player.id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Pareja desactivada."
    })))
}
