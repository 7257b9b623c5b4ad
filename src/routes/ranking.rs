// src/routes/ranking.rs
use actix_web::{get, post, web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::handlers::ranking_handler;
use crate::middleware::auth::Claims;
use crate::models::pareja::{CreatePairRequest, PairResultRequest, RankingQuery};

/// Create (or reuse) a pair
#[post("")]
async fn create_pair(
    request: web::Json<CreatePairRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    ranking_handler::create_pair(request, pool, claims).await
}

/// Record a rated pair-vs-pair result
#[post("/resultado")]
async fn record_pair_result(
    request: web::Json<PairResultRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    ranking_handler::record_pair_result(request, pool, claims).await
}

/// Deactivate a pair
#[post("/{pareja_id}/deactivate")]
async fn deactivate_pair(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    ranking_handler::deactivate_pair(path.into_inner(), pool, claims).await
}

/// The pairs ranking
#[get("")]
async fn get_ranking(
    query: web::Query<RankingQuery>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    ranking_handler::get_ranking(query, pool).await
}
