// src/routes/partidos.rs
use actix_web::{get, post, web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::handlers::{grid_handler, partido_handler};
use crate::middleware::auth::Claims;
use crate::models::club::GridQuery;
use crate::models::partido::{CreateMatchRequest, MatchListQuery};

/// Create an open community match
#[post("")]
async fn create_match(
    request: web::Json<CreateMatchRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    partido_handler::create_match(request, pool, claims).await
}

/// List open matches (runs the auto-cancel sweep first)
#[get("")]
async fn list_open_matches(
    query: web::Query<MatchListQuery>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    partido_handler::list_open_matches(query, pool).await
}

/// List the caller's matches
#[get("/mine")]
async fn list_my_matches(
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    partido_handler::list_my_matches(pool, claims).await
}

/// Get one match
#[get("/{partido_id}")]
async fn get_match(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    partido_handler::get_match(path.into_inner(), pool).await
}

/// Join an open match
#[post("/{partido_id}/join")]
async fn join_match(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    partido_handler::join_match(path.into_inner(), pool, claims).await
}

/// Leave a match
#[post("/{partido_id}/leave")]
async fn leave_match(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    partido_handler::leave_match(path.into_inner(), pool, claims).await
}

/// Cancel a match (organizer only)
#[post("/{partido_id}/cancel")]
async fn cancel_match(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    partido_handler::cancel_match(path.into_inner(), pool, claims).await
}

/// A club's day grid, as players see it
#[get("/{club_nombre}/grid")]
async fn get_club_grid(
    path: web::Path<String>,
    query: web::Query<GridQuery>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    grid_handler::get_club_grid(path.into_inner(), query, pool).await
}
