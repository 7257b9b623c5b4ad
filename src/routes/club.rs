// src/routes/club.rs
use actix_web::{get, post, put, web, HttpResponse};
use sqlx::PgPool;

use crate::errors::AppError;
use crate::handlers::{club_handler, grid_handler};
use crate::middleware::auth::Claims;
use crate::models::club::{ClubSettingsRequest, GridQuery};
use crate::models::partido::ManualReservationRequest;
use crate::config::settings::PadelSettings;

/// Manual court booking from the club desk
#[post("/reservas")]
async fn create_manual_reservation(
    request: web::Json<ManualReservationRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    club_handler::create_manual_reservation(request, pool, claims).await
}

/// Read the club's own settings
#[get("/configuracion")]
async fn get_club_settings(
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    club_handler::get_club_settings(pool, claims).await
}

/// Save the club's settings
#[put("/configuracion")]
async fn save_club_settings(
    request: web::Json<ClubSettingsRequest>,
    pool: web::Data<PgPool>,
    padel: web::Data<PadelSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    club_handler::save_club_settings(request, pool, padel, claims).await
}

/// The staff view of the club's own day grid
#[get("/grid")]
async fn get_own_club_grid(
    query: web::Query<GridQuery>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    grid_handler::get_club_grid(claims.nombre.clone(), query, pool).await
}
