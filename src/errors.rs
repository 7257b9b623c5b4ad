use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde_json::json;
use thiserror::Error;

/// Failure kinds surfaced by the match, reservation and ranking operations.
/// Every mutating operation either fully succeeds or fails with one of these
/// before touching any row.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("authentication required")]
    AuthenticationRequired,

    #[error("not allowed: {0}")]
    AuthorizationDenied(String),

    #[error("invalid request: {0}")]
    ValidationFailed(String),

    #[error("the match is already full")]
    CapacityExceeded,

    #[error("you are already enrolled in this match")]
    DuplicateEnrollment,

    #[error("{0}")]
    PolicyWindowViolation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("database error")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::AuthenticationRequired => "authentication_required",
            AppError::AuthorizationDenied(_) => "authorization_denied",
            AppError::ValidationFailed(_) => "validation_failed",
            AppError::CapacityExceeded => "capacity_exceeded",
            AppError::DuplicateEnrollment => "duplicate_enrollment",
            AppError::PolicyWindowViolation(_) => "policy_window_violation",
            AppError::NotFound(_) => "not_found",
            AppError::Database(_) => "database_error",
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::AuthenticationRequired => StatusCode::UNAUTHORIZED,
            AppError::AuthorizationDenied(_) => StatusCode::FORBIDDEN,
            AppError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            AppError::CapacityExceeded
            | AppError::DuplicateEnrollment
            | AppError::PolicyWindowViolation(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Database(e) = self {
            tracing::error!("Database error: {:?}", e);
        }
        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "error": self.kind(),
            "message": self.to_string(),
        }))
    }
}

/// Map a sqlx error to the taxonomy, translating the unique-constraint
/// violations the schema uses to enforce lifecycle invariants.
pub fn map_db_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if let Some(constraint) = db_err.constraint() {
            return match constraint {
                "uq_inscripcion" => AppError::DuplicateEnrollment,
                "uq_partidos_club_cancha_fecha" => AppError::ValidationFailed(
                    "that court and time is already reserved".into(),
                ),
                "uq_parejas_jugadores" => {
                    AppError::ValidationFailed("this pair already exists".into())
                }
                _ => AppError::Database(e),
            };
        }
    }
    AppError::Database(e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn test_status_codes_follow_error_kind() {
        assert_eq!(
            AppError::AuthenticationRequired.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::AuthorizationDenied("club staff only".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(AppError::CapacityExceeded.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::DuplicateEnrollment.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::NotFound("match").status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_kind_strings_are_stable() {
        assert_eq!(AppError::CapacityExceeded.kind(), "capacity_exceeded");
        assert_eq!(AppError::DuplicateEnrollment.kind(), "duplicate_enrollment");
        assert_eq!(
            AppError::PolicyWindowViolation("too late".into()).kind(),
            "policy_window_violation"
        );
    }
}
