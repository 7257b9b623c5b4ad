// src/matches/sweep.rs
use chrono::Utc;
use sqlx::PgPool;

use crate::db::club_queries::ClubQueries;
use crate::db::match_queries::MatchQueries;
use crate::errors::AppError;
use crate::matches::policy;

/// Retires open matches that stayed short of players past their club's
/// deadline. There is no background scheduler: listing handlers run this
/// opportunistically before rendering, so staleness is bounded by how often
/// the listings are viewed.
pub struct AutoCancelService {
    match_queries: MatchQueries,
    club_queries: ClubQueries,
}

impl AutoCancelService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            match_queries: MatchQueries::new(pool.clone()),
            club_queries: ClubQueries::new(pool),
        }
    }

    /// One sweep pass. Idempotent: everything it cancels leaves the
    /// candidate set, and the batch update only touches rows still
    /// `abierto`. Returns how many matches were retired.
    pub async fn run(&self) -> Result<u64, AppError> {
        let candidates = self.match_queries.get_open_matches_missing_players().await?;
        if candidates.is_empty() {
            return Ok(0);
        }

        let clubs = self.club_queries.list_club_deadlines().await?;
        let to_cancel = policy::select_matches_to_cancel(&candidates, &clubs, Utc::now());
        if to_cancel.is_empty() {
            return Ok(0);
        }

        let cancelled = self.match_queries.cancel_matches(&to_cancel).await?;
        tracing::info!(
            "Auto-cancel sweep retired {} under-filled match(es)",
            cancelled
        );
        Ok(cancelled)
    }

    /// Listing-path wrapper: a failed sweep must never block the listing
    /// itself, so errors are logged and swallowed here.
    pub async fn run_and_log(&self) {
        if let Err(e) = self.run().await {
            tracing::error!("Auto-cancel sweep failed: {}", e);
        }
    }
}
