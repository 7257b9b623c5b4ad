// src/matches/policy.rs
//
// Time-window and capacity rules of the match lifecycle, kept pure so they
// can be exercised without a database.

use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::club::ClubDeadline;
use crate::models::partido::MatchStatus;

/// Enrolled players may drop out until this close to start; later leaves are
/// rejected to protect the organizer from last-minute dropouts.
pub const LEAVE_PROTECTION_HOURS: i64 = 2;

/// Clubs that never configured a deadline retire under-filled matches this
/// many minutes before start.
pub const DEFAULT_CANCEL_DEADLINE_MINUTES: i64 = 120;

/// A player may leave while the match is still more than the protection
/// window away.
pub fn can_leave(match_start: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    match_start - now > Duration::hours(LEAVE_PROTECTION_HOURS)
}

/// The organizer may cancel any time strictly before start, full or not.
pub fn can_cancel(match_start: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now < match_start
}

/// An open community match looks for 1 to 3 missing players; the fourth
/// seat is the organizer's.
pub fn validate_missing_players(count: i32) -> Result<(), AppError> {
    if !(1..=3).contains(&count) {
        return Err(AppError::ValidationFailed(
            "a match looks for 1 to 3 missing players".into(),
        ));
    }
    Ok(())
}

/// An under-filled match is given up once it is too late to still find
/// players: within `deadline_minutes` of start, or already past it.
pub fn should_auto_cancel(
    match_start: DateTime<Utc>,
    now: DateTime<Utc>,
    deadline_minutes: i64,
) -> bool {
    (match_start - now).num_minutes() <= deadline_minutes
}

/// Listing status derived from stored state plus the clock. "Jugado" is
/// display-only: a match in the past is treated as played without ever
/// storing that.
pub fn display_status(estado: MatchStatus, fecha: DateTime<Utc>, now: DateTime<Utc>) -> &'static str {
    match estado {
        MatchStatus::Cancelado => "Cancelado",
        MatchStatus::Pendiente => "Pendiente",
        MatchStatus::Abierto if fecha < now => "Jugado",
        MatchStatus::Cerrado if fecha < now => "Jugado",
        MatchStatus::Abierto => "Buscando Jugadores",
        MatchStatus::Cerrado => "Cerrado",
    }
}

/// The slice of a match the sweep needs to decide on.
#[derive(Debug, FromRow, Clone)]
pub struct SweepCandidate {
    pub id: Uuid,
    pub fecha: DateTime<Utc>,
    pub lugar: String,
    pub cupos_disponibles: i32,
}

/// Pick the matches the sweep should retire. The owning club is resolved by
/// location prefix; a club with a nonsensical configured deadline is logged
/// and treated as unset rather than poisoning the rest of the scan.
pub fn select_matches_to_cancel(
    candidates: &[SweepCandidate],
    clubs: &[ClubDeadline],
    now: DateTime<Utc>,
) -> Vec<Uuid> {
    let mut to_cancel = Vec::new();

    for candidate in candidates {
        if candidate.cupos_disponibles <= 0 {
            continue;
        }

        let deadline_minutes = match clubs.iter().find(|c| candidate.lugar.starts_with(&c.nombre))
        {
            Some(club) if club.tiempo_cancelacion_minutos > 0 => {
                club.tiempo_cancelacion_minutos as i64
            }
            Some(club) => {
                tracing::warn!(
                    "Club '{}' has unusable cancel deadline {}, using default",
                    club.nombre,
                    club.tiempo_cancelacion_minutos
                );
                DEFAULT_CANCEL_DEADLINE_MINUTES
            }
            None => DEFAULT_CANCEL_DEADLINE_MINUTES,
        };

        if should_auto_cancel(candidate.fecha, now, deadline_minutes) {
            to_cancel.push(candidate.id);
        }
    }

    to_cancel
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, h, m, 0).unwrap()
    }

    #[test]
    fn test_leave_window_boundary() {
        let start = at(18, 0);
        assert!(can_leave(start, at(15, 0)));
        assert!(can_leave(start, at(15, 59)));
        // Exactly two hours out is already inside the protection window
        assert!(!can_leave(start, at(16, 0)));
        assert!(!can_leave(start, at(17, 30)));
        assert!(!can_leave(start, at(19, 0)));
    }

    #[test]
    fn test_cancel_allowed_strictly_before_start() {
        let start = at(18, 0);
        assert!(can_cancel(start, at(17, 59)));
        assert!(can_cancel(start, at(10, 0)));
        assert!(!can_cancel(start, at(18, 0)));
        assert!(!can_cancel(start, at(20, 0)));
    }

    #[test]
    fn test_missing_player_counts() {
        assert!(validate_missing_players(0).is_err());
        assert!(validate_missing_players(1).is_ok());
        assert!(validate_missing_players(3).is_ok());
        assert!(validate_missing_players(4).is_err());
        assert!(validate_missing_players(-1).is_err());
    }

    #[test]
    fn test_auto_cancel_deadline_boundary() {
        let start = at(18, 0);
        // 121 minutes out: still safe
        assert!(!should_auto_cancel(start, at(15, 59), 120));
        // exactly at the deadline: retired
        assert!(should_auto_cancel(start, at(16, 0), 120));
        assert!(should_auto_cancel(start, at(17, 30), 120));
        // already started and still short of players: retired too
        assert!(should_auto_cancel(start, at(19, 0), 120));
    }

    #[test]
    fn test_display_status_derives_played_from_the_clock() {
        let past = at(10, 0);
        let future = at(20, 0);
        let now = at(15, 0);
        assert_eq!(display_status(MatchStatus::Abierto, future, now), "Buscando Jugadores");
        assert_eq!(display_status(MatchStatus::Abierto, past, now), "Jugado");
        assert_eq!(display_status(MatchStatus::Cerrado, past, now), "Jugado");
        assert_eq!(display_status(MatchStatus::Cerrado, future, now), "Cerrado");
        // cancelled stays cancelled, past or not
        assert_eq!(display_status(MatchStatus::Cancelado, past, now), "Cancelado");
    }

    fn candidate(fecha: DateTime<Utc>, lugar: &str, cupos: i32) -> SweepCandidate {
        SweepCandidate {
            id: Uuid::new_v4(),
            fecha,
            lugar: lugar.to_string(),
            cupos_disponibles: cupos,
        }
    }

    fn clubs() -> Vec<ClubDeadline> {
        vec![
            ClubDeadline {
                nombre: "Club Norte".into(),
                tiempo_cancelacion_minutos: 60,
            },
            ClubDeadline {
                nombre: "Club Sur".into(),
                tiempo_cancelacion_minutos: 240,
            },
        ]
    }

    #[test]
    fn test_sweep_resolves_club_deadline_by_location_prefix() {
        let now = at(16, 0);
        // 120 minutes before start: inside Club Sur's 240 but outside Club
        // Norte's 60.
        let norte = candidate(at(18, 0), "Club Norte - cancha_1", 2);
        let sur = candidate(at(18, 0), "Club Sur - cancha_1", 2);
        let picked = select_matches_to_cancel(&[norte.clone(), sur.clone()], &clubs(), now);
        assert_eq!(picked, vec![sur.id]);
    }

    #[test]
    fn test_sweep_defaults_unknown_clubs_to_120_minutes() {
        let now = at(16, 0);
        let at_deadline = candidate(at(18, 0), "Cancha externa", 1);
        let outside = candidate(at(18, 1), "Cancha externa", 1);
        let picked =
            select_matches_to_cancel(&[at_deadline.clone(), outside], &clubs(), now);
        assert_eq!(picked, vec![at_deadline.id]);
    }

    #[test]
    fn test_sweep_skips_filled_matches() {
        let now = at(17, 0);
        let full = candidate(at(18, 0), "Club Norte - cancha_1", 0);
        assert!(select_matches_to_cancel(&[full], &clubs(), now).is_empty());
    }

    #[test]
    fn test_sweep_selection_is_idempotent() {
        let now = at(17, 30);
        let candidates = vec![
            candidate(at(18, 0), "Club Norte - cancha_1", 2),
            candidate(at(23, 0), "Club Norte - cancha_2", 1),
        ];
        let first = select_matches_to_cancel(&candidates, &clubs(), now);
        assert_eq!(first.len(), 1);

        // After cancelling, the retired match is no longer `abierto` and
        // drops out of the candidate set; a second pass picks nothing new.
        let remaining: Vec<SweepCandidate> = candidates
            .into_iter()
            .filter(|c| !first.contains(&c.id))
            .collect();
        assert!(select_matches_to_cancel(&remaining, &clubs(), now).is_empty());
    }

    #[test]
    fn test_sweep_treats_bad_club_deadline_as_default() {
        let bad_clubs = vec![ClubDeadline {
            nombre: "Club Roto".into(),
            tiempo_cancelacion_minutos: -5,
        }];
        let now = at(16, 0);
        let m = candidate(at(18, 0), "Club Roto - cancha_1", 2);
        // default 120 applies: exactly at the deadline, so retired
        let picked = select_matches_to_cancel(&[m.clone()], &bad_clubs, now);
        assert_eq!(picked, vec![m.id]);
    }
}
