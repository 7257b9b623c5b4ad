// src/reservations/location.rs
//
// The legacy `lugar` field multiplexes three things: the club, the court and
// (for manual bookings) the name the court is held under. This module is the
// single place that encodes or parses that string:
//
//   "<club>[ - cancha_<N>][ - a nombre de <name>]"

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

const BOUND_NAME_DELIMITER: &str = "a nombre de ";

static CANCHA_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_cancha_regex() -> &'static Regex {
    CANCHA_REGEX.get_or_init(|| {
        Regex::new(r"(?i)cancha_(\d+)").expect("Failed to compile cancha regex")
    })
}

/// Structured view of a match location.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CourtLocation {
    pub club_name: String,
    /// 1-based court designator as printed on the club's wall.
    pub court_number: Option<i32>,
    /// Display name a manual booking is held under.
    pub bound_player_name: Option<String>,
}

impl CourtLocation {
    pub fn new(club_name: impl Into<String>) -> Self {
        Self {
            club_name: club_name.into(),
            court_number: None,
            bound_player_name: None,
        }
    }

    pub fn with_court(mut self, court_number: i32) -> Self {
        self.court_number = Some(court_number);
        self
    }

    pub fn with_bound_player(mut self, name: impl Into<String>) -> Self {
        self.bound_player_name = Some(name.into());
        self
    }

    /// Zero-based grid column for this location, if the court designator is
    /// present and sane.
    pub fn court_index(&self) -> Option<usize> {
        match self.court_number {
            Some(n) if n >= 1 => Some((n - 1) as usize),
            _ => None,
        }
    }

    /// Render the legacy string stored in `partidos.lugar`.
    pub fn encode(&self) -> String {
        let mut out = self.club_name.clone();
        if let Some(n) = self.court_number {
            out.push_str(&format!(" - cancha_{}", n));
        }
        if let Some(name) = &self.bound_player_name {
            out.push_str(&format!(" - {}{}", BOUND_NAME_DELIMITER, name));
        }
        out
    }

    /// Parse a legacy location string. Never fails: missing pieces come back
    /// as `None`, and the club name falls back to the full string when no
    /// delimiter is present.
    pub fn parse(lugar: &str) -> Self {
        let court_number = get_cancha_regex()
            .captures(lugar)
            .and_then(|cap| cap.get(1))
            .and_then(|m| m.as_str().parse::<i32>().ok());

        let bound_player_name = lugar
            .split_once(BOUND_NAME_DELIMITER)
            .map(|(_, name)| name.trim().to_string())
            .filter(|name| !name.is_empty());

        let club_name = lugar
            .split_once(" - ")
            .map(|(club, _)| club)
            .unwrap_or(lugar)
            .trim()
            .to_string();

        Self {
            club_name,
            court_number,
            bound_player_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_all_three_pieces() {
        let loc = CourtLocation::new("Club Campestre")
            .with_court(2)
            .with_bound_player("Carlos");
        assert_eq!(
            loc.encode(),
            "Club Campestre - cancha_2 - a nombre de Carlos"
        );
    }

    #[test]
    fn test_encode_club_only() {
        assert_eq!(CourtLocation::new("La Cabaña").encode(), "La Cabaña");
    }

    #[test]
    fn test_parse_round_trips_the_three_pieces() {
        let loc = CourtLocation::parse("Club Campestre - cancha_3 - a nombre de Andrés");
        assert_eq!(loc.club_name, "Club Campestre");
        assert_eq!(loc.court_number, Some(3));
        assert_eq!(loc.bound_player_name.as_deref(), Some("Andrés"));
    }

    #[test]
    fn test_parse_is_case_insensitive_on_the_court_token() {
        let loc = CourtLocation::parse("Padel Center - CANCHA_4");
        assert_eq!(loc.court_number, Some(4));
        assert_eq!(loc.bound_player_name, None);
    }

    #[test]
    fn test_parse_without_court_token_yields_no_index() {
        let loc = CourtLocation::parse("Cancha externa del barrio");
        assert_eq!(loc.court_number, None);
        assert_eq!(loc.court_index(), None);
        assert_eq!(loc.club_name, "Cancha externa del barrio");
    }

    #[test]
    fn test_court_index_is_zero_based() {
        assert_eq!(CourtLocation::parse("X - cancha_1").court_index(), Some(0));
        assert_eq!(CourtLocation::parse("X - cancha_2").court_index(), Some(1));
        // cancha_0 is nonsense on the wall; refuse to index it
        assert_eq!(CourtLocation::parse("X - cancha_0").court_index(), None);
    }

    #[test]
    fn test_absurd_court_numbers_do_not_panic() {
        let loc = CourtLocation::parse("X - cancha_99999999999999999999");
        assert_eq!(loc.court_number, None);
    }
}
