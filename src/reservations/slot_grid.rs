// src/reservations/slot_grid.rs
//
// Maps one club-day onto a (court, time-slot) grid. Day boundaries and slot
// labels are computed in the club's civil time, driven by the per-club UTC
// offset — never by UTC midnight.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::db::club_queries::ClubQueries;
use crate::db::match_queries::MatchQueries;
use crate::errors::AppError;
use crate::models::partido::{MatchStatus, Partido};
use crate::reservations::location::CourtLocation;

/// Offset used when a club never configured one (Manizales).
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = -5;

/// Court count assumed for clubs without a settings row.
pub const DEFAULT_COURT_COUNT: usize = 4;

/// The booking ladder the clubs run at 90-minute pitch.
pub const DEFAULT_TIME_SLOTS: [&str; 12] = [
    "07:00", "08:30", "10:00", "11:30", "13:00", "14:30", "16:00", "17:30", "19:00", "20:30",
    "22:00", "23:30",
];

pub fn club_offset(hours: i32) -> FixedOffset {
    FixedOffset::east_opt(hours * 3600).unwrap_or_else(|| {
        FixedOffset::east_opt(DEFAULT_UTC_OFFSET_HOURS * 3600).expect("default offset is valid")
    })
}

/// UTC instants bounding one civil day in the given offset: `[start, end)`.
pub fn day_bounds(
    date: NaiveDate,
    offset: FixedOffset,
) -> Result<(DateTime<Utc>, DateTime<Utc>), AppError> {
    let start_local = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| AppError::ValidationFailed("invalid date".into()))?;
    let start = offset
        .from_local_datetime(&start_local)
        .single()
        .ok_or_else(|| AppError::ValidationFailed("invalid date".into()))?
        .with_timezone(&Utc);
    Ok((start, start + Duration::days(1)))
}

/// One placed match on the grid.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GridReservation {
    pub partido_id: Uuid,
    pub court_index: usize,
    pub time_index: usize,
    pub occupant: String,
    pub tipo: ReservationKind,
    pub estado: MatchStatus,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReservationKind {
    PartidoApp,
    Manual,
}

/// What a free, future cell offers: everything needed to pre-fill a new
/// match at exactly this club, court and instant.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SlotSelection {
    pub club_nombre: String,
    pub date: NaiveDate,
    pub time_label: String,
    pub court_number: i32,
    pub fecha: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SlotState {
    Occupied(GridReservation),
    Available(SlotSelection),
    /// The slot's time-of-day already passed; nothing is offered.
    Past,
}

/// The resolved grid for one club-day.
#[derive(Debug, Clone)]
pub struct DayGrid {
    pub club_nombre: String,
    pub date: NaiveDate,
    pub offset: FixedOffset,
    pub courts: Vec<String>,
    pub time_slots: Vec<String>,
    cells: HashMap<(usize, usize), GridReservation>,
}

impl DayGrid {
    /// Place a day's matches onto the grid.
    ///
    /// A match lands on a cell only when its timestamp falls inside the
    /// club-local day, its location carries the club prefix, its local
    /// time-of-day matches a slot label exactly, and its court designator
    /// is in range. Anything else stays off the grid but remains a
    /// perfectly valid match entity.
    pub fn build(
        club_nombre: &str,
        court_count: usize,
        time_slots: &[String],
        date: NaiveDate,
        offset: FixedOffset,
        partidos: &[Partido],
    ) -> Result<Self, AppError> {
        let (day_start, day_end) = day_bounds(date, offset)?;
        let mut cells: HashMap<(usize, usize), GridReservation> = HashMap::new();

        for p in partidos {
            if p.fecha < day_start || p.fecha >= day_end {
                continue;
            }
            if !p.lugar.starts_with(club_nombre) {
                continue;
            }

            let local_label = p.fecha.with_timezone(&offset).format("%H:%M").to_string();
            let Some(time_index) = time_slots.iter().position(|s| *s == local_label) else {
                continue;
            };

            let location = CourtLocation::parse(&p.lugar);
            let Some(court_index) = location.court_index() else {
                continue;
            };
            if court_index >= court_count {
                continue;
            }

            let occupant = occupant_label(&location, p.estado);
            let tipo = if p.tipo_partido.to_lowercase().contains("amistoso") {
                ReservationKind::PartidoApp
            } else {
                ReservationKind::Manual
            };

            let key = (court_index, time_index);
            if let Some(existing) = cells.get(&key) {
                // Double-booked cell: the lifecycle layer's uniqueness index
                // should make this impossible; keep the first and flag it.
                tracing::warn!(
                    "Double-booked cell ({}, {}) at {}: keeping {} over {}",
                    court_index,
                    time_index,
                    club_nombre,
                    existing.partido_id,
                    p.id
                );
                continue;
            }
            cells.insert(
                key,
                GridReservation {
                    partido_id: p.id,
                    court_index,
                    time_index,
                    occupant,
                    tipo,
                    estado: p.estado,
                },
            );
        }

        Ok(Self {
            club_nombre: club_nombre.to_string(),
            date,
            offset,
            courts: (1..=court_count).map(|n| format!("Cancha {}", n)).collect(),
            time_slots: time_slots.to_vec(),
            cells,
        })
    }

    /// At most one match occupies a cell.
    pub fn cell(&self, court_index: usize, time_index: usize) -> Option<&GridReservation> {
        self.cells.get(&(court_index, time_index))
    }

    pub fn reservations(&self) -> impl Iterator<Item = &GridReservation> {
        self.cells.values()
    }

    /// UTC instant of a slot on this grid's day.
    pub fn slot_instant(&self, time_index: usize) -> Option<DateTime<Utc>> {
        let label = self.time_slots.get(time_index)?;
        let time = NaiveTime::parse_from_str(label, "%H:%M").ok()?;
        self.offset
            .from_local_datetime(&self.date.and_time(time))
            .single()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Resolve what a cell offers right now: its occupant, a pre-filled
    /// selection, or nothing because the time already passed.
    pub fn slot_state(
        &self,
        court_index: usize,
        time_index: usize,
        now: DateTime<Utc>,
    ) -> Option<SlotState> {
        if court_index >= self.courts.len() || time_index >= self.time_slots.len() {
            return None;
        }
        if let Some(reservation) = self.cell(court_index, time_index) {
            return Some(SlotState::Occupied(reservation.clone()));
        }
        let instant = self.slot_instant(time_index)?;
        if instant <= now {
            return Some(SlotState::Past);
        }
        Some(SlotState::Available(SlotSelection {
            club_nombre: self.club_nombre.clone(),
            date: self.date,
            time_label: self.time_slots[time_index].clone(),
            court_number: court_index as i32 + 1,
            fecha: instant,
        }))
    }

    /// All free, still-bookable cells of the day.
    pub fn available_slots(&self, now: DateTime<Utc>) -> Vec<SlotSelection> {
        let mut out = Vec::new();
        for court_index in 0..self.courts.len() {
            for time_index in 0..self.time_slots.len() {
                if let Some(SlotState::Available(sel)) =
                    self.slot_state(court_index, time_index, now)
                {
                    out.push(sel);
                }
            }
        }
        out
    }
}

fn occupant_label(location: &CourtLocation, estado: MatchStatus) -> String {
    if let Some(name) = &location.bound_player_name {
        return name.clone();
    }
    if estado == MatchStatus::Abierto {
        return "Partido Abierto".to_string();
    }
    "Reservado".to_string()
}

/// Loads a club's configuration and matches, then resolves the day grid.
pub struct SlotGridService {
    match_queries: MatchQueries,
    club_queries: ClubQueries,
}

impl SlotGridService {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self {
            match_queries: MatchQueries::new(pool.clone()),
            club_queries: ClubQueries::new(pool),
        }
    }

    /// Build the grid for `club_nombre` on `date` (today in the club's
    /// offset when not given).
    pub async fn day_grid(
        &self,
        club_nombre: &str,
        date: Option<NaiveDate>,
        now: DateTime<Utc>,
    ) -> Result<DayGrid, AppError> {
        let config = self
            .club_queries
            .get_club_config_by_name(club_nombre)
            .await?;

        let (court_count, offset) = match &config {
            Some(cfg) => (
                cfg.canchas_activas.len().max(1),
                club_offset(cfg.utc_offset_hours),
            ),
            None => (DEFAULT_COURT_COUNT, club_offset(DEFAULT_UTC_OFFSET_HOURS)),
        };

        let date = date.unwrap_or_else(|| now.with_timezone(&offset).date_naive());
        let (day_start, day_end) = day_bounds(date, offset)?;

        let partidos = self
            .match_queries
            .get_club_matches_between(club_nombre, day_start, day_end)
            .await?;

        let time_slots: Vec<String> = DEFAULT_TIME_SLOTS.iter().map(|s| s.to_string()).collect();

        DayGrid::build(
            club_nombre,
            court_count,
            &time_slots,
            date,
            offset,
            &partidos,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn offset() -> FixedOffset {
        club_offset(-5)
    }

    fn slots() -> Vec<String> {
        ["18:00", "19:30", "21:00"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn make_partido(fecha: DateTime<Utc>, lugar: &str, estado: MatchStatus) -> Partido {
        let location = CourtLocation::parse(lugar);
        Partido {
            id: Uuid::new_v4(),
            creador_id: Uuid::new_v4(),
            fecha,
            lugar: lugar.to_string(),
            club_nombre: location.club_name.clone(),
            cancha_numero: location.court_number,
            a_nombre_de: location.bound_player_name.clone(),
            estado,
            tipo_partido: "Amistoso".to_string(),
            nivel: "intermedio".to_string(),
            sexo: "mixto".to_string(),
            cupos_totales: 4,
            cupos_disponibles: 2,
            precio_por_persona: 0,
            resultado: None,
            created_at: fecha,
            updated_at: fecha,
        }
    }

    /// 19:30 club-local on 2024-05-10 at UTC-5 is 2024-05-11T00:30Z.
    fn local_1930_utc() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 11, 0, 30, 0).unwrap()
    }

    fn target_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    #[test]
    fn test_day_bounds_follow_club_local_midnight() {
        let (start, end) = day_bounds(target_date(), offset()).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 5, 10, 5, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 5, 11, 5, 0, 0).unwrap());
    }

    #[test]
    fn test_match_lands_on_its_court_and_time_cell() {
        let p = make_partido(local_1930_utc(), "Club Norte - cancha_2", MatchStatus::Abierto);
        let grid =
            DayGrid::build("Club Norte", 4, &slots(), target_date(), offset(), &[p.clone()])
                .unwrap();

        let cell = grid.cell(1, 1).expect("match should be placed");
        assert_eq!(cell.partido_id, p.id);
        // ... and nowhere else
        for court in 0..4 {
            for time in 0..3 {
                if (court, time) != (1, 1) {
                    assert!(grid.cell(court, time).is_none());
                }
            }
        }
    }

    #[test]
    fn test_match_without_court_token_is_excluded() {
        let p = make_partido(local_1930_utc(), "Club Norte", MatchStatus::Abierto);
        let grid =
            DayGrid::build("Club Norte", 4, &slots(), target_date(), offset(), &[p]).unwrap();
        assert_eq!(grid.reservations().count(), 0);
    }

    #[test]
    fn test_match_off_the_slot_ladder_is_excluded() {
        // 19:45 local is not a label on the ladder
        let fecha = Utc.with_ymd_and_hms(2024, 5, 11, 0, 45, 0).unwrap();
        let p = make_partido(fecha, "Club Norte - cancha_2", MatchStatus::Abierto);
        let grid =
            DayGrid::build("Club Norte", 4, &slots(), target_date(), offset(), &[p]).unwrap();
        assert_eq!(grid.reservations().count(), 0);
    }

    #[test]
    fn test_out_of_range_court_is_excluded() {
        let p = make_partido(local_1930_utc(), "Club Norte - cancha_9", MatchStatus::Abierto);
        let grid =
            DayGrid::build("Club Norte", 4, &slots(), target_date(), offset(), &[p]).unwrap();
        assert_eq!(grid.reservations().count(), 0);
    }

    #[test]
    fn test_other_clubs_matches_are_excluded() {
        let p = make_partido(local_1930_utc(), "Otro Club - cancha_1", MatchStatus::Abierto);
        let grid =
            DayGrid::build("Club Norte", 4, &slots(), target_date(), offset(), &[p]).unwrap();
        assert_eq!(grid.reservations().count(), 0);
    }

    #[test]
    fn test_match_outside_the_local_day_is_excluded() {
        // 23:00 UTC on the 9th is 18:00 local on the 9th — previous civil day
        let fecha = Utc.with_ymd_and_hms(2024, 5, 9, 23, 0, 0).unwrap();
        let p = make_partido(fecha, "Club Norte - cancha_1", MatchStatus::Abierto);
        let grid =
            DayGrid::build("Club Norte", 4, &slots(), target_date(), offset(), &[p]).unwrap();
        assert_eq!(grid.reservations().count(), 0);
    }

    #[test]
    fn test_double_booked_cell_keeps_the_first_match() {
        let first = make_partido(local_1930_utc(), "Club Norte - cancha_2", MatchStatus::Abierto);
        let second =
            make_partido(local_1930_utc(), "Club Norte - cancha_2", MatchStatus::Pendiente);
        let grid = DayGrid::build(
            "Club Norte",
            4,
            &slots(),
            target_date(),
            offset(),
            &[first.clone(), second],
        )
        .unwrap();
        assert_eq!(grid.cell(1, 1).unwrap().partido_id, first.id);
        assert_eq!(grid.reservations().count(), 1);
    }

    #[test]
    fn test_occupant_label_precedence() {
        let manual = make_partido(
            local_1930_utc(),
            "Club Norte - cancha_1 - a nombre de Carlos",
            MatchStatus::Pendiente,
        );
        let abierto = make_partido(
            Utc.with_ymd_and_hms(2024, 5, 10, 23, 0, 0).unwrap(), // 18:00 local
            "Club Norte - cancha_2",
            MatchStatus::Abierto,
        );
        let cerrado = make_partido(
            Utc.with_ymd_and_hms(2024, 5, 11, 2, 0, 0).unwrap(), // 21:00 local
            "Club Norte - cancha_3",
            MatchStatus::Cerrado,
        );
        let grid = DayGrid::build(
            "Club Norte",
            4,
            &slots(),
            target_date(),
            offset(),
            &[manual, abierto, cerrado],
        )
        .unwrap();

        assert_eq!(grid.cell(0, 1).unwrap().occupant, "Carlos");
        assert_eq!(grid.cell(1, 0).unwrap().occupant, "Partido Abierto");
        assert_eq!(grid.cell(2, 2).unwrap().occupant, "Reservado");
    }

    #[test]
    fn test_free_future_slot_offers_a_prefilled_selection() {
        let grid =
            DayGrid::build("Club Norte", 2, &slots(), target_date(), offset(), &[]).unwrap();
        // Noon local on the target day
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 17, 0, 0).unwrap();

        match grid.slot_state(1, 1, now) {
            Some(SlotState::Available(sel)) => {
                assert_eq!(sel.club_nombre, "Club Norte");
                assert_eq!(sel.court_number, 2);
                assert_eq!(sel.time_label, "19:30");
                assert_eq!(sel.fecha, local_1930_utc());
            }
            other => panic!("expected available slot, got {:?}", other),
        }
    }

    #[test]
    fn test_past_slot_offers_nothing() {
        let grid =
            DayGrid::build("Club Norte", 2, &slots(), target_date(), offset(), &[]).unwrap();
        // 22:00 local: the 19:30 slot already started
        let now = Utc.with_ymd_and_hms(2024, 5, 11, 3, 0, 0).unwrap();
        assert_eq!(grid.slot_state(1, 1, now), Some(SlotState::Past));
    }

    #[test]
    fn test_occupied_slot_reports_its_reservation() {
        let p = make_partido(local_1930_utc(), "Club Norte - cancha_2", MatchStatus::Abierto);
        let grid =
            DayGrid::build("Club Norte", 2, &slots(), target_date(), offset(), &[p.clone()])
                .unwrap();
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 17, 0, 0).unwrap();
        match grid.slot_state(1, 1, now) {
            Some(SlotState::Occupied(r)) => assert_eq!(r.partido_id, p.id),
            other => panic!("expected occupied slot, got {:?}", other),
        }
    }

    #[test]
    fn test_available_slots_skip_occupied_and_past_cells() {
        let p = make_partido(local_1930_utc(), "Club Norte - cancha_1", MatchStatus::Abierto);
        let grid =
            DayGrid::build("Club Norte", 1, &slots(), target_date(), offset(), &[p]).unwrap();
        // 18:30 local: the 18:00 slot has passed, 19:30 is occupied
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 23, 30, 0).unwrap();
        let available = grid.available_slots(now);
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].time_label, "21:00");
    }
}
