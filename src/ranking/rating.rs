// src/ranking/rating.rs
//
// ELO updates for pair-vs-pair results. Pure functions, no I/O.

/// Standard adjustment factor. Could drop for seasoned PRO pairs.
pub const DEFAULT_K_FACTOR: f64 = 32.0;

/// Outcome of a rated match from the scoring side's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Win,
    Draw,
    Loss,
}

impl MatchOutcome {
    /// The ELO score value: win = 1, draw = 0.5, loss = 0.
    pub fn score(self) -> f64 {
        match self {
            MatchOutcome::Win => 1.0,
            MatchOutcome::Draw => 0.5,
            MatchOutcome::Loss => 0.0,
        }
    }
}

/// New ratings for both sides of a completed pair match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairRatingUpdate {
    pub new_team1_rating: i32,
    pub new_team2_rating: i32,
}

/// Compute the new ELO rating after one result.
///
/// Uses the logistic expected-score transform; the result is rounded to the
/// nearest integer and deliberately not clamped — the curve itself keeps
/// updates small at sane K factors.
pub fn calculate_new_rating(
    current_rating: i32,
    opponent_rating: i32,
    result: MatchOutcome,
    k_factor: f64,
) -> i32 {
    let expected_score =
        1.0 / (1.0 + 10f64.powf((opponent_rating - current_rating) as f64 / 400.0));

    let new_rating = current_rating as f64 + k_factor * (result.score() - expected_score);

    new_rating.round() as i32
}

/// Apply a pair-vs-pair result symmetrically. Both updates are computed from
/// the *pre-match* ratings — team2 must not see team1's refreshed value.
/// Rounding may create or destroy a point; exact zero-sum is not promised.
pub fn calculate_match_rankings(
    team1_rating: i32,
    team2_rating: i32,
    team1_won: bool,
) -> PairRatingUpdate {
    let (team1_result, team2_result) = if team1_won {
        (MatchOutcome::Win, MatchOutcome::Loss)
    } else {
        (MatchOutcome::Loss, MatchOutcome::Win)
    };

    PairRatingUpdate {
        new_team1_rating: calculate_new_rating(
            team1_rating,
            team2_rating,
            team1_result,
            DEFAULT_K_FACTOR,
        ),
        new_team2_rating: calculate_new_rating(
            team2_rating,
            team1_rating,
            team2_result,
            DEFAULT_K_FACTOR,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_ordering_holds_for_any_pairing() {
        for (r1, r2) in [(1200, 1200), (1000, 1400), (1550, 980), (800, 2200)] {
            let win = calculate_new_rating(r1, r2, MatchOutcome::Win, DEFAULT_K_FACTOR);
            let draw = calculate_new_rating(r1, r2, MatchOutcome::Draw, DEFAULT_K_FACTOR);
            let loss = calculate_new_rating(r1, r2, MatchOutcome::Loss, DEFAULT_K_FACTOR);
            assert!(win > draw, "win <= draw for ({}, {})", r1, r2);
            assert!(draw > loss, "draw <= loss for ({}, {})", r1, r2);
        }
    }

    #[test]
    fn test_equal_ratings_swing_sixteen_points() {
        assert_eq!(
            calculate_new_rating(1200, 1200, MatchOutcome::Win, 32.0),
            1216
        );
        assert_eq!(
            calculate_new_rating(1200, 1200, MatchOutcome::Loss, 32.0),
            1184
        );
        assert_eq!(
            calculate_new_rating(1200, 1200, MatchOutcome::Draw, 32.0),
            1200
        );
    }

    #[test]
    fn test_upset_win_pays_more_than_expected_win() {
        // Beating a stronger pair must gain strictly more than beating a
        // weaker one from the same starting rating.
        let vs_stronger =
            calculate_new_rating(1200, 1500, MatchOutcome::Win, DEFAULT_K_FACTOR) - 1200;
        let vs_weaker =
            calculate_new_rating(1200, 900, MatchOutcome::Win, DEFAULT_K_FACTOR) - 1200;
        assert!(vs_stronger > vs_weaker);
    }

    #[test]
    fn test_no_floor_is_applied() {
        // An oversized K factor may push the rating negative; the engine
        // must not clamp it. Equal ratings, loss: 10 + 100 * (0 - 0.5).
        assert_eq!(calculate_new_rating(10, 10, MatchOutcome::Loss, 100.0), -40);
    }

    #[test]
    fn test_match_rankings_reference_case() {
        let update = calculate_match_rankings(1200, 1200, true);
        assert_eq!(update.new_team1_rating, 1216);
        assert_eq!(update.new_team2_rating, 1184);
    }

    #[test]
    fn test_match_rankings_are_symmetric_in_inputs() {
        // Swapping the teams and the outcome must swap the updates exactly.
        let a = calculate_match_rankings(1320, 1180, true);
        let b = calculate_match_rankings(1180, 1320, false);
        assert_eq!(a.new_team1_rating, b.new_team2_rating);
        assert_eq!(a.new_team2_rating, b.new_team1_rating);
    }

    #[test]
    fn test_updates_use_pre_match_ratings() {
        // team2's loss is computed against team1's old rating: if it saw the
        // refreshed one, the mismatch in expected scores would break the
        // near-zero-sum property by more than rounding drift.
        let update = calculate_match_rankings(1400, 1000, true);
        let drift =
            (update.new_team1_rating - 1400) + (update.new_team2_rating - 1000);
        assert!(drift.abs() <= 1, "drift {} exceeds rounding", drift);
    }
}
