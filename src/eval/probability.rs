//! Win probability and move assessment
//!
//! Win probability is a logistic squash of [`evaluate_board`]; confidence
//! drops as the board fills up and as more stones sit in critical shapes.

use crate::board::{Board, Pos, Stone, DIRECTIONS, TOTAL_CELLS};
use crate::hazard::{simulate_explosion, will_trigger, HazardEstimate, HazardMap};
use crate::rules::{count_consecutive, is_open_three};

use super::heuristic::{evaluate_board, evaluate_move_heuristic, MIN_SCORE};

/// Evaluation units per logistic unit.
const SCALE: f64 = 1e-4;

/// Lowest confidence ever reported.
const MIN_CONFIDENCE: f64 = 0.1;

/// Map a board evaluation to (0, 1).
#[inline]
pub fn logistic(eval: i32) -> f64 {
    1.0 / (1.0 + (-f64::from(eval) * SCALE).exp())
}

/// Probability that `color` wins from this position.
#[must_use]
pub fn calculate_win_probability(board: &Board, hazards: &HazardMap, color: Stone) -> f64 {
    logistic(evaluate_board(board, hazards, color))
}

/// Win probabilities for (black, white), normalised to sum to one.
#[must_use]
pub fn win_probabilities(board: &Board, hazards: &HazardMap) -> (f64, f64) {
    let black = calculate_win_probability(board, hazards, Stone::Black);
    let white = calculate_win_probability(board, hazards, Stone::White);
    let sum = black + white;
    if sum > 0.0 {
        (black / sum, white / sum)
    } else {
        (0.5, 0.5)
    }
}

/// Heuristic score, resulting win rate and confidence for one candidate move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveAssessment {
    pub score: i32,
    pub win_rate: f64,
    pub confidence: f64,
}

/// Assess playing `color` at `pos`, explosion included.
///
/// Forbidden or occupied cells come back with [`MIN_SCORE`], a near-zero win
/// rate and full confidence.
pub fn assess_move(
    board: &Board,
    hazards: &HazardMap,
    estimate: &HazardEstimate,
    pos: Pos,
    color: Stone,
) -> MoveAssessment {
    let score = evaluate_move_heuristic(board, hazards, estimate, pos, color);
    if score == MIN_SCORE {
        return MoveAssessment {
            score,
            win_rate: 0.01,
            confidence: 1.0,
        };
    }

    let mut after = *board;
    after.place_stone(pos, color);
    if will_trigger(hazards, pos) {
        after = simulate_explosion(&after, pos, color).board;
    }

    MoveAssessment {
        score,
        win_rate: calculate_win_probability(&after, hazards, color),
        confidence: confidence(&after),
    }
}

/// `max(0.1, 1 - fill * 0.5 - critical_ratio * 0.3)`.
pub fn confidence(board: &Board) -> f64 {
    let stones: Vec<(Pos, Stone)> = [Stone::Black, Stone::White]
        .into_iter()
        .filter_map(|color| board.stones(color).map(|bb| (bb, color)))
        .flat_map(|(bb, color)| bb.iter_ones().map(move |pos| (pos, color)))
        .collect();

    let total = stones.len();
    let critical = stones
        .iter()
        .filter(|&&(pos, color)| has_critical_shape(board, pos, color))
        .count();

    let fill = total as f64 / TOTAL_CELLS as f64;
    let critical_ratio = critical as f64 / total.max(1) as f64;
    (1.0 - fill * 0.5 - critical_ratio * 0.3).max(MIN_CONFIDENCE)
}

/// A four or longer, or an open three, through the stone at `pos`.
fn has_critical_shape(board: &Board, pos: Pos, color: Stone) -> bool {
    DIRECTIONS.iter().any(|&(dx, dy)| {
        count_consecutive(board, pos, dx, dy, color) >= 4 || is_open_three(board, pos, dx, dy, color)
    })
}
