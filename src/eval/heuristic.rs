//! Static board evaluation and move ordering heuristic
//!
//! This module provides:
//! - `evaluate_board`: material-plus-shape differential used at search leaves
//! - `evaluate_move_heuristic`: one-ply score of a candidate, including the
//!   effect of any explosion it sets off
//! - `center_bonus`: positional tie-breaker towards the middle of the board

use crate::board::{Board, Pos, Stone, BOARD_SIZE};
use crate::hazard::{simulate_explosion, will_trigger, HazardEstimate, HazardMap, RISK_THRESHOLD};
use crate::rules::is_forbidden_move;

use super::patterns::{evaluate_shape_score, evaluate_stone_value};

/// Sentinel for moves that must never be chosen.
pub const MIN_SCORE: i32 = i32::MIN;

/// Bonus for a move whose explosion removes more opponent stones.
pub const FAVORABLE_EXPLOSION_BONUS: i32 = 500;

/// Penalty for a move whose explosion is not favorable.
pub const UNFAVORABLE_EXPLOSION_PENALTY: i32 = 300;

/// Penalty for a quiet move on a cell the estimate considers risky.
pub const HAZARD_RISK_PENALTY: i32 = 500;

/// Maximum Manhattan distance from center on 15x15 board
const MAX_CENTER_DIST: i32 = 14;

/// Weight per distance unit from center
const POSITION_WEIGHT: i32 = 3;

/// Evaluate the board from the perspective of `color`.
///
/// Sum of stone values for `color` minus the same sum for the opponent.
/// Hazards do not contribute; they are accounted for when moves are scored.
#[must_use]
pub fn evaluate_board(board: &Board, _hazards: &HazardMap, color: Stone) -> i32 {
    side_value(board, color) - side_value(board, color.opponent())
}

fn side_value(board: &Board, color: Stone) -> i32 {
    let Some(stones) = board.stones(color) else {
        return 0;
    };
    stones
        .iter_ones()
        .map(|pos| evaluate_stone_value(board, pos, color))
        .sum()
}

/// One-ply score of playing `color` at `pos`.
///
/// Returns [`MIN_SCORE`] for occupied cells and forbidden moves. Otherwise the
/// move is played on a copy; if it sets off a hazard the blast is applied and
/// scored as a bonus or penalty, else a risky cell is penalised. The shape
/// score at `pos` on the resulting board is added.
#[must_use]
pub fn evaluate_move_heuristic(
    board: &Board,
    hazards: &HazardMap,
    estimate: &HazardEstimate,
    pos: Pos,
    color: Stone,
) -> i32 {
    if !board.is_empty(pos) || is_forbidden_move(board, pos, color) {
        return MIN_SCORE;
    }

    let mut after = *board;
    after.place_stone(pos, color);

    let mut score = 0;
    if will_trigger(hazards, pos) {
        let explosion = simulate_explosion(&after, pos, color);
        score += if explosion.is_favorable() {
            FAVORABLE_EXPLOSION_BONUS
        } else {
            -UNFAVORABLE_EXPLOSION_PENALTY
        };
        after = explosion.board;
    } else if estimate.risk_at(pos) > RISK_THRESHOLD {
        score -= HAZARD_RISK_PENALTY;
    }

    score + evaluate_shape_score(&after, pos, color)
}

/// Bonus for being close to the center, largest on the center point.
#[allow(clippy::cast_possible_wrap)]
pub fn center_bonus(pos: Pos) -> i32 {
    let center = (BOARD_SIZE / 2) as i32;
    let dist = (i32::from(pos.x) - center).abs() + (i32::from(pos.y) - center).abs();
    (MAX_CENTER_DIST - dist) * POSITION_WEIGHT
}
