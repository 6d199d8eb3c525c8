//! Pattern scores and per-direction shape classification
//!
//! A shape is the run of same-colored stones through a cell on one axis,
//! classified by its length and whether each end is open.

use crate::board::{Board, Pos, Stone, DIRECTIONS};
use crate::rules::{count_consecutive, is_open_end};

/// Pattern scores for evaluation
pub struct PatternScore;

impl PatternScore {
    /// Five in a row - immediate win
    pub const FIVE: i32 = 100_000;

    /// Open four: _OOOO_
    pub const OPEN_FOUR: i32 = 10_000;
    /// Four with one open end: XOOOO_ or _OOOOX
    pub const FOUR: i32 = 1_200;

    /// Open three: _OOO_
    pub const OPEN_THREE: i32 = 1_000;
    /// Three with at most one open end
    pub const THREE: i32 = 120;

    /// Open two: _OO_
    pub const OPEN_TWO: i32 = 100;
    /// Two with at most one open end
    pub const TWO: i32 = 10;
}

/// Score of the shape through `pos` along `(dx, dy)` for `color`.
///
/// `pos` counts as a `color` stone whether or not it is on the board yet.
pub fn evaluate_direction_shape(board: &Board, pos: Pos, dx: i32, dy: i32, color: Stone) -> i32 {
    let count = count_consecutive(board, pos, dx, dy, color);
    let open = is_open_end(board, pos, -dx, -dy, color) && is_open_end(board, pos, dx, dy, color);

    match (count, open) {
        (5.., _) => PatternScore::FIVE,
        (4, true) => PatternScore::OPEN_FOUR,
        (4, false) => PatternScore::FOUR,
        (3, true) => PatternScore::OPEN_THREE,
        (3, false) => PatternScore::THREE,
        (2, true) => PatternScore::OPEN_TWO,
        (2, false) => PatternScore::TWO,
        _ => 0,
    }
}

/// Sum of the four axis shapes through `pos`.
#[inline]
pub fn evaluate_shape_score(board: &Board, pos: Pos, color: Stone) -> i32 {
    DIRECTIONS
        .iter()
        .map(|&(dx, dy)| evaluate_direction_shape(board, pos, dx, dy, color))
        .sum()
}

/// Value of a stone already on the board. Same sum as the shape score.
#[inline]
pub fn evaluate_stone_value(board: &Board, pos: Pos, color: Stone) -> i32 {
    evaluate_shape_score(board, pos, color)
}
