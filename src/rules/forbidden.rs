//! Renju forbidden moves for the restricted side (Black)
//!
//! A black move is forbidden when it creates, simultaneously:
//! - two or more open threes (double-three), or
//! - two or more fours (double-four), or
//! - a line longer than five (overline).
//!
//! Exception: a move that makes exactly five is always allowed, whatever
//! else it creates. White is never restricted.

use crate::board::{Board, Pos, Stone, DIRECTIONS};
use crate::error::MoveError;

use super::line::{count_consecutive, is_open_end};

/// Which restriction a move breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    DoubleThree,
    DoubleFour,
    Overline,
}

/// Exactly three in a row through `pos` with both extension cells empty.
#[inline]
pub fn is_open_three(board: &Board, pos: Pos, dx: i32, dy: i32, color: Stone) -> bool {
    count_consecutive(board, pos, dx, dy, color) == 3
        && is_open_end(board, pos, dx, dy, color)
        && is_open_end(board, pos, -dx, -dy, color)
}

/// Exactly four in a row through `pos` with at least one extension cell empty.
#[inline]
pub fn is_four(board: &Board, pos: Pos, dx: i32, dy: i32, color: Stone) -> bool {
    count_consecutive(board, pos, dx, dy, color) == 4
        && (is_open_end(board, pos, dx, dy, color) || is_open_end(board, pos, -dx, -dy, color))
}

/// Classify a hypothetical placement of `color` on the empty cell `pos`.
///
/// Returns `None` when the move is allowed. The board is never modified;
/// the stone is placed on a copy.
pub fn violation(board: &Board, pos: Pos, color: Stone) -> Option<Violation> {
    let mut after = *board;
    after.place_stone(pos, color);

    let lengths = DIRECTIONS.map(|(dx, dy)| count_consecutive(&after, pos, dx, dy, color));

    // Exact five overrides every restriction
    if lengths.contains(&5) {
        return None;
    }

    let open_threes = DIRECTIONS
        .iter()
        .filter(|&&(dx, dy)| is_open_three(&after, pos, dx, dy, color))
        .count();
    if open_threes >= 2 {
        return Some(Violation::DoubleThree);
    }

    let fours = DIRECTIONS
        .iter()
        .filter(|&&(dx, dy)| is_four(&after, pos, dx, dy, color))
        .count();
    if fours >= 2 {
        return Some(Violation::DoubleFour);
    }

    if lengths.iter().any(|&n| n > 5) {
        return Some(Violation::Overline);
    }

    None
}

/// Check if a move is forbidden for `color`.
///
/// Only the restricted side is ever forbidden. For it, an occupied cell
/// counts as forbidden too.
///
/// # Arguments
/// * `board` - Current board state
/// * `pos` - Position being considered
/// * `color` - Color of the stone being placed
pub fn is_forbidden_move(board: &Board, pos: Pos, color: Stone) -> bool {
    if !color.is_restricted() {
        return false;
    }
    if !board.is_empty(pos) {
        return true;
    }
    violation(board, pos, color).is_some()
}

/// Check if a move is playable: empty and not forbidden.
#[inline]
pub fn is_valid_move(board: &Board, pos: Pos, color: Stone) -> bool {
    board.is_empty(pos) && !is_forbidden_move(board, pos, color)
}

/// Validate raw coordinates for a move, with the rejection reason on failure.
pub fn check_move(board: &Board, x: i32, y: i32, color: Stone) -> Result<Pos, MoveError> {
    let pos = Pos::checked(x, y).ok_or(MoveError::OutOfBounds { x, y })?;
    if !board.is_empty(pos) {
        return Err(MoveError::Occupied(pos));
    }
    if is_forbidden_move(board, pos, color) {
        return Err(MoveError::Forbidden(pos));
    }
    Ok(pos)
}
