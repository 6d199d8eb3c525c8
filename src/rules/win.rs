//! Five-in-a-row detection and terminal positions
//!
//! Any run of five or more wins. Black never gets to play an overline
//! because the forbidden-move rule rejects it first.

use crate::board::{Board, Pos, Stone, DIRECTIONS};

use super::line::count_consecutive;

/// True if `color` has a run of five or more through `pos` on some axis.
///
/// `pos` is counted as holding `color`, so on a board where the cell is still
/// empty this answers "would a stone here make five".
#[inline]
pub fn has_five_in_a_row(board: &Board, pos: Pos, color: Stone) -> bool {
    DIRECTIONS
        .iter()
        .any(|&(dx, dy)| count_consecutive(board, pos, dx, dy, color) >= 5)
}

/// True if some axis through `pos` is exactly five long.
#[inline]
pub fn has_exact_five(board: &Board, pos: Pos, color: Stone) -> bool {
    DIRECTIONS
        .iter()
        .any(|&(dx, dy)| count_consecutive(board, pos, dx, dy, color) == 5)
}

/// Whether playing `color` on the empty cell `pos` wins on the spot.
///
/// For the restricted side only an exact five counts; a longer line is an
/// overline and never reaches the board.
#[inline]
pub fn completes_five(board: &Board, pos: Pos, color: Stone) -> bool {
    if !board.is_empty(pos) {
        return false;
    }
    if color.is_restricted() {
        has_exact_five(board, pos, color)
    } else {
        has_five_in_a_row(board, pos, color)
    }
}

/// Find the positions of a 5-in-a-row if one exists.
pub fn find_five_positions(board: &Board, stone: Stone) -> Option<Vec<Pos>> {
    let stones = board.stones(stone)?;

    for pos in stones.iter_ones() {
        for &(dx, dy) in &DIRECTIONS {
            // Only start from the first stone of the line
            if pos.offset(dx, dy, -1).is_some_and(|p| board.get(p) == stone) {
                continue;
            }
            let line: Vec<Pos> = (0..)
                .map_while(|i| pos.offset(dx, dy, i).filter(|&p| board.get(p) == stone))
                .collect();
            if line.len() >= 5 {
                return Some(line);
            }
        }
    }
    None
}

/// Color holding a five anywhere on the board.
pub fn winner(board: &Board) -> Option<Stone> {
    [Stone::Black, Stone::White]
        .into_iter()
        .find(|&color| find_five_positions(board, color).is_some())
}

/// A five exists or no empty cell is left.
pub fn is_game_over(board: &Board) -> bool {
    winner(board).is_some() || board.is_full()
}
