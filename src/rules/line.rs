//! Line scanning primitives shared by rules, evaluation and threat detection
//!
//! Every function here treats the cell at `pos` as if it already held
//! `color`, without reading it. That lets callers ask "what would this stone
//! make" on the unmodified board.

use crate::board::{Board, Pos, Stone};

/// Number of consecutive `color` stones stepping away from `pos` along
/// `(dx, dy)`, excluding `pos` itself. Stops at the board edge.
#[inline]
pub fn run_length(board: &Board, pos: Pos, dx: i32, dy: i32, color: Stone) -> i32 {
    let mut n = 0;
    while let Some(p) = pos.offset(dx, dy, n + 1) {
        if board.get(p) != color {
            break;
        }
        n += 1;
    }
    n
}

/// Length of the maximal run of `color` through `pos` along the axis
/// `(dx, dy)` / `(-dx, -dy)`, counting `pos` as one stone.
#[inline]
pub fn count_consecutive(board: &Board, pos: Pos, dx: i32, dy: i32, color: Stone) -> i32 {
    1 + run_length(board, pos, dx, dy, color) + run_length(board, pos, -dx, -dy, color)
}

/// The cell just past the run's end in direction `(dx, dy)`, if on the board.
#[inline]
pub fn run_end(board: &Board, pos: Pos, dx: i32, dy: i32, color: Stone) -> Option<Pos> {
    let n = run_length(board, pos, dx, dy, color);
    pos.offset(dx, dy, n + 1)
}

/// True when the cell just past the run's end in direction `(dx, dy)` is
/// empty and on the board.
#[inline]
pub fn is_open_end(board: &Board, pos: Pos, dx: i32, dy: i32, color: Stone) -> bool {
    run_end(board, pos, dx, dy, color).is_some_and(|p| board.is_empty(p))
}

/// Both extension cells of the run through `pos`, negative side first.
/// `None` entries are off the board.
#[inline]
pub fn run_flanks(board: &Board, pos: Pos, dx: i32, dy: i32, color: Stone) -> [Option<Pos>; 2] {
    [
        run_end(board, pos, -dx, -dy, color),
        run_end(board, pos, dx, dy, color),
    ]
}
