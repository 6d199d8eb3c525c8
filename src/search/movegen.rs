//! Candidate move generation
//!
//! Tiers, first non-empty wins:
//! 1. Opening (five stones or fewer): legal cells in the 7x7 window around
//!    the center
//! 2. Legal cells within Chebyshev distance 2 of any stone
//! 3. Any legal cell
//! 4. Lockout, decided by [`LockoutPolicy`]

use crate::board::{Board, Pos, Stone, BOARD_SIZE};
use crate::rules::is_valid_move;

/// Stone count up to which the opening window is used.
pub const OPENING_STONES: u32 = 5;

/// Half-width of the opening window around the center.
pub const OPENING_RADIUS: i32 = 3;

/// Neighbourhood radius around existing stones.
pub const PROXIMITY_RADIUS: i32 = 2;

/// What to do when every empty cell is forbidden for the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockoutPolicy {
    /// Offer every empty cell anyway
    #[default]
    AllowForbidden,
    /// Offer nothing; the caller passes
    Pass,
}

/// Candidate moves for `color`, in board order.
pub fn generate_moves(board: &Board, color: Stone, lockout: LockoutPolicy) -> Vec<Pos> {
    if board.stone_count() <= OPENING_STONES {
        let opening = opening_window(board, color);
        if !opening.is_empty() {
            return opening;
        }
    }

    let near = near_stones(board, color);
    if !near.is_empty() {
        return near;
    }

    let legal: Vec<Pos> = board
        .empty_cells()
        .filter(|&pos| is_valid_move(board, pos, color))
        .collect();
    if !legal.is_empty() {
        return legal;
    }

    match lockout {
        LockoutPolicy::AllowForbidden => board.empty_cells().collect(),
        LockoutPolicy::Pass => Vec::new(),
    }
}

fn opening_window(board: &Board, color: Stone) -> Vec<Pos> {
    let center = Pos::center();
    board
        .empty_cells()
        .filter(|&pos| pos.distance(center) <= OPENING_RADIUS && is_valid_move(board, pos, color))
        .collect()
}

fn near_stones(board: &Board, color: Stone) -> Vec<Pos> {
    let mut seen = [[false; BOARD_SIZE]; BOARD_SIZE];

    for stone in board.occupied().iter_ones() {
        for dx in -PROXIMITY_RADIUS..=PROXIMITY_RADIUS {
            for dy in -PROXIMITY_RADIUS..=PROXIMITY_RADIUS {
                let Some(p) = Pos::checked(i32::from(stone.x) + dx, i32::from(stone.y) + dy) else {
                    continue;
                };
                seen[usize::from(p.x)][usize::from(p.y)] = true;
            }
        }
    }

    board
        .empty_cells()
        .filter(|&pos| seen[usize::from(pos.x)][usize::from(pos.y)])
        .filter(|&pos| is_valid_move(board, pos, color))
        .collect()
}
