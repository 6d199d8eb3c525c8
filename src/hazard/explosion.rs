//! Explosion simulation for move evaluation and search

use crate::board::{Board, Pos, Stone};

use super::map::HazardMap;

/// Whether placing a stone at `pos` would set off a hazard.
///
/// Checks hazard cells `(x-1, y-1)`, `(x-1, y)`, `(x, y-1)` and `(x, y)`.
#[inline]
pub fn will_trigger(hazards: &HazardMap, pos: Pos) -> bool {
    hazards.triggers_at(pos)
}

/// Board after a blast, with removal tallies from the mover's point of view.
#[derive(Debug, Clone, Copy)]
pub struct Explosion {
    pub board: Board,
    pub own_removed: u32,
    pub opponent_removed: u32,
}

impl Explosion {
    /// The blast took more opponent stones than own stones.
    #[inline]
    pub fn is_favorable(&self) -> bool {
        self.opponent_removed > self.own_removed
    }
}

/// Clear the 3x3 square around `pos` on a copy of `board`.
///
/// Call it with the mover's stone already on `pos`. The stone is then
/// counted among `own_removed`, as it is in play.
pub fn simulate_explosion(board: &Board, pos: Pos, color: Stone) -> Explosion {
    let mut after = *board;
    let cleared = after.blast(pos);
    Explosion {
        board: after,
        own_removed: cleared.count(color),
        opponent_removed: cleared.count(color.opponent()),
    }
}
