//! Board structure with explosion-aware apply/undo

use super::bitboard::Bitboard;
use super::{Move, Pos, Stone, TOTAL_CELLS};

/// Half-width of the square cleared by an explosion (3x3).
pub const BLAST_RADIUS: i32 = 1;

/// Maximum number of cells a single blast can touch.
const BLAST_CELLS: usize = 9;

/// Game board.
///
/// Two disjoint bitboards, so a cell can never hold both colors. The struct is
/// `Copy`: a clone is a fixed 64-byte copy, which is what makes hypothetical
/// placements cheap and leaves the caller's board untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Board {
    /// Black stones bitboard
    pub black: Bitboard,
    /// White stones bitboard
    pub white: Bitboard,
}

/// Stones removed by one blast, in scan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cleared {
    stones: [Option<(Pos, Stone)>; BLAST_CELLS],
    len: u8,
}

impl Cleared {
    fn new() -> Self {
        Self {
            stones: [None; BLAST_CELLS],
            len: 0,
        }
    }

    fn push(&mut self, pos: Pos, stone: Stone) {
        self.stones[self.len as usize] = Some((pos, stone));
        self.len += 1;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Pos, Stone)> + '_ {
        self.stones[..self.len as usize].iter().flatten().copied()
    }

    /// Number of removed stones of one color.
    pub fn count(&self, color: Stone) -> u32 {
        self.iter().filter(|&(_, s)| s == color).count() as u32
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Everything needed to take back one `Board::apply`.
#[derive(Debug, Clone, Copy)]
pub struct MoveUndo {
    pos: Pos,
    cleared: Option<Cleared>,
}

impl MoveUndo {
    /// Stones removed by the blast, if the move exploded.
    pub fn cleared(&self) -> Option<&Cleared> {
        self.cleared.as_ref()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            black: Bitboard::new(),
            white: Bitboard::new(),
        }
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        Pos::is_valid(x, y)
    }

    /// Get stone at position
    #[inline]
    pub fn get(&self, pos: Pos) -> Stone {
        if self.black.get(pos) {
            Stone::Black
        } else if self.white.get(pos) {
            Stone::White
        } else {
            Stone::Empty
        }
    }

    /// Bounds-checked read; off-board cells read as `Empty`.
    #[inline]
    pub fn get_cell(&self, x: i32, y: i32) -> Stone {
        Pos::checked(x, y).map_or(Stone::Empty, |pos| self.get(pos))
    }

    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        !self.black.get(pos) && !self.white.get(pos)
    }

    /// Place a stone on an empty cell. Does not check legality.
    #[inline]
    pub fn place_stone(&mut self, pos: Pos, stone: Stone) {
        match stone {
            Stone::Black => self.black.set(pos),
            Stone::White => self.white.set(pos),
            Stone::Empty => {}
        }
    }

    /// Remove a stone
    #[inline]
    pub fn remove_stone(&mut self, pos: Pos) {
        self.black.clear(pos);
        self.white.clear(pos);
    }

    /// Overwrite a cell. Returns `false` (and does nothing) off the board.
    pub fn set_cell(&mut self, x: i32, y: i32, stone: Stone) -> bool {
        let Some(pos) = Pos::checked(x, y) else {
            return false;
        };
        self.remove_stone(pos);
        self.place_stone(pos, stone);
        true
    }

    /// Clear a cell. Returns `false` off the board.
    pub fn remove_piece(&mut self, x: i32, y: i32) -> bool {
        self.set_cell(x, y, Stone::Empty)
    }

    /// Get bitboard for a color (returns None for Empty)
    #[inline]
    pub fn stones(&self, stone: Stone) -> Option<&Bitboard> {
        match stone {
            Stone::Black => Some(&self.black),
            Stone::White => Some(&self.white),
            Stone::Empty => None,
        }
    }

    /// All occupied intersections.
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.black.union(&self.white)
    }

    /// Total stones on board
    #[inline]
    pub fn stone_count(&self) -> u32 {
        self.black.count() + self.white.count()
    }

    #[inline]
    pub fn is_board_empty(&self) -> bool {
        self.black.is_empty() && self.white.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.stone_count() as usize == TOTAL_CELLS
    }

    /// Iterate over empty intersections in index order.
    pub fn empty_cells(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..TOTAL_CELLS)
            .map(Pos::from_index)
            .filter(move |&pos| self.is_empty(pos))
    }

    /// Remove every stone in the 3x3 square centred on `center`.
    pub fn blast(&mut self, center: Pos) -> Cleared {
        let mut cleared = Cleared::new();
        for dx in -BLAST_RADIUS..=BLAST_RADIUS {
            for dy in -BLAST_RADIUS..=BLAST_RADIUS {
                let Some(p) = Pos::checked(i32::from(center.x) + dx, i32::from(center.y) + dy)
                else {
                    continue;
                };
                let stone = self.get(p);
                if stone != Stone::Empty {
                    cleared.push(p, stone);
                    self.remove_stone(p);
                }
            }
        }
        cleared
    }

    /// Play a move, optionally detonating at the placed stone.
    ///
    /// The returned record restores the exact prior state via [`Board::undo`].
    pub fn apply(&mut self, mv: Move, explode: bool) -> MoveUndo {
        self.place_stone(mv.pos, mv.color);
        let cleared = explode.then(|| self.blast(mv.pos));
        MoveUndo {
            pos: mv.pos,
            cleared,
        }
    }

    /// Take back a move made with [`Board::apply`].
    pub fn undo(&mut self, undo: &MoveUndo) {
        if let Some(cleared) = &undo.cleared {
            for (pos, stone) in cleared.iter() {
                self.place_stone(pos, stone);
            }
        }
        self.remove_stone(undo.pos);
    }
}
