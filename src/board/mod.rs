//! Board representation for mine gomoku

pub mod bitboard;
pub mod board;


// Re-exports
pub use bitboard::Bitboard;
pub use board::{Board, Cleared, MoveUndo, BLAST_RADIUS};

/// Board size (15x15)
pub const BOARD_SIZE: usize = 15;
pub const TOTAL_CELLS: usize = BOARD_SIZE * BOARD_SIZE; // 225

/// Line directions, one per axis. The negated vector covers the other half.
pub const DIRECTIONS: [(i32, i32); 4] = [
    (1, 0),  // Horizontal
    (0, 1),  // Vertical
    (1, 1),  // Diagonal
    (1, -1), // Anti-diagonal
];

/// Stone colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stone {
    Empty,
    Black,
    White,
}

impl Stone {
    /// Get opponent color
    #[inline]
    pub fn opponent(self) -> Stone {
        match self {
            Stone::Black => Stone::White,
            Stone::White => Stone::Black,
            Stone::Empty => Stone::Empty,
        }
    }

    /// Whether renju restrictions (double-three, double-four, overline) apply.
    #[inline]
    pub fn is_restricted(self) -> bool {
        self == Stone::Black
    }
}

/// Intersection on the board. `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: u8,
    pub y: u8,
}

impl Pos {
    #[inline]
    pub fn new(x: u8, y: u8) -> Self {
        debug_assert!(x < BOARD_SIZE as u8 && y < BOARD_SIZE as u8);
        Self { x, y }
    }

    /// Checked constructor from signed coordinates.
    #[inline]
    pub fn checked(x: i32, y: i32) -> Option<Self> {
        if Self::is_valid(x, y) {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            Some(Self { x: x as u8, y: y as u8 })
        } else {
            None
        }
    }

    /// Step `n` cells along `(dx, dy)`, `None` when it leaves the board.
    #[inline]
    pub fn offset(self, dx: i32, dy: i32, n: i32) -> Option<Self> {
        Self::checked(i32::from(self.x) + dx * n, i32::from(self.y) + dy * n)
    }

    #[inline]
    pub fn to_index(self) -> usize {
        self.x as usize * BOARD_SIZE + self.y as usize
    }

    #[inline]
    pub fn from_index(idx: usize) -> Self {
        Self {
            x: (idx / BOARD_SIZE) as u8,
            y: (idx % BOARD_SIZE) as u8,
        }
    }

    #[inline]
    pub fn is_valid(x: i32, y: i32) -> bool {
        x >= 0 && x < BOARD_SIZE as i32 && y >= 0 && y < BOARD_SIZE as i32
    }

    /// The center intersection.
    #[inline]
    pub fn center() -> Self {
        Self::new((BOARD_SIZE / 2) as u8, (BOARD_SIZE / 2) as u8)
    }

    /// Chebyshev distance to another intersection.
    #[inline]
    pub fn distance(self, other: Pos) -> i32 {
        let dx = (i32::from(self.x) - i32::from(other.x)).abs();
        let dy = (i32::from(self.y) - i32::from(other.y)).abs();
        dx.max(dy)
    }
}

impl PartialOrd for Pos {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pos {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.to_index().cmp(&other.to_index())
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A stone placement. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub pos: Pos,
    pub color: Stone,
}

impl Move {
    #[inline]
    pub fn new(pos: Pos, color: Stone) -> Self {
        Self { pos, color }
    }
}
