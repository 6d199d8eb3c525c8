//! Error types for move application and hazard setup

use thiserror::Error;

use crate::board::Pos;

/// Why a move was rejected. `Display` is the reason text shown to players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("the game is already over")]
    GameOver,
    #[error("({x}, {y}) is outside the board")]
    OutOfBounds { x: i32, y: i32 },
    #[error("{0} is already occupied")]
    Occupied(Pos),
    #[error("{0} is a forbidden move for black")]
    Forbidden(Pos),
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum HazardError {
    #[error("hazard density must be within [0, 1], got {0}")]
    InvalidDensity(f64),
}
