//! Authoritative game state
//!
//! [`Game`] validates and applies moves, sets off hazards, detects the winner
//! and switches turns. Black moves first.

use rand::Rng;
use tracing::info;

use crate::board::{Board, Cleared, Move, Pos, Stone};
use crate::error::{HazardError, MoveError};
use crate::eval::win_probabilities;
use crate::hazard::HazardMap;
use crate::rules::{check_move, has_five_in_a_row};

/// What happened when a move was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayOutcome {
    pub mv: Move,
    /// Hazard cells cleared, in detonation order
    pub detonated: Vec<Pos>,
    /// Stones removed by the blast, the mover's own stone included
    pub removed: Option<Cleared>,
    pub winner: Option<Stone>,
}

impl PlayOutcome {
    pub fn exploded(&self) -> bool {
        !self.detonated.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    hazards: HazardMap,
    to_move: Stone,
    winner: Option<Stone>,
    moves: Vec<Move>,
}

impl Game {
    /// A new game on an empty board over the given hazard field.
    pub fn new(hazards: HazardMap) -> Self {
        Self {
            board: Board::new(),
            hazards,
            to_move: Stone::Black,
            winner: None,
            moves: Vec::new(),
        }
    }

    /// A new game with `floor(196 * density)` hazards placed by `rng`.
    pub fn with_density<R: Rng>(density: f64, rng: &mut R) -> Result<Self, HazardError> {
        Ok(Self::new(HazardMap::with_density(density, rng)?))
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn hazards(&self) -> &HazardMap {
        &self.hazards
    }

    pub fn to_move(&self) -> Stone {
        self.to_move
    }

    pub fn winner(&self) -> Option<Stone> {
        self.winner
    }

    /// Moves applied so far, in order.
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// A player has five or the board is full.
    pub fn is_over(&self) -> bool {
        self.winner.is_some() || self.board.is_full()
    }

    /// Play the side to move at `(x, y)`.
    ///
    /// The stone is placed first; if it lands on a hazard, the hazard and any
    /// hazards chained to it are cleared and every stone in the 3x3 square
    /// around it is removed. Only a surviving stone can complete five.
    pub fn play(&mut self, x: i32, y: i32) -> Result<PlayOutcome, MoveError> {
        if self.is_over() {
            return Err(MoveError::GameOver);
        }
        let color = self.to_move;
        let pos = check_move(&self.board, x, y, color)?;
        let mv = Move::new(pos, color);

        let explode = self.hazards.triggers_at(pos);
        let undo = self.board.apply(mv, explode);
        let detonated = if explode {
            self.hazards.detonate(pos)
        } else {
            Vec::new()
        };
        let removed = undo.cleared().copied();

        if let Some(cleared) = &removed {
            info!(
                %pos,
                ?color,
                hazards = detonated.len(),
                own = cleared.count(color),
                opponent = cleared.count(color.opponent()),
                "hazard exploded"
            );
        }

        if self.board.get(pos) == color && has_five_in_a_row(&self.board, pos, color) {
            self.winner = Some(color);
        }

        self.moves.push(mv);
        self.to_move = color.opponent();

        Ok(PlayOutcome {
            mv,
            detonated,
            removed,
            winner: self.winner,
        })
    }

    /// Normalised (black, white) win probabilities for the current position.
    pub fn win_probabilities(&self) -> (f64, f64) {
        win_probabilities(&self.board, &self.hazards)
    }
}
