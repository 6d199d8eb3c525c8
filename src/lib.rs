//! Gomoku AI engine with renju restrictions and hidden mines
//!
//! The game is gomoku on a 15x15 board with an extra hazard layer:
//! - 5-in-a-row to win; Black must make exactly five
//! - Double-three, double-four and overline forbidden for Black
//! - A 14x14 grid of hidden mines sits between the intersections
//! - A stone touching a mine sets it off: the mine and any adjacent mines
//!   clear, and every stone in the 3x3 square around the stone is removed
//!
//! # Architecture
//!
//! The engine is organized into several modules:
//! - [`board`]: Board representation with bitboards and explosion apply/undo
//! - [`hazard`]: Mine field, hint-based probability estimate, blast simulation
//! - [`rules`]: Line scanning, win detection, forbidden moves
//! - [`eval`]: Pattern scores, board evaluation, win probability
//! - [`search`]: Move generation, threat decision table, alpha-beta
//! - [`engine`]: Main AI engine integrating all components
//! - [`game`]: Authoritative move application for a running game
//!
//! # Quick Start
//!
//! ```
//! use mine_gomoku::{Board, Engine, EngineConfig, HazardMap, Pos, Stone};
//!
//! let mut board = Board::new();
//! let hazards = HazardMap::with_hazards([(2, 2), (11, 4)]);
//! let mut engine = Engine::with_config(EngineConfig {
//!     max_depth: 2,
//!     seed: Some(42),
//!     ..EngineConfig::default()
//! });
//!
//! board.place_stone(Pos::new(7, 7), Stone::Black);
//!
//! // AI responds as White
//! if let Some(pos) = engine.get_next_move(&board, &hazards, Stone::White) {
//!     board.place_stone(pos, Stone::White);
//!     println!("AI plays at {pos}");
//! }
//! ```

pub mod board;
pub mod engine;
pub mod error;
pub mod eval;
pub mod game;
pub mod hazard;
pub mod rules;
pub mod search;

// Re-export commonly used types for convenience
pub use board::{Board, Move, Pos, Stone, BOARD_SIZE};
pub use engine::{
    get_next_move, get_next_move_with_time_limit, Difficulty, Engine, EngineConfig, MoveResult,
    SearchType,
};
pub use error::{HazardError, MoveError};
pub use eval::{assess_move, calculate_win_probability, evaluate_board, MoveAssessment};
pub use game::{Game, PlayOutcome};
pub use hazard::{HazardEstimate, HazardMap};
pub use rules::is_forbidden_move;
pub use search::LockoutPolicy;
