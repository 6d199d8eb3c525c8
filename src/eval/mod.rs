//! Position evaluation for mine gomoku
//!
//! - Pattern scores and shape classification
//! - Board differential and one-ply move heuristic
//! - Win probability and move assessment

pub mod heuristic;
pub mod patterns;
pub mod probability;

pub use heuristic::{center_bonus, evaluate_board, evaluate_move_heuristic, MIN_SCORE};
pub use patterns::{
    evaluate_direction_shape, evaluate_shape_score, evaluate_stone_value, PatternScore,
};
pub use probability::{
    assess_move, calculate_win_probability, confidence, logistic, win_probabilities,
    MoveAssessment,
};
