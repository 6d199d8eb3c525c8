//! Game rules for mine gomoku
//!
//! This module implements the rule set including:
//! - Line scanning primitives (runs, open ends)
//! - Win conditions (five in a row, terminal positions)
//! - Forbidden moves for Black (double-three, double-four, overline)

pub mod forbidden;
pub mod line;
pub mod win;

// Re-exports for convenient access
pub use forbidden::{
    check_move, is_forbidden_move, is_four, is_open_three, is_valid_move, violation, Violation,
};
pub use line::{count_consecutive, is_open_end, run_end, run_flanks, run_length};
pub use win::{
    completes_five, find_five_positions, has_exact_five, has_five_in_a_row, is_game_over, winner,
};
