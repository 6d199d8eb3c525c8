//! Search module for mine gomoku
//!
//! Contains:
//! - Candidate move generation with the lockout policy
//! - Threat scanning and the forced-move decision tables
//! - Alpha-beta search with iterative deepening

pub mod alphabeta;
pub mod movegen;
pub mod threat;

pub use alphabeta::{SearchResult, Searcher, SOFT_LIMIT_RATIO, WIN_SCORE};
pub use movegen::{generate_moves, LockoutPolicy};
pub use threat::{
    Decision, ThreatKind, ThreatRecord, ThreatScanner, DEFENSE_BASE, ROOT_PRIORITY,
    SEARCH_PRIORITY,
};
