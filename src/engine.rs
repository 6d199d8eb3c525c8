//! Main AI engine integrating the decision table and the search
//!
//! Each call follows a fixed priority:
//!
//! 1. **Decision table**: [`ROOT_PRIORITY`] rules, from own win down to
//!    making an own open four
//! 2. **Alpha-beta**: iterative deepening over the top heuristic candidates
//!
//! # Example
//!
//! ```
//! use mine_gomoku::{Board, Engine, EngineConfig, HazardMap, Pos, Stone};
//!
//! let config = EngineConfig {
//!     max_depth: 2,
//!     seed: Some(1),
//!     ..EngineConfig::default()
//! };
//! let mut engine = Engine::with_config(config);
//!
//! let mut board = Board::new();
//! board.place_stone(Pos::new(7, 7), Stone::Black);
//!
//! let result = engine.get_move_with_stats(&board, &HazardMap::new(), Stone::White);
//! println!("Best move: {:?}", result.best_move);
//! println!("Search type: {:?}", result.search_type);
//! ```

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::board::{Board, Pos, Stone};
use crate::eval::{evaluate_move_heuristic, PatternScore};
use crate::hazard::{HazardEstimate, HazardMap};
use crate::search::{Decision, LockoutPolicy, SearchResult, Searcher, ThreatScanner, ROOT_PRIORITY};

/// Strength presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    /// Alpha-beta depth for this preset.
    pub fn depth(self) -> u8 {
        match self {
            Difficulty::Easy => 2,
            Difficulty::Normal => 3,
            Difficulty::Hard => 4,
        }
    }
}

/// Engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Deepest iteration of the alpha-beta search
    pub max_depth: u8,
    /// Budget per move; no new depth starts after 70% of it
    pub time_limit_ms: u64,
    /// Candidates kept per node after ordering
    pub top_k: usize,
    /// Root scores within this margin of the best are tied
    pub tie_epsilon: i32,
    /// Behaviour when every empty cell is forbidden
    pub lockout: LockoutPolicy,
    /// Fixed RNG seed; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: Difficulty::Normal.depth(),
            time_limit_ms: 2000,
            top_k: 12,
            tie_epsilon: 0,
            lockout: LockoutPolicy::AllowForbidden,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Defaults with the depth of a difficulty preset.
    #[must_use]
    pub fn with_difficulty(difficulty: Difficulty) -> Self {
        Self {
            max_depth: difficulty.depth(),
            ..Self::default()
        }
    }
}

/// Type of search that produced the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    /// Own five completed on the spot
    ImmediateWin,
    /// Blocking rule from the decision table
    Defense,
    /// Own genuine open four from the decision table
    Attack,
    /// Regular alpha-beta search result
    AlphaBeta,
}

impl From<Decision> for SearchType {
    fn from(decision: Decision) -> Self {
        if decision.is_defense() {
            SearchType::Defense
        } else if decision == Decision::Win {
            SearchType::ImmediateWin
        } else {
            SearchType::Attack
        }
    }
}

/// Result of a move search with detailed statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResult {
    /// Best move found, if any
    pub best_move: Option<Pos>,
    /// Score in the mover's perspective
    pub score: i32,
    /// Type of search that found this move
    pub search_type: SearchType,
    /// Decision rule that fired, if the table decided
    pub decision: Option<Decision>,
    /// Deepest completed alpha-beta iteration
    pub depth: u8,
    /// Time taken in milliseconds
    pub time_ms: u64,
    /// Number of nodes searched
    pub nodes: u64,
}

impl MoveResult {
    /// Create a result for a decision table hit
    #[inline]
    fn decision(decision: Decision, pos: Pos, score: i32, time_ms: u64) -> Self {
        Self {
            best_move: Some(pos),
            score,
            search_type: decision.into(),
            decision: Some(decision),
            depth: 0,
            time_ms,
            nodes: 0,
        }
    }

    /// Create a result from alpha-beta search
    #[inline]
    fn from_alphabeta(result: SearchResult, time_ms: u64) -> Self {
        Self {
            best_move: result.best_move,
            score: result.score,
            search_type: SearchType::AlphaBeta,
            decision: None,
            depth: result.depth,
            time_ms,
            nodes: result.nodes,
        }
    }

    /// Create a result indicating no move found
    #[inline]
    fn no_move(time_ms: u64) -> Self {
        Self {
            best_move: None,
            score: 0,
            search_type: SearchType::AlphaBeta,
            decision: None,
            depth: 0,
            time_ms,
            nodes: 0,
        }
    }
}

/// Main AI engine for mine gomoku.
///
/// Owns its configuration, a reusable searcher and the RNG used for root
/// tie-breaks. Board and hazards are borrowed per call and never modified.
pub struct Engine {
    config: EngineConfig,
    searcher: Searcher,
    rng: StdRng,
}

impl Engine {
    /// Create an engine with default settings and an entropy-seeded RNG.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an engine with custom configuration.
    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            searcher: Searcher::new(config.top_k, config.tie_epsilon, config.lockout),
            config,
            rng,
        }
    }

    /// Create an engine at a difficulty preset.
    #[must_use]
    pub fn with_difficulty(difficulty: Difficulty) -> Self {
        Self::with_config(EngineConfig::with_difficulty(difficulty))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn max_depth(&self) -> u8 {
        self.config.max_depth
    }

    /// Set maximum search depth (at least 1).
    pub fn set_max_depth(&mut self, depth: u8) {
        self.config.max_depth = depth.max(1);
    }

    pub fn set_time_limit(&mut self, time_ms: u64) {
        self.config.time_limit_ms = time_ms;
    }

    /// Best move for `color` within the configured time budget.
    pub fn get_next_move(&mut self, board: &Board, hazards: &HazardMap, color: Stone) -> Option<Pos> {
        self.get_move_with_stats(board, hazards, color).best_move
    }

    /// Best move for `color` within `time_limit_ms`.
    pub fn get_next_move_with_time_limit(
        &mut self,
        board: &Board,
        hazards: &HazardMap,
        color: Stone,
        time_limit_ms: u64,
    ) -> Option<Pos> {
        self.decide(board, hazards, color, Duration::from_millis(time_limit_ms))
            .best_move
    }

    /// Best move plus how it was found.
    pub fn get_move_with_stats(&mut self, board: &Board, hazards: &HazardMap, color: Stone) -> MoveResult {
        let budget = Duration::from_millis(self.config.time_limit_ms);
        self.decide(board, hazards, color, budget)
    }

    fn decide(&mut self, board: &Board, hazards: &HazardMap, color: Stone, budget: Duration) -> MoveResult {
        let start = Instant::now();

        if color == Stone::Empty || board.is_full() {
            return MoveResult::no_move(elapsed_ms(start));
        }

        let estimate = HazardEstimate::from_map(hazards);
        let scanner = ThreatScanner::new(hazards, &estimate);
        if let Some((decision, pos)) = scanner.decide(&ROOT_PRIORITY, board, color) {
            let score = decision_score(decision, board, hazards, &estimate, pos, color);
            debug!(?decision, %pos, ?color, "decision rule fired");
            return MoveResult::decision(decision, pos, score, elapsed_ms(start));
        }

        let result = self.searcher.search(
            board,
            hazards,
            color,
            self.config.max_depth,
            Some(budget),
            &mut self.rng,
        );
        let time_ms = elapsed_ms(start);
        debug!(
            best = ?result.best_move,
            score = result.score,
            depth = result.depth,
            nodes = result.nodes,
            time_ms,
            "search finished"
        );
        MoveResult::from_alphabeta(result, time_ms)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Score reported for a decision table move.
fn decision_score(
    decision: Decision,
    board: &Board,
    hazards: &HazardMap,
    estimate: &HazardEstimate,
    pos: Pos,
    color: Stone,
) -> i32 {
    match decision {
        Decision::Win => PatternScore::FIVE,
        _ => evaluate_move_heuristic(board, hazards, estimate, pos, color),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

/// Best move for `color` with a fresh default engine.
pub fn get_next_move(board: &Board, hazards: &HazardMap, color: Stone) -> Option<Pos> {
    Engine::new().get_next_move(board, hazards, color)
}

/// Best move for `color` within `time_limit_ms`, with a fresh default engine.
pub fn get_next_move_with_time_limit(
    board: &Board,
    hazards: &HazardMap,
    color: Stone,
    time_limit_ms: u64,
) -> Option<Pos> {
    Engine::new().get_next_move_with_time_limit(board, hazards, color, time_limit_ms)
}
