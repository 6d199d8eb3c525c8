//! Alpha-beta search with iterative deepening
//!
//! Scores are always from the root player's point of view: the root player
//! maximizes, the opponent minimizes.
//!
//! # Features
//!
//! - Make/undo on one working board, explosions included
//! - Hazard map copied only along lines where a move actually detonates
//! - Forced moves (wins, blocks) short-circuit interior nodes
//! - Candidates ordered by the one-ply heuristic and cut to the top K
//! - Iterative deepening that stops starting new depths at 70% of the budget
//!
//! # Example
//!
//! ```
//! use mine_gomoku::board::{Board, Stone};
//! use mine_gomoku::hazard::HazardMap;
//! use mine_gomoku::search::{LockoutPolicy, Searcher};
//! use rand::SeedableRng;
//!
//! let mut searcher = Searcher::new(12, 0, LockoutPolicy::default());
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let result = searcher.search(&Board::new(), &HazardMap::new(), Stone::Black, 2, None, &mut rng);
//! assert!(result.best_move.is_some());
//! ```

use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::trace;

use crate::board::{Board, Move, Pos, Stone};
use crate::eval::{evaluate_board, evaluate_move_heuristic, PatternScore, MIN_SCORE};
use crate::hazard::{will_trigger, HazardEstimate, HazardMap};
use crate::rules::has_five_in_a_row;

use super::movegen::{generate_moves, LockoutPolicy};
use super::threat::{ThreatScanner, SEARCH_PRIORITY};

/// Infinity score for alpha-beta bounds
const INF: i32 = i32::MAX;

/// Fraction of the time budget after which no new depth is started.
pub const SOFT_LIMIT_RATIO: f64 = 0.7;

/// Root score at or above which deepening stops.
pub const WIN_SCORE: i32 = PatternScore::FIVE;

/// Forced-move checks only pay off with some depth left.
const THREAT_MIN_DEPTH: u8 = 2;

/// Search result containing the best move found and associated statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Best move found, if any
    pub best_move: Option<Pos>,
    /// Root-perspective score of the best move
    pub score: i32,
    /// Depth completed in iterative deepening, 0 if none
    pub depth: u8,
    /// Total nodes searched
    pub nodes: u64,
}

impl SearchResult {
    fn none() -> Self {
        Self {
            best_move: None,
            score: 0,
            depth: 0,
            nodes: 0,
        }
    }
}

/// Immutable per-search context.
struct Context<'a> {
    root: Stone,
    estimate: &'a HazardEstimate,
}

/// Alpha-beta searcher. Reusable across searches; holds no position state.
#[derive(Debug, Clone)]
pub struct Searcher {
    top_k: usize,
    tie_epsilon: i32,
    lockout: LockoutPolicy,
    nodes: u64,
}

impl Searcher {
    /// Create a searcher keeping the best `top_k` candidates per node.
    ///
    /// Root moves scoring within `tie_epsilon` of the best are treated as
    /// ties and picked at random.
    #[must_use]
    pub fn new(top_k: usize, tie_epsilon: i32, lockout: LockoutPolicy) -> Self {
        Self {
            top_k: top_k.max(1),
            tie_epsilon: tie_epsilon.max(0),
            lockout,
            nodes: 0,
        }
    }

    /// Iterative deepening search for `color`.
    ///
    /// Depths run from 1 to `max_depth`. With a `time_limit`, a new depth is
    /// only started while less than [`SOFT_LIMIT_RATIO`] of it has elapsed;
    /// a started depth always completes. When no depth completes, the best
    /// heuristic candidate is returned with depth 0.
    pub fn search<R: Rng>(
        &mut self,
        board: &Board,
        hazards: &HazardMap,
        color: Stone,
        max_depth: u8,
        time_limit: Option<Duration>,
        rng: &mut R,
    ) -> SearchResult {
        self.nodes = 0;
        let start = Instant::now();

        if color == Stone::Empty || board.is_full() {
            return SearchResult::none();
        }

        let estimate = HazardEstimate::from_map(hazards);
        let ctx = Context {
            root: color,
            estimate: &estimate,
        };

        let candidates = self.root_candidates(board, hazards, &ctx);
        let Some(&(first, first_score)) = candidates.first() else {
            return SearchResult::none();
        };

        let mut best = SearchResult {
            best_move: Some(first),
            score: first_score,
            depth: 0,
            nodes: 0,
        };

        let mut work_board = *board;
        for depth in 1..=max_depth {
            if let Some(limit) = time_limit {
                if start.elapsed() >= limit.mul_f64(SOFT_LIMIT_RATIO) {
                    trace!(depth, elapsed_ms = start.elapsed().as_millis() as u64, "time budget reached");
                    break;
                }
            }

            let scored: Vec<(Pos, i32)> = candidates
                .iter()
                .map(|&(pos, _)| {
                    let score = self.play(&mut work_board, hazards, &ctx, pos, color, depth, -INF, INF);
                    (pos, score)
                })
                .collect();

            let (pos, score) = pick_best(&scored, self.tie_epsilon, rng);
            best = SearchResult {
                best_move: Some(pos),
                score,
                depth,
                nodes: self.nodes,
            };
            trace!(depth, score, best = %pos, nodes = self.nodes, "depth complete");

            if score >= WIN_SCORE {
                break;
            }
        }

        best.nodes = self.nodes;
        best
    }

    /// Root moves with their heuristic, best first, capped at `top_k`.
    ///
    /// Forbidden and occupied cells are dropped, unless nothing else is left
    /// under [`LockoutPolicy::AllowForbidden`].
    fn root_candidates(&self, board: &Board, hazards: &HazardMap, ctx: &Context<'_>) -> Vec<(Pos, i32)> {
        let moves = generate_moves(board, ctx.root, self.lockout);
        let mut scored = self.score_moves(board, hazards, ctx.estimate, &moves, ctx.root);
        if scored.is_empty() {
            // Lockout: every candidate is forbidden
            scored = moves.into_iter().map(|pos| (pos, 0)).collect();
        }
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.truncate(self.top_k);
        scored
    }

    /// Heuristic score of every non-rejected move.
    fn score_moves(
        &self,
        board: &Board,
        hazards: &HazardMap,
        estimate: &HazardEstimate,
        moves: &[Pos],
        color: Stone,
    ) -> Vec<(Pos, i32)> {
        moves
            .iter()
            .map(|&pos| (pos, evaluate_move_heuristic(board, hazards, estimate, pos, color)))
            .filter(|&(_, h)| h != MIN_SCORE)
            .collect()
    }

    /// Candidates for an interior node, best for the mover first.
    ///
    /// Both sides sort by descending heuristic. The heuristic is taken from
    /// the mover's side, so an ascending sort for the minimizer would search
    /// its weakest replies first. Stable sorts keep board order among equals.
    fn ordered_moves(
        &self,
        board: &Board,
        hazards: &HazardMap,
        ctx: &Context<'_>,
        color: Stone,
    ) -> Vec<Pos> {
        let moves = generate_moves(board, color, self.lockout);
        let mut scored = self.score_moves(board, hazards, ctx.estimate, &moves, color);
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.truncate(self.top_k);
        scored.into_iter().map(|(pos, _)| pos).collect()
    }

    /// Play `pos` for `color`, search the child, and take the move back.
    #[allow(clippy::too_many_arguments)]
    fn play(
        &mut self,
        board: &mut Board,
        hazards: &HazardMap,
        ctx: &Context<'_>,
        pos: Pos,
        color: Stone,
        depth: u8,
        alpha: i32,
        beta: i32,
    ) -> i32 {
        let explode = will_trigger(hazards, pos);
        let undo = board.apply(Move::new(pos, color), explode);

        let score = if explode {
            let mut child_hazards = hazards.clone();
            child_hazards.detonate(pos);
            self.alpha_beta(board, &child_hazards, ctx, depth - 1, alpha, beta, color.opponent(), pos)
        } else {
            self.alpha_beta(board, hazards, ctx, depth - 1, alpha, beta, color.opponent(), pos)
        };

        board.undo(&undo);
        score
    }

    /// Max/min alpha-beta over `to_move`'s candidates. `last` is the cell
    /// just played, used for the terminal check.
    #[allow(clippy::too_many_arguments)]
    fn alpha_beta(
        &mut self,
        board: &mut Board,
        hazards: &HazardMap,
        ctx: &Context<'_>,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        to_move: Stone,
        last: Pos,
    ) -> i32 {
        self.nodes += 1;

        if depth == 0 || is_terminal(board, last) {
            return evaluate_board(board, hazards, ctx.root);
        }

        if depth >= THREAT_MIN_DEPTH {
            let scanner = ThreatScanner::new(hazards, ctx.estimate);
            if let Some((_, forced)) = scanner.decide(&SEARCH_PRIORITY, board, to_move) {
                return self.play(board, hazards, ctx, forced, to_move, depth, alpha, beta);
            }
        }

        let moves = self.ordered_moves(board, hazards, ctx, to_move);
        if moves.is_empty() {
            return evaluate_board(board, hazards, ctx.root);
        }

        if to_move == ctx.root {
            let mut best = -INF;
            for pos in moves {
                let score = self.play(board, hazards, ctx, pos, to_move, depth, alpha, beta);
                best = best.max(score);
                alpha = alpha.max(score);
                if beta <= alpha {
                    break;
                }
            }
            best
        } else {
            let mut best = INF;
            for pos in moves {
                let score = self.play(board, hazards, ctx, pos, to_move, depth, alpha, beta);
                best = best.min(score);
                beta = beta.min(score);
                if beta <= alpha {
                    break;
                }
            }
            best
        }
    }
}

/// The last stone survived and made five, or no cell is left.
fn is_terminal(board: &Board, last: Pos) -> bool {
    let color = board.get(last);
    (color != Stone::Empty && has_five_in_a_row(board, last, color)) || board.is_full()
}

/// Uniform random pick among moves scoring within `epsilon` of the best.
fn pick_best<R: Rng>(scored: &[(Pos, i32)], epsilon: i32, rng: &mut R) -> (Pos, i32) {
    let mut best = scored[0];
    for &candidate in &scored[1..] {
        if candidate.1 > best.1 {
            best = candidate;
        }
    }
    let floor = i64::from(best.1) - i64::from(epsilon);
    let ties: Vec<(Pos, i32)> = scored
        .iter()
        .copied()
        .filter(|&(_, s)| i64::from(s) >= floor)
        .collect();
    ties.choose(rng).copied().unwrap_or(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn setup_board(setup: &[(u8, u8, Stone)]) -> Board {
        let mut board = Board::new();
        for &(x, y, s) in setup {
            board.place_stone(Pos::new(x, y), s);
        }
        board
    }

    fn searcher() -> Searcher {
        Searcher::new(12, 0, LockoutPolicy::default())
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_search_empty_board() {
        let result = searcher().search(&Board::new(), &HazardMap::new(), Stone::Black, 2, None, &mut rng());
        let best = result.best_move.unwrap();
        assert!(best.distance(Pos::center()) <= 3);
        assert_eq!(result.depth, 2);
        assert!(result.nodes > 0);
    }

    #[test]
    fn test_search_finds_winning_move() {
        let board = setup_board(&[
            (3, 9, Stone::White),
            (4, 9, Stone::White),
            (5, 9, Stone::White),
            (6, 9, Stone::White),
            (3, 3, Stone::Black),
            (4, 4, Stone::Black),
            (5, 5, Stone::Black),
        ]);
        let result = searcher().search(&board, &HazardMap::new(), Stone::White, 2, None, &mut rng());
        let best = result.best_move.unwrap();
        assert!(best == Pos::new(2, 9) || best == Pos::new(7, 9));
        assert!(result.score >= WIN_SCORE);
    }

    #[test]
    fn test_search_blocks_opponent_win() {
        // White's four on row 9 is capped at x=2; only (7,9) stops it
        let board = setup_board(&[
            (3, 9, Stone::White),
            (4, 9, Stone::White),
            (5, 9, Stone::White),
            (6, 9, Stone::White),
            (2, 9, Stone::Black),
            (7, 3, Stone::Black),
        ]);
        // The block has no shape value for black, so keep every candidate
        let mut wide = Searcher::new(64, 0, LockoutPolicy::default());
        let result = wide.search(&board, &HazardMap::new(), Stone::Black, 2, None, &mut rng());
        assert_eq!(result.best_move, Some(Pos::new(7, 9)));
    }

    #[test]
    fn test_search_never_returns_forbidden() {
        let board = setup_board(&[
            (5, 7, Stone::Black),
            (6, 7, Stone::Black),
            (7, 5, Stone::Black),
            (7, 6, Stone::Black),
            (9, 9, Stone::White),
            (10, 10, Stone::White),
        ]);
        let result = searcher().search(&board, &HazardMap::new(), Stone::Black, 2, None, &mut rng());
        let best = result.best_move.unwrap();
        assert_ne!(best, Pos::new(7, 7));
        assert!(!crate::rules::is_forbidden_move(&board, best, Stone::Black));
    }

    #[test]
    fn test_search_full_board() {
        let mut board = Board::new();
        for idx in 0..crate::board::TOTAL_CELLS {
            board.place_stone(Pos::from_index(idx), Stone::White);
        }
        let result = searcher().search(&board, &HazardMap::new(), Stone::Black, 2, None, &mut rng());
        assert_eq!(result, SearchResult::none());
    }

    #[test]
    fn test_zero_budget_falls_back_to_heuristic() {
        let board = setup_board(&[(7, 7, Stone::Black), (8, 8, Stone::White)]);
        let result = searcher().search(
            &board,
            &HazardMap::new(),
            Stone::Black,
            3,
            Some(Duration::ZERO),
            &mut rng(),
        );
        assert!(result.best_move.is_some());
        assert_eq!(result.depth, 0);
        assert_eq!(result.nodes, 0);
    }

    #[test]
    fn test_search_leaves_board_untouched() {
        let board = setup_board(&[(7, 7, Stone::Black), (8, 7, Stone::White), (6, 6, Stone::Black)]);
        let hazards = HazardMap::with_hazards([(7, 8), (5, 5), (8, 6)]);
        let snapshot = board;
        let hazard_snapshot = hazards.clone();
        searcher().search(&board, &hazards, Stone::White, 3, None, &mut rng());
        assert_eq!(board, snapshot);
        assert_eq!(hazards, hazard_snapshot);
    }

    #[test]
    fn test_interior_node_plays_only_the_forced_block() {
        // Black's (6,7) makes a four capped at x=2; White must answer at (7,7)
        let before = setup_board(&[
            (3, 7, Stone::Black),
            (4, 7, Stone::Black),
            (5, 7, Stone::Black),
            (2, 7, Stone::White),
            (10, 10, Stone::White),
        ]);
        let hazards = HazardMap::new();
        let estimate = HazardEstimate::from_map(&hazards);
        let ctx = Context {
            root: Stone::Black,
            estimate: &estimate,
        };
        let mut s = searcher();

        let mut board = before;
        let score = s.play(&mut board, &hazards, &ctx, Pos::new(6, 7), Stone::Black, 3, -INF, INF);
        let line_nodes = s.nodes;
        assert_eq!(board, before);

        let mut four = before;
        four.place_stone(Pos::new(6, 7), Stone::Black);
        s.nodes = 0;
        let block_score = s.play(&mut four, &hazards, &ctx, Pos::new(7, 7), Stone::White, 2, -INF, INF);

        // White's node searched nothing but the block
        assert_eq!(score, block_score);
        assert_eq!(line_nodes, s.nodes + 1);
        assert!(score < WIN_SCORE);
    }

    #[test]
    fn test_detonated_mine_stays_cleared_down_the_line() {
        // Mine (8,7) guards White's completion at (8,7); White's (9,8) sets it off
        let before = setup_board(&[
            (4, 7, Stone::White),
            (5, 7, Stone::White),
            (6, 7, Stone::White),
            (7, 7, Stone::White),
            (3, 7, Stone::Black),
            (12, 12, Stone::Black),
        ]);
        let hazards = HazardMap::with_hazards([(8, 7)]);
        assert!(will_trigger(&hazards, Pos::new(9, 8)));
        assert!(will_trigger(&hazards, Pos::new(8, 7)));

        let estimate = HazardEstimate::from_map(&hazards);
        let ctx = Context {
            root: Stone::White,
            estimate: &estimate,
        };
        let mut s = searcher();

        let mut board = before;
        let score = s.play(&mut board, &hazards, &ctx, Pos::new(9, 8), Stone::White, 3, -INF, INF);
        let line_nodes = s.nodes;
        assert_eq!(board, before);

        let mut blasted = before;
        let _ = blasted.apply(Move::new(Pos::new(9, 8), Stone::White), true);
        let mut cleared = hazards.clone();
        cleared.detonate(Pos::new(9, 8));
        assert!(!will_trigger(&cleared, Pos::new(8, 7)));

        // (8,7) is a live win for White again, so Black is forced to block it
        s.nodes = 0;
        let block_score = s.play(&mut blasted, &cleared, &ctx, Pos::new(8, 7), Stone::Black, 2, -INF, INF);
        assert_eq!(score, block_score);
        assert_eq!(line_nodes, s.nodes + 1);
    }

    #[test]
    fn test_top_k_limits_root_candidates() {
        let board = setup_board(&[(7, 7, Stone::Black)]);
        let estimate = HazardEstimate::uniform();
        let ctx = Context {
            root: Stone::White,
            estimate: &estimate,
        };
        let narrow = Searcher::new(3, 0, LockoutPolicy::default());
        let candidates = narrow.root_candidates(&board, &HazardMap::new(), &ctx);
        assert_eq!(candidates.len(), 3);
        assert!(candidates.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn test_minimizer_orders_strongest_reply_first() {
        // Black (the minimizer here) has an open three to extend
        let board = setup_board(&[
            (6, 7, Stone::Black),
            (7, 7, Stone::Black),
            (8, 7, Stone::Black),
            (3, 3, Stone::White),
        ]);
        let estimate = HazardEstimate::uniform();
        let ctx = Context {
            root: Stone::White,
            estimate: &estimate,
        };
        let moves = searcher().ordered_moves(&board, &HazardMap::new(), &ctx, Stone::Black);
        assert!(moves[0] == Pos::new(5, 7) || moves[0] == Pos::new(9, 7));
    }

    #[test]
    fn test_pick_best_ties() {
        let scored = [(Pos::new(1, 1), 10), (Pos::new(2, 2), 12), (Pos::new(3, 3), 11)];
        let mut r = rng();
        assert_eq!(pick_best(&scored, 0, &mut r), (Pos::new(2, 2), 12));
        for _ in 0..20 {
            let (pos, score) = pick_best(&scored, 1, &mut r);
            assert!(score >= 11);
            assert_ne!(pos, Pos::new(1, 1));
        }
    }

    #[test]
    fn test_same_seed_same_move() {
        let board = setup_board(&[(7, 7, Stone::Black), (8, 8, Stone::White)]);
        let hazards = HazardMap::new();
        let mut s = Searcher::new(12, 50, LockoutPolicy::default());
        let a = s.search(&board, &hazards, Stone::Black, 2, None, &mut StdRng::seed_from_u64(5));
        let b = s.search(&board, &hazards, Stone::Black, 2, None, &mut StdRng::seed_from_u64(5));
        assert_eq!(a.best_move, b.best_move);
    }
}
