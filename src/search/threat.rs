//! Tactical threat scanning and the forced-move decision table
//!
//! Before any tree search the engine asks a short, ordered list of questions:
//! can I win now, must I block a win, must I stop an open four, and so on.
//! Each question is a [`Decision`]; the ordered lists [`ROOT_PRIORITY`] and
//! [`SEARCH_PRIORITY`] are the decision tables used at the root and inside
//! the search.
//!
//! Threats are *genuine* only if the follow-up is actually reachable:
//! - an open four needs both completion cells empty and each one to make five
//! - a four needs at least one such completion
//! - an open three needs a flank extension that itself makes a genuine open four
//!
//! A stone that would land on a hazard is blown away, so such cells never
//! complete a five or create a threat.

use crate::board::{Board, Pos, Stone, DIRECTIONS};
use crate::eval::{center_bonus, evaluate_move_heuristic, PatternScore, MIN_SCORE};
use crate::hazard::{will_trigger, HazardEstimate, HazardMap};
use crate::rules::{completes_five, count_consecutive, is_forbidden_move, is_open_three, run_flanks};

/// Fixed part of an open-three defense score.
pub const DEFENSE_BASE: i32 = PatternScore::OPEN_THREE;

/// Kinds of threat a single placement can create, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ThreatKind {
    Win,
    OpenFour,
    Four,
    OpenThree,
}

/// An empty cell where `kind` would appear if the scanned color played there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreatRecord {
    pub pos: Pos,
    pub kind: ThreatKind,
}

/// One row of the decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    /// Complete own five
    Win,
    /// Occupy the cell where the opponent would complete five
    BlockWin,
    /// Occupy the cell where the opponent would make a genuine open four
    BlockOpenFour,
    /// Occupy the cell where the opponent would make a genuine four
    BlockFour,
    /// Cap the opponent's genuine open three on its best flank
    BlockOpenThree,
    /// Make own genuine open four
    OpenFour,
}

/// Priority order before the root search.
pub const ROOT_PRIORITY: [Decision; 6] = [
    Decision::Win,
    Decision::BlockWin,
    Decision::BlockOpenFour,
    Decision::BlockFour,
    Decision::BlockOpenThree,
    Decision::OpenFour,
];

/// Forced continuations re-checked at interior nodes.
pub const SEARCH_PRIORITY: [Decision; 4] = [
    Decision::Win,
    Decision::BlockWin,
    Decision::BlockOpenFour,
    Decision::BlockOpenThree,
];

impl Decision {
    /// Run this rule for `color`; `Some` means the rule fires with that move.
    pub fn select(self, scanner: &ThreatScanner<'_>, board: &Board, color: Stone) -> Option<Pos> {
        match self {
            Decision::Win => scanner.find_winning_move(board, color),
            Decision::BlockWin => scanner.block_win(board, color),
            Decision::BlockOpenFour => scanner.block_open_four(board, color),
            Decision::BlockFour => scanner.block_four(board, color),
            Decision::BlockOpenThree => scanner.block_open_three(board, color),
            Decision::OpenFour => scanner
                .open_fours(board, color)
                .first()
                .map(|threat| threat.pos),
        }
    }

    /// Whether the move defends rather than attacks.
    pub fn is_defense(self) -> bool {
        matches!(
            self,
            Decision::BlockWin
                | Decision::BlockOpenFour
                | Decision::BlockFour
                | Decision::BlockOpenThree
        )
    }
}

/// Threat detection against a fixed hazard field.
#[derive(Debug, Clone, Copy)]
pub struct ThreatScanner<'a> {
    hazards: &'a HazardMap,
    estimate: &'a HazardEstimate,
}

impl<'a> ThreatScanner<'a> {
    pub fn new(hazards: &'a HazardMap, estimate: &'a HazardEstimate) -> Self {
        Self { hazards, estimate }
    }

    /// First rule in `table` that fires for `color`.
    pub fn decide(&self, table: &[Decision], board: &Board, color: Stone) -> Option<(Decision, Pos)> {
        table
            .iter()
            .find_map(|&rule| rule.select(self, board, color).map(|pos| (rule, pos)))
    }

    // =========================================================================
    // Reachability checks
    // =========================================================================

    /// Playing `color` on `pos` wins and the stone survives.
    #[inline]
    fn wins_at(&self, board: &Board, pos: Pos, color: Stone) -> bool {
        completes_five(board, pos, color) && !will_trigger(self.hazards, pos)
    }

    /// Exactly four through `pos` whose both completion cells win.
    fn genuine_open_four(&self, board: &Board, pos: Pos, dx: i32, dy: i32, color: Stone) -> bool {
        count_consecutive(board, pos, dx, dy, color) == 4
            && run_flanks(board, pos, dx, dy, color)
                .iter()
                .all(|flank| flank.is_some_and(|f| self.wins_at(board, f, color)))
    }

    /// Exactly four through `pos` with at least one winning completion.
    fn genuine_four(&self, board: &Board, pos: Pos, dx: i32, dy: i32, color: Stone) -> bool {
        count_consecutive(board, pos, dx, dy, color) == 4
            && run_flanks(board, pos, dx, dy, color)
                .iter()
                .any(|flank| flank.is_some_and(|f| self.wins_at(board, f, color)))
    }

    /// Open three through `pos` that a flank extension turns into a genuine
    /// open four.
    fn genuine_open_three(&self, board: &Board, pos: Pos, dx: i32, dy: i32, color: Stone) -> bool {
        if !is_open_three(board, pos, dx, dy, color) {
            return false;
        }
        run_flanks(board, pos, dx, dy, color)
            .into_iter()
            .flatten()
            .any(|flank| {
                if !self.playable(board, flank, color) {
                    return false;
                }
                let mut extended = *board;
                extended.place_stone(flank, color);
                self.genuine_open_four(&extended, flank, dx, dy, color)
            })
    }

    /// Empty, allowed for `color`, and not on a hazard.
    #[inline]
    fn playable(&self, board: &Board, pos: Pos, color: Stone) -> bool {
        board.is_empty(pos) && !will_trigger(self.hazards, pos) && !is_forbidden_move(board, pos, color)
    }

    /// Cells worth scanning for `color`: playable and next to a `color` stone.
    fn threat_cells(&self, board: &Board, color: Stone) -> Vec<Pos> {
        board
            .empty_cells()
            .filter(|&pos| touches(board, pos, color) && self.playable(board, pos, color))
            .collect()
    }

    /// Scan for cells where placing `color` satisfies `test` on some axis.
    fn scan_with(
        &self,
        board: &Board,
        color: Stone,
        kind: ThreatKind,
        test: impl Fn(&Self, &Board, Pos, i32, i32) -> bool,
    ) -> Vec<ThreatRecord> {
        self.threat_cells(board, color)
            .into_iter()
            .filter(|&pos| {
                let mut after = *board;
                after.place_stone(pos, color);
                DIRECTIONS
                    .iter()
                    .any(|&(dx, dy)| test(self, &after, pos, dx, dy))
            })
            .map(|pos| ThreatRecord { pos, kind })
            .collect()
    }

    // =========================================================================
    // Threat lists
    // =========================================================================

    /// Every cell where `color` completes five right now.
    pub fn winning_moves(&self, board: &Board, color: Stone) -> Vec<Pos> {
        self.threat_cells(board, color)
            .into_iter()
            .filter(|&pos| self.wins_at(board, pos, color))
            .collect()
    }

    /// First winning cell for `color`, in board order.
    pub fn find_winning_move(&self, board: &Board, color: Stone) -> Option<Pos> {
        self.threat_cells(board, color)
            .into_iter()
            .find(|&pos| self.wins_at(board, pos, color))
    }

    pub fn open_fours(&self, board: &Board, color: Stone) -> Vec<ThreatRecord> {
        self.scan_with(board, color, ThreatKind::OpenFour, |s, b, p, dx, dy| {
            s.genuine_open_four(b, p, dx, dy, color)
        })
    }

    /// Genuine fours, open ones included.
    pub fn fours(&self, board: &Board, color: Stone) -> Vec<ThreatRecord> {
        self.scan_with(board, color, ThreatKind::Four, |s, b, p, dx, dy| {
            s.genuine_four(b, p, dx, dy, color)
        })
    }

    pub fn open_threes(&self, board: &Board, color: Stone) -> Vec<ThreatRecord> {
        self.scan_with(board, color, ThreatKind::OpenThree, |s, b, p, dx, dy| {
            s.genuine_open_three(b, p, dx, dy, color)
        })
    }

    /// All threat cells for `color`, each tagged with its strongest kind.
    pub fn scan(&self, board: &Board, color: Stone) -> Vec<ThreatRecord> {
        let mut threats: Vec<ThreatRecord> = self
            .winning_moves(board, color)
            .into_iter()
            .map(|pos| ThreatRecord {
                pos,
                kind: ThreatKind::Win,
            })
            .collect();
        for record in self
            .open_fours(board, color)
            .into_iter()
            .chain(self.fours(board, color))
            .chain(self.open_threes(board, color))
        {
            if !threats.iter().any(|t| t.pos == record.pos) {
                threats.push(record);
            }
        }
        threats.sort_by_key(|t| (t.kind, t.pos));
        threats
    }

    // =========================================================================
    // Defense
    // =========================================================================

    /// First threat cell the defender is allowed to occupy.
    fn first_allowed(board: &Board, cells: impl IntoIterator<Item = Pos>, defender: Stone) -> Option<Pos> {
        cells
            .into_iter()
            .find(|&pos| !is_forbidden_move(board, pos, defender))
    }

    /// Occupy a cell where the opponent would complete five.
    pub fn block_win(&self, board: &Board, defender: Stone) -> Option<Pos> {
        Self::first_allowed(board, self.winning_moves(board, defender.opponent()), defender)
    }

    pub fn block_open_four(&self, board: &Board, defender: Stone) -> Option<Pos> {
        let threats = self.open_fours(board, defender.opponent());
        Self::first_allowed(board, threats.iter().map(|t| t.pos), defender)
    }

    pub fn block_four(&self, board: &Board, defender: Stone) -> Option<Pos> {
        let threats = self.fours(board, defender.opponent());
        Self::first_allowed(board, threats.iter().map(|t| t.pos), defender)
    }

    /// Best flank cell against the opponent's genuine open threes.
    ///
    /// Candidates are the extension cells of every open three the opponent
    /// could make, de-duplicated in first-seen order. Each scores
    /// `DEFENSE_BASE + heuristic / 10 + center_bonus`; the first maximum wins.
    pub fn block_open_three(&self, board: &Board, defender: Stone) -> Option<Pos> {
        let attacker = defender.opponent();
        let candidates = self.open_three_flanks(board, attacker);

        let mut best: Option<(Pos, i32)> = None;
        for pos in candidates {
            if is_forbidden_move(board, pos, defender) {
                continue;
            }
            let heuristic = evaluate_move_heuristic(board, self.hazards, self.estimate, pos, defender);
            if heuristic == MIN_SCORE {
                continue;
            }
            let score = DEFENSE_BASE + heuristic / 10 + center_bonus(pos);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((pos, score));
            }
        }
        best.map(|(pos, _)| pos)
    }

    /// Flank cells of every genuine open three `attacker` could create.
    pub fn open_three_flanks(&self, board: &Board, attacker: Stone) -> Vec<Pos> {
        let mut flanks = Vec::new();
        for threat in self.open_threes(board, attacker) {
            let mut after = *board;
            after.place_stone(threat.pos, attacker);
            for &(dx, dy) in &DIRECTIONS {
                if !self.genuine_open_three(&after, threat.pos, dx, dy, attacker) {
                    continue;
                }
                for flank in run_flanks(&after, threat.pos, dx, dy, attacker).into_iter().flatten() {
                    if board.is_empty(flank) && !flanks.contains(&flank) {
                        flanks.push(flank);
                    }
                }
            }
        }
        flanks
    }
}

/// Some 8-neighbour of `pos` holds `color`.
#[inline]
fn touches(board: &Board, pos: Pos, color: Stone) -> bool {
    (-1..=1).any(|dx| {
        (-1..=1).any(|dy| {
            (dx, dy) != (0, 0) && pos.offset(dx, dy, 1).is_some_and(|p| board.get(p) == color)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_board(setup: &[(u8, u8, Stone)]) -> Board {
        let mut board = Board::new();
        for &(x, y, s) in setup {
            board.place_stone(Pos::new(x, y), s);
        }
        board
    }

    fn row(xs: &[u8], y: u8, color: Stone) -> Vec<(u8, u8, Stone)> {
        xs.iter().map(|&x| (x, y, color)).collect()
    }

    fn positions(records: &[ThreatRecord]) -> Vec<Pos> {
        records.iter().map(|r| r.pos).collect()
    }

    #[test]
    fn test_finds_winning_move() {
        let board = setup_board(&row(&[3, 4, 5, 6], 7, Stone::White));
        let hazards = HazardMap::new();
        let estimate = HazardEstimate::uniform();
        let scanner = ThreatScanner::new(&hazards, &estimate);
        assert_eq!(
            scanner.winning_moves(&board, Stone::White),
            vec![Pos::new(2, 7), Pos::new(7, 7)]
        );
        assert_eq!(scanner.find_winning_move(&board, Stone::White), Some(Pos::new(2, 7)));
        assert_eq!(scanner.find_winning_move(&board, Stone::Black), None);
    }

    #[test]
    fn test_win_on_hazard_is_not_a_win() {
        // Both completions of the four sit on hazard corners
        let board = setup_board(&row(&[3, 4, 5, 6], 7, Stone::White));
        let hazards = HazardMap::with_hazards([(2, 7), (7, 7)]);
        let estimate = HazardEstimate::uniform();
        let scanner = ThreatScanner::new(&hazards, &estimate);
        assert_eq!(scanner.find_winning_move(&board, Stone::White), None);
    }

    #[test]
    fn test_open_four_cells() {
        // x: 4 5 6 7 8 9
        //    _ W W W _ _   -> (3,7) and (7,7) make open fours, (8,7) only a split shape
        let board = setup_board(&row(&[4, 5, 6], 7, Stone::White));
        let hazards = HazardMap::new();
        let estimate = HazardEstimate::uniform();
        let scanner = ThreatScanner::new(&hazards, &estimate);
        assert_eq!(
            positions(&scanner.open_fours(&board, Stone::White)),
            vec![Pos::new(3, 7), Pos::new(7, 7)]
        );
    }

    #[test]
    fn test_open_four_needs_both_completions() {
        // Same three, but a hazard sits on the far completion of (7,7)
        let board = setup_board(&row(&[4, 5, 6], 7, Stone::White));
        let hazards = HazardMap::with_hazards([(8, 7)]);
        let estimate = HazardEstimate::uniform();
        let scanner = ThreatScanner::new(&hazards, &estimate);
        let open = positions(&scanner.open_fours(&board, Stone::White));
        assert_eq!(open, vec![Pos::new(3, 7)]);
        // Still a plain four there
        let fours = positions(&scanner.fours(&board, Stone::White));
        assert!(fours.contains(&Pos::new(7, 7)));
    }

    #[test]
    fn test_blocked_three_gives_four_not_open_four() {
        // x: 3 4 5 6 7
        //    B W W W _
        let mut setup = row(&[4, 5, 6], 7, Stone::White);
        setup.push((3, 7, Stone::Black));
        let board = setup_board(&setup);
        let hazards = HazardMap::new();
        let estimate = HazardEstimate::uniform();
        let scanner = ThreatScanner::new(&hazards, &estimate);
        assert!(scanner.open_fours(&board, Stone::White).is_empty());
        assert_eq!(
            positions(&scanner.fours(&board, Stone::White)),
            vec![Pos::new(7, 7)]
        );
    }

    #[test]
    fn test_open_three_cells() {
        // _ _ W W _ _  -> extending either side makes a genuine open three
        let board = setup_board(&row(&[6, 7], 7, Stone::White));
        let hazards = HazardMap::new();
        let estimate = HazardEstimate::uniform();
        let scanner = ThreatScanner::new(&hazards, &estimate);
        let threes = positions(&scanner.open_threes(&board, Stone::White));
        assert_eq!(threes, vec![Pos::new(5, 7), Pos::new(8, 7)]);
    }

    #[test]
    fn test_open_three_against_edge_is_not_genuine() {
        // Three at the edge: one flank is off-board, so no open four can follow
        let board = setup_board(&row(&[1, 2], 7, Stone::White));
        let hazards = HazardMap::new();
        let estimate = HazardEstimate::uniform();
        let scanner = ThreatScanner::new(&hazards, &estimate);
        let threes = positions(&scanner.open_threes(&board, Stone::White));
        assert!(!threes.contains(&Pos::new(0, 7)));
        // (3,7) gives _WWW_ from 1..=3 with flanks 0 and 4, and 4 extends to
        // an open four 1..=4 needing cells 0 and 5
        assert!(threes.contains(&Pos::new(3, 7)));
    }

    #[test]
    fn test_scan_tags_strongest_kind() {
        let board = setup_board(&row(&[4, 5, 6, 7], 7, Stone::Black));
        let hazards = HazardMap::new();
        let estimate = HazardEstimate::uniform();
        let scanner = ThreatScanner::new(&hazards, &estimate);
        let threats = scanner.scan(&board, Stone::Black);
        assert!(threats.iter().all(|t| t.kind == ThreatKind::Win || t.pos != Pos::new(3, 7)));
        assert_eq!(threats[0].kind, ThreatKind::Win);
    }

    #[test]
    fn test_decide_root_priority() {
        let hazards = HazardMap::new();
        let estimate = HazardEstimate::uniform();
        let scanner = ThreatScanner::new(&hazards, &estimate);

        // Own win beats blocking
        let mut setup = row(&[3, 4, 5, 6], 2, Stone::Black);
        setup.extend(row(&[3, 4, 5, 6], 10, Stone::White));
        let board = setup_board(&setup);
        let (rule, _) = scanner.decide(&ROOT_PRIORITY, &board, Stone::Black).unwrap();
        assert_eq!(rule, Decision::Win);

        // Nothing to win: block
        let board = setup_board(&row(&[3, 4, 5, 6], 10, Stone::White));
        let (rule, pos) = scanner.decide(&ROOT_PRIORITY, &board, Stone::Black).unwrap();
        assert_eq!(rule, Decision::BlockWin);
        assert!(pos == Pos::new(2, 10) || pos == Pos::new(7, 10));

        // Quiet position: nothing fires
        let board = setup_board(&[(7, 7, Stone::White)]);
        assert_eq!(scanner.decide(&ROOT_PRIORITY, &board, Stone::Black), None);
    }

    #[test]
    fn test_block_open_four_takes_threat_cell() {
        // White threatens _WWW_ -> open four at 3 or 7
        let board = setup_board(&row(&[4, 5, 6], 7, Stone::White));
        let hazards = HazardMap::new();
        let estimate = HazardEstimate::uniform();
        let scanner = ThreatScanner::new(&hazards, &estimate);
        let (rule, pos) = scanner.decide(&ROOT_PRIORITY, &board, Stone::Black).unwrap();
        assert_eq!(rule, Decision::BlockOpenFour);
        assert_eq!(pos, Pos::new(3, 7));
    }

    #[test]
    fn test_block_skips_cells_forbidden_for_defender() {
        // White's completion cell (7,7) is a double-three point for black
        let mut setup = row(&[3, 4, 5, 6], 7, Stone::White);
        setup.push((2, 7, Stone::Black));
        setup.extend([
            (7, 5, Stone::Black),
            (7, 6, Stone::Black),
            (8, 8, Stone::Black),
            (9, 9, Stone::Black),
        ]);
        let board = setup_board(&setup);
        assert!(is_forbidden_move(&board, Pos::new(7, 7), Stone::Black));

        let hazards = HazardMap::new();
        let estimate = HazardEstimate::uniform();
        let scanner = ThreatScanner::new(&hazards, &estimate);
        assert_eq!(scanner.block_win(&board, Stone::Black), None);
        assert_eq!(scanner.block_win(&board, Stone::White), None);
        assert_eq!(
            Decision::BlockWin.select(&scanner, &board, Stone::Black),
            None
        );
    }

    #[test]
    fn test_block_open_three_picks_flank() {
        // White pair on row 7; black has nothing
        let board = setup_board(&row(&[6, 7], 7, Stone::White));
        let hazards = HazardMap::new();
        let estimate = HazardEstimate::uniform();
        let scanner = ThreatScanner::new(&hazards, &estimate);

        let flanks = scanner.open_three_flanks(&board, Stone::White);
        // Threat at 5 -> three 5..=7 with flanks 4 and 8; threat at 8 -> flanks 5 and 9
        assert_eq!(
            flanks,
            vec![Pos::new(4, 7), Pos::new(8, 7), Pos::new(5, 7), Pos::new(9, 7)]
        );

        let pick = scanner.block_open_three(&board, Stone::Black);
        // Equal heuristics, so the center bonus decides: (8,7) is closest
        assert_eq!(pick, Some(Pos::new(8, 7)));
        let (rule, pos) = scanner.decide(&ROOT_PRIORITY, &board, Stone::Black).unwrap();
        assert_eq!(rule, Decision::BlockOpenThree);
        assert_eq!(pos, Pos::new(8, 7));
    }

    #[test]
    fn test_own_open_four_when_nothing_to_block() {
        let board = setup_board(&row(&[5, 6, 7], 7, Stone::Black));
        let hazards = HazardMap::new();
        let estimate = HazardEstimate::uniform();
        let scanner = ThreatScanner::new(&hazards, &estimate);
        let (rule, pos) = scanner.decide(&ROOT_PRIORITY, &board, Stone::Black).unwrap();
        assert_eq!(rule, Decision::OpenFour);
        assert!(pos == Pos::new(4, 7) || pos == Pos::new(8, 7));
        assert!(!rule.is_defense());
        assert!(Decision::BlockFour.is_defense());
    }

    #[test]
    fn test_search_priority_is_subset() {
        for rule in SEARCH_PRIORITY {
            assert!(ROOT_PRIORITY.contains(&rule));
        }
        assert_eq!(SEARCH_PRIORITY[0], Decision::Win);
    }
}
