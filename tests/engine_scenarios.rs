//! End-to-end engine scenarios through the public API.

use rand::rngs::StdRng;
use rand::SeedableRng;

use mine_gomoku::hazard::HazardEstimate;
use mine_gomoku::{
    assess_move, calculate_win_probability, evaluate_board, get_next_move, is_forbidden_move,
    Board, Engine, EngineConfig, Game, HazardMap, LockoutPolicy, Pos, SearchType, Stone,
};

fn engine(seed: u64) -> Engine {
    Engine::with_config(EngineConfig {
        max_depth: 2,
        time_limit_ms: 1000,
        seed: Some(seed),
        ..EngineConfig::default()
    })
}

fn setup_board(setup: &[(u8, u8, Stone)]) -> Board {
    let mut board = Board::new();
    for &(x, y, s) in setup {
        board.place_stone(Pos::new(x, y), s);
    }
    board
}

#[test]
fn first_move_is_inside_central_window() {
    for seed in 0..4 {
        let pos = engine(seed)
            .get_next_move(&Board::new(), &HazardMap::new(), Stone::Black)
            .unwrap();
        assert!((4..=10).contains(&pos.x), "{pos}");
        assert!((4..=10).contains(&pos.y), "{pos}");
    }
}

#[test]
fn defender_takes_a_flank_of_an_open_four() {
    let board = setup_board(&[
        (5, 9, Stone::White),
        (6, 9, Stone::White),
        (7, 9, Stone::White),
        (8, 9, Stone::White),
        (7, 7, Stone::Black),
        (6, 6, Stone::Black),
        (12, 3, Stone::Black),
    ]);
    let result = engine(1).get_move_with_stats(&board, &HazardMap::new(), Stone::Black);
    let pos = result.best_move.unwrap();
    assert!(pos == Pos::new(4, 9) || pos == Pos::new(9, 9), "{pos}");
    assert_eq!(result.search_type, SearchType::Defense);
}

#[test]
fn own_win_beats_defense() {
    let board = setup_board(&[
        (2, 2, Stone::White),
        (3, 3, Stone::White),
        (4, 4, Stone::White),
        (5, 5, Stone::White),
        (10, 1, Stone::Black),
        (10, 2, Stone::Black),
        (10, 3, Stone::Black),
        (10, 4, Stone::Black),
    ]);
    let pos = get_next_move(&board, &HazardMap::new(), Stone::White).unwrap();
    assert!(pos == Pos::new(1, 1) || pos == Pos::new(6, 6), "{pos}");
}

#[test]
fn winning_cell_on_a_mine_is_not_taken_as_a_win() {
    // Both completions of white's four set off a mine
    let board = setup_board(&[
        (4, 7, Stone::White),
        (5, 7, Stone::White),
        (6, 7, Stone::White),
        (7, 7, Stone::White),
        (2, 2, Stone::Black),
    ]);
    let hazards = HazardMap::with_hazards([(3, 7), (8, 7)]);
    let result = engine(3).get_move_with_stats(&board, &hazards, Stone::White);
    assert_ne!(result.search_type, SearchType::ImmediateWin);
}

#[test]
fn black_is_never_offered_a_forbidden_point() {
    let board = setup_board(&[
        (5, 7, Stone::Black),
        (6, 7, Stone::Black),
        (7, 5, Stone::Black),
        (7, 6, Stone::Black),
        (10, 10, Stone::White),
        (11, 12, Stone::White),
    ]);
    assert!(is_forbidden_move(&board, Pos::new(7, 7), Stone::Black));
    assert!(!is_forbidden_move(&board, Pos::new(7, 7), Stone::White));
    for seed in 0..3 {
        let pos = engine(seed)
            .get_next_move(&board, &HazardMap::new(), Stone::Black)
            .unwrap();
        assert!(!is_forbidden_move(&board, pos, Stone::Black), "{pos}");
    }
}

#[test]
fn queries_do_not_mutate_inputs() {
    let board = setup_board(&[(7, 7, Stone::Black), (8, 8, Stone::White), (6, 8, Stone::Black)]);
    let hazards = HazardMap::with_hazards([(7, 8), (6, 6), (9, 9)]);
    let (board_before, hazards_before) = (board, hazards.clone());

    let _ = engine(9).get_next_move(&board, &hazards, Stone::White);
    let _ = is_forbidden_move(&board, Pos::new(5, 5), Stone::Black);
    let _ = evaluate_board(&board, &hazards, Stone::Black);
    let _ = assess_move(&board, &hazards, &HazardEstimate::from_map(&hazards), Pos::new(7, 9), Stone::White);

    assert_eq!(board, board_before);
    assert_eq!(hazards, hazards_before);
}

#[test]
fn win_probability_tracks_evaluation() {
    let hazards = HazardMap::new();
    let even = calculate_win_probability(&Board::new(), &hazards, Stone::Black);
    assert!((even - 0.5).abs() < 1e-12);

    let ahead = setup_board(&[(6, 7, Stone::Black), (7, 7, Stone::Black), (8, 7, Stone::Black)]);
    let p_black = calculate_win_probability(&ahead, &hazards, Stone::Black);
    let p_white = calculate_win_probability(&ahead, &hazards, Stone::White);
    assert!(p_black > 0.5 && p_white < 0.5);
}

#[test]
fn pass_policy_returns_no_move_on_full_board() {
    let mut board = Board::new();
    for idx in 0..225 {
        board.place_stone(Pos::from_index(idx), Stone::White);
    }
    let mut engine = Engine::with_config(EngineConfig {
        lockout: LockoutPolicy::Pass,
        seed: Some(0),
        ..EngineConfig::default()
    });
    assert_eq!(engine.get_next_move(&board, &HazardMap::new(), Stone::Black), None);
}

#[test]
fn lockout_policy_decides_when_black_has_only_an_overline() {
    // No five anywhere; row 0 reads B B _ B B B W
    let mut board = Board::new();
    for idx in 0..225 {
        let pos = Pos::from_index(idx);
        let color = if (pos.x + 2 * pos.y) % 4 < 2 { Stone::Black } else { Stone::White };
        board.place_stone(pos, color);
    }
    board.remove_stone(Pos::new(3, 0));
    board.place_stone(Pos::new(3, 0), Stone::Black);
    board.remove_stone(Pos::new(2, 0));

    let cell = Pos::new(2, 0);
    assert!(board.is_empty(cell));
    assert!(is_forbidden_move(&board, cell, Stone::Black));

    let hazards = HazardMap::new();
    let mut allow = Engine::with_config(EngineConfig {
        lockout: LockoutPolicy::AllowForbidden,
        seed: Some(0),
        ..EngineConfig::default()
    });
    assert_eq!(allow.get_next_move(&board, &hazards, Stone::Black), Some(cell));

    let mut pass = Engine::with_config(EngineConfig {
        lockout: LockoutPolicy::Pass,
        seed: Some(0),
        ..EngineConfig::default()
    });
    assert_eq!(pass.get_next_move(&board, &hazards, Stone::Black), None);
    assert_eq!(pass.get_next_move(&board, &hazards, Stone::White), Some(cell));
}

#[test]
fn seeded_self_play_is_reproducible_and_legal() {
    let run = |seed: u64| {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut game = Game::with_density(0.1, &mut rng).unwrap();
        let mut engine = Engine::with_config(EngineConfig {
            max_depth: 1,
            seed: Some(seed),
            ..EngineConfig::default()
        });
        for _ in 0..16 {
            if game.is_over() {
                break;
            }
            let color = game.to_move();
            let pos = engine
                .get_next_move(game.board(), game.hazards(), color)
                .unwrap();
            game.play(i32::from(pos.x), i32::from(pos.y)).unwrap();
        }
        game.moves().to_vec()
    };

    let a = run(11);
    let b = run(11);
    assert_eq!(a, b);
    assert!(!a.is_empty());
}
