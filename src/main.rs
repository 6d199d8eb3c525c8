//! Mine gomoku engine CLI
//!
//! Runs the engine through a few fixed scenarios, then plays one seeded
//! self-play game on a random mine field.
//!
//! Usage: `mine_gomoku [SEED]`. `RUST_LOG=debug` shows engine decisions.

use std::env;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use mine_gomoku::search::ThreatScanner;
use mine_gomoku::{
    Board, Difficulty, Engine, EngineConfig, Game, HazardEstimate, HazardMap, Pos, Stone,
    BOARD_SIZE,
};

/// Mine density for the self-play game.
const SELF_PLAY_DENSITY: f64 = 0.12;

/// Move cap for the self-play game.
const SELF_PLAY_MAX_MOVES: usize = 80;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let seed = env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or(2024);

    println!("===========================================");
    println!("       Mine Gomoku Engine v0.1.0");
    println!("===========================================\n");

    let mut engine = Engine::with_config(EngineConfig {
        seed: Some(seed),
        time_limit_ms: 1000,
        ..EngineConfig::with_difficulty(Difficulty::Normal)
    });

    println!("--- Test 1: Empty Board ---");
    test_empty_board(&mut engine);

    println!("\n--- Test 2: Find Winning Move ---");
    test_winning_move(&mut engine);

    println!("\n--- Test 3: Block Open Four ---");
    test_block_open_four(&mut engine);

    println!("\n--- Test 4: Mine Next To Opponent ---");
    test_mine_blast(&mut engine);

    println!("\n--- Test 5: Self-Play (seed {seed}) ---");
    self_play(seed);

    println!("\n===========================================");
    println!("          All Tests Completed!");
    println!("===========================================");
}

fn test_empty_board(engine: &mut Engine) {
    let board = Board::new();
    let result = engine.get_move_with_stats(&board, &HazardMap::new(), Stone::Black);

    match result.best_move {
        Some(m) => {
            println!("  Black plays: {m}");
            println!("  Search type: {:?}, depth {}", result.search_type, result.depth);
            println!("  Time: {}ms, nodes: {}", result.time_ms, result.nodes);
            report(m.distance(Pos::center()) <= 3, "inside the central 7x7 window");
        }
        None => println!("  Result: FAIL - No move found"),
    }
}

fn test_winning_move(engine: &mut Engine) {
    let mut board = Board::new();
    for x in 3..7 {
        board.place_stone(Pos::new(x, 5), Stone::Black);
    }
    board.place_stone(Pos::new(2, 5), Stone::White);

    let result = engine.get_move_with_stats(&board, &HazardMap::new(), Stone::Black);
    println!("  Position: Black has 4 on row 5, capped on the left");
    match result.best_move {
        Some(m) => {
            println!("  Black plays: {m} ({:?})", result.search_type);
            report(m == Pos::new(7, 5), "completes five at (7, 5)");
        }
        None => println!("  Result: FAIL - No move found"),
    }
}

fn test_block_open_four(engine: &mut Engine) {
    let mut board = Board::new();
    for x in 5..9 {
        board.place_stone(Pos::new(x, 9), Stone::White);
    }
    board.place_stone(Pos::new(7, 7), Stone::Black);

    let hazards = HazardMap::new();
    let estimate = HazardEstimate::from_map(&hazards);
    let threats = ThreatScanner::new(&hazards, &estimate).scan(&board, Stone::White);
    println!("  Position: White has an open four on row 9");
    for threat in &threats {
        println!("  White threat: {} {:?}", threat.pos, threat.kind);
    }

    let result = engine.get_move_with_stats(&board, &hazards, Stone::Black);
    match result.best_move {
        Some(m) => {
            println!("  Black plays: {m} ({:?})", result.search_type);
            report(m == Pos::new(4, 9) || m == Pos::new(9, 9), "takes a flank");
        }
        None => println!("  Result: FAIL - No move found"),
    }
}

fn test_mine_blast(engine: &mut Engine) {
    let mut board = Board::new();
    for &(x, y) in &[(6, 6), (8, 6), (6, 8), (8, 8)] {
        board.place_stone(Pos::new(x, y), Stone::Black);
    }
    board.place_stone(Pos::new(3, 3), Stone::White);
    let hazards = HazardMap::with_hazards([(7, 7)]);

    print_board(&board, Some(&hazards));
    let result = engine.get_move_with_stats(&board, &hazards, Stone::White);
    match result.best_move {
        Some(m) => println!(
            "  White plays: {m} ({:?}, score {})",
            result.search_type, result.score
        ),
        None => println!("  Result: FAIL - No move found"),
    }
}

fn self_play(seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut game = match Game::with_density(SELF_PLAY_DENSITY, &mut rng) {
        Ok(game) => game,
        Err(err) => {
            println!("  Result: FAIL - {err}");
            return;
        }
    };
    println!("  Mines: {}", game.hazards().hazard_count());

    let mut engine = Engine::with_config(EngineConfig {
        seed: Some(seed),
        time_limit_ms: 300,
        ..EngineConfig::with_difficulty(Difficulty::Easy)
    });

    while !game.is_over() && game.moves().len() < SELF_PLAY_MAX_MOVES {
        let color = game.to_move();
        let Some(pos) = engine.get_next_move(game.board(), game.hazards(), color) else {
            println!("  {color:?} has no move, stopping");
            break;
        };
        match game.play(i32::from(pos.x), i32::from(pos.y)) {
            Ok(outcome) if outcome.exploded() => {
                let removed = outcome.removed.map_or(0, |c| c.len());
                println!("  {color:?} {pos}: mine! {removed} stone(s) removed");
            }
            Ok(_) => {}
            Err(err) => {
                println!("  {color:?} {pos}: rejected, {err}");
                break;
            }
        }
    }

    print_board(game.board(), None);
    let (black, white) = game.win_probabilities();
    println!("  Moves played: {}", game.moves().len());
    println!("  Winner: {:?}", game.winner());
    println!("  Win probability: black {black:.3}, white {white:.3}");
}

fn report(ok: bool, expected: &str) {
    if ok {
        println!("  Result: PASS - {expected}");
    } else {
        println!("  Result: DIFFERENT - expected {expected}");
    }
}

/// Print the board; with hazards, empty cells touching a mine show as `*`.
fn print_board(board: &Board, hazards: Option<&HazardMap>) {
    print!("     ");
    for x in 0..BOARD_SIZE {
        print!("{x:>2} ");
    }
    println!();

    for y in 0..BOARD_SIZE {
        print!("  {y:>2} ");
        for x in 0..BOARD_SIZE {
            #[allow(clippy::cast_possible_truncation)]
            let pos = Pos::new(x as u8, y as u8);
            let c = match board.get(pos) {
                Stone::Black => 'X',
                Stone::White => 'O',
                Stone::Empty if hazards.is_some_and(|h| h.triggers_at(pos)) => '*',
                Stone::Empty => '.',
            };
            print!(" {c} ");
        }
        println!();
    }
}
