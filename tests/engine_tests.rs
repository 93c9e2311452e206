//! End-to-end engine tests: locking, scoring, spawning and level flow.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use tpills::game::{Board, Cell, Color, Game, GameEvent, Orientation, Phase, Pill};
use tpills::{EngineConfig, InputEvent, ResolveMode};

fn loose(color: Color) -> Cell {
    Cell::Pill { color, pair: None }
}

fn paired(color: Color, id: u32) -> Cell {
    Cell::Pill { color, pair: Some(id) }
}

fn pill(x: i32, y: i32, color1: Color, color2: Color, orientation: Orientation) -> Pill {
    Pill {
        x,
        y,
        color1,
        color2,
        orientation,
    }
}

fn game_with(config: EngineConfig, board: Board) -> Game {
    Game::with_board(config, board, StdRng::seed_from_u64(17))
}

/// Reds at (2,5)-(3,5) from an earlier pill, resting on non-matching viruses.
fn half_built_red_row() -> Board {
    let mut board = Board::new();
    board.set(0, 15, Cell::Virus(Color::Yellow));
    board.set(2, 5, paired(Color::Red, 1));
    board.set(3, 5, paired(Color::Red, 1));
    board.set(2, 6, Cell::Virus(Color::Blue));
    board.set(3, 6, Cell::Virus(Color::Blue));
    board.set(4, 6, Cell::Virus(Color::Yellow));
    board.set(5, 6, Cell::Virus(Color::Yellow));
    board
}

#[test]
fn horizontal_run_of_four_reds_scores_400() {
    let mut game = game_with(EngineConfig::default(), half_built_red_row());
    assert!(game.set_active(pill(4, 5, Color::Red, Color::Red, Orientation::Right)));

    assert!(!game.drop_pill());

    for x in 2..6 {
        assert!(game.board().is_empty(x, 5), "cell ({x}, 5) should be cleared");
    }
    assert_eq!(game.score(), 400);
    assert_eq!(game.virus_count(), 5);
    assert_eq!(game.virus_count(), game.board().virus_count());

    game.resolve_now();
    assert_eq!(game.score(), 400);
    assert_eq!(game.phase(), Phase::Falling);
    assert!(game.active().is_some());
}

#[test]
fn vertical_pill_completes_row_and_orphan_half_falls() {
    let mut board = half_built_red_row();
    board.set(4, 5, loose(Color::Red));
    let mut game = game_with(EngineConfig::default(), board);
    // Bottom half lands at (5,5) and finishes the red row; the top half is left behind.
    assert!(game.set_active(pill(5, 4, Color::Blue, Color::Red, Orientation::Down)));
    assert!(!game.drop_pill());

    assert_eq!(game.score(), 400);
    // The orphan takes its first gravity step together with the removal.
    assert_eq!(game.board().get(5, 5), Some(loose(Color::Blue)));

    game.resolve_now();
    assert!(game.board().is_empty(5, 4));
    assert_eq!(game.board().get(5, 5), Some(loose(Color::Blue)));
}

#[test]
fn run_of_three_is_not_removed() {
    let mut board = Board::new();
    board.set(0, 15, Cell::Virus(Color::Yellow));
    board.set(2, 15, Cell::Virus(Color::Red));
    let mut game = game_with(EngineConfig::default(), board);
    assert!(game.set_active(pill(3, 15, Color::Red, Color::Red, Orientation::Right)));

    game.drop_pill();

    assert_eq!(game.score(), 0);
    assert_eq!(game.board().get(2, 15), Some(Cell::Virus(Color::Red)));
    assert_eq!(game.board().get(3, 15), Some(paired(Color::Red, 1)));
    assert_eq!(game.board().get(4, 15), Some(paired(Color::Red, 1)));
    assert_eq!(game.phase(), Phase::Falling);
}

#[test]
fn blocked_spawn_ends_the_game() {
    for x in [3, 4] {
        let mut board = Board::new();
        board.set(x, 0, Cell::Virus(Color::Blue));
        let game = game_with(EngineConfig::default(), board);
        assert!(!game.is_running(), "spawn over ({x}, 0) should end the game");
        assert!(!game.snapshot().running);
        assert_eq!(game.phase(), Phase::GameOver);
    }
}

#[test]
fn locking_at_the_top_ends_the_game_on_next_spawn() {
    let mut board = Board::new();
    board.set(3, 1, Cell::Virus(Color::Blue));
    board.set(4, 1, Cell::Virus(Color::Yellow));
    let mut game = game_with(EngineConfig::default(), board);
    assert!(game.is_running());

    game.drop_pill();

    assert!(!game.is_running());
    let events = game.drain_events();
    assert!(events.iter().any(|e| matches!(e, GameEvent::GameOver { .. })));

    // Terminal: nothing changes any more.
    let before = game.snapshot();
    game.handle_input(InputEvent::MoveLeft);
    game.handle_input(InputEvent::TogglePause);
    game.tick(Duration::from_secs(10));
    assert_eq!(game.snapshot(), before);
}

fn last_virus_board() -> Board {
    let mut board = Board::new();
    board.set(0, 15, loose(Color::Red));
    board.set(1, 15, loose(Color::Red));
    board.set(2, 15, loose(Color::Red));
    board.set(3, 15, Cell::Virus(Color::Red));
    board
}

#[test]
fn clearing_last_virus_advances_the_level() {
    let mut game = game_with(EngineConfig::default(), last_virus_board());
    assert_eq!(game.level(), 1);
    assert!(game.set_active(pill(3, 13, Color::Yellow, Color::Blue, Orientation::Down)));

    game.drop_pill();

    assert_eq!(game.virus_count(), 0);
    assert_eq!(game.level(), 2);
    assert_eq!(game.drop_interval(), Duration::from_millis(550));
    assert_eq!(game.score(), 400 + 2000);
    assert_eq!(game.phase(), Phase::LevelComplete);

    game.tick(Duration::from_millis(999));
    assert_eq!(game.phase(), Phase::LevelComplete);
    game.tick(Duration::from_millis(1));
    assert_eq!(game.phase(), Phase::Falling);
    assert_eq!(game.virus_count(), 12);
    assert_eq!(game.board().virus_count(), 12);
    assert!(game.active().is_some());
}

#[test]
fn drop_interval_is_clamped_at_minimum() {
    let config = EngineConfig {
        initial_drop_interval: Duration::from_millis(120),
        ..EngineConfig::default()
    };
    let mut game = game_with(config, last_virus_board());
    assert!(game.set_active(pill(3, 13, Color::Yellow, Color::Blue, Orientation::Down)));
    game.drop_pill();
    assert_eq!(game.level(), 2);
    assert_eq!(game.drop_interval(), Duration::from_millis(100));
}

#[test]
fn rotation_kicks_are_deterministic() {
    let mut board = Board::new();
    board.set(0, 15, Cell::Virus(Color::Yellow));
    // Walls on both sides of column 3 leave only vertical room there.
    for y in 5..9 {
        board.set(2, y, Cell::Virus(Color::Blue));
        board.set(4, y, Cell::Virus(Color::Blue));
    }
    let start = pill(3, 6, Color::Red, Color::Yellow, Orientation::Down);

    let mut results = Vec::new();
    for _ in 0..3 {
        let mut game = game_with(EngineConfig::default(), board);
        assert!(game.set_active(start));
        game.rotate_pill();
        results.push(*game.active().unwrap());
    }
    assert!(results.windows(2).all(|w| w[0] == w[1]));
    // Every kick lands on one of the wall cells.
    assert_eq!(results[0], start);
}

#[test]
fn immediate_mode_spawns_next_pill_within_the_lock() {
    let config = EngineConfig {
        resolve_mode: ResolveMode::Immediate,
        ..EngineConfig::default()
    };
    let mut game = game_with(config, half_built_red_row());
    assert!(game.set_active(pill(4, 5, Color::Red, Color::Red, Orientation::Right)));
    game.drop_pill();
    assert_eq!(game.score(), 400);
    assert_eq!(game.phase(), Phase::Falling);
    assert_eq!(game.active().map(Pill::positions), Some([(3, 0), (4, 0)]));
}

#[test]
fn restart_resets_progress() {
    let mut game = Game::new(EngineConfig {
        seed: Some(8),
        ..EngineConfig::default()
    });
    game.handle_input(InputEvent::SoftDropStart);
    for _ in 0..200 {
        game.tick(Duration::from_millis(50));
    }
    game.restart();
    assert_eq!(game.level(), 1);
    assert_eq!(game.score(), 0);
    assert_eq!(game.virus_count(), 8);
    assert!(game.is_running());
    assert!(!game.is_paused());
}

#[test]
fn same_seed_same_game() {
    let config = EngineConfig {
        seed: Some(1234),
        ..EngineConfig::default()
    };
    let a = Game::new(config.clone());
    let b = Game::new(config);
    assert_eq!(a.snapshot(), b.snapshot());
}
