//! Cascade tests: staggered timing, chains and pausing mid-cascade.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use tpills::game::{Board, Cell, Color, Game, GameEvent, Orientation, Phase, Pill};
use tpills::{EngineConfig, InputEvent, ResolveMode};

fn loose(color: Color) -> Cell {
    Cell::Pill { color, pair: None }
}

/// Locking a red/blue pill at (3,12)-(4,12) clears the red column below it;
/// the orphaned blue half then falls to (4,15) and completes a blue row.
fn chain_board() -> Board {
    let mut board = Board::new();
    board.set(0, 8, Cell::Virus(Color::Yellow));
    for y in 13..16 {
        board.set(3, y, loose(Color::Red));
    }
    for x in 5..8 {
        board.set(x, 15, Cell::Virus(Color::Blue));
    }
    board
}

fn chain_pill() -> Pill {
    Pill {
        x: 3,
        y: 12,
        color1: Color::Red,
        color2: Color::Blue,
        orientation: Orientation::Right,
    }
}

fn locked_chain_game(config: EngineConfig) -> Game {
    let mut game = Game::with_board(config, chain_board(), StdRng::seed_from_u64(3));
    assert!(game.set_active(chain_pill()));
    game.drop_pill();
    game
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

#[test]
fn staggered_cascade_follows_step_and_recheck_delays() {
    let mut game = locked_chain_game(EngineConfig::default());
    assert_eq!(game.phase(), Phase::Resolving);
    assert_eq!(game.score(), 400);
    // First gravity step lands with the removal.
    assert!(game.board().is_empty(4, 12));
    assert_eq!(game.board().get(4, 13), Some(loose(Color::Blue)));

    game.tick(ms(99));
    assert_eq!(game.board().get(4, 13), Some(loose(Color::Blue)));

    game.tick(ms(1));
    assert_eq!(game.board().get(4, 14), Some(loose(Color::Blue)));

    game.tick(ms(100));
    assert_eq!(game.board().get(4, 15), Some(loose(Color::Blue)));
    assert_eq!(game.score(), 400);

    // Settled at 300 ms, which is also the recheck delay.
    game.tick(ms(99));
    assert_eq!(game.score(), 400);
    game.tick(ms(1));
    assert_eq!(game.score(), 800);
    for x in 4..8 {
        assert!(game.board().is_empty(x, 15));
    }
    assert_eq!(game.virus_count(), 1);
    assert_eq!(game.phase(), Phase::Resolving);

    // Nothing left to fall; the second recheck still waits 300 ms.
    game.tick(ms(299));
    assert_eq!(game.phase(), Phase::Resolving);
    game.tick(ms(1));
    assert_eq!(game.phase(), Phase::Falling);
    assert!(game.active().is_some());
}

#[test]
fn chain_events_count_links() {
    let mut game = locked_chain_game(EngineConfig {
        resolve_mode: ResolveMode::Immediate,
        ..EngineConfig::default()
    });
    let chains: Vec<u32> = game
        .drain_events()
        .into_iter()
        .filter_map(|event| match event {
            GameEvent::Cleared { chain, .. } => Some(chain),
            _ => None,
        })
        .collect();
    assert_eq!(chains, vec![1, 2]);
}

#[test]
fn immediate_cascade_matches_staggered_outcome() {
    let mut staggered = locked_chain_game(EngineConfig::default());
    for _ in 0..20 {
        staggered.tick(ms(100));
        if staggered.phase() == Phase::Falling {
            break;
        }
    }

    let immediate = locked_chain_game(EngineConfig {
        resolve_mode: ResolveMode::Immediate,
        ..EngineConfig::default()
    });

    assert_eq!(staggered.board(), immediate.board());
    assert_eq!(staggered.score(), immediate.score());
    assert_eq!(immediate.score(), 800);
}

#[test]
fn pausing_mid_cascade_finishes_it_first() {
    let mut game = locked_chain_game(EngineConfig::default());
    game.tick(ms(100));
    game.handle_input(InputEvent::TogglePause);

    assert!(game.is_paused());
    assert_eq!(game.score(), 800);
    assert_eq!(game.phase(), Phase::Falling);

    let frozen = game.snapshot();
    game.tick(ms(5000));
    assert_eq!(game.snapshot(), frozen);
}

#[test]
fn resolve_now_reports_the_cascade() {
    let mut game = locked_chain_game(EngineConfig::default());
    let report = game.resolve_now();
    assert_eq!(report.passes, 1);
    assert_eq!(report.cells_removed, 4);
    // The first of the three steps already ran with the removal at lock.
    assert_eq!(report.gravity_steps, 2);
}

#[test]
fn bonded_pair_is_held_by_either_half() {
    let mut board = Board::new();
    board.set(0, 15, Cell::Virus(Color::Yellow));
    // Pair 1 rests on a blue cell that is about to be cleared.
    board.set(5, 10, Cell::Pill { color: Color::Red, pair: Some(1) });
    board.set(6, 10, Cell::Pill { color: Color::Yellow, pair: Some(1) });
    board.set(5, 11, loose(Color::Blue));
    board.set(5, 12, loose(Color::Blue));
    board.set(5, 13, loose(Color::Blue));
    board.set(6, 11, Cell::Virus(Color::Red));
    board.set(5, 15, Cell::Virus(Color::Yellow));
    board.set(6, 15, Cell::Virus(Color::Yellow));

    let mut game = Game::with_board(EngineConfig::default(), board, StdRng::seed_from_u64(9));
    assert!(game.set_active(Pill {
        x: 5,
        y: 14,
        color1: Color::Blue,
        color2: Color::Red,
        orientation: Orientation::Right,
    }));
    assert!(!game.drop_pill());
    assert!(game.board().is_empty(5, 11));
    assert_eq!(game.board().get(6, 14), Some(loose(Color::Red)));

    // The virus under the yellow half keeps the whole pair in place.
    for _ in 0..5 {
        game.tick(ms(100));
        assert_eq!(game.board().cells_with_pair(1), vec![(5, 10), (6, 10)]);
    }
}
