use std::collections::VecDeque;
use std::time::Duration;

use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::EngineConfig;
use crate::constants::{LEVEL_BONUS, MAX_PENDING_EVENTS, POINTS_PER_CELL};
use crate::game::board::{Board, Cell, Color, PairId};
use crate::game::gravity::{settle, settle_step};
use crate::game::matcher::{remove_matches, Removal};
use crate::game::pill::{NextPill, Pill};
use crate::game::snapshot::Snapshot;
use crate::game::viruses::generate_viruses;
use crate::input::event::{HeldKeys, InputEvent};

/// Offsets tried, in order, when a rotation is blocked in place.
pub const KICKS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, -1),
    (0, 1),
];

#[derive(Clone, Copy, PartialEq, Eq, Debug, derive_more::IsVariant)]
pub enum Phase {
    /// A pill is under player control.
    Falling,
    /// A locked pill triggered matches that are still cascading.
    Resolving,
    /// All viruses are gone; the next level starts after a delay.
    LevelComplete,
    GameOver,
}

/// Notifications for display sinks, drained with [`Game::drain_events`].
/// Only the most recent [`MAX_PENDING_EVENTS`] undrained events are kept.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameEvent {
    PillLocked { pair: Option<PairId> },
    Cleared { cells: usize, viruses: usize, chain: u32 },
    ScoreChanged(u32),
    LevelChanged(u32),
    VirusCountChanged(usize),
    LevelComplete { level: u32 },
    GameOver { score: u32 },
}

/// Totals for a cascade finished with [`Game::resolve_now`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct CascadeReport {
    pub passes: u32,
    pub cells_removed: usize,
    pub gravity_steps: usize,
}

// Timers of a staggered cascade, measured from the last removal.
#[derive(Clone, Copy, Debug, Default)]
struct Cascade {
    since_removal: Duration,
    since_step: Duration,
    settled: bool,
    chain: u32,
}

pub struct Game<R = StdRng> {
    config: EngineConfig,
    rng: R,
    board: Board,
    active: Option<Pill>,
    next: NextPill,
    phase: Phase,
    paused: bool,
    level: u32,
    score: u32,
    virus_count: usize,
    drop_interval: Duration,
    drop_timer: Duration,
    fast_drop_timer: Duration,
    level_timer: Duration,
    cascade: Cascade,
    held: HeldKeys,
    next_pair_id: PairId,
    events: VecDeque<GameEvent>,
}

impl Game<StdRng> {
    /// Creates a game seeded from `config.seed`, or from entropy when unset.
    pub fn new(config: EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> Game<R> {
    pub fn with_rng(config: EngineConfig, rng: R) -> Self {
        let mut game = Self::blank(config, rng);
        game.restart();
        game
    }

    /// Starts play on a prepared board instead of a generated one.
    pub fn with_board(config: EngineConfig, board: Board, rng: R) -> Self {
        let mut game = Self::blank(config, rng);
        game.board = board;
        game.virus_count = board.virus_count();
        game.next_pair_id = board.max_pair_id().map_or(1, |id| id + 1);
        game.next = NextPill::random(&mut game.rng);
        game.spawn_pill();
        game
    }

    fn blank(config: EngineConfig, rng: R) -> Self {
        let level = config.start_level.max(1);
        let drop_interval = Self::drop_interval_for(&config, level);
        Self {
            config,
            rng,
            board: Board::new(),
            active: None,
            next: NextPill {
                color1: Color::Red,
                color2: Color::Red,
            },
            phase: Phase::Falling,
            paused: false,
            level,
            score: 0,
            virus_count: 0,
            drop_interval,
            drop_timer: Duration::ZERO,
            fast_drop_timer: Duration::ZERO,
            level_timer: Duration::ZERO,
            cascade: Cascade::default(),
            held: HeldKeys::default(),
            next_pair_id: 1,
            events: VecDeque::new(),
        }
    }

    fn drop_interval_for(config: &EngineConfig, level: u32) -> Duration {
        let reduction = config.drop_interval_step * level.saturating_sub(1);
        config
            .initial_drop_interval
            .saturating_sub(reduction)
            .max(config.min_drop_interval)
    }

    /// Resets score, level and board, then starts a fresh first level.
    pub fn restart(&mut self) {
        self.level = self.config.start_level.max(1);
        self.score = 0;
        self.drop_interval = Self::drop_interval_for(&self.config, self.level);
        self.paused = false;
        self.held = HeldKeys::default();
        self.next_pair_id = 1;
        self.cascade = Cascade::default();
        self.next = NextPill::random(&mut self.rng);
        self.start_level();
    }

    fn start_level(&mut self) {
        self.board.clear();
        self.active = None;
        self.virus_count = generate_viruses(&mut self.board, self.level, &mut self.rng);
        self.drop_timer = Duration::ZERO;
        self.fast_drop_timer = Duration::ZERO;
        self.level_timer = Duration::ZERO;
        debug!("level {} seeded with {} viruses", self.level, self.virus_count);
        self.emit(GameEvent::VirusCountChanged(self.virus_count));
        self.spawn_pill();
    }

    /// Promotes the queued pill. A blocked spawn ends the game.
    pub fn spawn_pill(&mut self) -> bool {
        let pill = Pill::spawn(self.next);
        self.next = NextPill::random(&mut self.rng);

        if !self.is_valid_position(&pill) {
            self.active = None;
            self.game_over();
            return false;
        }

        debug!("spawned {:?}/{:?}", pill.color1, pill.color2);
        self.active = Some(pill);
        self.phase = Phase::Falling;
        true
    }

    fn game_over(&mut self) {
        info!("game over at level {} with score {}", self.level, self.score);
        self.phase = Phase::GameOver;
        self.emit(GameEvent::GameOver { score: self.score });
    }

    pub fn is_valid_position(&self, pill: &Pill) -> bool {
        pill.positions()
            .iter()
            .all(|&(x, y)| self.board.is_empty(x, y))
    }

    fn can_control(&self) -> bool {
        !self.paused && self.phase == Phase::Falling && self.active.is_some()
    }

    pub fn move_pill(&mut self, dx: i32, dy: i32) -> bool {
        if !self.can_control() {
            return false;
        }
        let Some(pill) = self.active else {
            return false;
        };

        let candidate = pill.translated(dx, dy);
        if self.is_valid_position(&candidate) {
            self.active = Some(candidate);
            return true;
        }
        false
    }

    pub fn rotate_pill(&mut self) -> bool {
        if !self.can_control() {
            return false;
        }
        let Some(pill) = self.active else {
            return false;
        };

        let rotated = pill.rotated();
        if self.is_valid_position(&rotated) {
            self.active = Some(rotated);
            return true;
        }

        for (dx, dy) in KICKS {
            let kicked = rotated.translated(dx, dy);
            if self.is_valid_position(&kicked) {
                trace!("rotation kicked by ({dx}, {dy})");
                self.active = Some(kicked);
                return true;
            }
        }
        false
    }

    /// Moves the pill down one row, locking it when it cannot move.
    /// Returns `true` only if the pill moved.
    pub fn drop_pill(&mut self) -> bool {
        if !self.can_control() {
            return false;
        }
        if self.move_pill(0, 1) {
            return true;
        }
        self.lock_pill();
        false
    }

    fn lock_pill(&mut self) {
        let Some(pill) = self.active.take() else {
            return;
        };

        let pair = if self.config.pairing_enabled {
            let id = self.next_pair_id;
            self.next_pair_id += 1;
            Some(id)
        } else {
            None
        };
        for ((x, y), color) in pill.cells() {
            self.board.set(x, y, Cell::Pill { color, pair });
        }
        debug!("locked pill at {:?} with pair {:?}", pill.positions(), pair);
        self.emit(GameEvent::PillLocked { pair });

        self.phase = Phase::Resolving;
        self.cascade = Cascade::default();
        self.resolve_lock();
    }

    // First match check right after locking.
    fn resolve_lock(&mut self) {
        let removal = self.removal_pass();
        if removal.is_empty() {
            self.finish_resolution();
            return;
        }
        if self.check_level_clear() {
            return;
        }
        if self.config.resolve_mode.is_immediate() {
            self.resolve_now();
        } else {
            self.start_cascade();
        }
    }

    // Restarts the staggered timers after a removal. The first gravity step
    // lands together with the removal.
    fn start_cascade(&mut self) {
        self.cascade = Cascade {
            chain: self.cascade.chain,
            ..Cascade::default()
        };
        self.cascade.settled = settle_step(&mut self.board) == 0;
    }

    fn removal_pass(&mut self) -> Removal {
        let removal = remove_matches(&mut self.board);
        if removal.is_empty() {
            return removal;
        }

        self.cascade.chain += 1;
        self.score += POINTS_PER_CELL * removal.cells.len() as u32;
        self.virus_count -= removal.viruses;
        debug_assert_eq!(self.virus_count, self.board.virus_count());
        debug!(
            "chain {} removed {} cells ({} viruses), broke pairs {:?}",
            self.cascade.chain,
            removal.cells.len(),
            removal.viruses,
            removal.broken_pairs
        );

        self.emit(GameEvent::Cleared {
            cells: removal.cells.len(),
            viruses: removal.viruses,
            chain: self.cascade.chain,
        });
        self.emit(GameEvent::ScoreChanged(self.score));
        if removal.viruses > 0 {
            self.emit(GameEvent::VirusCountChanged(self.virus_count));
        }
        removal
    }

    fn check_level_clear(&mut self) -> bool {
        if self.virus_count > 0 {
            return false;
        }

        self.level += 1;
        self.score += LEVEL_BONUS * self.level;
        self.drop_interval = self
            .drop_interval
            .saturating_sub(self.config.drop_interval_step)
            .max(self.config.min_drop_interval);
        self.phase = Phase::LevelComplete;
        self.level_timer = Duration::ZERO;
        self.held = HeldKeys::default();

        info!(
            "level complete, advancing to {} (drop interval {:?})",
            self.level, self.drop_interval
        );
        self.emit(GameEvent::LevelComplete { level: self.level });
        self.emit(GameEvent::LevelChanged(self.level));
        self.emit(GameEvent::ScoreChanged(self.score));
        true
    }

    fn finish_resolution(&mut self) {
        self.cascade = Cascade::default();
        self.drop_timer = Duration::ZERO;
        self.fast_drop_timer = Duration::ZERO;
        self.spawn_pill();
    }

    /// Plays any pending cascade to completion without waiting on timers.
    pub fn resolve_now(&mut self) -> CascadeReport {
        let mut report = CascadeReport::default();
        while self.phase == Phase::Resolving {
            report.gravity_steps += settle(&mut self.board);
            let removal = self.removal_pass();
            if removal.is_empty() {
                self.finish_resolution();
                break;
            }
            report.passes += 1;
            report.cells_removed += removal.cells.len();
            if self.check_level_clear() {
                break;
            }
        }
        report
    }

    /// Advances timers by `dt`. Frozen while paused or after game over.
    pub fn tick(&mut self, dt: Duration) {
        if self.paused {
            return;
        }
        match self.phase {
            Phase::Falling => self.tick_falling(dt),
            Phase::Resolving => self.tick_resolving(dt),
            Phase::LevelComplete => {
                self.level_timer += dt;
                if self.level_timer >= self.config.level_clear_delay {
                    self.start_level();
                }
            }
            Phase::GameOver => {}
        }
    }

    fn tick_falling(&mut self, dt: Duration) {
        if !self.config.edge_triggered_movement {
            if self.held.left {
                self.move_pill(-1, 0);
            }
            if self.held.right {
                self.move_pill(1, 0);
            }
        }

        if self.held.down {
            self.fast_drop_timer += dt;
            if self.fast_drop_timer >= self.config.soft_drop_interval {
                self.fast_drop_timer = Duration::ZERO;
                self.drop_pill();
            }
        } else {
            self.drop_timer += dt;
            if self.drop_timer >= self.drop_interval {
                self.drop_timer = Duration::ZERO;
                self.drop_pill();
            }
        }
    }

    fn tick_resolving(&mut self, dt: Duration) {
        let step_delay = self.config.gravity_step_delay;
        self.cascade.since_removal += dt;

        if !self.cascade.settled {
            self.cascade.since_step += dt;
            while self.cascade.since_step >= step_delay {
                self.cascade.since_step -= step_delay;
                if settle_step(&mut self.board) == 0 {
                    self.cascade.settled = true;
                    break;
                }
            }
        }

        if self.cascade.settled && self.cascade.since_removal >= self.config.match_recheck_delay {
            let removal = self.removal_pass();
            if removal.is_empty() {
                self.finish_resolution();
            } else if !self.check_level_clear() {
                self.start_cascade();
            }
        }
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        if self.phase == Phase::GameOver {
            return;
        }

        match event {
            InputEvent::TogglePause => self.toggle_pause(),
            InputEvent::MoveLeftStop => self.held.left = false,
            InputEvent::MoveRightStop => self.held.right = false,
            InputEvent::SoftDropStop => self.held.down = false,
            _ if self.paused => {}
            InputEvent::MoveLeft => {
                if !self.held.left {
                    self.held.left = true;
                    self.move_pill(-1, 0);
                }
            }
            InputEvent::MoveRight => {
                if !self.held.right {
                    self.held.right = true;
                    self.move_pill(1, 0);
                }
            }
            InputEvent::RotateCw => {
                self.rotate_pill();
            }
            InputEvent::SoftDropStart => {
                if !self.held.down {
                    self.held.down = true;
                    self.fast_drop_timer = Duration::ZERO;
                }
            }
        }
    }

    /// Cascades in flight are finished before the pause takes effect.
    pub fn toggle_pause(&mut self) {
        if self.phase == Phase::GameOver {
            return;
        }
        if !self.paused && self.phase == Phase::Resolving {
            self.resolve_now();
            if self.phase == Phase::GameOver {
                return;
            }
        }
        self.paused = !self.paused;
        debug!("paused: {}", self.paused);
    }

    fn emit(&mut self, event: GameEvent) {
        if self.events.len() == MAX_PENDING_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Takes the queued events, oldest first. Drivers should call this once
    /// per frame.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board,
            active: self.active,
            next: self.next,
            score: self.score,
            level: self.level,
            virus_count: self.virus_count,
            drop_interval_ms: self.drop_interval.as_millis() as u64,
            paused: self.paused,
            running: self.is_running(),
            phase: self.phase,
        }
    }

    /// Replaces the falling pill when the new position is free.
    #[doc(hidden)]
    pub fn set_active(&mut self, pill: Pill) -> bool {
        if self.phase != Phase::Falling || !self.is_valid_position(&pill) {
            return false;
        }
        self.active = Some(pill);
        true
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> Option<&Pill> {
        self.active.as_ref()
    }

    pub fn next(&self) -> NextPill {
        self.next
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn virus_count(&self) -> usize {
        self.virus_count
    }

    pub fn drop_interval(&self) -> Duration {
        self.drop_interval
    }

    pub fn is_running(&self) -> bool {
        self.phase != Phase::GameOver
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
