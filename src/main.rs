use std::{
    fs::File,
    io::stdout,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use ratatui::{backend::CrosstermBackend, Terminal};

use tpills::game::{Game, GameEvent};
use tpills::input::{handle_input, InputState};
use tpills::ui::ui;
use tpills::{EngineConfig, ResolveMode};

const FRAME_TIME: Duration = Duration::from_millis(16);

/// Clear every virus by stacking colored pills into lines of four.
#[derive(Debug, Parser)]
#[command(name = "tpills", version, about)]
struct Args {
    /// Seed for virus layout and pill colors
    #[arg(long)]
    seed: Option<u64>,

    /// Level to start on
    #[arg(long, default_value_t = 1)]
    level: u32,

    /// Simplified rules: loose pill halves and repeating movement
    #[arg(long)]
    classic: bool,

    /// Do not bond the two halves of a placed pill
    #[arg(long)]
    no_pairing: bool,

    /// Keep moving while left/right is held
    #[arg(long)]
    continuous_move: bool,

    /// Resolve cascades instantly instead of animating them
    #[arg(long)]
    instant_resolve: bool,

    /// Write logs to this file (filter with RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn engine_config(&self) -> EngineConfig {
        let base = if self.classic {
            EngineConfig::classic()
        } else {
            EngineConfig::default()
        };
        EngineConfig {
            start_level: self.level,
            pairing_enabled: base.pairing_enabled && !self.no_pairing,
            edge_triggered_movement: base.edge_triggered_movement && !self.continuous_move,
            resolve_mode: if self.instant_resolve {
                ResolveMode::Immediate
            } else {
                ResolveMode::Staggered
            },
            seed: self.seed,
            ..base
        }
    }
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let config = args.engine_config();
    config.validate().context("invalid game settings")?;
    info!("starting with {config:?}");

    // Setup terminal
    terminal::enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;

    // Try to enable keyboard enhancement for better key release detection
    let keyboard_enhancement_active = matches!(
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        ),
        Ok(())
    );

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, config, keyboard_enhancement_active);

    // Cleanup
    if keyboard_enhancement_active {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    config: EngineConfig,
    keyboard_enhancement_active: bool,
) -> anyhow::Result<()> {
    let mut game = Game::new(config);
    let mut input_state = InputState::new();
    input_state.keyboard_enhancement_active = keyboard_enhancement_active;
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, &game.snapshot()))?;

        if event::poll(FRAME_TIME)? {
            if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
                match code {
                    KeyCode::Char('q') | KeyCode::Char('Q') => {
                        if kind == KeyEventKind::Press {
                            break;
                        }
                    }
                    KeyCode::Char('r') | KeyCode::Char('R') => {
                        if kind == KeyEventKind::Press {
                            game.restart();
                            input_state = InputState::new();
                            input_state.keyboard_enhancement_active = keyboard_enhancement_active;
                        }
                    }
                    _ => {
                        handle_input(&mut game, &mut input_state, code, kind);
                    }
                }
            }
        }

        let now = Instant::now();
        for release in input_state.check_timeouts(now) {
            game.handle_input(release);
        }
        game.tick(now.duration_since(last_tick));
        last_tick = now;

        for event in game.drain_events() {
            log_event(event);
        }
    }

    Ok(())
}

fn log_event(event: GameEvent) {
    match event {
        GameEvent::ScoreChanged(score) => info!("score {score}"),
        GameEvent::LevelChanged(level) => info!("level {level}"),
        GameEvent::VirusCountChanged(count) => info!("viruses left {count}"),
        other => log::debug!("{other:?}"),
    }
}
