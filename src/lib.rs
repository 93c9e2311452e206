//! Virus-clearing pill puzzle: a tick-driven engine plus a terminal front end.

pub mod config;
pub mod constants;
pub mod game;
pub mod input;
pub mod ui;

pub use config::{ConfigError, EngineConfig, ResolveMode};
pub use game::{Game, Snapshot};
pub use input::InputEvent;
