pub mod board;
pub mod gravity;
pub mod matcher;
pub mod pill;
pub mod snapshot;
pub mod state;
pub mod viruses;

pub use board::{Board, Cell, Color, PairId};
pub use pill::{NextPill, Orientation, Pill};
pub use snapshot::Snapshot;
pub use state::{CascadeReport, Game, GameEvent, Phase};
