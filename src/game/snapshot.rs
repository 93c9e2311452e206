use crate::game::board::{Board, Cell};
use crate::game::pill::{NextPill, Pill};
use crate::game::state::Phase;

/// Read-only view of the engine handed to the renderer each frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub board: Board,
    pub active: Option<Pill>,
    pub next: NextPill,
    pub score: u32,
    pub level: u32,
    pub virus_count: usize,
    pub drop_interval_ms: u64,
    pub paused: bool,
    pub running: bool,
    pub phase: Phase,
}

impl Snapshot {
    /// The board with the falling pill drawn in as two loose halves.
    pub fn composited_board(&self) -> Board {
        let mut board = self.board;
        if let Some(pill) = &self.active {
            for ((x, y), color) in pill.cells() {
                board.set(x, y, Cell::Pill { color, pair: None });
            }
        }
        board
    }
}
