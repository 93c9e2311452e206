use rand::Rng;

use crate::constants::{MAX_VIRUSES, VIRUSES_BASE, VIRUSES_PER_LEVEL, VIRUS_START_ROW};
use crate::game::board::{Board, Cell, Color};

/// Number of viruses seeded for `level`, before capping by free space.
pub fn virus_target(level: u32) -> usize {
    (VIRUSES_BASE + level as usize * VIRUSES_PER_LEVEL).min(MAX_VIRUSES)
}

/// Seeds viruses of random colors into empty cells of the bottom half.
///
/// The count is capped at the number of empty bottom-half cells, so high
/// levels fill that area instead of searching forever. Returns the number
/// placed.
pub fn generate_viruses<R: Rng + ?Sized>(board: &mut Board, level: u32, rng: &mut R) -> usize {
    let mut free = board.empty_cells_from_row(VIRUS_START_ROW);
    let count = virus_target(level).min(free.len());

    for _ in 0..count {
        let (x, y) = free.swap_remove(rng.gen_range(0..free.len()));
        let color = Color::ALL[rng.gen_range(0..Color::ALL.len())];
        board.set(x, y, Cell::Virus(color));
    }

    count
}
