//! Discrete single-row gravity.
//!
//! Each step lowers every eligible unit (a loose cell or a bonded pair) by
//! exactly one row. Rows are visited bottom to top so a stack of loose cells
//! falls together within a step, but nothing ever moves twice in one step.

use crate::constants::{BOARD_HEIGHT, BOARD_WIDTH};
use crate::game::board::{Board, Cell};

/// Applies one settle step. Returns the number of cells that moved.
pub fn settle_step(board: &mut Board) -> usize {
    let mut moved = [[false; BOARD_WIDTH]; BOARD_HEIGHT];
    let mut count = 0;

    for y in (0..BOARD_HEIGHT as i32 - 1).rev() {
        for x in 0..BOARD_WIDTH as i32 {
            if moved[y as usize][x as usize] {
                continue;
            }
            let Some(cell) = board.get(x, y) else {
                continue;
            };
            if !matches!(cell, Cell::Pill { .. }) {
                continue;
            }

            let unit = match board.partner_of(x, y) {
                Some(partner) => vec![(x, y), partner],
                None => vec![(x, y)],
            };
            if unit.iter().any(|&(ux, uy)| moved[uy as usize][ux as usize]) {
                continue;
            }
            if !can_fall(board, &unit) {
                continue;
            }

            // Lowest cell first so a vertical pair never overwrites itself.
            let mut ordered = unit;
            ordered.sort_by_key(|&(_, uy)| std::cmp::Reverse(uy));
            for (ux, uy) in ordered {
                if let Some(falling) = board.get(ux, uy) {
                    board.set(ux, uy + 1, falling);
                    board.set(ux, uy, Cell::Empty);
                    moved[uy as usize + 1][ux as usize] = true;
                    count += 1;
                }
            }
        }
    }

    count
}

/// Every cell of the unit must have room below, counting its own partner as room.
fn can_fall(board: &Board, unit: &[(i32, i32)]) -> bool {
    unit.iter().all(|&(x, y)| {
        let below = (x, y + 1);
        board.is_empty(below.0, below.1) || unit.contains(&below)
    })
}

/// Runs settle steps until nothing moves. Returns how many steps moved cells.
pub fn settle(board: &mut Board) -> usize {
    let mut steps = 0;
    while settle_step(board) > 0 {
        steps += 1;
    }
    steps
}
