//! Run detection and removal.
//!
//! A pass finds every horizontal and vertical run of at least
//! [`MIN_MATCH_LEN`] same-colored cells, removes the union of those runs in
//! one go and then breaks the bond of any pill that lost one of its halves.

use std::collections::BTreeSet;

use crate::constants::{BOARD_HEIGHT, BOARD_WIDTH, MIN_MATCH_LEN};
use crate::game::board::{Board, Cell, Color, PairId};

/// Outcome of one removal pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Removal {
    pub cells: Vec<(i32, i32)>,
    pub viruses: usize,
    pub broken_pairs: Vec<PairId>,
}

impl Removal {
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Positions belonging to a run of four or more, deduplicated across axes.
pub fn find_matches(board: &Board) -> BTreeSet<(i32, i32)> {
    let mut marked = BTreeSet::new();

    for y in 0..BOARD_HEIGHT as i32 {
        mark_runs(board, BOARD_WIDTH as i32, |i| (i, y), &mut marked);
    }
    for x in 0..BOARD_WIDTH as i32 {
        mark_runs(board, BOARD_HEIGHT as i32, |i| (x, i), &mut marked);
    }

    marked
}

fn mark_runs<F>(board: &Board, len: i32, at: F, marked: &mut BTreeSet<(i32, i32)>)
where
    F: Fn(i32) -> (i32, i32),
{
    let color_at = |i: i32| {
        let (x, y) = at(i);
        board.get(x, y).and_then(Cell::color)
    };

    let mut start = 0;
    let mut current: Option<Color> = color_at(0);

    // One step past the end flushes the final run.
    for i in 1..=len {
        let color = if i < len { color_at(i) } else { None };
        if color.is_some() && color == current {
            continue;
        }
        if current.is_some() && (i - start) as usize >= MIN_MATCH_LEN {
            marked.extend((start..i).map(&at));
        }
        start = i;
        current = color;
    }
}

/// Removes every current match and breaks orphaned bonds.
pub fn remove_matches(board: &mut Board) -> Removal {
    let marked = find_matches(board);
    if marked.is_empty() {
        return Removal::default();
    }

    let mut removal = Removal::default();
    let mut affected = BTreeSet::new();

    for &(x, y) in &marked {
        let Some(cell) = board.get(x, y) else {
            continue;
        };
        if cell.is_virus() {
            removal.viruses += 1;
        }
        if let Some(pair) = cell.pair() {
            affected.insert(pair);
        }
        board.set(x, y, Cell::Empty);
    }
    removal.cells = marked.into_iter().collect();

    for pair in affected {
        if let [(x, y)] = board.cells_with_pair(pair)[..] {
            board.unpair(x, y);
            removal.broken_pairs.push(pair);
        }
    }

    removal
}
