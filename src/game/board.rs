use crate::constants::{BOARD_HEIGHT, BOARD_WIDTH};

/// Identifier shared by the two halves of a placed pill.
pub type PairId = u32;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Color {
    Red,
    Blue,
    Yellow,
}

impl Color {
    pub const ALL: [Color; 3] = [Color::Red, Color::Blue, Color::Yellow];
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Cell {
    #[default]
    Empty,
    Virus(Color),
    Pill { color: Color, pair: Option<PairId> },
}

impl Cell {
    pub fn color(self) -> Option<Color> {
        match self {
            Cell::Empty => None,
            Cell::Virus(color) | Cell::Pill { color, .. } => Some(color),
        }
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    pub fn is_virus(self) -> bool {
        matches!(self, Cell::Virus(_))
    }

    pub fn pair(self) -> Option<PairId> {
        match self {
            Cell::Pill { pair, .. } => pair,
            _ => None,
        }
    }
}

/// The playfield, indexed `(x, y)` with `y = 0` as the spawn row.
///
/// Accessors take signed coordinates so that candidate positions produced by
/// movement and kicks can be checked without casting at every call site.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Board {
    cells: [[Cell; BOARD_WIDTH]; BOARD_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; BOARD_WIDTH]; BOARD_HEIGHT],
        }
    }

    pub fn width(&self) -> usize {
        BOARD_WIDTH
    }

    pub fn height(&self) -> usize {
        BOARD_HEIGHT
    }

    pub fn is_in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < BOARD_WIDTH as i32 && y >= 0 && y < BOARD_HEIGHT as i32
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        if self.is_in_bounds(x, y) {
            Some(self.cells[y as usize][x as usize])
        } else {
            None
        }
    }

    /// Writes `cell` at `(x, y)`. Returns `false` when out of bounds.
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        if !self.is_in_bounds(x, y) {
            return false;
        }
        self.cells[y as usize][x as usize] = cell;
        true
    }

    /// True only for in-bounds empty cells.
    pub fn is_empty(&self, x: i32, y: i32) -> bool {
        self.get(x, y) == Some(Cell::Empty)
    }

    pub fn clear(&mut self) {
        self.cells = [[Cell::Empty; BOARD_WIDTH]; BOARD_HEIGHT];
    }

    pub fn rows(&self) -> &[[Cell; BOARD_WIDTH]; BOARD_HEIGHT] {
        &self.cells
    }

    pub fn virus_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| cell.is_virus())
            .count()
    }

    /// All positions currently tagged with `pair`, in row-major order.
    pub fn cells_with_pair(&self, pair: PairId) -> Vec<(i32, i32)> {
        let mut found = Vec::with_capacity(2);
        for (y, row) in self.cells.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                if cell.pair() == Some(pair) {
                    found.push((x as i32, y as i32));
                }
            }
        }
        found
    }

    pub fn max_pair_id(&self) -> Option<PairId> {
        self.cells.iter().flatten().filter_map(|cell| cell.pair()).max()
    }

    /// The other half of the pill occupying `(x, y)`, if it is still bonded.
    pub fn partner_of(&self, x: i32, y: i32) -> Option<(i32, i32)> {
        let pair = self.get(x, y)?.pair()?;
        self.cells_with_pair(pair)
            .into_iter()
            .find(|&pos| pos != (x, y))
    }

    /// Clears the pair id of `(x, y)`, leaving its color in place.
    pub fn unpair(&mut self, x: i32, y: i32) {
        if let Some(Cell::Pill { color, .. }) = self.get(x, y) {
            self.set(x, y, Cell::Pill { color, pair: None });
        }
    }

    /// Empty positions from `start_row` to the bottom, in row-major order.
    pub fn empty_cells_from_row(&self, start_row: usize) -> Vec<(i32, i32)> {
        let mut found = Vec::new();
        for y in start_row.min(BOARD_HEIGHT)..BOARD_HEIGHT {
            for x in 0..BOARD_WIDTH {
                if self.cells[y][x].is_empty() {
                    found.push((x as i32, y as i32));
                }
            }
        }
        found
    }
}
