use rand::Rng;

use crate::constants::{SPAWN_X, SPAWN_Y};
use crate::game::board::Color;

/// Direction of the second half relative to the first.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Orientation {
    Right,
    Down,
    Left,
    Up,
}

impl Orientation {
    pub fn rotate_clockwise(self) -> Self {
        match self {
            Orientation::Right => Orientation::Down,
            Orientation::Down => Orientation::Left,
            Orientation::Left => Orientation::Up,
            Orientation::Up => Orientation::Right,
        }
    }

    pub fn offset(self) -> (i32, i32) {
        match self {
            Orientation::Right => (1, 0),
            Orientation::Down => (0, 1),
            Orientation::Left => (-1, 0),
            Orientation::Up => (0, -1),
        }
    }
}

/// Colors of the upcoming pill, shown as a preview before it spawns.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct NextPill {
    pub color1: Color,
    pub color2: Color,
}

impl NextPill {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            color1: Color::ALL[rng.gen_range(0..Color::ALL.len())],
            color2: Color::ALL[rng.gen_range(0..Color::ALL.len())],
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Pill {
    pub x: i32,
    pub y: i32,
    pub color1: Color,
    pub color2: Color,
    pub orientation: Orientation,
}

impl Pill {
    pub fn spawn(next: NextPill) -> Self {
        Self {
            x: SPAWN_X,
            y: SPAWN_Y,
            color1: next.color1,
            color2: next.color2,
            orientation: Orientation::Right,
        }
    }

    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    pub fn rotated(&self) -> Self {
        Self {
            orientation: self.orientation.rotate_clockwise(),
            ..*self
        }
    }

    /// Absolute cells occupied by the pill. Index 0 always holds `color1`.
    pub fn positions(&self) -> [(i32, i32); 2] {
        let (dx, dy) = self.orientation.offset();
        [(self.x, self.y), (self.x + dx, self.y + dy)]
    }

    pub fn cells(&self) -> [((i32, i32), Color); 2] {
        let [first, second] = self.positions();
        [(first, self.color1), (second, self.color2)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pill(orientation: Orientation) -> Pill {
        Pill {
            x: 3,
            y: 4,
            color1: Color::Red,
            color2: Color::Blue,
            orientation,
        }
    }

    #[test]
    fn positions_follow_orientation() {
        assert_eq!(pill(Orientation::Right).positions(), [(3, 4), (4, 4)]);
        assert_eq!(pill(Orientation::Down).positions(), [(3, 4), (3, 5)]);
        assert_eq!(pill(Orientation::Left).positions(), [(3, 4), (2, 4)]);
        assert_eq!(pill(Orientation::Up).positions(), [(3, 4), (3, 3)]);
    }

    #[test]
    fn four_rotations_return_to_start() {
        let start = pill(Orientation::Right);
        let mut p = start;
        for expected in [Orientation::Down, Orientation::Left, Orientation::Up, Orientation::Right] {
            p = p.rotated();
            assert_eq!(p.orientation, expected);
        }
        assert_eq!(p, start);
    }

    #[test]
    fn first_cell_keeps_first_color() {
        let cells = pill(Orientation::Left).cells();
        assert_eq!(cells[0], ((3, 4), Color::Red));
        assert_eq!(cells[1], ((2, 4), Color::Blue));
    }

    #[test]
    fn spawn_uses_center_left_column() {
        let p = Pill::spawn(NextPill { color1: Color::Yellow, color2: Color::Red });
        assert_eq!(p.positions(), [(3, 0), (4, 0)]);
        assert_eq!(p.orientation, Orientation::Right);
    }
}
