/// Side of one grid cell in board units. Every coordinate and delta is a multiple of it.
pub const UNIT: i32 = 16;

pub const DEFAULT_WIDTH: i32 = 800;
pub const DEFAULT_HEIGHT: i32 = 800;

/// How much both board dimensions lose each time the snake hits a wall.
pub const SHRINK_BY: i32 = 113;

/// Rounds to the nearest multiple of [`UNIT`], halves going up.
pub fn round_to_unit(value: i32) -> i32 {
    (value + UNIT / 2).div_euclid(UNIT) * UNIT
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Cell {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wall {
    Left,
    Right,
    Top,
    Bottom,
}

impl Wall {
    /// The axis a snake travels along to run into this wall.
    pub fn axis(self) -> Axis {
        match self {
            Wall::Left | Wall::Right => Axis::Horizontal,
            Wall::Top | Wall::Bottom => Axis::Vertical,
        }
    }
}

/// Playing field extent. Only ever shrinks while a session runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    pub width: i32,
    pub height: i32,
}

impl Default for Board {
    fn default() -> Self {
        Board {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl Board {
    pub fn new(width: i32, height: i32) -> Self {
        Board { width, height }
    }

    pub fn shrunk(self) -> Self {
        Board::new(self.width - SHRINK_BY, self.height - SHRINK_BY)
    }

    /// Largest coordinate a cell may start at on the given axis.
    pub fn far_edge(self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.width - UNIT,
            Axis::Vertical => self.height - UNIT,
        }
    }

    /// Which wall, if any, `head` has crossed. Checked left, right, top, bottom.
    pub fn wall_hit(self, head: Cell) -> Option<Wall> {
        if head.x < 0 {
            Some(Wall::Left)
        } else if head.x > self.far_edge(Axis::Horizontal) {
            Some(Wall::Right)
        } else if head.y < 0 {
            Some(Wall::Top)
        } else if head.y > self.far_edge(Axis::Vertical) {
            Some(Wall::Bottom)
        } else {
            None
        }
    }

    pub fn center(self) -> Cell {
        Cell::new(self.width / 2, self.height / 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_goes_half_up() {
        assert_eq!(round_to_unit(161), 160);
        assert_eq!(round_to_unit(687), 688);
        assert_eq!(round_to_unit(8), 16);
        assert_eq!(round_to_unit(7), 0);
        assert_eq!(round_to_unit(-8), 0);
        assert_eq!(round_to_unit(-9), -16);
        assert_eq!(round_to_unit(-113), -112);
    }

    #[test]
    fn walls_are_checked_in_order() {
        let board = Board::default();
        assert_eq!(board.wall_hit(Cell::new(400, 400)), None);
        assert_eq!(board.wall_hit(Cell::new(784, 784)), None);
        assert_eq!(board.wall_hit(Cell::new(-16, 400)), Some(Wall::Left));
        assert_eq!(board.wall_hit(Cell::new(800, 400)), Some(Wall::Right));
        assert_eq!(board.wall_hit(Cell::new(400, -16)), Some(Wall::Top));
        assert_eq!(board.wall_hit(Cell::new(400, 800)), Some(Wall::Bottom));
        // corner: horizontal walls win
        assert_eq!(board.wall_hit(Cell::new(-16, -16)), Some(Wall::Left));
    }

    #[test]
    fn shrinking_takes_the_same_amount_off_both_sides() {
        let board = Board::default().shrunk();
        assert_eq!(board, Board::new(687, 687));
        assert_eq!(board.far_edge(Axis::Horizontal), 671);
    }
}
