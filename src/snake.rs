use std::collections::VecDeque;

use crate::grid::{Axis, Board, Cell, Wall, UNIT};

pub const INITIAL_LENGTH: usize = 5;

/// Segments right behind the head that can never genuinely collide with it.
const COLLISION_EXEMPT: usize = 4;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Velocity in board units; exactly one component is nonzero.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -UNIT),
            Direction::Down => (0, UNIT),
            Direction::Left => (-UNIT, 0),
            Direction::Right => (UNIT, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            Direction::Left | Direction::Right => Axis::Horizontal,
            Direction::Up | Direction::Down => Axis::Vertical,
        }
    }

    /// Direction after bouncing off `wall`: the component along the wall's
    /// axis flips, the other one (zero or not) is kept.
    pub fn bounced_off(self, wall: Wall) -> Self {
        if self.axis() == wall.axis() {
            self.opposite()
        } else {
            self
        }
    }
}

/// Velocity plus the once-per-tick steering lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Heading {
    direction: Direction,
    locked: bool,
}

impl Default for Heading {
    fn default() -> Self {
        Heading {
            direction: Direction::Right,
            locked: false,
        }
    }
}

impl Heading {
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn set(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Tries to steer. Reversals are refused, and so is anything after a
    /// change has already been accepted this tick.
    pub fn steer(&mut self, requested: Direction) -> bool {
        if self.locked || requested == self.direction.opposite() {
            return false;
        }
        if requested != self.direction {
            self.direction = requested;
            self.locked = true;
        }
        true
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }
}

/// Which foods the head reached this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Meal {
    pub regular: bool,
    pub special: bool,
}

impl Meal {
    pub fn ate_anything(self) -> bool {
        self.regular || self.special
    }
}

/// Body segments, head first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Cell>,
}

impl Snake {
    /// Initial snake laid out leftwards from the board's centre, head facing right.
    pub fn spawn(board: Board) -> Self {
        let center = board.center();
        let body = (0..INITIAL_LENGTH as i32)
            .map(|i| Cell::new(center.x - UNIT * i, center.y))
            .collect();
        Snake { body }
    }

    /// Builds a snake from explicit segments. Returns `None` for an empty body.
    #[cfg(test)]
    pub fn from_segments(segments: impl IntoIterator<Item = Cell>) -> Option<Self> {
        let body: VecDeque<Cell> = segments.into_iter().collect();
        if body.is_empty() {
            None
        } else {
            Some(Snake { body })
        }
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn tail(&self) -> Cell {
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn segments(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.body.iter()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Prepends a new head one step along `direction` and returns it.
    pub fn advance(&mut self, direction: Direction) -> Cell {
        let (dx, dy) = direction.delta();
        let new_head = self.head().offset(dx, dy);
        self.body.push_front(new_head);
        new_head
    }

    /// Settles the length after [`Snake::advance`]. Without food the tail goes;
    /// special food jumps the head one extra step.
    pub fn resolve_growth(&mut self, direction: Direction, meal: Meal) {
        if meal.special {
            self.advance(direction);
        }
        if !meal.ate_anything() {
            self.body.pop_back();
        }
    }

    pub fn self_intersects(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(COLLISION_EXEMPT).any(|&part| part == head)
    }

    /// Largest head-to-tail distance along each axis.
    pub fn span(&self) -> (i32, i32) {
        let (head, tail) = (self.head(), self.tail());
        ((head.x - tail.x).abs(), (head.y - tail.y).abs())
    }

    /// Tail becomes head.
    pub fn reverse(&mut self) {
        self.body.make_contiguous().reverse();
    }

    /// Applies `f` to every segment.
    pub fn remap(&mut self, mut f: impl FnMut(Cell) -> Cell) {
        for part in self.body.iter_mut() {
            *part = f(*part);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight(head: Cell, len: i32) -> Snake {
        Snake::from_segments((0..len).map(|i| head.offset(-UNIT * i, 0))).unwrap()
    }

    #[test]
    fn spawn_lays_out_five_segments_from_the_centre() {
        let snake = Snake::spawn(Board::default());
        assert_eq!(snake.len(), INITIAL_LENGTH);
        assert_eq!(snake.head(), Cell::new(400, 400));
        assert_eq!(snake.tail(), Cell::new(336, 400));
        assert!(!snake.self_intersects());
    }

    #[test]
    fn moving_without_food_keeps_length() {
        let mut snake = Snake::spawn(Board::default());
        let head = snake.advance(Direction::Right);
        snake.resolve_growth(Direction::Right, Meal::default());
        assert_eq!(head, Cell::new(416, 400));
        assert_eq!(snake.head(), head);
        assert_eq!(snake.len(), 5);
        assert_eq!(snake.tail(), Cell::new(352, 400));
    }

    #[test]
    fn regular_food_adds_one_segment() {
        let mut snake = straight(Cell::new(16, 400), 5);
        snake.advance(Direction::Right);
        snake.resolve_growth(
            Direction::Right,
            Meal {
                regular: true,
                special: false,
            },
        );
        assert_eq!(snake.len(), 6);
        assert_eq!(snake.head(), Cell::new(32, 400));
    }

    #[test]
    fn special_food_jumps_an_extra_step() {
        let mut snake = straight(Cell::new(100, 400), 5);
        snake.advance(Direction::Down);
        snake.resolve_growth(
            Direction::Down,
            Meal {
                regular: false,
                special: true,
            },
        );
        assert_eq!(snake.len(), 7);
        assert_eq!(snake.head(), Cell::new(100, 432));

        let mut both = straight(Cell::new(100, 400), 5);
        both.advance(Direction::Right);
        both.resolve_growth(
            Direction::Right,
            Meal {
                regular: true,
                special: true,
            },
        );
        assert_eq!(both.len(), 7);
    }

    #[test]
    fn collision_skips_the_segments_next_to_the_head() {
        // head touching segment 3 is not a bite
        let near = Snake::from_segments([
            Cell::new(0, 0),
            Cell::new(16, 0),
            Cell::new(16, 16),
            Cell::new(0, 0),
        ])
        .unwrap();
        assert!(!near.self_intersects());

        let bitten = Snake::from_segments([
            Cell::new(0, 0),
            Cell::new(16, 0),
            Cell::new(16, 16),
            Cell::new(0, 16),
            Cell::new(0, 0),
        ])
        .unwrap();
        assert!(bitten.self_intersects());
    }

    #[test]
    fn span_reverse_and_remap() {
        let mut snake = straight(Cell::new(64, 32), 3);
        assert_eq!(snake.span(), (32, 0));
        snake.reverse();
        assert_eq!(snake.head(), Cell::new(32, 32));
        snake.remap(|c| c.offset(0, 16));
        assert_eq!(snake.tail(), Cell::new(64, 48));
        assert!(Snake::from_segments([]).is_none());
    }

    #[test]
    fn steering_refuses_reversal_and_locks_until_unlocked() {
        let mut heading = Heading::default();
        assert!(!heading.steer(Direction::Left));
        assert_eq!(heading.direction(), Direction::Right);

        assert!(heading.steer(Direction::Up));
        assert!(!heading.steer(Direction::Left));
        assert_eq!(heading.direction(), Direction::Up);

        heading.unlock();
        assert!(heading.steer(Direction::Left));
        assert_eq!(heading.direction(), Direction::Left);
    }

    #[test]
    fn velocity_is_always_axis_aligned() {
        for direction in [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ] {
            let (dx, dy) = direction.delta();
            assert!((dx == 0) != (dy == 0));
            assert_eq!(direction.opposite().delta(), (-dx, -dy));
        }
        assert_eq!(Direction::Left.bounced_off(Wall::Left), Direction::Right);
        assert_eq!(Direction::Up.bounced_off(Wall::Left), Direction::Up);
        assert_eq!(Direction::Down.bounced_off(Wall::Bottom), Direction::Up);
    }
}
