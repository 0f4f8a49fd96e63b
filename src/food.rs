use std::fmt;

use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::grid::{Board, Cell, UNIT};
use crate::snake::Snake;

/// Visual diameter of special food, larger than one cell.
pub const SPECIAL_FOOD_SIZE: i32 = 28;

pub const REGULAR_POINTS: u32 = 1;
pub const SPECIAL_POINTS: u32 = 9;

/// Random draws before falling back to enumerating the free cells.
pub const MAX_SPAWN_ATTEMPTS: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoodKind {
    Regular,
    Special,
}

impl fmt::Display for FoodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FoodKind::Regular => f.write_str("regular"),
            FoodKind::Special => f.write_str("special"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SpawnError {
    #[error("board {width}x{height} has no room for {kind} food")]
    NoRoom {
        kind: FoodKind,
        width: i32,
        height: i32,
    },
    #[error("every cell available to {kind} food is taken")]
    Exhausted { kind: FoodKind },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialColor {
    Green,
    Brown,
    Red,
    Purple,
    Yellow,
    Pink,
}

pub const PALETTE: [SpecialColor; 6] = [
    SpecialColor::Green,
    SpecialColor::Brown,
    SpecialColor::Red,
    SpecialColor::Purple,
    SpecialColor::Yellow,
    SpecialColor::Pink,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialFood {
    pub cell: Cell,
    pub color: SpecialColor,
}

impl SpecialFood {
    pub fn radius(&self) -> i32 {
        SPECIAL_FOOD_SIZE / 2
    }

    /// The big glyph is centred on the cell's corner, so the head also gets it
    /// from the cell directly to the left.
    pub fn is_eaten_from(&self, head: Cell) -> bool {
        head == self.cell || (head.x + UNIT == self.cell.x && head.y == self.cell.y)
    }
}

/// Grid-aligned values `v` with `min <= v <= max`.
fn aligned_range(min: i32, max: i32) -> Option<(i32, i32)> {
    let first = min.div_euclid(UNIT) + i32::from(min.rem_euclid(UNIT) != 0);
    let last = max.div_euclid(UNIT);
    (first <= last).then_some((first * UNIT, last * UNIT))
}

/// Axis-aligned sampling window for one food kind.
#[derive(Debug, Clone, Copy)]
struct Region {
    xs: (i32, i32),
    ys: (i32, i32),
}

impl Region {
    fn for_kind(kind: FoodKind, board: Board) -> Result<Self, SpawnError> {
        let (low, high) = match kind {
            FoodKind::Regular => (0, UNIT),
            FoodKind::Special => (SPECIAL_FOOD_SIZE / 2, UNIT + SPECIAL_FOOD_SIZE / 2),
        };
        let no_room = SpawnError::NoRoom {
            kind,
            width: board.width,
            height: board.height,
        };
        let xs = aligned_range(low, board.width - high).ok_or(no_room)?;
        let ys = aligned_range(low, board.height - high).ok_or(no_room)?;
        Ok(Region { xs, ys })
    }

    fn sample<R: Rng>(&self, rng: &mut R) -> Cell {
        let x = rng.gen_range(self.xs.0 / UNIT..=self.xs.1 / UNIT) * UNIT;
        let y = rng.gen_range(self.ys.0 / UNIT..=self.ys.1 / UNIT) * UNIT;
        Cell::new(x, y)
    }

    fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (self.ys.0..=self.ys.1)
            .step_by(UNIT as usize)
            .flat_map(move |y| {
                (self.xs.0..=self.xs.1)
                    .step_by(UNIT as usize)
                    .map(move |x| Cell::new(x, y))
            })
    }

    /// Resamples until `blocked` lets a cell through, then gives up on luck
    /// and picks among every free cell.
    fn pick<R: Rng>(
        &self,
        kind: FoodKind,
        rng: &mut R,
        blocked: impl Fn(Cell) -> bool,
    ) -> Result<Cell, SpawnError> {
        for _ in 0..MAX_SPAWN_ATTEMPTS {
            let cell = self.sample(rng);
            if !blocked(cell) {
                return Ok(cell);
            }
        }
        warn!("{kind} food missed {MAX_SPAWN_ATTEMPTS} random draws, scanning for free cells");
        let free: Vec<Cell> = self.cells().filter(|&cell| !blocked(cell)).collect();
        free.choose(rng)
            .copied()
            .ok_or(SpawnError::Exhausted { kind })
    }
}

/// Places food for both kinds. Remembers the last special colour so it never
/// repeats twice in a row.
#[derive(Debug, Clone, Default)]
pub struct FoodSpawner {
    last_color: Option<SpecialColor>,
}

impl FoodSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn_regular<R: Rng>(
        &mut self,
        rng: &mut R,
        board: Board,
        snake: &Snake,
    ) -> Result<Cell, SpawnError> {
        let region = Region::for_kind(FoodKind::Regular, board)?;
        let cell = region.pick(FoodKind::Regular, rng, |cell| snake.contains(cell))?;
        debug!("regular food at ({}, {})", cell.x, cell.y);
        Ok(cell)
    }

    /// Special food only keeps clear of the regular food, not of the snake.
    pub fn spawn_special<R: Rng>(
        &mut self,
        rng: &mut R,
        board: Board,
        regular: Option<Cell>,
    ) -> Result<SpecialFood, SpawnError> {
        let region = Region::for_kind(FoodKind::Special, board)?;
        let cell = region.pick(FoodKind::Special, rng, |cell| Some(cell) == regular)?;
        let color = self.next_color(rng);
        debug!("special {color:?} food at ({}, {})", cell.x, cell.y);
        Ok(SpecialFood { cell, color })
    }

    fn next_color<R: Rng>(&mut self, rng: &mut R) -> SpecialColor {
        let choices: Vec<SpecialColor> = PALETTE
            .iter()
            .copied()
            .filter(|&color| Some(color) != self.last_color)
            .collect();
        let color = choices.choose(rng).copied().unwrap_or(PALETTE[0]);
        self.last_color = Some(color);
        color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const RNG_SEED: u64 = 0x5EED_F00D;

    fn random_snake(rng: &mut ChaCha8Rng, board: Board) -> Snake {
        let cols = board.width / UNIT;
        let rows = board.height / UNIT;
        let mut cell = Cell::new(
            rng.gen_range(0..cols) * UNIT,
            rng.gen_range(0..rows) * UNIT,
        );
        let mut parts = vec![cell];
        for _ in 0..rng.gen_range(1..60) {
            let (dx, dy) = match rng.gen_range(0..4) {
                0 => (UNIT, 0),
                1 => (-UNIT, 0),
                2 => (0, UNIT),
                _ => (0, -UNIT),
            };
            cell = cell.offset(dx, dy);
            parts.push(cell);
        }
        Snake::from_segments(parts).unwrap()
    }

    #[test]
    fn regular_food_never_lands_on_the_snake() {
        let mut rng = ChaCha8Rng::seed_from_u64(RNG_SEED);
        let mut spawner = FoodSpawner::new();
        for round in 0..300 {
            let shrinks = round % 6;
            let board = (0..shrinks).fold(Board::default(), |b, _| b.shrunk());
            let snake = random_snake(&mut rng, board);
            let food = spawner.spawn_regular(&mut rng, board, &snake).unwrap();
            assert!(!snake.contains(food), "round {round}: {food:?} on snake");
            assert_eq!(food.x % UNIT, 0);
            assert_eq!(food.y % UNIT, 0);
            assert!(food.x >= 0 && food.x <= board.width - UNIT);
            assert!(food.y >= 0 && food.y <= board.height - UNIT);
        }
    }

    #[test]
    fn special_food_stays_inset_and_off_the_regular_food() {
        let mut rng = ChaCha8Rng::seed_from_u64(RNG_SEED);
        let mut spawner = FoodSpawner::new();
        let board = Board::default();
        let regular = Cell::new(400, 400);
        let mut previous = None;
        for _ in 0..500 {
            let special = spawner.spawn_special(&mut rng, board, Some(regular)).unwrap();
            assert_ne!(special.cell, regular);
            assert!(special.cell.x >= 14 && special.cell.x <= 800 - 16 - 14);
            assert!(special.cell.y >= 14 && special.cell.y <= 800 - 16 - 14);
            assert_ne!(Some(special.color), previous);
            previous = Some(special.color);
        }
    }

    #[test]
    fn crowded_board_falls_back_to_the_free_cell() {
        let mut rng = ChaCha8Rng::seed_from_u64(RNG_SEED);
        let board = Board::new(64, 32);
        let free = Cell::new(48, 16);
        let snake = Snake::from_segments(
            [0, 16]
                .into_iter()
                .flat_map(|y| [0, 16, 32, 48].into_iter().map(move |x| Cell::new(x, y)))
                .filter(|&c| c != free),
        )
        .unwrap();
        let food = FoodSpawner::new().spawn_regular(&mut rng, board, &snake).unwrap();
        assert_eq!(food, free);
    }

    #[test]
    fn full_or_tiny_boards_report_why() {
        let mut rng = ChaCha8Rng::seed_from_u64(RNG_SEED);
        let board = Board::new(32, 16);
        let snake = Snake::from_segments([Cell::new(0, 0), Cell::new(16, 0)]).unwrap();
        assert_eq!(
            FoodSpawner::new().spawn_regular(&mut rng, board, &snake),
            Err(SpawnError::Exhausted {
                kind: FoodKind::Regular
            })
        );
        assert!(matches!(
            FoodSpawner::new().spawn_special(&mut rng, Board::new(40, 40), None),
            Err(SpawnError::NoRoom { .. })
        ));
    }

    #[test]
    fn special_food_is_reachable_from_its_left_neighbour() {
        let food = SpecialFood {
            cell: Cell::new(32, 400),
            color: SpecialColor::Red,
        };
        assert!(food.is_eaten_from(Cell::new(32, 400)));
        assert!(food.is_eaten_from(Cell::new(16, 400)));
        assert!(!food.is_eaten_from(Cell::new(48, 400)));
        assert!(!food.is_eaten_from(Cell::new(16, 416)));
        assert_eq!(food.radius(), 14);
    }

    #[test]
    fn aligned_range_rounds_inwards() {
        assert_eq!(aligned_range(14, 770), Some((16, 768)));
        assert_eq!(aligned_range(0, 784), Some((0, 784)));
        assert_eq!(aligned_range(14, 10), None);
    }
}
