//! Wall bounces. When the head leaves the board, the board loses
//! [`SHRINK_BY`] on both sides and the snake is turned around and moved so
//! that its new head sits inside the smaller board.

use crate::grid::{round_to_unit, Axis, Board, Cell, Wall, SHRINK_BY, UNIT};
use crate::snake::{Direction, Snake};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bounce {
    pub board: Board,
    pub snake: Snake,
    pub direction: Direction,
}

fn coord(cell: Cell, axis: Axis) -> i32 {
    match axis {
        Axis::Horizontal => cell.x,
        Axis::Vertical => cell.y,
    }
}

fn shift(cell: Cell, axis: Axis, by: i32) -> Cell {
    match axis {
        Axis::Horizontal => Cell::new(round_to_unit(cell.x + by), cell.y),
        Axis::Vertical => Cell::new(cell.x, round_to_unit(cell.y + by)),
    }
}

/// Slides the whole snake along `axis` until its head is on the board:
/// one cell at a time back from the far edge, then straight onto 0 if it
/// ended up before the near edge.
fn pull_inside(snake: &mut Snake, board: Board, axis: Axis) {
    let limit = board.far_edge(axis);
    while coord(snake.head(), axis) >= limit && coord(snake.head(), axis) > 0 {
        snake.remap(|c| shift(c, axis, -UNIT));
    }
    let head = coord(snake.head(), axis);
    if head < 0 {
        snake.remap(|c| shift(c, axis, -head));
    }
}

/// Shrinks `board` after the head crossed `wall` and remaps the snake into it.
pub fn resolve_wall(board: Board, mut snake: Snake, direction: Direction, wall: Wall) -> Bounce {
    let board = board.shrunk();
    snake.reverse();

    let hit = wall.axis();
    let by = match wall {
        Wall::Left | Wall::Top => SHRINK_BY,
        Wall::Right | Wall::Bottom => -SHRINK_BY,
    };
    snake.remap(|c| shift(c, hit, by));

    let across = match hit {
        Axis::Horizontal => Axis::Vertical,
        Axis::Vertical => Axis::Horizontal,
    };
    pull_inside(&mut snake, board, across);
    pull_inside(&mut snake, board, hit);

    Bounce {
        board,
        snake,
        direction: direction.bounced_off(wall),
    }
}
