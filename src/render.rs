use crossterm::style::Color;

use crate::food::{SpecialColor, SpecialFood};
use crate::game::GameState;
use crate::grid::UNIT;

pub const BACKGROUND: Color = Color::White;
pub const BORDER: Color = Color::Blue;
pub const SNAKE_HEAD: Color = Color::Black;
pub const SNAKE_BODY: Color = Color::Blue;
pub const SNAKE_BORDER: Color = Color::DarkBlue;
pub const FOOD: Color = Color::Blue;
pub const FOOD_BORDER: Color = Color::DarkBlue;

/// A drawing surface addressed in board coordinates.
pub trait Canvas {
    fn resize(&mut self, width: i32, height: i32);
    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color);
    fn stroke_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color);
    fn fill_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Color);
}

pub fn special_color(color: SpecialColor) -> Color {
    match color {
        SpecialColor::Green => Color::Green,
        SpecialColor::Brown => Color::Rgb {
            r: 0xa5,
            g: 0x2a,
            b: 0x2a,
        },
        SpecialColor::Red => Color::Red,
        SpecialColor::Purple => Color::Magenta,
        SpecialColor::Yellow => Color::Yellow,
        SpecialColor::Pink => Color::Rgb {
            r: 0xff,
            g: 0xc0,
            b: 0xcb,
        },
    }
}

fn paint_special(canvas: &mut impl Canvas, special: &SpecialFood) {
    canvas.fill_circle(
        special.cell.x,
        special.cell.y,
        special.radius(),
        special_color(special.color),
    );
}

/// Draws one frame: background, both foods, then the snake with its head on top.
pub fn paint(state: &GameState, canvas: &mut impl Canvas) {
    let board = state.board;
    canvas.resize(board.width, board.height);
    canvas.fill_rect(0, 0, board.width, board.height, BACKGROUND);
    canvas.stroke_rect(0, 0, board.width, board.height, BORDER);

    if let Some(food) = state.food {
        canvas.fill_rect(food.x, food.y, UNIT, UNIT, FOOD);
        canvas.stroke_rect(food.x, food.y, UNIT, UNIT, FOOD_BORDER);
    }
    if let Some(special) = &state.special {
        paint_special(canvas, special);
    }

    let parts: Vec<_> = state.snake.segments().copied().collect();
    for (index, part) in parts.iter().enumerate().rev() {
        let color = if index == 0 { SNAKE_HEAD } else { SNAKE_BODY };
        canvas.fill_rect(part.x, part.y, UNIT, UNIT, color);
        canvas.stroke_rect(part.x, part.y, UNIT, UNIT, SNAKE_BORDER);
    }
}
