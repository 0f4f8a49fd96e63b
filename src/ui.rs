use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use rand::Rng;
use std::io::{stdout, Write};
use std::time::{Duration, Instant};

use crate::game::{Game, GameState, Phase};
use crate::grid::UNIT;
use crate::render::{self, Canvas};
use crate::snake::Direction;

const POLL_INTERVAL: Duration = Duration::from_millis(10);
const HALF_BLOCK: char = '▀';

/// Rasterizes board drawing into one colour per grid cell. Two grid rows
/// share a terminal row through the upper-half-block glyph.
#[derive(Debug, Default)]
pub struct TerminalCanvas {
    cols: usize,
    rows: usize,
    cells: Vec<Color>,
}

impl TerminalCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn size(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<Color> {
        (col < self.cols && row < self.rows).then(|| self.cells[row * self.cols + col])
    }

    /// Grid cells overlapping `[from, from + len)` on one axis, clipped.
    fn span(from: i32, len: i32, limit: usize) -> std::ops::Range<usize> {
        let first = from.div_euclid(UNIT).max(0) as usize;
        let last = (from + len - 1).div_euclid(UNIT) + 1;
        let last = (last.max(0) as usize).min(limit);
        first.min(last)..last
    }

    fn paint(&mut self, col: usize, row: usize, color: Color) {
        if col < self.cols && row < self.rows {
            self.cells[row * self.cols + col] = color;
        }
    }

    /// Terminal rows needed to show the grid.
    pub fn lines(&self) -> u16 {
        self.rows.div_ceil(2) as u16
    }

    pub fn flush(&self, out: &mut impl Write, left: u16, top: u16) -> std::io::Result<()> {
        let width = self.cols as u16;
        queue!(
            out,
            MoveTo(left, top),
            ResetColor,
            Print(format!("┌{}┐", "─".repeat(self.cols)))
        )?;
        for line in 0..self.lines() {
            queue!(out, MoveTo(left, top + 1 + line), ResetColor, Print('│'))?;
            let upper = line as usize * 2;
            for col in 0..self.cols {
                let over = self.cell(col, upper).unwrap_or(Color::Reset);
                let under = self.cell(col, upper + 1).unwrap_or(Color::Reset);
                queue!(
                    out,
                    SetForegroundColor(over),
                    SetBackgroundColor(under),
                    Print(HALF_BLOCK)
                )?;
            }
            queue!(out, ResetColor, Print('│'))?;
        }
        queue!(
            out,
            MoveTo(left, top + 1 + self.lines()),
            Print(format!("└{}┘", "─".repeat(width as usize)))
        )?;
        Ok(())
    }
}

impl Canvas for TerminalCanvas {
    fn resize(&mut self, width: i32, height: i32) {
        self.cols = (width.max(0) as usize).div_ceil(UNIT as usize);
        self.rows = (height.max(0) as usize).div_ceil(UNIT as usize);
        self.cells = vec![Color::Reset; self.cols * self.rows];
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color) {
        for row in Self::span(y, height, self.rows) {
            for col in Self::span(x, width, self.cols) {
                self.paint(col, row, color);
            }
        }
    }

    // Strokes are thinner than a terminal cell.
    fn stroke_rect(&mut self, _x: i32, _y: i32, _width: i32, _height: i32, _color: Color) {}

    fn fill_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Color) {
        for row in Self::span(cy - radius, radius * 2, self.rows) {
            for col in Self::span(cx - radius, radius * 2, self.cols) {
                let dx = col as i32 * UNIT + UNIT / 2 - cx;
                let dy = row as i32 * UNIT + UNIT / 2 - cy;
                if dx * dx + dy * dy <= radius * radius {
                    self.paint(col, row, color);
                }
            }
        }
    }
}

pub fn direction_for(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up => Some(Direction::Up),
        KeyCode::Down => Some(Direction::Down),
        KeyCode::Left => Some(Direction::Left),
        KeyCode::Right => Some(Direction::Right),
        _ => None,
    }
}

fn draw<R: Rng>(game: &Game<R>, canvas: &mut TerminalCanvas, clear: bool) -> std::io::Result<()> {
    let mut stdout = stdout();
    if clear {
        queue!(stdout, Clear(ClearType::All))?;
    }
    render::paint(game.state(), canvas);
    canvas.flush(&mut stdout, 0, 0)?;

    let status = canvas.lines() + 2;
    let score_color = if game.score_improved() {
        Color::Green
    } else {
        Color::Reset
    };
    let message = match game.phase() {
        Phase::Idle => "Press Enter to start".to_string(),
        Phase::Running => String::new(),
        Phase::Over(_) => format!(
            "{} Press Enter to play again!",
            game.message().unwrap_or_default()
        ),
    };
    queue!(
        stdout,
        MoveTo(0, status),
        Clear(ClearType::CurrentLine),
        Print("Score: "),
        SetForegroundColor(score_color),
        Print(game.score()),
        ResetColor,
        MoveTo(0, status + 1),
        Clear(ClearType::CurrentLine),
        Print(message),
        MoveTo(0, status + 2),
        Print("Use arrow keys to move, Enter to start, 'q' to quit")
    )?;

    stdout.flush()
}

/// Runs the game in the terminal until the player quits.
pub fn run<R: Rng>(game: &mut Game<R>) -> std::io::Result<()> {
    terminal::enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen, Hide)?;

    let result = event_loop(game);

    terminal::disable_raw_mode()?;
    execute!(stdout(), Show, LeaveAlternateScreen)?;
    result
}

fn event_loop<R: Rng>(game: &mut Game<R>) -> std::io::Result<()> {
    let clock = Instant::now();
    let mut canvas = TerminalCanvas::new();
    let mut shown: Option<(GameState, Phase)> = None;

    loop {
        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Release {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => {
                            info!("player quit with score {}", game.score());
                            return Ok(());
                        }
                        KeyCode::Enter | KeyCode::Char(' ') if game.can_start() => {
                            game.start();
                        }
                        code => {
                            if let Some(direction) = direction_for(code) {
                                game.steer(direction);
                            }
                        }
                    }
                }
            }
        }

        game.advance_clock(clock.elapsed());

        let current = (game.state().clone(), game.phase());
        if shown.as_ref() != Some(&current) {
            let resized = shown
                .as_ref()
                .map_or(true, |(state, _)| state.board != current.0.board);
            draw(game, &mut canvas, resized)?;
            shown = Some(current);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_covers_partial_cells() {
        let mut canvas = TerminalCanvas::new();
        canvas.resize(687, 687);
        assert_eq!(canvas.size(), (43, 43));
        assert_eq!(canvas.lines(), 22);

        canvas.fill_rect(0, 0, 687, 687, Color::White);
        assert_eq!(canvas.cell(42, 42), Some(Color::White));
        assert_eq!(canvas.cell(43, 0), None);

        canvas.fill_rect(32, 48, UNIT, UNIT, Color::Blue);
        assert_eq!(canvas.cell(2, 3), Some(Color::Blue));
        assert_eq!(canvas.cell(3, 3), Some(Color::White));
        assert_eq!(canvas.cell(2, 4), Some(Color::White));
    }

    #[test]
    fn off_board_drawing_is_clipped() {
        let mut canvas = TerminalCanvas::new();
        canvas.resize(64, 64);
        canvas.fill_rect(-16, 0, UNIT, UNIT, Color::Red);
        canvas.fill_rect(688, 0, UNIT, UNIT, Color::Red);
        assert!((0..4).all(|col| canvas.cell(col, 0) == Some(Color::Reset)));
    }

    #[test]
    fn special_food_circle_covers_the_cells_around_its_corner() {
        let mut canvas = TerminalCanvas::new();
        canvas.resize(128, 128);
        canvas.fill_circle(64, 64, 14, Color::Green);
        for (col, row) in [(3, 3), (4, 3), (3, 4), (4, 4)] {
            assert_eq!(canvas.cell(col, row), Some(Color::Green));
        }
        assert_eq!(canvas.cell(2, 3), Some(Color::Reset));
        assert_eq!(canvas.cell(5, 4), Some(Color::Reset));
    }

    #[test]
    fn arrows_map_to_directions() {
        assert_eq!(direction_for(KeyCode::Up), Some(Direction::Up));
        assert_eq!(direction_for(KeyCode::Left), Some(Direction::Left));
        assert_eq!(direction_for(KeyCode::Char('w')), None);
    }

    #[test]
    fn flush_draws_a_frame_around_the_grid() {
        let mut canvas = TerminalCanvas::new();
        canvas.resize(32, 48);
        let mut out = Vec::new();
        canvas.flush(&mut out, 0, 0).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("┌──┐"));
        assert!(text.contains("└──┘"));
        assert_eq!(text.matches(HALF_BLOCK).count(), 2 * 2);
    }
}
