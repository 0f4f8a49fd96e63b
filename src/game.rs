use std::time::Duration;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::Rng;

use crate::food::{FoodSpawner, SpawnError, SpecialFood, REGULAR_POINTS, SPECIAL_POINTS};
use crate::grid::{Board, Cell, Wall, SHRINK_BY};
use crate::shrink::{self, Bounce};
use crate::snake::{Direction, Heading, Meal, Snake};
use crate::timers::{Scheduler, TimerHandle, TimerKind};

pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Whole seconds between automatic respawns, drawn fresh for every arm.
const REGULAR_RESPAWN_SECS: (u64, u64) = (4, 10);
const SPECIAL_RESPAWN_SECS: (u64, u64) = (1, 5);

/// Why a session ended. Both end it the same way; the message is for the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GameOver {
    #[error("The game ended as the snake has bitten itself!")]
    SelfCollision,
    #[error("The game ended as the size of snake increased the canvas size.")]
    BoardExhausted,
}

impl From<SpawnError> for GameOver {
    fn from(err: SpawnError) -> Self {
        warn!("ending game, food can't be placed: {err}");
        GameOver::BoardExhausted
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub current: u32,
    pub previous: Option<u32>,
}

impl Score {
    /// A previous score of zero is nothing to beat.
    pub fn improved(&self) -> bool {
        self.previous
            .is_some_and(|previous| previous > 0 && self.current > previous)
    }

    fn restart(&mut self) {
        self.current = 0;
    }

    fn remember(&mut self) {
        self.previous = Some(self.current);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Over(GameOver),
}

/// Everything the simulation mutates. Rendering only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    pub snake: Snake,
    pub heading: Heading,
    pub food: Option<Cell>,
    pub special: Option<SpecialFood>,
    pub score: Score,
}

impl Default for GameState {
    fn default() -> Self {
        let board = Board::default();
        GameState {
            board,
            snake: Snake::spawn(board),
            heading: Heading::default(),
            food: None,
            special: None,
            score: Score::default(),
        }
    }
}

impl GameState {
    /// Overcrowding is checked before self collision; only the message differs.
    pub fn check_terminal(&self) -> Option<GameOver> {
        let (span_x, span_y) = self.snake.span();
        if span_x + SHRINK_BY > self.board.width || span_y + SHRINK_BY > self.board.height {
            Some(GameOver::BoardExhausted)
        } else if self.snake.self_intersects() {
            Some(GameOver::SelfCollision)
        } else {
            None
        }
    }
}

/// Latest handle per timer. Anything else that fires is stale.
#[derive(Debug, Default)]
struct Timers {
    tick: Option<TimerHandle>,
    regular: Option<TimerHandle>,
    special: Option<TimerHandle>,
}

impl Timers {
    fn slot(&mut self, kind: TimerKind) -> &mut Option<TimerHandle> {
        match kind {
            TimerKind::Tick => &mut self.tick,
            TimerKind::RegularFood => &mut self.regular,
            TimerKind::SpecialFood => &mut self.special,
        }
    }
}

pub struct Game<R = StdRng> {
    rng: R,
    spawner: FoodSpawner,
    state: GameState,
    phase: Phase,
    scheduler: Scheduler,
    timers: Timers,
    tick_interval: Duration,
}

impl<R: Rng> Game<R> {
    pub fn new(rng: R, tick_interval: Duration) -> Self {
        Game {
            rng,
            spawner: FoodSpawner::new(),
            state: GameState::default(),
            phase: Phase::Idle,
            scheduler: Scheduler::new(),
            timers: Timers::default(),
            tick_interval,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Whether the start control is enabled.
    pub fn can_start(&self) -> bool {
        !self.is_running()
    }

    pub fn message(&self) -> Option<String> {
        match self.phase {
            Phase::Over(over) => Some(over.to_string()),
            _ => None,
        }
    }

    pub fn score(&self) -> u32 {
        self.state.score.current
    }

    pub fn score_improved(&self) -> bool {
        self.state.score.improved()
    }

    /// Resets everything but the previous score and starts ticking.
    /// Refused while a game is already running.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        self.cancel_all();
        let mut score = self.state.score;
        score.restart();
        self.state = GameState {
            score,
            ..GameState::default()
        };
        self.phase = Phase::Running;
        info!(
            "game started on a {}x{} board",
            self.state.board.width, self.state.board.height
        );

        if let Err(over) = self.respawn_both() {
            self.finish(over);
            return true;
        }
        self.arm(TimerKind::Tick);
        true
    }

    /// Queues a direction change for the next move.
    pub fn steer(&mut self, direction: Direction) -> bool {
        self.is_running() && self.state.heading.steer(direction)
    }

    /// Runs every timer due up to `now`, each one to completion before the next.
    pub fn advance_clock(&mut self, now: Duration) {
        while let Some((handle, kind)) = self.scheduler.pop_due(now) {
            self.fire(handle, kind);
        }
        self.scheduler.advance_to(now);
    }

    fn fire(&mut self, handle: TimerHandle, kind: TimerKind) {
        let slot = self.timers.slot(kind);
        if *slot != Some(handle) {
            debug!("ignoring stale {kind:?} timer {handle:?}");
            return;
        }
        *slot = None;

        match kind {
            TimerKind::Tick => {
                self.tick();
                if self.is_running() {
                    self.arm(TimerKind::Tick);
                }
            }
            TimerKind::RegularFood => {
                debug!("regular food timed out");
                if let Err(over) = self.respawn_regular() {
                    self.finish(over);
                }
            }
            TimerKind::SpecialFood => {
                debug!("special food timed out");
                if let Err(over) = self.respawn_special() {
                    self.finish(over);
                }
            }
        }
    }

    /// One step of the simulation. Does nothing unless running.
    pub fn tick(&mut self) {
        if !self.is_running() {
            return;
        }
        if let Err(over) = self.step() {
            self.finish(over);
        }
    }

    fn step(&mut self) -> Result<(), GameOver> {
        self.state.heading.unlock();

        if let Some(wall) = self.state.board.wall_hit(self.state.snake.head()) {
            self.bounce(wall)?;
        }

        let direction = self.state.heading.direction();
        let head = self.state.snake.advance(direction);
        let meal = Meal {
            regular: self.state.food == Some(head),
            special: self
                .state
                .special
                .is_some_and(|special| special.is_eaten_from(head)),
        };
        self.state.snake.resolve_growth(direction, meal);

        if meal.regular {
            self.state.score.current += REGULAR_POINTS;
            debug!(
                "ate regular food, score {} length {}",
                self.state.score.current,
                self.state.snake.len()
            );
            self.respawn_regular()?;
        }
        if meal.special {
            self.state.score.current += SPECIAL_POINTS;
            debug!(
                "ate special food, score {} length {}",
                self.state.score.current,
                self.state.snake.len()
            );
            self.respawn_special()?;
        }

        match self.state.check_terminal() {
            Some(over) => Err(over),
            None => Ok(()),
        }
    }

    fn bounce(&mut self, wall: Wall) -> Result<(), GameOver> {
        let Bounce {
            board,
            snake,
            direction,
        } = shrink::resolve_wall(
            self.state.board,
            self.state.snake.clone(),
            self.state.heading.direction(),
            wall,
        );
        info!(
            "hit {wall:?} wall, board shrinks to {}x{}",
            board.width, board.height
        );
        self.state.board = board;
        self.state.snake = snake;
        self.state.heading.set(direction);
        self.respawn_both()
    }

    fn respawn_both(&mut self) -> Result<(), GameOver> {
        self.respawn_regular()?;
        self.respawn_special()
    }

    fn respawn_regular(&mut self) -> Result<(), GameOver> {
        let cell = self
            .spawner
            .spawn_regular(&mut self.rng, self.state.board, &self.state.snake)?;
        self.state.food = Some(cell);
        self.arm(TimerKind::RegularFood);
        Ok(())
    }

    fn respawn_special(&mut self) -> Result<(), GameOver> {
        let special = self
            .spawner
            .spawn_special(&mut self.rng, self.state.board, self.state.food)?;
        self.state.special = Some(special);
        self.arm(TimerKind::SpecialFood);
        Ok(())
    }

    /// Replaces whatever timer of this kind is pending with a fresh one.
    fn arm(&mut self, kind: TimerKind) {
        let delay = match kind {
            TimerKind::Tick => self.tick_interval,
            TimerKind::RegularFood => self.respawn_delay(REGULAR_RESPAWN_SECS),
            TimerKind::SpecialFood => self.respawn_delay(SPECIAL_RESPAWN_SECS),
        };
        if let Some(old) = self.timers.slot(kind).take() {
            self.scheduler.cancel(old);
        }
        let handle = self.scheduler.schedule(kind, delay);
        *self.timers.slot(kind) = Some(handle);
    }

    fn respawn_delay(&mut self, (min, max): (u64, u64)) -> Duration {
        Duration::from_secs(self.rng.gen_range(min..=max))
    }

    fn cancel_all(&mut self) {
        for kind in [TimerKind::Tick, TimerKind::RegularFood, TimerKind::SpecialFood] {
            if let Some(handle) = self.timers.slot(kind).take() {
                self.scheduler.cancel(handle);
            }
        }
    }

    fn finish(&mut self, over: GameOver) {
        self.cancel_all();
        self.state.score.remember();
        self.phase = Phase::Over(over);
        info!("{over} Final score: {}", self.state.score.current);
    }
}
