use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use simplelog::LevelFilter;

use crate::game::TICK_INTERVAL;

#[derive(Debug, Parser)]
#[command(name = "shrinksnek")]
#[command(about = "Snake on a board that shrinks every time you hit a wall")]
pub struct Options {
    /// Milliseconds between snake moves
    #[arg(long, default_value_t = TICK_INTERVAL.as_millis() as u64, env = "SHRINKSNEK_TICK_MS")]
    pub tick_ms: u64,

    /// Seed for food placement, for replaying a game
    #[arg(long, env = "SHRINKSNEK_SEED")]
    pub seed: Option<u64>,

    /// Where log output goes; the terminal is busy drawing the game
    #[arg(long, default_value = "shrinksnek.log")]
    pub log_file: PathBuf,

    /// off, error, warn, info, debug or trace
    #[arg(long, default_value = "info")]
    pub log_level: LevelFilter,
}

impl Options {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }
}
