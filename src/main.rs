mod config;
mod food;
mod game;
mod grid;
mod render;
mod shrink;
mod snake;
mod timers;
mod ui;

use std::fs::File;

use clap::Parser;
use color_eyre::eyre::Context as _;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use simplelog::{Config, WriteLogger};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let options = config::Options::parse();

    let log_file = File::create(&options.log_file)
        .wrap_err_with(|| format!("Failed to create log file: {}", options.log_file.display()))?;
    WriteLogger::init(options.log_level, Config::default(), log_file)
        .wrap_err("Failed to initialize logger")?;

    info!("Starting shrinksnek with {options:?}");

    let rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut game = game::Game::new(rng, options.tick_interval());
    ui::run(&mut game).wrap_err("Terminal session failed")?;

    if let Some(previous) = game.state().score.previous {
        println!("\nLast game's score: {previous}");
    }
    println!("Final score: {}", game.score());
    Ok(())
}
