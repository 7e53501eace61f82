mod audio;
mod config;
mod game;
mod input;
mod render;
mod score;
mod snake;
mod term;

use std::fs::File;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use crate::config::{Cli, GameConfig};
use crate::game::{Game, TickOutcome};
use crate::input::{Command, InputHandler};
use crate::score::{FileScoreStore, MemoryScoreStore, ScoreStore};
use crate::term::TermManager;

pub type TermInt = u16;
/// Grid cell as (column, row). Signed so a step off the edge is representable.
pub type Coords = (i32, i32);

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let config = GameConfig::from_cli(&cli)?;
    config.check_fits(TermManager::size()?)?;

    let store: Box<dyn ScoreStore> = match &config.score_file {
        Some(path) => Box::new(FileScoreStore::new(path)),
        None => Box::new(MemoryScoreStore::new()),
    };
    let audio = audio::open(&config.audio);
    let mut game = Game::new(config.grid, rand::thread_rng(), audio, store);

    let mut term = TermManager::new();
    term.setup()?;
    let result = run(&mut game, &mut term, &config);
    // Restore before reporting any error so it is readable
    term.restore()?;

    info!("Exiting with high score {}", game.state().high_score);
    result
}

/// The main loop: handle input until the next tick is due, then step and redraw.
fn run<R, A, S>(game: &mut Game<R, A, S>, term: &mut TermManager, config: &GameConfig) -> Result<()>
where
    R: rand::Rng,
    A: audio::AudioCues,
    S: ScoreStore,
{
    let mut input = InputHandler::new();
    let mut next_tick = Instant::now() + config.tick;

    term.present(&render::render(game.state()))?;

    loop {
        let now = Instant::now();
        if now < next_tick {
            if let Some(event) = term.next_event(next_tick - now)? {
                match input.handle_event(event) {
                    Command::Steer(heading) => game.on_direction(heading),
                    Command::Start => {
                        game.start();
                    }
                    Command::Quit => return Ok(()),
                    Command::Redraw => {
                        term.invalidate();
                        term.present(&render::render(game.state()))?;
                    }
                    Command::None => {}
                }
            }
            continue;
        }

        next_tick += config.tick;
        if next_tick < now {
            // Fell far behind (suspended terminal, slow draw); don't replay the missed ticks
            next_tick = now + config.tick;
        }
        if let TickOutcome::Collided(kind) = game.tick() {
            info!("Game over ({:?})", kind);
        }
        term.present(&render::render(game.state()))?;
    }
}

fn init_logging(cli: &Cli) -> Result<()> {
    let env = env_logger::Env::default();

    match &cli.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            env_logger::Builder::from_env(env.default_filter_or("info"))
                .target(env_logger::Target::Pipe(Box::new(file)))
                .init();
        }
        // Stderr shares the screen with the game, so stay quiet unless asked
        None => env_logger::Builder::from_env(env.default_filter_or("off")).init(),
    }

    Ok(())
}
