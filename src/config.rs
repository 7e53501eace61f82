use std::path::PathBuf;
use std::time::Duration;

use anyhow::{ensure, Result};
use clap::Parser;

use crate::{Coords, TermInt};

pub const DEFAULT_GRID_SIZE: u16 = 18;
pub const DEFAULT_TICK_MS: u64 = 100;
pub const DEFAULT_SCORE_FILE: &str = ".snake_highscore.json";

/// Terminal columns used by one grid cell; terminal glyphs are about twice as tall as wide.
pub const CELL_WIDTH: TermInt = 2;

#[derive(Parser, Debug)]
#[command(name = "grid-snake")]
#[command(version, about = "Snake on a fixed grid, in the terminal")]
pub struct Cli {
    /// Grid width in cells
    #[arg(long, default_value_t = DEFAULT_GRID_SIZE)]
    pub width: u16,

    /// Grid height in cells
    #[arg(long, default_value_t = DEFAULT_GRID_SIZE)]
    pub height: u16,

    /// Milliseconds between game steps
    #[arg(long, default_value_t = DEFAULT_TICK_MS)]
    pub tick_ms: u64,

    /// Where the high score is kept
    #[arg(long, default_value = DEFAULT_SCORE_FILE)]
    pub score_file: PathBuf,

    /// Keep the high score in memory only
    #[arg(long)]
    pub no_save: bool,

    /// Disable all sound
    #[arg(long)]
    pub mute: bool,

    /// Sound played when food is eaten (synthesized if omitted)
    #[arg(long)]
    pub food_sound: Option<PathBuf>,

    /// Sound played on collision (synthesized if omitted)
    #[arg(long)]
    pub game_over_sound: Option<PathBuf>,

    /// Looping background music (synthesized if omitted)
    #[arg(long)]
    pub music: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Size of the playing field, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridConfig {
    pub width: u16,
    pub height: u16,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig { width: DEFAULT_GRID_SIZE, height: DEFAULT_GRID_SIZE }
    }
}

impl GridConfig {
    pub fn new(width: u16, height: u16) -> Self {
        GridConfig { width, height }
    }

    /// The cell a fresh snake starts from.
    pub fn start_cell(&self) -> Coords {
        (self.width as i32 / 2, self.height as i32 / 2)
    }

    pub fn contains(&self, (x, y): Coords) -> bool {
        x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32
    }

    /// Terminal area needed to show the grid with its border and the status line.
    pub fn required_term_size(&self) -> (TermInt, TermInt) {
        (self.width * CELL_WIDTH + 2, self.height + 3)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioConfig {
    pub muted: bool,
    pub food: Option<PathBuf>,
    pub game_over: Option<PathBuf>,
    pub music: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub grid: GridConfig,
    pub tick: Duration,
    /// `None` keeps the high score in memory
    pub score_file: Option<PathBuf>,
    pub audio: AudioConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            grid: GridConfig::default(),
            tick: Duration::from_millis(DEFAULT_TICK_MS),
            score_file: Some(PathBuf::from(DEFAULT_SCORE_FILE)),
            audio: AudioConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config = GameConfig {
            grid: GridConfig::new(cli.width, cli.height),
            tick: Duration::from_millis(cli.tick_ms),
            score_file: if cli.no_save { None } else { Some(cli.score_file.clone()) },
            audio: AudioConfig {
                muted: cli.mute,
                food: cli.food_sound.clone(),
                game_over: cli.game_over_sound.clone(),
                music: cli.music.clone(),
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.grid.width > 0 && self.grid.height > 0, "grid must be at least 1x1, got {}x{}", self.grid.width, self.grid.height);
        ensure!(self.grid.width <= 500 && self.grid.height <= 500, "grid of {}x{} is too large", self.grid.width, self.grid.height);
        ensure!(!self.tick.is_zero(), "tick period must be positive");
        Ok(())
    }

    /// Fails when the terminal is too small for the configured grid.
    pub fn check_fits(&self, term_size: (TermInt, TermInt)) -> Result<()> {
        let (need_w, need_h) = self.grid.required_term_size();
        ensure!(
            term_size.0 >= need_w && term_size.1 >= need_h,
            "terminal is {}x{} but a {}x{} grid needs at least {}x{}",
            term_size.0, term_size.1, self.grid.width, self.grid.height, need_w, need_h
        );
        Ok(())
    }
}
