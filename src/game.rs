use log::{debug, info, warn};
use rand::Rng;

use crate::audio::{self, AudioCues};
use crate::config::GridConfig;
use crate::score::ScoreStore;
use crate::snake::{Heading, Snake};
use crate::Coords;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Waiting for the first input; also where a collision leaves the game
    Idle,
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    Wall,
    Body,
}

/// What a single tick did. Exactly one of these per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Idle,
    Advanced,
    Grew { new_high_score: bool },
    Collided(Collision),
}

/// Everything that changes while playing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub grid: GridConfig,
    pub snake: Snake,
    pub heading: Heading,
    pub food: Coords,
    pub score: u32,
    pub high_score: u32,
    pub run_state: RunState,
}

impl GameState {
    pub fn new(grid: GridConfig, food: Coords, high_score: u32) -> Self {
        GameState {
            grid,
            snake: Snake::new(grid.start_cell()),
            heading: Heading::None,
            food,
            score: 0,
            high_score,
            run_state: RunState::Idle,
        }
    }

    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    /// Turn towards `heading` unless that would reverse onto the snake.
    /// Returns whether the heading changed.
    pub fn steer(&mut self, heading: Heading) -> bool {
        if heading == Heading::None || heading == self.heading.reverse() || heading == self.heading {
            return false;
        }
        self.heading = heading;
        true
    }

    fn reset_after_collision(&mut self) {
        self.run_state = RunState::Idle;
        self.snake = Snake::new(self.grid.start_cell());
        self.heading = Heading::None;
        self.score = 0;
    }
}

/// Independent uniform column and row; the snake's own cells are not excluded.
pub fn random_food<R: Rng>(grid: &GridConfig, rng: &mut R) -> Coords {
    (rng.gen_range(0..grid.width as i32), rng.gen_range(0..grid.height as i32))
}

/// The game together with its collaborators: randomness, sound and the score store.
pub struct Game<R, A, S> {
    state: GameState,
    rng: R,
    audio: A,
    store: S,
}

impl<R: Rng, A: AudioCues, S: ScoreStore> Game<R, A, S> {
    /// A fresh idle game. The high score is read from `store` once, here.
    pub fn new(grid: GridConfig, mut rng: R, audio: A, store: S) -> Self {
        let high_score = store.get();
        let food = random_food(&grid, &mut rng);
        info!("New {}x{} game, high score {}", grid.width, grid.height, high_score);

        Game { state: GameState::new(grid, food, high_score), rng, audio, store }
    }

    /// Wrap an existing state, e.g. a hand-built position.
    #[cfg(test)]
    pub fn with_state(state: GameState, rng: R, audio: A, store: S) -> Self {
        Game { state, rng, audio, store }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[cfg(test)]
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    #[cfg(test)]
    pub fn audio(&self) -> &A {
        &self.audio
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Start an idle game. The snake always sets off to the right.
    /// Returns false if the game was already running.
    pub fn start(&mut self) -> bool {
        if self.state.is_running() {
            return false;
        }

        self.state.run_state = RunState::Running;
        self.state.heading = Heading::Right;
        info!("Game started");
        audio::discard("music", self.audio.play_music());
        true
    }

    /// Apply a player's directional request. An idle game is started instead of steered.
    pub fn on_direction(&mut self, heading: Heading) {
        if !self.start() && self.state.steer(heading) {
            debug!("Heading now {:?}", heading);
        }
    }

    /// Advance one step.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.is_running() {
            return TickOutcome::Idle;
        }

        let state = &mut self.state;
        let new_head = state.snake.next_head(state.heading);

        let collision = if !state.grid.contains(new_head) {
            Some(Collision::Wall)
        } else if state.snake.occupies(new_head) {
            Some(Collision::Body)
        } else {
            None
        };

        if let Some(kind) = collision {
            info!("Collision ({:?}) at {:?} with score {}", kind, new_head, state.score);
            audio::discard("game over", self.audio.play_game_over());
            audio::discard("music", self.audio.pause_music());
            self.state.reset_after_collision();
            return TickOutcome::Collided(kind);
        }

        let ate = new_head == state.food;
        let outcome = if ate {
            state.score += 1;
            state.food = random_food(&state.grid, &mut self.rng);
            debug!("Ate food, score {}, next food at {:?}", state.score, state.food);
            audio::discard("food", self.audio.play_food());

            let new_high_score = state.score > state.high_score;
            if new_high_score {
                state.high_score = state.score;
                if let Err(err) = self.store.set(state.high_score) {
                    warn!("Could not save high score: {:#}", err);
                }
            }
            TickOutcome::Grew { new_high_score }
        } else {
            TickOutcome::Advanced
        };

        state.snake.advance(new_head, ate);
        outcome
    }
}
