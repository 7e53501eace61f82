//! Turns a [`GameState`] into a [`Frame`] of styled glyphs. Nothing here
//! touches the terminal, so what the player sees can be checked in tests.

use crate::config::CELL_WIDTH;
use crate::game::{GameState, RunState};
use crate::{Coords, TermInt};

pub const BANNER: &str = "Game Over! Press any key to start";
const BANNER_SHORT: [&str; 2] = ["Game Over!", "Press any key to start"];

/// Colour roles; the terminal decides the actual colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    Background,
    Head,
    Body,
    Food,
    Banner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    pub paint: Paint,
}

const EMPTY: Glyph = Glyph { ch: ' ', paint: Paint::Background };

/// The play area, one row per grid row and `CELL_WIDTH` columns per grid column,
/// plus the status line shown beneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: TermInt,
    height: TermInt,
    glyphs: Vec<Glyph>,
    pub status: String,
}

impl Frame {
    fn blank(width: TermInt, height: TermInt) -> Self {
        Frame {
            width,
            height,
            glyphs: vec![EMPTY; width as usize * height as usize],
            status: String::new(),
        }
    }

    pub fn width(&self) -> TermInt {
        self.width
    }

    pub fn height(&self) -> TermInt {
        self.height
    }

    pub fn glyph(&self, x: TermInt, y: TermInt) -> Glyph {
        self.glyphs[self.width as usize * y as usize + x as usize]
    }

    /// One row as plain text
    #[cfg(test)]
    pub fn row_text(&self, y: TermInt) -> String {
        (0..self.width).map(|x| self.glyph(x, y).ch).collect()
    }

    fn put(&mut self, x: TermInt, y: TermInt, glyph: Glyph) {
        if x < self.width && y < self.height {
            let w = self.width as usize;
            self.glyphs[w * y as usize + x as usize] = glyph;
        }
    }

    /// A bordered square: `[` and `]` drawn over the cell's fill colour.
    fn put_cell(&mut self, (cx, cy): Coords, paint: Paint) {
        if cx < 0 || cy < 0 {
            return;
        }
        let x = cx as TermInt * CELL_WIDTH;
        let y = cy as TermInt;
        self.put(x, y, Glyph { ch: '[', paint });
        self.put(x + 1, y, Glyph { ch: ']', paint });
    }

    fn put_text_centered(&mut self, y: TermInt, text: &str, paint: Paint) {
        let len = text.chars().count() as TermInt;
        let x0 = self.width.saturating_sub(len) / 2;
        for (i, ch) in text.chars().enumerate() {
            self.put(x0 + i as TermInt, y, Glyph { ch, paint });
        }
    }
}

pub fn render(state: &GameState) -> Frame {
    let width = state.grid.width * CELL_WIDTH;
    let height = state.grid.height;
    let mut frame = Frame::blank(width, height);

    match state.run_state {
        RunState::Idle => {
            let lines: &[&str] = if BANNER.len() as TermInt <= width { &[BANNER] } else { &BANNER_SHORT };
            let top = (height.saturating_sub(lines.len() as TermInt)) / 2;
            for (i, line) in lines.iter().enumerate() {
                frame.put_text_centered(top + i as TermInt, line, Paint::Banner);
            }
        }
        RunState::Running => {
            for (i, &pos) in state.snake.body().iter().enumerate() {
                frame.put_cell(pos, if i == 0 { Paint::Head } else { Paint::Body });
            }
            frame.put_cell(state.food, Paint::Food);
        }
    }

    frame.status = format!("Score: {}  High Score: {}", state.score, state.high_score);
    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use crate::snake::{Heading, Snake};

    fn running_state() -> GameState {
        let mut state = GameState::new(GridConfig::default(), (3, 4), 7);
        state.snake = Snake::from_segments(vec![(10, 9), (9, 9)]);
        state.heading = Heading::Right;
        state.run_state = RunState::Running;
        state.score = 2;
        state
    }

    #[test]
    fn test_frame_size() {
        let frame = render(&running_state());
        assert_eq!(frame.width(), 36);
        assert_eq!(frame.height(), 18);
    }

    #[test]
    fn test_idle_shows_banner() {
        let state = GameState::new(GridConfig::default(), (3, 4), 0);
        let frame = render(&state);

        let rows: Vec<String> = (0..frame.height()).map(|y| frame.row_text(y)).collect();
        let banner_row = rows.iter().position(|r| r.contains(BANNER)).expect("banner drawn");
        assert_eq!(banner_row, 8);

        // Nothing of the snake or food while idle
        assert!(rows.iter().all(|r| !r.contains('[')));
    }

    #[test]
    fn test_narrow_grid_splits_banner() {
        let state = GameState::new(GridConfig::new(12, 6), (0, 0), 0);
        let frame = render(&state);

        assert_eq!(frame.row_text(2).trim(), "Game Over!");
        assert_eq!(frame.row_text(3).trim(), "Press any key to start");
    }

    #[test]
    fn test_running_draws_snake_and_food() {
        let frame = render(&running_state());

        assert_eq!(frame.glyph(20, 9), Glyph { ch: '[', paint: Paint::Head });
        assert_eq!(frame.glyph(21, 9), Glyph { ch: ']', paint: Paint::Head });
        assert_eq!(frame.glyph(18, 9), Glyph { ch: '[', paint: Paint::Body });
        assert_eq!(frame.glyph(6, 4), Glyph { ch: '[', paint: Paint::Food });
        assert_eq!(frame.glyph(0, 0), EMPTY);
    }

    #[test]
    fn test_food_under_snake_is_drawn_on_top() {
        let mut state = running_state();
        state.food = (9, 9);
        let frame = render(&state);
        assert_eq!(frame.glyph(18, 9).paint, Paint::Food);
    }

    #[test]
    fn test_status_line() {
        let frame = render(&running_state());
        assert_eq!(frame.status, "Score: 2  High Score: 7");
    }

    #[test]
    fn test_render_is_pure() {
        let state = running_state();
        let before = state.clone();
        let _ = render(&state);
        assert_eq!(state, before);
    }
}
