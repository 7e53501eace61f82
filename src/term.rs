use crate::render::{Frame, Glyph, Paint};
use crate::TermInt;
use std::{io::{Stdout, Write, stdout}, time::Duration};

use anyhow::{Context, Result};
use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::style::{Color, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};

const BACKGROUND: Color = Color::Rgb { r: 0x1e, g: 0x1e, b: 0x1e };

/// Owns the terminal while the game runs. The play area sits inside a
/// border at the top-left, with the status line under it.
pub struct TermManager {
    stdout: Stdout,
    last: Option<Frame>,
    active: bool,
}

impl TermManager {
    pub fn new() -> Self {
        TermManager { stdout: stdout(), last: None, active: false }
    }

    pub fn size() -> Result<(TermInt, TermInt)> {
        terminal::size().context("Error reading terminal size")
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen, EnableMouseCapture)
            .context("Error entering alt screen")?;
        // From here on `restore` has something to undo
        self.active = true;
        terminal::enable_raw_mode().context("Error setting raw mode")?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)
            .context("Error hiding cursor")?;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        // Leave the alt screen even if raw mode was never entered
        let raw = terminal::disable_raw_mode().context("Error unsetting raw mode");
        execute!(
            self.stdout,
            style::ResetColor,
            cursor::Show,
            cursor::EnableBlinking,
            DisableMouseCapture,
            LeaveAlternateScreen
        )
        .context("Error leaving alt screen")?;
        raw
    }

    /// Wait up to `timeout` for the next terminal event.
    pub fn next_event(&self, timeout: Duration) -> Result<Option<Event>> {
        if event::poll(timeout).context("Error polling events")? {
            Ok(Some(event::read().context("Error reading event")?))
        } else {
            Ok(None)
        }
    }

    /// Forget what is on screen so the next `present` repaints everything.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Draw `frame`, rewriting only glyphs that differ from the previous frame.
    pub fn present(&mut self, frame: &Frame) -> Result<()> {
        let full = !matches!(&self.last, Some(last) if last.width() == frame.width() && last.height() == frame.height());

        if full {
            queue!(self.stdout, style::ResetColor, terminal::Clear(ClearType::All))?;
            self.draw_borders(frame.width() + 2, frame.height() + 2)?;
        }

        for y in 0..frame.height() {
            for x in 0..frame.width() {
                let glyph = frame.glyph(x, y);
                let unchanged = !full && self.last.as_ref().map(|last| last.glyph(x, y)) == Some(glyph);
                if !unchanged {
                    self.print_glyph((x + 1, y + 1), glyph)?;
                }
            }
        }

        let status_changed = full || self.last.as_ref().map(|last| &last.status) != Some(&frame.status);
        if status_changed {
            queue!(
                self.stdout,
                style::ResetColor,
                cursor::MoveTo(0, frame.height() + 2),
                terminal::Clear(ClearType::CurrentLine),
                style::Print(&frame.status)
            )?;
        }

        self.flush()?;
        self.last = Some(frame.clone());
        Ok(())
    }

    ///////////////////////////////////////////////////////////////////////////

    fn draw_borders(&mut self, width: TermInt, height: TermInt) -> Result<()> {
        let end_x = width - 1;
        let end_y = height - 1;

        queue!(self.stdout, style::ResetColor)?;
        for x in 0..width {
            let ch = if x == 0 || x == end_x {'+'} else {'-'};
            queue!(self.stdout, cursor::MoveTo(x, 0), style::Print(ch))?;
            queue!(self.stdout, cursor::MoveTo(x, end_y), style::Print(ch))?;
        }

        for y in 1..end_y {
            queue!(self.stdout, cursor::MoveTo(0, y), style::Print('|'))?;
            queue!(self.stdout, cursor::MoveTo(end_x, y), style::Print('|'))?;
        }

        Ok(())
    }

    fn print_glyph(&mut self, pos: (TermInt, TermInt), glyph: Glyph) -> Result<()> {
        let (fg, bg) = colors(glyph.paint);
        queue!(
            self.stdout,
            cursor::MoveTo(pos.0, pos.1),
            SetForegroundColor(fg),
            SetBackgroundColor(bg),
            style::Print(glyph.ch)
        )?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.stdout.flush().context("Error flushing")
    }
}

impl Drop for TermManager {
    fn drop(&mut self) {
        // Leave the user's terminal usable even when unwinding
        let _ = self.restore();
    }
}

/// (foreground, background) for a paint role
fn colors(paint: Paint) -> (Color, Color) {
    match paint {
        Paint::Background => (Color::White, BACKGROUND),
        Paint::Head => (Color::White, Color::Red),
        Paint::Body => (Color::White, Color::Rgb { r: 0x80, g: 0x00, b: 0x80 }),
        Paint::Food => (Color::Black, Color::Yellow),
        Paint::Banner => (Color::Red, BACKGROUND),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restore_without_setup_is_noop() {
        let mut term = TermManager::new();
        assert!(!term.active);
        assert!(term.restore().is_ok());
        assert!(!term.active);
    }
}
