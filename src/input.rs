use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::config::CELL_WIDTH;
use crate::snake::Heading;

/// What a terminal event asks the game to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// A key or gesture with a direction
    Steer(Heading),
    /// Any other key or a tap: only meaningful while idle
    Start,
    Quit,
    Redraw,
    None,
}

/// Turns key presses and mouse drags into commands. A drag from press to
/// release is treated like a touch swipe.
#[derive(Debug, Default)]
pub struct InputHandler {
    swipe_start: Option<(u16, u16)>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_event(&mut self, event: Event) -> Command {
        match event {
            Event::Key(key) => handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(_, _) => Command::Redraw,
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Command {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.swipe_start = Some((mouse.column, mouse.row));
                Command::None
            }
            MouseEventKind::Up(MouseButton::Left) => match self.swipe_start.take() {
                Some(start) => match classify_swipe(start, (mouse.column, mouse.row)) {
                    Some(heading) => Command::Steer(heading),
                    None => Command::Start,
                },
                None => Command::None,
            },
            _ => Command::None,
        }
    }
}

fn handle_key(key: KeyEvent) -> Command {
    if is_ctrl_c(&key) {
        return Command::Quit;
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Command::Steer(Heading::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Command::Steer(Heading::Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Command::Steer(Heading::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Command::Steer(Heading::Right),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Command::Quit,
        _ => Command::Start,
    }
}

/// Direction of a drag from `start` to `end`, by whichever axis moved further
/// on the grid (`CELL_WIDTH` columns span one cell, a row spans one cell).
/// Ties go vertical; a drag that did not move is a tap and has no direction.
pub fn classify_swipe(start: (u16, u16), end: (u16, u16)) -> Option<Heading> {
    let dx = end.0 as i32 - start.0 as i32;
    let dy = end.1 as i32 - start.1 as i32;

    if dx == 0 && dy == 0 {
        None
    } else if dx.abs() > dy.abs() * CELL_WIDTH as i32 {
        Some(if dx > 0 { Heading::Right } else { Heading::Left })
    } else {
        Some(if dy > 0 { Heading::Down } else { Heading::Up })
    }
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent { kind, column, row, modifiers: KeyModifiers::NONE })
    }

    #[test]
    fn test_arrow_keys() {
        let mut handler = InputHandler::new();
        assert_eq!(handler.handle_event(key(KeyCode::Up)), Command::Steer(Heading::Up));
        assert_eq!(handler.handle_event(key(KeyCode::Down)), Command::Steer(Heading::Down));
        assert_eq!(handler.handle_event(key(KeyCode::Left)), Command::Steer(Heading::Left));
        assert_eq!(handler.handle_event(key(KeyCode::Right)), Command::Steer(Heading::Right));
    }

    #[test]
    fn test_wasd_keys() {
        let mut handler = InputHandler::new();
        assert_eq!(handler.handle_event(key(KeyCode::Char('w'))), Command::Steer(Heading::Up));
        assert_eq!(handler.handle_event(key(KeyCode::Char('A'))), Command::Steer(Heading::Left));
        assert_eq!(handler.handle_event(key(KeyCode::Char('s'))), Command::Steer(Heading::Down));
        assert_eq!(handler.handle_event(key(KeyCode::Char('d'))), Command::Steer(Heading::Right));
    }

    #[test]
    fn test_quit_keys() {
        let mut handler = InputHandler::new();
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));

        assert_eq!(handler.handle_event(ctrl_c), Command::Quit);
        assert_eq!(handler.handle_event(key(KeyCode::Esc)), Command::Quit);
        assert_eq!(handler.handle_event(key(KeyCode::Char('q'))), Command::Quit);
    }

    #[test]
    fn test_other_keys_start() {
        let mut handler = InputHandler::new();
        assert_eq!(handler.handle_event(key(KeyCode::Enter)), Command::Start);
        assert_eq!(handler.handle_event(key(KeyCode::Char(' '))), Command::Start);
        assert_eq!(handler.handle_event(key(KeyCode::Char('c'))), Command::Start);
    }

    #[test]
    fn test_resize_redraws() {
        let mut handler = InputHandler::new();
        assert_eq!(handler.handle_event(Event::Resize(80, 24)), Command::Redraw);
    }

    #[test]
    fn test_classify_swipe() {
        assert_eq!(classify_swipe((10, 10), (20, 12)), Some(Heading::Right));
        assert_eq!(classify_swipe((10, 10), (2, 7)), Some(Heading::Left));
        assert_eq!(classify_swipe((10, 10), (11, 15)), Some(Heading::Down));
        assert_eq!(classify_swipe((10, 10), (9, 3)), Some(Heading::Up));
        assert_eq!(classify_swipe((10, 10), (13, 13)), Some(Heading::Down));
        assert_eq!(classify_swipe((10, 10), (10, 10)), None);
    }

    #[test]
    fn test_classify_swipe_in_grid_cells() {
        // 3 columns is 1.5 cells across, 2 rows is 2 cells down
        assert_eq!(classify_swipe((5, 5), (8, 7)), Some(Heading::Down));
        assert_eq!(classify_swipe((8, 7), (5, 5)), Some(Heading::Up));
        // 4 columns and 2 rows are both 2 cells
        assert_eq!(classify_swipe((5, 5), (9, 7)), Some(Heading::Down));
        assert_eq!(classify_swipe((5, 5), (10, 7)), Some(Heading::Right));
        assert_eq!(classify_swipe((10, 5), (5, 7)), Some(Heading::Left));
    }

    #[test]
    fn test_mouse_swipe() {
        let mut handler = InputHandler::new();

        assert_eq!(handler.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 5, 5)), Command::None);
        assert_eq!(handler.handle_event(mouse(MouseEventKind::Drag(MouseButton::Left), 8, 5)), Command::None);
        assert_eq!(
            handler.handle_event(mouse(MouseEventKind::Up(MouseButton::Left), 12, 6)),
            Command::Steer(Heading::Right)
        );
    }

    #[test]
    fn test_mouse_tap_starts() {
        let mut handler = InputHandler::new();
        handler.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 5, 5));
        assert_eq!(handler.handle_event(mouse(MouseEventKind::Up(MouseButton::Left), 5, 5)), Command::Start);
    }

    #[test]
    fn test_release_without_press_ignored() {
        let mut handler = InputHandler::new();
        assert_eq!(handler.handle_event(mouse(MouseEventKind::Up(MouseButton::Left), 1, 1)), Command::None);
    }
}
