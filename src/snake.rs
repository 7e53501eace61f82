use crate::Coords;

/// Direction of travel. `None` is the heading of a snake waiting for its first input.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
    None,
}

impl Heading {
    pub fn reverse(self) -> Heading {
        match self {
            Heading::Up => Heading::Down,
            Heading::Down => Heading::Up,
            Heading::Left => Heading::Right,
            Heading::Right => Heading::Left,
            Heading::None => Heading::None,
        }
    }

    /// Cell offset for one step in this direction
    pub fn delta(self) -> (i32, i32) {
        match self {
            Heading::Up => (0, -1),
            Heading::Down => (0, 1),
            Heading::Left => (-1, 0),
            Heading::Right => (1, 0),
            Heading::None => (0, 0),
        }
    }
}

/// Head-first list of occupied cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    body: Vec<Coords>,
}

impl Snake {
    pub fn new(start: Coords) -> Self {
        Snake { body: vec![start] }
    }

    /// Build a snake from explicit segments, head first. Panics on an empty list.
    #[cfg(test)]
    pub fn from_segments(segments: Vec<Coords>) -> Self {
        assert!(!segments.is_empty(), "a snake needs at least one segment");
        Snake { body: segments }
    }

    pub fn body(&self) -> &[Coords] {
        &self.body
    }

    pub fn head(&self) -> Coords {
        self.body[0]
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// The cell the head would move into. Bounds are not checked here.
    pub fn next_head(&self, heading: Heading) -> Coords {
        let (dx, dy) = heading.delta();
        let (x, y) = self.head();
        (x + dx, y + dy)
    }

    /// Whether `pos` is covered by any segment, the tail included.
    pub fn occupies(&self, pos: Coords) -> bool {
        self.body.contains(&pos)
    }

    /// Move the head into `new_head`, dropping the tail unless growing.
    /// Returns the vacated tail cell, if any.
    pub fn advance(&mut self, new_head: Coords, grow: bool) -> Option<Coords> {
        let old_tail = if grow { None } else { self.body.pop() };
        self.body.insert(0, new_head);
        old_tail
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::Heading::{Down, Left, Right, Up};

    #[test]
    fn test_reverse_pairs() {
        assert_eq!(Up.reverse(), Down);
        assert_eq!(Down.reverse(), Up);
        assert_eq!(Left.reverse(), Right);
        assert_eq!(Right.reverse(), Left);
        assert_eq!(Heading::None.reverse(), Heading::None);
    }

    #[test]
    fn test_next_head() {
        let snake = Snake::new((9, 9));
        assert_eq!(snake.next_head(Right), (10, 9));
        assert_eq!(snake.next_head(Left), (8, 9));
        assert_eq!(snake.next_head(Up), (9, 8));
        assert_eq!(snake.next_head(Down), (9, 10));
        assert_eq!(snake.next_head(Heading::None), (9, 9));
    }

    #[test]
    fn test_advance_drops_tail() {
        let mut snake = Snake::from_segments(vec![(5, 5), (4, 5), (3, 5)]);
        let tail = snake.advance((6, 5), false);

        assert_eq!(tail, Some((3, 5)));
        assert_eq!(snake.body(), &[(6, 5), (5, 5), (4, 5)]);
    }

    #[test]
    fn test_advance_grows() {
        let mut snake = Snake::new((9, 9));
        let tail = snake.advance((10, 9), true);

        assert_eq!(tail, None);
        assert_eq!(snake.body(), &[(10, 9), (9, 9)]);
    }

    #[test]
    fn test_occupies_includes_tail() {
        let snake = Snake::from_segments(vec![(5, 5), (5, 6)]);
        assert!(snake.occupies((5, 5)));
        assert!(snake.occupies((5, 6)));
        assert!(!snake.occupies((5, 7)));
    }
}
