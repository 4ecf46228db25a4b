use crate::infra::{Direction, Position};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    /// Head first.
    body: Vec<Position>,
    heading: Direction,
}

impl Snake {
    /// A fresh snake: every segment stacked on `head`, moving right.
    pub fn new(head: Position, length: usize) -> Self {
        Self::with_heading(head, length, Direction::Right)
    }

    /// Stacked like `new`, keeping a heading from an earlier round.
    pub fn with_heading(head: Position, length: usize, heading: Direction) -> Self {
        Self {
            body: vec![head; length.max(1)],
            heading,
        }
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn body(&self) -> &[Position] {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    /// Only perpendicular turns are accepted; a reversal keeps the heading.
    pub fn turn(&mut self, direction: Direction) -> bool {
        if direction == self.heading.opposite() {
            return false;
        }
        self.heading = direction;
        true
    }

    pub fn next_head(&self) -> Position {
        self.head().step(self.heading)
    }

    /// Segments the head can bite, i.e. everything behind it as of this tick.
    pub fn bites_itself_at(&self, pos: &Position) -> bool {
        self.body[1..].contains(pos)
    }

    pub fn occupies(&self, pos: &Position) -> bool {
        self.body.contains(pos)
    }

    /// Moves one cell along the heading. Each segment takes its leader's old
    /// cell; when growing the old tail cell is kept as a new segment.
    pub fn advance(&mut self, grow: bool) {
        let head = self.next_head();
        self.body.insert(0, head);
        if !grow {
            self.body.pop();
        }
    }
}
