use rand::Rng;
use tracing::debug;

use crate::infra::{Direction, GridBounds, Position};
use crate::state::Snake;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    Wall,
    SelfBite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Moved,
    Ate,
    /// The snake ate and no free cell is left for the next fruit.
    BoardFull,
    Collided(Collision),
}

#[derive(Debug, Clone)]
pub struct WorldState {
    pub bounds: GridBounds,
    pub snake: Snake,
    pub fruit: Position,
    pub tick: u64,
    pub score: u32,
    pub collision: Option<Collision>,
}

impl WorldState {
    /// Places the snake and the fruit at random cells.
    pub fn new<R: Rng>(
        bounds: GridBounds,
        initial_length: usize,
        heading: Direction,
        rng: &mut R,
    ) -> Self {
        let head = Position::new(
            rng.random_range(0..bounds.size()),
            rng.random_range(0..bounds.size()),
        );
        let mut world = Self::with_snake(bounds, Snake::with_heading(head, initial_length, heading), head);
        world.place_fruit(rng);
        world
    }

    /// Deterministic setup, fruit given by the caller.
    pub fn with_snake(bounds: GridBounds, snake: Snake, fruit: Position) -> Self {
        Self {
            bounds,
            snake,
            fruit,
            tick: 0,
            score: 0,
            collision: None,
        }
    }

    /// Cells the planner must avoid, head first.
    pub fn obstacles(&self) -> &[Position] {
        self.snake.body()
    }

    pub fn free_cells(&self) -> Vec<Position> {
        self.bounds
            .cells()
            .filter(|cell| !self.snake.occupies(cell))
            .collect()
    }

    /// Moves the fruit to a random free cell. Returns false when the snake
    /// covers the whole board.
    pub fn place_fruit<R: Rng>(&mut self, rng: &mut R) -> bool {
        let free = self.free_cells();
        if free.is_empty() {
            return false;
        }
        self.fruit = free[rng.random_range(0..free.len())];
        true
    }

    /// Advances one tick in `direction`. A reversal of the current heading is
    /// ignored. Once collided the world no longer changes.
    pub fn step<R: Rng>(&mut self, direction: Direction, rng: &mut R) -> StepOutcome {
        if let Some(collision) = self.collision {
            return StepOutcome::Collided(collision);
        }

        self.snake.turn(direction);
        let head = self.snake.next_head();
        self.tick += 1;

        if self.snake.bites_itself_at(&head) {
            debug!(tick = self.tick, %head, "Snake bit itself");
            self.collision = Some(Collision::SelfBite);
            return StepOutcome::Collided(Collision::SelfBite);
        }

        if !self.bounds.is_inside(&head) {
            debug!(tick = self.tick, %head, "Snake hit the wall");
            self.collision = Some(Collision::Wall);
            return StepOutcome::Collided(Collision::Wall);
        }

        if head != self.fruit {
            self.snake.advance(false);
            return StepOutcome::Moved;
        }

        let grow = self.snake.len() < self.bounds.cell_count();
        self.snake.advance(grow);
        self.score += 1;

        if self.place_fruit(rng) {
            StepOutcome::Ate
        } else {
            StepOutcome::BoardFull
        }
    }

    pub fn draw_ascii_map(&self) -> String {
        let mut output = String::new();

        // ANSI color codes
        const RESET: &str = "\x1b[0m";
        const HEAD: &str = "\x1b[1;33m"; // Bright yellow
        const BODY: &str = "\x1b[33m"; // Yellow
        const FRUIT: &str = "\x1b[1;31m"; // Bright red
        const EMPTY: &str = "\x1b[90m"; // Dark gray

        let head = self.snake.head();

        // Top row first, up is +y.
        for y in (0..self.bounds.size()).rev() {
            for x in 0..self.bounds.size() {
                let pos = Position::new(x, y);

                if pos == head {
                    output.push_str(&format!("{}@{}", HEAD, RESET));
                } else if self.snake.occupies(&pos) {
                    output.push_str(&format!("{}o{}", BODY, RESET));
                } else if pos == self.fruit {
                    output.push_str(&format!("{}*{}", FRUIT, RESET));
                } else {
                    output.push_str(&format!("{}·{}", EMPTY, RESET));
                }
            }
            output.push('\n');
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn world(head: Position, length: usize, fruit: Position) -> WorldState {
        WorldState::with_snake(GridBounds::new(5), Snake::new(head, length), fruit)
    }

    #[test]
    fn test_new_world_keeps_fruit_off_snake() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let world = WorldState::new(GridBounds::new(4), 3, Direction::Right, &mut rng);
            assert!(world.bounds.is_inside(&world.snake.head()));
            assert!(!world.snake.occupies(&world.fruit));
        }
    }

    #[test]
    fn test_step_moves_without_growing() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut world = world(Position::new(1, 1), 3, Position::new(4, 4));

        assert_eq!(world.step(Direction::Right, &mut rng), StepOutcome::Moved);
        assert_eq!(world.snake.head(), Position::new(2, 1));
        assert_eq!(world.snake.len(), 3);
        assert_eq!(world.tick, 1);
    }

    #[test]
    fn test_eating_grows_and_relocates_fruit() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut world = world(Position::new(1, 1), 1, Position::new(2, 1));

        assert_eq!(world.step(Direction::Right, &mut rng), StepOutcome::Ate);
        assert_eq!(world.score, 1);
        assert_eq!(world.snake.len(), 2);
        assert!(!world.snake.occupies(&world.fruit));
    }

    #[test]
    fn test_wall_collision_freezes_world() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut world = world(Position::new(4, 0), 1, Position::new(0, 4));

        assert_eq!(
            world.step(Direction::Right, &mut rng),
            StepOutcome::Collided(Collision::Wall)
        );
        assert_eq!(world.collision, Some(Collision::Wall));
        assert_eq!(world.snake.head(), Position::new(4, 0));
    }

    #[test]
    fn test_biting_the_tail_is_a_collision() {
        let mut rng = StdRng::seed_from_u64(9);
        let bounds = GridBounds::new(5);
        let mut snake = Snake::new(Position::new(1, 1), 4);
        // Unfold into a line, then curl back into the tail.
        snake.advance(false);
        snake.advance(false);
        snake.advance(false);
        let mut world = WorldState::with_snake(bounds, snake, Position::new(4, 4));

        world.step(Direction::Up, &mut rng);
        world.step(Direction::Left, &mut rng);
        assert_eq!(
            world.step(Direction::Down, &mut rng),
            StepOutcome::Collided(Collision::SelfBite)
        );
    }

    #[test]
    fn test_filling_the_board_wins() {
        let mut rng = StdRng::seed_from_u64(11);
        let bounds = GridBounds::new(2);
        let mut snake = Snake::new(Position::new(0, 0), 3);
        snake.advance(false); // (1,0),(0,0),(0,0)
        snake.turn(Direction::Up);
        snake.advance(false); // (1,1),(1,0),(0,0)
        let mut world = WorldState::with_snake(bounds, snake, Position::new(0, 1));

        assert_eq!(world.step(Direction::Left, &mut rng), StepOutcome::BoardFull);
        assert_eq!(world.snake.len(), 4);
    }

    #[test]
    fn test_ascii_map_draws_top_row_first() {
        let world = WorldState::with_snake(
            GridBounds::new(2),
            Snake::new(Position::new(0, 0), 1),
            Position::new(1, 1),
        );
        let map = world.draw_ascii_map();
        let rows: Vec<&str> = map.lines().collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].contains('*'));
        assert!(rows[1].contains('@'));
    }
}
