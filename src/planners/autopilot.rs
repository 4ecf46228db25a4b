use tracing::debug;

use crate::infra::{AStar, Direction, ObstacleSet, Position, Relaxation, next_direction};
use crate::state::WorldState;

/// What to do on a tick where the fruit cannot be reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Keep moving in the current heading.
    HoldHeading,
    /// Move into the open cell with the most room around it.
    #[default]
    Survive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub direction: Direction,
    pub route: Vec<Position>,
    pub expansions: usize,
    pub used_fallback: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Autopilot {
    relaxation: Relaxation,
    fallback: FallbackPolicy,
}

impl Autopilot {
    pub fn new(relaxation: Relaxation, fallback: FallbackPolicy) -> Self {
        Self {
            relaxation,
            fallback,
        }
    }

    /// Plans from scratch against the current board and picks this tick's move.
    pub fn decide(&self, world: &WorldState) -> Decision {
        let head = world.snake.head();
        let obstacles = planning_obstacles(world);

        let report = AStar::search(head, world.fruit, &obstacles, world.bounds, self.relaxation);

        if let Some(direction) = next_direction(&report.route, head) {
            return Decision {
                direction,
                route: report.route,
                expansions: report.expansions,
                used_fallback: false,
            };
        }

        let direction = match self.fallback {
            FallbackPolicy::HoldHeading => world.snake.heading(),
            FallbackPolicy::Survive => survival_direction(world),
        };
        debug!(
            tick = world.tick,
            fruit = %world.fruit,
            ?direction,
            policy = ?self.fallback,
            "Fruit unreachable, using fallback"
        );

        Decision {
            direction,
            route: Vec::new(),
            expansions: report.expansions,
            used_fallback: true,
        }
    }
}

/// The body, plus the cell straight behind the head: the snake cannot reverse,
/// so a route starting there could never be followed.
fn planning_obstacles(world: &WorldState) -> Vec<Position> {
    let mut obstacles = world.obstacles().to_vec();
    let behind = world.snake.head().step(world.snake.heading().opposite());
    if !obstacles.contains(&behind) {
        obstacles.push(behind);
    }
    obstacles
}

fn survival_direction(world: &WorldState) -> Direction {
    let obstacles = ObstacleSet::new(world.obstacles());
    let head = world.snake.head();
    let heading = world.snake.heading();

    let mut best: Option<(Direction, usize)> = None;
    for direction in Direction::ALL {
        if direction == heading.opposite() {
            continue;
        }
        let target = head.step(direction);
        if !obstacles.is_walkable(&world.bounds, &target) {
            continue;
        }
        let room = obstacles
            .walkable_neighbors(&world.bounds, target)
            .filter(|cell| *cell != head)
            .count();
        if best.is_none_or(|(_, best_room)| room > best_room) {
            best = Some((direction, room));
        }
    }

    best.map(|(direction, _)| direction).unwrap_or(heading)
}
