mod composite_observer;
mod default_observer;
mod game_observer;
mod obstacles;
mod pathfinding;
mod replay;
mod types;

pub use composite_observer::CompositeObserver;
pub use default_observer::DefaultObserver;
pub use game_observer::GameObserver;
pub use obstacles::ObstacleSet;
pub use pathfinding::{AStar, NodeId, Relaxation, Score, SearchReport};
pub use replay::ReplayObserver;
pub use types::{Direction, GridBounds, Position};

// ============================================================================
// Helper functions
// ============================================================================

/// Direction of the first step of `route` as seen from `current`.
///
/// Returns `None` for an empty route. A first step that is not exactly one
/// orthogonal cell away means the planner handed back a corrupt route, which
/// is treated as fatal.
pub fn next_direction(route: &[Position], current: Position) -> Option<Direction> {
    let next = *route.first()?;
    match Direction::between(current, next) {
        Some(direction) => Some(direction),
        None => panic!(
            "route step {} is not orthogonally adjacent to {}",
            next, current
        ),
    }
}
