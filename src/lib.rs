pub mod config;
pub mod game;
pub mod infra;
pub mod planners;
pub mod state;

// Re-export commonly used types for convenience
pub use config::{ConfigError, GameConfig};
pub use game::{Game, RoundOutcome, RoundSummary, RunSummary};
pub use infra::{AStar, Direction, GridBounds, Position, next_direction};
pub use state::WorldState;
