use crate::game::{RoundSummary, RunSummary};
use crate::infra::{Direction, Position};
use crate::state::WorldState;

/// Trait for observing game events during execution
pub trait GameObserver {
    /// Called once before the first round
    fn on_game_start(&mut self, seed: u64, grid_size: i32, rounds: u32);

    /// Called after the board is reset for a new round
    fn on_round_start(&mut self, round: u32, world: &WorldState);

    /// Called at the start of every tick, before planning
    fn on_state_update(&mut self, world: &WorldState);

    /// Called when the planner found a route to the fruit
    fn on_path_planned(&mut self, _route: &[Position], _world: &WorldState) {
        // Default implementation does nothing
    }

    /// Called when the direction for this tick is chosen
    fn on_direction_selected(&mut self, direction: Direction, fallback: bool, world: &WorldState);

    /// Called when a round ends
    fn on_round_finished(&mut self, summary: &RoundSummary, world: &WorldState);

    /// Called after the last round
    fn on_game_finished(&mut self, summary: &RunSummary);
}
