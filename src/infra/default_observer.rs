use tracing::{debug, info};

use crate::game::{RoundOutcome, RoundSummary, RunSummary};
use crate::infra::{Direction, GameObserver, Position};
use crate::state::WorldState;

pub struct DefaultObserver;

impl GameObserver for DefaultObserver {
    fn on_game_start(&mut self, seed: u64, grid_size: i32, rounds: u32) {
        info!("Game started");
        info!("- seed: {}", seed);
        info!("- grid size: {}x{}", grid_size, grid_size);
        info!("- rounds: {}", rounds);
    }

    fn on_round_start(&mut self, round: u32, world: &WorldState) {
        info!(
            "Round {} started, head at {}, fruit at {}",
            round,
            world.snake.head(),
            world.fruit
        );
    }

    fn on_state_update(&mut self, world: &WorldState) {
        debug!(
            "tick: {}, head: {}, length: {}, score: {}",
            world.tick,
            world.snake.head(),
            world.snake.len(),
            world.score
        );
        debug!("\n{}", world.draw_ascii_map());
    }

    fn on_path_planned(&mut self, route: &[Position], _world: &WorldState) {
        debug!("Route to fruit: {} steps", route.len());
    }

    fn on_direction_selected(&mut self, direction: Direction, fallback: bool, _world: &WorldState) {
        if fallback {
            info!("No route to fruit, moving {}", direction.as_str());
        } else {
            debug!("direction: {}", direction.as_str());
        }
    }

    fn on_round_finished(&mut self, summary: &RoundSummary, world: &WorldState) {
        let outcome = match summary.outcome {
            RoundOutcome::Won => "board filled".to_string(),
            RoundOutcome::Lost(collision) => format!("collision ({:?})", collision),
            RoundOutcome::TimedOut => "tick limit".to_string(),
        };
        info!(
            "Round {} finished: {} after {} ticks, score {}, length {}, {} fallback ticks",
            summary.round,
            outcome,
            summary.ticks,
            summary.score,
            summary.length,
            summary.fallback_ticks
        );
        debug!("\n{}", world.draw_ascii_map());
    }

    fn on_game_finished(&mut self, summary: &RunSummary) {
        info!(
            "Game finished: {} rounds, {} won, {} lost, {} timed out",
            summary.rounds, summary.wins, summary.losses, summary.timeouts
        );
        info!("Best score: {}", summary.best_score);
        info!("Total ticks: {}", summary.total_ticks);
    }
}
