mod snake;
mod world_state;

pub use snake::Snake;
pub use world_state::{Collision, StepOutcome, WorldState};
