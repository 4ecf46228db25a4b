use crate::game::{RoundSummary, RunSummary};
use crate::infra::{Direction, GameObserver, Position};
use crate::state::WorldState;

pub struct CompositeObserver {
    observers: Vec<Box<dyn GameObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Box<dyn GameObserver>>) -> Self {
        Self { observers }
    }
}

impl GameObserver for CompositeObserver {
    fn on_game_start(&mut self, seed: u64, grid_size: i32, rounds: u32) {
        for observer in &mut self.observers {
            observer.on_game_start(seed, grid_size, rounds);
        }
    }

    fn on_round_start(&mut self, round: u32, world: &WorldState) {
        for observer in &mut self.observers {
            observer.on_round_start(round, world);
        }
    }

    fn on_state_update(&mut self, world: &WorldState) {
        for observer in &mut self.observers {
            observer.on_state_update(world);
        }
    }

    fn on_path_planned(&mut self, route: &[Position], world: &WorldState) {
        for observer in &mut self.observers {
            observer.on_path_planned(route, world);
        }
    }

    fn on_direction_selected(&mut self, direction: Direction, fallback: bool, world: &WorldState) {
        for observer in &mut self.observers {
            observer.on_direction_selected(direction, fallback, world);
        }
    }

    fn on_round_finished(&mut self, summary: &RoundSummary, world: &WorldState) {
        for observer in &mut self.observers {
            observer.on_round_finished(summary, world);
        }
    }

    fn on_game_finished(&mut self, summary: &RunSummary) {
        for observer in &mut self.observers {
            observer.on_game_finished(summary);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct Counter {
        calls: Arc<Mutex<u32>>,
    }

    impl GameObserver for Counter {
        fn on_game_start(&mut self, _seed: u64, _grid_size: i32, _rounds: u32) {
            *self.calls.lock().unwrap() += 1;
        }
        fn on_round_start(&mut self, _round: u32, _world: &WorldState) {}
        fn on_state_update(&mut self, _world: &WorldState) {}
        fn on_direction_selected(&mut self, _direction: Direction, _fallback: bool, _world: &WorldState) {}
        fn on_round_finished(&mut self, _summary: &RoundSummary, _world: &WorldState) {}
        fn on_game_finished(&mut self, _summary: &RunSummary) {
            *self.calls.lock().unwrap() += 10;
        }
    }

    #[test]
    fn test_fans_out_to_every_observer() {
        let calls = Arc::new(Mutex::new(0));
        let mut composite = CompositeObserver::new(vec![
            Box::new(Counter { calls: Arc::clone(&calls) }),
            Box::new(Counter { calls: Arc::clone(&calls) }),
        ]);

        composite.on_game_start(1, 8, 1);
        composite.on_game_finished(&RunSummary::default());

        assert_eq!(*calls.lock().unwrap(), 22);
    }
}
