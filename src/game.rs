use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, warn};

use crate::config::GameConfig;
use crate::infra::{Direction, GameObserver, GridBounds};
use crate::planners::Autopilot;
use crate::state::{Collision, StepOutcome, WorldState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    /// The snake covers the whole board.
    Won,
    Lost(Collision),
    TimedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundSummary {
    pub round: u32,
    pub outcome: RoundOutcome,
    pub score: u32,
    pub ticks: u64,
    pub length: usize,
    /// Ticks on which the fruit could not be reached.
    pub fallback_ticks: u64,
    /// Pacing at the end of the round, after every speed-up.
    pub tick_interval: Duration,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub rounds: u32,
    pub wins: u32,
    pub losses: u32,
    pub timeouts: u32,
    pub best_score: u32,
    pub total_ticks: u64,
}

impl RunSummary {
    fn record(&mut self, round: &RoundSummary) {
        self.rounds += 1;
        match round.outcome {
            RoundOutcome::Won => self.wins += 1,
            RoundOutcome::Lost(_) => self.losses += 1,
            RoundOutcome::TimedOut => self.timeouts += 1,
        }
        self.best_score = self.best_score.max(round.score);
        self.total_ticks += round.ticks;
    }
}

pub struct Game {
    config: GameConfig,
    autopilot: Autopilot,
    observer: Box<dyn GameObserver>,
    rng: StdRng,
    seed: u64,
    /// Carried from one round into the next.
    heading: Direction,
}

impl Game {
    pub fn new(config: GameConfig, observer: impl GameObserver + 'static) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self {
            autopilot: Autopilot::new(config.relaxation, config.fallback),
            observer: Box::new(observer),
            rng: StdRng::seed_from_u64(seed),
            seed,
            heading: Direction::Right,
            config,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub async fn run(&mut self) -> RunSummary {
        self.observer
            .on_game_start(self.seed, self.config.grid_size, self.config.rounds);

        let mut summary = RunSummary::default();
        for round in 1..=self.config.rounds {
            let result = self.play_round(round).await;
            summary.record(&result);
        }

        self.observer.on_game_finished(&summary);
        summary
    }

    async fn play_round(&mut self, round: u32) -> RoundSummary {
        let bounds = GridBounds::new(self.config.grid_size);
        let mut world =
            WorldState::new(bounds, self.config.initial_length, self.heading, &mut self.rng);
        let mut fallback_ticks = 0;

        let mut period = self.config.tick_interval;
        let mut pacer = new_pacer(period, false);

        self.observer.on_round_start(round, &world);

        let outcome = loop {
            if world.tick >= self.config.max_ticks {
                break RoundOutcome::TimedOut;
            }

            if let Some(interval) = pacer.as_mut() {
                interval.tick().await;
            }

            let tick_start = Instant::now();
            self.observer.on_state_update(&world);

            let decision = self.autopilot.decide(&world);
            if decision.used_fallback {
                fallback_ticks += 1;
            } else {
                self.observer.on_path_planned(&decision.route, &world);
            }
            self.observer
                .on_direction_selected(decision.direction, decision.used_fallback, &world);

            let step = world.step(decision.direction, &mut self.rng);

            let tick_duration = tick_start.elapsed();
            if tick_duration.as_millis() > 100 {
                warn!(
                    tick = world.tick,
                    expansions = decision.expansions,
                    "Tick took {:.2}ms",
                    tick_duration.as_secs_f64() * 1000.0
                );
            }

            match step {
                StepOutcome::Moved => {}
                StepOutcome::Ate => {
                    let faster = speed_up(period, &self.config);
                    if faster != period {
                        debug!(score = world.score, "Tick interval now {:?}", faster);
                        period = faster;
                        pacer = new_pacer(period, true);
                    }
                }
                StepOutcome::BoardFull => break RoundOutcome::Won,
                StepOutcome::Collided(collision) => break RoundOutcome::Lost(collision),
            }
        };

        let summary = RoundSummary {
            round,
            outcome,
            score: world.score,
            ticks: world.tick,
            length: world.snake.len(),
            fallback_ticks,
            tick_interval: period,
        };
        self.heading = world.snake.heading();
        self.observer.on_round_finished(&summary, &world);
        summary
    }
}

/// Next tick interval after eating, never below the configured floor.
fn speed_up(period: Duration, config: &GameConfig) -> Duration {
    period.mul_f64(config.speed_up).max(config.min_tick_interval).min(period)
}

/// `None` when pacing is off. A restarted pacer waits a full period before
/// its first tick; a fresh one ticks immediately.
fn new_pacer(period: Duration, restart: bool) -> Option<Interval> {
    if period.is_zero() {
        return None;
    }
    let start = if restart {
        tokio::time::Instant::now() + period
    } else {
        tokio::time::Instant::now()
    };
    let mut interval = tokio::time::interval_at(start, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    Some(interval)
}
