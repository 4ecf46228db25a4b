use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use time::OffsetDateTime;
use time::macros::format_description;
use tracing::warn;

use crate::game::{RoundSummary, RunSummary};
use crate::infra::{Direction, GameObserver};
use crate::state::WorldState;

/// Writes one plain-text replay file per round: a header, one line per tick
/// (`tick head fruit direction length source`) and a closing result line.
pub struct ReplayObserver {
    folder: PathBuf,
    seed: u64,
    grid_size: i32,
    file: Option<File>,
}

impl ReplayObserver {
    pub fn new(replays_folder: impl AsRef<Path>) -> io::Result<Self> {
        let folder = replays_folder.as_ref().to_path_buf();
        if !folder.exists() {
            fs::create_dir_all(&folder)?;
        }
        Ok(Self {
            folder,
            seed: 0,
            grid_size: 0,
            file: None,
        })
    }

    fn open_round(&self, round: u32) -> io::Result<File> {
        let filename = self.folder.join(format!(
            "snake-{} - {} - round {}.replay",
            self.seed,
            timestamp(),
            round
        ));
        File::create(filename)
    }

    fn write_line(&mut self, line: &str) {
        let Some(file) = self.file.as_mut() else {
            return;
        };
        if let Err(err) = writeln!(file, "{}", line).and_then(|_| file.flush()) {
            warn!("Replay write failed, disabling replay for this round: {}", err);
            self.file = None;
        }
    }
}

impl GameObserver for ReplayObserver {
    fn on_game_start(&mut self, seed: u64, grid_size: i32, _rounds: u32) {
        self.seed = seed;
        self.grid_size = grid_size;
    }

    fn on_round_start(&mut self, round: u32, world: &WorldState) {
        self.file = match self.open_round(round) {
            Ok(file) => Some(file),
            Err(err) => {
                warn!("Could not create replay file for round {}: {}", round, err);
                None
            }
        };
        let header = format!(
            "grid {} seed {} round {} head {},{} fruit {},{}",
            self.grid_size,
            self.seed,
            round,
            world.snake.head().x,
            world.snake.head().y,
            world.fruit.x,
            world.fruit.y
        );
        self.write_line(&header);
    }

    fn on_state_update(&mut self, _world: &WorldState) {}

    fn on_direction_selected(&mut self, direction: Direction, fallback: bool, world: &WorldState) {
        let head = world.snake.head();
        let line = format!(
            "{} {},{} {},{} {} {} {}",
            world.tick,
            head.x,
            head.y,
            world.fruit.x,
            world.fruit.y,
            direction.as_str(),
            world.snake.len(),
            if fallback { "fallback" } else { "planned" }
        );
        self.write_line(&line);
    }

    fn on_round_finished(&mut self, summary: &RoundSummary, _world: &WorldState) {
        let line = format!(
            "end {:?} score {} ticks {}",
            summary.outcome, summary.score, summary.ticks
        );
        self.write_line(&line);
        self.file = None;
    }

    fn on_game_finished(&mut self, _summary: &RunSummary) {}
}

fn timestamp() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    now.format(format_description!("[year][month][day]-[hour][minute][second]"))
        .unwrap_or_else(|_| now.unix_timestamp().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::RoundOutcome;
    use crate::infra::{GridBounds, Position};
    use crate::state::{Collision, Snake};

    fn scratch_folder(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("snake_pilot-{}-{}", name, std::process::id()))
    }

    #[test]
    fn test_writes_one_file_per_round() {
        let folder = scratch_folder("replay");
        let _ = fs::remove_dir_all(&folder);
        let mut observer = ReplayObserver::new(&folder).unwrap();
        let world = WorldState::with_snake(
            GridBounds::new(4),
            Snake::new(Position::new(1, 1), 3),
            Position::new(3, 3),
        );

        observer.on_game_start(7, 4, 1);
        observer.on_round_start(1, &world);
        observer.on_direction_selected(Direction::Up, false, &world);
        observer.on_round_finished(
            &RoundSummary {
                round: 1,
                outcome: RoundOutcome::Lost(Collision::Wall),
                score: 0,
                ticks: 1,
                length: 3,
                fallback_ticks: 0,
                tick_interval: std::time::Duration::ZERO,
            },
            &world,
        );

        let files: Vec<PathBuf> = fs::read_dir(&folder)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        assert_eq!(files.len(), 1);

        let name = files[0].file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("snake-7 - "), "{}", name);
        assert!(name.ends_with(" - round 1.replay"), "{}", name);
        let stamp = &name["snake-7 - ".len()..name.len() - " - round 1.replay".len()];
        assert_eq!(stamp.len(), "YYYYMMDD-HHMMSS".len(), "{}", name);

        let contents = fs::read_to_string(&files[0]).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "grid 4 seed 7 round 1 head 1,1 fruit 3,3");
        assert_eq!(lines[1], "0 1,1 3,3 up 3 planned");
        assert!(lines[2].starts_with("end Lost(Wall)"));

        let _ = fs::remove_dir_all(&folder);
    }
}
