use std::env;
use std::error::Error;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::infra::Relaxation;
use crate::planners::FallbackPolicy;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Invalid {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Invalid { key, value, reason } => {
                write!(formatter, "Invalid value {:?} for {}: {}", value, key, reason)
            }
        }
    }
}

impl Error for ConfigError {}

/// Largest board accepted; the planner allocates N² nodes per search.
pub const MAX_GRID_SIZE: i32 = 256;

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub grid_size: i32,
    pub initial_length: usize,
    pub rounds: u32,
    pub max_ticks: u64,
    /// Wait between ticks. Zero runs the rounds back to back.
    pub tick_interval: Duration,
    /// Factor applied to the tick interval each time the fruit is eaten.
    pub speed_up: f64,
    pub min_tick_interval: Duration,
    pub seed: Option<u64>,
    pub fallback: FallbackPolicy,
    pub relaxation: Relaxation,
    pub replays_folder: Option<String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 8,
            initial_length: 3,
            rounds: 1,
            max_ticks: 10_000,
            tick_interval: Duration::from_millis(200),
            speed_up: 0.95,
            min_tick_interval: Duration::from_micros(150),
            seed: None,
            fallback: FallbackPolicy::default(),
            relaxation: Relaxation::default(),
            replays_folder: None,
        }
    }
}

impl GameConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source, falling back to
    /// defaults for missing keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let grid_size = parse_var(&lookup, "SNAKE_GRID_SIZE")?.unwrap_or(defaults.grid_size);
        if grid_size < 2 {
            return Err(invalid("SNAKE_GRID_SIZE", grid_size, "must be at least 2"));
        }
        if grid_size > MAX_GRID_SIZE {
            return Err(invalid("SNAKE_GRID_SIZE", grid_size, "must be at most 256"));
        }

        let initial_length =
            parse_var(&lookup, "SNAKE_INITIAL_LENGTH")?.unwrap_or(defaults.initial_length);
        let cell_count = (grid_size as usize) * (grid_size as usize);
        if initial_length == 0 || initial_length > cell_count {
            return Err(invalid(
                "SNAKE_INITIAL_LENGTH",
                initial_length,
                "must be between 1 and the number of cells",
            ));
        }

        let rounds = parse_var(&lookup, "SNAKE_ROUNDS")?.unwrap_or(defaults.rounds);
        if rounds == 0 {
            return Err(invalid("SNAKE_ROUNDS", rounds, "must be at least 1"));
        }

        let max_ticks = parse_var(&lookup, "SNAKE_MAX_TICKS")?.unwrap_or(defaults.max_ticks);
        if max_ticks == 0 {
            return Err(invalid("SNAKE_MAX_TICKS", max_ticks, "must be at least 1"));
        }

        let tick_interval = parse_var::<u64, _>(&lookup, "SNAKE_TICK_MS")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.tick_interval);

        let speed_up = parse_var::<f64, _>(&lookup, "SNAKE_SPEED_UP")?.unwrap_or(defaults.speed_up);
        if !(speed_up > 0.0 && speed_up <= 1.0) {
            return Err(invalid("SNAKE_SPEED_UP", speed_up, "must be in (0, 1]"));
        }

        let min_tick_interval = match parse_var::<f64, _>(&lookup, "SNAKE_MIN_TICK_MS")? {
            None => defaults.min_tick_interval,
            Some(ms) if ms.is_finite() && ms >= 0.0 => Duration::from_secs_f64(ms / 1000.0),
            Some(ms) => return Err(invalid("SNAKE_MIN_TICK_MS", ms, "must be a non-negative number")),
        };

        let seed = parse_var(&lookup, "SNAKE_SEED")?;

        let fallback = match lookup("SNAKE_FALLBACK").as_deref() {
            None => defaults.fallback,
            Some("survive") => FallbackPolicy::Survive,
            Some("hold") => FallbackPolicy::HoldHeading,
            Some(other) => return Err(invalid("SNAKE_FALLBACK", other, "expected survive or hold")),
        };

        let relaxation = match lookup("SNAKE_RELAXATION").as_deref() {
            None => defaults.relaxation,
            Some("predecessor") => Relaxation::PredecessorScore,
            Some("node") => Relaxation::NodeScore,
            Some(other) => {
                return Err(invalid("SNAKE_RELAXATION", other, "expected predecessor or node"));
            }
        };

        let replays_folder = lookup("SNAKE_REPLAYS_FOLDER").filter(|folder| !folder.is_empty());

        Ok(Self {
            grid_size,
            initial_length,
            rounds,
            max_ticks,
            tick_interval,
            speed_up,
            min_tick_interval,
            seed,
            fallback,
            relaxation,
            replays_folder,
        })
    }
}

fn parse_var<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| invalid(key, &value, "not a valid number")),
    }
}

fn invalid(key: &'static str, value: impl ToString, reason: &'static str) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<GameConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        GameConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        assert_eq!(config_from(&[]).unwrap(), GameConfig::default());
    }

    #[test]
    fn test_all_keys_parsed() {
        let config = config_from(&[
            ("SNAKE_GRID_SIZE", "12"),
            ("SNAKE_INITIAL_LENGTH", "5"),
            ("SNAKE_ROUNDS", "4"),
            ("SNAKE_MAX_TICKS", "900"),
            ("SNAKE_TICK_MS", "0"),
            ("SNAKE_SPEED_UP", "0.5"),
            ("SNAKE_MIN_TICK_MS", "2.5"),
            ("SNAKE_SEED", "42"),
            ("SNAKE_FALLBACK", "hold"),
            ("SNAKE_RELAXATION", "node"),
            ("SNAKE_REPLAYS_FOLDER", "replays"),
        ])
        .unwrap();

        assert_eq!(config.grid_size, 12);
        assert_eq!(config.initial_length, 5);
        assert_eq!(config.rounds, 4);
        assert_eq!(config.max_ticks, 900);
        assert_eq!(config.tick_interval, Duration::ZERO);
        assert_eq!(config.speed_up, 0.5);
        assert_eq!(config.min_tick_interval, Duration::from_micros(2500));
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.fallback, FallbackPolicy::HoldHeading);
        assert_eq!(config.relaxation, Relaxation::NodeScore);
        assert_eq!(config.replays_folder.as_deref(), Some("replays"));
    }

    #[test]
    fn test_rejects_tiny_grid() {
        let err = config_from(&[("SNAKE_GRID_SIZE", "1")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "SNAKE_GRID_SIZE", .. }));
    }

    #[test]
    fn test_rejects_huge_grid() {
        let err = config_from(&[("SNAKE_GRID_SIZE", "100000")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "SNAKE_GRID_SIZE", .. }));

        let largest = config_from(&[("SNAKE_GRID_SIZE", "256")]).unwrap();
        assert_eq!(largest.grid_size, MAX_GRID_SIZE);
    }

    #[test]
    fn test_rejects_speed_up_outside_unit_range() {
        assert!(config_from(&[("SNAKE_SPEED_UP", "0")]).is_err());
        assert!(config_from(&[("SNAKE_SPEED_UP", "1.5")]).is_err());
        assert!(config_from(&[("SNAKE_SPEED_UP", "NaN")]).is_err());
        assert!(config_from(&[("SNAKE_MIN_TICK_MS", "-1")]).is_err());
        assert_eq!(config_from(&[("SNAKE_SPEED_UP", "1")]).unwrap().speed_up, 1.0);
    }

    #[test]
    fn test_rejects_snake_longer_than_board() {
        let err = config_from(&[("SNAKE_GRID_SIZE", "2"), ("SNAKE_INITIAL_LENGTH", "5")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "SNAKE_INITIAL_LENGTH", .. }));
    }

    #[test]
    fn test_rejects_garbage_numbers_and_policies() {
        assert!(config_from(&[("SNAKE_SEED", "abc")]).is_err());
        assert!(config_from(&[("SNAKE_FALLBACK", "panic")]).is_err());
        assert!(config_from(&[("SNAKE_RELAXATION", "fast")]).is_err());
    }

    #[test]
    fn test_error_message_names_key() {
        let err = config_from(&[("SNAKE_ROUNDS", "0")]).unwrap_err();
        assert!(err.to_string().contains("SNAKE_ROUNDS"));
    }
}
