use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::grid::Grid;
use super::mode::ModeTable;

/// Smallest grid that still leaves a spawn interior inside border walls
pub const MIN_GRID_SIZE: usize = 8;

/// Errors raised while loading or validating a [`GameConfig`]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration for the game
///
/// Built once at startup and handed to the engine; nothing mutates it
/// afterwards. Every field may be omitted from a config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Moves per second at round start
    pub initial_snake_speed: f32,
    /// Upper bound on moves per second
    pub max_snake_speed: f32,
    /// Fraction of the remaining distance a segment covers per update
    pub segment_lerp: f32,

    // Food
    pub bonus_food_spawn_chance: f64,
    pub powerup_spawn_chance: f64,
    /// Chance that eating spawns one more food item right away
    pub extra_food_chance: f64,
    /// Head-to-food distance (in cells) that still counts as eating
    pub food_tolerance: f32,
    /// Random placement attempts before falling back to a scan
    pub spawn_attempts: usize,
    pub bonus_speed_boost: f32,

    // Power-ups
    pub powerup_duration_ms: u64,
    pub speed_powerup_boost: f32,
    pub slow_powerup_amount: f32,

    /// Interval of the survival speed-up schedule
    pub speed_schedule_interval_ms: u64,

    /// Frame rate of the terminal front-end
    pub fps: u32,

    pub modes: ModeTable,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 60,
            grid_height: 40,
            initial_snake_length: 3,
            initial_snake_speed: 8.0,
            max_snake_speed: 20.0,
            segment_lerp: 0.6,
            bonus_food_spawn_chance: 0.2,
            powerup_spawn_chance: 0.1,
            extra_food_chance: 0.3,
            food_tolerance: 0.5,
            spawn_attempts: 100,
            bonus_speed_boost: 0.2,
            powerup_duration_ms: 5000,
            speed_powerup_boost: 5.0,
            slow_powerup_amount: 3.0,
            speed_schedule_interval_ms: 10_000,
            fps: 60,
            modes: ModeTable::default(),
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(20, 20)
    }

    /// Load a TOML config file, falling back to defaults for missing fields
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: GameConfig = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;

        tracing::info!(path = %path.display(), "loaded game config");
        Ok(config)
    }

    /// Reject configurations the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| -> Result<(), ConfigError> { Err(ConfigError::Invalid(msg)) };

        if self.grid_width < MIN_GRID_SIZE || self.grid_height < MIN_GRID_SIZE {
            return invalid(format!(
                "grid must be at least {MIN_GRID_SIZE}x{MIN_GRID_SIZE}, got {}x{}",
                self.grid_width, self.grid_height
            ));
        }
        if self.initial_snake_length == 0 || self.initial_snake_length > self.grid_width / 4 {
            return invalid(format!(
                "initial snake length {} does not fit a grid {} wide",
                self.initial_snake_length, self.grid_width
            ));
        }
        if !(self.initial_snake_speed > 0.0) {
            return invalid("initial snake speed must be positive".to_string());
        }
        if !(self.max_snake_speed >= self.initial_snake_speed) {
            return invalid(format!(
                "max snake speed {} is below initial speed {}",
                self.max_snake_speed, self.initial_snake_speed
            ));
        }
        if !(self.segment_lerp > 0.0 && self.segment_lerp <= 1.0) {
            return invalid("segment_lerp must be in (0, 1]".to_string());
        }
        for (name, p) in [
            ("bonus_food_spawn_chance", self.bonus_food_spawn_chance),
            ("powerup_spawn_chance", self.powerup_spawn_chance),
            ("extra_food_chance", self.extra_food_chance),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return invalid(format!("{name} must be in [0, 1], got {p}"));
            }
        }
        for (name, amount) in [
            ("bonus_speed_boost", self.bonus_speed_boost),
            ("speed_powerup_boost", self.speed_powerup_boost),
            ("slow_powerup_amount", self.slow_powerup_amount),
        ] {
            if !(amount >= 0.0) {
                return invalid(format!("{name} must not be negative, got {amount}"));
            }
        }
        for (mode, settings) in self.modes.iter() {
            if !(settings.speed_increase >= 0.0 && settings.time_speed_increase >= 0.0) {
                return invalid(format!("speed increases of mode {mode} must not be negative"));
            }
        }
        if self.food_tolerance < 0.0 {
            return invalid("food_tolerance must not be negative".to_string());
        }
        if self.fps == 0 {
            return invalid("fps must be positive".to_string());
        }
        if self.speed_schedule_interval_ms == 0 {
            return invalid("speed_schedule_interval_ms must be positive".to_string());
        }
        Ok(())
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.grid_width, self.grid_height)
    }

    /// Lowest speed the slow power-up can push the snake to
    pub fn min_snake_speed(&self) -> f32 {
        self.initial_snake_speed / 2.0
    }

    pub fn powerup_duration(&self) -> Duration {
        Duration::from_millis(self.powerup_duration_ms)
    }

    pub fn speed_schedule_interval(&self) -> Duration {
        Duration::from_millis(self.speed_schedule_interval_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.fps.max(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_width, 60);
        assert_eq!(config.grid_height, 40);
        assert_eq!(config.initial_snake_length, 3);
        assert_eq!(config.initial_snake_speed, 8.0);
        assert_eq!(config.max_snake_speed, 20.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(15, 15);
        assert_eq!(config.grid_width, 15);
        assert_eq!(config.grid_height, 15);
        assert_eq!(config.grid(), Grid::new(15, 15));
    }

    #[test]
    fn test_rejects_tiny_grid() {
        let config = GameConfig::new(4, 20);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_bad_speeds_and_chances() {
        let config = GameConfig {
            max_snake_speed: 2.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GameConfig {
            powerup_spawn_chance: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_negative_speed_adjustments() {
        let config = GameConfig {
            slow_powerup_amount: -30.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = GameConfig {
            bonus_speed_boost: -10.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GameConfig {
            speed_powerup_boost: f32::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.modes.survival.time_speed_increase = -0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snake.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "grid_width = 30\ngrid_height = 24\n\n[modes.time_trial]\nname = \"Sprint\"\ntime_limit_ms = 30000"
        )
        .unwrap();

        let config = GameConfig::load(&path).unwrap();
        assert_eq!(config.grid_width, 30);
        assert_eq!(config.grid_height, 24);
        assert_eq!(config.initial_snake_speed, 8.0);
        assert_eq!(config.modes.time_trial.name, "Sprint");
        assert_eq!(
            config.modes.time_trial.time_limit(),
            Some(Duration::from_secs(30))
        );
        assert_eq!(config.modes.classic, GameConfig::default().modes.classic);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = GameConfig::load(dir.path().join("missing.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "grid_width = \"wide\"").unwrap();

        assert!(matches!(
            GameConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
