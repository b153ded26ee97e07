//! Per-mode rules: walls, obstacles, time limits and speed-up schedules

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Identifier of one of the four game modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeId {
    Classic,
    TimeTrial,
    Obstacle,
    Survival,
}

impl ModeId {
    pub const ALL: [ModeId; 4] = [
        ModeId::Classic,
        ModeId::TimeTrial,
        ModeId::Obstacle,
        ModeId::Survival,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ModeId::Classic => "classic",
            ModeId::TimeTrial => "time_trial",
            ModeId::Obstacle => "obstacle",
            ModeId::Survival => "survival",
        }
    }
}

impl fmt::Display for ModeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Error returned when parsing an unknown mode id
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown game mode '{0}'")]
pub struct UnknownMode(pub String);

impl FromStr for ModeId {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        ModeId::ALL
            .into_iter()
            .find(|mode| mode.key() == normalized)
            .ok_or_else(|| UnknownMode(s.to_string()))
    }
}

/// Immutable rules for one mode
///
/// A mode section in a config file replaces the built-in mode wholesale;
/// fields left out are off or zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeSettings {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Out-of-bounds is fatal and the border is lined with wall obstacles
    #[serde(default)]
    pub walls: bool,
    /// Random interior obstacles are placed at round start
    #[serde(default)]
    pub obstacles: bool,
    #[serde(default = "default_num_obstacles")]
    pub num_obstacles: usize,
    /// Countdown length; `None` for untimed modes
    #[serde(default)]
    pub time_limit_ms: Option<u64>,
    /// Speed bump applied for every apple eaten
    #[serde(default)]
    pub speed_increase: f32,
    /// Speed bump applied every survival interval
    #[serde(default)]
    pub time_speed_increase: f32,
}

fn default_num_obstacles() -> usize {
    10
}

impl ModeSettings {
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }

    pub fn has_speed_schedule(&self) -> bool {
        self.time_speed_increase > 0.0
    }

    pub fn classic() -> Self {
        Self {
            name: "Classic".to_string(),
            description: "Classic snake gameplay.".to_string(),
            walls: false,
            obstacles: false,
            num_obstacles: default_num_obstacles(),
            time_limit_ms: None,
            speed_increase: 0.5,
            time_speed_increase: 0.0,
        }
    }

    pub fn time_trial() -> Self {
        Self {
            name: "Time Trial".to_string(),
            description: "Collect as much food as possible in 60 seconds.".to_string(),
            walls: false,
            obstacles: false,
            num_obstacles: default_num_obstacles(),
            time_limit_ms: Some(60_000),
            speed_increase: 0.0,
            time_speed_increase: 0.0,
        }
    }

    pub fn obstacle() -> Self {
        Self {
            name: "Obstacle Course".to_string(),
            description: "Navigate through obstacles.".to_string(),
            walls: true,
            obstacles: true,
            num_obstacles: 15,
            time_limit_ms: None,
            speed_increase: 0.3,
            time_speed_increase: 0.0,
        }
    }

    pub fn survival() -> Self {
        Self {
            name: "Survival".to_string(),
            description: "Snake speeds up over time. Survive as long as possible.".to_string(),
            walls: true,
            obstacles: false,
            num_obstacles: default_num_obstacles(),
            time_limit_ms: None,
            speed_increase: 1.0,
            time_speed_increase: 0.5,
        }
    }
}

/// Read-only table of mode settings indexed by [`ModeId`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeTable {
    pub classic: ModeSettings,
    pub time_trial: ModeSettings,
    pub obstacle: ModeSettings,
    pub survival: ModeSettings,
}

impl Default for ModeTable {
    fn default() -> Self {
        Self {
            classic: ModeSettings::classic(),
            time_trial: ModeSettings::time_trial(),
            obstacle: ModeSettings::obstacle(),
            survival: ModeSettings::survival(),
        }
    }
}

impl ModeTable {
    pub fn get(&self, mode: ModeId) -> &ModeSettings {
        match mode {
            ModeId::Classic => &self.classic,
            ModeId::TimeTrial => &self.time_trial,
            ModeId::Obstacle => &self.obstacle,
            ModeId::Survival => &self.survival,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ModeId, &ModeSettings)> {
        ModeId::ALL.into_iter().map(move |mode| (mode, self.get(mode)))
    }
}
