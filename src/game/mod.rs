//! Core game logic module for Snake
//!
//! This module contains all the game rules without any I/O or rendering
//! dependencies. Time only enters through the `dt` handed to
//! [`GameEngine::update`], so rounds can be driven by the terminal loop or
//! stepped by hand in tests.

pub mod action;
pub mod config;
pub mod engine;
pub mod food;
pub mod grid;
pub mod mode;
pub mod obstacle;
pub mod powerup;
pub mod snake;
pub mod state;

// Re-export commonly used types
pub use action::{Action, Direction};
pub use config::{ConfigError, GameConfig};
pub use engine::{EffectHooks, GameEngine, GameEvent, TickResult};
pub use food::{Food, FoodKind, PowerupKind};
pub use grid::{Grid, Point, Position};
pub use mode::{ModeId, ModeSettings};
pub use obstacle::Obstacle;
pub use powerup::ActivePowerups;
pub use snake::{Segment, Snake};
pub use state::{CollisionType, GameOverCause, GameState, Phase};
