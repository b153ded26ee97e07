use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use super::food::{Food, FoodKind};
use super::grid::{Grid, Position};
use super::mode::ModeId;
use super::obstacle::Obstacle;
use super::powerup::ActivePowerups;
use super::snake::Snake;

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake left the grid in a walled mode
    Wall,
    /// Snake hit itself
    SelfCollision,
    /// Snake ran into an obstacle (border walls included)
    Obstacle,
}

/// Why a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverCause {
    Collision(CollisionType),
    /// The countdown of a timed mode reached zero
    TimeUp,
}

impl fmt::Display for GameOverCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameOverCause::Collision(CollisionType::Wall) => f.write_str("hit a wall"),
            GameOverCause::Collision(CollisionType::SelfCollision) => f.write_str("bit itself"),
            GameOverCause::Collision(CollisionType::Obstacle) => f.write_str("hit an obstacle"),
            GameOverCause::TimeUp => f.write_str("time up"),
        }
    }
}

/// Round state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    Paused,
    GameOver(GameOverCause),
}

/// Complete round state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub mode: ModeId,
    pub grid: Grid,
    /// Copied from the mode at round start
    pub walls: bool,
    pub snake: Snake,
    pub foods: Vec<Food>,
    pub obstacles: Vec<Obstacle>,
    pub powerups: ActivePowerups,
    pub score: u32,
    /// Best score of the session, carried across resets
    pub high_score: u32,
    /// Countdown of timed modes
    pub time_remaining: Option<Duration>,
    /// Time accumulated towards the next scheduled speed-up
    pub since_speed_increase: Duration,
    pub phase: Phase,
}

impl GameState {
    /// Create a new game state
    pub fn new(mode: ModeId, grid: Grid, walls: bool, snake: Snake) -> Self {
        Self {
            mode,
            grid,
            walls,
            snake,
            foods: Vec::new(),
            obstacles: Vec::new(),
            powerups: ActivePowerups::new(),
            score: 0,
            high_score: 0,
            time_remaining: None,
            since_speed_increase: Duration::ZERO,
            phase: Phase::Playing,
        }
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver(_))
    }

    pub fn is_paused(&self) -> bool {
        self.phase == Phase::Paused
    }

    pub fn game_over_cause(&self) -> Option<GameOverCause> {
        match self.phase {
            Phase::GameOver(cause) => Some(cause),
            _ => None,
        }
    }

    pub fn apple_count(&self) -> usize {
        self.foods.iter().filter(|food| food.kind().is_apple()).count()
    }

    pub fn has_apple(&self) -> bool {
        self.foods.iter().any(|food| food.kind() == FoodKind::Apple)
    }

    pub fn is_obstacle(&self, pos: Position) -> bool {
        self.obstacles.iter().any(|obstacle| obstacle.position == pos)
    }

    /// Cells taken by the snake, obstacles and food
    pub fn occupied_cells(&self) -> HashSet<Position> {
        self.snake
            .cells()
            .chain(self.obstacles.iter().map(|obstacle| obstacle.position))
            .chain(self.foods.iter().map(Food::position))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::action::Direction;
    use crate::game::config::GameConfig;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn state() -> GameState {
        let config = GameConfig::small();
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 3, &config);
        GameState::new(ModeId::Classic, config.grid(), false, snake)
    }

    #[test]
    fn test_new_state() {
        let state = state();
        assert_eq!(state.phase, Phase::Playing);
        assert_eq!(state.score, 0);
        assert!(!state.is_game_over());
        assert!(!state.has_apple());
        assert_eq!(state.game_over_cause(), None);
    }

    #[test]
    fn test_occupied_cells() {
        let mut state = state();
        let mut rng = StdRng::seed_from_u64(1);
        state.obstacles.push(Obstacle::new(Position::new(9, 9)));
        state
            .foods
            .push(Food::new(FoodKind::Apple, Position::new(1, 1), &mut rng));

        let occupied = state.occupied_cells();
        assert_eq!(occupied.len(), 5);
        assert!(occupied.contains(&Position::new(4, 5)));
        assert!(occupied.contains(&Position::new(9, 9)));
        assert!(occupied.contains(&Position::new(1, 1)));
        assert!(state.is_obstacle(Position::new(9, 9)));
        assert_eq!(state.apple_count(), 1);
    }

    #[test]
    fn test_phase_queries() {
        let mut state = state();
        state.phase = Phase::Paused;
        assert!(state.is_paused());

        state.phase = Phase::GameOver(GameOverCause::TimeUp);
        assert!(state.is_game_over());
        assert!(!state.is_paused());
        assert_eq!(state.game_over_cause(), Some(GameOverCause::TimeUp));
    }
}
