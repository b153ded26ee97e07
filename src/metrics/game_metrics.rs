use std::time::{Duration, Instant};

use crate::game::{EffectHooks, Food, FoodKind, GameOverCause, PowerupKind};

/// Per-session statistics, fed from engine events
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub games_played: u32,
    pub apples_eaten: u32,
    pub bonus_eaten: u32,
    pub powerups_collected: u32,
    pub last_game_over: Option<GameOverCause>,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            games_played: 0,
            apples_eaten: 0,
            bonus_eaten: 0,
            powerups_collected: 0,
            last_game_over: None,
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.start_time.elapsed();
    }

    /// Restart the round clock
    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
        self.last_game_over = None;
    }

    pub fn food_eaten(&self) -> u32 {
        self.apples_eaten + self.bonus_eaten + self.powerups_collected
    }

    pub fn format_time(&self) -> String {
        format_duration(self.elapsed_time)
    }
}

/// `mm:ss`, minutes unbounded
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

impl EffectHooks for GameMetrics {
    fn on_eat(&mut self, food: &Food) {
        match food.kind() {
            FoodKind::Apple => self.apples_eaten += 1,
            FoodKind::Bonus => self.bonus_eaten += 1,
            FoodKind::Power(_) => self.powerups_collected += 1,
        }
    }

    fn on_game_over(&mut self, cause: GameOverCause) {
        self.games_played += 1;
        self.last_game_over = Some(cause);
    }

    fn on_powerup_toggle(&mut self, kind: PowerupKind, active: bool) {
        tracing::trace!(%kind, active, "power-up toggled");
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{CollisionType, Position};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_time_formatting() {
        let mut metrics = GameMetrics::new();
        metrics.elapsed_time = Duration::from_secs(125);
        assert_eq!(metrics.format_time(), "02:05");

        metrics.elapsed_time = Duration::from_secs(0);
        assert_eq!(metrics.format_time(), "00:00");

        metrics.elapsed_time = Duration::from_secs(3661);
        assert_eq!(metrics.format_time(), "61:01");
    }

    #[test]
    fn test_counts_food_by_kind() {
        let mut metrics = GameMetrics::new();
        let mut rng = StdRng::seed_from_u64(5);
        let cell = Position::new(3, 3);

        metrics.on_eat(&Food::new(FoodKind::Apple, cell, &mut rng));
        metrics.on_eat(&Food::new(FoodKind::Apple, cell, &mut rng));
        metrics.on_eat(&Food::new(FoodKind::Bonus, cell, &mut rng));
        metrics.on_eat(&Food::new(
            FoodKind::Power(PowerupKind::Ghost),
            cell,
            &mut rng,
        ));

        assert_eq!(metrics.apples_eaten, 2);
        assert_eq!(metrics.bonus_eaten, 1);
        assert_eq!(metrics.powerups_collected, 1);
        assert_eq!(metrics.food_eaten(), 4);
    }

    #[test]
    fn test_game_over_tracking() {
        let mut metrics = GameMetrics::new();
        let cause = GameOverCause::Collision(CollisionType::Wall);

        metrics.on_game_over(cause);
        metrics.on_game_over(GameOverCause::TimeUp);
        assert_eq!(metrics.games_played, 2);
        assert_eq!(metrics.last_game_over, Some(GameOverCause::TimeUp));

        metrics.on_game_start();
        assert_eq!(metrics.last_game_over, None);
        assert_eq!(metrics.games_played, 2);
    }

    #[test]
    fn test_game_start_resets_time() {
        let mut metrics = GameMetrics::new();
        std::thread::sleep(Duration::from_millis(50));
        metrics.update();

        assert!(metrics.elapsed_time.as_millis() >= 50);

        metrics.on_game_start();
        metrics.update();
        assert!(metrics.elapsed_time.as_millis() < 50);
    }
}
