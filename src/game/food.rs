//! Food items, their per-kind properties and the spawn policy

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use super::config::GameConfig;
use super::grid::{Grid, Position};

/// Timed effect carried by power food
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerupKind {
    Speed,
    Slow,
    Shrink,
    Ghost,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 4] = [
        PowerupKind::Speed,
        PowerupKind::Slow,
        PowerupKind::Shrink,
        PowerupKind::Ghost,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Uniformly random kind
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    pub fn name(&self) -> &'static str {
        match self {
            PowerupKind::Speed => "speed",
            PowerupKind::Slow => "slow",
            PowerupKind::Shrink => "shrink",
            PowerupKind::Ghost => "ghost",
        }
    }
}

impl fmt::Display for PowerupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fixed properties shared by every food of a kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoodProfile {
    /// Score gained, which is also the number of segments grown
    pub points: u32,
    /// Drawn size relative to an apple
    pub scale: f32,
    /// Time on the field before the item disappears; `None` never expires
    pub lifetime: Option<Duration>,
}

const PROFILES: [FoodProfile; 3] = [
    // apple
    FoodProfile {
        points: 1,
        scale: 1.0,
        lifetime: None,
    },
    // bonus
    FoodProfile {
        points: 3,
        scale: 1.2,
        lifetime: Some(Duration::from_millis(8000)),
    },
    // power
    FoodProfile {
        points: 2,
        scale: 1.1,
        lifetime: Some(Duration::from_millis(5000)),
    },
];

/// What a food item is; only power food carries a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoodKind {
    Apple,
    Bonus,
    Power(PowerupKind),
}

impl FoodKind {
    fn table_index(&self) -> usize {
        match self {
            FoodKind::Apple => 0,
            FoodKind::Bonus => 1,
            FoodKind::Power(_) => 2,
        }
    }

    pub fn profile(&self) -> &'static FoodProfile {
        &PROFILES[self.table_index()]
    }

    pub fn points(&self) -> u32 {
        self.profile().points
    }

    pub fn lifetime(&self) -> Option<Duration> {
        self.profile().lifetime
    }

    pub fn is_apple(&self) -> bool {
        matches!(self, FoodKind::Apple)
    }

    pub fn powerup(&self) -> Option<PowerupKind> {
        match self {
            FoodKind::Power(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FoodKind::Apple => "apple",
            FoodKind::Bonus => "bonus",
            FoodKind::Power(_) => "power",
        }
    }
}

/// Pick the kind of the next food item.
///
/// An apple is forced whenever none is on the field; otherwise bonus and
/// power food each get a roll before falling back to an apple.
pub fn choose_kind<R: Rng>(foods: &[Food], config: &GameConfig, rng: &mut R) -> FoodKind {
    if !foods.iter().any(|food| food.kind.is_apple()) {
        FoodKind::Apple
    } else if rng.gen_bool(config.bonus_food_spawn_chance) {
        FoodKind::Bonus
    } else if rng.gen_bool(config.powerup_spawn_chance) {
        FoodKind::Power(PowerupKind::random(rng))
    } else {
        FoodKind::Apple
    }
}

/// A food item on the field
#[derive(Debug, Clone, PartialEq)]
pub struct Food {
    kind: FoodKind,
    position: Position,
    age: Duration,
    pulse: f32,
    pulse_direction: f32,
    angle: f32,
    rotation_speed: f32,
}

impl Food {
    /// A food item at `position` with a random animation phase
    pub fn new<R: Rng>(kind: FoodKind, position: Position, rng: &mut R) -> Self {
        let pulse_direction = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        Self {
            kind,
            position,
            age: Duration::ZERO,
            pulse: rng.gen_range(0.0..1.0),
            pulse_direction,
            angle: rng.gen_range(0.0..360.0),
            rotation_speed: rng.gen_range(0.5..2.0) * pulse_direction,
        }
    }

    /// Create a food item and place it on a free cell
    pub fn spawn<R: Rng>(
        kind: FoodKind,
        occupied: &HashSet<Position>,
        grid: Grid,
        attempts: usize,
        rng: &mut R,
    ) -> Self {
        let mut food = Self::new(kind, grid.center(), rng);
        food.respawn(occupied, grid, attempts, rng);
        food
    }

    /// Move to a random free cell inside the border ring.
    ///
    /// After `attempts` random misses the interior is scanned in order; if
    /// every cell is taken the item goes to the grid center regardless.
    pub fn respawn<R: Rng>(
        &mut self,
        occupied: &HashSet<Position>,
        grid: Grid,
        attempts: usize,
        rng: &mut R,
    ) {
        self.age = Duration::ZERO;

        for _ in 0..attempts {
            let candidate = Position::new(
                rng.gen_range(1..grid.width - 1),
                rng.gen_range(1..grid.height - 1),
            );
            if !occupied.contains(&candidate) {
                self.position = candidate;
                return;
            }
        }

        tracing::debug!(attempts, "random food placement failed, scanning grid");
        let free = (1..grid.width - 1)
            .flat_map(|x| (1..grid.height - 1).map(move |y| Position::new(x, y)))
            .find(|cell| !occupied.contains(cell));

        self.position = match free {
            Some(cell) => cell,
            None => {
                tracing::warn!("no free cell for food, placing it at the grid center");
                grid.center()
            }
        };
    }

    /// Advance animation and lifetime. Returns false once the item has
    /// expired and should be removed.
    pub fn update(&mut self, dt: Duration) -> bool {
        self.pulse += 0.05 * self.pulse_direction;
        if self.pulse > 1.0 {
            self.pulse = 1.0;
            self.pulse_direction = -1.0;
        } else if self.pulse < 0.0 {
            self.pulse = 0.0;
            self.pulse_direction = 1.0;
        }
        self.angle = (self.angle + self.rotation_speed).rem_euclid(360.0);

        self.age += dt;
        !self.is_expired()
    }

    pub fn is_expired(&self) -> bool {
        self.kind
            .lifetime()
            .is_some_and(|lifetime| self.age >= lifetime)
    }

    /// Time left before expiry, `None` for food that never expires
    pub fn remaining(&self) -> Option<Duration> {
        self.kind
            .lifetime()
            .map(|lifetime| lifetime.saturating_sub(self.age))
    }

    pub fn kind(&self) -> FoodKind {
        self.kind
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn points(&self) -> u32 {
        self.kind.points()
    }

    /// Pulse phase in [0, 1]
    pub fn pulse(&self) -> f32 {
        self.pulse
    }

    /// Rotation in degrees
    pub fn angle(&self) -> f32 {
        self.angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn apple_at(x: i32, y: i32) -> Food {
        Food::new(FoodKind::Apple, Position::new(x, y), &mut rng())
    }

    #[test]
    fn test_profiles() {
        assert_eq!(FoodKind::Apple.points(), 1);
        assert_eq!(FoodKind::Bonus.points(), 3);
        assert_eq!(FoodKind::Power(PowerupKind::Ghost).points(), 2);

        assert_eq!(FoodKind::Apple.lifetime(), None);
        assert_eq!(FoodKind::Bonus.lifetime(), Some(Duration::from_secs(8)));
        assert_eq!(
            FoodKind::Power(PowerupKind::Speed).lifetime(),
            Some(Duration::from_secs(5))
        );
        assert_eq!(FoodKind::Bonus.profile().scale, 1.2);
        assert_eq!(
            FoodKind::Power(PowerupKind::Slow).powerup(),
            Some(PowerupKind::Slow)
        );
        assert_eq!(FoodKind::Apple.powerup(), None);
    }

    #[test]
    fn test_apple_forced_when_none_present() {
        let config = GameConfig {
            bonus_food_spawn_chance: 1.0,
            powerup_spawn_chance: 1.0,
            ..Default::default()
        };
        let mut rng = rng();

        assert_eq!(choose_kind(&[], &config, &mut rng), FoodKind::Apple);

        let bonus = Food::new(FoodKind::Bonus, Position::new(3, 3), &mut rng);
        assert_eq!(choose_kind(&[bonus], &config, &mut rng), FoodKind::Apple);
    }

    #[test]
    fn test_kind_rolls_in_order() {
        let foods = vec![apple_at(3, 3)];
        let mut rng = rng();

        let always_bonus = GameConfig {
            bonus_food_spawn_chance: 1.0,
            powerup_spawn_chance: 1.0,
            ..Default::default()
        };
        assert_eq!(choose_kind(&foods, &always_bonus, &mut rng), FoodKind::Bonus);

        let always_power = GameConfig {
            bonus_food_spawn_chance: 0.0,
            powerup_spawn_chance: 1.0,
            ..Default::default()
        };
        assert!(matches!(
            choose_kind(&foods, &always_power, &mut rng),
            FoodKind::Power(_)
        ));

        let never_special = GameConfig {
            bonus_food_spawn_chance: 0.0,
            powerup_spawn_chance: 0.0,
            ..Default::default()
        };
        assert_eq!(choose_kind(&foods, &never_special, &mut rng), FoodKind::Apple);
    }

    #[test]
    fn test_spawn_avoids_occupied_cells() {
        let grid = Grid::new(10, 10);
        let mut rng = rng();
        let occupied: HashSet<Position> = (1..9).map(|x| Position::new(x, 4)).collect();

        for _ in 0..50 {
            let food = Food::spawn(FoodKind::Apple, &occupied, grid, 100, &mut rng);
            let pos = food.position();
            assert!(!occupied.contains(&pos));
            assert!(pos.x >= 1 && pos.x <= 8 && pos.y >= 1 && pos.y <= 8);
        }
    }

    #[test]
    fn test_spawn_falls_back_to_scan() {
        let grid = Grid::new(8, 8);
        let mut rng = rng();
        // Every interior cell but one is taken
        let occupied: HashSet<Position> = (1..7)
            .flat_map(|x| (1..7).map(move |y| Position::new(x, y)))
            .filter(|cell| *cell != Position::new(6, 2))
            .collect();

        let food = Food::spawn(FoodKind::Apple, &occupied, grid, 0, &mut rng);
        assert_eq!(food.position(), Position::new(6, 2));
    }

    #[test]
    fn test_spawn_full_grid_uses_center() {
        let grid = Grid::new(8, 8);
        let mut rng = rng();
        let occupied: HashSet<Position> = (0..8)
            .flat_map(|x| (0..8).map(move |y| Position::new(x, y)))
            .collect();

        let food = Food::spawn(FoodKind::Apple, &occupied, grid, 10, &mut rng);
        assert_eq!(food.position(), Position::new(4, 4));
    }

    #[test]
    fn test_apple_never_expires() {
        let mut food = apple_at(2, 2);
        for _ in 0..100 {
            assert!(food.update(Duration::from_secs(60)));
        }
        assert_eq!(food.remaining(), None);
    }

    #[test]
    fn test_timed_food_expires() {
        let mut rng = rng();
        let mut bonus = Food::new(FoodKind::Bonus, Position::new(2, 2), &mut rng);

        assert!(bonus.update(Duration::from_millis(7999)));
        assert_eq!(bonus.remaining(), Some(Duration::from_millis(1)));
        assert!(!bonus.update(Duration::from_millis(1)));
        assert!(bonus.is_expired());

        let mut power = Food::new(
            FoodKind::Power(PowerupKind::Ghost),
            Position::new(2, 2),
            &mut rng,
        );
        assert!(power.update(Duration::from_millis(4999)));
        assert!(!power.update(Duration::from_millis(1)));
    }

    #[test]
    fn test_animation_stays_in_range() {
        let mut food = apple_at(2, 2);
        for _ in 0..200 {
            food.update(Duration::from_millis(16));
            assert!((0.0..=1.0).contains(&food.pulse()));
            assert!((0.0..360.0).contains(&food.angle()));
        }
    }
}
