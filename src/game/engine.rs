use rand::Rng;
use rand::rngs::ThreadRng;
use std::collections::HashSet;
use std::time::Duration;

use super::{
    action::{Action, Direction},
    config::GameConfig,
    food::{Food, FoodKind, PowerupKind, choose_kind},
    grid::{Point, Position},
    mode::{ModeId, ModeSettings},
    obstacle::{self, Obstacle},
    powerup::ActivePowerups,
    snake::Snake,
    state::{CollisionType, GameOverCause, GameState, Phase},
};

/// Something the presentation layer may want to react to
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    FoodEaten(Food),
    GameOver(GameOverCause),
    PowerupToggled { kind: PowerupKind, active: bool },
}

/// Side-effect hooks (sound, particles, stats) fed from a [`TickResult`]
pub trait EffectHooks {
    fn on_eat(&mut self, _food: &Food) {}
    fn on_game_over(&mut self, _cause: GameOverCause) {}
    fn on_powerup_toggle(&mut self, _kind: PowerupKind, _active: bool) {}
}

/// Result of a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickResult {
    /// Whether the snake moved a cell this tick
    pub moved: bool,
    /// Events in the order they happened
    pub events: Vec<GameEvent>,
}

impl TickResult {
    pub fn ate_food(&self) -> bool {
        self.events
            .iter()
            .any(|event| matches!(event, GameEvent::FoodEaten(_)))
    }

    /// Forward every event to `hooks`
    pub fn dispatch<H: EffectHooks + ?Sized>(&self, hooks: &mut H) {
        for event in &self.events {
            match event {
                GameEvent::FoodEaten(food) => hooks.on_eat(food),
                GameEvent::GameOver(cause) => hooks.on_game_over(*cause),
                GameEvent::PowerupToggled { kind, active } => {
                    hooks.on_powerup_toggle(*kind, *active)
                }
            }
        }
    }
}

/// The round controller: owns the round state and advances it tick by tick
pub struct GameEngine<R = ThreadRng> {
    config: GameConfig,
    rng: R,
    mode: ModeId,
    state: GameState,
}

impl GameEngine<ThreadRng> {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, rand::thread_rng())
    }
}

impl<R: Rng> GameEngine<R> {
    /// Create an engine drawing randomness from `rng`, starting a classic round
    pub fn with_rng(config: GameConfig, mut rng: R) -> Self {
        let mode = ModeId::Classic;
        let state = new_round(&config, mode, 0, &mut rng);
        Self {
            config,
            rng,
            mode,
            state,
        }
    }

    /// Start a fresh round in the current mode. The session high score is kept.
    pub fn reset(&mut self) {
        self.state = new_round(&self.config, self.mode, self.state.high_score, &mut self.rng);
    }

    /// Switch mode and start a fresh round in it
    pub fn set_mode(&mut self, mode: ModeId) {
        tracing::info!(from = %self.mode, to = %mode, "switching game mode");
        self.mode = mode;
        self.reset();
    }

    /// Switch mode by its key. Unknown keys leave everything untouched and
    /// return false.
    pub fn select_mode(&mut self, key: &str) -> bool {
        match key.parse::<ModeId>() {
            Ok(mode) => {
                self.set_mode(mode);
                true
            }
            Err(err) => {
                tracing::debug!(%err, "ignoring mode change");
                false
            }
        }
    }

    pub fn handle_direction_input(&mut self, direction: Direction) {
        if !self.state.is_game_over() {
            self.state.snake.change_direction(direction);
        }
    }

    /// Pause or resume. A finished round stays finished.
    pub fn handle_pause_toggle(&mut self) {
        self.state.phase = match self.state.phase {
            Phase::Playing => Phase::Paused,
            Phase::Paused => Phase::Playing,
            over @ Phase::GameOver(_) => over,
        };
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Move(direction) => self.handle_direction_input(direction),
            Action::TogglePause => self.handle_pause_toggle(),
            Action::Restart => self.reset(),
            Action::SelectMode(mode) => self.set_mode(mode),
        }
    }

    /// Advance the round by `dt` of game time.
    ///
    /// Order: countdown, power-up timers, speed schedule, snake movement,
    /// collisions, food lifetimes, then the live-apple rule.
    pub fn update(&mut self, dt: Duration) -> TickResult {
        let mut result = TickResult::default();
        if self.state.phase != Phase::Playing {
            return result;
        }

        if let Some(remaining) = self.state.time_remaining {
            let remaining = remaining.saturating_sub(dt);
            self.state.time_remaining = Some(remaining);
            if remaining.is_zero() {
                self.end_round(GameOverCause::TimeUp, &mut result.events);
                return result;
            }
        }

        for kind in self.state.powerups.tick(dt) {
            self.expire_powerup(kind);
            result
                .events
                .push(GameEvent::PowerupToggled { kind, active: false });
        }

        let settings = self.config.modes.get(self.state.mode);
        if settings.has_speed_schedule() {
            let bump = settings.time_speed_increase;
            self.state.since_speed_increase += dt;
            if self.state.since_speed_increase >= self.config.speed_schedule_interval() {
                self.state.since_speed_increase = Duration::ZERO;
                self.state.snake.increase_speed(bump);
                tracing::debug!(speed = self.state.snake.speed(), "scheduled speed-up");
            }
        }

        result.moved = self
            .state
            .snake
            .update(dt, self.state.grid, self.state.walls);

        self.resolve_collisions(&mut result.events);

        self.state.foods.retain_mut(|food| food.update(dt));
        if !self.state.has_apple() {
            self.spawn_food();
        }

        result
    }

    /// Eating is checked first and, when it happens, skips the fatal checks
    /// for this tick. Otherwise self, wall and obstacle hits are checked in
    /// that order; the first one ends the round unless ghost is active.
    fn resolve_collisions(&mut self, events: &mut Vec<GameEvent>) {
        let head = self.state.snake.head();
        let head_position = self.state.snake.head_position();
        let tolerance = self.config.food_tolerance;

        let eaten = self.state.foods.iter().position(|food| {
            food.position() == head
                || head_position.distance(Point::from(food.position())) < tolerance
        });
        if let Some(index) = eaten {
            let food = self.state.foods[index].clone();
            self.eat(&food, events);
            self.state.foods.remove(index);
            if !self.state.has_apple() {
                self.spawn_food();
            }
            return;
        }

        let grid = self.state.grid;
        let walls = self.state.walls;
        let collision = if self.state.snake.collides_with_self() {
            Some(CollisionType::SelfCollision)
        } else if self.state.snake.check_wall_collision(grid, walls) {
            Some(CollisionType::Wall)
        } else if self.state.is_obstacle(self.state.snake.head()) {
            Some(CollisionType::Obstacle)
        } else {
            None
        };

        if let Some(collision) = collision {
            if self.state.powerups.is_active(PowerupKind::Ghost) {
                tracing::trace!(?collision, "ghost ignored collision");
            } else {
                self.end_round(GameOverCause::Collision(collision), events);
            }
        }
    }

    fn eat(&mut self, food: &Food, events: &mut Vec<GameEvent>) {
        let points = food.points();
        self.state.score += points;
        self.state.high_score = self.state.high_score.max(self.state.score);
        self.state.snake.grow(points as usize);
        events.push(GameEvent::FoodEaten(food.clone()));

        match food.kind() {
            FoodKind::Apple => {
                let bump = self.config.modes.get(self.state.mode).speed_increase;
                if bump > 0.0 {
                    self.state.snake.increase_speed(bump);
                }
            }
            FoodKind::Bonus => self.state.snake.increase_speed(self.config.bonus_speed_boost),
            FoodKind::Power(kind) => self.activate_powerup(kind, events),
        }

        if self.rng.gen_bool(self.config.extra_food_chance) {
            self.spawn_food();
        }
    }

    fn activate_powerup(&mut self, kind: PowerupKind, events: &mut Vec<GameEvent>) {
        let refreshed = self
            .state
            .powerups
            .activate(kind, self.config.powerup_duration());

        let snake = &mut self.state.snake;
        match kind {
            PowerupKind::Speed => snake.increase_speed(self.config.speed_powerup_boost),
            PowerupKind::Slow => snake.decrease_speed(
                self.config.slow_powerup_amount,
                self.config.min_snake_speed(),
            ),
            PowerupKind::Shrink => snake.shrink_to(self.config.initial_snake_length),
            PowerupKind::Ghost => {}
        }

        tracing::debug!(%kind, refreshed, "power-up activated");
        events.push(GameEvent::PowerupToggled { kind, active: true });
    }

    fn expire_powerup(&mut self, kind: PowerupKind) {
        let snake = &mut self.state.snake;
        match kind {
            PowerupKind::Speed => snake.decrease_speed(
                self.config.speed_powerup_boost,
                self.config.initial_snake_speed,
            ),
            PowerupKind::Slow => snake.increase_speed(self.config.slow_powerup_amount),
            PowerupKind::Shrink | PowerupKind::Ghost => {}
        }
        tracing::debug!(%kind, "power-up expired");
    }

    fn spawn_food(&mut self) {
        spawn_food_into(&self.config, &mut self.state, &mut self.rng);
    }

    fn end_round(&mut self, cause: GameOverCause, events: &mut Vec<GameEvent>) {
        self.state.phase = Phase::GameOver(cause);
        tracing::info!(
            mode = %self.state.mode,
            score = self.state.score,
            %cause,
            "round over"
        );
        events.push(GameEvent::GameOver(cause));
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn mode(&self) -> ModeId {
        self.mode
    }

    pub fn mode_settings(&self) -> &ModeSettings {
        self.config.modes.get(self.mode)
    }

    /// Read-only snapshot of the round
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn high_score(&self) -> u32 {
        self.state.high_score
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    pub fn is_paused(&self) -> bool {
        self.state.is_paused()
    }

    /// Countdown of timed modes, `None` otherwise
    pub fn time_remaining(&self) -> Option<Duration> {
        self.state.time_remaining
    }

    pub fn active_powerups(&self) -> &ActivePowerups {
        &self.state.powerups
    }

    /// Snake cells, head first
    pub fn snake_positions(&self) -> Vec<Position> {
        self.state.snake.cells().collect()
    }

    pub fn foods(&self) -> &[Food] {
        &self.state.foods
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.state.obstacles
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}

/// Build the opening state of a round: snake, obstacles, walls, first apple
fn new_round<R: Rng>(config: &GameConfig, mode: ModeId, high_score: u32, rng: &mut R) -> GameState {
    let settings = config.modes.get(mode);
    let grid = config.grid();
    let snake = Snake::spawn(config);
    let mut state = GameState::new(mode, grid, settings.walls, snake);
    state.high_score = high_score;
    state.time_remaining = settings.time_limit();

    if settings.obstacles {
        // Keep the snake and the few cells straight ahead of it clear
        let mut avoid: HashSet<Position> = state.snake.cells().collect();
        let mut ahead = state.snake.head();
        for _ in 0..3 {
            ahead = ahead.moved_in_direction(state.snake.direction());
            avoid.insert(ahead);
        }
        state.obstacles = obstacle::scatter(
            settings.num_obstacles,
            grid,
            &avoid,
            config.spawn_attempts,
            rng,
        );
    }
    if settings.walls {
        state.obstacles.extend(obstacle::border_walls(grid));
    }

    spawn_food_into(config, &mut state, rng);

    tracing::info!(
        %mode,
        walls = settings.walls,
        obstacles = state.obstacles.len(),
        "new round"
    );
    state
}

fn spawn_food_into<R: Rng>(config: &GameConfig, state: &mut GameState, rng: &mut R) {
    let kind = choose_kind(&state.foods, config, rng);
    let occupied = state.occupied_cells();
    let food = Food::spawn(kind, &occupied, state.grid, config.spawn_attempts, rng);
    state.foods.push(food);
}
