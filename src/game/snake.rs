//! The snake: a chain of segments moving on the grid
//!
//! Movement has two layers. Each segment owns a discrete target cell, which
//! is what collisions look at, and a continuous position that eases towards
//! that cell on every update so the front-end can draw smooth motion. The
//! discrete move happens only once per move interval (`1000 / speed` ms), so
//! speed controls the cadence of moves rather than a pixel velocity.

use std::time::Duration;

use super::action::Direction;
use super::config::GameConfig;
use super::grid::{Grid, Point, Position};

/// Number of segments right behind the head that can never overlap it
const NECK_LENGTH: usize = 3;

/// One link of the snake
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    position: Point,
    target: Position,
}

impl Segment {
    pub fn new(cell: Position) -> Self {
        Self {
            position: cell.into(),
            target: cell,
        }
    }

    /// Ease the drawn position towards the target cell
    pub fn update(&mut self, lerp: f32) {
        self.position.lerp_towards(self.target.into(), lerp);
    }

    /// Point the segment at a new cell. Jumps of more than one cell (wrapping
    /// across the grid) snap instead of sliding over the whole board.
    pub fn set_target(&mut self, target: Position) {
        if target.manhattan(self.target) > 1 {
            self.position = target.into();
        }
        self.target = target;
    }

    /// The grid cell this segment occupies for collision purposes
    pub fn cell(&self) -> Position {
        self.target
    }

    /// Continuous position used for drawing
    pub fn position(&self) -> Point {
        self.position
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Segments, with head at index 0
    segments: Vec<Segment>,
    direction: Direction,
    /// Buffered turn, committed on the next move
    next_direction: Direction,
    /// Moves per second
    speed: f32,
    growth_pending: usize,
    since_last_move: Duration,
    just_ate: bool,
    min_speed: f32,
    max_speed: f32,
    lerp: f32,
}

impl Snake {
    /// Create a new snake with given starting position and direction
    pub fn new(head: Position, direction: Direction, length: usize, config: &GameConfig) -> Self {
        let (dx, dy) = direction.delta();
        let cells = (0..length.max(1) as i32)
            .map(|i| head.moved_by(-dx * i, -dy * i))
            .collect();

        Self::from_cells(cells, direction, config)
    }

    /// Builds a snake from explicit cells, head first. `cells` must not be
    /// empty.
    pub fn from_cells(cells: Vec<Position>, direction: Direction, config: &GameConfig) -> Self {
        Self {
            segments: cells.into_iter().map(Segment::new).collect(),
            direction,
            next_direction: direction,
            speed: config.initial_snake_speed,
            growth_pending: 0,
            since_last_move: Duration::ZERO,
            just_ate: false,
            min_speed: config.min_snake_speed().min(config.max_snake_speed),
            max_speed: config.max_snake_speed,
            lerp: config.segment_lerp,
        }
    }

    /// The round-start snake: a quarter of the way in, halfway down, facing right
    pub fn spawn(config: &GameConfig) -> Self {
        let head = Position::new(
            (config.grid_width / 4) as i32,
            (config.grid_height / 2) as i32,
        );
        Self::new(head, Direction::Right, config.initial_snake_length, config)
    }

    /// Queue a turn. A turn straight back onto the neck is ignored.
    pub fn change_direction(&mut self, direction: Direction) {
        if !self.direction.is_opposite(direction) {
            self.next_direction = direction;
        }
    }

    /// Queue `amount` extra segments, added one per move
    pub fn grow(&mut self, amount: usize) {
        self.growth_pending += amount;
        self.just_ate = true;
    }

    /// Raise the speed. The result always stays within the configured
    /// speed range, whatever the sign of `amount`.
    pub fn increase_speed(&mut self, amount: f32) {
        self.speed = (self.speed + amount).clamp(self.min_speed, self.max_speed);
    }

    /// Lower the speed, never below `floor` nor outside the speed range
    pub fn decrease_speed(&mut self, amount: f32, floor: f32) {
        let floor = floor.clamp(self.min_speed, self.max_speed);
        self.speed = (self.speed - amount).clamp(floor, self.max_speed);
    }

    /// Time between two discrete moves at the current speed
    pub fn move_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.speed))
    }

    /// Advance the animation and, once a move interval has built up, move
    /// one cell. Returns true if a move happened.
    pub fn update(&mut self, dt: Duration, grid: Grid, walls: bool) -> bool {
        for segment in &mut self.segments {
            segment.update(self.lerp);
        }

        self.since_last_move += dt;
        if self.since_last_move < self.move_interval() {
            return false;
        }

        self.since_last_move = Duration::ZERO;
        self.step(grid, walls);
        true
    }

    /// One discrete move in the committed direction
    fn step(&mut self, grid: Grid, walls: bool) {
        self.direction = self.next_direction;

        let old_head = &self.segments[0];
        let mut new_cell = old_head.cell().moved_in_direction(self.direction);
        if !walls {
            new_cell = grid.wrap(new_cell);
        }

        if self.growth_pending > 0 {
            // The old head stays put and becomes the neck
            let mut head = old_head.clone();
            head.set_target(new_cell);
            self.segments.insert(0, head);
            self.growth_pending -= 1;
        } else {
            for i in (1..self.segments.len()).rev() {
                let ahead = self.segments[i - 1].cell();
                self.segments[i].set_target(ahead);
            }
            self.segments[0].set_target(new_cell);
        }

        self.just_ate = false;
    }

    /// True if the head shares a cell with the body past the neck
    pub fn collides_with_self(&self) -> bool {
        if self.segments.len() <= NECK_LENGTH {
            return false;
        }

        let head = self.head();
        self.segments[NECK_LENGTH..]
            .iter()
            .any(|segment| segment.cell() == head)
    }

    /// With walls, an out-of-bounds head is fatal. Without walls the head is
    /// wrapped back onto the grid and nothing is reported.
    pub fn check_wall_collision(&mut self, grid: Grid, walls: bool) -> bool {
        let head = self.head();
        if grid.contains(head) {
            return false;
        }
        if walls {
            return true;
        }

        self.segments[0].set_target(grid.wrap(head));
        false
    }

    /// Cut the snake back to at most `length` segments
    pub fn shrink_to(&mut self, length: usize) {
        self.segments.truncate(length.max(1));
    }

    /// Get the head cell
    pub fn head(&self) -> Position {
        self.segments[0].cell()
    }

    /// Continuous head position
    pub fn head_position(&self) -> Point {
        self.segments[0].position()
    }

    /// Get the tail cell (last segment)
    pub fn tail(&self) -> Position {
        self.segments[self.segments.len() - 1].cell()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Occupied cells, head first
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.segments.iter().map(Segment::cell)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn next_direction(&self) -> Direction {
        self.next_direction
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn growth_pending(&self) -> usize {
        self.growth_pending
    }

    /// Set by [`Snake::grow`] and cleared by the next move
    pub fn just_ate(&self) -> bool {
        self.just_ate
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
