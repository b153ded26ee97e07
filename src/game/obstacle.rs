use rand::Rng;
use std::collections::HashSet;

use super::grid::{Grid, Position};

/// A static blocked cell, fatal to run into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Obstacle {
    pub position: Position,
}

impl Obstacle {
    pub fn new(position: Position) -> Self {
        Self { position }
    }
}

/// The ring of wall obstacles lining a walled grid
pub fn border_walls(grid: Grid) -> Vec<Obstacle> {
    grid.border_cells().into_iter().map(Obstacle::new).collect()
}

/// Place up to `count` obstacles at random cells at least two cells away
/// from the edge, skipping cells in `avoid` and each other. An obstacle that
/// finds no free cell within `attempts` tries is dropped.
pub fn scatter<R: Rng>(
    count: usize,
    grid: Grid,
    avoid: &HashSet<Position>,
    attempts: usize,
    rng: &mut R,
) -> Vec<Obstacle> {
    let mut taken = HashSet::new();
    let mut obstacles = Vec::with_capacity(count);
    if grid.width < 5 || grid.height < 5 {
        return obstacles;
    }

    for _ in 0..count {
        let placed = (0..attempts)
            .map(|_| {
                Position::new(
                    rng.gen_range(2..grid.width - 2),
                    rng.gen_range(2..grid.height - 2),
                )
            })
            .find(|cell| !avoid.contains(cell) && !taken.contains(cell));

        match placed {
            Some(cell) => {
                taken.insert(cell);
                obstacles.push(Obstacle::new(cell));
            }
            None => tracing::debug!(attempts, "skipping obstacle, no free cell found"),
        }
    }

    obstacles
}
