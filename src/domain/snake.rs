use anyhow::{bail, Result};
use rand::prelude::*;

use crate::domain::{Cell, Direction, DIRECTIONS};
use crate::engine;
use crate::stat::Stats;

/// Number of cells per row / column in the arena grid.
pub const ARENA_CELLS: usize = 32;

/// Head pathfinding towards the food for a snake whose body slides one
/// cell per tick. The planning state is the entire ordered body (tail
/// first, head last): each planned move pushes the new head cell and
/// pops the tail, so a cell the tail has vacated by the time the head
/// arrives is legal to enter, while the snake's own future body is not.
#[derive(Debug, Clone)]
pub struct SnakePuzzle {
    snake: Vec<Cell>,
    food: Cell,
}

type Body = Vec<Cell>;

impl SnakePuzzle {
    pub fn new(snake: Vec<Cell>, food: Cell) -> Result<Self> {
        if snake.is_empty() {
            bail!("snake body is empty");
        }
        for &cell in &snake {
            if cell.0 >= ARENA_CELLS || cell.1 >= ARENA_CELLS {
                bail!("snake cell {cell:?} is outside the {ARENA_CELLS}x{ARENA_CELLS} arena");
            }
        }
        for (idx, &cell) in snake.iter().enumerate() {
            if snake[idx + 1..].contains(&cell) {
                bail!("snake body self-intersects at {cell:?}");
            }
        }
        for window in snake.windows(2) {
            let dist = window[0].0.abs_diff(window[1].0) + window[0].1.abs_diff(window[1].1);
            if dist != 1 {
                bail!(
                    "snake cells {:?} and {:?} are not adjacent",
                    window[0],
                    window[1]
                );
            }
        }
        if food.0 >= ARENA_CELLS || food.1 >= ARENA_CELLS {
            bail!("food {food:?} is outside the arena");
        }
        if snake.contains(&food) {
            bail!("food {food:?} overlaps the snake body");
        }
        Ok(SnakePuzzle { snake, food })
    }

    /// Random self-avoiding snake of `length` cells plus a food cell off
    /// the body. Deterministic for a given rng state.
    pub fn generate<R: Rng + ?Sized>(length: usize, rng: &mut R) -> Result<Self> {
        if length == 0 || length > ARENA_CELLS * ARENA_CELLS / 2 {
            bail!("cannot generate a snake of length {length}");
        }

        // Grow from a random head cell; restart on dead ends.
        'attempt: loop {
            let head = (
                rng.gen_range(0..ARENA_CELLS),
                rng.gen_range(0..ARENA_CELLS),
            );
            let mut body = vec![head];
            while body.len() < length {
                let tail = *body.last().unwrap();
                let mut candidates: Vec<Cell> = DIRECTIONS
                    .iter()
                    .filter_map(|dir| dir.step(tail, ARENA_CELLS, ARENA_CELLS))
                    .filter(|cell| !body.contains(cell))
                    .collect();
                candidates.shuffle(rng);
                match candidates.first() {
                    Some(&cell) => body.push(cell),
                    None => continue 'attempt,
                }
            }
            body.reverse();

            let food = loop {
                let cell = (
                    rng.gen_range(0..ARENA_CELLS),
                    rng.gen_range(0..ARENA_CELLS),
                );
                if !body.contains(&cell) {
                    break cell;
                }
            };

            return SnakePuzzle::new(body, food);
        }
    }

    fn expand(body: &Body) -> Vec<(Direction, Body)> {
        let head = *body.last().unwrap();
        DIRECTIONS
            .iter()
            .filter_map(|&dir| {
                let new_head = dir.step(head, ARENA_CELLS, ARENA_CELLS)?;
                // The tail cell is free by the time the head arrives.
                let remaining = &body[1..];
                if remaining.contains(&new_head) {
                    return None;
                }
                let mut next: Body = remaining.to_vec();
                next.push(new_head);
                Some((dir, next))
            })
            .collect()
    }

    /// Directions for each head step until the food is reached, or `None`
    /// when the body walls the food off completely.
    pub fn find_directions(&self) -> Option<Vec<Direction>> {
        self.find_directions_with_stats(None, &mut Stats::default())
    }

    pub fn find_directions_with_stats(
        &self,
        max_expansions: Option<usize>,
        stats: &mut Stats,
    ) -> Option<Vec<Direction>> {
        engine::search_bounded(
            self.snake.clone(),
            |body: &Body| *body.last().unwrap() == self.food,
            Self::expand,
            max_expansions,
            stats,
        )
    }

    /// Replays the directions tick by tick under the same rules the game
    /// loop enforces and checks the head lands on the food.
    pub fn verify_directions(&self, directions: &[Direction]) -> bool {
        let mut body = self.snake.clone();
        for &dir in directions {
            let head = *body.last().unwrap();
            let new_head = match dir.step(head, ARENA_CELLS, ARENA_CELLS) {
                Some(cell) => cell,
                None => return false,
            };
            body.remove(0);
            if body.contains(&new_head) {
                return false;
            }
            body.push(new_head);
        }
        *body.last().unwrap() == self.food
    }
}
