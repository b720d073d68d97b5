use anyhow::{bail, Context, Result};

use crate::domain::{Cell, Direction, DIRECTIONS};
use crate::engine;
use crate::stat::Stats;

/// A rectangular maze parsed from the plain-text board format: `@` marks
/// the start, `!` the goal, spaces are free cells and anything else is a
/// wall. Rows may be ragged; cells past a short row count as walls.
#[derive(Debug, Clone)]
pub struct Maze {
    pub height: usize,
    pub width: usize,
    grid: Vec<Vec<bool>>,
    pub start: Cell,
    pub goal: Cell,
}

impl Maze {
    pub fn from_file(path: &str) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read maze file {path:?}"))?;
        Self::parse(&text).with_context(|| format!("malformed maze file {path:?}"))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let rows: Vec<&str> = text.lines().filter(|line| !line.is_empty()).collect();
        if rows.is_empty() {
            bail!("maze has no rows");
        }

        let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0);
        let mut grid = Vec::with_capacity(rows.len());
        let mut start = None;
        let mut goal = None;

        for (row_idx, row) in rows.iter().enumerate() {
            let mut grid_row = vec![false; width];
            for (col_idx, ch) in row.chars().enumerate() {
                grid_row[col_idx] = matches!(ch, ' ' | '!' | '@');
                match ch {
                    '@' if start.replace((row_idx, col_idx)).is_some() => {
                        bail!("maze has more than one start marker '@'")
                    }
                    '!' if goal.replace((row_idx, col_idx)).is_some() => {
                        bail!("maze has more than one goal marker '!'")
                    }
                    _ => {}
                }
            }
            grid.push(grid_row);
        }

        let start = start.context("maze has no start marker '@'")?;
        let goal = goal.context("maze has no goal marker '!'")?;

        Ok(Maze {
            height: grid.len(),
            width,
            grid,
            start,
            goal,
        })
    }

    pub fn is_free(&self, cell: Cell) -> bool {
        cell.0 < self.height && cell.1 < self.width && self.grid[cell.0][cell.1]
    }

    fn expand(&self, cell: Cell) -> Vec<(Direction, Cell)> {
        DIRECTIONS
            .iter()
            .filter_map(|&dir| {
                let next = dir.step(cell, self.height, self.width)?;
                self.is_free(next).then_some((dir, next))
            })
            .collect()
    }

    /// Shortest path from start to goal as the ordered position list,
    /// start included. `None` when the goal is walled off.
    pub fn find_path(&self) -> Option<Vec<Cell>> {
        self.find_path_with_stats(None, &mut Stats::default())
    }

    pub fn find_path_with_stats(
        &self,
        max_expansions: Option<usize>,
        stats: &mut Stats,
    ) -> Option<Vec<Cell>> {
        let directions = engine::search_bounded(
            self.start,
            |cell| *cell == self.goal,
            |&cell| self.expand(cell),
            max_expansions,
            stats,
        )?;

        let mut path = vec![self.start];
        let mut cell = self.start;
        for dir in directions {
            let (drow, dcol) = dir.delta();
            cell = (
                (cell.0 as isize + drow) as usize,
                (cell.1 as isize + dcol) as usize,
            );
            path.push(cell);
        }
        Some(path)
    }

    /// Independent replay check: the path starts at the start cell, ends at
    /// the goal, stays on free cells and only takes unit steps.
    pub fn verify_path(&self, path: &[Cell]) -> bool {
        if path.first() != Some(&self.start) || path.last() != Some(&self.goal) {
            return false;
        }
        for window in path.windows(2) {
            let (prev, pos) = (window[0], window[1]);
            if !self.is_free(pos) {
                return false;
            }
            let dist = prev.0.abs_diff(pos.0) + prev.1.abs_diff(pos.1);
            if dist != 1 {
                return false;
            }
        }
        true
    }
}
