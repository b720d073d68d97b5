use std::collections::HashSet;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::domain::{Cell, Direction, DIRECTIONS};
use crate::engine;
use crate::stat::Stats;

/// Number of cells per row / column of the board.
pub const GRID_CELLS: usize = 6;

/// The two cells the player's car must occupy to win.
const EXIT_CELLS: [Cell; 2] = [(2, 4), (2, 5)];

/// One move: which vehicle, and which way it slides.
pub type Instruction = (usize, Direction);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Vehicle record as stored in the challenge JSON files: the occupied
/// `[row, column]` cells plus an RGB color. Orientation is inferred from
/// the first two cells.
#[derive(Debug, Deserialize)]
pub struct VehicleRecord {
    pub cells: Vec<[usize; 2]>,
    pub color: [u8; 3],
}

#[derive(Debug, Clone)]
struct Vehicle {
    orientation: Orientation,
    length: usize,
}

/// Positions of every vehicle, as each one's minimum occupied cell.
/// Lengths and orientations never change, so the origin vector is a
/// complete, canonical state encoding.
type Origins = Vec<Cell>;

#[derive(Debug, Clone)]
pub struct RushHourPuzzle {
    vehicles: Vec<Vehicle>,
    origins: Origins,
    target: usize,
}

impl RushHourPuzzle {
    pub fn from_file(path: &str) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read challenge file {path:?}"))?;
        let records: Vec<VehicleRecord> = serde_json::from_str(&text)
            .with_context(|| format!("malformed challenge file {path:?}"))?;
        Self::from_records(records).with_context(|| format!("invalid challenge in {path:?}"))
    }

    pub fn from_records(records: Vec<VehicleRecord>) -> Result<Self> {
        if records.is_empty() {
            bail!("challenge has no vehicles");
        }

        let mut vehicles = Vec::with_capacity(records.len());
        let mut origins = Vec::with_capacity(records.len());
        let mut occupied: HashSet<Cell> = HashSet::new();

        for (idx, record) in records.iter().enumerate() {
            let mut cells: Vec<Cell> =
                record.cells.iter().map(|&[row, col]| (row, col)).collect();
            if cells.len() < 2 {
                bail!("vehicle {idx} has fewer than two cells");
            }
            cells.sort_unstable();

            let orientation = if cells[0].0 == cells[1].0 {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            };
            for (offset, &cell) in cells.iter().enumerate() {
                if cell.0 >= GRID_CELLS || cell.1 >= GRID_CELLS {
                    bail!("vehicle {idx} cell {cell:?} is off the board");
                }
                let expected = match orientation {
                    Orientation::Horizontal => (cells[0].0, cells[0].1 + offset),
                    Orientation::Vertical => (cells[0].0 + offset, cells[0].1),
                };
                if cell != expected {
                    bail!("vehicle {idx} cells are not contiguous and collinear");
                }
                if !occupied.insert(cell) {
                    bail!("vehicle {idx} overlaps another vehicle at {cell:?}");
                }
            }

            vehicles.push(Vehicle {
                orientation,
                length: cells.len(),
            });
            origins.push(cells[0]);
        }

        let target = reddest_vehicle(&records);
        Ok(RushHourPuzzle {
            vehicles,
            origins,
            target,
        })
    }

    /// Index of the player's car.
    pub fn target(&self) -> usize {
        self.target
    }

    fn cells(&self, vehicle: usize, origin: Cell) -> Vec<Cell> {
        let length = self.vehicles[vehicle].length;
        match self.vehicles[vehicle].orientation {
            Orientation::Horizontal => {
                (0..length).map(|i| (origin.0, origin.1 + i)).collect()
            }
            Orientation::Vertical => (0..length).map(|i| (origin.0 + i, origin.1)).collect(),
        }
    }

    fn collinear(&self, vehicle: usize, direction: Direction) -> bool {
        match self.vehicles[vehicle].orientation {
            Orientation::Horizontal => {
                matches!(direction, Direction::Left | Direction::Right)
            }
            Orientation::Vertical => matches!(direction, Direction::Up | Direction::Down),
        }
    }

    /// Origins after sliding one vehicle one cell, or `None` when the
    /// move is off-axis, out of bounds or collides with another vehicle.
    pub fn apply(&self, origins: &Origins, (vehicle, direction): Instruction) -> Option<Origins> {
        if vehicle >= self.vehicles.len() || !self.collinear(vehicle, direction) {
            return None;
        }
        let new_origin = direction.step(origins[vehicle], GRID_CELLS, GRID_CELLS)?;
        let new_cells = self.cells(vehicle, new_origin);
        if new_cells
            .iter()
            .any(|cell| cell.0 >= GRID_CELLS || cell.1 >= GRID_CELLS)
        {
            return None;
        }
        for (other, &origin) in origins.iter().enumerate() {
            if other == vehicle {
                continue;
            }
            let occupied = self.cells(other, origin);
            if new_cells.iter().any(|cell| occupied.contains(cell)) {
                return None;
            }
        }
        let mut next = origins.clone();
        next[vehicle] = new_origin;
        Some(next)
    }

    fn at_exit(&self, origins: &Origins) -> bool {
        self.cells(self.target, origins[self.target]) == EXIT_CELLS
    }

    /// Shortest instruction sequence that brings the player's car onto
    /// the exit cells. Empty if it already sits there.
    pub fn find_instructions(&self) -> Option<Vec<Instruction>> {
        self.find_instructions_with_stats(None, &mut Stats::default())
    }

    pub fn find_instructions_with_stats(
        &self,
        max_expansions: Option<usize>,
        stats: &mut Stats,
    ) -> Option<Vec<Instruction>> {
        engine::search_bounded(
            self.origins.clone(),
            |origins: &Origins| self.at_exit(origins),
            |origins| {
                let mut successors = Vec::new();
                for vehicle in 0..self.vehicles.len() {
                    for &direction in DIRECTIONS.iter() {
                        if let Some(next) = self.apply(origins, (vehicle, direction)) {
                            successors.push(((vehicle, direction), next));
                        }
                    }
                }
                successors
            },
            max_expansions,
            stats,
        )
    }

    pub fn verify_instructions(&self, instructions: &[Instruction]) -> bool {
        let mut origins = self.origins.clone();
        for &instruction in instructions {
            origins = match self.apply(&origins, instruction) {
                Some(next) => next,
                None => return false,
            };
        }
        self.at_exit(&origins)
    }
}

/// The player's car is the reddest of them all: maximum red channel
/// relative to the strongest other channel.
fn reddest_vehicle(records: &[VehicleRecord]) -> usize {
    let redness = |color: &[u8; 3]| {
        let other = color[1].max(color[2]).max(1);
        color[0] as f64 / other as f64
    };
    records
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| {
            redness(&a.color)
                .partial_cmp(&redness(&b.color))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(idx, _)| idx)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(cells: &[[usize; 2]], color: [u8; 3]) -> VehicleRecord {
        VehicleRecord {
            cells: cells.to_vec(),
            color,
        }
    }

    #[test]
    fn test_from_records_validation() {
        assert!(RushHourPuzzle::from_records(vec![]).is_err());
        assert!(RushHourPuzzle::from_records(vec![record(&[[2, 0]], [255, 0, 0])]).is_err());
        assert!(
            RushHourPuzzle::from_records(vec![record(&[[2, 0], [2, 2]], [255, 0, 0])]).is_err()
        );
        assert!(
            RushHourPuzzle::from_records(vec![record(&[[2, 0], [3, 1]], [255, 0, 0])]).is_err()
        );
        assert!(
            RushHourPuzzle::from_records(vec![record(&[[2, 5], [2, 6]], [255, 0, 0])]).is_err()
        );
        assert!(RushHourPuzzle::from_records(vec![
            record(&[[2, 0], [2, 1]], [255, 0, 0]),
            record(&[[2, 1], [3, 1]], [0, 128, 0]),
        ])
        .is_err());
        assert!(
            RushHourPuzzle::from_records(vec![record(&[[2, 0], [2, 1]], [255, 0, 0])]).is_ok()
        );
    }

    #[test]
    fn test_reddest_vehicle_is_the_target() {
        let puzzle = RushHourPuzzle::from_records(vec![
            record(&[[0, 0], [0, 1]], [200, 180, 60]),
            record(&[[2, 0], [2, 1]], [230, 40, 50]),
            record(&[[4, 0], [4, 1]], [90, 90, 90]),
        ])
        .unwrap();
        assert_eq!(puzzle.target(), 1);
    }

    #[test]
    fn test_car_already_at_exit_needs_no_moves() {
        let puzzle =
            RushHourPuzzle::from_records(vec![record(&[[2, 4], [2, 5]], [255, 0, 0])]).unwrap();
        assert_eq!(puzzle.find_instructions(), Some(vec![]));
    }

    #[test]
    fn test_off_axis_moves_are_illegal() {
        let puzzle =
            RushHourPuzzle::from_records(vec![record(&[[2, 0], [2, 1]], [255, 0, 0])]).unwrap();
        let origins = vec![(2, 0)];
        assert!(puzzle.apply(&origins, (0, Direction::Up)).is_none());
        assert!(puzzle.apply(&origins, (0, Direction::Down)).is_none());
        assert!(puzzle.apply(&origins, (0, Direction::Left)).is_none());
        assert!(puzzle.apply(&origins, (0, Direction::Right)).is_some());
    }

    #[test]
    fn test_blocked_exit_is_cleared_first() {
        // A vertical truck covers (2,4); it must slide fully below the
        // exit row (3 moves) before the car crosses (4 moves).
        let puzzle = RushHourPuzzle::from_records(vec![
            record(&[[2, 0], [2, 1]], [255, 0, 0]),
            record(&[[0, 4], [1, 4], [2, 4]], [0, 200, 100]),
        ])
        .unwrap();
        let plan = puzzle.find_instructions().unwrap();
        assert_eq!(plan.len(), 7);
        assert!(puzzle.verify_instructions(&plan));
    }

    #[test]
    fn test_walled_in_car_returns_none() {
        let puzzle = RushHourPuzzle::from_records(vec![
            record(&[[2, 0], [2, 1]], [255, 0, 0]),
            record(&[[0, 2], [1, 2], [2, 2], [3, 2], [4, 2], [5, 2]], [0, 0, 200]),
        ])
        .unwrap();
        assert_eq!(puzzle.find_instructions(), None);
    }

    #[test]
    fn test_from_file_sample_challenge() {
        let puzzle = RushHourPuzzle::from_file("puzzles/challenges/1.json").unwrap();
        assert_eq!(puzzle.target(), 0);
        let plan = puzzle.find_instructions().unwrap();
        assert_eq!(plan.len(), 5);
        assert!(puzzle.verify_instructions(&plan));
    }

    #[test]
    fn test_plan_length_stable_across_reruns() {
        let records = || {
            vec![
                record(&[[2, 0], [2, 1]], [255, 0, 0]),
                record(&[[0, 4], [1, 4], [2, 4]], [0, 200, 100]),
                record(&[[4, 3], [4, 4]], [120, 120, 0]),
            ]
        };
        let first = RushHourPuzzle::from_records(records())
            .unwrap()
            .find_instructions()
            .unwrap();
        let second = RushHourPuzzle::from_records(records())
            .unwrap()
            .find_instructions()
            .unwrap();
        assert_eq!(first.len(), second.len());
    }
}
