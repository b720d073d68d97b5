pub mod fifteen;
pub mod fort;
pub mod jugs;
pub mod maze;
pub mod rushhour;
pub mod snake;

use serde::{Deserialize, Serialize};

/// A (row, column) board cell. Rows grow downward, columns rightward.
pub type Cell = (usize, usize);

/// The four grid directions shared by the maze, snake, 15-puzzle and
/// rush-hour boards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Enumeration order doubles as the action precedence the adapters
/// expose to the search, so it is fixed here once.
pub const DIRECTIONS: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
];

impl Direction {
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// Move `cell` one step, staying inside a `height` x `width` board.
    /// Returns `None` when the step would leave the board.
    pub fn step(self, cell: Cell, height: usize, width: usize) -> Option<Cell> {
        let (drow, dcol) = self.delta();
        let row = cell.0 as isize + drow;
        let col = cell.1 as isize + dcol;
        if row < 0 || col < 0 || row >= height as isize || col >= width as isize {
            return None;
        }
        Some((row as usize, col as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_respects_bounds() {
        assert_eq!(Direction::Up.step((0, 3), 4, 4), None);
        assert_eq!(Direction::Left.step((3, 0), 4, 4), None);
        assert_eq!(Direction::Down.step((3, 0), 4, 4), None);
        assert_eq!(Direction::Right.step((1, 1), 4, 4), Some((1, 2)));
    }
}
