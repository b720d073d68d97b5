use anyhow::{bail, Context, Result};

use crate::domain::{Direction, DIRECTIONS};
use crate::engine;
use crate::stat::Stats;

/// Sliding-tile board of side `size`, stored flattened in row-major
/// order with `0` for the empty square. Actions are the direction the
/// *empty square* moves, even though on screen it is the neighboring
/// tile that slides.
#[derive(Debug, Clone)]
pub struct FifteenPuzzle {
    size: usize,
    tiles: Vec<u8>,
}

type Tiles = Vec<u8>;

impl FifteenPuzzle {
    pub fn from_file(path: &str) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read board file {path:?}"))?;
        let rows: Vec<Vec<u8>> =
            serde_json::from_str(&text).with_context(|| format!("malformed board file {path:?}"))?;
        Self::from_rows(rows).with_context(|| format!("invalid board in {path:?}"))
    }

    pub fn from_rows(rows: Vec<Vec<u8>>) -> Result<Self> {
        let size = rows.len();
        if size < 2 {
            bail!("board must be at least 2x2, got {size} rows");
        }
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != size {
                bail!("row {idx} has {} cells, expected {size}", row.len());
            }
        }
        let tiles: Tiles = rows.into_iter().flatten().collect();

        // Exactly the tiles 0..n^2, each once; 0 is the empty marker.
        let mut seen = vec![false; size * size];
        for &tile in &tiles {
            match seen.get_mut(tile as usize) {
                Some(slot) if !*slot => *slot = true,
                Some(_) => bail!("tile {tile} appears more than once"),
                None => bail!("tile {tile} does not fit a {size}x{size} board"),
            }
        }

        Ok(FifteenPuzzle { size, tiles })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    fn empty_index(tiles: &[u8]) -> usize {
        tiles.iter().position(|&t| t == 0).unwrap_or(0)
    }

    fn solved(tiles: &[u8]) -> bool {
        let last = tiles.len() - 1;
        tiles[last] == 0 && tiles[..last].iter().enumerate().all(|(i, &t)| t as usize == i + 1)
    }

    /// Board after moving the empty square one step in `direction`, or
    /// `None` if that would leave the board.
    pub fn apply(&self, tiles: &[u8], direction: Direction) -> Option<Tiles> {
        let empty = Self::empty_index(tiles);
        let cell = (empty / self.size, empty % self.size);
        let (row, col) = direction.step(cell, self.size, self.size)?;
        let mut next = tiles.to_vec();
        next.swap(empty, row * self.size + col);
        Some(next)
    }

    /// Shortest direction sequence for the empty square that sorts the
    /// tiles into 1..n^2-1 row-major with the empty square last. `None`
    /// for the unsolvable half of the permutation space.
    pub fn find_instructions(&self) -> Option<Vec<Direction>> {
        self.find_instructions_with_stats(None, &mut Stats::default())
    }

    pub fn find_instructions_with_stats(
        &self,
        max_expansions: Option<usize>,
        stats: &mut Stats,
    ) -> Option<Vec<Direction>> {
        engine::search_bounded(
            self.tiles.clone(),
            |tiles: &Tiles| Self::solved(tiles),
            |tiles| {
                DIRECTIONS
                    .iter()
                    .filter_map(|&dir| self.apply(tiles, dir).map(|next| (dir, next)))
                    .collect()
            },
            max_expansions,
            stats,
        )
    }

    pub fn verify_instructions(&self, instructions: &[Direction]) -> bool {
        let mut tiles = self.tiles.clone();
        for &dir in instructions {
            tiles = match self.apply(&tiles, dir) {
                Some(next) => next,
                None => return false,
            };
        }
        Self::solved(&tiles)
    }
}
