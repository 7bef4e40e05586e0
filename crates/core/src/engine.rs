//! Grid engine - directional moves, tile spawning and terminal detection
//!
//! Every direction runs the same routine: each of the four lines is read
//! through [`Direction::cell`], compacted toward its target end, and written
//! back. No per-direction loop bounds exist to drift apart.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::line::compact_line;
use crate::rng::{SpawnPolicy, TileRng};
use crate::types::{Direction, Tile, EMPTY, GRID_SIZE};

/// Result of a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveOutcome {
    /// Any tile changed position or value
    pub moved: bool,
    pub merges: u32,
    /// Sum of the values produced by merges
    pub score: u64,
}

/// Result of a spawn attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpawnResult {
    Spawned { x: usize, y: usize, value: Tile },
    /// No empty cell was left; the grid is untouched
    GridFull,
}

impl SpawnResult {
    pub fn is_grid_full(&self) -> bool {
        matches!(self, SpawnResult::GridFull)
    }
}

/// Owns the grid and applies the 2048 rules to it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridEngine {
    grid: Grid,
}

impl GridEngine {
    /// Engine over an empty grid
    pub fn new() -> Self {
        Self { grid: Grid::new() }
    }

    pub fn from_grid(grid: Grid) -> Self {
        Self { grid }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Consume the engine, returning its grid
    pub fn into_grid(self) -> Grid {
        self.grid
    }

    pub fn reset(&mut self) {
        self.grid.clear();
    }

    /// Slide and merge every line toward `direction`.
    pub fn move_tiles(&mut self, direction: Direction) -> MoveOutcome {
        let (grid, outcome) = shift(&self.grid, direction);
        self.grid = grid;
        outcome
    }

    /// Compute a move without applying it
    pub fn preview(&self, direction: Direction) -> (Grid, MoveOutcome) {
        shift(&self.grid, direction)
    }

    /// Place a 2 or 4 in a uniformly chosen empty cell.
    pub fn spawn_tile<R: TileRng + ?Sized>(
        &mut self,
        rng: &mut R,
        policy: &SpawnPolicy,
    ) -> SpawnResult {
        let empty = self.grid.empty_cells();
        if empty.is_empty() {
            debug!("spawn skipped: grid full");
            return SpawnResult::GridFull;
        }

        let (x, y) = empty[rng.next_index(empty.len())];
        let value = policy.draw(rng);
        self.grid.set(x, y, value);
        debug!("spawned {value} at ({x}, {y})");
        SpawnResult::Spawned { x, y, value }
    }

    /// True if some direction would change the grid.
    ///
    /// A grid with an empty cell always admits a move: some tile can slide
    /// into it unless the grid is entirely empty.
    pub fn is_move_available(&self) -> bool {
        let empty = self.grid.empty_count();
        if empty > 0 {
            return empty < GRID_SIZE * GRID_SIZE;
        }
        self.grid.has_adjacent_pair()
    }
}

/// The axis-parametrized move used by every direction
fn shift(src: &Grid, direction: Direction) -> (Grid, MoveOutcome) {
    let mut dst = Grid::new();
    let mut outcome = MoveOutcome::default();

    for line in 0..GRID_SIZE {
        let mut cells = [EMPTY; GRID_SIZE];
        for (pos, cell) in cells.iter_mut().enumerate() {
            let (x, y) = direction.cell(line, pos);
            *cell = src.get(x, y).unwrap_or(EMPTY);
        }

        let result = compact_line(cells);
        outcome.moved |= result.moved;
        outcome.merges += result.merges;
        outcome.score += result.score;

        for (pos, &value) in result.line.iter().enumerate() {
            let (x, y) = direction.cell(line, pos);
            dst.set(x, y, value);
        }
    }

    (dst, outcome)
}
