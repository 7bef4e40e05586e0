use serde::{Deserialize, Serialize};

use crate::error::GridError;
use crate::grid::{Grid, Rows};
use crate::types::{Tile, CELL_COUNT, EMPTY, GRID_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Row 0 is the top
    pub grid: Rows,
    pub score: u64,
    pub moves: u32,
    pub max_tile: Tile,
    pub empty_cells: u32,
    pub started: bool,
    pub game_over: bool,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.grid = [[EMPTY; GRID_SIZE]; GRID_SIZE];
        self.score = 0;
        self.moves = 0;
        self.max_tile = EMPTY;
        self.empty_cells = CELL_COUNT as u32;
        self.started = false;
        self.game_over = false;
    }

    /// Validate and rebuild the grid this snapshot describes
    pub fn to_grid(&self) -> Result<Grid, GridError> {
        Grid::from_rows(self.grid)
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        let mut s = Self {
            grid: [[EMPTY; GRID_SIZE]; GRID_SIZE],
            score: 0,
            moves: 0,
            max_tile: EMPTY,
            empty_cells: 0,
            started: false,
            game_over: false,
        };
        s.clear();
        s
    }
}
