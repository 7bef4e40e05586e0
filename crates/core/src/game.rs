//! Game module - turn-driving session around the grid engine
//!
//! Implements the play cycle: awaiting input, move, spawn on change, then
//! game over once no direction can change the grid.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::engine::{GridEngine, SpawnResult};
use crate::grid::Grid;
use crate::rng::{FastRng, SimpleRng, SpawnPolicy, TileRng};
use crate::snapshot::GameSnapshot;
use crate::types::{Direction, Tile, INITIAL_TILES};

/// What one call to [`Game::apply`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TurnOutcome {
    /// False when the input was ignored (not started, or already over)
    pub applied: bool,
    pub moved: bool,
    pub merges: u32,
    pub score_gained: u64,
    pub spawned: Option<SpawnResult>,
    pub game_over: bool,
}

impl TurnOutcome {
    fn ignored(game_over: bool) -> Self {
        Self {
            game_over,
            ..Self::default()
        }
    }
}

/// Complete game session
#[derive(Debug, Clone)]
pub struct Game<R = FastRng> {
    engine: GridEngine,
    rng: R,
    policy: SpawnPolicy,
    score: u64,
    /// Moves that changed the grid
    moves: u32,
    started: bool,
    game_over: bool,
}

impl Game<SimpleRng> {
    /// Deterministic game driven by the LCG
    pub fn seeded(seed: u32) -> Self {
        Self::new(SimpleRng::new(seed))
    }
}

impl<R: TileRng> Game<R> {
    pub fn new(rng: R) -> Self {
        Self::with_policy(rng, SpawnPolicy::default())
    }

    pub fn with_policy(rng: R, policy: SpawnPolicy) -> Self {
        Self {
            engine: GridEngine::new(),
            rng,
            policy,
            score: 0,
            moves: 0,
            started: false,
            game_over: false,
        }
    }

    /// Resume play from an existing grid.
    ///
    /// The session counts as started; it is over at once if the grid admits
    /// no move.
    pub fn from_grid(grid: Grid, rng: R) -> Self {
        Self::from_grid_with_policy(grid, rng, SpawnPolicy::default())
    }

    /// Like [`Game::from_grid`], keeping a custom spawn policy
    pub fn from_grid_with_policy(grid: Grid, rng: R, policy: SpawnPolicy) -> Self {
        let mut game = Self::with_policy(rng, policy);
        game.engine = GridEngine::from_grid(grid);
        game.started = true;
        game.game_over = !game.engine.is_move_available();
        game
    }

    /// Start the game by placing the opening tiles
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        for _ in 0..INITIAL_TILES {
            self.engine.spawn_tile(&mut self.rng, &self.policy);
        }
        self.game_over = !self.engine.is_move_available();
    }

    /// Clear the grid and counters, then start again
    pub fn restart(&mut self) {
        self.engine.reset();
        self.score = 0;
        self.moves = 0;
        self.started = false;
        self.game_over = false;
        self.start();
    }

    /// Apply one directional input
    pub fn apply(&mut self, direction: Direction) -> TurnOutcome {
        if !self.started || self.game_over {
            return TurnOutcome::ignored(self.game_over);
        }

        let mv = self.engine.move_tiles(direction);
        let mut turn = TurnOutcome {
            applied: true,
            moved: mv.moved,
            merges: mv.merges,
            score_gained: mv.score,
            spawned: None,
            game_over: false,
        };

        if mv.moved {
            self.score += mv.score;
            self.moves += 1;
            turn.spawned = Some(self.engine.spawn_tile(&mut self.rng, &self.policy));
        }

        // No move left implies a full grid once tiles are on it.
        if !self.engine.is_move_available() {
            self.game_over = true;
        }
        if self.game_over {
            debug!(
                "game over after {} moves, score {}, max tile {}",
                self.moves,
                self.score,
                self.max_tile()
            );
        }

        turn.game_over = self.game_over;
        turn
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn max_tile(&self) -> Tile {
        self.engine.grid().max_tile()
    }

    pub fn grid(&self) -> &Grid {
        self.engine.grid()
    }

    pub fn engine(&self) -> &GridEngine {
        &self.engine
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut snap = GameSnapshot::default();
        self.snapshot_into(&mut snap);
        snap
    }

    /// Fill an existing snapshot without allocating
    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        let grid = self.engine.grid();
        out.grid = grid.rows();
        out.score = self.score;
        out.moves = self.moves;
        out.max_tile = grid.max_tile();
        out.empty_cells = grid.empty_count() as u32;
        out.started = self.started;
        out.game_over = self.game_over;
    }
}

impl Default for Game<FastRng> {
    fn default() -> Self {
        Self::new(FastRng::new())
    }
}
