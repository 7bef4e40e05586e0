//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains the 2048 rules: the tile grid, directional moves with
//! merging, random tile spawning and terminal detection. It has **no
//! dependencies** on rendering, input devices, networking or timing, making it:
//!
//! - **Deterministic**: Same seed produces identical games
//! - **Testable**: Randomness is injected through [`TileRng`]
//! - **Fast**: Moves and spawns never allocate
//!
//! # Module Structure
//!
//! - [`grid`]: 4x4 tile matrix with validation, snapshots and adjacency queries
//! - [`line`]: the slide-and-merge rule for a single row or column
//! - [`engine`]: [`GridEngine`] applying moves and spawns to a grid
//! - [`rng`]: injectable random sources and the 2-vs-4 spawn policy
//! - [`game`]: [`Game`] session driving the turn cycle and score
//! - [`snapshot`]: serializable view of a session
//!
//! # Game Rules
//!
//! - **Move**: every line slides toward the chosen edge; two equal tiles that
//!   meet merge into one of double value
//! - **Single merge**: a tile merges at most once per move
//! - **Spawn**: after a move that changed the grid, a 2 (90%) or 4 (10%)
//!   appears in a random empty cell
//! - **Game over**: no direction can change the grid
//!
//! # Example
//!
//! ```
//! use grid2048_core::{Game, Grid};
//! use grid2048_core::rng::SimpleRng;
//! use grid2048_types::Direction;
//!
//! let grid = Grid::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
//! let mut game = Game::from_grid(grid, SimpleRng::new(7));
//!
//! let turn = game.apply(Direction::Left);
//! assert!(turn.moved);
//! assert_eq!(game.grid().get(0, 0), Some(4));
//! assert_eq!(game.score(), 4);
//! ```

pub mod engine;
pub mod error;
pub mod game;
pub mod grid;
pub mod line;
pub mod rng;
pub mod snapshot;

pub use grid2048_types as types;

// Re-export commonly used types for convenience
pub use engine::{GridEngine, MoveOutcome, SpawnResult};
pub use error::GridError;
pub use game::{Game, TurnOutcome};
pub use grid::{Grid, Rows};
pub use line::{compact_line, LineOutcome};
pub use rng::{FastRng, SimpleRng, SpawnPolicy, TileRng};
pub use snapshot::GameSnapshot;
