//! 2048 grid engine (workspace facade crate).
//!
//! Keeps a single `grid2048::{core,adapter,types}` public API while the
//! implementation lives in dedicated crates under `crates/`.

pub use grid2048_adapter as adapter;
pub use grid2048_core as core;
pub use grid2048_types as types;
