//! The board engine: packed 4x4 state, slide/merge ops over precomputed
//! line tables, random tile spawning, and terminal-state detection.
//!
//! - `Board` is the packed grid with ergonomic accessors.
//! - `ops` holds the hot paths; `tables` the per-line lookup tables.
//!
//! The API is deliberately small: score and lifecycle are owned by the
//! session type one level up, not by the board.

mod ops;
mod state;
mod tables;

pub use ops::{count_empty, highest_tile, is_terminal, slide, spawn_tile, MoveOutcome};
pub use state::{Board, Move, TilesIter};

/// Build the line tables now instead of on the first slide.
/// Safe to call multiple times.
pub fn init() {
    tables::init();
}
