//! The game session: one board plus its score, best score, and game-over
//! latch, driven by directional moves from a frontend.

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::engine::{self, Board, Move};
use crate::store::{BestScoreStore, StoreError};

/// What a single `step` did.
///
/// A rejected move (`moved == false`) is a normal outcome, not an error:
/// nothing spawned, nothing scored, nothing to re-render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    pub moved: bool,
    pub points: u64,
    pub game_over: bool,
}

/// A running game: board, score, and the persistence port for the best
/// score. The RNG is owned by the session so that a seed fully determines
/// the tile stream.
pub struct Game<S, R = StdRng> {
    board: Board,
    score: u64,
    best_score: u64,
    game_over: bool,
    store: S,
    rng: R,
}

impl<S: BestScoreStore> Game<S> {
    /// Start a session with a seeded `StdRng`, loading the persisted best
    /// score and seeding the opening board with two tiles.
    pub fn new(store: S, seed: u64) -> Result<Self, StoreError> {
        Self::with_rng(store, StdRng::seed_from_u64(seed))
    }
}

impl<S: BestScoreStore, R: Rng> Game<S, R> {
    /// Start a session with a caller-provided random source.
    pub fn with_rng(store: S, rng: R) -> Result<Self, StoreError> {
        engine::init();
        let best_score = store.load()?;
        let mut game = Game {
            board: Board::EMPTY,
            score: 0,
            best_score,
            game_over: false,
            store,
            rng,
        };
        game.new_game();
        Ok(game)
    }

    /// Apply one directional move.
    ///
    /// Accepted moves earn their merge points, persist a new best score,
    /// spawn one tile, and re-evaluate the terminal state. Rejected moves
    /// (and any input after game over) leave the session untouched. The
    /// only fallible part is the best-score write.
    pub fn step(&mut self, dir: Move) -> Result<StepOutcome, StoreError> {
        if self.game_over {
            return Ok(StepOutcome {
                moved: false,
                points: 0,
                game_over: true,
            });
        }
        let outcome = engine::slide(self.board, dir);
        if !outcome.moved {
            debug!("rejected move {dir:?}");
            return Ok(StepOutcome {
                moved: false,
                points: 0,
                game_over: false,
            });
        }
        self.score += outcome.points;
        if self.score > self.best_score {
            self.best_score = self.score;
            self.store.save(self.best_score)?;
        }
        self.board = engine::spawn_tile(outcome.board, &mut self.rng);
        self.game_over = engine::is_terminal(self.board);
        debug!(
            "move {dir:?}: +{} points, score {}, game_over {}",
            outcome.points, self.score, self.game_over
        );
        Ok(StepOutcome {
            moved: true,
            points: outcome.points,
            game_over: self.game_over,
        })
    }

    /// Reset board, score, and the game-over latch, then seed two tiles.
    /// The best score is retained.
    pub fn new_game(&mut self) {
        self.board = Board::EMPTY;
        self.score = 0;
        self.game_over = false;
        self.board = engine::spawn_tile(self.board, &mut self.rng);
        self.board = engine::spawn_tile(self.board, &mut self.rng);
    }

    pub fn board(&self) -> Board {
        self.board
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn best_score(&self) -> u64 {
        self.best_score
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Borrow the persistence port (mainly for tests and shutdown hooks).
    pub fn store(&self) -> &S {
        &self.store
    }
}
