//! # Engine collaborator
//! An engine is an opaque oracle: it is handed a FEN string and answers with a move in
//! coordinate notation. Its answer is never trusted, the game checks it against the
//! legal moves before playing it.

use std::time::Duration;

use rand::{rngs::SmallRng, Rng, SeedableRng};
use thiserror::Error;

use crate::chess::{fen::FenError, position::Position};

/// Limits an engine should respect while looking for a move.
///
/// Both are hints, an engine may ignore them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnalysisOptions {
    pub depth: Option<u8>,
    pub movetime: Option<Duration>,
}
impl AnalysisOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maximum depth of the search, in plies.
    pub fn with_depth(mut self, depth: u8) -> Self {
        self.depth = Some(depth);
        self
    }

    /// Time the engine may spend on the move.
    pub fn with_movetime(mut self, movetime: Duration) -> Self {
        self.movetime = Some(movetime);
        self
    }
}

/// Answer of an engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BestMove {
    /// Best move, in UCI notation.
    pub uci: String,
    /// Expected reply, if the engine has one.
    pub ponder: Option<String>,
    /// Evaluation in centipawns, from the side to move's point of view.
    pub score: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("engine found no move to play")]
    NoMove,
    #[error("engine answered with {0:?}, which is not a legal move")]
    InvalidReply(String),
    #[error("engine could not read the position: {0}")]
    InvalidPosition(#[from] FenError),
}

pub trait Engine {
    /// Looks for the best move in the position described by `fen`.
    fn analyze(&mut self, fen: &str, options: &AnalysisOptions) -> Result<BestMove, EngineError>;
}

/// Plays uniformly random legal moves.
///
/// The generator is seeded, so a given seed always plays the same game against the
/// same moves.
#[derive(Clone, Debug)]
pub struct RandomEngine {
    rng: SmallRng,
}
impl RandomEngine {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}
impl Engine for RandomEngine {
    fn analyze(&mut self, fen: &str, _: &AnalysisOptions) -> Result<BestMove, EngineError> {
        let position = Position::from_fen(fen)?;
        let moves = position.legal_moves();
        if moves.is_empty() {
            return Err(EngineError::NoMove);
        }

        let mv = moves[self.rng.gen_range(0..moves.len())];
        log::debug!("random engine picked {mv} out of {} moves", moves.len());
        Ok(BestMove {
            uci: mv.to_uci(position.is_chess960()).to_string(),
            ponder: None,
            score: None,
        })
    }
}
