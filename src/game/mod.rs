//! # Game sessions
//! A [`Game`] strings positions together: it plays moves entered in any notation,
//! keeps an undoable history, and knows when the game is over, repetitions included.
//!
//! The outside world plugs in through two collaborators: a [`PromotionChooser`] for
//! moves entered as a pair of squares, and an [`Engine`] for computer opponents.

pub mod engine;
pub mod promotion;

use thiserror::Error;

use crate::chess::{
    fen::FenError,
    history::{History, DEFAULT_CAPACITY},
    movegen::MoveList,
    moves::{Move, MoveError, UciMove, UciMoveCache},
    position::Position,
    rules::{self, GameStatus},
    square::Square,
};
use engine::{AnalysisOptions, Engine, EngineError};
use promotion::PromotionChooser;

/// Errors that may arise when playing a game.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error(transparent)]
    Fen(#[from] FenError),
    #[error(transparent)]
    Move(#[from] MoveError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("the game is over ({0})")]
    GameOver(GameStatus),
    #[error("promotion was cancelled")]
    PromotionCancelled,
}

/// Builder pattern to configure a game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    history_capacity: usize,
    start_fen: Option<String>,
}
impl Default for GameConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_CAPACITY,
            start_fen: None,
        }
    }
}
impl GameConfig {
    /// Standard starting position, with the default history capacity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Maximum number of positions kept for undo and repetition detection.
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Starts the game from a FEN string instead of the standard position.
    pub fn with_start_fen(mut self, fen: impl Into<String>) -> Self {
        self.start_fen = Some(fen.into());
        self
    }

    /// Creates the configured game.
    /// # Errors
    /// Fails if the starting FEN is invalid.
    pub fn build(&self) -> Result<Game, FenError> {
        let start = match &self.start_fen {
            Some(fen) => Position::from_fen(fen)?,
            None => Position::initial(),
        };
        Ok(Game {
            history: History::new(start, self.history_capacity),
            uci_cache: UciMoveCache::default(),
        })
    }
}

/// A game in progress.
#[derive(Clone, Debug)]
pub struct Game {
    history: History,
    uci_cache: UciMoveCache,
}
impl Default for Game {
    fn default() -> Self {
        Self {
            history: History::new(Position::initial(), DEFAULT_CAPACITY),
            uci_cache: UciMoveCache::default(),
        }
    }
}
impl Game {
    /// A game from the standard starting position.
    pub fn new() -> Self {
        Self::default()
    }

    /// A game starting from `fen`.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        GameConfig::new().with_start_fen(fen).build()
    }

    /// The current position.
    pub fn position(&self) -> &Position {
        &self.history.current().position
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Legal moves in the current position.
    pub fn legal_moves(&self) -> MoveList {
        self.position().legal_moves()
    }

    /// Outcome of the game so far, repetitions included.
    pub fn status(&self) -> GameStatus {
        rules::evaluate(self.position(), self.history.hashes())
    }

    fn ensure_in_progress(&self) -> Result<(), GameError> {
        match self.status() {
            GameStatus::InProgress => Ok(()),
            status => Err(GameError::GameOver(status)),
        }
    }

    /// Plays a move, failing without side effects if it is illegal or the game is over.
    pub fn play(&mut self, mv: &Move) -> Result<(), GameError> {
        self.ensure_in_progress()?;
        let next = self.position().after(mv).map_err(MoveError::from)?;
        self.history.record(next, *mv);
        Ok(())
    }

    /// Plays a move written in UCI notation.
    pub fn play_uci(&mut self, uci: &str) -> Result<Move, GameError> {
        self.ensure_in_progress()?;
        let mv = self.uci_cache.resolve(uci, &self.history.current().position)?;
        self.play(&mv)?;
        Ok(mv)
    }

    /// Plays a move written in SAN.
    pub fn play_san(&mut self, san: &str) -> Result<Move, GameError> {
        self.ensure_in_progress()?;
        let mv = Move::from_san(san, self.position())?;
        self.play(&mv)?;
        Ok(mv)
    }

    /// Plays a move written in either UCI notation or SAN.
    pub fn play_text(&mut self, text: &str) -> Result<Move, GameError> {
        if text.parse::<UciMove>().is_ok() {
            self.play_uci(text)
        } else {
            self.play_san(text)
        }
    }

    /// Plays the move going from `from` to `to`, asking `chooser` for the promotion
    /// piece if the move turns out to be a promotion.
    pub fn play_squares(
        &mut self,
        from: Square,
        to: Square,
        chooser: &mut impl PromotionChooser,
    ) -> Result<Move, GameError> {
        self.ensure_in_progress()?;
        let position = self.position();
        let promotion = if position
            .moves_between(from, to)
            .iter()
            .any(|mv| mv.promotion().is_some())
        {
            Some(
                chooser
                    .choose_promotion(position, from, to)
                    .ok_or(GameError::PromotionCancelled)?,
            )
        } else {
            None
        };

        let mv = UciMove {
            from,
            to,
            promotion,
        }
        .to_move(position)?;
        self.play(&mv)?;
        Ok(mv)
    }

    /// Asks `engine` for a move and plays it.
    ///
    /// The answer must be a legal move of the current position.
    pub fn play_engine_move(
        &mut self,
        engine: &mut impl Engine,
        options: &AnalysisOptions,
    ) -> Result<Move, GameError> {
        self.ensure_in_progress()?;
        let reply = engine.analyze(&self.position().to_fen(), options)?;
        let mv = self
            .uci_cache
            .resolve(&reply.uci, &self.history.current().position)
            .map_err(|_| EngineError::InvalidReply(reply.uci.clone()))?;
        log::info!("engine plays {}", reply.uci);
        self.play(&mv)?;
        Ok(mv)
    }

    /// Takes back the last move, returning the position before it.
    pub fn undo(&mut self) -> Option<&Position> {
        self.history.undo().map(|entry| &entry.position)
    }

    /// Replays the last undone move, returning the position after it.
    pub fn redo(&mut self) -> Option<&Position> {
        self.history.redo().map(|entry| &entry.position)
    }

    /// Moves played since the oldest kept position.
    pub fn moves(&self) -> impl Iterator<Item = &Move> {
        self.history.moves()
    }
}
