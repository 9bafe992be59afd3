//! # Chess rules
//! This module contains everything about the rules of chess: board state, moves and
//! their notations, legal move generation and game termination.

pub mod bitboard;
pub mod board;
pub mod castling_rights;
pub mod colour;
pub mod fen;
pub mod history;
pub mod movegen;
pub mod moves;
#[cfg(feature = "perft")]
pub mod perft;
pub mod piece;
pub mod position;
pub mod rules;
pub mod san;
pub mod square;
mod zobrist;
