//! # Chequer
//! A chess rules core: positions and their FEN form, moves in UCI and SAN, legal
//! move generation for standard chess and Chess960, and game termination.
//!
//! It is usable as both a library to embed into your own projects and a standalone
//! binary to inspect positions, count nodes or play a game on the command line.

pub mod chess;
pub mod game;
pub mod parsing;

#[cfg(test)]
mod tests;
