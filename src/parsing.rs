//! # Parsing
//! Positions and moves travel as text: FEN for positions, UCI and SAN for moves.
//!
//! Every textual type of the crate implements the standard [`FromStr`](std::str::FromStr)
//! trait, and the small ones (files, ranks, squares, pieces) also implement
//! [`PartialFromStr`], a minimal parser combinator.
//!
//! [`PartialFromStr`] returns the parsed value together with the suffix of the
//! input that was not consumed. Parsing "e2e4" as a square gives `(Square::E2, "e4")`,
//! so a second call reads the target square. The UCI and SAN decoders are written
//! as chains of such calls.

use std::convert::Infallible;

pub trait PartialFromStr: Sized {
    type Err;

    fn partial_from_str(s: &str) -> Result<(Self, &str), Self::Err>;
}
impl<T: PartialFromStr> PartialFromStr for Option<T> {
    type Err = Infallible;

    fn partial_from_str(s: &str) -> Result<(Self, &str), Self::Err> {
        match T::partial_from_str(s) {
            Ok((value, rest)) => Ok((Some(value), rest)),
            Err(_) => Ok((None, s)),
        }
    }
}

/// Parses a whole string as an unsigned decimal integer.
///
/// Unlike [`str::parse`], signs and surrounding whitespace are rejected.
pub(crate) fn parse_u32(src: &str) -> Result<u32, ()> {
    if src.is_empty() || !src.bytes().all(|b| b.is_ascii_digit()) {
        return Err(());
    }
    src.parse().map_err(|_| ())
}

/// Removes trailing annotation glyphs (`+`, `#`, `!`, `?`) from a move string.
pub(crate) fn strip_annotations(src: &str) -> &str {
    src.trim_end_matches(['+', '#', '!', '?'])
}
