//! Coordinates on the chessboard: files, ranks and squares.
//!
//! A [`Square`] is the (file, rank) pair of the board, both in `0..8`. Squares are
//! indexed from A1 (0) to H8 (63), rank-major.

use thiserror::Error;

use crate::parsing::PartialFromStr;

use super::{bitboard::Bitboard, colour::Colour};

/// Errors raised when reading a file, rank or square from text.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Error)]
pub enum SquareParseError {
    #[error("{0} is not a file (a-h)")]
    InvalidFile(char),
    #[error("{0} is not a rank (1-8)")]
    InvalidRank(char),
    #[error("Empty input")]
    EmptyInput,
    #[error("Unexpected characters after the square")]
    InputTooLong,
}

/// Files of a chessboard (A-H).
#[repr(u8)]
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub enum File {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}
impl File {
    /// A file from a given index.
    ///
    /// Fails if the index is more than 7.
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 8 {
            // SAFETY: `File` is `repr(u8)` with exactly 8 variants.
            Some(unsafe { std::mem::transmute::<u8, File>(index) })
        } else {
            None
        }
    }

    /// Reads a file from its letter, in either case.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            c @ 'a'..='h' => Self::from_index(c as u8 - b'a'),
            _ => None,
        }
    }

    /// Lowercase letter of this file.
    pub const fn char(self) -> char {
        (b'a' + self as u8) as char
    }

    /// Iterator over all files, from A to H.
    pub fn iter() -> impl DoubleEndedIterator<Item = Self> {
        (0..8).filter_map(Self::from_index)
    }
}
impl std::fmt::Display for File {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.char())
    }
}
impl PartialFromStr for File {
    type Err = SquareParseError;

    fn partial_from_str(s: &str) -> Result<(Self, &str), Self::Err> {
        let c = s.chars().next().ok_or(SquareParseError::EmptyInput)?;
        match c {
            'a'..='h' => Ok((Self::from_char(c).ok_or(SquareParseError::InvalidFile(c))?, &s[1..])),
            _ => Err(SquareParseError::InvalidFile(c)),
        }
    }
}
impl std::str::FromStr for File {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::partial_from_str(s)? {
            (file, "") => Ok(file),
            _ => Err(SquareParseError::InputTooLong),
        }
    }
}

/// Ranks of a chessboard (1-8).
#[repr(u8)]
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub enum Rank {
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
}
impl Rank {
    /// A rank from a given index.
    ///
    /// Fails if the index is more than 7.
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 8 {
            // SAFETY: `Rank` is `repr(u8)` with exactly 8 variants.
            Some(unsafe { std::mem::transmute::<u8, Rank>(index) })
        } else {
            None
        }
    }

    /// The rank pieces of `colour` start on.
    #[inline]
    pub const fn back_rank(colour: Colour) -> Self {
        if colour.is_black() {
            Self::Eight
        } else {
            Self::One
        }
    }

    /// The rank on which pawns of `colour` promote.
    #[inline]
    pub const fn promotion_rank(colour: Colour) -> Self {
        if colour.is_black() {
            Self::One
        } else {
            Self::Eight
        }
    }

    /// The rank pawns of `colour` may double push from.
    #[inline]
    pub const fn pawn_rank(colour: Colour) -> Self {
        if colour.is_black() {
            Self::Seven
        } else {
            Self::Two
        }
    }

    /// Iterator over all ranks, from 1 to 8.
    pub fn iter() -> impl DoubleEndedIterator<Item = Self> {
        (0..8).filter_map(Self::from_index)
    }
}
impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", 1 + *self as u8)
    }
}
impl PartialFromStr for Rank {
    type Err = SquareParseError;

    fn partial_from_str(s: &str) -> Result<(Self, &str), Self::Err> {
        let c = s.chars().next().ok_or(SquareParseError::EmptyInput)?;
        match c {
            '1'..='8' => Ok((
                Self::from_index(c as u8 - b'1').ok_or(SquareParseError::InvalidRank(c))?,
                &s[1..],
            )),
            _ => Err(SquareParseError::InvalidRank(c)),
        }
    }
}
impl std::str::FromStr for Rank {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::partial_from_str(s)? {
            (rank, "") => Ok(rank),
            _ => Err(SquareParseError::InputTooLong),
        }
    }
}

/// General square indexing for the 8x8 board.
#[repr(u8)]
#[rustfmt::skip]
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8,
}
impl Square {
    /// Instantiates a new square based on file and rank.
    #[inline]
    pub const fn new(file: File, rank: Rank) -> Self {
        // SAFETY: both components are below 8, so the index is below 64.
        unsafe { std::mem::transmute(((rank as u8) << 3) | (file as u8)) }
    }

    /// Instantiates a new square from its index.
    ///
    /// Returns `None` if the index is more than 63.
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 64 {
            // SAFETY: `Square` is `repr(u8)` with exactly 64 variants.
            Some(unsafe { std::mem::transmute::<u8, Square>(index) })
        } else {
            None
        }
    }

    /// Instantiates a square from an integer coordinate pair.
    ///
    /// Returns `None` for any pair outside of the board.
    #[inline]
    pub const fn from_coords(file: i8, rank: i8) -> Option<Self> {
        if file < 0 || file > 7 || rank < 0 || rank > 7 {
            None
        } else {
            Self::from_index((rank as u8) << 3 | file as u8)
        }
    }

    /// Returns the rank of the square.
    #[inline]
    pub const fn rank(self) -> Rank {
        // SAFETY: a square index shifted by 3 is below 8.
        unsafe { std::mem::transmute((self as u8) >> 3) }
    }

    /// Returns the file of the square.
    #[inline]
    pub const fn file(self) -> File {
        // SAFETY: masking with 7 yields a value below 8.
        unsafe { std::mem::transmute((self as u8) & 7) }
    }

    /// Index of the square, from 0 (A1) to 63 (H8).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Checks if the square is a light square.
    #[inline]
    pub const fn is_light(self) -> bool {
        (self.file() as u8 + self.rank() as u8) % 2 == 1
    }

    /// Translates this square by a given delta.
    ///
    /// Returns `None` if the translation would go out of the board.
    #[inline]
    pub const fn translate(self, delta: Delta) -> Option<Self> {
        let (df, dr) = delta.components();
        self.offset(df, dr)
    }

    /// Translates this square by a file and rank offset.
    #[inline]
    pub const fn offset(self, files: i8, ranks: i8) -> Option<Self> {
        Self::from_coords(self.file() as i8 + files, self.rank() as i8 + ranks)
    }

    /// Returns a bitboard containing only this square.
    #[inline]
    pub const fn bitboard(self) -> Bitboard {
        Bitboard(1 << (self as u8))
    }

    /// An iterator over all squares, ordered from A1 to H8.
    pub fn squares_iter() -> impl Iterator<Item = Self> {
        (0..64).filter_map(Self::from_index)
    }

    /// An iterator over all squares of a rank, from the A file to the H file.
    pub fn rank_squares_iter(rank: Rank) -> impl Iterator<Item = Self> {
        File::iter().map(move |file| Self::new(file, rank))
    }

    /// An iterator over all squares in FEN order: rank 8 to rank 1, each from A to H.
    pub fn squares_fen_iter() -> impl Iterator<Item = Self> {
        Rank::iter().rev().flat_map(Self::rank_squares_iter)
    }
}
impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}
impl PartialFromStr for Square {
    type Err = SquareParseError;

    fn partial_from_str(s: &str) -> Result<(Self, &str), Self::Err> {
        let (file, s) = File::partial_from_str(s)?;
        let (rank, s) = Rank::partial_from_str(s)?;
        Ok((Self::new(file, rank), s))
    }
}
impl std::str::FromStr for Square {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::partial_from_str(s)? {
            (square, "") => Ok(square),
            _ => Err(SquareParseError::InputTooLong),
        }
    }
}

/// Directions in which pieces move, as (file, rank) steps.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum Delta {
    North,
    South,
    East,
    West,

    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,

    KnightNorthEast,
    KnightNorthWest,
    KnightSouthEast,
    KnightSouthWest,
    KnightEastNorth,
    KnightWestNorth,
    KnightEastSouth,
    KnightWestSouth,
}
impl Delta {
    pub const ORTHOGONALS: [Self; 4] = [Self::North, Self::South, Self::East, Self::West];
    pub const DIAGONALS: [Self; 4] = [
        Self::NorthEast,
        Self::NorthWest,
        Self::SouthEast,
        Self::SouthWest,
    ];
    pub const KING_DELTAS: [Self; 8] = [
        Self::North,
        Self::South,
        Self::East,
        Self::West,
        Self::NorthEast,
        Self::NorthWest,
        Self::SouthEast,
        Self::SouthWest,
    ];
    pub const KNIGHT_DELTAS: [Self; 8] = [
        Self::KnightNorthEast,
        Self::KnightNorthWest,
        Self::KnightSouthEast,
        Self::KnightSouthWest,
        Self::KnightEastNorth,
        Self::KnightWestNorth,
        Self::KnightEastSouth,
        Self::KnightWestSouth,
    ];

    /// File and rank steps of this delta.
    #[inline]
    pub const fn components(self) -> (i8, i8) {
        match self {
            Self::North => (0, 1),
            Self::South => (0, -1),
            Self::East => (1, 0),
            Self::West => (-1, 0),
            Self::NorthEast => (1, 1),
            Self::NorthWest => (-1, 1),
            Self::SouthEast => (1, -1),
            Self::SouthWest => (-1, -1),
            Self::KnightNorthEast => (1, 2),
            Self::KnightNorthWest => (-1, 2),
            Self::KnightSouthEast => (1, -2),
            Self::KnightSouthWest => (-1, -2),
            Self::KnightEastNorth => (2, 1),
            Self::KnightWestNorth => (-2, 1),
            Self::KnightEastSouth => (2, -1),
            Self::KnightWestSouth => (-2, -1),
        }
    }

    /// Forward direction of pawns of the given colour.
    #[inline]
    pub const fn pawn_push(colour: Colour) -> Self {
        if colour.is_black() {
            Self::South
        } else {
            Self::North
        }
    }

    /// Capture directions of pawns of the given colour.
    #[inline]
    pub const fn pawn_attacks(colour: Colour) -> [Self; 2] {
        if colour.is_black() {
            [Self::SouthEast, Self::SouthWest]
        } else {
            [Self::NorthEast, Self::NorthWest]
        }
    }
}
