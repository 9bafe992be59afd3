//! Piece placement on the 8x8 board.

use super::{
    bitboard::Bitboard,
    colour::{Colour, NUM_COLOURS},
    piece::{Piece, PieceKind, NUM_PIECES},
    square::{File, Rank, Square},
};

/// Mapping from every square to its occupant.
///
/// The mailbox is authoritative. Colour and kind bitboards are kept in sync on
/// every write so that occupancy queries stay constant time.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    // 8x8 array to find which piece sits on which square.
    pieces: [Option<Piece>; 64],
    // Occupancy by colour.
    colour_bitboards: [Bitboard; NUM_COLOURS],
    // Occupancy by piece kind, both colours.
    kind_bitboards: [Bitboard; NUM_PIECES],
}
impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}
impl Board {
    /// A board with no pieces.
    pub const fn empty() -> Self {
        Self {
            pieces: [None; 64],
            colour_bitboards: [Bitboard::empty(); NUM_COLOURS],
            kind_bitboards: [Bitboard::empty(); NUM_PIECES],
        }
    }

    /// The piece on `square`, if any.
    #[inline(always)]
    pub fn get(&self, square: Square) -> Option<Piece> {
        self.pieces[square.index()]
    }

    /// The piece at the given coordinates.
    ///
    /// Coordinates outside of the board read as empty.
    #[inline]
    pub fn get_at(&self, file: i8, rank: i8) -> Option<Piece> {
        Square::from_coords(file, rank).and_then(|square| self.get(square))
    }

    /// Places `piece` on `square`, replacing whatever was there.
    ///
    /// Passing `None` clears the square. Returns the previous occupant.
    pub fn set(&mut self, square: Square, piece: Option<Piece>) -> Option<Piece> {
        let previous = self.pieces[square.index()].take();
        if let Some(old) = previous {
            self.colour_bitboards[old.colour as usize].remove(square);
            self.kind_bitboards[old.kind as usize].remove(square);
        }
        if let Some(new) = piece {
            self.colour_bitboards[new.colour as usize].insert(square);
            self.kind_bitboards[new.kind as usize].insert(square);
        }
        self.pieces[square.index()] = piece;
        previous
    }

    /// Moves the occupant of `from` to `to`, returning whatever was captured on `to`.
    pub fn relocate(&mut self, from: Square, to: Square) -> Option<Piece> {
        let piece = self.set(from, None);
        self.set(to, piece)
    }

    /// Checks if no piece stands on `square`.
    #[inline(always)]
    pub fn is_empty(&self, square: Square) -> bool {
        self.pieces[square.index()].is_none()
    }

    /// All occupied squares.
    #[inline(always)]
    pub fn occupancy(&self) -> Bitboard {
        self.colour_bitboards[0] | self.colour_bitboards[1]
    }

    /// Squares occupied by pieces of `colour`.
    #[inline(always)]
    pub fn colour_bitboard(&self, colour: Colour) -> Bitboard {
        self.colour_bitboards[colour as usize]
    }

    /// Squares occupied by pieces of `kind`, regardless of their colour.
    #[inline(always)]
    pub fn kind_bitboard(&self, kind: PieceKind) -> Bitboard {
        self.kind_bitboards[kind as usize]
    }

    /// Squares occupied by the given piece.
    #[inline(always)]
    pub fn piece_bitboard(&self, piece: Piece) -> Bitboard {
        self.colour_bitboard(piece.colour) & self.kind_bitboard(piece.kind)
    }

    /// Square of the king of `colour`, if there is one.
    pub fn king_square(&self, colour: Colour) -> Option<Square> {
        self.piece_bitboard(Piece::new(PieceKind::King, colour))
            .lowest_set_square()
    }

    /// Iterator over all occupied squares and their occupants, from A1 to H8.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.occupancy()
            .filter_map(|square| self.get(square).map(|piece| (square, piece)))
    }
}
impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for rank in Rank::iter().rev() {
            write!(f, "{} ", rank)?;
            for file in File::iter() {
                match self.get(Square::new(file, rank)) {
                    Some(piece) => write!(f, "{} ", piece.unicode_symbol())?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        write!(f, "  a b c d e f g h")
    }
}
