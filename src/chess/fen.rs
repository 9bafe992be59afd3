//! # Forsyth-Edwards Notation (FEN) utilities.
//!
//! Allows parsing, formatting and provides a clean API over FEN strings.
//!
//! A [`Fen`] holds the six fields of a FEN record once they have been checked one by
//! one. Turning it into a [`Position`](super::position::Position) adds the only check
//! needing move generation: the side that just moved must not be in check.
//!
//! ## Chess960
//! The castling field may use Shredder notation (the file of the castling rook, `HAha`)
//! instead of `KQkq`. A record read with file letters, or describing a non standard
//! castling setup, is flagged as Chess960. The castling field is written back in the
//! notation it was read in.

use thiserror::Error;

use crate::parsing::parse_u32;

use super::{
    bitboard::Bitboard,
    board::Board,
    castling_rights::CastlingRights,
    colour::Colour,
    piece::{Piece, PieceKind},
    square::{Rank, Square},
};

/// FEN parsing and validation errors, in the order they are checked.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Error)]
pub enum FenError {
    #[error("Expected 6 fields, found {0}")]
    FieldCount(usize),
    #[error("Expected 8 ranks, found {0}")]
    RankCount(usize),
    #[error("Rank {rank} spans {files} files instead of 8")]
    RankWidth { rank: Rank, files: usize },
    #[error("{0} is not a piece letter")]
    InvalidPiece(char),
    #[error("{colour} has {count} kings")]
    KingCount { colour: Colour, count: u8 },
    #[error("Pawn on {0}, pawns cannot stand on a back rank")]
    PawnOnBackRank(Square),
    #[error("Invalid side to move: {0:?}")]
    InvalidSideToMove(String),
    #[error("Invalid castling rights: {0:?}")]
    InvalidCastling(String),
    #[error("Invalid en passant square: {0:?}")]
    InvalidEnPassant(String),
    #[error("Invalid halfmove clock: {0:?}")]
    InvalidHalfmoveClock(String),
    #[error("Invalid fullmove number: {0:?}")]
    InvalidFullmoveNumber(String),
    #[error("The side not to move is in check")]
    InactiveSideInCheck,
}

/// A parsed FEN record.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Fen {
    pub board: Board,
    pub side_to_move: Colour,
    pub castling_rights: CastlingRights,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
    /// Castling moves follow Chess960 conventions in UCI.
    pub chess960: bool,
    /// Castling rights are written with file letters.
    pub file_letters: bool,
}
impl Fen {
    /// FEN record of the standard starting position.
    pub const INITIAL: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Parses a FEN string.
    /// # Example
    /// ```
    /// # use chequer::chess::fen::*;
    /// # use chequer::chess::colour::*;
    /// let fen = Fen::parse(Fen::INITIAL).unwrap();
    /// assert_eq!(fen.side_to_move, Colour::White);
    /// assert!(!fen.chess960);
    /// ```
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        fen.parse()
    }
}

fn parse_placement(field: &str) -> Result<Board, FenError> {
    let rows: Vec<&str> = field.split('/').collect();
    if rows.len() != 8 {
        return Err(FenError::RankCount(rows.len()));
    }

    // Widths first, so that a malformed rank is reported before its content.
    for (row, rank) in rows.iter().zip(Rank::iter().rev()) {
        let files: usize = row
            .chars()
            .map(|c| match c.to_digit(10) {
                Some(skip @ 1..=9) => skip as usize,
                _ => 1,
            })
            .sum();
        if files != 8 {
            return Err(FenError::RankWidth { rank, files });
        }
    }

    let mut board = Board::empty();
    for (row, rank) in rows.iter().zip(Rank::iter().rev()) {
        let mut squares = Square::rank_squares_iter(rank);
        for c in row.chars() {
            match c.to_digit(10) {
                Some(skip @ 1..=8) => {
                    for _ in 0..skip {
                        squares.next();
                    }
                }
                _ => {
                    let piece = Piece::from_symbol(c).ok_or(FenError::InvalidPiece(c))?;
                    if let Some(square) = squares.next() {
                        board.set(square, Some(piece));
                    }
                }
            }
        }
    }

    for colour in Colour::BOTH {
        let count = board
            .piece_bitboard(Piece::new(PieceKind::King, colour))
            .cardinality();
        if count != 1 {
            return Err(FenError::KingCount { colour, count });
        }
    }

    let back_ranks: Bitboard = Square::rank_squares_iter(Rank::One)
        .chain(Square::rank_squares_iter(Rank::Eight))
        .collect();
    if let Some(square) = (board.kind_bitboard(PieceKind::Pawn) & back_ranks).lowest_set_square() {
        return Err(FenError::PawnOnBackRank(square));
    }

    Ok(board)
}

fn parse_en_passant(
    field: &str,
    board: &Board,
    side_to_move: Colour,
) -> Result<Option<Square>, FenError> {
    if field == "-" {
        return Ok(None);
    }

    let invalid = || FenError::InvalidEnPassant(field.to_string());
    let square: Square = field.parse().map_err(|_| invalid())?;

    // The square was just skipped by an enemy pawn, which now stands in front of it
    // and has left its starting square empty behind it.
    let (expected_rank, forward) = if side_to_move.is_white() {
        (Rank::Six, -1)
    } else {
        (Rank::Three, 1)
    };
    let pushed_pawn = Piece::new(PieceKind::Pawn, side_to_move.inverse());
    let pawn_square = square.offset(0, forward).ok_or_else(invalid)?;
    let origin = square.offset(0, -forward).ok_or_else(invalid)?;
    if square.rank() != expected_rank
        || !board.is_empty(square)
        || !board.is_empty(origin)
        || board.get(pawn_square) != Some(pushed_pawn)
    {
        return Err(invalid());
    }

    Ok(Some(square))
}

impl std::str::FromStr for Fen {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split_whitespace().collect();
        let &[placement, side, castling, en_passant, halfmove, fullmove] = fields.as_slice() else {
            return Err(FenError::FieldCount(fields.len()));
        };

        let board = parse_placement(placement)?;

        let side_to_move = match side {
            "w" => Colour::White,
            "b" => Colour::Black,
            _ => return Err(FenError::InvalidSideToMove(side.to_string())),
        };

        let (castling_rights, file_letters) = CastlingRights::parse(castling, &board)
            .map_err(|_| FenError::InvalidCastling(castling.to_string()))?;

        let en_passant = parse_en_passant(en_passant, &board, side_to_move)?;

        let halfmove_clock =
            parse_u32(halfmove).map_err(|_| FenError::InvalidHalfmoveClock(halfmove.to_string()))?;
        let fullmove_number = parse_u32(fullmove)
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| FenError::InvalidFullmoveNumber(fullmove.to_string()))?;

        Ok(Self {
            board,
            side_to_move,
            castling_rights,
            en_passant,
            halfmove_clock,
            fullmove_number,
            chess960: file_letters || !castling_rights.is_standard(&board),
            file_letters,
        })
    }
}

impl std::fmt::Display for Fen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for rank in Rank::iter().rev() {
            let mut skip = 0;
            for square in Square::rank_squares_iter(rank) {
                match self.board.get(square) {
                    Some(piece) => {
                        if skip != 0 {
                            write!(f, "{skip}")?;
                            skip = 0
                        }
                        write!(f, "{piece}")?
                    }
                    None => skip += 1,
                }
            }
            if skip != 0 {
                write!(f, "{skip}")?
            }
            if rank != Rank::One {
                write!(f, "/")?
            }
        }

        write!(
            f,
            " {} {} {} {} {}",
            self.side_to_move.fen_char(),
            self.castling_rights.fen(&self.board, self.file_letters),
            self.en_passant
                .map_or_else(|| String::from("-"), |square| square.to_string()),
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn initial_position() {
        let fen = Fen::parse(Fen::INITIAL).unwrap();
        assert_eq!(fen.side_to_move, Colour::White);
        assert_eq!(fen.castling_rights, CastlingRights::standard());
        assert_eq!(fen.en_passant, None);
        assert_eq!(fen.halfmove_clock, 0);
        assert_eq!(fen.fullmove_number, 1);
        assert_eq!(
            fen.board.get(Square::E2),
            Some(Piece::new(PieceKind::Pawn, Colour::White))
        );
        assert_eq!(fen.to_string(), Fen::INITIAL);
    }

    #[test]
    fn round_trips() {
        for record in [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 12 40",
            "bqnb1rkr/pp3ppp/3ppn2/2p5/5P2/P2P4/NPP1P1PP/BQ1BNRKR w HFhf - 2 9",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w HAha - 0 1",
        ] {
            assert_eq!(Fen::parse(record).unwrap().to_string(), record);
        }
    }

    #[test]
    fn chess960_detection() {
        assert!(!Fen::parse(Fen::INITIAL).unwrap().chess960);
        let shuffled = Fen::parse("bqnb1rkr/pp3ppp/3ppn2/2p5/5P2/P2P4/NPP1P1PP/BQ1BNRKR w KQkq - 2 9").unwrap();
        assert!(shuffled.chess960);
        assert!(!shuffled.file_letters);
        assert_eq!(shuffled.castling_rights.fen(&shuffled.board, true), "HFhf");
    }

    #[test]
    fn castling_field_keeps_its_notation() {
        for record in [
            "bqnb1rkr/pp3ppp/3ppn2/2p5/5P2/P2P4/NPP1P1PP/BQ1BNRKR w KQkq - 2 9",
            "4k3/8/8/8/8/8/8/4K1R1 w K - 0 1",
            "4k3/8/8/8/8/8/8/4K1RR w G - 0 1",
            "4k3/8/8/8/8/8/8/1R2K1R1 w GB - 0 1",
        ] {
            let written = Fen::parse(record).unwrap().to_string();
            assert_eq!(written, record);
            assert_eq!(Fen::parse(&written).unwrap().to_string(), record);
        }
    }

    #[test]
    fn castling_right_needs_a_rook() {
        assert_eq!(
            Fen::parse("7k/8/8/8/8/8/8/7K w K - 0 1"),
            Err(FenError::InvalidCastling("K".into()))
        );
        assert_eq!(
            Fen::parse("7k/8/8/8/8/8/8/7K w H - 0 1"),
            Err(FenError::InvalidCastling("H".into()))
        );
    }

    #[test]
    fn validation_order() {
        use FenError::*;

        let cases: [(&str, FenError); 14] = [
            ("8/8/8/8/8/8/8/8 w - - 0", FieldCount(5)),
            ("k7/8/8/8/8/8/K7 w - - 0 1", RankCount(7)),
            ("k7/8/8/8/8/8/8/K8 w - - 0 1", RankWidth { rank: Rank::One, files: 9 }),
            ("k7/8/8/8/8/8/8/K6x w - - 0 1", InvalidPiece('x')),
            ("k7/8/8/8/8/8/8/8 w - - 0 1", KingCount { colour: Colour::White, count: 0 }),
            ("kk6/8/8/8/8/8/8/K7 w - - 0 1", KingCount { colour: Colour::Black, count: 2 }),
            ("k6P/8/8/8/8/8/8/K7 w - - 0 1", PawnOnBackRank(Square::H8)),
            ("k7/8/8/8/8/8/8/K7 x - - 0 1", InvalidSideToMove("x".into())),
            ("k7/8/8/8/8/8/8/K7 w Z - 0 1", InvalidCastling("Z".into())),
            ("k7/8/8/8/8/8/8/K7 w A - 0 1", InvalidCastling("A".into())),
            ("k7/8/8/8/8/8/8/K7 w - e3 0 1", InvalidEnPassant("e3".into())),
            ("k7/8/8/8/8/8/8/K7 w - e6 0 1", InvalidEnPassant("e6".into())),
            ("k7/8/8/8/8/8/8/K7 w - - -1 1", InvalidHalfmoveClock("-1".into())),
            ("k7/8/8/8/8/8/8/K7 w - - 0 0", InvalidFullmoveNumber("0".into())),
        ];
        for (record, error) in cases {
            assert_eq!(Fen::parse(record), Err(error), "{record}");
        }
    }

    #[test]
    fn en_passant_needs_a_pushed_pawn() {
        assert!(Fen::parse("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3").is_ok());
        assert!(Fen::parse("rnbqkbnr/pppppppp/8/4P3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3").is_err());
        assert!(Fen::parse("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1").is_ok());
    }

    #[test]
    fn en_passant_needs_an_empty_origin() {
        // The d-pawn stands on d5, yet another black pawn is still on d7.
        assert_eq!(
            Fen::parse("rnbqkbnr/pppppppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3"),
            Err(FenError::InvalidEnPassant("d6".into()))
        );
        assert_eq!(
            Fen::parse("4k3/8/8/8/4P3/8/4P3/4K3 b - e3 0 1"),
            Err(FenError::InvalidEnPassant("e3".into()))
        );
    }
}
