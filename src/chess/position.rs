//! Main API to represent and interact with a chess position.
//!
//! This includes making moves, generating them, defining positions from FEN strings
//! and classifying their outcome.

use super::{
    bitboard::Bitboard,
    board::Board,
    castling_rights::CastlingRights,
    colour::Colour,
    fen::{Fen, FenError},
    moves::{IllegalMoveError, Move, MoveKind},
    movegen::{self, MoveList},
    piece::{Piece, PieceKind},
    rules::{self, GameStatus},
    square::{Delta, File, Rank, Square},
    zobrist,
};

/// A valid chess position: placement, side to move, castling rights, en passant
/// target and clocks.
///
/// Positions are plain values. Cloning yields a fully independent copy, which is how
/// history snapshots and perft workers get their own.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Position {
    board: Board,
    side_to_move: Colour,
    castling_rights: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
    chess960: bool,
    file_letters: bool,
    hash: u64,
}
impl Default for Position {
    fn default() -> Self {
        Self::initial()
    }
}
impl Position {
    /// The initial position of chess.
    pub fn initial() -> Self {
        let mut board = Board::empty();
        let back_rank = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for colour in Colour::BOTH {
            for (file, kind) in File::iter().zip(back_rank) {
                board.set(
                    Square::new(file, Rank::back_rank(colour)),
                    Some(Piece::new(kind, colour)),
                );
                board.set(
                    Square::new(file, Rank::pawn_rank(colour)),
                    Some(Piece::new(PieceKind::Pawn, colour)),
                );
            }
        }

        let mut position = Self {
            board,
            side_to_move: Colour::White,
            castling_rights: CastlingRights::standard(),
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            chess960: false,
            file_letters: false,
            hash: 0,
        };
        position.hash = position.compute_hash();
        position
    }

    /// Creates a position from a FEN string.
    /// # Errors
    /// This function returns an error if the FEN string passed is invalid or badly
    /// formatted, or describes a position where the side that just moved is in check.
    /// # Example
    /// ```
    /// # use chequer::chess::{fen::FenError, position::Position};
    /// let position = Position::from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
    /// assert_eq!(position.legal_moves().len(), 15);
    /// assert_eq!(
    ///     Position::from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0"),
    ///     Err(FenError::FieldCount(5))
    /// );
    /// ```
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        fen.parse::<Fen>()?.try_into()
    }

    /// The FEN record of this position.
    pub fn fen(&self) -> Fen {
        Fen {
            board: self.board,
            side_to_move: self.side_to_move,
            castling_rights: self.castling_rights,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            chess960: self.chess960,
            file_letters: self.file_letters,
        }
    }

    /// The FEN string of this position.
    pub fn to_fen(&self) -> String {
        self.fen().to_string()
    }

    /// Piece placement.
    #[inline(always)]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The piece on `square`, if any.
    #[inline(always)]
    pub fn piece_on(&self, square: Square) -> Option<Piece> {
        self.board.get(square)
    }

    #[inline(always)]
    pub fn side_to_move(&self) -> Colour {
        self.side_to_move
    }

    #[inline(always)]
    pub fn castling_rights(&self) -> &CastlingRights {
        &self.castling_rights
    }

    /// Square a pawn may capture en passant on, set after every double push.
    #[inline(always)]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    /// Half moves since the last capture or pawn move.
    #[inline(always)]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    /// Starts at 1, incremented after each Black move.
    #[inline(always)]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Zobrist hash of this position, used for repetition detection.
    #[inline(always)]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Whether castling moves are written king-takes-rook in UCI.
    #[inline(always)]
    pub fn is_chess960(&self) -> bool {
        self.chess960
    }

    /// Switches Chess960 UCI castling on or off.
    pub fn set_chess960(&mut self, chess960: bool) {
        self.chess960 = chess960
    }

    /// Whether the FEN castling field is written with rook file letters.
    #[inline(always)]
    pub fn uses_file_letters(&self) -> bool {
        self.file_letters
    }

    /// Checks if a pawn of the side to move could capture on the en passant square.
    fn en_passant_capturable(&self) -> bool {
        let Some(target) = self.en_passant else {
            return false;
        };
        let pawn = Piece::new(PieceKind::Pawn, self.side_to_move);
        // Our pawns capture onto the target from where an enemy pawn on it would capture.
        Delta::pawn_attacks(self.side_to_move.inverse())
            .iter()
            .filter_map(|&delta| target.translate(delta))
            .any(|square| self.board.get(square) == Some(pawn))
    }

    /// Computes the hash of this position from scratch.
    fn compute_hash(&self) -> u64 {
        let mut hash = self
            .board
            .pieces()
            .fold(0, |hash, (square, piece)| hash ^ zobrist::piece_hash(piece, square));
        if self.side_to_move.is_black() {
            hash ^= zobrist::side_to_move_hash()
        }
        hash ^= self.castling_rights.zobrist_hash();
        if let Some(target) = self.en_passant.filter(|_| self.en_passant_capturable()) {
            hash ^= zobrist::en_passant_file_hash(target.file())
        }
        hash
    }

    /// All legal moves of the side to move.
    pub fn legal_moves(&self) -> MoveList {
        movegen::legal_moves(self)
    }

    /// Legal moves going from `from` to `to`.
    ///
    /// There are four of them for a promotion, one or none otherwise. Castling is
    /// matched by the king's destination as well as by the rook's square.
    pub fn moves_between(&self, from: Square, to: Square) -> Vec<Move> {
        self.legal_moves()
            .into_iter()
            .filter(|mv| {
                mv.from == from
                    && (mv.to == to
                        || matches!(mv.kind, MoveKind::Castling { rook_from, .. } if rook_from == to))
            })
            .collect()
    }

    /// Checks if `mv` is a member of the legal move set.
    pub fn is_legal(&self, mv: &Move) -> bool {
        self.legal_moves().contains(mv)
    }

    /// Checks a move against the full rule set.
    pub fn validate_move(&self, mv: &Move) -> Result<(), IllegalMoveError> {
        if self.is_legal(mv) {
            Ok(())
        } else {
            Err(IllegalMoveError)
        }
    }

    /// Plays a move after validating it.
    ///
    /// On failure the position is left untouched.
    pub fn apply_move(&mut self, mv: &Move) -> Result<(), IllegalMoveError> {
        if let Err(e) = self.validate_move(mv) {
            log::warn!("rejected {mv} in {}", self.fen());
            return Err(e);
        }
        self.make_move_unchecked(mv);
        log::debug!("played {mv}, now {}", self.fen());
        Ok(())
    }

    /// Plays a move known to be legal.
    pub(crate) fn make_move_unchecked(&mut self, mv: &Move) {
        let us = self.side_to_move;
        movegen::play_on_board(&mut self.board, mv);

        if mv.moved.kind == PieceKind::King {
            self.castling_rights.revoke_colour(us)
        }
        self.castling_rights.revoke_rook_square(mv.from);
        self.castling_rights.revoke_rook_square(mv.to);

        self.en_passant = if mv.is_double_push() {
            mv.from.translate(Delta::pawn_push(us))
        } else {
            None
        };

        if mv.is_capture() || mv.moved.kind == PieceKind::Pawn {
            self.halfmove_clock = 0
        } else {
            self.halfmove_clock += 1
        }
        if us.is_black() {
            self.fullmove_number += 1
        }
        self.side_to_move.invert();
        self.hash = self.compute_hash();
    }

    /// Returns a copy of this position with `mv` played, if it is legal.
    pub fn after(&self, mv: &Move) -> Result<Self, IllegalMoveError> {
        let mut next = self.clone();
        next.apply_move(mv)?;
        Ok(next)
    }

    /// Checks if the king of `side` is attacked.
    pub fn is_in_check(&self, side: Colour) -> bool {
        rules::is_in_check(self, side)
    }

    /// Squares attacked by `by`.
    pub fn attacked_squares(&self, by: Colour) -> Bitboard {
        movegen::attacked_squares(self, by)
    }

    /// Outcome of this position on its own.
    ///
    /// Repetitions need the game's history, see [`rules::evaluate`].
    pub fn status(&self) -> GameStatus {
        rules::evaluate(self, std::iter::once(self.hash))
    }
}
impl TryFrom<Fen> for Position {
    type Error = FenError;

    fn try_from(fen: Fen) -> Result<Self, Self::Error> {
        let mut position = Self {
            board: fen.board,
            side_to_move: fen.side_to_move,
            castling_rights: fen.castling_rights,
            en_passant: fen.en_passant,
            halfmove_clock: fen.halfmove_clock,
            fullmove_number: fen.fullmove_number,
            chess960: fen.chess960,
            file_letters: fen.file_letters,
            hash: 0,
        };
        if position.is_in_check(position.side_to_move.inverse()) {
            return Err(FenError::InactiveSideInCheck);
        }
        position.hash = position.compute_hash();
        Ok(position)
    }
}
impl std::str::FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}
impl std::fmt::Debug for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (r, rank) in Rank::iter().rev().enumerate() {
            write!(f, "{rank} ")?;
            for square in Square::rank_squares_iter(rank) {
                write!(
                    f,
                    "{} ",
                    self.board.get(square).map_or('.', |piece| piece.symbol())
                )?
            }
            match r {
                3 => writeln!(f, "  side to move: {}", self.side_to_move),
                4 => writeln!(f, "  halfmove clock: {}", self.halfmove_clock),
                5 => writeln!(
                    f,
                    "  en passant: {}",
                    self.en_passant
                        .map_or_else(|| "-".to_string(), |square| square.to_string())
                ),
                6 => writeln!(
                    f,
                    "  castling rights: {}",
                    self.castling_rights.fen(&self.board, self.file_letters)
                ),
                7 => writeln!(f, "  hash: {:#018x}", self.hash),
                _ => writeln!(f),
            }?
        }
        writeln!(f, "  a b c d e f g h")?;
        write!(f, "\nfen: {}", self.fen())
    }
}
impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}
