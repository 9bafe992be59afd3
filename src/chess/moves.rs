//! # Representation, parsing and formatting of chess moves.
//! A [`Move`] carries everything needed to play and describe a ply. [`UciMove`] is the
//! pure coordinate notation exchanged with engines; SAN lives in [`san`](super::san).

use std::collections::HashMap;

use thiserror::Error;

use super::{
    castling_rights::CastlingSide,
    piece::{Piece, PieceKind, PromotionTarget},
    position::Position,
    square::Square,
};

/// The special rule a move follows, if any.
#[derive(Clone, Copy, Hash, PartialEq, Eq, Debug)]
pub enum MoveKind {
    Normal,
    /// The king goes to `to`, the rook from `rook_from` to `rook_to`.
    Castling { rook_from: Square, rook_to: Square },
    /// The captured pawn stands beside the origin, on the target's file.
    EnPassant,
    Promotion(PromotionTarget),
}

/// A single ply, as generated for a given position.
///
/// Two moves are equal only if every field matches: promotions to different pieces
/// between the same squares are different moves.
#[derive(Clone, Copy, Hash, PartialEq, Eq, Debug)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub moved: Piece,
    pub captured: Option<Piece>,
    pub kind: MoveKind,
}
impl Move {
    /// Checks if this move removes an enemy piece.
    #[inline(always)]
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// The promotion target, if this move is a promotion.
    #[inline(always)]
    pub fn promotion(&self) -> Option<PromotionTarget> {
        match self.kind {
            MoveKind::Promotion(target) => Some(target),
            _ => None,
        }
    }

    /// The wing of this castling move, if it is one.
    pub fn castling_side(&self) -> Option<CastlingSide> {
        match self.kind {
            MoveKind::Castling { rook_from, .. } => {
                Some(CastlingSide::of(self.from.file(), rook_from.file()))
            }
            _ => None,
        }
    }

    /// Square of the captured piece. Differs from `to` for en passant captures.
    pub fn capture_square(&self) -> Option<Square> {
        self.captured?;
        match self.kind {
            MoveKind::EnPassant => Some(Square::new(self.to.file(), self.from.rank())),
            _ => Some(self.to),
        }
    }

    /// Checks if this move is a pawn advancing two squares.
    pub fn is_double_push(&self) -> bool {
        self.moved.kind == PieceKind::Pawn
            && (self.to.rank() as i8 - self.from.rank() as i8).abs() == 2
    }

    /// Coordinate notation of this move.
    ///
    /// Castling is written as the king's step in standard chess, and as the king
    /// taking its own rook in Chess960.
    pub fn to_uci(&self, chess960: bool) -> UciMove {
        let to = match self.kind {
            MoveKind::Castling { rook_from, .. } if chess960 => rook_from,
            _ => self.to,
        };
        UciMove {
            from: self.from,
            to,
            promotion: self.promotion(),
        }
    }

    /// Finds the legal move of `position` written `uci`.
    pub fn from_uci(uci: &str, position: &Position) -> Result<Self, MoveError> {
        uci.parse::<UciMove>()?.to_move(position)
    }
}
impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_uci(false))
    }
}

/// Errors that may arise when reading a move from text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum MoveParseError {
    #[error("UCI moves are 4 or 5 characters long, got {0}")]
    WrongLength(usize),
    #[error("{0:?} is not a square")]
    InvalidSquare(String),
    #[error("Cannot promote to {0:?}")]
    InvalidPromotion(char),
    #[error("{0:?} is not a piece letter")]
    InvalidPiece(char),
    #[error("Malformed move {0:?}")]
    Malformed(String),
}

/// A well-formed move that is not in the legal move set of the position.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Error)]
#[error("move is not legal in this position")]
pub struct IllegalMoveError;

/// Failure to turn a textual move into a legal move of a position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error(transparent)]
    Parse(#[from] MoveParseError),
    #[error(transparent)]
    Illegal(#[from] IllegalMoveError),
    #[error("{0:?} matches more than one legal move")]
    Ambiguous(String),
}

/// Pure coordinate notation move, mainly used to talk to engines.
#[derive(Clone, Copy, Hash, PartialEq, Eq, Debug)]
pub struct UciMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PromotionTarget>,
}
impl UciMove {
    /// Resolves this coordinate pair to a legal move of `position`.
    ///
    /// Castling is recognised as king-to-destination or king-takes-rook in standard
    /// chess, and only as king-takes-rook in Chess960 where the king's step may
    /// coincide with a plain king move.
    pub fn to_move(&self, position: &Position) -> Result<Move, MoveError> {
        let chess960 = position.is_chess960();
        position
            .legal_moves()
            .into_iter()
            .find(|mv| {
                if mv.from != self.from || mv.promotion() != self.promotion {
                    return false;
                }
                match mv.kind {
                    MoveKind::Castling { rook_from, .. } => {
                        rook_from == self.to || (!chess960 && mv.to == self.to)
                    }
                    _ => mv.to == self.to,
                }
            })
            .ok_or(MoveError::Illegal(IllegalMoveError))
    }
}
impl From<Move> for UciMove {
    fn from(value: Move) -> Self {
        value.to_uci(false)
    }
}
impl std::fmt::Display for UciMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(target) = self.promotion {
            write!(f, "{target}")?
        }
        Ok(())
    }
}
impl std::str::FromStr for UciMove {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let length = s.chars().count();
        if !(4..=5).contains(&length) || !s.is_ascii() {
            return Err(MoveParseError::WrongLength(length));
        }

        let from = s[0..2]
            .parse()
            .map_err(|_| MoveParseError::InvalidSquare(s[0..2].to_string()))?;
        let to = s[2..4]
            .parse()
            .map_err(|_| MoveParseError::InvalidSquare(s[2..4].to_string()))?;
        let promotion = match s[4..].chars().next() {
            Some(letter) => Some(
                letter
                    .to_string()
                    .parse::<PromotionTarget>()
                    .map_err(|_| MoveParseError::InvalidPromotion(letter))?,
            ),
            None => None,
        };

        Ok(Self {
            from,
            to,
            promotion,
        })
    }
}

/// Bounded memo of resolved UCI strings, owned by whoever feeds engine output to
/// positions.
///
/// Entries are keyed by position hash, so a hash collision can hand back a move of
/// another position. Playing it still goes through full validation.
#[derive(Clone, Debug)]
pub struct UciMoveCache {
    entries: HashMap<(u64, String), Move>,
    capacity: usize,
}
impl Default for UciMoveCache {
    fn default() -> Self {
        Self::new(4096)
    }
}
impl UciMoveCache {
    /// A cache that forgets everything once it holds `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity.min(4096)),
            capacity: capacity.max(1),
        }
    }

    /// Resolves `uci` in `position`, reusing a previous resolution when there is one.
    pub fn resolve(&mut self, uci: &str, position: &Position) -> Result<Move, MoveError> {
        let key = (position.hash(), uci.to_string());
        if let Some(mv) = self.entries.get(&key) {
            return Ok(*mv);
        }

        let mv = Move::from_uci(uci, position)?;
        if self.entries.len() >= self.capacity {
            log::trace!("UCI cache full ({} entries), clearing", self.entries.len());
            self.entries.clear()
        }
        self.entries.insert(key, mv);
        Ok(mv)
    }

    /// Number of memoized resolutions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks if nothing is memoized.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::chess::colour::Colour;

    #[test]
    fn uci_parsing() {
        assert_eq!(
            "e7e8Q".parse(),
            Ok(UciMove {
                from: Square::E7,
                to: Square::E8,
                promotion: Some(PromotionTarget::Queen)
            })
        );
        assert_eq!("e2e4".parse::<UciMove>().map(|m| m.to_string()), Ok("e2e4".into()));
        assert_eq!("e2e".parse::<UciMove>(), Err(MoveParseError::WrongLength(3)));
        assert_eq!("e2e4qq".parse::<UciMove>(), Err(MoveParseError::WrongLength(6)));
        assert_eq!(
            "e2i4".parse::<UciMove>(),
            Err(MoveParseError::InvalidSquare("i4".into()))
        );
        assert_eq!(
            "e7e8k".parse::<UciMove>(),
            Err(MoveParseError::InvalidPromotion('k'))
        );
    }

    #[test]
    fn resolving_against_a_position() {
        let position = Position::initial();
        let mv = Move::from_uci("g1f3", &position).unwrap();
        assert_eq!(mv.moved, Piece::new(PieceKind::Knight, Colour::White));
        assert_eq!(mv.kind, MoveKind::Normal);
        assert_eq!(
            Move::from_uci("e2e5", &position),
            Err(MoveError::Illegal(IllegalMoveError))
        );
        assert!(matches!(
            Move::from_uci("z2e4", &position),
            Err(MoveError::Parse(_))
        ));
    }

    #[test]
    fn castling_notations() {
        let standard: Position = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1".parse().unwrap();
        let short = Move::from_uci("e1g1", &standard).unwrap();
        assert_eq!(Move::from_uci("e1h1", &standard), Ok(short));
        assert_eq!(short.castling_side(), Some(CastlingSide::Kingside));
        assert_eq!(short.to_uci(false).to_string(), "e1g1");

        let shredder: Position = "r3k2r/8/8/8/8/8/8/R3K2R w HAha - 0 1".parse().unwrap();
        let long = Move::from_uci("e1a1", &shredder).unwrap();
        assert_eq!(long.to, Square::C1);
        assert_eq!(long.to_uci(true).to_string(), "e1a1");
        assert!(Move::from_uci("e1c1", &shredder).is_err());
    }

    #[test]
    fn promotions_need_their_letter() {
        let position: Position = "8/P7/8/8/8/8/8/4K2k w - - 0 1".parse().unwrap();
        assert!(Move::from_uci("a7a8", &position).is_err());
        let mv = Move::from_uci("a7a8n", &position).unwrap();
        assert_eq!(mv.promotion(), Some(PromotionTarget::Knight));
        assert_eq!(mv.to_string(), "a7a8n");
    }

    #[test]
    fn cache_is_bounded() {
        let position = Position::initial();
        let mut cache = UciMoveCache::new(2);
        assert!(cache.is_empty());
        cache.resolve("e2e4", &position).unwrap();
        cache.resolve("d2d4", &position).unwrap();
        assert_eq!(cache.len(), 2);
        assert_eq!(
            cache.resolve("e2e4", &position),
            Move::from_uci("e2e4", &position)
        );
        cache.resolve("g1f3", &position).unwrap();
        assert_eq!(cache.len(), 1);
        assert!(cache.resolve("e2e5", &position).is_err());
    }
}
