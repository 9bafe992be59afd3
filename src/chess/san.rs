//! # Standard Algebraic Notation
//! SAN moves only make sense against a position: the notation names the target square
//! and as little of the origin as is needed to tell the legal moves apart.

use crate::parsing::{strip_annotations, PartialFromStr};

use super::{
    castling_rights::CastlingSide,
    moves::{IllegalMoveError, Move, MoveError, MoveParseError},
    piece::{PieceKind, PromotionTarget},
    position::Position,
    square::{File, Rank, Square},
};

/// Standard Algebraic Notation (SAN) encoded move, as found in PGN files or typed by
/// a human.
///
/// Check and annotation suffixes are accepted when parsing and never produced.
#[derive(Clone, Copy, Hash, PartialEq, Eq, Debug)]
pub enum SanMove {
    PawnPush {
        target: Square,
        promotion: Option<PromotionTarget>,
    },
    PawnCapture {
        origin_file: File,
        target: Square,
        promotion: Option<PromotionTarget>,
    },
    PieceMove {
        moving_piece: PieceKind,
        origin_file: Option<File>,
        origin_rank: Option<Rank>,
        is_capture: bool,
        target: Square,
    },
    Castle(CastlingSide),
}
impl SanMove {
    /// Encodes `mv`, one of `legal_moves`, with the shortest unambiguous origin.
    ///
    /// The origin file is preferred, then the rank, then the full square.
    pub fn from_move(mv: &Move, legal_moves: &[Move]) -> Self {
        if let Some(side) = mv.castling_side() {
            return Self::Castle(side);
        }
        if mv.moved.kind == PieceKind::Pawn {
            return if mv.is_capture() {
                Self::PawnCapture {
                    origin_file: mv.from.file(),
                    target: mv.to,
                    promotion: mv.promotion(),
                }
            } else {
                Self::PawnPush {
                    target: mv.to,
                    promotion: mv.promotion(),
                }
            };
        }

        let rivals: Vec<Square> = legal_moves
            .iter()
            .filter(|other| {
                other.moved == mv.moved
                    && other.to == mv.to
                    && other.from != mv.from
                    && other.castling_side().is_none()
            })
            .map(|other| other.from)
            .collect();
        let (origin_file, origin_rank) = if rivals.is_empty() {
            (None, None)
        } else if rivals.iter().all(|sq| sq.file() != mv.from.file()) {
            (Some(mv.from.file()), None)
        } else if rivals.iter().all(|sq| sq.rank() != mv.from.rank()) {
            (None, Some(mv.from.rank()))
        } else {
            (Some(mv.from.file()), Some(mv.from.rank()))
        };

        Self::PieceMove {
            moving_piece: mv.moved.kind,
            origin_file,
            origin_rank,
            is_capture: mv.is_capture(),
            target: mv.to,
        }
    }

    /// Checks if `mv` fits this notation.
    ///
    /// A piece move written without `x` still matches a capture.
    fn matches(&self, mv: &Move) -> bool {
        match *self {
            Self::Castle(side) => mv.castling_side() == Some(side),
            _ if mv.castling_side().is_some() => false,
            Self::PawnPush { target, promotion } => {
                mv.moved.kind == PieceKind::Pawn
                    && !mv.is_capture()
                    && mv.to == target
                    && mv.promotion() == promotion
            }
            Self::PawnCapture {
                origin_file,
                target,
                promotion,
            } => {
                mv.moved.kind == PieceKind::Pawn
                    && mv.is_capture()
                    && mv.from.file() == origin_file
                    && mv.to == target
                    && mv.promotion() == promotion
            }
            Self::PieceMove {
                moving_piece,
                origin_file,
                origin_rank,
                is_capture,
                target,
            } => {
                mv.moved.kind == moving_piece
                    && mv.to == target
                    && origin_file.map_or(true, |file| mv.from.file() == file)
                    && origin_rank.map_or(true, |rank| mv.from.rank() == rank)
                    && (!is_capture || mv.is_capture())
            }
        }
    }

    /// Finds the single move of `legal_moves` this notation designates.
    pub fn to_move(&self, legal_moves: &[Move]) -> Result<Move, MoveError> {
        let mut candidates = legal_moves.iter().filter(|mv| self.matches(mv));
        match (candidates.next(), candidates.next()) {
            (Some(mv), None) => Ok(*mv),
            (None, _) => Err(IllegalMoveError.into()),
            (Some(_), Some(_)) => Err(MoveError::Ambiguous(self.to_string())),
        }
    }
}
impl std::fmt::Display for SanMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::PawnPush { target, promotion } => {
                write!(f, "{target}")?;
                write_promotion(f, promotion)
            }
            Self::PawnCapture {
                origin_file,
                target,
                promotion,
            } => {
                write!(f, "{origin_file}x{target}")?;
                write_promotion(f, promotion)
            }
            Self::PieceMove {
                moving_piece,
                origin_file,
                origin_rank,
                is_capture,
                target,
            } => {
                write!(f, "{}", moving_piece.san_letter())?;
                if let Some(file) = origin_file {
                    write!(f, "{file}")?
                }
                if let Some(rank) = origin_rank {
                    write!(f, "{rank}")?
                }
                if is_capture {
                    write!(f, "x")?
                }
                write!(f, "{target}")
            }
            Self::Castle(side) => write!(f, "{}", side.san()),
        }
    }
}
impl std::str::FromStr for SanMove {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = strip_annotations(s.trim());
        let malformed = || MoveParseError::Malformed(s.to_string());
        if !s.is_ascii() {
            return Err(malformed());
        }

        let first = s.chars().next().ok_or_else(malformed)?;
        match first {
            'O' | '0' => match s {
                "O-O" | "0-0" => Ok(Self::Castle(CastlingSide::Kingside)),
                "O-O-O" | "0-0-0" => Ok(Self::Castle(CastlingSide::Queenside)),
                _ => Err(malformed()),
            },
            'N' | 'B' | 'R' | 'Q' | 'K' => {
                let (moving_piece, body) = PieceKind::partial_from_str(s)
                    .map_err(|_| MoveParseError::InvalidPiece(first))?;
                if body.len() < 2 {
                    return Err(malformed());
                }
                let (origin, target) = body.split_at(body.len() - 2);
                let target = parse_target(target)?;
                let (origin, is_capture) = match origin.strip_suffix('x') {
                    Some(origin) => (origin, true),
                    None => (origin, false),
                };
                let (origin_file, rest) =
                    Option::<File>::partial_from_str(origin).map_err(|_| malformed())?;
                let (origin_rank, rest) =
                    Option::<Rank>::partial_from_str(rest).map_err(|_| malformed())?;
                if !rest.is_empty() {
                    return Err(malformed());
                }

                Ok(Self::PieceMove {
                    moving_piece,
                    origin_file,
                    origin_rank,
                    is_capture,
                    target,
                })
            }
            'a'..='h' => {
                // A promotion letter follows the target square, maybe after '='.
                let letter = char::from(s.as_bytes()[s.len() - 1]);
                let rest = s[..s.len() - 1].trim_end_matches('=');
                let (body, promotion) =
                    if letter.is_ascii_alphabetic() && rest.ends_with(|c: char| c.is_ascii_digit()) {
                        let target = PromotionTarget::from_piece_kind(
                            PieceKind::partial_from_str(&s[s.len() - 1..])
                                .map_err(|_| MoveParseError::InvalidPromotion(letter))?
                                .0,
                        )
                        .ok_or(MoveParseError::InvalidPromotion(letter))?;
                        (rest, Some(target))
                    } else {
                        (s, None)
                    };

                match body.len() {
                    2 => Ok(Self::PawnPush {
                        target: parse_target(body)?,
                        promotion,
                    }),
                    4 if &body[1..2] == "x" => {
                        let (origin_file, _) =
                            File::partial_from_str(body).map_err(|_| malformed())?;
                        Ok(Self::PawnCapture {
                            origin_file,
                            target: parse_target(&body[2..])?,
                            promotion,
                        })
                    }
                    _ => Err(malformed()),
                }
            }
            c if c.is_ascii_uppercase() => Err(MoveParseError::InvalidPiece(c)),
            _ => Err(malformed()),
        }
    }
}

fn write_promotion(
    f: &mut std::fmt::Formatter<'_>,
    promotion: Option<PromotionTarget>,
) -> std::fmt::Result {
    match promotion {
        Some(target) => write!(f, "={}", target.to_piece_kind().san_letter()),
        None => Ok(()),
    }
}

fn parse_target(s: &str) -> Result<Square, MoveParseError> {
    s.parse()
        .map_err(|_| MoveParseError::InvalidSquare(s.to_string()))
}

impl Move {
    /// SAN of this move in `position`.
    pub fn to_san(&self, position: &Position) -> Result<SanMove, IllegalMoveError> {
        let legal_moves = position.legal_moves();
        if !legal_moves.contains(self) {
            return Err(IllegalMoveError);
        }
        Ok(SanMove::from_move(self, &legal_moves))
    }

    /// Finds the legal move of `position` written `san`.
    pub fn from_san(san: &str, position: &Position) -> Result<Self, MoveError> {
        san.parse::<SanMove>()?.to_move(&position.legal_moves())
    }
}
