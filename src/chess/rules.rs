//! Game termination rules: checkmate, stalemate and the draw conditions.

use super::{
    colour::Colour,
    movegen,
    piece::PieceKind,
    position::Position,
};

/// Number of half moves without capture or pawn move after which the game is drawn.
pub const FIFTY_MOVE_LIMIT: u32 = 100;

/// Number of occurrences of a position after which the game is drawn.
pub const REPETITION_LIMIT: usize = 3;

/// Outcome of a position.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum GameStatus {
    InProgress,
    /// The given side won.
    Checkmate(Colour),
    Stalemate,
    InsufficientMaterial,
    FiftyMoveRule,
    ThreefoldRepetition,
}
impl GameStatus {
    /// Checks if the game is finished.
    pub fn is_over(&self) -> bool {
        !matches!(self, Self::InProgress)
    }

    /// The winning side, if any.
    pub fn winner(&self) -> Option<Colour> {
        match self {
            Self::Checkmate(winner) => Some(*winner),
            _ => None,
        }
    }

    /// Checks if the game ended without a winner.
    pub fn is_draw(&self) -> bool {
        self.is_over() && self.winner().is_none()
    }
}
impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InProgress => write!(f, "in progress"),
            Self::Checkmate(winner) => write!(f, "checkmate, {winner} wins"),
            Self::Stalemate => write!(f, "draw by stalemate"),
            Self::InsufficientMaterial => write!(f, "draw by insufficient material"),
            Self::FiftyMoveRule => write!(f, "draw by the fifty-move rule"),
            Self::ThreefoldRepetition => write!(f, "draw by threefold repetition"),
        }
    }
}

/// Checks if the king of `side` is attacked.
///
/// # Panics
/// Validated positions always have both kings, a missing one is a bug.
pub fn is_in_check(position: &Position, side: Colour) -> bool {
    let king = position
        .board()
        .king_square(side)
        .unwrap_or_else(|| unreachable!("{side} has no king"));
    movegen::is_square_attacked(position, king, side.inverse())
}

/// Checks if neither side has the material to ever deliver mate.
///
/// Covers bare kings, a single minor piece, and any number of bishops all standing
/// on squares of the same colour.
pub fn is_insufficient_material(position: &Position) -> bool {
    let board = position.board();
    let heavy = board.kind_bitboard(PieceKind::Pawn)
        | board.kind_bitboard(PieceKind::Rook)
        | board.kind_bitboard(PieceKind::Queen);
    if !heavy.is_empty() {
        return false;
    }

    let knights = board.kind_bitboard(PieceKind::Knight);
    let bishops = board.kind_bitboard(PieceKind::Bishop);
    let minors = (knights | bishops).cardinality();
    if minors <= 1 {
        return true;
    }

    knights.is_empty() && {
        let mut colours = bishops.map(|square| square.is_light());
        colours
            .next()
            .is_some_and(|first| colours.all(|light| light == first))
    }
}

/// Classifies a position.
///
/// `hashes` are the hashes of every position of the game up to and including this
/// one; the repetition rule counts how many of them match the current hash.
///
/// Checkmate and stalemate come first, then insufficient material, the fifty-move
/// rule and repetitions.
pub fn evaluate(position: &Position, hashes: impl IntoIterator<Item = u64>) -> GameStatus {
    let status = if !movegen::has_legal_move(position) {
        let side = position.side_to_move();
        if is_in_check(position, side) {
            GameStatus::Checkmate(side.inverse())
        } else {
            GameStatus::Stalemate
        }
    } else if is_insufficient_material(position) {
        GameStatus::InsufficientMaterial
    } else if position.halfmove_clock() >= FIFTY_MOVE_LIMIT {
        GameStatus::FiftyMoveRule
    } else if hashes
        .into_iter()
        .filter(|&hash| hash == position.hash())
        .count()
        >= REPETITION_LIMIT
    {
        GameStatus::ThreefoldRepetition
    } else {
        GameStatus::InProgress
    };

    if status.is_over() {
        log::info!("{status} in {}", position.fen());
    }
    status
}

#[cfg(test)]
mod test {
    use super::*;

    fn status(fen: &str) -> GameStatus {
        fen.parse::<Position>().unwrap().status()
    }

    #[test]
    fn fools_mate() {
        // 1. e4 g5 2. d4 f6 3. Qh5#
        let position: Position = "rnbqkbnr/ppppp2p/5p2/6pQ/3PP3/8/PPP2PPP/RNB1KBNR b KQkq - 1 3"
            .parse()
            .unwrap();
        assert!(position.legal_moves().is_empty());
        assert!(is_in_check(&position, Colour::Black));
        assert_eq!(position.status(), GameStatus::Checkmate(Colour::White));
        assert_eq!(position.status().winner(), Some(Colour::White));

        // 1. f3 e5 2. g4 Qh4#
        assert_eq!(
            status("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3"),
            GameStatus::Checkmate(Colour::Black)
        );
    }

    #[test]
    fn stalemate() {
        // The b6 king shields b8 from the b1 queen, so this one is not a stalemate.
        assert_eq!(status("k7/8/1K6/8/8/8/8/1Q6 b - - 0 1"), GameStatus::InProgress);

        let position: Position = "k7/2Q5/1K6/8/8/8/8/8 b - - 0 1".parse().unwrap();
        assert!(position.legal_moves().is_empty());
        assert!(!is_in_check(&position, Colour::Black));
        assert_eq!(position.status(), GameStatus::Stalemate);
        assert!(position.status().is_draw());
    }

    #[test]
    fn insufficient_material() {
        for fen in [
            "k7/8/8/8/8/8/8/K7 w - - 0 1",
            "k7/8/8/8/8/8/8/KN6 w - - 0 1",
            "k7/8/8/8/8/8/8/KB6 w - - 0 1",
            "kb6/8/8/8/8/8/8/K1B5 w - - 0 1",
            "k1b5/8/8/8/8/8/8/KB6 w - - 0 1",
        ] {
            assert_eq!(status(fen), GameStatus::InsufficientMaterial, "{fen}");
        }
        for fen in [
            "k7/8/8/8/8/8/8/KNN5 w - - 0 1",
            "kn6/8/8/8/8/8/8/KB6 w - - 0 1",
            "k7/8/8/8/8/8/8/KBB5 w - - 0 1",
            "kb6/8/8/8/8/8/8/KB6 w - - 0 1",
            "k7/8/8/8/8/8/8/KR6 w - - 0 1",
            "k7/8/8/8/8/8/P7/K7 w - - 0 1",
        ] {
            assert_eq!(status(fen), GameStatus::InProgress, "{fen}");
        }
    }

    #[test]
    fn draw_priorities() {
        assert_eq!(status("k7/8/8/8/8/8/8/KR6 w - - 100 80"), GameStatus::FiftyMoveRule);
        assert_eq!(status("k7/8/8/8/8/8/8/KR6 w - - 99 80"), GameStatus::InProgress);
        // Bare kings are reported as such even with an expired clock.
        assert_eq!(
            status("k7/8/8/8/8/8/8/K7 w - - 100 80"),
            GameStatus::InsufficientMaterial
        );
    }

    #[test]
    fn repetitions_count_hashes() {
        let position = Position::initial();
        let other = 0xdead_beef;
        assert_eq!(
            evaluate(&position, [position.hash(), other, position.hash()]),
            GameStatus::InProgress
        );
        assert_eq!(
            evaluate(&position, [position.hash(), other, position.hash(), position.hash()]),
            GameStatus::ThreefoldRepetition
        );
    }
}
