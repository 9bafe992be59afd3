//! Move generation.
//!
//! Moves are produced in two layers. Pseudo-legal moves follow piece movement rules
//! only; each is then played on a scratch copy of the board and kept if the mover's
//! king is not attacked afterwards.
//!
//! Attacks are computed by stepping (pawns, knights, kings) and ray-casting
//! (bishops, rooks, queens) over the mailbox. A ray stops on the first occupied
//! square, which is itself attacked.

use super::{
    bitboard::Bitboard,
    board::Board,
    castling_rights::CastlingSide,
    colour::Colour,
    moves::{Move, MoveKind},
    piece::{Piece, PieceKind, PromotionTarget},
    position::Position,
    square::{Delta, Rank, Square},
};

/// Legal moves of a position. No reachable position has more than 218.
pub type MoveList = heapless::Vec<Move, 256>;

/// Squares reached from `from` by repeating `delta`, up to and including the first
/// occupied square.
fn ray(board: &Board, from: Square, delta: Delta) -> impl Iterator<Item = Square> + '_ {
    let mut current = Some(from);
    let mut blocked = false;
    std::iter::from_fn(move || {
        if blocked {
            return None;
        }
        current = current?.translate(delta);
        let square = current?;
        blocked = !board.is_empty(square);
        Some(square)
    })
}

/// Squares the piece on `square` attacks.
fn piece_attacks(board: &Board, square: Square, piece: Piece) -> Bitboard {
    let steps = |deltas: &[Delta]| -> Bitboard {
        deltas.iter().filter_map(|&delta| square.translate(delta)).collect()
    };
    let rays = |deltas: &[Delta]| -> Bitboard {
        deltas
            .iter()
            .flat_map(|&delta| ray(board, square, delta))
            .collect()
    };

    match piece.kind {
        PieceKind::Pawn => steps(&Delta::pawn_attacks(piece.colour)),
        PieceKind::Knight => steps(&Delta::KNIGHT_DELTAS),
        PieceKind::King => steps(&Delta::KING_DELTAS),
        PieceKind::Bishop => rays(&Delta::DIAGONALS),
        PieceKind::Rook => rays(&Delta::ORTHOGONALS),
        PieceKind::Queen => rays(&Delta::KING_DELTAS),
    }
}

/// Every square the pieces of `by` attack on `board`.
pub(crate) fn board_attacks(board: &Board, by: Colour) -> Bitboard {
    board
        .pieces()
        .filter(|(_, piece)| piece.colour == by)
        .fold(Bitboard::empty(), |attacked, (square, piece)| {
            attacked | piece_attacks(board, square, piece)
        })
}

/// Checks if any piece of `by` attacks `square` on `board`.
///
/// Looks outward from the target square instead of computing the whole attack map.
pub(crate) fn is_attacked_on(board: &Board, square: Square, by: Colour) -> bool {
    let holds = |target: Option<Square>, kind_matches: fn(PieceKind) -> bool| {
        target
            .and_then(|target| board.get(target))
            .is_some_and(|piece| piece.colour == by && kind_matches(piece.kind))
    };

    // A pawn of `by` attacks this square from where an enemy pawn here would capture.
    Delta::pawn_attacks(by.inverse())
        .iter()
        .any(|&delta| holds(square.translate(delta), |kind| kind == PieceKind::Pawn))
        || Delta::KNIGHT_DELTAS
            .iter()
            .any(|&delta| holds(square.translate(delta), |kind| kind == PieceKind::Knight))
        || Delta::KING_DELTAS
            .iter()
            .any(|&delta| holds(square.translate(delta), |kind| kind == PieceKind::King))
        || Delta::DIAGONALS.iter().any(|&delta| {
            holds(ray(board, square, delta).last(), PieceKind::is_diagonal_slider)
        })
        || Delta::ORTHOGONALS.iter().any(|&delta| {
            holds(ray(board, square, delta).last(), PieceKind::is_orthogonal_slider)
        })
}

/// The union of every square the pieces of `by` could capture on.
pub fn attacked_squares(position: &Position, by: Colour) -> Bitboard {
    board_attacks(position.board(), by)
}

/// Checks if `square` is attacked by any piece of `by`.
pub fn is_square_attacked(position: &Position, square: Square, by: Colour) -> bool {
    is_attacked_on(position.board(), square, by)
}

/// Moves the pieces involved in `mv`, without touching any game state.
pub(crate) fn play_on_board(board: &mut Board, mv: &Move) {
    match mv.kind {
        MoveKind::Normal => {
            board.relocate(mv.from, mv.to);
        }
        MoveKind::EnPassant => {
            board.set(Square::new(mv.to.file(), mv.from.rank()), None);
            board.relocate(mv.from, mv.to);
        }
        MoveKind::Promotion(target) => {
            board.set(mv.from, None);
            board.set(
                mv.to,
                Some(Piece::new(target.to_piece_kind(), mv.moved.colour)),
            );
        }
        MoveKind::Castling { rook_from, rook_to } => {
            // Both pieces leave first: in Chess960 either may land on the other's square.
            board.set(mv.from, None);
            board.set(rook_from, None);
            board.set(
                rook_to,
                Some(Piece::new(PieceKind::Rook, mv.moved.colour)),
            );
            board.set(mv.to, Some(mv.moved));
        }
    }
}

/// Checks if the mover's king is safe once `mv` is played.
fn leaves_king_safe(board: &Board, mv: &Move) -> bool {
    let mut scratch = *board;
    play_on_board(&mut scratch, mv);
    let us = mv.moved.colour;
    scratch
        .king_square(us)
        .is_some_and(|king| !is_attacked_on(&scratch, king, us.inverse()))
}

fn pawn_moves(position: &Position, from: Square, pawn: Piece, emit: &mut impl FnMut(Move)) {
    let board = position.board();
    let us = pawn.colour;
    let promotes = |to: Square| to.rank() == Rank::promotion_rank(us);
    let mut emit_pawn_move = |to: Square, captured: Option<Piece>, kind: MoveKind| {
        if promotes(to) {
            for target in PromotionTarget::ALL {
                emit(Move {
                    from,
                    to,
                    moved: pawn,
                    captured,
                    kind: MoveKind::Promotion(target),
                })
            }
        } else {
            emit(Move {
                from,
                to,
                moved: pawn,
                captured,
                kind,
            })
        }
    };

    let push = Delta::pawn_push(us);
    if let Some(single) = from.translate(push).filter(|&sq| board.is_empty(sq)) {
        emit_pawn_move(single, None, MoveKind::Normal);
        if from.rank() == Rank::pawn_rank(us) {
            if let Some(double) = single.translate(push).filter(|&sq| board.is_empty(sq)) {
                emit_pawn_move(double, None, MoveKind::Normal);
            }
        }
    }

    for delta in Delta::pawn_attacks(us) {
        let Some(to) = from.translate(delta) else {
            continue;
        };
        match board.get(to) {
            Some(target) if target.colour != us => {
                emit_pawn_move(to, Some(target), MoveKind::Normal)
            }
            None if position.en_passant() == Some(to) => {
                let passed = Square::new(to.file(), from.rank());
                let enemy_pawn = Piece::new(PieceKind::Pawn, us.inverse());
                if board.get(passed) == Some(enemy_pawn) {
                    emit_pawn_move(to, Some(enemy_pawn), MoveKind::EnPassant)
                }
            }
            _ => {}
        }
    }
}

fn piece_moves(board: &Board, from: Square, piece: Piece, emit: &mut impl FnMut(Move)) {
    for to in piece_attacks(board, from, piece) {
        let captured = board.get(to);
        if captured.is_some_and(|target| target.colour == piece.colour) {
            continue;
        }
        emit(Move {
            from,
            to,
            moved: piece,
            captured,
            kind: MoveKind::Normal,
        })
    }
}

/// Squares from `a` to `b` included, along their shared rank.
fn rank_span(a: Square, b: Square) -> impl Iterator<Item = Square> {
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    Square::rank_squares_iter(a.rank()).filter(move |&sq| low <= sq && sq <= high)
}

fn castling_moves(position: &Position, emit: &mut impl FnMut(Move)) {
    let board = position.board();
    let us = position.side_to_move();
    let back_rank = Rank::back_rank(us);
    let Some(king_from) = board.king_square(us).filter(|sq| sq.rank() == back_rank) else {
        return;
    };
    let rook = Piece::new(PieceKind::Rook, us);

    for side in CastlingSide::BOTH {
        let Some(rook_from) = position.castling_rights().rook_square(us, side) else {
            continue;
        };
        if board.get(rook_from) != Some(rook) {
            continue;
        }
        let king_to = Square::new(side.king_destination(), back_rank);
        let rook_to = Square::new(side.rook_destination(), back_rank);

        let path_clear = rank_span(king_from, king_to)
            .chain(rank_span(rook_from, rook_to))
            .all(|sq| sq == king_from || sq == rook_from || board.is_empty(sq));
        let path_safe =
            rank_span(king_from, king_to).all(|sq| !is_attacked_on(board, sq, us.inverse()));

        if path_clear && path_safe {
            emit(Move {
                from: king_from,
                to: king_to,
                moved: Piece::new(PieceKind::King, us),
                captured: None,
                kind: MoveKind::Castling { rook_from, rook_to },
            })
        }
    }
}

/// Feeds every pseudo-legal move of the side to move to `emit`.
fn for_each_pseudo_legal(position: &Position, mut emit: impl FnMut(Move)) {
    let board = position.board();
    let us = position.side_to_move();
    for from in board.colour_bitboard(us) {
        let Some(piece) = board.get(from) else {
            continue;
        };
        match piece.kind {
            PieceKind::Pawn => pawn_moves(position, from, piece, &mut emit),
            _ => piece_moves(board, from, piece, &mut emit),
        }
    }
    castling_moves(position, &mut emit);
}

/// Moves that obey piece movement rules, whether or not they leave the king attacked.
pub fn pseudo_legal_moves(position: &Position) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);
    for_each_pseudo_legal(position, |mv| moves.push(mv));
    moves
}

/// All legal moves of the side to move.
pub fn legal_moves(position: &Position) -> MoveList {
    let board = position.board();
    let mut moves = MoveList::new();
    for_each_pseudo_legal(position, |mv| {
        if leaves_king_safe(board, &mv) && moves.push(mv).is_err() {
            log::warn!("move list full, dropping {mv}");
        }
    });
    moves
}

/// Checks if the side to move has at least one legal move.
pub fn has_legal_move(position: &Position) -> bool {
    let board = position.board();
    let mut found = false;
    for_each_pseudo_legal(position, |mv| {
        found = found || leaves_king_safe(board, &mv);
    });
    found
}

#[cfg(test)]
mod test {
    use super::*;

    fn position(fen: &str) -> Position {
        fen.parse().unwrap()
    }

    #[test]
    fn attack_map_matches_square_queries() {
        for fen in [
            Position::initial().to_fen(),
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1".into(),
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1".into(),
            "bqnb1rkr/pp3ppp/3ppn2/2p5/5P2/P2P4/NPP1P1PP/BQ1BNRKR w HFhf - 2 9".into(),
        ] {
            let position = position(&fen);
            for by in Colour::BOTH {
                let attacked = attacked_squares(&position, by);
                for square in Square::squares_iter() {
                    assert_eq!(
                        attacked.is_set(square),
                        is_square_attacked(&position, square, by),
                        "{fen}: {square} by {by}"
                    );
                }
            }
        }
    }

    #[test]
    fn rays_stop_on_blockers() {
        let position = position("4k3/8/8/8/1p6/8/8/R3K3 w - - 0 1");
        let attacked = attacked_squares(&position, Colour::White);
        assert!(attacked.is_set(Square::A8));
        assert!(attacked.is_set(Square::D1));
        assert!(attacked.is_set(Square::F1));
        assert!(!attacked.is_set(Square::H1));

        let black = attacked_squares(&position, Colour::Black);
        assert!(black.is_set(Square::A3));
        assert!(black.is_set(Square::C3));
        assert!(!black.is_set(Square::B3));
    }

    #[test]
    fn initial_moves() {
        let position = Position::initial();
        assert_eq!(legal_moves(&position).len(), 20);
        assert_eq!(pseudo_legal_moves(&position).len(), 20);
        assert!(has_legal_move(&position));
    }

    #[test]
    fn pinned_pieces_stay_put() {
        // The e2 knight shields its king from the e8 rook.
        let position = position("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1");
        assert!(legal_moves(&position)
            .iter()
            .all(|mv| mv.moved.kind != PieceKind::Knight));
        assert!(pseudo_legal_moves(&position)
            .iter()
            .any(|mv| mv.moved.kind == PieceKind::Knight));
    }

    #[test]
    fn en_passant_removes_the_passed_pawn() {
        let position = position("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3");
        let captures: Vec<_> = legal_moves(&position)
            .into_iter()
            .filter(|mv| mv.kind == MoveKind::EnPassant)
            .collect();
        assert_eq!(captures.len(), 1);
        assert_eq!(captures[0].from, Square::E5);
        assert_eq!(captures[0].to, Square::D6);
        assert_eq!(captures[0].capture_square(), Some(Square::D5));
    }

    #[test]
    fn en_passant_discovering_check_is_illegal() {
        // Taking on d6 would open the fifth rank to the h5 rook.
        let position = position("8/8/8/K2pP2r/8/8/8/7k w - d6 0 1");
        assert!(legal_moves(&position)
            .iter()
            .all(|mv| mv.kind != MoveKind::EnPassant));
    }

    #[test]
    fn castling_rules() {
        let both = position("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let castles = |p: &Position| {
            legal_moves(p)
                .into_iter()
                .filter_map(|mv| mv.castling_side())
                .collect::<Vec<_>>()
        };
        assert_eq!(castles(&both).len(), 2);

        // Blocked queenside: b1 is in between king and rook.
        let blocked = position("r3k2r/8/8/8/8/8/8/RN2K2R w KQkq - 0 1");
        assert_eq!(castles(&blocked), vec![CastlingSide::Kingside]);

        // f1 is attacked, c1/d1 are not.
        let through_check = position("r3k2r/8/8/8/8/8/5r2/R3K2R w KQkq - 0 1");
        assert_eq!(castles(&through_check), vec![CastlingSide::Queenside]);

        // In check: no castling at all.
        let in_check = position("r3k2r/8/8/8/8/8/4r3/R3K2R w KQkq - 0 1");
        assert!(castles(&in_check).is_empty());

        // b1 attacked only matters for the rook's path, not the king's.
        let rook_path = position("r3k2r/8/8/8/8/8/1r6/R3K2R w KQkq - 0 1");
        assert_eq!(castles(&rook_path).len(), 2);
    }

    #[test]
    fn chess960_castling() {
        // King on b1, rook on a1: the king goes to c1, the rook to d1.
        let king_on_b1 = position("6k1/8/8/8/8/8/8/RK6 w A - 0 1");
        let castle = legal_moves(&king_on_b1)
            .into_iter()
            .find(|mv| mv.castling_side().is_some())
            .unwrap();
        assert_eq!(castle.to, Square::C1);
        assert_eq!(
            castle.kind,
            MoveKind::Castling {
                rook_from: Square::A1,
                rook_to: Square::D1
            }
        );

        // The king already stands on its destination.
        let king_on_g1 = position("6k1/8/8/8/8/8/8/6KR w H - 0 1");
        assert!(legal_moves(&king_on_g1).iter().any(|mv| {
            mv.kind
                == MoveKind::Castling {
                    rook_from: Square::H1,
                    rook_to: Square::F1,
                }
                && mv.from == Square::G1
                && mv.to == Square::G1
        }));
    }

    #[test]
    fn promotions_come_in_fours() {
        let position = position("8/P7/8/8/8/8/8/4K2k w - - 0 1");
        let promotions: Vec<_> = legal_moves(&position)
            .into_iter()
            .filter_map(|mv| mv.promotion())
            .collect();
        assert_eq!(promotions, PromotionTarget::ALL.to_vec());
    }
}
