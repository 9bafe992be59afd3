use std::collections::HashSet;

use crate::{
    chess::{
        colour::Colour,
        fen::Fen,
        moves::{IllegalMoveError, Move, MoveKind},
        piece::{Piece, PieceKind, PromotionTarget},
        position::Position,
        rules::GameStatus,
        square::{File, Rank, Square},
    },
    game::{Game, GameConfig},
};

#[test]
fn initial_position_moves() {
    let position = Position::initial();
    let moves = position.legal_moves();
    assert_eq!(moves.len(), 20);

    let distinct: HashSet<Move> = moves.iter().copied().collect();
    assert_eq!(distinct.len(), 20);
    assert!(moves.iter().all(|mv| mv.moved.colour == Colour::White));
}

#[test]
fn npo_for_enums() {
    use std::mem::size_of;
    assert_eq!(size_of::<PieceKind>(), size_of::<Option<PieceKind>>());
    assert_eq!(size_of::<Piece>(), size_of::<Option<Piece>>());
    assert_eq!(size_of::<File>(), size_of::<Option<File>>());
    assert_eq!(size_of::<Rank>(), size_of::<Option<Rank>>());
    assert_eq!(size_of::<Square>(), size_of::<Option<Square>>());
}

#[test]
fn fools_mate() {
    let mut game = Game::new();
    for uci in ["f2f3", "e7e5", "g2g4", "d8h4"] {
        game.play_uci(uci).unwrap();
    }
    assert!(game.legal_moves().is_empty());
    assert!(game.position().is_in_check(Colour::White));
    assert_eq!(game.status(), GameStatus::Checkmate(Colour::Black));
    assert_eq!(
        game.position().to_fen(),
        "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3"
    );
}

#[test]
fn stalemate() {
    let position = Position::from_fen("k7/2Q5/1K6/8/8/8/8/8 b - - 0 1").unwrap();
    assert!(position.legal_moves().is_empty());
    assert!(!position.is_in_check(Colour::Black));
    assert_eq!(position.status(), GameStatus::Stalemate);
}

#[test]
fn promotion_exhaustiveness() {
    let position = Position::from_fen("8/P7/8/8/8/8/8/4K2k w - - 0 1").unwrap();
    let promotions: Vec<Move> = position
        .legal_moves()
        .into_iter()
        .filter(|mv| mv.from == Square::A7)
        .collect();
    assert_eq!(promotions.len(), 4);

    let targets: HashSet<PromotionTarget> =
        promotions.iter().filter_map(|mv| mv.promotion()).collect();
    assert_eq!(targets, HashSet::from(PromotionTarget::ALL));
    for mv in &promotions {
        assert!(position.is_legal(mv));
        let after = position.after(mv).unwrap();
        assert_eq!(
            after.piece_on(Square::A8),
            mv.promotion()
                .map(|target| Piece::new(target.to_piece_kind(), Colour::White))
        );
    }
}

#[test]
fn en_passant_removes_the_passed_pawn() {
    let position =
        Position::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3")
            .unwrap();
    let captures: Vec<Move> = position
        .legal_moves()
        .into_iter()
        .filter(|mv| mv.kind == MoveKind::EnPassant)
        .collect();
    assert_eq!(captures.len(), 1);

    let mv = captures[0];
    assert_eq!((mv.from, mv.to), (Square::E5, Square::D6));
    let after = position.after(&mv).unwrap();
    assert_eq!(after.piece_on(Square::D5), None);
    assert_eq!(
        after.piece_on(Square::D6),
        Some(Piece::new(PieceKind::Pawn, Colour::White))
    );
    assert_eq!(after.piece_on(Square::F5).map(|p| p.kind), Some(PieceKind::Pawn));
    assert_eq!(after.halfmove_clock(), 0);
}

#[test]
fn undo_redo_idempotence() {
    let mut game = Game::new();
    let mut fens = vec![game.position().to_fen()];
    for san in ["e4", "c5", "Nf3", "d6", "d4", "cxd4", "Nxd4", "Nf6", "Nc3", "a6"] {
        game.play_san(san).unwrap();
        fens.push(game.position().to_fen());
    }

    for expected in fens.iter().rev().skip(1) {
        assert_eq!(&game.undo().unwrap().to_fen(), expected);
    }
    assert!(game.undo().is_none());
    for expected in fens.iter().skip(1) {
        assert_eq!(&game.redo().unwrap().to_fen(), expected);
    }
    assert!(game.redo().is_none());
    assert_eq!(game.position().to_fen(), fens[fens.len() - 1]);
}

#[test]
fn threefold_repetition() {
    let mut game = Game::new();
    let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];

    for uci in shuffle {
        game.play_uci(uci).unwrap();
        assert_eq!(game.status(), GameStatus::InProgress);
    }
    for (i, uci) in shuffle.into_iter().enumerate() {
        game.play_uci(uci).unwrap();
        let expected = if i == 3 {
            GameStatus::ThreefoldRepetition
        } else {
            GameStatus::InProgress
        };
        assert_eq!(game.status(), expected);
    }
    assert_eq!(game.position().to_fen(), Fen::INITIAL.replace("0 1", "8 5"));
}

#[test]
fn repetitions_forgotten_past_capacity() {
    let mut game = GameConfig::new().with_history_capacity(4).build().unwrap();
    for uci in ["g1f3", "g8f6", "f3g1", "f6g8"].repeat(2) {
        game.play_uci(&uci).unwrap();
    }
    // Only the newest snapshots are kept, so the first occurrence is gone.
    assert_eq!(game.status(), GameStatus::InProgress);
}

#[test]
fn illegal_move_rejection() {
    let mut position = Position::initial();
    let before = position.clone();
    let rook_jump = Move {
        from: Square::A1,
        to: Square::A4,
        moved: Piece::new(PieceKind::Rook, Colour::White),
        captured: None,
        kind: MoveKind::Normal,
    };
    assert_eq!(position.apply_move(&rook_jump), Err(IllegalMoveError));
    assert_eq!(position, before);
    assert_eq!(position.to_fen(), Fen::INITIAL);
}

#[test]
fn fen_round_trips() {
    for fen in [
        Fen::INITIAL,
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3",
        "bqnb1rkr/pp3ppp/3ppn2/2p5/5P2/P2P4/NPP1P1PP/BQ1BNRKR w HFhf - 2 9",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 b - - 37 61",
        "bqnb1rkr/pp3ppp/3ppn2/2p5/5P2/P2P4/NPP1P1PP/BQ1BNRKR w KQkq - 2 9",
        "4k3/8/8/8/8/8/8/4K1R1 w K - 0 1",
    ] {
        assert_eq!(Position::from_fen(fen).unwrap().to_fen(), fen);
    }
}

#[test]
fn chess960_castling_through_a_game() {
    let mut game = Game::from_fen("4k3/8/8/8/8/8/8/1R2K1R1 w GB - 0 1").unwrap();
    assert!(game.position().is_chess960());
    assert!(game.position().uses_file_letters());

    let castle = Move::from_uci("e1g1", game.position()).unwrap();
    assert!(matches!(castle.kind, MoveKind::Castling { .. }));
    assert_eq!(castle.to_san(game.position()).unwrap().to_string(), "O-O");

    game.play(&castle).unwrap();
    assert_eq!(game.position().to_fen(), "4k3/8/8/8/8/8/8/1R3RK1 b - - 1 1");
    let before = game.undo().unwrap();
    assert_eq!(before.castling_rights().fen(before.board(), true), "GB");
    assert_eq!(before.to_fen(), "4k3/8/8/8/8/8/8/1R2K1R1 w GB - 0 1");
}
