//! # Zobrist hashing keys and utilities

use std::sync::LazyLock;

use rand::{rngs::SmallRng, Rng, SeedableRng};

use super::{
    piece::{Piece, NUM_PIECES},
    square::{File, Square},
};

// Layout: 64 * 12 piece-square keys, then the side to move, the four castling
// rights and the eight en passant files.
pub static ZOBRIST_KEYS: LazyLock<[u64; 781]> = LazyLock::new(|| {
    let mut rng = SmallRng::seed_from_u64(0x6F2DF0EAF362C1ED);
    let mut keys = [0; 781];
    for key in &mut keys {
        *key = rng.gen()
    }
    keys
});

const SIDE_TO_MOVE_OFFSET: usize = 64 * 12;
pub const CASTLING_RIGHTS_OFFSET: usize = SIDE_TO_MOVE_OFFSET + 1;
const EN_PASSANT_OFFSET: usize = CASTLING_RIGHTS_OFFSET + 4;

#[inline(always)]
pub fn piece_hash(piece: Piece, square: Square) -> u64 {
    let piece_index = piece.colour as usize * NUM_PIECES + piece.kind as usize;
    ZOBRIST_KEYS[piece_index * 64 + square.index()]
}

#[inline(always)]
pub fn side_to_move_hash() -> u64 {
    ZOBRIST_KEYS[SIDE_TO_MOVE_OFFSET]
}

#[inline(always)]
pub fn en_passant_file_hash(file: File) -> u64 {
    ZOBRIST_KEYS[EN_PASSANT_OFFSET + file as usize]
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use super::*;
    use crate::chess::{colour::Colour, piece::PieceKind};

    #[test]
    fn piece_keys_are_distinct() {
        let mut seen = HashSet::new();
        for colour in Colour::BOTH {
            for kind in PieceKind::iter() {
                for square in Square::squares_iter() {
                    assert!(seen.insert(piece_hash(Piece::new(kind, colour), square)));
                }
            }
        }
        assert!(!seen.contains(&side_to_move_hash()));
        for file in File::iter() {
            assert!(!seen.contains(&en_passant_file_hash(file)));
        }
    }
}
