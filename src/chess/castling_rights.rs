//! Castling rights, with Chess960 support.
//!
//! Each right remembers the file of the rook it was granted for. Standard chess is the
//! particular case where those files are A and H.

use super::{
    board::Board,
    colour::{Colour, NUM_COLOURS},
    piece::{Piece, PieceKind},
    square::{File, Rank, Square},
    zobrist::{CASTLING_RIGHTS_OFFSET, ZOBRIST_KEYS},
};

/// The wing a castling move happens on.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum CastlingSide {
    Kingside = 0,
    Queenside = 1,
}
impl CastlingSide {
    /// Both wings, kingside first.
    pub const BOTH: [Self; 2] = [Self::Kingside, Self::Queenside];

    /// The wing a rook on `rook_file` sits on relative to a king on `king_file`.
    pub fn of(king_file: File, rook_file: File) -> Self {
        if rook_file > king_file {
            Self::Kingside
        } else {
            Self::Queenside
        }
    }

    /// File the king lands on after castling.
    pub const fn king_destination(self) -> File {
        match self {
            Self::Kingside => File::G,
            Self::Queenside => File::C,
        }
    }

    /// File the rook lands on after castling.
    pub const fn rook_destination(self) -> File {
        match self {
            Self::Kingside => File::F,
            Self::Queenside => File::D,
        }
    }

    /// Notation of the castling move in SAN.
    pub const fn san(self) -> &'static str {
        match self {
            Self::Kingside => "O-O",
            Self::Queenside => "O-O-O",
        }
    }
}

/// Up to four castling rights, each carrying the file of its rook.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct CastlingRights([[Option<File>; 2]; NUM_COLOURS]);
impl CastlingRights {
    /// No castling rights for any side.
    pub const fn none() -> Self {
        Self([[None; 2]; NUM_COLOURS])
    }

    /// All four rights, with rooks on the A and H files.
    pub const fn standard() -> Self {
        Self([[Some(File::H), Some(File::A)]; NUM_COLOURS])
    }

    /// Returns `true` if none of the sides can castle.
    pub fn is_none(&self) -> bool {
        self.0.iter().flatten().all(Option::is_none)
    }

    /// File of the rook granting the right, if `colour` may still castle on `side`.
    #[inline(always)]
    pub fn rook_file(&self, colour: Colour, side: CastlingSide) -> Option<File> {
        self.0[colour as usize][side as usize]
    }

    /// Square of the rook granting the right, if `colour` may still castle on `side`.
    #[inline]
    pub fn rook_square(&self, colour: Colour, side: CastlingSide) -> Option<Square> {
        self.rook_file(colour, side)
            .map(|file| Square::new(file, Rank::back_rank(colour)))
    }

    /// Grants `colour` the right to castle on `side` with the rook on `rook_file`.
    pub fn allow(&mut self, colour: Colour, side: CastlingSide, rook_file: File) {
        self.0[colour as usize][side as usize] = Some(rook_file)
    }

    /// Revokes a single right.
    pub fn revoke(&mut self, colour: Colour, side: CastlingSide) {
        self.0[colour as usize][side as usize] = None
    }

    /// Revokes both rights of a side.
    pub fn revoke_colour(&mut self, colour: Colour) {
        self.0[colour as usize] = [None; 2]
    }

    /// Revokes any right whose rook stands on `square`.
    ///
    /// Called with both endpoints of every move: a rook that moves away or gets
    /// captured takes its right with it.
    pub fn revoke_rook_square(&mut self, square: Square) {
        for colour in Colour::BOTH {
            for side in CastlingSide::BOTH {
                if self.rook_square(colour, side) == Some(square) {
                    self.revoke(colour, side)
                }
            }
        }
    }

    /// Iterator over held rights.
    pub fn iter(&self) -> impl Iterator<Item = (Colour, CastlingSide, File)> + '_ {
        Colour::BOTH.into_iter().flat_map(move |colour| {
            CastlingSide::BOTH
                .into_iter()
                .filter_map(move |side| self.rook_file(colour, side).map(|f| (colour, side, f)))
        })
    }

    /// Checks if every right matches the standard chess setup: king on the E file,
    /// rooks on A and H.
    pub fn is_standard(&self, board: &Board) -> bool {
        self.iter().all(|(colour, side, file)| {
            let expected = match side {
                CastlingSide::Kingside => File::H,
                CastlingSide::Queenside => File::A,
            };
            file == expected
                && board.king_square(colour) == Some(Square::new(File::E, Rank::back_rank(colour)))
        })
    }

    /// Returns the Zobrist hash of these castling rights.
    ///
    /// Only the presence of each right is hashed, not the rook file.
    #[inline(always)]
    pub(crate) fn zobrist_hash(&self) -> u64 {
        let mut hash = 0;
        for colour in Colour::BOTH {
            for side in CastlingSide::BOTH {
                if self.rook_file(colour, side).is_some() {
                    hash ^= ZOBRIST_KEYS[CASTLING_RIGHTS_OFFSET + colour as usize * 2 + side as usize]
                }
            }
        }
        hash
    }

    /// Reads the castling field of a FEN string against the piece placement.
    ///
    /// Accepts `KQkq` (a right resolves to the outermost rook on that wing) and
    /// Shredder-style file letters. Returns the rights and whether file letters
    /// were used.
    pub(crate) fn parse(field: &str, board: &Board) -> Result<(Self, bool), ()> {
        if field == "-" {
            return Ok((Self::none(), false));
        }
        if field.is_empty() {
            return Err(());
        }

        let mut rights = Self::none();
        let mut file_letters = false;
        for c in field.chars() {
            let colour = Colour::from(c.is_ascii_lowercase());
            let back_rank = Rank::back_rank(colour);
            let king_file = board
                .king_square(colour)
                .filter(|square| square.rank() == back_rank)
                .ok_or(())?
                .file();

            let (side, rook_file) = match c.to_ascii_lowercase() {
                'k' => {
                    let side = CastlingSide::Kingside;
                    (side, outermost_rook(board, colour, side, king_file).ok_or(())?)
                }
                'q' => {
                    let side = CastlingSide::Queenside;
                    (side, outermost_rook(board, colour, side, king_file).ok_or(())?)
                }
                letter => {
                    let file = File::from_char(letter).ok_or(())?;
                    let rook = Piece::new(PieceKind::Rook, colour);
                    if file == king_file || board.get(Square::new(file, back_rank)) != Some(rook) {
                        return Err(());
                    }
                    file_letters = true;
                    (CastlingSide::of(king_file, file), file)
                }
            };

            if rights.rook_file(colour, side).is_some() {
                return Err(());
            }
            rights.allow(colour, side, rook_file)
        }

        Ok((rights, file_letters))
    }

    /// Writes the castling field of a FEN string, in Shredder notation if `file_letters`
    /// is set and `KQkq` otherwise.
    ///
    /// In `KQkq` form, a right whose rook is not the outermost one on its wing is
    /// written with its file letter, so that reading the field back gives the same
    /// rights.
    pub(crate) fn fen(&self, board: &Board, file_letters: bool) -> String {
        if self.is_none() {
            return "-".to_string();
        }

        self.iter()
            .map(|(colour, side, file)| {
                let outermost = || {
                    board.king_square(colour).and_then(|king| {
                        outermost_rook(board, colour, side, king.file())
                    })
                };
                let c = match side {
                    _ if file_letters || outermost() != Some(file) => file.char(),
                    CastlingSide::Kingside => 'k',
                    CastlingSide::Queenside => 'q',
                };
                if colour.is_white() {
                    c.to_ascii_uppercase()
                } else {
                    c
                }
            })
            .collect()
    }
}

/// First rook of `colour` met on its back rank when walking from the edge of `side`
/// towards the king.
fn outermost_rook(
    board: &Board,
    colour: Colour,
    side: CastlingSide,
    king_file: File,
) -> Option<File> {
    let rook = Piece::new(PieceKind::Rook, colour);
    let is_rook =
        |file: &File| board.get(Square::new(*file, Rank::back_rank(colour))) == Some(rook);
    match side {
        CastlingSide::Kingside => File::iter()
            .rev()
            .take_while(|&file| file != king_file)
            .find(is_rook),
        CastlingSide::Queenside => File::iter()
            .take_while(|&file| file != king_file)
            .find(is_rook),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn back_ranks(white: &str, black: &str) -> Board {
        let mut board = Board::empty();
        for (colour, row) in [(Colour::White, white), (Colour::Black, black)] {
            for (file, c) in File::iter().zip(row.chars()) {
                let piece = c.to_string().parse::<PieceKind>().ok();
                board.set(
                    Square::new(file, Rank::back_rank(colour)),
                    piece.map(|kind| Piece::new(kind, colour)),
                );
            }
        }
        board
    }

    #[test]
    fn standard_notation() {
        let board = back_ranks("rnbqkbnr", "rnbqkbnr");
        let (rights, letters) = CastlingRights::parse("KQkq", &board).unwrap();
        assert!(!letters);
        assert_eq!(rights, CastlingRights::standard());
        assert!(rights.is_standard(&board));
        assert_eq!(rights.fen(&board, false), "KQkq");
        assert_eq!(rights.fen(&board, true), "HAha");

        let (rights, _) = CastlingRights::parse("Kq", &board).unwrap();
        assert_eq!(rights.fen(&board, false), "Kq");
        assert_eq!(CastlingRights::parse("-", &board).unwrap().0, CastlingRights::none());
    }

    #[test]
    fn chess960_notation() {
        let board = back_ranks("bqnbnrkr", "bqnbnrkr");
        let (rights, letters) = CastlingRights::parse("HFhf", &board).unwrap();
        assert!(letters);
        assert_eq!(rights.rook_file(Colour::White, CastlingSide::Kingside), Some(File::H));
        assert_eq!(rights.rook_file(Colour::White, CastlingSide::Queenside), Some(File::F));
        assert_eq!(rights.rook_square(Colour::Black, CastlingSide::Queenside), Some(Square::F8));
        assert!(!rights.is_standard(&board));
        assert_eq!(rights.fen(&board, true), "HFhf");

        // KQkq resolves to the outermost rook on each wing, and is written back as such.
        let (rights, letters) = CastlingRights::parse("KQkq", &board).unwrap();
        assert!(!letters);
        assert_eq!(rights.rook_file(Colour::Black, CastlingSide::Queenside), Some(File::F));
        assert_eq!(rights.fen(&board, false), "KQkq");
    }

    #[test]
    fn inner_rooks_keep_their_file_letter() {
        let board = back_ranks("....k.rr", "....k...");
        let (rights, letters) = CastlingRights::parse("G", &board).unwrap();
        assert!(letters);
        assert_eq!(rights.fen(&board, false), "G");
        assert_eq!(CastlingRights::parse("G", &board).unwrap().0, rights);

        let (rights, _) = CastlingRights::parse("K", &board).unwrap();
        assert_eq!(rights.rook_file(Colour::White, CastlingSide::Kingside), Some(File::H));
        assert_eq!(rights.fen(&board, false), "K");
    }

    #[test]
    fn invalid_fields() {
        let board = back_ranks("rnbqkbnr", "rnbqkbnr");
        assert!(CastlingRights::parse("KK", &board).is_err());
        assert!(CastlingRights::parse("E", &board).is_err());
        assert!(CastlingRights::parse("X", &board).is_err());
        assert!(CastlingRights::parse("", &board).is_err());

        let mut displaced = board;
        displaced.relocate(Square::E1, Square::E2);
        assert!(CastlingRights::parse("K", &displaced).is_err());
        assert!(CastlingRights::parse("k", &displaced).is_ok());

        // A right needs a rook to castle with.
        let bare = back_ranks("....k...", "....k..r");
        assert!(CastlingRights::parse("K", &bare).is_err());
        assert!(CastlingRights::parse("Q", &bare).is_err());
        assert!(CastlingRights::parse("H", &bare).is_err());
        assert!(CastlingRights::parse("k", &bare).is_ok());
    }

    #[test]
    fn revocation() {
        let board = back_ranks("rnbqkbnr", "rnbqkbnr");
        let mut rights = CastlingRights::standard();
        rights.revoke_rook_square(Square::H1);
        assert_eq!(rights.fen(&board, false), "Qkq");
        rights.revoke_colour(Colour::Black);
        assert_eq!(rights.fen(&board, false), "Q");
        rights.revoke(Colour::White, CastlingSide::Queenside);
        assert!(rights.is_none());
        assert_eq!(rights.fen(&board, false), "-");
    }
}
