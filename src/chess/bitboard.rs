//! Sets of squares.
//!
//! A [`Bitboard`] stores one bit per square, A1 being the least significant bit.
//! Attack maps and per-colour/per-kind occupancy are kept in this form.

use std::iter::FusedIterator;

use super::square::Square;

#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
/// A set of squares, packed in a `u64`.
pub struct Bitboard(pub(crate) u64);
impl std::fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, square) in Square::squares_fen_iter().enumerate() {
            if i % 8 == 0 && i != 0 {
                writeln!(f)?
            }
            write!(f, "{} ", if self.is_set(square) { 'x' } else { '.' })?
        }
        Ok(())
    }
}
impl Bitboard {
    /// Returns an empty bitboard.
    #[inline(always)]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Checks if a bitboard is empty.
    #[inline(always)]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Checks if a given square is set on the bitboard.
    #[inline(always)]
    pub const fn is_set(self, square: Square) -> bool {
        self.intersects(square.bitboard())
    }

    /// Adds a square to the set.
    #[inline(always)]
    pub fn insert(&mut self, square: Square) {
        self.0 |= square.bitboard().0
    }

    /// Removes a square from the set.
    #[inline(always)]
    pub fn remove(&mut self, square: Square) {
        self.0 &= !square.bitboard().0
    }

    /// Returns the cardinality of the bitboard (i.e. how many squares are set).
    #[inline(always)]
    pub const fn cardinality(self) -> u8 {
        self.0.count_ones() as u8
    }

    /// Returns true if two bitboards have at least one common set square.
    #[inline(always)]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns the lowest set square, if any.
    #[inline(always)]
    pub fn lowest_set_square(self) -> Option<Square> {
        if self.is_empty() {
            None
        } else {
            Square::from_index(self.0.trailing_zeros() as u8)
        }
    }

    /// Pops the lowest set square.
    #[inline(always)]
    pub fn pop_lowest_set_square(&mut self) -> Option<Square> {
        let square = self.lowest_set_square()?;
        self.0 &= self.0.wrapping_sub(1);
        Some(square)
    }
}
impl FromIterator<Square> for Bitboard {
    fn from_iter<T: IntoIterator<Item = Square>>(iter: T) -> Self {
        let mut bitboard = Self::empty();
        for square in iter {
            bitboard.insert(square)
        }
        bitboard
    }
}
impl std::ops::BitAnd for Bitboard {
    type Output = Self;

    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}
impl std::ops::BitAndAssign for Bitboard {
    #[inline(always)]
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0
    }
}
impl std::ops::BitOr for Bitboard {
    type Output = Self;

    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}
impl std::ops::BitOrAssign for Bitboard {
    #[inline(always)]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0
    }
}
impl std::ops::Not for Bitboard {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self::Output {
        Self(!self.0)
    }
}

impl Iterator for Bitboard {
    type Item = Square;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        self.pop_lowest_set_square()
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let size = self.cardinality();
        (size as usize, Some(size as usize))
    }
}
impl FusedIterator for Bitboard {}
impl ExactSizeIterator for Bitboard {
    #[inline(always)]
    fn len(&self) -> usize {
        self.cardinality() as usize
    }
}
