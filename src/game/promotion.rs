//! Choosing what a pawn promotes to when a move is entered as a pair of squares.

use crate::chess::{piece::PromotionTarget, position::Position, square::Square};

/// Whoever picks the promotion piece: a human behind a UI, or a fixed policy.
pub trait PromotionChooser {
    /// Picks the piece the pawn going from `from` to `to` becomes, or `None` to take
    /// the move back.
    fn choose_promotion(
        &mut self,
        position: &Position,
        from: Square,
        to: Square,
    ) -> Option<PromotionTarget>;
}
impl<F> PromotionChooser for F
where
    F: FnMut(&Position, Square, Square) -> Option<PromotionTarget>,
{
    fn choose_promotion(
        &mut self,
        position: &Position,
        from: Square,
        to: Square,
    ) -> Option<PromotionTarget> {
        self(position, from, to)
    }
}

/// Always promotes to a queen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AutoQueen;
impl PromotionChooser for AutoQueen {
    fn choose_promotion(&mut self, _: &Position, _: Square, _: Square) -> Option<PromotionTarget> {
        Some(PromotionTarget::Queen)
    }
}
