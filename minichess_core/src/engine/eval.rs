use crate::engine::config::EngineConfig;
use crate::engine::{Evaluator, Piece, PositionOracle, Side};
use std::sync::Arc;

/// Material, mobility and a small bonus for giving check.
pub struct MaterialEvaluator {
    config: Arc<EngineConfig>,
}

impl MaterialEvaluator {
    #[must_use]
    pub const fn new(config: Arc<EngineConfig>) -> Self {
        Self { config }
    }
}

impl<P: PositionOracle> Evaluator<P> for MaterialEvaluator {
    fn evaluate(&self, position: &P) -> i32 {
        let side = position.side_to_move().unwrap_or(Side::White);

        // 1. Material
        let mut scores = [0i32; 2];
        position.for_each_piece(&mut |piece: Piece| {
            if let Some(total) = scores.get_mut(piece.side.index()) {
                *total += self.config.piece_value(piece.kind);
            }
        });
        let [mut white, mut black] = scores;

        // 2. Mobility, credited to the side to move only
        let mobility = i32::try_from(position.legal_moves().len())
            .unwrap_or(i32::MAX)
            .saturating_mul(self.config.mobility_weight);

        // 3. The side to move is the one giving check
        let check = if position.is_in_check(side.opposite()) {
            self.config.check_bonus
        } else {
            0
        };

        match side {
            Side::White => white += mobility + check,
            Side::Black => black += mobility + check,
        }

        let raw = white - black;
        match side {
            Side::White => raw,
            Side::Black => -raw,
        }
    }
}
