use crate::engine::{Piece, PieceKind, Side};
use crate::logic::board::{BoardCoordinate, NUM_SQUARES};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::OnceLock;

// 5 piece kinds * 2 sides * 36 squares
const NUM_KINDS: usize = 5;
const NUM_SIDES: usize = 2;
const TABLE_SIZE: usize = NUM_KINDS * NUM_SIDES * NUM_SQUARES;

const SEED: u64 = 0x6d69_6e69_6368_6573;

pub struct ZobristKeys {
    piece_keys: Vec<u64>,
    pub side_key: u64,
}

impl ZobristKeys {
    fn generate() -> Self {
        let mut rng = StdRng::seed_from_u64(SEED);
        let piece_keys = (0..TABLE_SIZE).map(|_| rng.gen()).collect();
        let side_key = rng.gen();
        Self {
            piece_keys,
            side_key,
        }
    }

    /// Process-wide key set. Keys are the same on every run.
    pub fn get() -> &'static Self {
        static KEYS: OnceLock<ZobristKeys> = OnceLock::new();
        KEYS.get_or_init(Self::generate)
    }

    pub fn piece_key(&self, piece: Piece, at: BoardCoordinate) -> u64 {
        let kind = match piece.kind {
            PieceKind::Pawn => 0,
            PieceKind::Bishop => 1,
            PieceKind::Knight => 2,
            PieceKind::King => 3,
            PieceKind::Other => 4,
        };
        let idx = (kind * NUM_SIDES + piece.side.index()) * NUM_SQUARES + at.index();
        self.piece_keys.get(idx).copied().unwrap_or(0)
    }

    /// Key mixed in while `side` is to move.
    pub const fn turn_key(&self, side: Side) -> u64 {
        match side {
            Side::White => 0,
            Side::Black => self.side_key,
        }
    }
}
