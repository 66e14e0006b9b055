#![allow(dead_code)]

use minichess_core::engine::{Piece, PositionOracle, Side};
use minichess_core::logic::board::BoardMove;
use minichess_core::logic::game::{GameState, MoveError};
use std::time::Duration;

pub fn game(fen: &str) -> GameState {
    GameState::from_fen(fen).unwrap_or_else(|err| panic!("bad test position {fen}: {err}"))
}

/// Wraps a [`GameState`] and counts how often the engine applies and undoes
/// moves.
pub struct Audited {
    pub inner: GameState,
    pub applied: usize,
    pub undone: usize,
    pub deepest: usize,
}

impl Audited {
    pub fn new(inner: GameState) -> Self {
        Self {
            inner,
            applied: 0,
            undone: 0,
            deepest: 0,
        }
    }

    pub fn open(&self) -> usize {
        self.applied - self.undone
    }
}

impl PositionOracle for Audited {
    type Move = BoardMove;
    type Error = MoveError;

    fn legal_moves(&self) -> Vec<BoardMove> {
        self.inner.legal_moves()
    }

    fn apply_move(&mut self, mv: &BoardMove) -> Result<(), MoveError> {
        self.inner.apply_move(mv)?;
        self.applied += 1;
        self.deepest = self.deepest.max(self.open());
        Ok(())
    }

    fn undo_move(&mut self, mv: &BoardMove) {
        assert!(self.open() > 0, "undo of {mv} with nothing applied");
        self.undone += 1;
        self.inner.undo_move(mv);
    }

    fn is_terminal(&self) -> bool {
        self.inner.is_terminal()
    }

    fn is_in_check(&self, side: Side) -> bool {
        self.inner.is_in_check(side)
    }

    fn hash(&self) -> u64 {
        self.inner.hash()
    }

    fn side_to_move(&self) -> Option<Side> {
        self.inner.side_to_move()
    }

    fn for_each_piece(&self, visit: &mut dyn FnMut(Piece)) {
        self.inner.for_each_piece(visit);
    }

    fn time_left(&self) -> Option<Duration> {
        self.inner.time_left()
    }
}
