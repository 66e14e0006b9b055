//! Scoped move application.
//!
//! [`AppliedMove`] plays a move on construction and takes it back when it is
//! dropped, so every way out of a search node (normal return, cutoff, or an
//! error propagated with `?`) leaves the position as it was found.

use crate::engine::PositionOracle;
use std::ops::{Deref, DerefMut};

pub struct AppliedMove<'a, P: PositionOracle> {
    position: &'a mut P,
    mv: &'a P::Move,
}

impl<'a, P: PositionOracle> AppliedMove<'a, P> {
    /// Plays `mv`. When the oracle refuses, nothing is undone because nothing
    /// was applied.
    ///
    /// # Errors
    ///
    /// Passes through the oracle's error.
    pub fn apply(position: &'a mut P, mv: &'a P::Move) -> Result<Self, P::Error> {
        position.apply_move(mv)?;
        Ok(Self { position, mv })
    }
}

impl<P: PositionOracle> Deref for AppliedMove<'_, P> {
    type Target = P;

    fn deref(&self) -> &P {
        self.position
    }
}

impl<P: PositionOracle> DerefMut for AppliedMove<'_, P> {
    fn deref_mut(&mut self) -> &mut P {
        self.position
    }
}

impl<P: PositionOracle> Drop for AppliedMove<'_, P> {
    fn drop(&mut self) {
        self.position.undo_move(self.mv);
    }
}
