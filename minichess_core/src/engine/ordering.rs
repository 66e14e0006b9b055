//! Move ordering for alpha-beta pruning
//!
//! Puts likely cutoff moves first: killer moves, then captures weighted by
//! the victim.

use crate::engine::config::EngineConfig;
use crate::engine::{Capture, MoveInfo, MAX_PLY};
use std::sync::Arc;

/// Moves that caused a beta cutoff, two slots per depth, newest first.
pub struct KillerTable<M> {
    slots: Vec<[Option<M>; 2]>,
}

impl<M: Clone> Default for KillerTable<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Clone> KillerTable<M> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: vec![[None, None]; usize::from(MAX_PLY)],
        }
    }

    pub fn clear(&mut self) {
        for killers in &mut self.slots {
            *killers = [None, None];
        }
    }
}

impl<M: Clone + PartialEq> KillerTable<M> {
    pub fn record(&mut self, depth: u8, mv: &M) {
        // Shift: 0 -> 1, New -> 0
        if let Some(killers) = self.slots.get_mut(usize::from(depth)) {
            if killers[0].as_ref() != Some(mv) {
                killers[1] = killers[0].take();
                killers[0] = Some(mv.clone());
            }
        }
    }

    /// Whether `mv` is a killer at any depth.
    pub fn contains(&self, mv: &M) -> bool {
        self.slots
            .iter()
            .flatten()
            .any(|killer| killer.as_ref() == Some(mv))
    }

    #[cfg(test)]
    fn at_depth(&self, depth: u8) -> impl Iterator<Item = &M> {
        self.slots
            .get(usize::from(depth))
            .into_iter()
            .flatten()
            .flatten()
    }
}

pub struct MoveOrderer {
    config: Arc<EngineConfig>,
}

impl MoveOrderer {
    #[must_use]
    pub const fn new(config: Arc<EngineConfig>) -> Self {
        Self { config }
    }

    pub fn score<M: MoveInfo + Clone + PartialEq>(&self, mv: &M, killers: &KillerTable<M>) -> i32 {
        let mut score = 0;

        if killers.contains(mv) {
            score += self.config.score_killer_move;
        }

        match mv.capture() {
            Some(Capture::Piece(victim)) => score += self.config.capture_value(victim),
            Some(Capture::Marked) => score += self.config.score_capture_unknown,
            Some(Capture::Quiet) => {}
            None => {
                if mv
                    .notation()
                    .is_some_and(|text| text.contains(['x', 'X']))
                {
                    score += self.config.score_capture_notation;
                }
            }
        }

        score
    }

    /// Highest priority first. Ties keep no particular order.
    pub fn order<M: MoveInfo + Clone + PartialEq>(
        &self,
        moves: Vec<M>,
        killers: &KillerTable<M>,
    ) -> Vec<M> {
        let mut keyed: Vec<(i32, M)> = moves
            .into_iter()
            .map(|mv| (self.score(&mv, killers), mv))
            .collect();
        keyed.sort_by(|a, b| b.0.cmp(&a.0));
        keyed.into_iter().map(|(_, mv)| mv).collect()
    }
}
