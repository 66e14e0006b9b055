use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TTEntry<M> {
    pub score: i32,
    pub depth: u8,
    /// Move that produced `score`, if the node was expanded.
    pub best_move: Option<M>,
}

/// Search results keyed by position hash.
///
/// Unbounded unless a capacity is given. A full table is cleared before a new
/// key goes in.
pub struct TranspositionTable<M> {
    entries: HashMap<u64, TTEntry<M>>,
    capacity: Option<usize>,
}

impl<M> Default for TranspositionTable<M> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<M> TranspositionTable<M> {
    #[must_use]
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: capacity.filter(|&c| c > 0),
        }
    }

    /// Score for `key`, but only if it was searched at least `depth` deep.
    pub fn probe(&self, key: u64, depth: u8) -> Option<i32> {
        self.entries
            .get(&key)
            .filter(|entry| entry.depth >= depth)
            .map(|entry| entry.score)
    }

    pub fn store(&mut self, key: u64, score: i32, depth: u8, best_move: Option<M>) {
        if let Some(capacity) = self.capacity {
            if self.entries.len() >= capacity && !self.entries.contains_key(&key) {
                log::debug!("transposition table full at {capacity} entries, clearing");
                self.entries.clear();
            }
        }
        self.entries.insert(
            key,
            TTEntry {
                score,
                depth,
                best_move,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<M: Clone> TranspositionTable<M> {
    pub fn best_move(&self, key: u64) -> Option<M> {
        self.entries.get(&key).and_then(|e| e.best_move.clone())
    }
}
