use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub mod clock;
pub mod config;
pub mod error;
pub mod eval;
pub mod guard;
pub mod ordering;
pub mod search;
pub mod tt;

/// Upper bound used for the search window. Larger than any evaluation.
pub const SCORE_INF: i32 = 1_000_000;

/// Deepest iteration the driver will attempt.
pub const MAX_PLY: u8 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    White,
    Black,
}

impl Side {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::White => 0,
            Self::Black => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Bishop,
    Knight,
    King,
    /// Anything the evaluator has no value for.
    Other,
}

impl PieceKind {
    /// Parses a piece letter (either case). Unknown letters map to `Other`.
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Self {
        match symbol.to_ascii_uppercase() {
            'P' => Self::Pawn,
            'B' => Self::Bishop,
            'N' => Self::Knight,
            'K' => Self::King,
            _ => Self::Other,
        }
    }

    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Bishop => 'B',
            Self::Knight => 'N',
            Self::King => 'K',
            Self::Other => '?',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub side: Side,
    pub kind: PieceKind,
}

impl Piece {
    #[must_use]
    pub const fn new(side: Side, kind: PieceKind) -> Self {
        Self { side, kind }
    }
}

/// Capture metadata a move may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    Quiet,
    /// Known to capture, but the victim is not recorded.
    Marked,
    Piece(PieceKind),
}

/// Optional metadata the move orderer reads from a move.
pub trait MoveInfo {
    /// `None` means the move generator records nothing about captures.
    fn capture(&self) -> Option<Capture> {
        None
    }

    /// Human readable notation, consulted only when `capture` is `None`.
    fn notation(&self) -> Option<String> {
        None
    }
}

/// Everything the engine needs from a board.
///
/// The engine mutates the position in place and restores it after every
/// explored branch, so `undo_move` must be the exact inverse of the last
/// successful `apply_move`.
pub trait PositionOracle {
    type Move: Clone + PartialEq + fmt::Debug + MoveInfo;
    type Error: std::error::Error + Send + Sync + 'static;

    fn legal_moves(&self) -> Vec<Self::Move>;

    /// Plays `mv`. On `Err` the position must be left untouched.
    ///
    /// # Errors
    ///
    /// Returns the oracle's error when the move cannot be played.
    fn apply_move(&mut self, mv: &Self::Move) -> Result<(), Self::Error>;

    fn undo_move(&mut self, mv: &Self::Move);

    fn is_terminal(&self) -> bool {
        self.legal_moves().is_empty()
    }

    fn is_in_check(&self, side: Side) -> bool;

    /// Must be equal for equal positions (including the side to move).
    fn hash(&self) -> u64;

    fn side_to_move(&self) -> Option<Side> {
        None
    }

    /// Visits every piece on the board. The default reports none.
    fn for_each_piece(&self, _visit: &mut dyn FnMut(Piece)) {}

    /// Time the caller has left on its clock, if it tracks one.
    fn time_left(&self) -> Option<Duration> {
        None
    }
}

pub trait Evaluator<P: PositionOracle> {
    /// Score from the point of view of the side to move.
    fn evaluate(&self, position: &P) -> i32;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchLimit {
    Depth(u8),
    Time(u64), // milliseconds
    DepthAndTime(u8, u64),
}

impl SearchLimit {
    #[must_use]
    pub fn max_depth(self) -> u8 {
        match self {
            Self::Depth(d) | Self::DepthAndTime(d, _) => d.min(MAX_PLY),
            Self::Time(_) => MAX_PLY,
        }
    }

    #[must_use]
    pub const fn time_budget(self) -> Option<Duration> {
        match self {
            Self::Depth(_) => None,
            Self::Time(ms) | Self::DepthAndTime(_, ms) => Some(Duration::from_millis(ms)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Deepest fully completed iteration.
    pub depth: u8,
    pub nodes: u64,
    pub tt_hits: u64,
    pub cutoffs: u64,
    pub time_ms: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchReport<M> {
    pub best_move: M,
    pub score: i32,
    pub stats: SearchStats,
    /// Best line starting with `best_move`. Advisory only.
    pub principal_variation: Vec<M>,
}

pub trait Searcher<P: PositionOracle> {
    /// Runs iterative deepening on `position` and leaves it as it was found.
    ///
    /// # Errors
    ///
    /// Returns an error when the oracle rejects a move below the root.
    /// Running out of time is not an error.
    fn search(
        &mut self,
        position: &mut P,
        limit: SearchLimit,
    ) -> Result<Option<SearchReport<P::Move>>, error::EngineError>;
}
