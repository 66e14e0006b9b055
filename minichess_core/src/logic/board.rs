use crate::engine::{Capture, MoveInfo, Piece, PieceKind, Side};
use crate::logic::game::{FenError, MoveError};
use crate::logic::zobrist::ZobristKeys;
use serde::{Deserialize, Serialize};
use serde_big_array::BigArray;
use std::fmt;
use std::str::FromStr;

pub const BOARD_SIZE: u8 = 6;
pub const NUM_SQUARES: usize = 36;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardCoordinate {
    pub row: u8,
    pub col: u8,
}

impl BoardCoordinate {
    #[must_use]
    pub const fn new(row: u8, col: u8) -> Option<Self> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Some(Self { row, col })
        } else {
            None
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.row as usize * BOARD_SIZE as usize + self.col as usize
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        let size = usize::from(BOARD_SIZE);
        let row = u8::try_from(idx / size).ok()?;
        let col = u8::try_from(idx % size).ok()?;
        Self::new(row, col)
    }

    /// Neighbouring square, or `None` off the edge.
    pub fn offset(self, d_row: i8, d_col: i8) -> Option<Self> {
        let row = self.row.checked_add_signed(d_row)?;
        let col = self.col.checked_add_signed(d_col)?;
        Self::new(row, col)
    }

    pub fn all() -> impl Iterator<Item = Self> {
        (0..NUM_SQUARES).filter_map(Self::from_index)
    }
}

impl fmt::Display for BoardCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", char::from(b'a' + self.col), self.row + 1)
    }
}

impl FromStr for BoardCoordinate {
    type Err = MoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let out_of_bounds = || MoveError::OutOfBounds(s.to_owned());
        let mut chars = s.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(out_of_bounds());
        };
        let col = u32::from(file)
            .checked_sub(u32::from('a'))
            .and_then(|c| u8::try_from(c).ok())
            .ok_or_else(out_of_bounds)?;
        let row = rank
            .to_digit(10)
            .and_then(|r| r.checked_sub(1))
            .and_then(|r| u8::try_from(r).ok())
            .ok_or_else(out_of_bounds)?;
        Self::new(row, col).ok_or_else(out_of_bounds)
    }
}

/// A move on the reference board. `captured` is filled in by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardMove {
    pub from: BoardCoordinate,
    pub to: BoardCoordinate,
    pub captured: Option<PieceKind>,
}

impl BoardMove {
    #[must_use]
    pub const fn new(from: BoardCoordinate, to: BoardCoordinate) -> Self {
        Self {
            from,
            to,
            captured: None,
        }
    }

    #[must_use]
    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

impl fmt::Display for BoardMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = if self.is_capture() { "x" } else { "" };
        write!(f, "{}{sep}{}", self.from, self.to)
    }
}

impl MoveInfo for BoardMove {
    fn capture(&self) -> Option<Capture> {
        Some(self.captured.map_or(Capture::Quiet, Capture::Piece))
    }

    fn notation(&self) -> Option<String> {
        Some(self.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    #[serde(with = "BigArray")]
    grid: [Option<Piece>; NUM_SQUARES],
    zobrist_hash: u64,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Starting position.
    #[must_use]
    pub fn new() -> Self {
        let mut board = Self::empty();
        let back_rank = [
            Some(PieceKind::Knight),
            Some(PieceKind::Bishop),
            Some(PieceKind::King),
            None,
            Some(PieceKind::Bishop),
            Some(PieceKind::Knight),
        ];
        for (side, back_row, pawn_row) in [(Side::White, 0, 1), (Side::Black, 5, 4)] {
            for (col, kind) in (0..BOARD_SIZE).zip(back_rank) {
                if let (Some(kind), Some(at)) = (kind, BoardCoordinate::new(back_row, col)) {
                    board.set_piece(at, Some(Piece::new(side, kind)));
                }
                if let Some(at) = BoardCoordinate::new(pawn_row, col) {
                    board.set_piece(at, Some(Piece::new(side, PieceKind::Pawn)));
                }
            }
        }
        board
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self {
            grid: [None; NUM_SQUARES],
            zobrist_hash: 0,
        }
    }

    /// Piece-square hash. Does not include the side to move.
    #[must_use]
    pub const fn hash(&self) -> u64 {
        self.zobrist_hash
    }

    #[must_use]
    pub fn get_piece(&self, at: BoardCoordinate) -> Option<Piece> {
        self.grid.get(at.index()).copied().flatten()
    }

    pub fn set_piece(&mut self, at: BoardCoordinate, piece: Option<Piece>) {
        let keys = ZobristKeys::get();
        let Some(cell) = self.grid.get_mut(at.index()) else {
            return;
        };
        if let Some(old) = cell.take() {
            self.zobrist_hash ^= keys.piece_key(old, at);
        }
        if let Some(new) = piece {
            self.zobrist_hash ^= keys.piece_key(new, at);
        }
        *cell = piece;
    }

    /// Moves whatever stands on `from` to `to` and returns what was there.
    pub fn move_piece(&mut self, from: BoardCoordinate, to: BoardCoordinate) -> Option<Piece> {
        let piece = self.get_piece(from);
        let captured = self.get_piece(to);
        self.set_piece(from, None);
        self.set_piece(to, piece);
        captured
    }

    pub fn undo_move_piece(
        &mut self,
        from: BoardCoordinate,
        to: BoardCoordinate,
        captured: Option<Piece>,
    ) {
        let piece = self.get_piece(to);
        self.set_piece(to, captured);
        self.set_piece(from, piece);
    }

    pub fn pieces(&self) -> impl Iterator<Item = (BoardCoordinate, Piece)> + '_ {
        BoardCoordinate::all().filter_map(|at| self.get_piece(at).map(|piece| (at, piece)))
    }

    pub fn king(&self, side: Side) -> Option<BoardCoordinate> {
        self.pieces()
            .find(|(_, piece)| *piece == Piece::new(side, PieceKind::King))
            .map(|(at, _)| at)
    }

    /// Hash computed from scratch, for checking the incremental one.
    pub fn calculate_initial_hash(&self) -> u64 {
        let keys = ZobristKeys::get();
        self.pieces()
            .fold(0, |hash, (at, piece)| hash ^ keys.piece_key(piece, at))
    }

    /// Same board flipped top to bottom with the colours swapped.
    #[must_use]
    pub fn mirrored(&self) -> Self {
        let mut board = Self::empty();
        for (at, piece) in self.pieces() {
            if let Some(target) = BoardCoordinate::new(BOARD_SIZE - 1 - at.row, at.col) {
                board.set_piece(target, Some(Piece::new(piece.side.opposite(), piece.kind)));
            }
        }
        board
    }

    /// Placement field, top rank first, digits for runs of empty squares.
    pub fn placement(&self) -> String {
        let mut text = String::new();
        for row in (0..BOARD_SIZE).rev() {
            let mut empty_count = 0;
            for col in 0..BOARD_SIZE {
                match BoardCoordinate::new(row, col).and_then(|at| self.get_piece(at)) {
                    Some(piece) => {
                        if empty_count > 0 {
                            text.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        let symbol = piece.kind.symbol();
                        text.push(match piece.side {
                            Side::White => symbol,
                            Side::Black => symbol.to_ascii_lowercase(),
                        });
                    }
                    None => empty_count += 1,
                }
            }
            if empty_count > 0 {
                text.push_str(&empty_count.to_string());
            }
            if row > 0 {
                text.push('/');
            }
        }
        text
    }

    pub fn to_fen_string(&self, turn: Side) -> String {
        let side = match turn {
            Side::White => 'w',
            Side::Black => 'b',
        };
        format!("{} {side}", self.placement())
    }

    /// # Errors
    ///
    /// Fails on a wrong number of ranks, a rank of the wrong width or an
    /// unknown piece letter.
    pub fn from_placement(text: &str) -> Result<Self, FenError> {
        let ranks: Vec<&str> = text.split('/').collect();
        if ranks.len() != usize::from(BOARD_SIZE) {
            return Err(FenError::RankCount(ranks.len()));
        }

        let mut board = Self::empty();
        for (rank, row) in ranks.iter().zip((0..BOARD_SIZE).rev()) {
            let mut col: u8 = 0;
            for symbol in rank.chars() {
                if let Some(run) = symbol.to_digit(10) {
                    col = col.saturating_add(u8::try_from(run).unwrap_or(u8::MAX));
                    continue;
                }
                let kind = PieceKind::from_symbol(symbol);
                if kind == PieceKind::Other {
                    return Err(FenError::BadSymbol(symbol));
                }
                let side = if symbol.is_ascii_uppercase() {
                    Side::White
                } else {
                    Side::Black
                };
                let at = BoardCoordinate::new(row, col).ok_or_else(|| FenError::RankWidth {
                    rank: (*rank).to_owned(),
                })?;
                board.set_piece(at, Some(Piece::new(side, kind)));
                col += 1;
            }
            if col != BOARD_SIZE {
                return Err(FenError::RankWidth {
                    rank: (*rank).to_owned(),
                });
            }
        }
        Ok(board)
    }
}
