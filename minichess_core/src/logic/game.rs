use crate::engine::{Piece, PositionOracle, Side};
use crate::logic::board::{Board, BoardCoordinate, BoardMove};
use crate::logic::generator::MoveGenerator;
use crate::logic::zobrist::ZobristKeys;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("`{0}` is not a square on the board")]
    OutOfBounds(String),
    #[error("no piece on {0}")]
    NoPieceAtSource(BoardCoordinate),
    #[error("the piece on {0} does not belong to the side to move")]
    NotYourTurn(BoardCoordinate),
    #[error("{0} is occupied by a friendly piece")]
    TargetOccupiedByFriendly(BoardCoordinate),
    #[error("{0} is not a legal move here")]
    Illegal(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("expected 6 ranks, found {0}")]
    RankCount(usize),
    #[error("rank `{rank}` does not cover 6 squares")]
    RankWidth { rank: String },
    #[error("unknown piece letter `{0}`")]
    BadSymbol(char),
    #[error("side to move must be `w` or `b`, found `{0}`")]
    BadSide(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Playing,
    /// Winner: the other king is gone or checkmated.
    Won(Side),
    Stalemate,
}

/// Undo information for one played move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub mv: BoardMove,
    pub piece: Piece,
    pub captured: Option<Piece>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    pub turn: Side,
    pub history: Vec<MoveRecord>,
    /// Remaining clock for the side to move, if the game is timed.
    #[serde(default)]
    pub time_left: Option<Duration>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            turn: Side::White,
            history: Vec::new(),
            time_left: None,
        }
    }

    /// Parses `<placement> <w|b>`. A missing side field means White.
    ///
    /// # Errors
    ///
    /// Returns [`FenError`] for malformed placement or side fields.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let mut fields = fen.split_whitespace();
        let board = Board::from_placement(fields.next().unwrap_or_default())?;
        let turn = match fields.next() {
            None | Some("w") => Side::White,
            Some("b") => Side::Black,
            Some(other) => return Err(FenError::BadSide(other.to_owned())),
        };
        Ok(Self {
            board,
            turn,
            history: Vec::new(),
            time_left: None,
        })
    }

    pub fn to_fen_string(&self) -> String {
        self.board.to_fen_string(self.turn)
    }

    #[must_use]
    pub fn with_time_left(mut self, time_left: Duration) -> Self {
        self.time_left = Some(time_left);
        self
    }

    pub fn status(&self) -> GameStatus {
        for side in [Side::White, Side::Black] {
            if self.board.king(side).is_none() {
                return GameStatus::Won(side.opposite());
            }
        }
        let generator = MoveGenerator::new();
        if generator.has_legal_moves(&self.board, self.turn) {
            GameStatus::Playing
        } else if generator.is_in_check(&self.board, self.turn) {
            GameStatus::Won(self.turn.opposite())
        } else {
            GameStatus::Stalemate
        }
    }

    /// Looks up a legal move from `a1b2` style text. A capture marker is
    /// accepted but not required.
    ///
    /// # Errors
    ///
    /// Fails when either square is malformed or no legal move matches.
    pub fn parse_move(&self, text: &str) -> Result<BoardMove, MoveError> {
        let squares = text.replace(['x', 'X'], "");
        let (from, to) = match (squares.get(..2), squares.get(2..)) {
            (Some(from), Some(to)) => (from.parse::<BoardCoordinate>()?, to.parse()?),
            _ => return Err(MoveError::OutOfBounds(text.to_owned())),
        };
        self.find_legal(from, to)
            .ok_or_else(|| MoveError::Illegal(text.to_owned()))
    }

    /// Plays a move after checking it against the legal move list.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::Illegal`] when no legal move goes from `from` to
    /// `to`.
    pub fn make_move(
        &mut self,
        from: BoardCoordinate,
        to: BoardCoordinate,
    ) -> Result<BoardMove, MoveError> {
        let mv = self
            .find_legal(from, to)
            .ok_or_else(|| MoveError::Illegal(format!("{from}{to}")))?;
        self.apply_move(&mv)?;
        Ok(mv)
    }

    fn find_legal(&self, from: BoardCoordinate, to: BoardCoordinate) -> Option<BoardMove> {
        self.legal_moves()
            .into_iter()
            .find(|mv| mv.from == from && mv.to == to)
    }
}

impl PositionOracle for GameState {
    type Move = BoardMove;
    type Error = MoveError;

    fn legal_moves(&self) -> Vec<BoardMove> {
        MoveGenerator::new().generate_moves(&self.board, self.turn)
    }

    /// Checks ownership only; the caller is expected to pick from
    /// [`legal_moves`](Self::legal_moves).
    fn apply_move(&mut self, mv: &BoardMove) -> Result<(), MoveError> {
        let piece = self
            .board
            .get_piece(mv.from)
            .ok_or(MoveError::NoPieceAtSource(mv.from))?;
        if piece.side != self.turn {
            return Err(MoveError::NotYourTurn(mv.from));
        }
        if self.board.get_piece(mv.to).is_some_and(|p| p.side == self.turn) {
            return Err(MoveError::TargetOccupiedByFriendly(mv.to));
        }

        let captured = self.board.move_piece(mv.from, mv.to);
        self.history.push(MoveRecord {
            mv: BoardMove {
                captured: captured.map(|p| p.kind),
                ..*mv
            },
            piece,
            captured,
        });
        self.turn = self.turn.opposite();
        Ok(())
    }

    fn undo_move(&mut self, mv: &BoardMove) {
        let matches_last = self
            .history
            .last()
            .is_some_and(|record| record.mv.from == mv.from && record.mv.to == mv.to);
        if !matches_last {
            log::error!("undo of {mv} does not match the last move played");
            return;
        }
        if let Some(record) = self.history.pop() {
            self.board
                .undo_move_piece(record.mv.from, record.mv.to, record.captured);
            self.turn = self.turn.opposite();
        }
    }

    fn is_terminal(&self) -> bool {
        self.board.king(Side::White).is_none()
            || self.board.king(Side::Black).is_none()
            || !MoveGenerator::new().has_legal_moves(&self.board, self.turn)
    }

    fn is_in_check(&self, side: Side) -> bool {
        MoveGenerator::new().is_in_check(&self.board, side)
    }

    fn hash(&self) -> u64 {
        self.board.hash() ^ ZobristKeys::get().turn_key(self.turn)
    }

    fn side_to_move(&self) -> Option<Side> {
        Some(self.turn)
    }

    fn for_each_piece(&self, visit: &mut dyn FnMut(Piece)) {
        self.board.pieces().for_each(|(_, piece)| visit(piece));
    }

    fn time_left(&self) -> Option<Duration> {
        self.time_left
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::PieceKind;

    fn sq(text: &str) -> BoardCoordinate {
        text.parse().unwrap()
    }

    #[test]
    fn test_fen_round_trip() {
        let fen = "2k3/6/1p4/3N2/6/K5 b";
        let state = GameState::from_fen(fen).unwrap();
        assert_eq!(state.turn, Side::Black);
        assert_eq!(state.to_fen_string(), fen);
        assert_eq!(GameState::new().to_fen_string(), "nbk1bn/pppppp/6/6/PPPPPP/NBK1BN w");
        assert_eq!(
            GameState::from_fen("6/6/6/6/6/6").unwrap().turn,
            Side::White
        );
        assert_eq!(
            GameState::from_fen("6/6/6/6/6/6 x"),
            Err(FenError::BadSide("x".to_owned()))
        );
    }

    #[test]
    fn test_make_move_and_undo() {
        let mut state = GameState::new();
        let start_hash = state.hash();
        let mv = state.make_move(sq("a1"), sq("b3")).unwrap();
        assert_eq!(mv.to_string(), "a1b3");
        assert_eq!(state.turn, Side::Black);
        assert_ne!(state.hash(), start_hash);
        assert_eq!(state.history.len(), 1);

        state.undo_move(&mv);
        assert_eq!(state, GameState::new());
        assert_eq!(state.hash(), start_hash);
    }

    #[test]
    fn test_apply_move_rejections_leave_state_untouched() {
        let mut state = GameState::new();
        let before = state.clone();

        let empty = BoardMove::new(sq("c3"), sq("c4"));
        assert_eq!(state.apply_move(&empty), Err(MoveError::NoPieceAtSource(sq("c3"))));

        let theirs = BoardMove::new(sq("a5"), sq("a4"));
        assert_eq!(state.apply_move(&theirs), Err(MoveError::NotYourTurn(sq("a5"))));

        let friendly = BoardMove::new(sq("c1"), sq("c2"));
        assert_eq!(
            state.apply_move(&friendly),
            Err(MoveError::TargetOccupiedByFriendly(sq("c2")))
        );

        assert_eq!(
            state.make_move(sq("a2"), sq("a4")),
            Err(MoveError::Illegal("a2a4".to_owned()))
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_apply_move_recomputes_capture() {
        let mut state = GameState::from_fen("2k3/6/6/1p4/2P3/2K3 w").unwrap();
        // Caller forgot the capture flag.
        let bare = BoardMove::new(sq("c2"), sq("b3"));
        state.apply_move(&bare).unwrap();
        assert_eq!(state.history[0].mv.captured, Some(PieceKind::Pawn));
        let black_pieces = |state: &GameState| {
            state
                .board
                .pieces()
                .filter(|(_, p)| p.side == Side::Black)
                .count()
        };
        assert_eq!(black_pieces(&state), 1);

        state.undo_move(&bare);
        assert_eq!(black_pieces(&state), 2);
        assert_eq!(state.turn, Side::White);
    }

    #[test]
    fn test_mismatched_undo_is_ignored() {
        let mut state = GameState::new();
        let played = state.parse_move("a2a3").unwrap();
        state.apply_move(&played).unwrap();
        let after = state.clone();
        state.undo_move(&BoardMove::new(sq("f2"), sq("f3")));
        assert_eq!(state, after);
    }

    #[test]
    fn test_parse_move_accepts_capture_marker() {
        let state = GameState::from_fen("2k3/6/6/1p4/2P3/2K3 w").unwrap();
        let plain = state.parse_move("c2b3").unwrap();
        let marked = state.parse_move("c2xb3").unwrap();
        assert_eq!(plain, marked);
        assert!(plain.is_capture());
        assert!(matches!(state.parse_move("z9a1"), Err(MoveError::OutOfBounds(_))));
        assert!(matches!(state.parse_move("c2"), Err(MoveError::OutOfBounds(_))));
    }

    #[test]
    fn test_status_and_terminal() {
        assert_eq!(GameState::new().status(), GameStatus::Playing);
        assert!(!GameState::new().is_terminal());

        // Bishop on d3 checks a6; the king on b4 and knight on d5 cover the rest.
        let mated = GameState::from_fen("k5/3N2/1K4/3B2/6/6 b").unwrap();
        assert!(mated.is_in_check(Side::Black));
        assert!(mated.is_terminal());
        assert_eq!(mated.status(), GameStatus::Won(Side::White));

        let stalemate = GameState::from_fen("k5/3N2/1K4/6/6/6 b").unwrap();
        assert!(!stalemate.is_in_check(Side::Black));
        assert!(stalemate.is_terminal());
        assert_eq!(stalemate.status(), GameStatus::Stalemate);

        let kingless = GameState::from_fen("6/6/6/6/6/K5 w").unwrap();
        assert!(kingless.is_terminal());
        assert_eq!(kingless.status(), GameStatus::Won(Side::White));
    }

    #[test]
    fn test_hash_includes_side_to_move() {
        let white = GameState::from_fen("2k3/6/6/6/6/2K3 w").unwrap();
        let black = GameState::from_fen("2k3/6/6/6/6/2K3 b").unwrap();
        assert_ne!(white.hash(), black.hash());
        assert_eq!(white.board.hash(), black.board.hash());
    }

    #[test]
    fn test_serde_round_trip() {
        let mut state = GameState::new().with_time_left(Duration::from_millis(750));
        state.make_move(sq("c2"), sq("c3")).unwrap();
        let json = serde_json::to_string(&state).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
        assert_eq!(back.hash(), state.hash());
    }
}
