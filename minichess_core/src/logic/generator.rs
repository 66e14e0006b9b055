use crate::engine::{Piece, PieceKind, Side};
use crate::logic::board::{Board, BoardCoordinate, BoardMove};

const KING_STEPS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

const fn pawn_direction(side: Side) -> i8 {
    match side {
        Side::White => 1,
        Side::Black => -1,
    }
}

#[derive(Default)]
pub struct MoveGenerator;

impl MoveGenerator {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Moves that follow piece movement rules, ignoring king safety.
    pub fn generate_pseudo_moves(&self, board: &Board, turn: Side) -> Vec<BoardMove> {
        let mut moves = Vec::with_capacity(32);
        for (from, piece) in board.pieces().filter(|(_, p)| p.side == turn) {
            match piece.kind {
                PieceKind::Pawn => Self::pawn_moves(board, from, turn, &mut moves),
                PieceKind::Knight => {
                    Self::step_moves(board, from, turn, &KNIGHT_JUMPS, &mut moves);
                }
                PieceKind::King => Self::step_moves(board, from, turn, &KING_STEPS, &mut moves),
                PieceKind::Bishop => Self::slide_moves(board, from, turn, &mut moves),
                PieceKind::Other => {}
            }
        }
        moves
    }

    /// Pseudo-legal moves that do not leave `turn`'s king attacked.
    pub fn generate_moves(&self, board: &Board, turn: Side) -> Vec<BoardMove> {
        let mut scratch = board.clone();
        self.generate_pseudo_moves(board, turn)
            .into_iter()
            .filter(|mv| Self::keeps_king_safe(&mut scratch, mv, turn))
            .collect()
    }

    /// Stops at the first legal move found.
    pub fn has_legal_moves(&self, board: &Board, turn: Side) -> bool {
        let mut scratch = board.clone();
        self.generate_pseudo_moves(board, turn)
            .iter()
            .any(|mv| Self::keeps_king_safe(&mut scratch, mv, turn))
    }

    /// Without a king, a side is never in check.
    pub fn is_in_check(&self, board: &Board, side: Side) -> bool {
        board
            .king(side)
            .is_some_and(|king| self.is_square_attacked(board, king, side.opposite()))
    }

    pub fn is_square_attacked(&self, board: &Board, target: BoardCoordinate, by: Side) -> bool {
        let holds = |at: Option<BoardCoordinate>, kind: PieceKind| {
            at.and_then(|at| board.get_piece(at)) == Some(Piece::new(by, kind))
        };

        // A pawn attacks the two squares diagonally in front of it.
        let back = -pawn_direction(by);
        if holds(target.offset(back, 1), PieceKind::Pawn)
            || holds(target.offset(back, -1), PieceKind::Pawn)
        {
            return true;
        }

        if KNIGHT_JUMPS
            .iter()
            .any(|&(dr, dc)| holds(target.offset(dr, dc), PieceKind::Knight))
        {
            return true;
        }

        if KING_STEPS
            .iter()
            .any(|&(dr, dc)| holds(target.offset(dr, dc), PieceKind::King))
        {
            return true;
        }

        DIAGONALS.iter().any(|&(dr, dc)| {
            let mut at = target.offset(dr, dc);
            while let Some(square) = at {
                match board.get_piece(square) {
                    Some(piece) => return piece == Piece::new(by, PieceKind::Bishop),
                    None => at = square.offset(dr, dc),
                }
            }
            false
        })
    }

    fn keeps_king_safe(scratch: &mut Board, mv: &BoardMove, turn: Side) -> bool {
        let captured = scratch.move_piece(mv.from, mv.to);
        let safe = !Self::new().is_in_check(scratch, turn);
        scratch.undo_move_piece(mv.from, mv.to, captured);
        safe
    }

    fn push_if_open(
        board: &Board,
        from: BoardCoordinate,
        to: BoardCoordinate,
        turn: Side,
        moves: &mut Vec<BoardMove>,
    ) {
        match board.get_piece(to) {
            Some(piece) if piece.side == turn => {}
            occupant => moves.push(BoardMove {
                from,
                to,
                captured: occupant.map(|p| p.kind),
            }),
        }
    }

    fn step_moves(
        board: &Board,
        from: BoardCoordinate,
        turn: Side,
        steps: &[(i8, i8)],
        moves: &mut Vec<BoardMove>,
    ) {
        for &(dr, dc) in steps {
            if let Some(to) = from.offset(dr, dc) {
                Self::push_if_open(board, from, to, turn, moves);
            }
        }
    }

    fn slide_moves(board: &Board, from: BoardCoordinate, turn: Side, moves: &mut Vec<BoardMove>) {
        for &(dr, dc) in &DIAGONALS {
            let mut at = from.offset(dr, dc);
            while let Some(to) = at {
                Self::push_if_open(board, from, to, turn, moves);
                if board.get_piece(to).is_some() {
                    break;
                }
                at = to.offset(dr, dc);
            }
        }
    }

    fn pawn_moves(board: &Board, from: BoardCoordinate, turn: Side, moves: &mut Vec<BoardMove>) {
        let forward = pawn_direction(turn);

        if let Some(to) = from.offset(forward, 0) {
            if board.get_piece(to).is_none() {
                moves.push(BoardMove::new(from, to));
            }
        }

        for dc in [-1, 1] {
            let Some(to) = from.offset(forward, dc) else {
                continue;
            };
            if let Some(victim) = board.get_piece(to).filter(|p| p.side != turn) {
                moves.push(BoardMove {
                    from,
                    to,
                    captured: Some(victim.kind),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(text: &str) -> BoardCoordinate {
        text.parse().unwrap()
    }

    fn notations(moves: &[BoardMove]) -> Vec<String> {
        let mut list: Vec<String> = moves.iter().map(ToString::to_string).collect();
        list.sort();
        list
    }

    #[test]
    fn test_start_position_move_count() {
        let board = Board::new();
        let generator = MoveGenerator::new();
        // Six pawn pushes, one jump per knight, king to d1. Bishops are boxed in.
        let moves = generator.generate_moves(&board, Side::White);
        let list = notations(&moves);
        assert!(list.contains(&"a2a3".to_owned()));
        assert!(list.contains(&"a1b3".to_owned()));
        assert!(list.contains(&"f1e3".to_owned()));
        assert!(list.contains(&"c1d1".to_owned()));
        assert!(moves.iter().all(|mv| !mv.is_capture()));
        assert_eq!(moves.len(), 9);
    }

    #[test]
    fn test_pawn_moves_and_captures() {
        let board = Board::from_placement("2k3/6/6/1p1p2/2P3/2K3").unwrap();
        let generator = MoveGenerator::new();
        let moves = generator.generate_pseudo_moves(&board, Side::White);
        let pawn: Vec<String> = notations(
            &moves
                .into_iter()
                .filter(|mv| mv.from == sq("c2"))
                .collect::<Vec<_>>(),
        );
        assert_eq!(pawn, vec!["c2c3", "c2xb3", "c2xd3"]);

        // Blocked pawn has no push.
        let blocked = Board::from_placement("2k3/6/6/6/2p3/2P2K").unwrap();
        let moves = generator.generate_pseudo_moves(&blocked, Side::White);
        assert!(moves.iter().all(|mv| mv.from != sq("c1")));
    }

    #[test]
    fn test_pawn_on_last_rank_is_stuck() {
        let board = Board::from_placement("P5/6/6/6/6/5K").unwrap();
        let moves = MoveGenerator::new().generate_pseudo_moves(&board, Side::White);
        assert!(moves.iter().all(|mv| mv.from != sq("a6")));
    }

    #[test]
    fn test_bishop_slides_until_blocked() {
        let board = Board::from_placement("5k/6/3p2/6/1B4/K5").unwrap();
        let moves = MoveGenerator::new().generate_pseudo_moves(&board, Side::White);
        let bishop = notations(
            &moves
                .into_iter()
                .filter(|mv| mv.from == sq("b2"))
                .collect::<Vec<_>>(),
        );
        assert_eq!(bishop, vec!["b2a3", "b2c1", "b2c3", "b2xd4"]);
    }

    #[test]
    fn test_attacks() {
        let generator = MoveGenerator::new();
        let board = Board::from_placement("k5/6/3n2/6/6/K3B1").unwrap();
        // Knight on d4 hits c2, e2, b3, f3, b5, f5, c6, e6.
        assert!(generator.is_square_attacked(&board, sq("c2"), Side::Black));
        assert!(!generator.is_square_attacked(&board, sq("c1"), Side::Black));
        // Bishop on e1 sees up the a5-e1 diagonal.
        assert!(generator.is_square_attacked(&board, sq("b4"), Side::White));
        assert!(generator.is_square_attacked(&board, sq("a5"), Side::White));
        // White pawns attack upward, black pawns downward.
        let pawns = Board::from_placement("k5/6/6/3p2/6/1P3K").unwrap();
        assert!(generator.is_square_attacked(&pawns, sq("c2"), Side::White));
        assert!(!generator.is_square_attacked(&pawns, sq("c1"), Side::White));
        assert!(generator.is_square_attacked(&pawns, sq("e2"), Side::Black));
        assert!(!generator.is_square_attacked(&pawns, sq("e4"), Side::Black));
    }

    #[test]
    fn test_pinned_and_checked_moves_are_filtered() {
        let generator = MoveGenerator::new();
        // Black bishop on a6 checks the king on d3 through b5 and c4.
        let board = Board::from_placement("b5/6/6/3K2/6/5k").unwrap();
        assert!(generator.is_in_check(&board, Side::White));
        let moves = generator.generate_moves(&board, Side::White);
        assert!(!moves.is_empty());
        for mv in &moves {
            let mut after = board.clone();
            after.move_piece(mv.from, mv.to);
            assert!(!generator.is_in_check(&after, Side::White), "{mv} leaves king in check");
        }
        assert!(!notations(&moves).contains(&"d3e2".to_owned()));
    }

    #[test]
    fn test_no_king_never_in_check() {
        let board = Board::from_placement("b5/6/6/6/6/5k").unwrap();
        let generator = MoveGenerator::new();
        assert!(!generator.is_in_check(&board, Side::White));
        assert!(!generator.has_legal_moves(&board, Side::White));
    }
}
