use core::fmt;

use crate::{Color, Piece, PieceKind, Square};

/// Every way a knight can jump
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

/// Every way a king can step
const KING_OFFSETS: [(i8, i8); 8] = [
    (1, 1),
    (1, 0),
    (1, -1),
    (0, 1),
    (0, -1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// The directions rooks (and queens) slide in
const ROOK_RAYS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// The directions bishops (and queens) slide in
const BISHOP_RAYS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Errors from parsing the piece-placement field of a FEN string
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum FenError {
    #[error("FEN string was empty")]
    Empty,
    #[error("expected 8 ranks in FEN, found {0}")]
    WrongRankCount(usize),
    #[error("rank {rank} of FEN describes {width} files instead of 8")]
    WrongRankWidth { rank: u8, width: u8 },
    #[error("unexpected character {0:?} in FEN piece placement")]
    BadLetter(char),
}

/// A chess position, stored as a plain 64-square grid
///
/// This tracks piece placement only. It makes no attempt to enforce (or even
/// represent) the rest of a game state, so callers that need legality checks
/// do them through [`Position::is_check`] and friends.
#[derive(Clone, PartialEq, Eq)]
pub struct Position {
    squares: [Option<Piece>; 64],
}

impl Position {
    /// A board with no pieces on it
    pub const EMPTY: Self = Self {
        squares: [None; 64],
    };

    /// The piece at the given square, if any
    pub const fn get(&self, square: Square) -> Option<Piece> {
        self.squares[square.index()]
    }

    /// Put a piece on (or clear) the given square
    pub fn set(&mut self, square: Square, piece: Option<Piece>) {
        self.squares[square.index()] = piece;
    }

    /// How many pieces are on the board
    pub fn piece_count(&self) -> usize {
        self.squares.iter().filter(|piece| piece.is_some()).count()
    }

    /// An iterator over the occupied squares, in rank-major order
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(|square| self.get(square).map(|piece| (square, piece)))
    }

    /// Where the given color's king is, if it has one
    pub fn king_square(&self, color: Color) -> Option<Square> {
        Square::all().find(|&square| {
            self.get(square)
                == Some(Piece {
                    kind: PieceKind::King,
                    color,
                })
        })
    }

    /// Parse a position from the piece-placement field of a FEN string
    ///
    /// Trailing FEN fields (side to move, castling, and so on) are accepted
    /// and ignored, so both a bare placement field and a full FEN line work.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let placement = fen.split_whitespace().next().ok_or(FenError::Empty)?;
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::WrongRankCount(ranks.len()));
        }
        let mut board = Self::EMPTY;
        for (row, rank_text) in ranks.iter().enumerate() {
            // FEN lists rank 8 first
            let rank = 7 - row as u8;
            let mut file = 0u8;
            for c in rank_text.chars() {
                if let Some(skip) = c.to_digit(10) {
                    if !(1..=8).contains(&skip) {
                        return Err(FenError::BadLetter(c));
                    }
                    file += skip as u8;
                    // Reject an over-wide rank as soon as it shows, so a long
                    // digit run can't run the accumulator up
                    if file > 8 {
                        return Err(FenError::WrongRankWidth {
                            rank: rank + 1,
                            width: file,
                        });
                    }
                } else {
                    let piece = Piece::from_fen_letter(c).ok_or(FenError::BadLetter(c))?;
                    let square = Square::from_rank_file(rank, file).ok_or(
                        FenError::WrongRankWidth {
                            rank: rank + 1,
                            width: file + 1,
                        },
                    )?;
                    board.set(square, Some(piece));
                    file += 1;
                }
            }
            if file != 8 {
                return Err(FenError::WrongRankWidth {
                    rank: rank + 1,
                    width: file,
                });
            }
        }
        Ok(board)
    }

    /// Convert to a FEN string
    ///
    /// Only piece placement is meaningful here, so the remaining fields are
    /// emitted as the fixed suffix `w - - 0 1` to keep the output readable by
    /// any standard FEN consumer.
    pub fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(80);
        for rank in (0..8).rev() {
            let mut empty_run = 0;
            for file in 0..8 {
                let square = Square::from_rank_file(rank, file)
                    .unwrap_or_else(|| unreachable!("rank and file are both in range"));
                match self.get(square) {
                    Some(piece) => {
                        if empty_run > 0 {
                            fen.push(char::from_digit(empty_run, 10).unwrap_or('8'));
                            empty_run = 0;
                        }
                        fen.push(piece.fen_letter());
                    }
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                fen.push(char::from_digit(empty_run, 10).unwrap_or('8'));
            }
            if rank > 0 {
                fen.push('/');
            }
        }
        fen.push_str(" w - - 0 1");
        fen
    }

    /// The first piece encountered walking from `from` along the given ray
    fn first_piece_along(&self, from: Square, rank: i8, file: i8) -> Option<Piece> {
        let mut square = from;
        while let Some(next) = square.offset(rank, file) {
            square = next;
            if let Some(piece) = self.get(square) {
                return Some(piece);
            }
        }
        None
    }

    /// Whether any piece of color `by` attacks the given square
    ///
    /// This is a purely static test of the current placement: occlusion along
    /// sliding rays is respected, pins and side-to-move are not a concern.
    pub fn is_attacked(&self, target: Square, by: Color) -> bool {
        // Pawns capture one square diagonally forward, so look one square
        // backwards along the attacker's direction of travel.
        let advance = by.pawn_direction();
        for file in [-1, 1] {
            if target.offset(-advance, file).and_then(|source| self.get(source))
                == Some(Piece {
                    kind: PieceKind::Pawn,
                    color: by,
                })
            {
                return true;
            }
        }
        for (rank, file) in KNIGHT_OFFSETS {
            if target.offset(rank, file).and_then(|source| self.get(source))
                == Some(Piece {
                    kind: PieceKind::Knight,
                    color: by,
                })
            {
                return true;
            }
        }
        for (rank, file) in KING_OFFSETS {
            if target.offset(rank, file).and_then(|source| self.get(source))
                == Some(Piece {
                    kind: PieceKind::King,
                    color: by,
                })
            {
                return true;
            }
        }
        for (rank, file) in ROOK_RAYS {
            if let Some(piece) = self.first_piece_along(target, rank, file) {
                if piece.color == by
                    && matches!(piece.kind, PieceKind::Rook | PieceKind::Queen)
                {
                    return true;
                }
            }
        }
        for (rank, file) in BISHOP_RAYS {
            if let Some(piece) = self.first_piece_along(target, rank, file) {
                if piece.color == by
                    && matches!(piece.kind, PieceKind::Bishop | PieceKind::Queen)
                {
                    return true;
                }
            }
        }
        false
    }

    /// Whether the given color's king is currently attacked
    ///
    /// A board without that king on it is simply "not in check".
    pub fn is_check(&self, color: Color) -> bool {
        self.king_square(color)
            .is_some_and(|king| self.is_attacked(king, color.other()))
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position({})", self.to_fen())
    }
}

/// Renders an ASCII diagram with rank 8 at the top, dots for empty squares
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            for file in 0..8 {
                if file > 0 {
                    f.write_str(" ")?;
                }
                match Square::from_rank_file(rank, file).and_then(|square| self.get(square)) {
                    Some(piece) => write!(f, "{}", piece.fen_letter())?,
                    None => f.write_str(".")?,
                }
            }
            if rank > 0 {
                f.write_str("\n")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INITIAL_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    #[test]
    fn test_initial_position_fen_round_trip() {
        let board = Position::from_fen(INITIAL_PLACEMENT).unwrap();
        assert_eq!(board.to_fen(), format!("{INITIAL_PLACEMENT} w - - 0 1"));
        assert_eq!(board.piece_count(), 32);
        assert_eq!(board.king_square(Color::White), Some(sq("e1")));
        assert_eq!(board.king_square(Color::Black), Some(sq("e8")));
        assert!(!board.is_check(Color::White));
        assert!(!board.is_check(Color::Black));
    }

    #[test]
    fn test_full_fen_line_accepted() {
        let board = Position::from_fen(&format!("{INITIAL_PLACEMENT} w KQkq - 0 1")).unwrap();
        assert_eq!(board.piece_count(), 32);
    }

    #[test]
    fn test_bad_fens_rejected() {
        assert_eq!(Position::from_fen(""), Err(FenError::Empty));
        assert_eq!(
            Position::from_fen("8/8/8/8"),
            Err(FenError::WrongRankCount(4))
        );
        assert_eq!(
            Position::from_fen("8/8/8/8/8/8/8/7"),
            Err(FenError::WrongRankWidth { rank: 1, width: 7 })
        );
        assert_eq!(
            Position::from_fen("8/8/8/8/8/8/8/9"),
            Err(FenError::BadLetter('9'))
        );
        assert_eq!(
            Position::from_fen("8/8/8/8/8/8/8/7x"),
            Err(FenError::BadLetter('x'))
        );
        // A long digit run must fail cleanly, not overflow the file counter
        assert_eq!(
            Position::from_fen(&format!("{}/8/8/8/8/8/8/8", "8".repeat(32))),
            Err(FenError::WrongRankWidth { rank: 8, width: 16 })
        );
        assert_eq!(
            Position::from_fen("8/8/8/44p/8/8/8/8"),
            Err(FenError::WrongRankWidth { rank: 5, width: 9 })
        );
    }

    #[test]
    fn test_queen_check_through_open_diagonal() {
        // Fool's mate: the queen on h4 sees e1 through g3 and f2
        let board =
            Position::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR").unwrap();
        assert!(board.is_check(Color::White));
        assert!(!board.is_check(Color::Black));
    }

    #[test]
    fn test_knight_check() {
        let board = Position::from_fen("4k3/8/8/8/8/5n2/8/4K3").unwrap();
        assert!(board.is_check(Color::White));
        assert!(!board.is_check(Color::Black));
    }

    #[test]
    fn test_blocked_rook_is_not_check() {
        let board = Position::from_fen("4k3/8/8/8/4r3/8/4P3/4K3").unwrap();
        assert!(!board.is_check(Color::White));
        assert!(!board.is_check(Color::Black));
        // Remove the blocking pawn and the check appears
        let mut board = board;
        board.set(sq("e2"), None);
        assert!(board.is_check(Color::White));
    }

    #[test]
    fn test_pawn_checks() {
        let board = Position::from_fen("4k3/8/8/8/8/8/3p4/4K3").unwrap();
        assert!(board.is_check(Color::White));
        let board = Position::from_fen("4k3/3P4/8/8/8/8/8/4K3").unwrap();
        assert!(board.is_check(Color::Black));
        // Pawns don't attack backwards
        let board = Position::from_fen("4k3/8/8/8/8/8/3P4/4K3").unwrap();
        assert!(!board.is_check(Color::White));
    }

    #[test]
    fn test_adjacent_kings_attack_each_other() {
        let board = Position::from_fen("8/8/8/3kK3/8/8/8/8").unwrap();
        assert!(board.is_check(Color::White));
        assert!(board.is_check(Color::Black));
    }

    #[test]
    fn test_display_diagram() {
        let board = Position::from_fen("4k3/8/8/8/8/8/8/4K2R").unwrap();
        let diagram = board.to_string();
        let rows: Vec<&str> = diagram.lines().collect();
        assert_eq!(rows.len(), 8);
        assert_eq!(rows[0], ". . . . k . . .");
        assert_eq!(rows[7], ". . . . K . . R");
    }
}
