use core::{fmt, str::FromStr};
use std::error;

mod position;

pub use crate::position::{FenError, Position};

/// The types of pieces there are
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum PieceKind {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}
impl PieceKind {
    /// All the kinds of pieces there are
    pub const KINDS: [PieceKind; 6] = [
        Self::Pawn,
        Self::Rook,
        Self::Knight,
        Self::Bishop,
        Self::Queen,
        Self::King,
    ];

    /// The kinds a random position may contain more than one of per color
    ///
    /// Everything except the king, which is placed separately and exactly once.
    pub const PLACEABLE: [PieceKind; 5] = [
        Self::Pawn,
        Self::Rook,
        Self::Knight,
        Self::Bishop,
        Self::Queen,
    ];

    /// The capitalized version of the letter used for this piece in FEN
    pub const fn fen_letter(self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Rook => 'R',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }
}

/// The colors a piece can have
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Color {
    White,
    Black,
}
impl Color {
    /// Both colors, white first
    pub const COLORS: [Color; 2] = [Color::White, Color::Black];

    pub const fn other(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// The direction this color's pawns advance in, as a rank delta
    pub const fn pawn_direction(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }
}

/// A piece
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}
impl Piece {
    /// The letter used for this piece in FEN
    ///
    /// Uppercase for white, lowercase for black.
    pub const fn fen_letter(self) -> char {
        match self.color {
            Color::White => self.kind.fen_letter().to_ascii_uppercase(),
            Color::Black => self.kind.fen_letter().to_ascii_lowercase(),
        }
    }

    /// Parse a piece from its FEN letter, `None` if the letter names no piece
    pub const fn from_fen_letter(letter: char) -> Option<Self> {
        let kind = match letter.to_ascii_uppercase() {
            'P' => PieceKind::Pawn,
            'R' => PieceKind::Rook,
            'N' => PieceKind::Knight,
            'B' => PieceKind::Bishop,
            'Q' => PieceKind::Queen,
            'K' => PieceKind::King,
            _ => return None,
        };
        let color = if letter.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Self { kind, color })
    }
}

/// A square on the board
///
/// Stored as a rank-major index on `0..64`, so every value that can be
/// constructed names a real square. Fallible constructors return `Option`
/// instead of carrying an invalid sentinel around.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square(u8);
impl Square {
    /// How many squares the board has
    pub const COUNT: u8 = 64;

    /// Produce a square from its rank-major index, if it's on the board
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < Self::COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Produce a square from the rank and file, if both are on the board
    ///
    /// Rank 0 is the rank white's pieces start on (printed as "1"), file 0 is
    /// the file printed as "a".
    pub const fn from_rank_file(rank: u8, file: u8) -> Option<Self> {
        if rank < 8 && file < 8 {
            Some(Self(rank * 8 + file))
        } else {
            None
        }
    }

    /// The rank-major index of this square, suitable for array lookups
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn rank(self) -> u8 {
        self.0 / 8
    }

    pub const fn file(self) -> u8 {
        self.0 % 8
    }

    /// The square offset from this one by the given rank and file deltas
    ///
    /// `None` if the result would fall off the board.
    pub const fn offset(self, rank: i8, file: i8) -> Option<Self> {
        let rank = self.rank() as i8 + rank;
        let file = self.file() as i8 + file;
        if 0 <= rank && rank < 8 && 0 <= file && file < 8 {
            Self::from_rank_file(rank as u8, file as u8)
        } else {
            None
        }
    }

    /// The Chebyshev distance to the other square
    ///
    /// This is the number of king moves needed to get from one to the other,
    /// so two squares are adjacent exactly when this returns 1.
    pub const fn chebyshev_distance(self, other: Self) -> u8 {
        let rank = (self.rank() as i8 - other.rank() as i8).unsigned_abs();
        let file = (self.file() as i8 - other.file() as i8).unsigned_abs();
        if rank > file {
            rank
        } else {
            file
        }
    }

    /// An iterator over all squares on the board, in rank-major order
    ///
    /// ```
    /// assert_eq!(board::Square::all().count(), 64);
    /// ```
    pub fn all() -> impl Iterator<Item = Self> {
        (0..Self::COUNT).map(Self)
    }
}
impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Square")
            .field("index", &self.0)
            .field("name", &self.to_string())
            .finish()
    }
}
impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            (b'a' + self.file()) as char,
            (b'1' + self.rank()) as char
        )
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct SquareFromStrErr;
impl fmt::Display for SquareFromStrErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("square name was invalid")
    }
}
impl error::Error for SquareFromStrErr {}
impl FromStr for Square {
    type Err = SquareFromStrErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let &[file, rank] = s.as_bytes() else {
            return Err(SquareFromStrErr);
        };
        let file = match file {
            b'a'..=b'h' => file - b'a',
            _ => return Err(SquareFromStrErr),
        };
        let rank = match rank {
            b'1'..=b'8' => rank - b'1',
            _ => return Err(SquareFromStrErr),
        };
        Ok(Self(rank * 8 + file))
    }
}
