//! Random chess position synthesis by rejection sampling
//!
//! Kings go down first on non-adjacent squares, the remaining pieces land on
//! random empty squares (pawns kept off the first and last ranks), and any
//! board that leaves a king attacked is thrown away whole and redrawn. A
//! partial repair could reintroduce an adjacency or occupancy violation, so
//! rejection is always of the entire board.

use board::{Color, Piece, PieceKind, Position, Square};

use rand::{seq::SliceRandom, Rng};

pub type Result<T, E = GenerateError> = core::result::Result<T, E>;

/// The smallest total piece count that can be generated (two bare kings)
pub const MIN_PIECES: u32 = 2;
/// The largest total piece count that can be generated
pub const MAX_PIECES: u32 = 32;

/// How many check-violating boards to discard before giving up
///
/// Realistic piece counts succeed within a handful of attempts; the cap only
/// exists so a pathological random sequence terminates with an error instead
/// of spinning forever.
const MAX_ATTEMPTS: u32 = 100_000;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    #[error("piece count {0} is outside the accepted range {MIN_PIECES}..={MAX_PIECES}")]
    PieceCountOutOfRange(u32),
    #[error("no check-free board found after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },
}

/// Generate a random position with exactly `piece_count` pieces
///
/// The result always has one king per color, the kings more than one square
/// apart, no pawn on the first or last rank, and neither king attacked.
/// Randomness comes only from the given source, so a seeded source makes the
/// output reproducible.
pub fn generate(rng: &mut impl Rng, piece_count: u32) -> Result<Position> {
    if !(MIN_PIECES..=MAX_PIECES).contains(&piece_count) {
        return Err(GenerateError::PieceCountOutOfRange(piece_count));
    }
    for _ in 0..MAX_ATTEMPTS {
        let board = place_pieces(rng, piece_count);
        if !board.is_check(Color::White) && !board.is_check(Color::Black) {
            return Ok(board);
        }
    }
    Err(GenerateError::RetriesExhausted {
        attempts: MAX_ATTEMPTS,
    })
}

/// A uniformly random square
fn random_square(rng: &mut impl Rng) -> Square {
    Square::from_index(rng.gen_range(0..Square::COUNT)).expect("draw is below Square::COUNT")
}

/// Put `piece_count` pieces on an empty board, kings first
///
/// The returned board satisfies every placement constraint except check
/// freedom, which [`generate`] validates afterwards.
fn place_pieces(rng: &mut impl Rng, piece_count: u32) -> Position {
    let mut board = Position::EMPTY;
    let mut kings: Vec<Square> = Vec::with_capacity(2);
    for color in Color::COLORS {
        let square = loop {
            let candidate = random_square(rng);
            if board.get(candidate).is_none()
                && kings
                    .iter()
                    .all(|&king| candidate.chebyshev_distance(king) > 1)
            {
                break candidate;
            }
        };
        board.set(
            square,
            Some(Piece {
                kind: PieceKind::King,
                color,
            }),
        );
        kings.push(square);
    }
    for _ in 0..piece_count - 2 {
        let kind = *PieceKind::PLACEABLE
            .choose(rng)
            .expect("PLACEABLE is non-empty");
        let color = *Color::COLORS.choose(rng).expect("COLORS is non-empty");
        let square = loop {
            let candidate = random_square(rng);
            if board.get(candidate).is_some() {
                continue;
            }
            // Pawns can't legally sit on their own back rank or the
            // promotion rank
            if kind == PieceKind::Pawn && (candidate.rank() == 0 || candidate.rank() == 7) {
                continue;
            }
            break candidate;
        };
        board.set(square, Some(Piece { kind, color }));
    }
    board
}
