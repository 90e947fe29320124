//! Guess parsing and scoring for the position-memorization trainer
//!
//! Everything here is pure so the binary can stay a thin prompt loop. The
//! user guesses `<square> <piece-letter>` pairs against a hidden position;
//! a guess is correct only when the letter exactly matches the FEN symbol of
//! the occupant (case carries the color), and a guess on an empty or wrong
//! square is merely incorrect, never an error.

use board::{Position, Square};

use std::collections::BTreeMap;

pub mod display;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum GuessParseError {
    #[error("invalid input format! Use 'position piece' (e.g. 'e4 N')")]
    WrongShape,
    #[error("invalid position {0:?}! Please use standard chess notation (e.g. 'e4')")]
    BadSquare(String),
    #[error("invalid piece format {0:?}! Use single letters (e.g. 'N' for knight)")]
    BadPiece(String),
}

/// Parse one line of guess input
///
/// `Ok(None)` means the user typed the terminator `done` (any case).
/// Square names are accepted in either case; the piece letter is taken
/// verbatim because its case encodes the color.
pub fn parse_guess(input: &str) -> Result<Option<(Square, char)>, GuessParseError> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("done") {
        return Ok(None);
    }
    let mut words = input.split_whitespace();
    let (Some(square), Some(piece), None) = (words.next(), words.next(), words.next()) else {
        return Err(GuessParseError::WrongShape);
    };
    let square = square
        .to_ascii_lowercase()
        .parse()
        .map_err(|_| GuessParseError::BadSquare(square.to_string()))?;
    let mut letters = piece.chars();
    match (letters.next(), letters.next()) {
        (Some(letter), None) if letter.is_ascii_alphabetic() => Ok(Some((square, letter))),
        _ => Err(GuessParseError::BadPiece(piece.to_string())),
    }
}

/// The verdict for one guessed square
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuessOutcome {
    pub square: Square,
    /// The letter the user guessed
    pub guessed: char,
    /// The FEN symbol actually on that square, if it's occupied
    pub actual: Option<char>,
    pub correct: bool,
}

/// The result of scoring a full set of guesses
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuessReport {
    /// How many guesses matched their square's occupant exactly
    pub correct: usize,
    /// How many pieces the board actually holds
    pub total_pieces: usize,
    /// One verdict per guess, in square order
    pub outcomes: Vec<GuessOutcome>,
}

/// Score the guesses against the actual position
///
/// A pure fold over the guesses: no retries, no failure modes.
pub fn score_guesses(board: &Position, guesses: &BTreeMap<Square, char>) -> GuessReport {
    let outcomes: Vec<GuessOutcome> = guesses
        .iter()
        .map(|(&square, &guessed)| {
            let actual = board.get(square).map(|piece| piece.fen_letter());
            GuessOutcome {
                square,
                guessed,
                actual,
                correct: actual == Some(guessed),
            }
        })
        .collect();
    GuessReport {
        correct: outcomes.iter().filter(|outcome| outcome.correct).count(),
        total_pieces: board.piece_count(),
        outcomes,
    }
}

/// Every occupied square and its FEN symbol, sorted by square name
///
/// Name order ("a1", "a2", ... "h8") reads better aloud than board order, so
/// this sorts by file before rank.
pub fn actual_placements(board: &Position) -> Vec<(Square, char)> {
    let mut placements: Vec<(Square, char)> = board
        .pieces()
        .map(|(square, piece)| (square, piece.fen_letter()))
        .collect();
    placements.sort_by_key(|&(square, _)| (square.file(), square.rank()));
    placements
}

#[cfg(test)]
mod tests {
    use super::*;

    use board::{Color, Piece, PieceKind};

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    #[test]
    fn test_parse_guess() {
        assert_eq!(parse_guess("e4 N"), Ok(Some((sq("e4"), 'N'))));
        assert_eq!(parse_guess("  h7 q \n"), Ok(Some((sq("h7"), 'q'))));
        assert_eq!(parse_guess("E4 N"), Ok(Some((sq("e4"), 'N'))));
        assert_eq!(parse_guess("done"), Ok(None));
        assert_eq!(parse_guess("DONE"), Ok(None));
        assert_eq!(parse_guess("e4"), Err(GuessParseError::WrongShape));
        assert_eq!(parse_guess("e4 N extra"), Err(GuessParseError::WrongShape));
        assert_eq!(
            parse_guess("z9 N"),
            Err(GuessParseError::BadSquare("z9".to_string()))
        );
        assert_eq!(
            parse_guess("e4 NN"),
            Err(GuessParseError::BadPiece("NN".to_string()))
        );
        assert_eq!(
            parse_guess("e4 4"),
            Err(GuessParseError::BadPiece("4".to_string()))
        );
    }

    #[test]
    fn test_score_guesses() {
        // Actual pieces: white knight on e4, black king on h7
        let mut board = Position::EMPTY;
        board.set(
            sq("e4"),
            Some(Piece {
                kind: PieceKind::Knight,
                color: Color::White,
            }),
        );
        board.set(
            sq("h7"),
            Some(Piece {
                kind: PieceKind::King,
                color: Color::Black,
            }),
        );
        let guesses = BTreeMap::from([(sq("e4"), 'N'), (sq("h7"), 'q'), (sq("a1"), 'P')]);
        let report = score_guesses(&board, &guesses);
        assert_eq!(report.correct, 1);
        assert_eq!(report.total_pieces, 2);
        assert_eq!(report.outcomes.len(), 3);
        for outcome in &report.outcomes {
            match outcome.square {
                square if square == sq("e4") => {
                    assert!(outcome.correct);
                    assert_eq!(outcome.actual, Some('N'));
                }
                square if square == sq("h7") => {
                    assert!(!outcome.correct);
                    assert_eq!(outcome.actual, Some('k'));
                }
                square if square == sq("a1") => {
                    assert!(!outcome.correct);
                    assert_eq!(outcome.actual, None);
                }
                square => panic!("unexpected outcome square {square}"),
            }
        }
    }

    #[test]
    fn test_score_is_case_sensitive() {
        let mut board = Position::EMPTY;
        board.set(
            sq("e4"),
            Some(Piece {
                kind: PieceKind::Knight,
                color: Color::Black,
            }),
        );
        let report = score_guesses(&board, &BTreeMap::from([(sq("e4"), 'N')]));
        assert_eq!(report.correct, 0);
        let report = score_guesses(&board, &BTreeMap::from([(sq("e4"), 'n')]));
        assert_eq!(report.correct, 1);
    }

    #[test]
    fn test_no_guesses_scores_zero() {
        let board = Position::from_fen("4k3/8/8/8/8/8/8/4K3").unwrap();
        let report = score_guesses(&board, &BTreeMap::new());
        assert_eq!(report.correct, 0);
        assert_eq!(report.total_pieces, 2);
        assert!(report.outcomes.is_empty());
    }

    #[test]
    fn test_actual_placements_sorted_by_name() {
        let board = Position::from_fen("4k3/8/8/8/8/8/8/R3K3").unwrap();
        let placements = actual_placements(&board);
        let names: Vec<String> = placements
            .iter()
            .map(|(square, _)| square.to_string())
            .collect();
        assert_eq!(names, ["a1", "e1", "e8"]);
        assert_eq!(placements[0].1, 'R');
        assert_eq!(placements[2].1, 'k');
    }
}
