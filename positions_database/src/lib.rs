//! A database of chess positions, sorted by how many pieces are on the board
//!
//! The dataset is a CSV file with `FEN`, `Evaluation`, and `Piece_Count`
//! columns, pre-sorted ascending by `Piece_Count`. That ordering is what lets
//! [`PositionDataset::find_range`] answer "all positions with exactly N
//! pieces" with two binary searches instead of a scan.

use rand::Rng;

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
};

mod index;

pub use crate::index::{RangeEntry, RangeIndex, MAX_PIECE_COUNT, MIN_PIECE_COUNT};

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// The header row every dataset file must start with
const DATASET_HEADER: &str = "FEN,Evaluation,Piece_Count";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not open {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("I/O error on dataset or index file")]
    Io(#[from] io::Error),
    #[error("expected header row {expected:?}, found {found:?}")]
    BadHeader {
        expected: &'static str,
        found: String,
    },
    #[error("malformed row on line {line}: {reason}")]
    MalformedRow { line: usize, reason: &'static str },
}

/// One row of the dataset
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PositionRecord {
    /// The position, as a FEN string
    pub fen: String,
    /// The engine evaluation of the position
    ///
    /// Kept textual because the source data mixes centipawn scores with mate
    /// annotations like `#+3`; nothing here computes with it.
    pub evaluation: String,
    /// How many pieces are on the board
    pub piece_count: u32,
}

impl PositionRecord {
    /// Parse this record's FEN into a [`board::Position`]
    pub fn position(&self) -> Result<board::Position, board::FenError> {
        board::Position::from_fen(&self.fen)
    }
}

/// An in-memory copy of the dataset, in file order
///
/// Lookups assume the records are sorted ascending by `piece_count`. That is
/// a property of the input file, not something this type checks or repairs;
/// feeding in unsorted data gives meaningless ranges rather than an error.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PositionDataset {
    records: Vec<PositionRecord>,
}

impl PositionDataset {
    /// Load the dataset from a CSV file on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Open {
            path: path.to_owned(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parse the dataset out of CSV text
    ///
    /// None of the columns contain commas or quoting, so each row splits on
    /// its two commas directly.
    pub fn from_reader(reader: impl BufRead) -> Result<Self> {
        let mut lines = reader.lines().enumerate();
        match lines.next() {
            Some((_, header)) => {
                let header = header?;
                if header.trim_end() != DATASET_HEADER {
                    return Err(Error::BadHeader {
                        expected: DATASET_HEADER,
                        found: header,
                    });
                }
            }
            None => {
                return Err(Error::BadHeader {
                    expected: DATASET_HEADER,
                    found: String::new(),
                })
            }
        }
        let mut records = Vec::new();
        for (idx, line) in lines {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            // Line numbers are 1-based and include the header
            let line_number = idx + 1;
            let mut columns = line.splitn(3, ',');
            let (Some(fen), Some(evaluation), Some(piece_count)) =
                (columns.next(), columns.next(), columns.next())
            else {
                return Err(Error::MalformedRow {
                    line: line_number,
                    reason: "expected 3 comma-separated columns",
                });
            };
            let piece_count = piece_count
                .trim_end()
                .parse()
                .map_err(|_| Error::MalformedRow {
                    line: line_number,
                    reason: "piece count was not an integer",
                })?;
            records.push(PositionRecord {
                fen: fen.to_string(),
                evaluation: evaluation.to_string(),
                piece_count,
            });
        }
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PositionRecord> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[PositionRecord] {
        &self.records
    }

    /// The inclusive index range of records with exactly `piece_count` pieces
    ///
    /// Two binary searches over the piece-count column: one that keeps moving
    /// left on a hit to find the first occurrence, one that keeps moving right
    /// to find the last. `None` when no record has that count. The result is
    /// undefined if the dataset isn't sorted by piece count.
    pub fn find_range(&self, piece_count: u32) -> Option<(usize, usize)> {
        let first = self.leftmost(piece_count)?;
        let last = self.rightmost(piece_count)?;
        Some((first, last))
    }

    fn leftmost(&self, target: u32) -> Option<usize> {
        let mut left = 0isize;
        let mut right = self.records.len() as isize - 1;
        let mut result = None;
        while left <= right {
            let mid = (left + right) / 2;
            let value = self.records[mid as usize].piece_count;
            if value == target {
                result = Some(mid as usize);
                right = mid - 1;
            } else if value < target {
                left = mid + 1;
            } else {
                right = mid - 1;
            }
        }
        result
    }

    fn rightmost(&self, target: u32) -> Option<usize> {
        let mut left = 0isize;
        let mut right = self.records.len() as isize - 1;
        let mut result = None;
        while left <= right {
            let mid = (left + right) / 2;
            let value = self.records[mid as usize].piece_count;
            if value == target {
                result = Some(mid as usize);
                left = mid + 1;
            } else if value < target {
                left = mid + 1;
            } else {
                right = mid - 1;
            }
        }
        result
    }

    /// A uniformly random record from the inclusive index range
    ///
    /// Any successful [`Self::find_range`] result gives valid bounds, but a
    /// range index reloaded from disk can be stale against a changed dataset,
    /// so bounds that don't fit this dataset return `None` instead of
    /// indexing out of range.
    pub fn sample(
        &self,
        rng: &mut impl Rng,
        first: usize,
        last: usize,
    ) -> Option<&PositionRecord> {
        if first > last || last >= self.records.len() {
            return None;
        }
        Some(&self.records[sample_range(rng, first, last)])
    }
}

/// A uniformly random index drawn from `[first, last]`, endpoints included
///
/// Consumes exactly one draw from the given source. The caller guarantees
/// `first <= last`.
pub fn sample_range(rng: &mut impl Rng, first: usize, last: usize) -> usize {
    rng.gen_range(first..=last)
}
