//! The precomputed range index over piece counts
//!
//! Building the index runs the two binary searches once per piece count in
//! the fixed `2..=36` domain and stores the resulting bounds, so the query
//! path can answer range lookups with a plain table fetch after reloading
//! the index from disk.

use crate::{Error, PositionDataset, Result};

use std::{
    fs::File,
    io::{self, BufRead, BufReader, Write},
    path::Path,
};

/// The smallest piece count the index covers (two bare kings)
pub const MIN_PIECE_COUNT: u32 = 2;
/// The largest piece count the index covers
pub const MAX_PIECE_COUNT: u32 = 36;

/// The header row of the persisted index file
const INDEX_HEADER: &str = "Num_Pieces,Leftmost_Index,Rightmost_Index";

/// The index bounds for one piece count
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RangeEntry {
    pub piece_count: u32,
    /// The first and last dataset index holding this count, if any record does
    ///
    /// Either both bounds exist or neither does.
    pub bounds: Option<(usize, usize)>,
}

/// A table mapping every piece count in `2..=36` to its dataset index range
///
/// Built once per dataset snapshot; there is no incremental update, so a
/// changed dataset means a full rebuild.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RangeIndex {
    /// One entry per count, in ascending count order
    entries: Vec<RangeEntry>,
}

impl RangeIndex {
    /// Build the index from a dataset snapshot
    pub fn build(dataset: &PositionDataset) -> Self {
        Self {
            entries: (MIN_PIECE_COUNT..=MAX_PIECE_COUNT)
                .map(|piece_count| RangeEntry {
                    piece_count,
                    bounds: dataset.find_range(piece_count),
                })
                .collect(),
        }
    }

    /// The inclusive dataset index range for the given piece count
    ///
    /// Functionally equivalent to [`PositionDataset::find_range`] on the
    /// dataset this was built from, minus the binary searches. Counts outside
    /// the indexed `2..=36` domain are `None`.
    pub fn locate(&self, piece_count: u32) -> Option<(usize, usize)> {
        if !(MIN_PIECE_COUNT..=MAX_PIECE_COUNT).contains(&piece_count) {
            return None;
        }
        self.entries[(piece_count - MIN_PIECE_COUNT) as usize].bounds
    }

    pub fn entries(&self) -> &[RangeEntry] {
        &self.entries
    }

    /// Write the index as CSV, empty cells standing for absent bounds
    pub fn to_writer(&self, mut writer: impl Write) -> io::Result<()> {
        writeln!(writer, "{INDEX_HEADER}")?;
        for entry in &self.entries {
            match entry.bounds {
                Some((first, last)) => {
                    writeln!(writer, "{},{first},{last}", entry.piece_count)?;
                }
                None => writeln!(writer, "{},,", entry.piece_count)?,
            }
        }
        Ok(())
    }

    /// Save the index as a CSV file on disk
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Open {
            path: path.to_owned(),
            source,
        })?;
        self.to_writer(file)?;
        Ok(())
    }

    /// Parse a previously saved index out of CSV text
    pub fn from_reader(reader: impl BufRead) -> Result<Self> {
        let mut lines = reader.lines().enumerate();
        match lines.next() {
            Some((_, header)) => {
                let header = header?;
                if header.trim_end() != INDEX_HEADER {
                    return Err(Error::BadHeader {
                        expected: INDEX_HEADER,
                        found: header,
                    });
                }
            }
            None => {
                return Err(Error::BadHeader {
                    expected: INDEX_HEADER,
                    found: String::new(),
                })
            }
        }
        let mut entries = Vec::with_capacity((MAX_PIECE_COUNT - MIN_PIECE_COUNT + 1) as usize);
        for (idx, line) in lines {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            let line_number = idx + 1;
            let malformed = |reason| Error::MalformedRow {
                line: line_number,
                reason,
            };
            let mut columns = line.trim_end().splitn(3, ',');
            let (Some(piece_count), Some(first), Some(last)) =
                (columns.next(), columns.next(), columns.next())
            else {
                return Err(malformed("expected 3 comma-separated columns"));
            };
            let piece_count = piece_count
                .parse()
                .map_err(|_| malformed("piece count was not an integer"))?;
            let bounds = match (first.is_empty(), last.is_empty()) {
                (true, true) => None,
                (false, false) => Some((
                    first
                        .parse()
                        .map_err(|_| malformed("leftmost index was not an integer"))?,
                    last.parse()
                        .map_err(|_| malformed("rightmost index was not an integer"))?,
                )),
                _ => return Err(malformed("bounds must be both present or both empty")),
            };
            entries.push(RangeEntry {
                piece_count,
                bounds,
            });
        }
        let expected_counts: Vec<u32> = (MIN_PIECE_COUNT..=MAX_PIECE_COUNT).collect();
        let found_counts: Vec<u32> = entries.iter().map(|entry| entry.piece_count).collect();
        if found_counts != expected_counts {
            return Err(Error::MalformedRow {
                line: 1,
                reason: "index must hold one row per piece count from 2 to 36",
            });
        }
        Ok(Self { entries })
    }

    /// Load a previously saved index from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Open {
            path: path.to_owned(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PositionRecord;

    fn dataset_with_counts(counts: &[u32]) -> PositionDataset {
        PositionDataset {
            records: counts
                .iter()
                .map(|&piece_count| PositionRecord {
                    fen: String::new(),
                    evaluation: String::new(),
                    piece_count,
                })
                .collect(),
        }
    }

    #[test]
    fn test_index_matches_direct_search() {
        let dataset = dataset_with_counts(&[2, 2, 3, 3, 3, 5, 5, 32, 36, 36]);
        let index = RangeIndex::build(&dataset);
        for piece_count in MIN_PIECE_COUNT..=MAX_PIECE_COUNT {
            assert_eq!(
                index.locate(piece_count),
                dataset.find_range(piece_count),
                "disagreement for piece count {piece_count}"
            );
        }
    }

    #[test]
    fn test_index_on_empty_dataset() {
        let index = RangeIndex::build(&PositionDataset::default());
        for piece_count in 0..40 {
            assert_eq!(index.locate(piece_count), None);
        }
    }

    #[test]
    fn test_locate_outside_domain() {
        let index = RangeIndex::build(&dataset_with_counts(&[2, 36]));
        assert_eq!(index.locate(2), Some((0, 0)));
        assert_eq!(index.locate(36), Some((1, 1)));
        assert_eq!(index.locate(1), None);
        assert_eq!(index.locate(37), None);
        assert_eq!(index.locate(0), None);
    }

    #[test]
    fn test_csv_round_trip() {
        let dataset = dataset_with_counts(&[2, 2, 3, 3, 3, 5, 5]);
        let index = RangeIndex::build(&dataset);
        let mut csv = Vec::new();
        index.to_writer(&mut csv).unwrap();
        let reloaded = RangeIndex::from_reader(csv.as_slice()).unwrap();
        assert_eq!(index, reloaded);
    }

    #[test]
    fn test_build_is_idempotent() {
        let dataset = dataset_with_counts(&[2, 3, 3, 10, 10, 10, 35]);
        let mut first = Vec::new();
        RangeIndex::build(&dataset).to_writer(&mut first).unwrap();
        let mut second = Vec::new();
        RangeIndex::build(&dataset).to_writer(&mut second).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_csv_shape() {
        let index = RangeIndex::build(&dataset_with_counts(&[3, 3]));
        let mut csv = Vec::new();
        index.to_writer(&mut csv).unwrap();
        let csv = String::from_utf8(csv).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("Num_Pieces,Leftmost_Index,Rightmost_Index"));
        assert_eq!(lines.next(), Some("2,,"));
        assert_eq!(lines.next(), Some("3,0,1"));
        // one header plus one row per count from 2 to 36
        assert_eq!(csv.lines().count(), 36);
    }

    #[test]
    fn test_reload_rejects_half_empty_bounds() {
        let csv = "Num_Pieces,Leftmost_Index,Rightmost_Index\n2,5,\n";
        assert!(matches!(
            RangeIndex::from_reader(csv.as_bytes()),
            Err(Error::MalformedRow { line: 2, .. })
        ));
    }
}
