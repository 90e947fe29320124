//! Build the piece-count range index for a sorted position dataset
//!
//! Runs the leftmost/rightmost binary searches once per piece count in the
//! indexed domain and writes the resulting bounds table as CSV, so the
//! trainer's lookup path can skip the searches entirely.

use clap::Parser;
use positions_database::{PositionDataset, RangeIndex, MAX_PIECE_COUNT, MIN_PIECE_COUNT};

use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(about = "Precompute the piece-count index ranges of a sorted dataset")]
struct Args {
    /// The dataset to index, sorted ascending by piece count
    #[arg(long, default_value = "updated_chessData.csv")]
    database: PathBuf,

    /// Where to write the index CSV
    #[arg(long, default_value = "piece_count_indices.csv")]
    output: PathBuf,
}

fn main() {
    let args = Args::parse();
    let dataset = match PositionDataset::load(&args.database) {
        Ok(dataset) => dataset,
        Err(error) => return report_error(&error),
    };
    println!(
        "Calculating indices for piece counts {MIN_PIECE_COUNT} to {MAX_PIECE_COUNT} \
         over {} positions...",
        dataset.len()
    );
    let index = RangeIndex::build(&dataset);
    match index.save(&args.output) {
        Ok(()) => println!("Data saved to {}", args.output.display()),
        Err(error) => report_error(&error),
    }
}

/// Print an error and everything that caused it
fn report_error(error: &dyn std::error::Error) {
    eprintln!("{error}");
    let mut source = error.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
}
