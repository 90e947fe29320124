//! Memorize-and-guess chess position trainer
//!
//! Samples a random position with the requested piece count from the sorted
//! dataset (or synthesizes one), shows it for a fixed viewing window, then
//! scores the user's square-by-square guesses.

use clap::Parser;
use game::{actual_placements, display, parse_guess, score_guesses};
use positions_database::{PositionDataset, RangeIndex};
use rand::{rngs::SmallRng, SeedableRng};

use std::{
    collections::BTreeMap,
    io::{self, BufRead, Write},
    path::PathBuf,
    sync::{atomic::AtomicBool, Arc},
};

use board::Square;

#[derive(Debug, Parser)]
#[command(about = "Guess the pieces of a random chess position from memory")]
struct Args {
    /// The position dataset, sorted ascending by piece count
    #[arg(long, default_value = "updated_chessData.csv")]
    database: PathBuf,

    /// A prebuilt range index; when given, lookups use it instead of
    /// searching the dataset
    #[arg(long)]
    index: Option<PathBuf>,

    /// Synthesize a random position instead of sampling the dataset
    #[arg(long)]
    generate: bool,

    /// Seed the random source for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
}

fn main() {
    let args = Args::parse();
    let mut rng = match args.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };

    let Some(piece_count) = prompt_piece_count() else {
        return;
    };
    if !(generator::MIN_PIECES..=generator::MAX_PIECES).contains(&piece_count) {
        println!(
            "Please input a value between {} and {}",
            generator::MIN_PIECES,
            generator::MAX_PIECES
        );
        return;
    }

    let (board, evaluation) = if args.generate {
        match generator::generate(&mut rng, piece_count) {
            Ok(board) => (board, None),
            Err(error) => {
                eprintln!("{error}");
                return;
            }
        }
    } else {
        let dataset = match PositionDataset::load(&args.database) {
            Ok(dataset) => dataset,
            Err(error) => return report_error(&error),
        };
        let range = match &args.index {
            Some(index_path) => match RangeIndex::load(index_path) {
                Ok(index) => index.locate(piece_count),
                Err(error) => return report_error(&error),
            },
            None => dataset.find_range(piece_count),
        };
        let Some((first, last)) = range else {
            println!("No positions found with {piece_count} pieces.");
            return;
        };
        println!("Found positions with {piece_count} pieces between indices {first} and {last}.");
        let Some(record) = dataset.sample(&mut rng, first, last) else {
            eprintln!(
                "index range {first}..={last} does not fit the dataset ({} rows); \
                 rebuild the index with build-index",
                dataset.len()
            );
            return;
        };
        match record.position() {
            Ok(board) => (board, Some(record.evaluation.clone())),
            Err(error) => {
                eprintln!("dataset record holds a malformed FEN: {error}");
                return;
            }
        }
    };

    println!("Displaying the randomly selected position...");
    let quit = display::quit_flag().unwrap_or_else(|_| Arc::new(AtomicBool::new(false)));
    let view = display::show_position(&board, quit, display::DISPLAY_TIMEOUT);
    // Hold the prompt until the viewing window closes
    let _ = view.join();

    let guesses = read_guesses();
    let report = score_guesses(&board, &guesses);
    for outcome in &report.outcomes {
        if outcome.correct {
            println!("Correct: {} at {}", outcome.guessed, outcome.square);
        } else {
            let actual = outcome
                .actual
                .map_or_else(|| "Empty".to_string(), |symbol| symbol.to_string());
            println!(
                "Incorrect: {} at {}. Actual: {}",
                outcome.guessed, outcome.square, actual
            );
        }
    }

    println!("\nActual positions of all pieces on the board:");
    for (square, symbol) in actual_placements(&board) {
        println!("{square}: {symbol}");
    }
    println!(
        "\nYou guessed {} out of {} pieces correctly.",
        report.correct, report.total_pieces
    );
    println!("{board}");
    if let Some(evaluation) = evaluation {
        println!("Stockfish evaluation for this position is {evaluation}");
    }
}

/// Ask for the total piece count, `None` if the input wasn't an integer
fn prompt_piece_count() -> Option<u32> {
    print!(
        "Enter the total number of pieces on the board ({}-{}): ",
        generator::MIN_PIECES,
        generator::MAX_PIECES
    );
    let _ = io::stdout().flush();
    let mut buffer = String::new();
    if io::stdin().read_line(&mut buffer).is_err() {
        println!("Invalid input! Please enter an integer.");
        return None;
    }
    match buffer.trim().parse() {
        Ok(piece_count) => Some(piece_count),
        Err(_) => {
            println!("Invalid input! Please enter an integer.");
            None
        }
    }
}

/// Collect guesses until the user types `done`
///
/// Malformed lines get a message and the loop continues; a later guess for
/// the same square replaces the earlier one.
fn read_guesses() -> BTreeMap<Square, char> {
    println!("\nStart guessing the positions of the pieces!");
    println!("Use standard chess notation (e.g. 'e4', 'h7') and capital letters for white pieces.");
    println!("Type 'done' when you are finished.\n");
    let mut guesses = BTreeMap::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("Enter your guess (e.g. 'e4 N' for a white knight on e4): ");
        let _ = io::stdout().flush();
        let Some(Ok(line)) = lines.next() else {
            break;
        };
        match parse_guess(&line) {
            Ok(None) => break,
            Ok(Some((square, piece))) => {
                guesses.insert(square, piece);
            }
            Err(error) => println!("{error}"),
        }
    }
    guesses
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
