//! Fire-and-forget board display with a quit flag
//!
//! The trainer shows the position for a fixed viewing window before the
//! guess prompt starts. The window runs on its own thread and polls a shared
//! flag every 100ms so the user can end it early with Ctrl-C; the rest of
//! the program never depends on the thread finishing, though the main flow
//! chooses to join it before prompting.

use board::Position;

use std::{
    io,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

/// How long a displayed position stays up when nobody interrupts it
pub const DISPLAY_TIMEOUT: Duration = Duration::from_secs(20);

/// How often the display thread polls the quit flag
const TICK: Duration = Duration::from_millis(100);

/// A flag that is raised when the user presses Ctrl-C
pub fn quit_flag() -> io::Result<Arc<AtomicBool>> {
    let flag = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&flag))?;
    Ok(flag)
}

/// Show the position in a background thread
///
/// Prints the board diagram, then keeps the viewing window open until the
/// timeout elapses or `quit` becomes true. The returned handle lets the
/// caller wait for the window to close before moving on.
pub fn show_position(board: &Position, quit: Arc<AtomicBool>, timeout: Duration) -> JoinHandle<()> {
    let diagram = board.to_string();
    thread::spawn(move || {
        println!("{diagram}");
        let mut waited = Duration::ZERO;
        while waited < timeout {
            thread::sleep(TICK);
            waited += TICK;
            if quit.load(Ordering::Relaxed) {
                break;
            }
        }
    })
}
