//! Terminal setup helpers shared by the binary.

use std::io;
use std::panic;
use std::thread;

use crossterm::{
    event::DisableMouseCapture,
    execute,
    terminal::{disable_raw_mode, LeaveAlternateScreen},
};
use log::warn;

use crate::application::FETCH_THREAD_PREFIX;

/// Leaves raw mode and the alternate screen.
pub fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)
}

/// Keeps panic reports off the drawn screen.
///
/// Panics on fetch workers are already turned into `Failed` by the pipeline,
/// so they only go to the log at warn level, which is hidden unless
/// `RUST_LOG` asks for it. Any other panic restores the terminal first
/// and then reports through the previous hook.
pub fn install_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let current = thread::current();
        if is_fetch_worker(current.name()) {
            warn!("{}", info);
        } else {
            let _ = restore_terminal();
            previous(info);
        }
    }));
}

pub(crate) fn is_fetch_worker(thread_name: Option<&str>) -> bool {
    thread_name.is_some_and(|name| name.starts_with(FETCH_THREAD_PREFIX))
}
