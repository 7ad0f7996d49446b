//! Presentation layer handling terminal UI and user input.
//!
//! This module renders the user directory with ratatui and maps key presses
//! onto application commands.

pub mod ui;
pub mod input;
pub mod terminal;

pub use ui::*;
pub use input::*;
pub use terminal::*;
