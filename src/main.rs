//! TUSERS - Terminal User Directory
//!
//! Fetches the user collection from a JSONPlaceholder-compatible API and
//! browses it in the terminal. Failed fetches show the reason and can be
//! retried with `r`.
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`; redirect stderr
//! to a file when enabling it, e.g. `RUST_LOG=debug tusers 2>tusers.log`.
//! Panics on fetch workers are logged there too instead of being printed
//! over the screen.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{enable_raw_mode, EnterAlternateScreen},
};
use log::info;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use tusers::application::App;
use tusers::infrastructure::{Config, HttpUserRepository};
use tusers::presentation::{install_panic_hook, render_ui, restore_terminal, InputHandler};

const TICK: Duration = Duration::from_millis(100);

#[derive(Debug, Parser)]
#[command(name = "tusers", version, about = "Browse users from a JSON API in the terminal")]
struct Cli {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// API root, overrides the config file and TUSERS_BASE_URL
    #[arg(long)]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Start idle instead of fetching immediately
    #[arg(long)]
    no_autoload: bool,
}

/// Entry point for the tusers terminal user directory.
///
/// Resolves configuration, sets up the terminal interface and runs the main
/// event loop until the user quits.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the HTTP client cannot
/// be built, or terminal setup fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_overrides(cli.base_url, cli.timeout);
    config.validate()?;
    info!("using {} (timeout {}s)", config.base_url, config.request_timeout_secs);

    install_panic_hook();
    let repository = HttpUserRepository::new(&config)?;
    let source = repository.base_url().to_string();
    let mut app = App::from_repository(Arc::new(repository)).with_source(source);
    if !cli.no_autoload {
        app.load();
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    restore_terminal()?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

/// Main application event loop.
///
/// Redraws, waits up to one tick for a key press, then applies any fetch
/// state published in the meantime. Runs until the app is asked to quit.
///
/// # Errors
///
/// Returns an IO error if terminal operations fail.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| render_ui(f, app))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    InputHandler::handle_key_event(app, key.code, key.modifiers);
                }
            }
        }

        app.poll_updates();
        if app.should_quit {
            return Ok(());
        }
    }
}
