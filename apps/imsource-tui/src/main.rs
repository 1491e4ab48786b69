//! Imsource TUI - Source list console
//!
//! Terminal UI for managing sources, pins, aliases and the recycle bin.

mod app;
mod keybindings;
mod mode;
mod widgets;

use std::fs::{self, OpenOptions};
use std::io;
use std::sync::Mutex;

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use imsource_core::{ImsourceConfig, JsonStorage, Logic};

use app::App;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ImsourceConfig::load_standard()?;

    // Log to a file; the terminal belongs to the UI
    fs::create_dir_all(&config.data_dir)?;
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_path())?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();
    tracing::info!(data_dir = ?config.data_dir, "starting imsource");

    let logic = Logic::new(JsonStorage::new(&config));
    let mut app = App::new(logic);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Quitting with `exit` already saved; this covers fatal errors
    if let Err(err) = app.shutdown() {
        tracing::error!("Failed to save pinned count: {}", err);
    }

    if let Err(err) = res {
        tracing::error!("imsource stopped: {}", err);
        eprintln!("Error: {err}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App<JsonStorage>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|f| app.render(f))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press && app.handle_key(key.code, key.modifiers)? {
                return Ok(());
            }
        }
    }
}
