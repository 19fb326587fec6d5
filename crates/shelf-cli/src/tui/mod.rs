//! shelf TUI
//!
//! Terminal user interface for browsing the book catalog.
//!
//! ## Layout
//!
//! - Top: search bar, sort selector and result count
//! - Middle: book cards, newest first until a sort is chosen
//! - Bottom: status bar
//!
//! Opening a card draws the detail overlay on top of everything else.
//!
//! ## Keys
//!
//! - j/k or ↑/↓: Move between cards (scroll the overlay while it is open)
//! - gg / G: First / last card
//! - /: Edit the search text (Enter keeps it, Esc clears it)
//! - s / S: Next / previous sort order
//! - Enter: Open the selected card
//! - Esc or x: Close the overlay
//! - w / g: Open the WorldCat / Google Books link from the overlay
//! - ?: Help
//! - q: Quit

mod app;
mod ui;

use std::fs::File;
use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use shelf_core::loader::{self, DataSource};
use shelf_core::{Config, LoadError, Record};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::{App, InputMode, OutboundLink};

/// Redraw and timer resolution
const FRAME: Duration = Duration::from_millis(16);

/// Run the TUI application
pub async fn run(config: Config) -> Result<()> {
    // Initialize TUI logging (file-based, only if SHELF_LOG is set)
    init_tui_logging(&config);

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut app = App::new(&config);
    let load_rx = spawn_load(&config, &mut app);

    let result = run_app(&mut terminal, &mut app, load_rx).await;

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

/// Start fetching the dataset in the background
fn spawn_load(
    config: &Config,
    app: &mut App,
) -> mpsc::Receiver<Result<Vec<Record>, LoadError>> {
    let (tx, rx) = mpsc::channel(1);
    app.catalog.begin_load();

    match DataSource::from_config(config) {
        Ok(source) => {
            info!("Loading dataset from {}", source);
            tokio::spawn(async move {
                let result = loader::load(&source).await;
                let _ = tx.send(result).await;
            });
        }
        Err(e) => {
            // Report through the same path as a failed fetch
            let _ = tx.try_send(Err(e));
        }
    }

    rx
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    mut load_rx: mpsc::Receiver<Result<Vec<Record>, LoadError>>,
) -> Result<()> {
    let mut loading = true;

    loop {
        app.tick(Instant::now());

        // Draw UI
        terminal.draw(|frame| ui::draw(frame, app))?;

        tokio::select! {
            biased;

            // Dataset arrives once
            loaded = async {
                if loading {
                    load_rx.recv().await
                } else {
                    std::future::pending::<Option<Result<Vec<Record>, LoadError>>>().await
                }
            } => {
                loading = false;
                if let Some(result) = loaded {
                    app.catalog.finish_load(result, Instant::now());
                }
            }

            _ = tokio::time::sleep(FRAME) => {
                // Check for terminal events (non-blocking)
                if event::poll(Duration::from_millis(0))? {
                    if let Event::Key(key) = event::read()? {
                        // Only handle key press events (not release)
                        if key.kind != KeyEventKind::Press {
                            continue;
                        }

                        // If help is showing, any key dismisses it
                        if app.show_help {
                            app.show_help = false;
                            continue;
                        }

                        match app.input_mode {
                            InputMode::Normal => handle_normal_mode(app, key.code, key.modifiers),
                            InputMode::Search => handle_search_mode(app, key.code, key.modifiers),
                        }
                    }
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Handle key events in normal mode
fn handle_normal_mode(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    // Clear status message on navigation keys
    if matches!(
        code,
        KeyCode::Char('j')
            | KeyCode::Char('k')
            | KeyCode::Up
            | KeyCode::Down
            | KeyCode::Char('G')
    ) {
        app.status_message = None;
    }

    if app.catalog.escape_armed() {
        handle_overlay_keys(app, code, modifiers);
        return;
    }

    match code {
        // Quit
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }

        // Navigation
        KeyCode::Char('k') | KeyCode::Up => {
            app.move_up();
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.move_down();
        }

        // gg: jump to first
        KeyCode::Char('g') => {
            if app.pending_g.take().is_some() {
                app.move_to_first();
            } else {
                app.pending_g = Some(app.now);
            }
        }
        // G: jump to last
        KeyCode::Char('G') => {
            app.move_to_last();
        }

        KeyCode::Enter => {
            app.open_selected();
        }

        // Search
        KeyCode::Char('/') => {
            app.enter_search_mode();
        }
        // Esc outside the overlay clears an active search
        KeyCode::Esc => {
            if !app.search_input.is_empty() {
                app.clear_search();
            }
        }

        // Sort
        KeyCode::Char('s') => {
            app.next_sort();
        }
        KeyCode::Char('S') => {
            app.prev_sort();
        }

        // Help
        KeyCode::Char('?') => {
            app.toggle_help();
        }

        _ => {}
    }
}

/// Keys while the detail overlay is open; the card list underneath is locked
fn handle_overlay_keys(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    match code {
        KeyCode::Esc | KeyCode::Char('x') => {
            app.close_overlay();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.move_up();
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.move_down();
        }
        KeyCode::Char('w') => {
            app.open_link(OutboundLink::Catalog);
        }
        KeyCode::Char('g') => {
            app.open_link(OutboundLink::WebSearch);
        }
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }
        KeyCode::Char('?') => {
            app.toggle_help();
        }
        _ => {}
    }
}

/// Handle key events while editing the search text
fn handle_search_mode(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    match code {
        KeyCode::Enter => {
            app.exit_search_mode();
        }
        KeyCode::Esc => {
            app.clear_search();
            app.exit_search_mode();
        }
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }
        KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.clear_search();
        }
        KeyCode::Char(c) => {
            app.insert_char(c);
        }
        KeyCode::Backspace => {
            app.delete_char();
        }
        KeyCode::Left => {
            app.cursor_left();
        }
        KeyCode::Right => {
            app.cursor_right();
        }
        _ => {}
    }
}

/// Initialize file-based logging for TUI mode
///
/// Only initializes if SHELF_LOG environment variable is set.
/// Logs are written to data_dir/debug.log unless log_file is configured.
fn init_tui_logging(config: &Config) {
    let Ok(log_level) = std::env::var("SHELF_LOG") else {
        return;
    };

    if let Err(e) = config.ensure_data_dir() {
        eprintln!("Warning: Could not create data directory: {}", e);
        return;
    }

    let log_path = config.log_path();
    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!("shelf_core={},shelf={}", log_level, log_level));

    // Initialize file-based logging (ignore error if already initialized)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("TUI logging initialized to {:?}", log_path);
}
