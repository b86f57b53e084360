//! Microform TUI - a contact form built from independent widgets
//!
//! A Ratatui-based TUI where each field is its own component and all of
//! them share one reactive store. The country field is a retained-mode
//! island mounted through an adapter.

mod app;
mod backend;
mod config;
mod keymap;
mod state;
mod ui;

use anyhow::Result;
use app::App;
use backend::SimulatedBackend;
use config::FormConfig;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::{self, File};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let loaded = FormConfig::load();
    let config = loaded.as_ref().cloned().unwrap_or_default();
    init_logging(&config);
    if let Err(err) = &loaded {
        tracing::warn!(error = %err, "could not read config, using defaults");
    }
    tracing::info!(?config, "starting microform");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app and run
    let backend = SimulatedBackend::from_config(&config);
    let submit_delay = backend.delay();
    let result = match App::new(Arc::new(backend), submit_delay) {
        Ok(mut app) => run_app(&mut terminal, &mut app, config.tick_rate()).await,
        Err(err) => Err(err),
    };

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Handle any errors
    if let Err(err) = result {
        tracing::error!(error = ?err, "microform exited with an error");
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }

    Ok(())
}

/// Log to a file under the data dir; the terminal belongs to the UI
fn init_logging(config: &FormConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.log_filter()));

    let Some(path) = FormConfig::log_path() else {
        return;
    };
    if let Some(dir) = path.parent() {
        if fs::create_dir_all(dir).is_err() {
            return;
        }
    }
    let Ok(file) = File::options().create(true).append(true).open(&path) else {
        return;
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    tick_rate: Duration,
) -> Result<()> {
    loop {
        // Remount islands if their inputs changed, then apply finished submissions
        app.sync_islands()?;
        app.poll_submissions();

        // Draw the UI
        terminal.draw(|frame| ui::draw(frame, app))?;

        // Let spawned submissions make progress between frames
        tokio::task::yield_now().await;

        // Handle crossterm events
        if event::poll(tick_rate)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key)?;
                }
                Event::Resize(_width, _height) => {
                    // Island containers are resized on the next draw
                }
                _ => {}
            }
        }

        // Check if app wants to quit
        if app.should_quit() {
            return Ok(());
        }
    }
}
