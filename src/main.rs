//! `VizDeck` - terminal slide presenter with interactive diagrams.

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::{
    io, panic,
    time::{Duration, Instant},
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use vizdeck::{app::App, config::Config, deck::Deck, ui};

// Helper function to ensure the terminal is cleaned up on exit
fn cleanup_terminal<B: Backend + std::io::Write>(terminal: &mut Terminal<B>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Log to `<log_dir>/vizdeck.log`; stderr belongs to the terminal UI.
fn setup_logging(config: &Config) -> Result<Option<WorkerGuard>> {
    let Some(log_dir) = &config.log_dir else {
        return Ok(None);
    };
    fs_err::create_dir_all(log_dir)?;

    let file_appender = tracing_appender::rolling::never(log_dir, "vizdeck.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer().with_writer(non_blocking_file).with_ansi(false);

    tracing_subscriber::registry().with(env_filter).with(file_layer).try_init()?;

    tracing::info!("{} {} starting", config.app_name(), config.app_version());
    tracing::info!("Log file: {}/vizdeck.log", log_dir.display());
    Ok(Some(guard))
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut config = Config::load()?;
    if let Some(path) = std::env::args().nth(1) {
        config = config.with_deck_path(&path);
    }

    let _guard = setup_logging(&config)?;

    // Deck errors are reported before the terminal switches screens
    let deck = Deck::load(&config.deck_path)
        .and_then(|deck| deck.with_overrides(config.start_slide, config.timed_slide))
        .with_context(|| format!("Could not open deck {}", config.deck_path.display()))?;

    // Setup better panic handling that cleans up terminal first
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // First disable raw mode
        let _ = disable_raw_mode();
        // Try to restore terminal to normal state
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen, DisableMouseCapture);
        // Call the original panic handler
        original_hook(panic_info);
    }));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let poll = Duration::from_millis(config.poll_ms);
    let mut app = App::new(deck, config);
    app.start_loading();
    let res = run_app(&mut terminal, app, poll).await;

    // Restore terminal
    if let Err(e) = cleanup_terminal(&mut terminal) {
        eprintln!("Error cleaning up terminal: {e:?}");
    }

    if let Err(err) = res {
        tracing::error!("{err:?}");
        eprintln!("{err:?}");
    }

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App, poll: Duration) -> Result<()> {
    loop {
        app.handle_updates(); // Handle async updates first
        app.tick(Instant::now());

        terminal.draw(|f| ui::draw(f, &mut app))?;

        if event::poll(poll)? {
            match event::read()? {
                event::Event::Key(key) => app.handle_key(key),
                event::Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        } else {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        if app.should_quit() {
            break;
        }
    }
    tracing::info!("Presenter closed");
    Ok(())
}
