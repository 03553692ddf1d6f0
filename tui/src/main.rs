//! Clinical decision support client: interactive Ratatui TUI.
//!
//! The event loop runs on the main thread. Backend requests are spawned on a
//! tokio runtime and their results come back over a channel; each result is
//! handed to the page that issued it, which drops it if a newer request has
//! superseded it.
//!
//! Usage:
//!   cargo run -p cds-tui
//!   cargo run -p cds-tui -- path/to/config.toml

mod app;
mod ui;

use std::{
    fs::File,
    io,
    path::PathBuf,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::unbounded_channel;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cds_client::HttpClinicalApi;
use cds_config::ClientConfig;

use app::App;

/// Panel animation and redraw interval.
const TICK_MS: u64 = 150;

// ── Terminal setup / teardown ─────────────────────────────────────────────────

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}

/// Stdout belongs to the screen, so logs go to a file.
fn init_logging(config: &ClientConfig) -> io::Result<()> {
    let file = File::create(&config.logging.tui_log_file)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn other_error(e: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e.to_string())
}

// ── Main event loop ───────────────────────────────────────────────────────────

fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = ClientConfig::resolve(config_path.as_deref()).map_err(other_error)?;
    init_logging(&config)?;

    let api = Arc::new(HttpClinicalApi::from_config(&config).map_err(other_error)?);
    info!(base_url = %api.base_url(), "starting TUI");

    let runtime = tokio::runtime::Runtime::new()?;
    let (tx, mut rx) = unbounded_channel();
    let mut app = App::new(&config, api, runtime.handle().clone(), tx);

    // Restore the terminal before printing a panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let mut terminal = setup_terminal()?;
    app.start();

    let tick = Duration::from_millis(TICK_MS);
    let mut last_tick = Instant::now();

    while !app.should_quit {
        terminal.draw(|f| ui::ui(f, &app))?;

        let timeout = tick.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        while let Ok(message) = rx.try_recv() {
            app.apply(message);
        }

        if last_tick.elapsed() >= tick {
            app.tick();
            last_tick = Instant::now();
        }
    }

    restore_terminal(&mut terminal)?;
    info!("TUI closed");
    Ok(())
}
