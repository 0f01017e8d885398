//! PaperTrade TUI — step through a stock's history one day at a time and
//! trade at each day's close.
//!
//! Screen: metrics header, candlestick window with the current day
//! highlighted, trade form, trade history, cumulative return curve.
//!
//! Config is read from `<config dir>/papertrade/config.toml` when present.
//! Logs go to `<cache dir>/papertrade/papertrade-tui.log`; set `RUST_LOG` to
//! change the level.

mod app;
mod input;
mod theme;
mod ui;

use std::fs::File;
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

use papertrade_core::data::StockLibrary;
use papertrade_core::SimConfig;

use crate::app::AppState;

fn main() -> Result<()> {
    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    // Paths
    let app_dir = |base: Option<PathBuf>| {
        base.unwrap_or_else(|| PathBuf::from("."))
            .join("papertrade")
    };
    let config_path = app_dir(dirs::config_dir()).join("config.toml");
    let log_path = app_dir(dirs::cache_dir()).join("papertrade-tui.log");

    init_logging(&log_path)?;

    let config = if config_path.is_file() {
        SimConfig::from_file(&config_path)?
    } else {
        SimConfig::default()
    };
    tracing::info!(data_dir = %config.data.dir.display(), "starting");

    let library = StockLibrary::open(&config.data.dir)?;
    let mut app = AppState::new(library, config);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("exiting");
    result
}

fn init_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log dir: {}", parent.display()))?;
    }
    let file = File::create(path)
        .with_context(|| format!("failed to create log file: {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        // 3. Check quit
        if !app.running {
            break;
        }
    }
    Ok(())
}
