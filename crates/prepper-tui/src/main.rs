//! Prepper TUI - ML Interview Prepper terminal client
//!
//! Signs the local user in, keeps the idle-session countdown running while
//! they interact with the terminal and signs them out after 15 minutes of
//! inactivity, warning two minutes before.

use std::fs::{self, OpenOptions};
use std::io;
use std::panic;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use prepper_core::{
    ChallengeHistory, ChallengeKind, Clock, FileStore, KeyValueStore, SessionController, SessionDriver,
    SystemClock, UserStats,
};
use prepper_tui::app::{App, ClientConfig};
use prepper_tui::identity::{ChannelNavigator, LocalIdentity};
use prepper_tui::report;

#[derive(Parser)]
#[command(name = "prepper-tui")]
#[command(about = "ML Interview Prepper terminal client")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to ~/.config/ml-prepper/config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Key-value store file holding the session clock
    #[arg(long)]
    store: Option<PathBuf>,

    /// Make every identity sign-out report a revoke failure
    #[arg(long)]
    fail_revoke: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the remaining session time from the store
    Status,

    /// Print statistics for a challenge history JSON file
    Stats {
        /// Body of a `/challenges/history` response
        history: PathBuf,

        /// Only count one kind of challenge (interview or scenario)
        #[arg(long)]
        kind: Option<ChallengeKind>,
    },
}

/// Application entry point with panic handling for terminal restoration
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => ClientConfig::load_from(path),
        None => ClientConfig::load(),
    };
    let (mut config, config_error) = match loaded {
        Ok(config) => (config, None),
        Err(e) => (ClientConfig::default(), Some(e)),
    };
    if let Some(store) = &cli.store {
        config.store_path = Some(store.clone());
    }

    init_logging(&config)?;
    if let Some(e) = config_error {
        tracing::warn!("Using default configuration: {}", e);
    }

    match cli.command {
        Some(Commands::Status) => {
            let store = FileStore::new(config.resolved_store_path())?;
            for line in report::status_lines(&store, &SystemClock) {
                println!("{}", line);
            }
            Ok(())
        }
        Some(Commands::Stats { history, kind }) => {
            let body = fs::read_to_string(&history)
                .with_context(|| format!("reading {}", history.display()))?;
            let mut history = ChallengeHistory::from_json(&body)?;
            if let Some(kind) = kind {
                history = history.of_kind(kind);
            }
            let stats = UserStats::from_history(&history);
            for line in report::stats_lines(&stats) {
                println!("{}", line);
            }
            Ok(())
        }
        None => {
            // Set up panic hook to restore terminal on crash
            let original_hook = panic::take_hook();
            panic::set_hook(Box::new(move |panic_info| {
                let _ = disable_raw_mode();
                let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
                original_hook(panic_info);
            }));

            let result = run_app(&config, cli.fail_revoke).await;

            if let Err(e) = &result {
                tracing::error!("Application error: {}", e);
            }
            result
        }
    }
}

/// Log to a file next to the config; the terminal belongs to the UI
fn init_logging(config: &ClientConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .context("invalid log filter")?;

    let Some(path) = ClientConfig::log_file_path() else {
        tracing_subscriber::registry().with(filter).init();
        return Ok(());
    };

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(filter)
        .init();

    Ok(())
}

/// Main application runner
async fn run_app(config: &ClientConfig, fail_revoke: bool) -> Result<()> {
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(config.resolved_store_path())?);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let identity = Arc::new(LocalIdentity::new(Arc::clone(&store), fail_revoke));
    let (navigator, routes) = ChannelNavigator::new();

    let controller = SessionController::new(
        Arc::clone(&clock),
        Arc::clone(&store),
        identity.clone(),
        Arc::new(navigator),
    )
    .with_landing_route(config.landing_route.clone());
    let (handle, driver) = SessionDriver::new(controller);

    let mut app = App::new(handle, identity, Arc::clone(&store), clock, routes, config);
    let driver_task = tokio::spawn(driver.run());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Closing the last handle stops the driver
    drop(app);
    if let Err(e) = driver_task.await {
        tracing::error!("Session driver failed: {}", e);
    }

    result
}
