mod app;
mod config;
mod list;
mod netlog;
mod requests_view;
mod source_entry;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::App;
use config::Config;
use netlog::{reader, Input, ReaderEvent};

#[derive(Parser, Debug)]
#[command(name = "netlog-view")]
#[command(about = "Browse network log sources in the terminal")]
#[command(version)]
struct Cli {
    /// Net-log JSON lines file, or `-` for stdin
    #[arg(default_value = "-")]
    input: String,

    /// Config file path
    #[arg(long)]
    config: Option<String>,

    /// Keep reading after end of input
    #[arg(long, short)]
    follow: bool,

    /// Initial filter text
    #[arg(long)]
    filter: Option<String>,

    /// Log file path
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn default_log_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("netlog-view")
        .join("netlog-view.log")
}

/// The terminal belongs to the UI, so logs go to a file.
fn init_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    let file = File::create(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "netlog_view=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_file.clone().unwrap_or_else(default_log_path))?;

    // Load config
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| Config::default_path().to_string_lossy().into_owned());
    let config = Config::load(&config_path)?;
    let theme = config.resolve_theme()?;

    let input = Input::parse(&cli.input);
    let follow = cli.follow || config.behavior.follow;
    tracing::info!("Reading {} (follow: {})", input, follow);
    let records = reader::spawn(input, follow);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, theme, cli.filter.as_deref());

    // Run main loop
    let result = run_app(&mut terminal, &mut app, records).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        tracing::error!("{:#}", err);
    }
    result
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    mut records: mpsc::Receiver<ReaderEvent>,
) -> Result<()> {
    let max_per_frame = app.config().behavior.max_records_per_frame.max(1);

    loop {
        // Bounded so a large file cannot starve input handling.
        let mut batch = Vec::new();
        while batch.len() < max_per_frame {
            match records.try_recv() {
                Ok(event) => batch.push(event),
                Err(_) => break,
            }
        }
        if !batch.is_empty() {
            app.on_reader_events(batch)?;
        }

        terminal.draw(|f| ui::draw(f, app))?;

        if app.should_quit() {
            return Ok(());
        }

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => app.handle_key(&key),
                Event::Mouse(mouse) => app.handle_mouse(&mouse),
                _ => {}
            }
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}
