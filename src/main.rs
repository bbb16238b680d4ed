use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};
use tracing::{error, info};

use hwwatch::{events, logging, ui, App, Settings, SnapshotReader, TelemetryFeed, TelemetryReader};

#[derive(Parser, Debug)]
#[command(name = "hwwatch")]
#[command(about = "Live terminal view of hardware telemetry written by a sensor daemon")]
struct Args {
    /// Telemetry file to watch (overrides feed.telemetry_file)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Config file (default: hwwatch.toml in the working directory, if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log file (overrides log.file)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log filter, e.g. "info" or "hwwatch=trace" (overrides log.level)
    #[arg(long)]
    log_level: Option<String>,

    /// Read the file once, print the snapshot as JSON and exit
    #[arg(long)]
    dump: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref()).context("failed to load settings")?;
    if let Some(file) = args.file {
        settings.feed.telemetry_file = file;
    }
    if let Some(log_file) = args.log_file {
        settings.log.file = Some(log_file);
    }
    if let Some(level) = args.log_level {
        settings.log.level = level;
    }

    logging::init(&settings.log, args.dump)?;

    if args.dump {
        return dump(&settings);
    }

    let mut feed = TelemetryFeed::open(&settings.feed).context("failed to open telemetry feed")?;
    if let Err(e) = feed.start_monitoring() {
        error!("Failed to start monitoring: {}", e);
        let _ = feed.dispose();
        return Err(anyhow::Error::new(e).context("failed to start monitoring"));
    }

    let app = App::new(Box::new(feed.subscribe())).with_stats(feed.stats());
    let result = run_tui(app);

    feed.dispose().context("failed to dispose telemetry feed")?;
    result
}

/// Print one parsed snapshot as JSON
fn dump(settings: &Settings) -> Result<()> {
    let mut reader = TelemetryReader::new(&settings.feed.telemetry_file);
    let snapshot = reader
        .read()
        .with_context(|| format!("failed to read {}", reader.path().display()))?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

/// Run the TUI until the user quits or the feed fails
fn run_tui(mut app: App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to log the panic and restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        logging::log_panic(panic);
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    info!("Watching {}", app.source_description());
    let _ = app.reload_data();

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result?;
    if let Some(err) = app.load_error {
        bail!("telemetry feed stopped: {}", err);
    }
    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    while app.running {
        terminal.draw(|frame| {
            let area = frame.area();

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Min(3),    // Readings
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::readings::render(frame, app, chunks[1]);
            ui::common::render_status_bar(frame, app, chunks[2]);

            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        if let Some(Event::Key(key)) = events::poll_event(Duration::from_millis(100))? {
            events::handle_key_event(app, key);
        }

        // Merge whatever the publisher has sent since the last tick
        app.reload_data()?;
    }

    Ok(())
}
