// Binary includes library modules - some public API items are only for library consumers
#![allow(unused)]

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod app;
mod config;
mod data;
mod events;
mod install;
mod source;
mod ui;

use app::{App, View};
use config::Settings;
use data::{History, Sample, Window, TIMESTAMP_FORMAT};
use install::Installer;
use source::{append_sample, ChannelSource, LogReader, Pollers, Sampler};

#[derive(Parser, Debug)]
#[command(name = "thermwatch")]
#[command(about = "Log CPU temperature and watch it in a terminal dashboard")]
struct Args {
    /// Settings file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sample log to read and write (overrides the settings file)
    #[arg(short, long)]
    log: Option<PathBuf>,

    /// Poll interval in seconds (overrides the settings file)
    #[arg(short, long)]
    refresh: Option<u64>,

    /// Time range for the graph and for --export (1h, 6h, 24h, 7d, all)
    #[arg(long, default_value = "1h")]
    range: Window,

    /// Write diagnostics to this file while the dashboard is running
    #[arg(long)]
    trace_file: Option<PathBuf>,

    /// Install the logging script and cron entry, then exit
    #[arg(long, conflicts_with_all = ["status", "record", "export"])]
    install: bool,

    /// Print the logging status and exit
    #[arg(long, conflicts_with_all = ["install", "record", "export"])]
    status: bool,

    /// Take one reading, append it to the log and exit
    #[arg(long, conflicts_with_all = ["install", "status", "export"])]
    record: bool,

    /// Export readings in --range to a JSON file and exit
    #[arg(short, long, conflicts_with_all = ["install", "status", "record"])]
    export: Option<PathBuf>,
}

impl Args {
    fn one_shot(&self) -> bool {
        self.install || self.status || self.record || self.export.is_some()
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // The dashboard owns the terminal, so it only logs to a file
    init_tracing(args.trace_file.as_deref(), args.one_shot())?;

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(ref log) = args.log {
        settings.log_path = log.clone();
    }
    if let Some(refresh) = args.refresh {
        settings.refresh_secs = refresh;
    }
    tracing::debug!(?settings, "loaded settings");

    if args.install {
        return run_install(&settings);
    }
    if args.status {
        return print_status(&settings);
    }
    if args.record {
        return record(&settings);
    }
    if let Some(ref export_path) = args.export {
        return export_to_file(&settings, args.range, export_path);
    }

    run_tui(&settings, args.range)
}

fn init_tracing(trace_file: Option<&Path>, to_stderr: bool) -> Result<()> {
    let file_layer = match trace_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };
    let stderr_layer = to_stderr.then(|| fmt::layer().with_writer(io::stderr));

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "thermwatch=info".into()))
        .with(stderr_layer)
        .with(file_layer)
        .init();
    Ok(())
}

/// Install logging and take the first sample
fn run_install(settings: &Settings) -> Result<()> {
    let installer = Installer::from_settings(settings);
    installer.install()?;
    let rt = tokio::runtime::Runtime::new()?;
    if let Err(e) = rt.block_on(installer.run_once()) {
        tracing::warn!("first logging run failed: {:#}", e);
    }
    print_status(settings)
}

fn print_status(settings: &Settings) -> Result<()> {
    let status = LogReader::from_settings(settings).read()?;
    let present = |ok: bool| if ok { "present" } else { "missing" };

    println!(
        "Logging: {}",
        if status.is_installed() { "Active" } else { "Not Installed" }
    );
    println!(
        "  script: {} ({})",
        settings.script_path.display(),
        present(status.install.script)
    );
    println!(
        "  cron:   {} ({})",
        settings.cron_path.display(),
        present(status.install.cron)
    );
    println!(
        "  log:    {} ({})",
        settings.log_path.display(),
        present(status.install.log)
    );

    if let Some(last) = status.last_reading() {
        println!("Last reading: {}", last.timestamp.format(TIMESTAMP_FORMAT));
        println!("Temperature: {:.1}°C", last.secondary);
    }
    println!("Total readings: {}", status.len());
    Ok(())
}

/// Sample both sensors once and append the result to the log
fn record(settings: &Settings) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    let reading = rt.block_on(Sampler::from_settings(settings).sample())?;

    let sample = Sample::new(
        chrono::Local::now().naive_local(),
        reading.primary,
        reading.secondary,
    );
    append_sample(&settings.log_path, &sample)?;
    tracing::info!("recorded {}", sample);
    println!("{}", sample);
    Ok(())
}

/// Export the readings inside `window` to a JSON file
fn export_to_file(settings: &Settings, window: Window, export_path: &Path) -> Result<()> {
    let status = LogReader::from_settings(settings).read()?;
    let history = History::new(&status.samples, window, chrono::Local::now().naive_local());

    let json = serde_json::to_string_pretty(&history.to_json())?;
    std::fs::write(export_path, json)
        .with_context(|| format!("Failed to write {}", export_path.display()))?;

    println!(
        "Exported {} of {} readings to: {}",
        history.shown(),
        history.total(),
        export_path.display()
    );
    Ok(())
}

/// Run the dashboard with both pollers feeding a channel source
fn run_tui(settings: &Settings, window: Window) -> Result<()> {
    // Build a tokio runtime for the pollers
    let rt = tokio::runtime::Runtime::new()?;
    // Entered for the whole session so the dashboard can spawn work too
    let _guard = rt.enter();
    let (publishers, source) = ChannelSource::create(&settings.log_path.display().to_string());
    let pollers = Pollers::spawn(settings, publishers);

    let theme = ui::Theme::auto_detect();
    let app = App::new(
        Box::new(source),
        Installer::from_settings(settings),
        settings.thresholds,
        window,
        theme,
    );

    // Run the TUI in the main thread while the pollers run in the background
    let result = run_terminal(app);

    // Signal shutdown
    pollers.abort();

    result
}

fn run_terminal(mut app: App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    app.reload_data();

    // Run the main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 14;

    while app.running {
        // Draw UI
        terminal.draw(|frame| {
            let area = frame.area();

            // Check for minimum terminal size
            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let centered = ratatui::layout::Rect::new(
                    0,
                    (area.height / 2).saturating_sub(2),
                    area.width,
                    5.min(area.height),
                );
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(10),   // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::common::render_tabs(frame, app, chunks[1]);

            match app.current_view {
                View::Status => ui::status::render(frame, app, chunks[2]),
                View::Graph => ui::graph::render(frame, app, chunks[2]),
            }

            ui::common::render_status_bar(frame, app, chunks[3]);

            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse),
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }

        // Pick up whatever the pollers published meanwhile
        app.reload_data();
    }

    Ok(())
}
