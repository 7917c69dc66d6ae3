//! Application state and navigation logic.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::NaiveDateTime;
use tokio::task::JoinHandle;

use crate::data::{History, Snapshot, Thresholds, Window};
use crate::install::Installer;
use crate::source::{DataSource, Update};
use crate::ui::Theme;

const HOSTNAME_PATH: &str = "/etc/hostname";

/// First line of a hostname file, if there is a non-empty one.
pub fn read_hostname(path: &Path) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    let name = content.lines().next()?.trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// The current view/tab in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Live temperature and logging state.
    Status,
    /// Logged history as a chart.
    Graph,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Status => View::Graph,
            View::Graph => View::Status,
        }
    }

    /// Cycle to the previous view. With two views this is the same as `next`.
    pub fn prev(self) -> Self {
        self.next()
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Status => "Current Status",
            View::Graph => "Temperature Graph",
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,

    // Data source
    source: Box<dyn DataSource>,
    pub snapshot: Snapshot,
    pub load_error: Option<String>,
    pub thresholds: Thresholds,

    // Graph
    pub window: Window,

    installer: Installer,
    // First logging run started from the dashboard
    first_run: Option<JoinHandle<()>>,

    // UI
    pub theme: Theme,
    pub hostname: Option<String>,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App reading from `source`.
    pub fn new(
        source: Box<dyn DataSource>,
        installer: Installer,
        thresholds: Thresholds,
        window: Window,
        theme: Theme,
    ) -> Self {
        Self {
            running: true,
            current_view: View::Status,
            show_help: false,
            source,
            snapshot: Snapshot::default(),
            load_error: None,
            thresholds,
            window,
            installer,
            first_run: None,
            theme,
            hostname: read_hostname(Path::new(HOSTNAME_PATH)),
            status_message: None,
        }
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Apply every pending update from the data source.
    ///
    /// Each update replaces the snapshot as a whole. Returns true if anything
    /// changed.
    pub fn reload_data(&mut self) -> bool {
        if self.first_run.as_ref().is_some_and(|run| run.is_finished()) {
            self.first_run = None;
            self.source.refresh();
        }

        let mut changed = false;
        while let Some(update) = self.source.poll() {
            self.snapshot = match update {
                Update::Reading(reading) => self.snapshot.with_reading(reading),
                Update::Logging(logging) => self.snapshot.with_logging(logging),
            };
            changed = true;
        }
        self.load_error = self.source.error().map(str::to_string);
        changed
    }

    /// Ask the pollers for fresh data now.
    pub fn refresh(&mut self) {
        self.source.refresh();
        self.set_status_message("Refreshing...".to_string());
    }

    /// Switch to the next view.
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    /// Widen the graph's time range (wraps around to 1h after "all").
    pub fn next_window(&mut self) {
        self.window = self.window.next();
    }

    pub fn prev_window(&mut self) {
        self.window = self.window.prev();
    }

    /// Logged samples inside the selected window.
    pub fn history_at(&self, now: NaiveDateTime) -> History<'_> {
        History::new(&self.snapshot.logging.samples, self.window, now)
    }

    /// Logged samples inside the selected window, relative to local time.
    pub fn history(&self) -> History<'_> {
        self.history_at(chrono::Local::now().naive_local())
    }

    /// Install temperature logging if it isn't installed yet.
    pub fn install(&mut self) {
        if self.snapshot.logging.is_installed() {
            self.set_status_message("Logging is already installed".to_string());
            return;
        }

        match self.installer.install() {
            Ok(_) => {
                self.start_first_run();
                self.set_status_message("Temperature logging installed".to_string());
            }
            Err(e) => {
                tracing::error!("install failed: {:#}", e);
                self.set_status_message(format!("Install failed: {:#}", e));
            }
        }
        self.source.refresh();
    }

    /// Run the logging script once in the background so the log gets its
    /// first sample without waiting for cron.
    fn start_first_run(&mut self) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("no async runtime, leaving the first sample to cron");
            return;
        };
        let installer = self.installer.clone();
        self.first_run = Some(handle.spawn(async move {
            if let Err(e) = installer.run_once().await {
                tracing::warn!("first logging run failed: {:#}", e);
            }
        }));
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the samples in the selected window to a JSON file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        let history = self.history();
        if history.total() == 0 {
            anyhow::bail!("No data to export");
        }

        let json = serde_json::to_string_pretty(&history.to_json())?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::data::{parse_log, InstallStatus, LoggingStatus, Reading};
    use crate::source::ChannelSource;
    use tempfile::TempDir;

    fn app_with(dir: &TempDir) -> (crate::source::Publishers, App) {
        let settings = Settings {
            log_path: dir.path().join("temperature.log"),
            script_path: dir.path().join("temp_logger.sh"),
            cron_path: dir.path().join("temperature-logger"),
            ..Settings::default()
        };
        let (publishers, source) = ChannelSource::create("test");
        let app = App::new(
            Box::new(source),
            Installer::from_settings(&settings),
            Thresholds::default(),
            Window::default(),
            Theme::dark(),
        );
        (publishers, app)
    }

    fn logging(text: &str) -> LoggingStatus {
        LoggingStatus {
            install: InstallStatus {
                script: true,
                cron: true,
                log: true,
            },
            samples: parse_log(text),
        }
    }

    #[test]
    fn test_reload_applies_updates() {
        let dir = TempDir::new().unwrap();
        let (tx, mut app) = app_with(&dir);
        assert!(!app.reload_data());

        let reading = Reading {
            primary: Some(45.0),
            secondary: 42.0,
        };
        tx.readings.send(Some(Ok(reading))).unwrap();
        tx.logging.send(Some(Ok(logging("2024-01-01 00:00:00,45.0,42.3\n")))).unwrap();

        assert!(app.reload_data());
        assert_eq!(app.snapshot.reading, Some(reading));
        assert_eq!(app.snapshot.logging.len(), 1);
        assert!(app.load_error.is_none());
    }

    #[test]
    fn test_failed_poll_keeps_previous_state() {
        let dir = TempDir::new().unwrap();
        let (tx, mut app) = app_with(&dir);

        let reading = Reading {
            primary: None,
            secondary: 42.0,
        };
        tx.readings.send(Some(Ok(reading))).unwrap();
        app.reload_data();

        tx.readings.send(Some(Err("sensor read failed".to_string()))).unwrap();
        assert!(!app.reload_data());
        assert_eq!(app.snapshot.reading, Some(reading));
        assert_eq!(app.load_error.as_deref(), Some("sensor read failed"));
    }

    #[test]
    fn test_view_and_window_cycling() {
        let dir = TempDir::new().unwrap();
        let (_tx, mut app) = app_with(&dir);

        assert_eq!(app.current_view, View::Status);
        app.next_view();
        assert_eq!(app.current_view, View::Graph);
        app.prev_view();
        assert_eq!(app.current_view, View::Status);

        assert_eq!(app.window, Window::Hour);
        app.next_window();
        assert_eq!(app.window, Window::SixHours);
        app.prev_window();
        app.prev_window();
        assert_eq!(app.window, Window::All);
    }

    #[test]
    fn test_history_uses_selected_window() {
        let dir = TempDir::new().unwrap();
        let (tx, mut app) = app_with(&dir);
        tx.logging
            .send(Some(Ok(logging(
                "2024-01-01 00:00:00,45.0,42.3\n2024-01-01 11:30:00,,43.1\n",
            ))))
            .unwrap();
        app.reload_data();

        let now = NaiveDateTime::parse_from_str("2024-01-01 12:00:00", "%Y-%m-%d %H:%M:%S")
            .unwrap();
        assert_eq!(app.history_at(now).shown(), 1);
        app.window = Window::All;
        assert_eq!(app.history_at(now).shown(), 2);
    }

    #[tokio::test]
    async fn test_install_from_dashboard() {
        let dir = TempDir::new().unwrap();
        let (_tx, mut app) = app_with(&dir);

        app.install();
        assert!(dir.path().join("temp_logger.sh").is_file());
        assert!(dir.path().join("temperature-logger").is_file());
        assert!(dir.path().join("temperature.log").is_file());
        assert!(app.get_status_message().is_some());

        // The first run happens off the UI thread and is reaped by reload_data
        assert!(app.first_run.is_some());
        for _ in 0..500 {
            app.reload_data();
            if app.first_run.is_none() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(app.first_run.is_none());
    }

    #[test]
    fn test_install_without_runtime_skips_first_run() {
        let dir = TempDir::new().unwrap();
        let (_tx, mut app) = app_with(&dir);

        app.install();
        assert!(dir.path().join("temp_logger.sh").is_file());
        assert!(app.first_run.is_none());
    }

    #[test]
    fn test_read_hostname() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hostname");

        std::fs::write(&path, "  thermal-box \n").unwrap();
        assert_eq!(read_hostname(&path).as_deref(), Some("thermal-box"));

        std::fs::write(&path, "\n").unwrap();
        assert!(read_hostname(&path).is_none());

        assert!(read_hostname(&dir.path().join("missing")).is_none());
    }

    #[test]
    fn test_export_requires_data() {
        let dir = TempDir::new().unwrap();
        let (tx, mut app) = app_with(&dir);
        let path = dir.path().join("export.json");
        assert!(app.export_state(&path).is_err());

        tx.logging.send(Some(Ok(logging("2024-01-01 00:00:00,45.0,42.3\n")))).unwrap();
        app.reload_data();
        app.window = Window::All;
        app.export_state(&path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["window"], "all");
        assert_eq!(json["shown"], 1);
    }

    #[test]
    fn test_status_message_expires() {
        let dir = TempDir::new().unwrap();
        let (_tx, mut app) = app_with(&dir);
        app.set_status_message("hello".to_string());
        assert_eq!(app.get_status_message(), Some("hello"));

        app.status_message = Some(("old".to_string(), Instant::now() - Duration::from_secs(5)));
        assert!(app.get_status_message().is_none());
    }
}
