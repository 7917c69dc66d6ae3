//! Periodic pollers feeding a [`ChannelSource`](super::ChannelSource).
//!
//! Two independent tasks run on the same period:
//!
//! - the reading poller samples both sensors
//! - the logging poller checks the install state and reads the log tail
//!
//! Each publishes to its own channel. A slow poll is never cancelled; the
//! next result simply replaces it once it completes.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use super::channel::{PollResult, Publishers};
use super::log::LogReader;
use super::sampler::Sampler;
use crate::config::Settings;
use crate::data::{LoggingStatus, Reading};

/// Handles to the running poller tasks.
#[derive(Debug)]
pub struct Pollers {
    handles: Vec<JoinHandle<()>>,
}

impl Pollers {
    /// Spawn both pollers on the current tokio runtime.
    pub fn spawn(settings: &Settings, publishers: Publishers) -> Self {
        let period = settings.refresh_interval();
        let Publishers {
            readings,
            logging,
            refresh,
        } = publishers;

        let sampler = Sampler::from_settings(settings);
        let reader = LogReader::from_settings(settings);

        let handles = vec![
            tokio::spawn(poll_readings(sampler, readings, refresh.clone(), period)),
            tokio::spawn(poll_logging(reader, logging, refresh, period)),
        ];
        Self { handles }
    }

    /// Stop both pollers.
    pub fn abort(&self) {
        for handle in &self.handles {
            handle.abort();
        }
    }
}

/// Wait for the next tick or an early refresh request.
async fn wait(ticker: &mut tokio::time::Interval, refresh: &Notify) {
    tokio::select! {
        _ = ticker.tick() => {}
        _ = refresh.notified() => {}
    }
}

async fn poll_readings(
    sampler: Sampler,
    tx: watch::Sender<PollResult<Reading>>,
    refresh: Arc<Notify>,
    period: Duration,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        wait(&mut ticker, &refresh).await;

        let result = sampler.sample().await.map_err(|e| format!("{:#}", e));
        if let Err(ref e) = result {
            tracing::warn!("temperature poll failed: {}", e);
        }
        if tx.send(Some(result)).is_err() {
            // Dashboard is gone
            break;
        }
    }
}

async fn poll_logging(
    mut reader: LogReader,
    tx: watch::Sender<PollResult<LoggingStatus>>,
    refresh: Arc<Notify>,
    period: Duration,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        wait(&mut ticker, &refresh).await;

        let result = match reader.poll() {
            Some(status) => Ok(status),
            None => match reader.error() {
                Some(e) => {
                    tracing::warn!("log poll failed: {}", e);
                    Err(e.to_string())
                }
                // unchanged since the last poll
                None => continue,
            },
        };
        if tx.send(Some(result)).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::LOG_HEADER;
    use crate::source::{ChannelSource, DataSource, Update};
    use std::fs;
    use tempfile::TempDir;

    async fn next_update(source: &mut ChannelSource) -> Option<Update> {
        for _ in 0..200 {
            if let Some(update) = source.poll() {
                return Some(update);
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        None
    }

    #[tokio::test]
    async fn test_pollers_publish_both_results() {
        let dir = TempDir::new().unwrap();
        let zone = dir.path().join("temp");
        fs::write(&zone, "44000\n").unwrap();
        let log = dir.path().join("temperature.log");
        fs::write(&log, format!("{}\n2024-01-01 00:00:00,45.0,42.3\n", LOG_HEADER)).unwrap();

        let settings = Settings {
            log_path: log,
            script_path: dir.path().join("temp_logger.sh"),
            cron_path: dir.path().join("temperature-logger"),
            thermal_zone: zone,
            sensors_command: Vec::new(),
            ..Settings::default()
        };

        let (publishers, mut source) = ChannelSource::create("test");
        let pollers = Pollers::spawn(&settings, publishers);

        let mut reading = None;
        let mut logging = None;
        while reading.is_none() || logging.is_none() {
            match next_update(&mut source).await.expect("poller produced nothing") {
                Update::Reading(r) => reading = Some(r),
                Update::Logging(l) => logging = Some(l),
            }
        }
        pollers.abort();

        let reading = reading.unwrap();
        assert_eq!(reading.primary, None);
        assert_eq!(reading.secondary, 44.0);

        let logging = logging.unwrap();
        assert!(logging.log_exists());
        assert!(!logging.is_installed());
        assert_eq!(logging.len(), 1);
    }

    #[tokio::test]
    async fn test_reading_failure_surfaces_as_error() {
        let dir = TempDir::new().unwrap();
        let settings = Settings {
            log_path: dir.path().join("temperature.log"),
            script_path: dir.path().join("temp_logger.sh"),
            cron_path: dir.path().join("temperature-logger"),
            thermal_zone: dir.path().join("missing"),
            sensors_command: Vec::new(),
            ..Settings::default()
        };

        let (publishers, mut source) = ChannelSource::create("test");
        let pollers = Pollers::spawn(&settings, publishers);

        // The logging poller still reports "not installed"
        let update = next_update(&mut source).await;
        assert!(matches!(update, Some(Update::Logging(_))));
        for _ in 0..200 {
            if source.error().is_some() {
                break;
            }
            source.poll();
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        pollers.abort();

        assert!(source.error().unwrap().contains("Failed to read"));
    }
}
