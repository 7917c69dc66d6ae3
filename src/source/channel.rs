//! Channel-based data source.
//!
//! Receives poll results via tokio watch channels. Each poller owns one
//! channel, so a result only ever replaces the latest value from the same
//! poller.

use std::sync::Arc;

use tokio::sync::{watch, Notify};

use super::{DataSource, Update};
use crate::data::{LoggingStatus, Reading};

/// Outcome of one poll; errors are kept as display text.
pub type PollResult<T> = Option<Result<T, String>>;

/// Sending half of a [`ChannelSource`], handed to the pollers.
#[derive(Debug)]
pub struct Publishers {
    pub readings: watch::Sender<PollResult<Reading>>,
    pub logging: watch::Sender<PollResult<LoggingStatus>>,
    /// Woken when the UI asks for an early refresh.
    pub refresh: Arc<Notify>,
}

/// A data source that receives poll results via channels.
///
/// # Example
///
/// ```
/// use thermwatch::{ChannelSource, DataSource, Reading};
///
/// let (publishers, mut source) = ChannelSource::create("test");
/// publishers
///     .readings
///     .send(Some(Ok(Reading { primary: None, secondary: 42.0 })))
///     .unwrap();
/// assert!(source.poll().is_some());
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    readings: watch::Receiver<PollResult<Reading>>,
    logging: watch::Receiver<PollResult<LoggingStatus>>,
    refresh: Arc<Notify>,
    description: String,
    reading_error: Option<String>,
    logging_error: Option<String>,
}

impl ChannelSource {
    /// Create a channel pair.
    ///
    /// Returns (publishers, source); the publishers go to the pollers and
    /// the source goes to the dashboard.
    pub fn create(source_description: &str) -> (Publishers, Self) {
        let (readings_tx, readings) = watch::channel(None);
        let (logging_tx, logging) = watch::channel(None);
        let refresh = Arc::new(Notify::new());

        let publishers = Publishers {
            readings: readings_tx,
            logging: logging_tx,
            refresh: refresh.clone(),
        };
        let source = Self {
            readings,
            logging,
            refresh,
            description: source_description.to_string(),
            reading_error: None,
            logging_error: None,
        };
        (publishers, source)
    }
}

/// Take the value if it changed, recording errors in `error`.
fn take_changed<T: Clone>(
    rx: &mut watch::Receiver<PollResult<T>>,
    error: &mut Option<String>,
) -> Option<T> {
    if !rx.has_changed().unwrap_or(false) {
        return None;
    }
    let result = rx.borrow_and_update().clone()?;
    match result {
        Ok(value) => {
            *error = None;
            Some(value)
        }
        Err(e) => {
            *error = Some(e);
            None
        }
    }
}

impl DataSource for ChannelSource {
    fn poll(&mut self) -> Option<Update> {
        if let Some(reading) = take_changed(&mut self.readings, &mut self.reading_error) {
            return Some(Update::Reading(reading));
        }
        take_changed(&mut self.logging, &mut self.logging_error).map(Update::Logging)
    }

    fn refresh(&self) {
        self.refresh.notify_waiters();
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.reading_error.as_deref().or(self.logging_error.as_deref())
    }
}
