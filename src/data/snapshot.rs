//! Dashboard state snapshots.
//!
//! Each poll result produces a new [`Snapshot`] that replaces the previous
//! one. A snapshot is never edited in place; the `with_*` constructors copy
//! the fields owned by the other poller and swap in the new value.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use super::reading::Reading;
use super::sample::Sample;

/// Which pieces of the logging setup exist on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InstallStatus {
    /// The logging script is present.
    pub script: bool,
    /// A cron entry invokes the logging script.
    pub cron: bool,
    /// The sample log exists.
    pub log: bool,
}

impl InstallStatus {
    /// Logging is installed when the script exists and cron runs it.
    pub fn is_installed(&self) -> bool {
        self.script && self.cron
    }
}

/// Install state together with the samples read from the log tail.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoggingStatus {
    pub install: InstallStatus,
    pub samples: Vec<Sample>,
}

impl LoggingStatus {
    pub fn is_installed(&self) -> bool {
        self.install.is_installed()
    }

    pub fn log_exists(&self) -> bool {
        self.install.log
    }

    /// The most recent logged sample.
    pub fn last_reading(&self) -> Option<&Sample> {
        self.samples.last()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Everything the dashboard renders, as one immutable value.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Latest live reading, `None` until the first successful sample.
    pub reading: Option<Reading>,
    pub reading_updated: Option<Instant>,
    /// Latest logging state. Shared so that reading updates don't copy samples.
    pub logging: Arc<LoggingStatus>,
    pub logging_updated: Option<Instant>,
}

impl Snapshot {
    /// A new snapshot with `reading` replacing the current one.
    pub fn with_reading(&self, reading: Reading) -> Self {
        Self {
            reading: Some(reading),
            reading_updated: Some(Instant::now()),
            ..self.clone()
        }
    }

    /// A new snapshot with `logging` replacing the current one.
    pub fn with_logging(&self, logging: LoggingStatus) -> Self {
        Self {
            logging: Arc::new(logging),
            logging_updated: Some(Instant::now()),
            ..self.clone()
        }
    }

    /// Time of the most recent update from either poller.
    pub fn last_updated(&self) -> Option<Instant> {
        self.reading_updated.max(self.logging_updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample::parse_log;

    #[test]
    fn test_installed_requires_script_and_cron() {
        let mut status = InstallStatus::default();
        assert!(!status.is_installed());
        status.script = true;
        assert!(!status.is_installed());
        status.cron = true;
        assert!(status.is_installed());
    }

    #[test]
    fn test_with_reading_keeps_logging() {
        let logging = LoggingStatus {
            install: InstallStatus {
                script: true,
                cron: true,
                log: true,
            },
            samples: parse_log("2024-01-01 00:00:00,45.0,42.3\n"),
        };
        let first = Snapshot::default().with_logging(logging.clone());
        let second = first.with_reading(Reading {
            primary: None,
            secondary: 50.0,
        });

        assert_eq!(*second.logging, logging);
        assert!(Arc::ptr_eq(&first.logging, &second.logging));
        assert_eq!(second.reading.unwrap().secondary, 50.0);
        // the original is untouched
        assert!(first.reading.is_none());
    }

    #[test]
    fn test_with_logging_keeps_reading() {
        let reading = Reading {
            primary: Some(44.0),
            secondary: 41.0,
        };
        let first = Snapshot::default().with_reading(reading);
        let second = first.with_logging(LoggingStatus::default());
        assert_eq!(second.reading, Some(reading));
        assert!(second.logging_updated.is_some());
        assert!(second.last_updated().is_some());
    }

    #[test]
    fn test_last_reading() {
        let status = LoggingStatus {
            install: InstallStatus::default(),
            samples: parse_log("2024-01-01 00:00:00,45.0,42.3\n2024-01-01 00:01:00,,43.1\n"),
        };
        assert_eq!(status.len(), 2);
        assert_eq!(status.last_reading().unwrap().secondary, 43.1);
        assert!(LoggingStatus::default().last_reading().is_none());
    }
}
