//! Sample log reader.
//!
//! Polls the sample log written by the cron job, together with the install
//! state of the logging setup.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::time::SystemTime;

use anyhow::{Context, Result};

use crate::config::Settings;
use crate::data::{parse_log, InstallStatus, LoggingStatus, Sample, LOG_HEADER};
use crate::install::Installer;

/// Reads the tail of the sample log.
///
/// The reader tracks the log's modification time and the install state and
/// only produces a new [`LoggingStatus`] when either has changed.
#[derive(Debug)]
pub struct LogReader {
    installer: Installer,
    tail_lines: usize,
    last_error: Option<String>,
    last_seen: Option<(Option<SystemTime>, InstallStatus)>,
}

impl LogReader {
    pub fn new(installer: Installer, tail_lines: usize) -> Self {
        Self {
            installer,
            tail_lines,
            last_error: None,
            last_seen: None,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(Installer::from_settings(settings), settings.tail_lines)
    }

    /// Returns the log being read.
    pub fn path(&self) -> &Path {
        self.installer.log_path()
    }

    /// Error from the most recent poll, if it failed.
    pub fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn modified_time(&self) -> Option<SystemTime> {
        fs::metadata(self.path()).ok()?.modified().ok()
    }

    /// Read the install state and the log tail unconditionally.
    pub fn read(&self) -> Result<LoggingStatus> {
        let install = self.installer.status();
        let samples = if install.log {
            let content = read_tail(self.path(), self.tail_lines)
                .with_context(|| format!("Failed to read {}", self.path().display()))?;
            parse_log(&content)
        } else {
            Vec::new()
        };
        Ok(LoggingStatus { install, samples })
    }

    /// Read again if anything changed since the last successful poll.
    pub fn poll(&mut self) -> Option<LoggingStatus> {
        let seen = (self.modified_time(), self.installer.status());
        if self.last_seen.as_ref() == Some(&seen) {
            return None;
        }

        match self.read() {
            Ok(status) => {
                self.last_error = None;
                self.last_seen = Some(seen);
                Some(status)
            }
            Err(e) => {
                self.last_error = Some(format!("{:#}", e));
                None
            }
        }
    }
}

/// Append one sample line to the log, writing the header first if the log
/// is new or empty.
pub fn append_sample(path: &Path, sample: &Sample) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    if file.metadata()?.len() == 0 {
        writeln!(file, "{}", LOG_HEADER)?;
    }
    writeln!(file, "{}", sample).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Bytes read per step when scanning backwards for line breaks.
const TAIL_CHUNK: u64 = 8 * 1024;

/// Read the last `n` lines of the file at `path` without loading the rest.
fn read_tail(path: &Path, n: usize) -> Result<String> {
    let mut file = File::open(path)?;
    let mut start = file.metadata()?.len();
    let mut buf: Vec<u8> = Vec::new();
    let mut newlines = 0;

    // n lines need n + 1 breaks: one before the first line and the trailing one
    while start > 0 && newlines <= n {
        let step = TAIL_CHUNK.min(start);
        start -= step;
        let mut chunk = vec![0; step as usize];
        file.seek(SeekFrom::Start(start))?;
        file.read_exact(&mut chunk)?;
        newlines += chunk.iter().filter(|&&b| b == b'\n').count();
        chunk.extend_from_slice(&buf);
        buf = chunk;
    }

    // A character split at the chunk edge only ever lands in a dropped line
    let text = String::from_utf8_lossy(&buf);
    Ok(tail(&text, n).to_string())
}

/// The last `n` lines of `text`.
fn tail(text: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    let body = text.strip_suffix('\n').unwrap_or(text);
    match body.rmatch_indices('\n').nth(n - 1) {
        Some((idx, _)) => &text[idx + 1..],
        None => text,
    }
}
