//! Named recency windows and the range filter.

use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Result};
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::sample::Sample;

/// A named recency duration used to pick which samples to display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Window {
    #[default]
    #[serde(rename = "1h")]
    Hour,
    #[serde(rename = "6h")]
    SixHours,
    #[serde(rename = "24h")]
    Day,
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "all")]
    All,
}

impl Window {
    pub const ALL: [Window; 5] = [
        Window::Hour,
        Window::SixHours,
        Window::Day,
        Window::Week,
        Window::All,
    ];

    /// How far back the window reaches, `None` for [`Window::All`].
    pub fn duration(self) -> Option<Duration> {
        match self {
            Window::Hour => Some(Duration::hours(1)),
            Window::SixHours => Some(Duration::hours(6)),
            Window::Day => Some(Duration::hours(24)),
            Window::Week => Some(Duration::days(7)),
            Window::All => None,
        }
    }

    /// Oldest timestamp still inside the window.
    pub fn cutoff(self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        self.duration().map(|d| now - d)
    }

    pub fn next(self) -> Self {
        match self {
            Window::Hour => Window::SixHours,
            Window::SixHours => Window::Day,
            Window::Day => Window::Week,
            Window::Week => Window::All,
            Window::All => Window::Hour,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Window::Hour => Window::All,
            Window::SixHours => Window::Hour,
            Window::Day => Window::SixHours,
            Window::Week => Window::Day,
            Window::All => Window::Week,
        }
    }

    /// Short name as accepted on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Window::Hour => "1h",
            Window::SixHours => "6h",
            Window::Day => "24h",
            Window::Week => "7d",
            Window::All => "all",
        }
    }

    /// Human readable label for the range selector.
    pub fn label(self) -> &'static str {
        match self {
            Window::Hour => "Last Hour",
            Window::SixHours => "Last 6 Hours",
            Window::Day => "Last 24 Hours",
            Window::Week => "Last 7 Days",
            Window::All => "All Time",
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Window {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "1h" => Ok(Window::Hour),
            "6h" => Ok(Window::SixHours),
            "24h" => Ok(Window::Day),
            "7d" => Ok(Window::Week),
            "all" => Ok(Window::All),
            other => bail!("Unknown time range: {} (expected 1h, 6h, 24h, 7d or all)", other),
        }
    }
}

/// Select the samples inside `window`, relative to `now`.
///
/// The result keeps input order and never contains anything the input
/// didn't. An empty result is a normal outcome.
pub fn filter(samples: &[Sample], window: Window, now: NaiveDateTime) -> Vec<&Sample> {
    match window.cutoff(now) {
        None => samples.iter().collect(),
        Some(cutoff) => samples.iter().filter(|s| s.timestamp >= cutoff).collect(),
    }
}
