//! Temperature samples and the sample log text format.
//!
//! The log is plain comma-separated text with a comment header:
//!
//! ```text
//! # Timestamp,Sensors_Temp(C),Thermal_Temp(C)
//! 2024-01-01 00:00:00,45.0,42.3
//! 2024-01-01 00:01:00,,43.1
//! ```
//!
//! Parsing is best-effort: lines that do not fit the format are skipped
//! rather than reported.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Header line written when a new log is created.
pub const LOG_HEADER: &str = "# Timestamp,Sensors_Temp(C),Thermal_Temp(C)";

/// Timestamp layout used in the log (second resolution, local time).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One timestamped temperature observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// When the observation was taken.
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
    /// Reading from the `sensors` command, if it was available.
    pub primary: Option<f64>,
    /// Reading from the thermal zone.
    pub secondary: f64,
}

impl Sample {
    pub fn new(timestamp: NaiveDateTime, primary: Option<f64>, secondary: f64) -> Self {
        Self {
            timestamp,
            primary,
            secondary,
        }
    }

    /// Parse a single log line.
    ///
    /// Returns `None` for anything that is not exactly
    /// `timestamp,primary,secondary` with a valid timestamp and secondary.
    pub fn parse_line(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let [timestamp, primary, secondary] = fields.as_slice() else {
            return None;
        };

        let timestamp = NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).ok()?;
        let secondary = parse_temp(secondary)?;
        // An unreadable primary is a gap in the series, not a broken line
        let primary = if primary.is_empty() {
            None
        } else {
            parse_temp(primary)
        };

        Some(Self {
            timestamp,
            primary,
            secondary,
        })
    }

    /// The value shown as "the" temperature: primary when present.
    pub fn display_temp(&self) -> f64 {
        self.primary.unwrap_or(self.secondary)
    }
}

/// Formats the sample as a log line (without trailing newline).
impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},", self.timestamp.format(TIMESTAMP_FORMAT))?;
        if let Some(primary) = self.primary {
            write!(f, "{:.1}", primary)?;
        }
        write!(f, ",{:.1}", self.secondary)
    }
}

fn parse_temp(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse raw log text into samples, keeping log order.
///
/// Empty lines and `#` comments are ignored; malformed lines are dropped.
pub fn parse_log(text: &str) -> Vec<Sample> {
    text.lines()
        .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
        .filter_map(Sample::parse_line)
        .collect()
}

mod timestamp_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TIMESTAMP_FORMAT;

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&ts.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let s = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&s, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}
