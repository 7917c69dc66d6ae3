//! Windowed view over logged samples, shaped for charting.

use chrono::{DateTime, NaiveDateTime};

use super::sample::Sample;
use super::window::{filter, Window};

/// Padding added above and below the plotted temperature range.
const Y_PADDING: f64 = 2.0;

/// Samples inside a window plus the series derived from them.
///
/// Series points are `(x, y)` pairs where `x` is seconds since the epoch
/// (the naive log time read as UTC) and `y` is °C.
#[derive(Debug, Clone)]
pub struct History<'a> {
    pub window: Window,
    samples: Vec<&'a Sample>,
    total: usize,
}

impl<'a> History<'a> {
    pub fn new(all: &'a [Sample], window: Window, now: NaiveDateTime) -> Self {
        Self {
            window,
            samples: filter(all, window, now),
            total: all.len(),
        }
    }

    pub fn samples(&self) -> &[&'a Sample] {
        &self.samples
    }

    /// Number of samples inside the window.
    pub fn shown(&self) -> usize {
        self.samples.len()
    }

    /// Number of samples before filtering.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Thermal zone series; every sample contributes a point.
    pub fn secondary_series(&self) -> Vec<(f64, f64)> {
        self.samples.iter().map(|s| (to_x(&s.timestamp), s.secondary)).collect()
    }

    /// Sensors series; samples without a primary value are left out.
    pub fn primary_series(&self) -> Vec<(f64, f64)> {
        self.samples
            .iter()
            .filter_map(|s| s.primary.map(|p| (to_x(&s.timestamp), p)))
            .collect()
    }

    /// Time span covered, or `None` when there is nothing to plot.
    pub fn x_bounds(&self) -> Option<[f64; 2]> {
        let first = self.samples.first()?;
        let last = self.samples.last()?;
        let (lo, hi) = (to_x(&first.timestamp), to_x(&last.timestamp));
        // A single point still needs a non-empty axis
        if hi > lo {
            Some([lo, hi])
        } else {
            Some([lo - 30.0, lo + 30.0])
        }
    }

    /// Temperature span across both series, padded.
    pub fn y_bounds(&self) -> Option<[f64; 2]> {
        let values =
            self.samples.iter().flat_map(|s| std::iter::once(s.secondary).chain(s.primary));
        let (min, max) = values.fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })?;
        Some([min - Y_PADDING, max + Y_PADDING])
    }

    /// Lowest, highest and mean headline temperature in the window.
    pub fn stats(&self) -> Option<(f64, f64, f64)> {
        if self.samples.is_empty() {
            return None;
        }
        let temps: Vec<f64> = self.samples.iter().map(|s| s.display_temp()).collect();
        let min = temps.iter().copied().fold(f64::INFINITY, f64::min);
        let max = temps.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = temps.iter().sum::<f64>() / temps.len() as f64;
        Some((min, max, mean))
    }

    /// Export shape: window name, counts and the windowed samples.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "window": self.window.name(),
            "total": self.total,
            "shown": self.samples.len(),
            "samples": self.samples,
        })
    }
}

fn to_x(ts: &NaiveDateTime) -> f64 {
    ts.and_utc().timestamp() as f64
}

/// Format an x-axis position; short spans show the time of day, long
/// spans show the date.
pub fn format_axis_label(x: f64, span_secs: f64) -> String {
    let Some(dt) = DateTime::from_timestamp(x as i64, 0) else {
        return String::new();
    };
    if span_secs > 24.0 * 3600.0 {
        dt.format("%m/%d").to_string()
    } else {
        dt.format("%H:%M").to_string()
    }
}
