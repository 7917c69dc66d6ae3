//! Current temperature readings and status classification.

use serde::{Deserialize, Serialize};

/// Temperature limits used to classify a reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Readings at or above this are "Warm".
    pub warm: f64,
    /// Readings at or above this are "Hot".
    pub hot: f64,
    /// Readings at or above this are "Critical".
    pub critical: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            warm: 60.0,
            hot: 70.0,
            critical: 80.0,
        }
    }
}

impl Thresholds {
    pub fn classify(&self, temp: f64) -> TempStatus {
        if temp >= self.critical {
            TempStatus::Critical
        } else if temp >= self.hot {
            TempStatus::Hot
        } else if temp >= self.warm {
            TempStatus::Warm
        } else {
            TempStatus::Normal
        }
    }
}

/// Temperature status, ordered from coolest to hottest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TempStatus {
    Normal,
    Warm,
    Hot,
    Critical,
}

impl TempStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TempStatus::Normal => "Normal",
            TempStatus::Warm => "Warm",
            TempStatus::Hot => "Hot",
            TempStatus::Critical => "Critical",
        }
    }
}

/// A live reading from both sensors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// `sensors` output, absent when the tool or the label is unavailable.
    pub primary: Option<f64>,
    /// Thermal zone value in °C.
    pub secondary: f64,
}

impl Reading {
    /// The headline temperature: primary when present, else secondary.
    pub fn value(&self) -> f64 {
        self.primary.unwrap_or(self.secondary)
    }

    pub fn status(&self, thresholds: &Thresholds) -> TempStatus {
        thresholds.classify(self.value())
    }
}
