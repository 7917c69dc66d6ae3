// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # thermwatch
//!
//! A terminal dashboard and library for logging and viewing CPU
//! temperature on Linux hosts.
//!
//! A cron-driven script appends one line per minute to a sample log. This
//! crate parses that log, filters it to a recency window, samples the
//! current temperature from `sensors` and the kernel thermal zone, and
//! renders both in an interactive terminal UI. It can also install the
//! logging script and cron entry.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌──────────┐  │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal │  │
//! │  │ (state) │    │(samples) │    │(render) │    │          │  │
//! │  └────┬────┘    └──────────┘    └─────────┘    └──────────┘  │
//! │       │                                                      │
//! │       ▼                                                      │
//! │  ┌─────────┐    ┌──────────────────────────────┐             │
//! │  │ source  │◀───│ Pollers: Sampler | LogReader │             │
//! │  │ (input) │    └──────────────────────────────┘             │
//! │  └─────────┘                                                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, view navigation, and user interaction logic
//! - **[`source`]**: The [`DataSource`] trait, the channel-backed
//!   [`ChannelSource`] and the two [`Pollers`] feeding it
//! - **[`data`]**: The sample log format, range filtering, readings and the
//!   immutable dashboard [`Snapshot`]
//! - **[`install`]**: Writes the logging script, cron entry and log file
//! - **[`config`]**: [`Settings`] from defaults, a TOML file and the environment
//! - **[`ui`]**: Terminal rendering using ratatui
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Open the dashboard
//! thermwatch
//!
//! # Install logging, then print its status
//! thermwatch --install
//! thermwatch --status
//!
//! # Export the last 24 hours as JSON
//! thermwatch --range 24h --export day.json
//! ```
//!
//! ### As a library
//!
//! ```
//! use chrono::NaiveDateTime;
//! use thermwatch::{filter, parse_log, Window};
//!
//! let samples = parse_log(
//!     "# Timestamp,Sensors_Temp(C),Thermal_Temp(C)\n\
//!      2024-01-01 10:00:00,45.0,42.3\n\
//!      2024-01-01 11:45:00,,44.0\n",
//! );
//! let now = NaiveDateTime::parse_from_str("2024-01-01 12:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
//! let recent = filter(&samples, Window::Hour, now);
//! assert_eq!(recent.len(), 1);
//! assert_eq!(recent[0].primary, None);
//! ```
//!
//! ### Driving the dashboard state from a channel
//!
//! ```
//! use thermwatch::{App, ChannelSource, Installer, Settings, Thresholds, Window};
//! use thermwatch::ui::Theme;
//!
//! let settings = Settings::default();
//! let (publishers, source) = ChannelSource::create("pollers");
//! let app = App::new(
//!     Box::new(source),
//!     Installer::from_settings(&settings),
//!     Thresholds::default(),
//!     Window::Day,
//!     Theme::dark(),
//! );
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod install;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use config::Settings;
pub use data::{
    filter, parse_log, History, InstallStatus, LoggingStatus, Reading, Sample, Snapshot,
    TempStatus, Thresholds, Window,
};
pub use install::Installer;
pub use source::{ChannelSource, DataSource, LogReader, Pollers, Sampler, Update};
