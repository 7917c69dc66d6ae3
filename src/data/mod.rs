//! Data models and processing for temperature samples.
//!
//! ## Submodules
//!
//! - [`sample`]: The [`Sample`] type and the sample log text format
//! - [`window`]: Named recency windows and the range filter
//! - [`reading`]: Live [`Reading`]s, [`Thresholds`] and [`TempStatus`]
//! - [`history`]: Windowed chart series over logged samples
//! - [`snapshot`]: The immutable dashboard [`Snapshot`]
//!
//! ## Data Flow
//!
//! ```text
//! log text ──▶ parse_log() ──▶ Vec<Sample> ──▶ LoggingStatus ─┐
//!                                                             ├──▶ Snapshot
//! sensors ───▶ Reading ───────────────────────────────────────┘
//!
//! Snapshot.logging.samples ──▶ History::new(window, now) ──▶ chart series
//! ```

pub mod history;
pub mod reading;
pub mod sample;
pub mod snapshot;
pub mod window;

pub use history::History;
pub use reading::{Reading, TempStatus, Thresholds};
pub use sample::{parse_log, Sample, LOG_HEADER, TIMESTAMP_FORMAT};
pub use snapshot::{InstallStatus, LoggingStatus, Snapshot};
pub use window::{filter, Window};
