//! Terminal rendering using ratatui.
//!
//! - [`common`]: header, tabs, status bar and help overlay
//! - [`status`]: the current-status tab
//! - [`graph`]: the temperature history chart
//! - [`theme`]: light and dark color themes

pub mod common;
pub mod graph;
pub mod status;
pub mod theme;

pub use theme::Theme;

/// Format a temperature for display.
pub fn format_temp(value: f64) -> String {
    format!("{:.1}°C", value)
}
