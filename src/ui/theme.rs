//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::TempStatus;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for normal temperatures.
    pub normal: Color,
    /// Color for warm temperatures.
    pub warm: Color,
    /// Color for hot temperatures.
    pub hot: Color,
    /// Color for critical temperatures.
    pub critical: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Line color of the thermal zone series.
    pub secondary_series: Color,
    /// Line color of the sensors series.
    pub primary_series: Color,
    /// Style for section headings.
    pub header: Style,
    /// Style for the active tab.
    pub tab_active: Style,
    /// Style for inactive tabs.
    pub tab_inactive: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            normal: Color::Green,
            warm: Color::Yellow,
            hot: Color::LightRed,
            critical: Color::Red,
            border: Color::Gray,
            secondary_series: Color::LightRed,
            primary_series: Color::LightBlue,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            normal: Color::Green,
            warm: Color::Yellow,
            hot: Color::Magenta,
            critical: Color::Red,
            border: Color::DarkGray,
            secondary_series: Color::Red,
            primary_series: Color::Blue,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        // Use terminal-light crate to detect background luminance
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Get style for a temperature status
    pub fn status_style(&self, status: TempStatus) -> Style {
        match status {
            TempStatus::Normal => Style::default().fg(self.normal),
            TempStatus::Warm => Style::default().fg(self.warm),
            TempStatus::Hot => Style::default().fg(self.hot).add_modifier(Modifier::BOLD),
            TempStatus::Critical => Style::default()
                .fg(self.critical)
                .add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK),
        }
    }
}
