//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use super::format_temp;
use crate::app::{App, View};

/// Render the header bar with the current temperature.
///
/// Displays: status indicator, headline temperature, logging state.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = Span::styled(header_title(app), Style::default().add_modifier(Modifier::BOLD));

    let Some(reading) = app.snapshot.reading else {
        let line = Line::from(vec![title, Span::raw("│ Loading...")]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    let status = reading.status(&app.thresholds);
    let status_style = app.theme.status_style(status);

    let logging = if app.snapshot.logging.is_installed() {
        Span::styled("logging", Style::default().fg(app.theme.normal))
    } else {
        Span::styled("not logging", Style::default().add_modifier(Modifier::DIM))
    };

    let line = Line::from(vec![
        Span::styled(" ● ", status_style),
        title,
        Span::raw("│ "),
        Span::styled(format_temp(reading.value()), status_style.add_modifier(Modifier::BOLD)),
        Span::raw(" "),
        Span::styled(status.label(), status_style),
        Span::raw(" │ "),
        logging,
        Span::raw(format!(" │ {} readings", app.snapshot.logging.len())),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn header_title(app: &App) -> String {
    match app.hostname {
        Some(ref host) => format!(" Temperature Monitor - {} ", host),
        None => " Temperature Monitor ".to_string(),
    }
}

/// Render the tab bar showing available views.
///
/// Highlights the currently active view.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![Line::from(" 1:Status "), Line::from(" 2:Graph ")];

    let selected = match app.current_view {
        View::Status => 0,
        View::Graph => 1,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows: current view, time since last update, available controls.
/// Also displays temporary status messages and errors.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Check for temporary status message first
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    if let Some(ref err) = app.load_error {
        let paragraph = Paragraph::new(format!(" Error: {} | r:retry q:quit", err))
            .style(Style::default().fg(app.theme.critical));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = match app.current_view {
        View::Status => {
            if app.snapshot.logging.is_installed() {
                "r:refresh Tab:switch ?:help q:quit"
            } else {
                "i:install r:refresh Tab:switch ?:help q:quit"
            }
        }
        View::Graph => "[/]:range e:export Tab:switch ?:help q:quit",
    };

    let status = match app.snapshot.last_updated() {
        Some(at) => format!(
            " {} | Updated {:.1}s ago | {}",
            app.current_view.label(),
            at.elapsed().as_secs_f64(),
            controls,
        ),
        None => format!(" Loading {}... | q:quit", app.source_description()),
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(" Navigation", bold)]),
        Line::from("  Tab ←/→     Switch views"),
        Line::from("  1 / 2       Status / Graph"),
        Line::from(""),
        Line::from(vec![Span::styled(" Graph", bold)]),
        Line::from("  ] or w      Next time range"),
        Line::from("  [           Previous time range"),
        Line::from("  e           Export range to JSON"),
        Line::from(""),
        Line::from(vec![Span::styled(" General", bold)]),
        Line::from("  r           Refresh now"),
        Line::from("  i           Install logging"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 40u16.min(area.width.saturating_sub(4));
    let help_height = 20u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
