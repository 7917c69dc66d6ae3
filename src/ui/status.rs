//! Current status view.
//!
//! Two side-by-side panels: the live temperature and the logging state.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::format_temp;
use crate::app::App;
use crate::data::TIMESTAMP_FORMAT;

/// Render the Status view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let [left, right] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(area);

    render_temperature(frame, app, left);
    render_logging(frame, app, right);
}

fn panel<'a>(app: &App, title: &'a str) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border))
}

fn render_temperature(frame: &mut Frame, app: &App, area: Rect) {
    let block = panel(app, " Current Temperature ");

    let Some(reading) = app.snapshot.reading else {
        let text = if app.load_error.is_some() {
            "No reading available"
        } else {
            "Reading..."
        };
        let paragraph = Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    };

    let status = reading.status(&app.thresholds);
    let style = app.theme.status_style(status);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format_temp(reading.value()),
            style.add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![Span::raw("Status: "), Span::styled(status.label(), style)]),
    ];
    // Per-sensor breakdown only when sensors answered
    if let Some(primary) = reading.primary {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(
                "Sensors: {} | Thermal: {}",
                format_temp(primary),
                format_temp(reading.secondary)
            ),
            Style::default().add_modifier(Modifier::DIM),
        )));
    }

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center).block(block);
    frame.render_widget(paragraph, area);
}

fn render_logging(frame: &mut Frame, app: &App, area: Rect) {
    let block = panel(app, " Temperature Logging ");
    let logging = &app.snapshot.logging;
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let mut lines = Vec::new();
    if logging.is_installed() {
        lines.push(Line::from(Span::styled(
            "Logging: Active",
            Style::default().fg(app.theme.normal).add_modifier(Modifier::BOLD),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "Logging: Not Installed",
            Style::default().fg(app.theme.warm).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(
            "Temperature logging is not set up. Press i to install automatic temperature logging.",
        ));
    }

    if let Some(last) = logging.last_reading() {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Last Reading: ", bold),
            Span::raw(last.timestamp.format(TIMESTAMP_FORMAT).to_string()),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Temperature: ", bold),
            Span::raw(format_temp(last.secondary)),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Total Readings: ", bold),
            Span::raw(logging.len().to_string()),
        ]));
    } else if logging.log_exists() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "No readings logged yet",
            Style::default().add_modifier(Modifier::DIM),
        )));
    }

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(block);
    frame.render_widget(paragraph, area);
}
