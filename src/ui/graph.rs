//! Temperature history chart.
//!
//! Plots the thermal zone series and, where logged, the sensors series for
//! the samples inside the selected [`Window`](crate::data::Window).

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use super::format_temp;
use crate::app::App;
use crate::data::history::format_axis_label;
use crate::data::{History, Window};

/// Render the Graph view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let [bar, body] = Layout::vertical([Constraint::Length(2), Constraint::Min(4)]).areas(area);

    let history = app.history();
    render_range_bar(frame, app, bar, &history);

    let block = Block::default()
        .title(format!(" Temperature History ({}) ", app.window.label()))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let (Some(x_bounds), Some(y_bounds)) = (history.x_bounds(), history.y_bounds()) else {
        let text = if !app.snapshot.logging.is_installed() && app.snapshot.logging.is_empty() {
            "Temperature logging is not installed. Go to the Status tab to install it."
        } else if history.total() == 0 {
            "No temperature data available yet. Please wait for data collection to begin."
        } else {
            "No readings in this time range."
        };
        let [_, middle, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(block.inner(body));
        frame.render_widget(block, body);
        frame.render_widget(
            Paragraph::new(text)
                .alignment(Alignment::Center)
                .style(Style::default().add_modifier(Modifier::DIM)),
            middle,
        );
        return;
    };

    let secondary = history.secondary_series();
    let primary = history.primary_series();

    let mut datasets = vec![Dataset::default()
        .name("Thermal")
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(app.theme.secondary_series))
        .data(&secondary)];
    if !primary.is_empty() {
        datasets.push(
            Dataset::default()
                .name("Sensors")
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(app.theme.primary_series))
                .data(&primary),
        );
    }

    let span = x_bounds[1] - x_bounds[0];
    let x_labels: Vec<Span> = [x_bounds[0], x_bounds[0] + span / 2.0, x_bounds[1]]
        .iter()
        .map(|&x| Span::raw(format_axis_label(x, span)))
        .collect();
    let y_labels: Vec<Span> = [y_bounds[0], (y_bounds[0] + y_bounds[1]) / 2.0, y_bounds[1]]
        .iter()
        .map(|&y| Span::raw(format!("{:.0}", y)))
        .collect();

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title("Time")
                .style(Style::default().fg(app.theme.border))
                .bounds(x_bounds)
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title("°C")
                .style(Style::default().fg(app.theme.border))
                .bounds(y_bounds)
                .labels(y_labels),
        );

    frame.render_widget(chart, body);
}

/// Counts, window selector and summary stats above the chart.
fn render_range_bar(frame: &mut Frame, app: &App, area: Rect, history: &History) {
    let mut selector = vec![Span::raw(" Range: ")];
    for window in Window::ALL {
        let style = if window == app.window {
            app.theme.tab_active.add_modifier(Modifier::REVERSED)
        } else {
            app.theme.tab_inactive
        };
        selector.push(Span::styled(format!(" {} ", window.name()), style));
    }

    let mut summary = vec![Span::raw(format!(
        " Showing {} of {} readings",
        history.shown(),
        history.total()
    ))];
    if let Some((min, max, mean)) = history.stats() {
        summary.push(Span::styled(
            format!(
                " │ min {} max {} avg {}",
                format_temp(min),
                format_temp(max),
                format_temp(mean)
            ),
            Style::default().add_modifier(Modifier::DIM),
        ));
    }

    frame.render_widget(Paragraph::new(vec![Line::from(summary), Line::from(selector)]), area);
}
