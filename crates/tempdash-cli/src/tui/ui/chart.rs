//! Weekly temperature trend chart.

use ratatui::prelude::*;
use ratatui::symbols;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph};

use super::theme::BORDER_TYPE;
use crate::format::format_timestamp_ms;
use crate::tui::app::{App, CHART_TITLE};

/// Axis label format for the hourly points.
const X_LABEL_FORMAT: &str = "%m-%d %H:%M";

/// Y bounds padded so a flat line does not sit on the frame.
fn y_bounds(points: &[(f64, f64)]) -> [f64; 2] {
    let (min, max) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, y)| {
            (lo.min(y), hi.max(y))
        });
    let margin = ((max - min) * 0.1).max(0.5);
    [min - margin, max + margin]
}

/// X bounds from the earliest to the latest timestamp, in any input order.
fn x_bounds(points: &[(f64, f64)]) -> [f64; 2] {
    let (min, max) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(x, _)| {
            (lo.min(x), hi.max(x))
        });
    if max > min {
        [min, max]
    } else {
        // Single point: widen by an hour either side.
        let center = if min.is_finite() { min } else { 0.0 };
        [center - 3_600_000.0, center + 3_600_000.0]
    }
}

pub(super) fn draw_trend_chart(frame: &mut Frame, area: Rect, app: &App) {
    let theme = app.app_theme();

    let block = Block::default()
        .title(Span::styled(format!(" {} ", CHART_TITLE), theme.title_style()))
        .borders(Borders::ALL)
        .border_type(BORDER_TYPE)
        .border_style(theme.border_style(false));

    let data = match &app.chart {
        Some(points) if !points.is_empty() => points,
        _ => {
            let text = if app.selected_device_id.is_some() {
                "暫無圖表數據"
            } else {
                ""
            };
            let placeholder = Paragraph::new(Line::from(Span::styled(
                text,
                Style::default().fg(theme.text_muted),
            )))
            .alignment(Alignment::Center)
            .block(block);
            frame.render_widget(placeholder, area);
            return;
        }
    };

    let [x_min, x_max] = x_bounds(data);
    let [y_min, y_max] = y_bounds(data);

    let datasets = vec![
        Dataset::default()
            .name("溫度 (°C)")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme.chart_line))
            .data(data),
    ];

    let x_label = |ms: f64| Span::raw(format_timestamp_ms(ms as i64, X_LABEL_FORMAT));

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(theme.text_muted))
                .bounds([x_min, x_max])
                .labels(vec![
                    x_label(x_min),
                    x_label((x_min + x_max) / 2.0),
                    x_label(x_max),
                ]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(theme.text_muted))
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::raw(format!("{:.1}", y_min)),
                    Span::raw(format!("{:.1}", (y_min + y_max) / 2.0)),
                    Span::raw(format!("{:.1}", y_max)),
                ]),
        );

    frame.render_widget(chart, area);
}
