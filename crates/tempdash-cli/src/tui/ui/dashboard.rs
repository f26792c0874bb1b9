//! Left and center panels: device selector, temperature card and statistics.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table};

use super::theme::BORDER_TYPE;
use crate::format::{NO_DAILY_DATA, format_stat};
use crate::tui::app::{App, BreakdownRow};

/// Draw the device selector.
///
/// Row 0 is the "no device" placeholder. The highlighted row follows
/// `j`/`k`; the device whose data is shown carries a `*`.
pub(super) fn draw_device_selector(frame: &mut Frame, area: Rect, app: &App) {
    let theme = app.app_theme();
    let title = format!(" 設備 ({}) ", app.devices.len());

    let block = Block::default()
        .title(title)
        .title_style(theme.title_style())
        .borders(Borders::ALL)
        .border_type(BORDER_TYPE)
        .border_style(theme.border_style(true));

    if !app.devices_loaded {
        let hint = Paragraph::new(Line::from(Span::styled(
            " Loading devices...",
            Style::default().fg(theme.text_muted),
        )))
        .block(block);
        frame.render_widget(hint, area);
        return;
    }

    let selected_index = app.selected_device().and_then(|selected| {
        app.devices
            .iter()
            .position(|d| d.id == selected.id)
            .map(|i| i + 1)
    });

    let items: Vec<ListItem> = app
        .selector_entries()
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            let is_highlighted = i == app.selector_index;
            let prefix = if is_highlighted { "> " } else { "  " };
            let marker = if selected_index == Some(i) { "*" } else { " " };

            let name_style = if i == 0 {
                Style::default().fg(theme.text_muted)
            } else if is_highlighted {
                Style::default()
                    .fg(theme.text_primary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text_secondary)
            };

            let line = Line::from(vec![
                Span::styled(prefix, Style::default().fg(theme.primary)),
                Span::styled(marker, Style::default().fg(theme.success)),
                Span::raw(" "),
                Span::styled(name.chars().take(22).collect::<String>(), name_style),
            ]);

            let style = if is_highlighted {
                theme.selected_style()
            } else {
                Style::default()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

/// Draw the latest temperature and the time it was received.
pub(super) fn draw_temperature_card(frame: &mut Frame, area: Rect, app: &App) {
    let theme = app.app_theme();

    let value_color = if app.selected_device_id.is_none() {
        theme.text_muted
    } else {
        theme.text_primary
    };

    let lines = vec![
        Line::from(Span::styled(
            app.temperature_text.as_str(),
            Style::default()
                .fg(value_color)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            app.last_update.as_str(),
            Style::default().fg(theme.text_muted),
        )),
    ];

    let card = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .title(" 即時溫度 ")
            .title_style(theme.title_style())
            .borders(Borders::ALL)
            .border_type(BORDER_TYPE)
            .border_style(theme.border_style(false)),
    );
    frame.render_widget(card, area);
}

/// Draw the statistics fields and the daily breakdown.
pub(super) fn draw_stats_panel(frame: &mut Frame, area: Rect, app: &App) {
    let theme = app.app_theme();

    let block = Block::default()
        .title(" 溫度統計 ")
        .title_style(theme.title_style())
        .borders(Borders::ALL)
        .border_type(BORDER_TYPE)
        .border_style(theme.border_style(false));

    if !app.stats_visible {
        let hint = Paragraph::new(Line::from(Span::styled(
            " 請選擇一個設備以查看統計數據",
            Style::default().fg(theme.text_muted),
        )))
        .block(block);
        frame.render_widget(hint, area);
        return;
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(1)])
        .split(inner);

    let field_lines: Vec<Line> = app
        .stat_values
        .chunks(2)
        .map(|pair| {
            let mut spans = Vec::new();
            for (label, value) in pair {
                spans.push(Span::styled(
                    format!(" {}: ", label),
                    Style::default().fg(theme.text_secondary),
                ));
                spans.push(Span::styled(
                    format!("{:<12}", value),
                    Style::default().fg(theme.text_primary),
                ));
            }
            Line::from(spans)
        })
        .collect();
    frame.render_widget(Paragraph::new(field_lines), layout[0]);

    let rows: Vec<Row> = app
        .breakdown
        .iter()
        .map(|row| match row {
            BreakdownRow::Day(day) => Row::new(vec![
                Cell::from(day.date.clone()),
                Cell::from(format_stat(Some(day.avg))),
                Cell::from(format_stat(Some(day.max))),
                Cell::from(format_stat(Some(day.min))),
                Cell::from(format_stat(Some(day.diff))),
            ])
            .style(Style::default().fg(theme.text_primary)),
            BreakdownRow::Empty => Row::new(vec![Cell::from(NO_DAILY_DATA)])
                .style(Style::default().fg(theme.text_muted)),
        })
        .collect();

    let header = Row::new(vec!["日期", "平均", "最高", "最低", "溫差"]).style(
        Style::default()
            .fg(theme.primary)
            .add_modifier(Modifier::BOLD),
    );

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(10),
        ],
    )
    .header(header);
    frame.render_widget(table, layout[1]);
}
