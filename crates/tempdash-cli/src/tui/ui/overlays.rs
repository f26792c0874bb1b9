//! Modal overlays: help, add-device input and the blocking alert.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::theme::{AppTheme, BORDER_TYPE};
use crate::tui::app::{App, InputMode};

/// Rectangle of the given size centered in `area`, clamped to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn section(title: &str, theme: &AppTheme) -> Line<'static> {
    Line::from(Span::styled(
        format!("--- {} ---", title),
        Style::default()
            .fg(theme.primary)
            .add_modifier(Modifier::BOLD),
    ))
}

/// Draw the keyboard shortcut overlay.
pub(super) fn draw_help_overlay(frame: &mut Frame) {
    let theme = AppTheme::dark();

    let area = frame.area();
    let width = (area.width * 70 / 100)
        .max(60)
        .min(area.width.saturating_sub(2));
    let height = (area.height * 70 / 100)
        .max(18)
        .min(area.height.saturating_sub(2));
    let help_area = centered(area, width, height);
    frame.render_widget(Clear, help_area);

    let inner_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(help_area);

    let left_lines = vec![
        section("Devices", &theme),
        Line::from(""),
        shortcut_line("j/k", "Move highlight", &theme),
        shortcut_line("Enter", "Show highlighted device", &theme),
        shortcut_line("a", "Add a device", &theme),
        shortcut_line("l", "Reload device list", &theme),
        Line::from(""),
        section("Data", &theme),
        Line::from(""),
        shortcut_line("r", "Restart polling", &theme),
        shortcut_line("g", "Reload chart", &theme),
    ];

    let right_lines = vec![
        section("Analysis", &theme),
        Line::from(""),
        shortcut_line("i or /", "Type a question", &theme),
        shortcut_line("1-9", "Send suggested question", &theme),
        shortcut_line("PgUp/PgDn", "Scroll chat", &theme),
        shortcut_line("Esc", "Leave text input", &theme),
        Line::from(""),
        section("Other", &theme),
        Line::from(""),
        shortcut_line("t", "Toggle theme", &theme),
        shortcut_line("?", "Toggle help", &theme),
        shortcut_line("q", "Quit", &theme),
        Line::from(""),
        Line::from(Span::styled(
            "Press ? or Esc to close",
            Style::default().fg(theme.text_muted),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BORDER_TYPE)
        .border_style(theme.border_style(true))
        .title(Span::styled(" Keyboard Shortcuts ", theme.title_style()));

    frame.render_widget(block, help_area);
    frame.render_widget(Paragraph::new(left_lines), inner_layout[0]);
    frame.render_widget(Paragraph::new(right_lines), inner_layout[1]);
}

/// Create a shortcut line with key and description.
fn shortcut_line<'a>(key: &str, desc: &str, theme: &AppTheme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{:>12} ", key), Style::default().fg(theme.warning)),
        Span::styled(desc.to_string(), Style::default().fg(theme.text_secondary)),
    ])
}

/// Draw the new device name prompt.
pub(super) fn draw_add_device_dialog(frame: &mut Frame, app: &App) {
    if app.input_mode != InputMode::AddDevice {
        return;
    }

    let theme = app.app_theme();
    let dialog_area = centered(frame.area(), 44, 5);
    frame.render_widget(Clear, dialog_area);

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(" > ", Style::default().fg(theme.primary)),
            Span::styled(
                app.device_name_input.as_str(),
                Style::default().fg(theme.text_primary),
            ),
            Span::styled("_", Style::default().fg(theme.primary)),
        ]),
        Line::from(vec![
            Span::styled(" Enter", Style::default().fg(theme.success)),
            Span::styled("=Add  ", Style::default().fg(theme.text_muted)),
            Span::styled("Esc", Style::default().fg(theme.danger)),
            Span::styled("=Cancel", Style::default().fg(theme.text_muted)),
        ]),
    ];

    let dialog = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BORDER_TYPE)
            .border_style(theme.border_style(true))
            .title(Span::styled(" 新增設備 ", theme.title_style())),
    );
    frame.render_widget(dialog, dialog_area);
}

/// Draw the blocking alert, if any.
pub(super) fn draw_alert_dialog(frame: &mut Frame, app: &App) {
    let Some(message) = &app.alert else {
        return;
    };

    let theme = app.app_theme();
    let dialog_area = centered(frame.area(), 50, 7);
    frame.render_widget(Clear, dialog_area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            message.as_str(),
            Style::default().fg(theme.text_primary),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " [Enter] OK ",
            Style::default()
                .fg(theme.success)
                .add_modifier(Modifier::BOLD),
        )),
    ];

    let dialog = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BORDER_TYPE)
                .border_style(Style::default().fg(theme.warning))
                .title(Span::styled(
                    " 提示 ",
                    Style::default()
                        .fg(theme.warning)
                        .add_modifier(Modifier::BOLD),
                )),
        );
    frame.render_widget(dialog, dialog_area);
}
