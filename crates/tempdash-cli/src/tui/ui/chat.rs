//! Analysis chat: message log, question input and suggested replies.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use super::theme::{AppTheme, BORDER_TYPE};
use crate::tui::app::{App, ChatRole, InputMode};

pub(super) fn draw_chat_panel(frame: &mut Frame, area: Rect, app: &App) {
    let suggestions_height = (app.suggested_replies.len().min(9) as u16).saturating_add(2);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(suggestions_height),
        ])
        .split(area);

    draw_messages(frame, layout[0], app);
    draw_input(frame, layout[1], app);
    draw_suggestions(frame, layout[2], app);
}

/// Rows a line occupies once wrapped to `width` cells.
fn wrapped_height(line: &Line, width: u16) -> u16 {
    if width == 0 {
        return 0;
    }
    let cells = line.width().max(1);
    cells.div_ceil(width as usize).min(u16::MAX as usize) as u16
}

/// First row to show so the newest message sits at the bottom, minus the
/// user's scroll.
fn scroll_offset(total: u16, height: u16, scroll_from_bottom: u16) -> u16 {
    total
        .saturating_sub(height)
        .saturating_sub(scroll_from_bottom)
}

fn message_lines<'a>(app: &'a App, theme: &AppTheme) -> Vec<Line<'a>> {
    app.chat
        .messages()
        .iter()
        .map(|message| {
            let (label_color, text_color) = match message.role {
                ChatRole::User => (theme.chat_user, theme.text_primary),
                ChatRole::Ai if message.is_pending() => (theme.success, theme.text_muted),
                ChatRole::Ai => (theme.success, theme.text_primary),
            };
            Line::from(vec![
                Span::styled(
                    format!("{}: ", message.role.label()),
                    Style::default()
                        .fg(label_color)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(message.text.as_str(), Style::default().fg(text_color)),
            ])
        })
        .collect()
}

fn draw_messages(frame: &mut Frame, area: Rect, app: &App) {
    let theme = app.app_theme();

    let block = Block::default()
        .title(" AI 溫度分析 ")
        .title_style(theme.title_style())
        .borders(Borders::ALL)
        .border_type(BORDER_TYPE)
        .border_style(theme.border_style(app.input_mode == InputMode::Chat));
    let inner = block.inner(area);

    let lines = message_lines(app, &theme);
    let total = lines
        .iter()
        .map(|line| wrapped_height(line, inner.width))
        .fold(0u16, u16::saturating_add);
    let offset = scroll_offset(total, inner.height, app.chat.scroll_from_bottom());

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((offset, 0))
        .block(block);
    frame.render_widget(paragraph, area);
}

fn draw_input(frame: &mut Frame, area: Rect, app: &App) {
    let theme = app.app_theme();
    let editing = app.input_mode == InputMode::Chat;

    let mut spans = vec![
        Span::styled(" > ", Style::default().fg(theme.primary)),
        Span::styled(app.chat_input.as_str(), Style::default().fg(theme.text_primary)),
    ];
    if editing {
        spans.push(Span::styled("_", Style::default().fg(theme.primary)));
    } else if app.chat_input.is_empty() {
        spans.push(Span::styled(
            "按 i 輸入問題",
            Style::default().fg(theme.text_muted),
        ));
    }

    let input = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BORDER_TYPE)
            .border_style(theme.border_style(editing)),
    );
    frame.render_widget(input, area);
}

fn draw_suggestions(frame: &mut Frame, area: Rect, app: &App) {
    let theme = app.app_theme();

    let lines: Vec<Line> = app
        .suggested_replies
        .iter()
        .take(9)
        .enumerate()
        .map(|(i, reply)| {
            Line::from(vec![
                Span::styled(
                    format!(" {}. ", i + 1),
                    Style::default().fg(theme.warning),
                ),
                Span::styled(reply.as_str(), Style::default().fg(theme.text_secondary)),
            ])
        })
        .collect();

    let suggestions = Paragraph::new(lines).block(
        Block::default()
            .title(" 建議問題 ")
            .title_style(theme.title_style())
            .borders(Borders::ALL)
            .border_type(BORDER_TYPE)
            .border_style(theme.border_style(false)),
    );
    frame.render_widget(suggestions, area);
}
