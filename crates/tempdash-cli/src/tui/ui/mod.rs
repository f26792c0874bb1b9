//! Main UI layout and rendering for the TUI dashboard.
//!
//! The layout consists of:
//!
//! - **Header**: Title, backend state and selected device
//! - **Main content**: Selector and temperature card (left), statistics and
//!   trend chart (center), analysis chat (right)
//! - **Status bar**: Help text and status messages

pub mod theme;

mod chart;
mod chat;
mod dashboard;
mod overlays;

use chrono::Local;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph};

use super::app::{App, InputMode, Theme};

/// Draw the complete TUI interface.
pub fn draw(frame: &mut Frame, app: &App) {
    if matches!(app.theme, Theme::Light) {
        frame.render_widget(
            Block::default().style(Style::default().bg(app.theme.bg())),
            frame.area(),
        );
    }

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header bar
            Constraint::Min(1),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_header(frame, main_layout[0], app);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(30),
            Constraint::Min(40),
            Constraint::Percentage(35),
        ])
        .split(main_layout[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(5)])
        .split(columns[0]);
    dashboard::draw_device_selector(frame, left[0], app);
    dashboard::draw_temperature_card(frame, left[1], app);

    let center = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(14), Constraint::Min(5)])
        .split(columns[1]);
    dashboard::draw_stats_panel(frame, center[0], app);
    chart::draw_trend_chart(frame, center[1], app);

    chat::draw_chat_panel(frame, columns[2], app);

    draw_status_bar(frame, main_layout[2], app);

    if app.show_help {
        overlays::draw_help_overlay(frame);
    }

    overlays::draw_add_device_dialog(frame, app);

    // Alert dialog (on top of everything)
    overlays::draw_alert_dialog(frame, app);
}

/// Draw the header bar with app title and indicators.
fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let theme = app.app_theme();

    let mut spans = vec![
        Span::styled(
            " 溫度監控儀表板 ",
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            concat!("v", env!("CARGO_PKG_VERSION"), " "),
            Style::default().fg(theme.text_muted),
        ),
    ];

    if app.devices_loaded {
        spans.push(Span::styled(
            format!(" {} devices ", app.devices.len()),
            Style::default().fg(theme.success),
        ));
    } else {
        spans.push(Span::styled(" loading ", Style::default().fg(theme.warning)));
    }

    if let Some(device) = app.selected_device() {
        spans.push(Span::styled(
            format!(" > {} ", device.name),
            Style::default().fg(theme.text_primary),
        ));
    }

    let pending = app.chat.pending_count();
    if pending > 0 {
        spans.push(Span::styled(
            format!(" ASK:{} ", pending),
            Style::default().fg(theme.warning),
        ));
    }

    if matches!(app.theme, Theme::Light) {
        spans.push(Span::styled(" LIGHT ", Style::default().fg(theme.warning)));
    } else {
        spans.push(Span::styled(" DARK ", Style::default().fg(theme.primary)));
    }

    let header = Paragraph::new(Line::from(spans)).style(theme.header_style());
    frame.render_widget(header, area);
}

/// Get context-sensitive help hints based on current state.
fn context_hints(app: &App) -> Vec<(&'static str, &'static str)> {
    match app.input_mode {
        InputMode::Chat => vec![("Enter", "send"), ("Esc", "done")],
        InputMode::AddDevice => vec![("Enter", "add"), ("Esc", "cancel")],
        InputMode::Normal => {
            let mut hints = vec![("?", "help"), ("j/k", "move"), ("Enter", "select")];
            if app.selected_device_id.is_some() {
                hints.push(("i", "ask"));
                hints.push(("r", "refresh"));
            }
            hints.push(("a", "add"));
            hints.push(("q", "quit"));
            hints
        }
    }
}

/// Draw the status bar with context-sensitive help.
fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let theme = app.app_theme();
    let time_str = Local::now().format("%H:%M:%S").to_string();

    let left_spans = if let Some(msg) = &app.status_message {
        vec![Span::styled(
            format!(" {}", msg),
            Style::default().fg(theme.danger),
        )]
    } else {
        let hints = context_hints(app);
        let mut spans = vec![Span::raw(" ")];
        for (i, (key, desc)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", Style::default().fg(theme.text_muted)));
            }
            spans.push(Span::styled(
                *key,
                Style::default()
                    .fg(theme.primary)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(
                format!(" {}", desc),
                Style::default().fg(theme.text_muted),
            ));
        }
        spans
    };

    let status_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(10)])
        .split(area);

    frame.render_widget(Paragraph::new(Line::from(left_spans)), status_layout[0]);

    let right = Paragraph::new(time_str)
        .style(Style::default().fg(theme.text_muted))
        .alignment(Alignment::Right);
    frame.render_widget(right, status_layout[1]);
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use tempdash_core::DashboardEvent;
    use tempdash_types::{Device, TelemetrySeries};

    use super::*;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        buffer_text(&terminal)
    }

    #[test]
    fn test_draw_initial_state() {
        let app = App::new(None, vec!["狀況如何？".to_string()], Theme::Dark);
        let text = render(&app);
        assert!(text.contains("loading"));
        assert!(text.contains("quit"));
    }

    #[test]
    fn test_draw_with_reading() {
        let mut app = App::new(None, Vec::new(), Theme::Light);
        app.handle_event(DashboardEvent::DevicesLoaded {
            devices: vec![Device::new("d1", "Kitchen")],
        });
        app.select_device(Some("d1".to_string()));
        app.handle_event(DashboardEvent::LatestReading {
            device_id: "d1".to_string(),
            series: TelemetrySeries::default(),
        });
        let text = render(&app);
        assert!(text.contains("Kitchen"));
        assert!(text.contains("LIGHT"));
    }

    #[test]
    fn test_draw_overlays() {
        let mut app = App::new(None, Vec::new(), Theme::Dark);
        app.show_help = true;
        app.alert = Some("x".to_string());
        app.input_mode = InputMode::AddDevice;
        let text = render(&app);
        assert!(text.contains("OK"));
    }

    #[test]
    fn test_draw_small_terminal() {
        let app = App::new(None, Vec::new(), Theme::Dark);
        let mut terminal = Terminal::new(TestBackend::new(20, 6)).unwrap();
        terminal.draw(|f| draw(f, &app)).unwrap();
    }
}
