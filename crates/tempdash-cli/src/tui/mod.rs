//! Main entry point for the TUI dashboard.
//!
//! This module ties together all the TUI components and provides the main
//! event loop for the terminal user interface. It handles:
//!
//! - Terminal setup and restoration
//! - Channel creation for worker communication
//! - The main event loop with input handling and rendering
//! - Graceful shutdown coordination

pub mod app;
pub mod errors;
pub mod input;
pub mod ui;
pub mod worker;

pub use app::App;
pub use worker::DashboardWorker;

use std::io::{self, stdout};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tracing::{info, warn};

use tempdash_core::{Command, DashboardApi, DashboardEvent};

use crate::config::Config;
use app::Theme;

/// Set up the terminal for TUI rendering.
///
/// Enables raw mode and switches to the alternate screen buffer.
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to its original state.
pub fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Run the TUI application.
///
/// 1. Creates communication channels between UI and worker
/// 2. Spawns the background worker
/// 3. Requests the device list
/// 4. Runs the main event loop
/// 5. Stops polling and restores the terminal
pub async fn run(config: &Config, api: Arc<dyn DashboardApi>) -> Result<()> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>(32);
    let (event_tx, mut event_rx) = mpsc::channel::<DashboardEvent>(32);

    let worker = DashboardWorker::new(cmd_rx, event_tx, api)
        .with_intervals(config.polling_intervals())
        .with_history_query(config.history_query());
    let worker_handle = tokio::spawn(worker.run());

    let mut app = App::new(
        config.default_device_name().map(str::to_string),
        config.suggested_replies.clone(),
        Theme::from_name(&config.tui.theme),
    );

    let mut terminal = setup_terminal()?;
    info!("TUI started");

    send_command(&cmd_tx, Command::LoadDevices);

    let result = run_event_loop(&mut terminal, &mut app, &cmd_tx, &mut event_rx).await;

    send_command(&cmd_tx, Command::Shutdown);

    restore_terminal()?;

    if let Err(e) = worker_handle.await {
        warn!("Worker task ended abnormally: {}", e);
    }
    info!("TUI stopped");

    result
}

fn send_command(tx: &mpsc::Sender<Command>, cmd: Command) {
    if let Err(e) = tx.try_send(cmd) {
        warn!("Dropped command: {}", e);
    }
}

/// Main event loop for the TUI.
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    command_tx: &mpsc::Sender<Command>,
    event_rx: &mut mpsc::Receiver<DashboardEvent>,
) -> Result<()> {
    while !app.should_quit() {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                app.should_quit = true;
                continue;
            }
            let action = input::handle_key(key.code, app.input_mode, app.alert.is_some());
            if let Some(cmd) = input::apply_action(app, action) {
                send_command(command_tx, cmd);
            }
        }

        // Non-blocking receive of worker events
        while let Ok(event) = event_rx.try_recv() {
            for cmd in app.handle_event(event) {
                send_command(command_tx, cmd);
            }
        }

        // Yield so the worker's tasks make progress on a busy runtime.
        tokio::task::yield_now().await;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use app::InputMode;

    #[test]
    fn test_draw_newest_first_chart_spans_the_week() {
        use ratatui::backend::TestBackend;
        use tempdash_types::{ChartPoint, Device};

        use crate::format::format_timestamp_ms;

        let mut app = App::new(None, Vec::new(), Theme::Dark);
        app.handle_event(DashboardEvent::DevicesLoaded {
            devices: vec![Device::new("d1", "Kitchen")],
        });
        app.select_device(Some("d1".to_string()));
        app.handle_event(DashboardEvent::ChartLoaded {
            device_id: "d1".to_string(),
            points: vec![
                ChartPoint { x: 604_800_000.0, y: 21.0 },
                ChartPoint { x: 302_400_000.0, y: 20.0 },
                ChartPoint { x: 0.0, y: 19.0 },
            ],
        });

        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal.draw(|f| ui::draw(f, &app)).unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();

        assert!(text.contains("18.5"), "{}", text);
        assert!(text.contains("21.5"), "{}", text);
        assert!(text.contains(&format_timestamp_ms(0, "%m-%d %H:%M")), "{}", text);
    }

    #[test]
    fn test_input_handling_quit() {
        let action = input::handle_key(KeyCode::Char('q'), InputMode::Normal, false);
        assert_eq!(action, input::Action::Quit);
    }

    #[test]
    fn test_input_handling_add_device() {
        let action = input::handle_key(KeyCode::Char('a'), InputMode::Normal, false);
        assert_eq!(action, input::Action::StartAddDevice);
    }

    #[test]
    fn test_send_command_on_full_channel_does_not_panic() {
        let (tx, _rx) = mpsc::channel::<Command>(1);
        send_command(&tx, Command::Refresh);
        send_command(&tx, Command::Refresh);
    }
}
