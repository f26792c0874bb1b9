//! Application state for the TUI.
//!
//! [`App`] is the rendering layer: it turns [`DashboardEvent`]s into the
//! strings the widgets draw and turns user intent into [`Command`]s for the
//! worker. It owns no channels and does no I/O, so every transition can be
//! tested without a terminal.

use chrono::Local;
use tracing::{debug, error, info, warn};

use tempdash_core::{Command, DashboardEvent};
use tempdash_types::{AskReply, DailyStats, Device, StatsSnapshot};

use super::errors::format_status_error;
use super::ui::theme::AppTheme;
use crate::format::{format_ask_reply, format_latest, stat_fields};

/// First selector entry, meaning "no device".
pub const DEVICE_PLACEHOLDER: &str = "-- 請選擇一個設備 --";
/// Temperature text while nothing has been read.
pub const TEMPERATURE_PLACEHOLDER: &str = "-- °C";
/// Temperature text after a failed real-time tick.
pub const UPDATE_FAILED: &str = "更新失敗";
/// Statistics value before the first load.
pub const STAT_PLACEHOLDER: &str = "--";
/// Title of the history chart.
pub const CHART_TITLE: &str = "每週溫度趨勢 (每小時平均)";
/// Pending AI message text.
pub const THINKING: &str = "思考中...";
/// AI message shown when the analysis request failed outright.
pub const ASK_APOLOGY: &str = "抱歉，與伺服器連線時發生錯誤。";

pub const ALERT_DEVICES_FAILED: &str = "無法載入設備列表，請檢查後端服務是否已啟動。";
pub const ALERT_DEVICE_ADDED: &str = "設備新增成功！";
pub const ALERT_ADD_FAILED: &str = "設備新增失敗！";
pub const ALERT_NAME_REQUIRED: &str = "請輸入設備名稱";
pub const ALERT_ASK_REQUIRES: &str = "請先選擇設備並輸入問題";

/// UI theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Parse the configured theme name, defaulting to dark.
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("light") {
            Self::Light
        } else {
            Self::Dark
        }
    }

    /// Toggle between dark and light.
    pub fn toggle(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Get background color for this theme.
    pub fn bg(self) -> ratatui::style::Color {
        match self {
            Self::Dark => ratatui::style::Color::Reset,
            Self::Light => ratatui::style::Color::White,
        }
    }
}

/// Which text field, if any, receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing a chat question.
    Chat,
    /// Typing the name of a new device.
    AddDevice,
}

/// One row of the daily breakdown table.
#[derive(Debug, Clone, PartialEq)]
pub enum BreakdownRow {
    Day(DailyStats),
    /// The single placeholder row shown when the backend sent no days.
    Empty,
}

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Ai,
}

impl ChatRole {
    /// Prefix drawn before the message text.
    pub fn label(self) -> &'static str {
        match self {
            Self::User => "您",
            Self::Ai => "AI",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    /// Set on the `思考中...` placeholder of an unanswered question.
    pub pending_request: Option<u64>,
}

impl ChatMessage {
    fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
            pending_request: None,
        }
    }

    fn ai(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Ai,
            text: text.into(),
            pending_request: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending_request.is_some()
    }
}

/// Append-only chat history for the session.
///
/// Every mutation snaps the view back to the newest message.
#[derive(Debug, Default)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
    /// Lines scrolled up from the bottom.
    scroll_from_bottom: u16,
    next_request_id: u64,
}

impl ChatLog {
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn scroll_from_bottom(&self) -> u16 {
        self.scroll_from_bottom
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(lines);
    }

    /// Number of questions still waiting for an answer.
    pub fn pending_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_pending()).count()
    }

    fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
        self.scroll_from_bottom = 0;
    }

    /// Append a question and its placeholder, returning the request id.
    fn push_question(&mut self, question: &str) -> u64 {
        self.next_request_id += 1;
        let request_id = self.next_request_id;
        self.push(ChatMessage::user(question));
        self.push(ChatMessage {
            role: ChatRole::Ai,
            text: THINKING.to_string(),
            pending_request: Some(request_id),
        });
        request_id
    }

    /// Remove the placeholder of `request_id` and append the answer.
    ///
    /// Returns false for an unknown or already answered request.
    fn resolve(&mut self, request_id: u64, answer: String) -> bool {
        let Some(pos) = self
            .messages
            .iter()
            .position(|m| m.pending_request == Some(request_id))
        else {
            return false;
        };
        self.messages.remove(pos);
        self.push(ChatMessage::ai(answer));
        true
    }
}

/// Main application state for the TUI.
#[derive(Debug)]
pub struct App {
    /// Whether the application should exit.
    pub should_quit: bool,
    /// Selectable devices in backend order.
    pub devices: Vec<Device>,
    /// Highlighted selector row. 0 is the placeholder, `i + 1` is `devices[i]`.
    pub selector_index: usize,
    /// Device whose data is shown.
    pub selected_device_id: Option<String>,
    /// Name auto-selected whenever the list loads.
    pub default_device: Option<String>,
    pub devices_loaded: bool,

    pub temperature_text: String,
    pub last_update: String,
    pub stats_visible: bool,
    pub stat_values: [(&'static str, String); 8],
    pub breakdown: Vec<BreakdownRow>,
    /// `(epoch ms, °C)` points of the current chart, if one is loaded.
    pub chart: Option<Vec<(f64, f64)>>,

    pub chat: ChatLog,
    pub chat_input: String,
    pub device_name_input: String,
    pub suggested_replies: Vec<String>,

    pub input_mode: InputMode,
    /// Blocking message; every other input waits until it is dismissed.
    pub alert: Option<String>,
    /// Non-blocking hint shown in the status bar.
    pub status_message: Option<String>,
    pub show_help: bool,
    pub theme: Theme,
}

fn placeholder_stats() -> [(&'static str, String); 8] {
    stat_fields(&StatsSnapshot::default()).map(|(label, _)| (label, STAT_PLACEHOLDER.to_string()))
}

impl App {
    /// Create a new application state.
    pub fn new(default_device: Option<String>, suggested_replies: Vec<String>, theme: Theme) -> Self {
        Self {
            should_quit: false,
            devices: Vec::new(),
            selector_index: 0,
            selected_device_id: None,
            default_device: default_device.filter(|n| !n.is_empty()),
            devices_loaded: false,
            temperature_text: TEMPERATURE_PLACEHOLDER.to_string(),
            last_update: String::new(),
            stats_visible: false,
            stat_values: placeholder_stats(),
            breakdown: Vec::new(),
            chart: None,
            chat: ChatLog::default(),
            chat_input: String::new(),
            device_name_input: String::new(),
            suggested_replies,
            input_mode: InputMode::Normal,
            alert: None,
            status_message: None,
            show_help: false,
            theme,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Selector rows: the placeholder followed by device names.
    pub fn selector_entries(&self) -> Vec<&str> {
        std::iter::once(DEVICE_PLACEHOLDER)
            .chain(self.devices.iter().map(|d| d.name.as_str()))
            .collect()
    }

    /// The device currently shown.
    pub fn selected_device(&self) -> Option<&Device> {
        let id = self.selected_device_id.as_deref()?;
        self.devices.iter().find(|d| d.id == id)
    }

    /// Move the selector highlight down.
    pub fn select_next(&mut self) {
        if self.selector_index < self.devices.len() {
            self.selector_index += 1;
        }
    }

    /// Move the selector highlight up.
    pub fn select_previous(&mut self) {
        self.selector_index = self.selector_index.saturating_sub(1);
    }

    /// Apply the highlighted selector row.
    pub fn confirm_selection(&mut self) -> Command {
        let device_id = self
            .selector_index
            .checked_sub(1)
            .and_then(|i| self.devices.get(i))
            .map(|d| d.id.clone());
        self.select_device(device_id)
    }

    /// Change the shown device and reset every display to its placeholder.
    ///
    /// An empty id clears the selection.
    pub fn select_device(&mut self, device_id: Option<String>) -> Command {
        let device_id = device_id.filter(|id| !id.is_empty());
        info!(device_id = ?device_id, "Selection changed");

        self.selected_device_id = device_id.clone();
        self.sync_selector_index();

        self.stats_visible = device_id.is_some();
        self.temperature_text = TEMPERATURE_PLACEHOLDER.to_string();
        self.last_update.clear();
        self.stat_values = placeholder_stats();
        self.breakdown.clear();
        self.chart = None;
        self.status_message = None;

        Command::SelectDevice { device_id }
    }

    fn sync_selector_index(&mut self) {
        self.selector_index = self
            .selected_device_id
            .as_deref()
            .and_then(|id| self.devices.iter().position(|d| d.id == id))
            .map_or(0, |i| i + 1);
    }

    /// Apply an event from the worker, returning any follow-up commands.
    pub fn handle_event(&mut self, event: DashboardEvent) -> Vec<Command> {
        if let Some(device_id) = event.device_id()
            && self.selected_device_id.as_deref() != Some(device_id)
        {
            debug!(device_id, "Dropping event for a device that is no longer selected");
            return Vec::new();
        }

        let mut commands = Vec::new();

        match event {
            DashboardEvent::DevicesLoaded { devices } => {
                commands.extend(self.handle_devices_loaded(devices));
            }
            DashboardEvent::DevicesError { error } => {
                error!(error = %error, "Failed to load device list");
                self.status_message = Some(format_status_error(&error));
                self.alert = Some(ALERT_DEVICES_FAILED.to_string());
            }
            DashboardEvent::DeviceAdded { name } => {
                info!(name = %name, "Device added");
                self.device_name_input.clear();
                self.alert = Some(ALERT_DEVICE_ADDED.to_string());
            }
            DashboardEvent::AddDeviceError { name, error } => {
                error!(name = %name, error = %error, "Failed to add device");
                self.alert = Some(ALERT_ADD_FAILED.to_string());
            }
            DashboardEvent::LatestReading { series, .. } => {
                self.temperature_text = format_latest(&series);
                if series.first().is_some() {
                    self.last_update = format!("最後更新: {}", Local::now().format("%H:%M:%S"));
                }
                self.status_message = None;
            }
            DashboardEvent::ReadingError { error, .. } => {
                self.temperature_text = UPDATE_FAILED.to_string();
                self.status_message = Some(format_status_error(&error));
            }
            DashboardEvent::StatsLoaded { stats, .. } => {
                self.apply_stats(&stats);
            }
            DashboardEvent::StatsError { device_id, error } => {
                warn!(device_id = %device_id, error = %error, "Statistics not updated");
            }
            DashboardEvent::ChartLoaded { points, .. } => {
                self.chart = Some(points.into_iter().map(Into::into).collect());
            }
            DashboardEvent::ChartError { device_id, error } => {
                warn!(device_id = %device_id, error = %error, "Chart not updated");
            }
            DashboardEvent::AskAnswered { request_id, reply } => {
                if let AskReply::Error(ref e) = reply {
                    warn!(request_id, error = ?e, "Analysis refused");
                }
                self.chat.resolve(request_id, format_ask_reply(&reply));
            }
            DashboardEvent::AskFailed { request_id, error } => {
                error!(request_id, error = %error, "Analysis request failed");
                self.chat.resolve(request_id, ASK_APOLOGY.to_string());
            }
        }

        commands
    }

    fn handle_devices_loaded(&mut self, devices: Vec<Device>) -> Option<Command> {
        self.devices = devices.into_iter().filter(Device::is_selectable).collect();
        self.devices_loaded = true;
        info!(count = self.devices.len(), "Device list loaded");

        let preferred = self.default_device.as_deref().and_then(|name| {
            self.devices
                .iter()
                .find(|d| d.name == name)
                .map(|d| d.id.clone())
        });
        let current_exists = self.selected_device().is_some();

        let command = match preferred {
            Some(id) if self.selected_device_id.as_deref() != Some(id.as_str()) => {
                Some(self.select_device(Some(id)))
            }
            Some(_) => None,
            None if self.selected_device_id.is_some() && !current_exists => {
                Some(self.select_device(None))
            }
            None => None,
        };
        self.sync_selector_index();
        command
    }

    fn apply_stats(&mut self, stats: &StatsSnapshot) {
        self.stat_values = stat_fields(stats);
        self.breakdown = if stats.daily_breakdown.is_empty() {
            vec![BreakdownRow::Empty]
        } else {
            stats
                .daily_breakdown
                .iter()
                .cloned()
                .map(BreakdownRow::Day)
                .collect()
        };
    }

    /// Send the typed question.
    ///
    /// Without a selected device or with a blank question nothing is sent
    /// and a blocking alert is shown instead.
    pub fn send_message(&mut self) -> Option<Command> {
        let question = self.chat_input.trim().to_string();
        let Some(device_id) = self.selected_device_id.clone() else {
            self.alert = Some(ALERT_ASK_REQUIRES.to_string());
            return None;
        };
        if question.is_empty() {
            self.alert = Some(ALERT_ASK_REQUIRES.to_string());
            return None;
        }

        self.chat_input.clear();
        let request_id = self.chat.push_question(&question);
        debug!(request_id, device_id = %device_id, "Sending question");

        Some(Command::Ask {
            request_id,
            device_id,
            question,
        })
    }

    /// Fill the chat input with a suggested reply and send it.
    pub fn send_suggested_reply(&mut self, text: &str) -> Option<Command> {
        self.chat_input = text.to_string();
        self.send_message()
    }

    /// Send the `index`-th configured suggestion, if it exists.
    pub fn send_suggestion(&mut self, index: usize) -> Option<Command> {
        let text = self.suggested_replies.get(index)?.clone();
        self.send_suggested_reply(&text)
    }

    /// Register the typed device name.
    ///
    /// The input is kept until the backend confirms, so a failed attempt
    /// can be retried.
    pub fn add_device(&mut self) -> Option<Command> {
        let name = self.device_name_input.trim().to_string();
        if name.is_empty() {
            self.alert = Some(ALERT_NAME_REQUIRED.to_string());
            return None;
        }
        Some(Command::AddDevice { name })
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggle();
    }

    /// Color palette for the current theme.
    pub fn app_theme(&self) -> AppTheme {
        match self.theme {
            Theme::Dark => AppTheme::dark(),
            Theme::Light => AppTheme::light(),
        }
    }
}
