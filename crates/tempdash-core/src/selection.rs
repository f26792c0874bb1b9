//! Device selection lifecycle.
//!
//! [`SelectionManager`] is the only owner of polling loops. Selecting a
//! device loads its chart once and starts two loops: the real-time reading
//! and the statistics refresh. Changing or clearing the selection stops the
//! previous pair before anything new is started, so at most one pair is ever
//! alive and no request for a deselected device is issued afterwards.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use tempdash_types::HistoryQuery;

use crate::api::DashboardApi;
use crate::error::ClientError;
use crate::messages::DashboardEvent;
use crate::polling::PollingTask;

/// Logged when the statistics endpoint fails without an `{error}` message.
pub const STATS_FALLBACK_ERROR: &str = "獲取統計數據失敗";

/// Periods of the two polling loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingIntervals {
    /// Latest-reading refresh.
    pub realtime: Duration,
    /// Statistics refresh.
    pub stats: Duration,
}

impl Default for PollingIntervals {
    fn default() -> Self {
        Self {
            realtime: Duration::from_secs(5),
            stats: Duration::from_secs(60),
        }
    }
}

/// Polling state for the selected device.
#[derive(Debug)]
struct ActiveSelection {
    device_id: String,
    cancel_token: CancellationToken,
    realtime: PollingTask,
    stats: PollingTask,
}

impl ActiveSelection {
    async fn stop(self) {
        self.cancel_token.cancel();
        self.realtime.stop().await;
        self.stats.stop().await;
    }
}

/// Starts and stops the polling loops as the selection changes.
pub struct SelectionManager {
    api: Arc<dyn DashboardApi>,
    events: mpsc::Sender<DashboardEvent>,
    intervals: PollingIntervals,
    history_query: HistoryQuery,
    active: Option<ActiveSelection>,
}

impl std::fmt::Debug for SelectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionManager")
            .field("intervals", &self.intervals)
            .field("history_query", &self.history_query)
            .field("active", &self.active_device())
            .finish()
    }
}

impl SelectionManager {
    /// Create a manager with default intervals and the hourly chart query.
    pub fn new(api: Arc<dyn DashboardApi>, events: mpsc::Sender<DashboardEvent>) -> Self {
        Self {
            api,
            events,
            intervals: PollingIntervals::default(),
            history_query: HistoryQuery::hourly_temperature(),
            active: None,
        }
    }

    /// Override the polling periods.
    #[must_use]
    pub fn with_intervals(mut self, intervals: PollingIntervals) -> Self {
        self.intervals = intervals;
        self
    }

    /// Override the chart query.
    #[must_use]
    pub fn with_history_query(mut self, query: HistoryQuery) -> Self {
        self.history_query = query;
        self
    }

    /// Currently selected device.
    pub fn active_device(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.device_id.as_str())
    }

    /// Number of polling loops currently running.
    pub fn active_task_count(&self) -> usize {
        self.active.as_ref().map_or(0, |a| {
            usize::from(a.realtime.is_running()) + usize::from(a.stats.is_running())
        })
    }

    /// Change the selection.
    ///
    /// `None` or an empty id clears it. Any previous loops are stopped
    /// before the new ones start.
    pub async fn select(&mut self, device_id: Option<String>) {
        let device_id = device_id.filter(|id| !id.is_empty());

        if let Some(previous) = self.active.take() {
            debug!(device_id = %previous.device_id, "Stopping polling");
            previous.stop().await;
        }

        let Some(device_id) = device_id else {
            info!("Selection cleared");
            return;
        };

        info!(device_id = %device_id, "Device selected");
        let cancel_token = CancellationToken::new();
        self.spawn_chart_load(&device_id, &cancel_token);
        let realtime = self.spawn_realtime(&device_id, &cancel_token);
        let stats = self.spawn_stats(&device_id, &cancel_token);

        self.active = Some(ActiveSelection {
            device_id,
            cancel_token,
            realtime,
            stats,
        });
    }

    /// Load the chart again for the selected device.
    pub fn reload_chart(&self) {
        if let Some(active) = &self.active {
            self.spawn_chart_load(&active.device_id, &active.cancel_token);
        }
    }

    /// Restart the loops for the selected device, fetching everything now.
    pub async fn refresh(&mut self) {
        let current = self.active_device().map(String::from);
        if current.is_some() {
            self.select(current).await;
        }
    }

    /// Stop all polling.
    pub async fn shutdown(&mut self) {
        self.select(None).await;
    }

    fn spawn_chart_load(&self, device_id: &str, cancel_token: &CancellationToken) {
        let api = Arc::clone(&self.api);
        let tx = self.events.clone();
        let query = self.history_query.clone();
        let device_id = device_id.to_string();
        let token = cancel_token.clone();

        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {}
                _ = load_chart(api.as_ref(), &tx, &device_id, &query) => {}
            }
        });
    }

    fn spawn_realtime(&self, device_id: &str, cancel_token: &CancellationToken) -> PollingTask {
        let api = Arc::clone(&self.api);
        let tx = self.events.clone();
        let id = device_id.to_string();

        PollingTask::spawn(
            "realtime",
            device_id,
            self.intervals.realtime,
            cancel_token,
            move || {
                let api = Arc::clone(&api);
                let tx = tx.clone();
                let id = id.clone();
                async move { poll_latest(api.as_ref(), &tx, &id).await }
            },
        )
    }

    fn spawn_stats(&self, device_id: &str, cancel_token: &CancellationToken) -> PollingTask {
        let api = Arc::clone(&self.api);
        let tx = self.events.clone();
        let id = device_id.to_string();

        PollingTask::spawn(
            "stats",
            device_id,
            self.intervals.stats,
            cancel_token,
            move || {
                let api = Arc::clone(&api);
                let tx = tx.clone();
                let id = id.clone();
                async move { poll_stats(api.as_ref(), &tx, &id).await }
            },
        )
    }
}

async fn poll_latest(api: &dyn DashboardApi, tx: &mpsc::Sender<DashboardEvent>, device_id: &str) {
    let event = match api.latest(device_id).await {
        Ok(series) => {
            debug!(device_id, samples = series.temperature.len(), "Latest reading");
            DashboardEvent::LatestReading {
                device_id: device_id.to_string(),
                series,
            }
        }
        Err(e) => {
            warn!(device_id, error = %e, "Real-time update failed");
            DashboardEvent::ReadingError {
                device_id: device_id.to_string(),
                error: e.to_string(),
            }
        }
    };
    let _ = tx.send(event).await;
}

async fn poll_stats(api: &dyn DashboardApi, tx: &mpsc::Sender<DashboardEvent>, device_id: &str) {
    let event = match api.stats(device_id).await {
        Ok(stats) => {
            debug!(device_id, days = stats.daily_breakdown.len(), "Statistics loaded");
            DashboardEvent::StatsLoaded {
                device_id: device_id.to_string(),
                stats,
            }
        }
        Err(e) => {
            let error = stats_error_message(&e);
            warn!(device_id, error = %error, "Statistics load failed");
            DashboardEvent::StatsError {
                device_id: device_id.to_string(),
                error,
            }
        }
    };
    let _ = tx.send(event).await;
}

async fn load_chart(
    api: &dyn DashboardApi,
    tx: &mpsc::Sender<DashboardEvent>,
    device_id: &str,
    query: &HistoryQuery,
) {
    let event = match api.history(device_id, query).await {
        Ok(series) => {
            let points = series.chart_points();
            let dropped = series.temperature.len() - points.len();
            if dropped > 0 {
                debug!(device_id, dropped, "Skipped non-numeric history values");
            }
            DashboardEvent::ChartLoaded {
                device_id: device_id.to_string(),
                points,
            }
        }
        Err(e) => {
            warn!(device_id, error = %e, "Chart load failed");
            DashboardEvent::ChartError {
                device_id: device_id.to_string(),
                error: e.to_string(),
            }
        }
    };
    let _ = tx.send(event).await;
}

/// The backend's `{error}` message, or a generic fallback.
fn stats_error_message(err: &ClientError) -> String {
    match err {
        ClientError::ApiError { message, .. } if !message.is_empty() => message.clone(),
        _ => STATS_FALLBACK_ERROR.to_string(),
    }
}
