//! In-memory backend for testing.
//!
//! [`MockApi`] implements [`DashboardApi`] without any network, so the
//! selection lifecycle and the terminal front end can be exercised
//! deterministically (including under `tokio::time::pause`).
//!
//! # Features
//!
//! - **Per-device data**: latest reading, statistics and history keyed by id
//! - **Failure injection**: every call fails with a configurable message
//! - **Latency simulation**: artificial delay before each response
//! - **Call log**: every request is recorded as an [`ApiCall`]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use tempdash_types::{
    AskReply, Device, HistoryQuery, StatsSnapshot, TelemetryPoint, TelemetrySeries,
    TelemetryValue,
};

use crate::api::DashboardApi;
use crate::error::{ClientError, Result};

/// A request observed by [`MockApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    ListDevices,
    AddDevice(String),
    Stats(String),
    Latest(String),
    History(String, HistoryQuery),
    Ask(String, String),
}

impl ApiCall {
    /// Device the call targeted, if any.
    pub fn device_id(&self) -> Option<&str> {
        match self {
            Self::Stats(id) | Self::Latest(id) | Self::History(id, _) | Self::Ask(id, _) => {
                Some(id)
            }
            Self::ListDevices | Self::AddDevice(_) => None,
        }
    }
}

/// A mock dashboard backend.
///
/// # Example
///
/// ```
/// use tempdash_core::{DashboardApi, MockApi};
///
/// #[tokio::main]
/// async fn main() {
///     let api = MockApi::new();
///     api.add_device("Kitchen").await.unwrap();
///     api.set_latest_value("mock-1", "21.5").await;
///
///     let series = api.latest("mock-1").await.unwrap();
///     assert_eq!(series.first().unwrap().value.as_f64(), Some(21.5));
/// }
/// ```
pub struct MockApi {
    devices: RwLock<Vec<Device>>,
    latest: RwLock<HashMap<String, TelemetrySeries>>,
    stats: RwLock<HashMap<String, StatsSnapshot>>,
    history: RwLock<HashMap<String, TelemetrySeries>>,
    ask_reply: RwLock<Option<AskReply>>,
    next_id: AtomicU32,
    should_fail: AtomicBool,
    fail_message: RwLock<String>,
    /// Simulated response latency in milliseconds (0 = no delay).
    latency_ms: AtomicU64,
    calls: Mutex<Vec<ApiCall>>,
}

impl std::fmt::Debug for MockApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockApi")
            .field("should_fail", &self.should_fail.load(Ordering::Relaxed))
            .field("latency_ms", &self.latency_ms.load(Ordering::Relaxed))
            .field("calls", &self.call_count())
            .finish()
    }
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockApi {
    /// Create an empty backend with no devices.
    pub fn new() -> Self {
        Self {
            devices: RwLock::new(Vec::new()),
            latest: RwLock::new(HashMap::new()),
            stats: RwLock::new(HashMap::new()),
            history: RwLock::new(HashMap::new()),
            ask_reply: RwLock::new(None),
            next_id: AtomicU32::new(1),
            should_fail: AtomicBool::new(false),
            fail_message: RwLock::new("Mock failure".to_string()),
            latency_ms: AtomicU64::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Create a backend preloaded with devices.
    pub fn with_devices(devices: Vec<Device>) -> Self {
        Self {
            devices: RwLock::new(devices),
            ..Self::new()
        }
    }

    /// Replace the device list.
    pub async fn set_devices(&self, devices: Vec<Device>) {
        *self.devices.write().await = devices;
    }

    /// Set the latest reading for a device.
    pub async fn set_latest(&self, device_id: &str, series: TelemetrySeries) {
        self.latest
            .write()
            .await
            .insert(device_id.to_string(), series);
    }

    /// Set the latest reading to a single text value.
    pub async fn set_latest_value(&self, device_id: &str, value: &str) {
        let series = TelemetrySeries {
            temperature: vec![TelemetryPoint::new(
                None,
                TelemetryValue::Text(value.to_string()),
            )],
        };
        self.set_latest(device_id, series).await;
    }

    /// Set the statistics for a device.
    pub async fn set_stats(&self, device_id: &str, stats: StatsSnapshot) {
        self.stats.write().await.insert(device_id.to_string(), stats);
    }

    /// Set the history for a device.
    pub async fn set_history(&self, device_id: &str, series: TelemetrySeries) {
        self.history
            .write()
            .await
            .insert(device_id.to_string(), series);
    }

    /// Fix the reply to every question. By default the question is echoed.
    pub async fn set_ask_reply(&self, reply: AskReply) {
        *self.ask_reply.write().await = Some(reply);
    }

    /// Make every subsequent call fail.
    pub async fn set_should_fail(&self, fail: bool, message: Option<&str>) {
        self.should_fail.store(fail, Ordering::Relaxed);
        if let Some(msg) = message {
            *self.fail_message.write().await = msg.to_string();
        }
    }

    /// Set simulated response latency.
    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms
            .store(latency.as_millis() as u64, Ordering::Relaxed);
    }

    /// Every call seen so far, in order.
    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls
            .lock()
            .map(|c| c.clone())
            .unwrap_or_else(|e| e.into_inner().clone())
    }

    /// Number of calls seen so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }

    /// Calls that targeted `device_id`.
    pub fn calls_for(&self, device_id: &str) -> Vec<ApiCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.device_id() == Some(device_id))
            .collect()
    }

    /// Forget recorded calls.
    pub fn clear_calls(&self) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.clear();
        }
    }

    async fn record(&self, call: ApiCall) -> Result<()> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }

        let latency = self.latency_ms.load(Ordering::Relaxed);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }

        if self.should_fail.load(Ordering::Relaxed) {
            Err(ClientError::ApiError {
                status: 500,
                message: self.fail_message.read().await.clone(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DashboardApi for MockApi {
    async fn list_devices(&self) -> Result<Vec<Device>> {
        self.record(ApiCall::ListDevices).await?;
        Ok(self.devices.read().await.clone())
    }

    async fn add_device(&self, name: &str) -> Result<()> {
        self.record(ApiCall::AddDevice(name.to_string())).await?;
        if name.is_empty() {
            return Err(ClientError::ApiError {
                status: 400,
                message: "需要設備名稱".to_string(),
            });
        }
        let id = format!("mock-{}", self.next_id.fetch_add(1, Ordering::Relaxed));
        self.devices.write().await.push(Device::new(id, name));
        Ok(())
    }

    async fn stats(&self, device_id: &str) -> Result<StatsSnapshot> {
        self.record(ApiCall::Stats(device_id.to_string())).await?;
        self.stats
            .read()
            .await
            .get(device_id)
            .cloned()
            .ok_or_else(|| ClientError::ApiError {
                status: 404,
                message: "過去7天內沒有找到溫度數據".to_string(),
            })
    }

    async fn latest(&self, device_id: &str) -> Result<TelemetrySeries> {
        self.record(ApiCall::Latest(device_id.to_string())).await?;
        Ok(self
            .latest
            .read()
            .await
            .get(device_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn history(&self, device_id: &str, query: &HistoryQuery) -> Result<TelemetrySeries> {
        self.record(ApiCall::History(device_id.to_string(), query.clone()))
            .await?;
        Ok(self
            .history
            .read()
            .await
            .get(device_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn ask(&self, device_id: &str, question: &str) -> Result<AskReply> {
        self.record(ApiCall::Ask(device_id.to_string(), question.to_string()))
            .await?;
        Ok(self
            .ask_reply
            .read()
            .await
            .clone()
            .unwrap_or_else(|| AskReply::Analysis(format!("{device_id}: {question}"))))
    }
}
