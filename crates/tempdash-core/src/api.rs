//! Trait abstraction over the dashboard backend.
//!
//! This module provides the [`DashboardApi`] trait that abstracts over the
//! real HTTP client and the in-memory mock used by tests.

use async_trait::async_trait;

use tempdash_types::{AskReply, Device, HistoryQuery, StatsSnapshot, TelemetrySeries};

use crate::error::Result;

/// Trait abstracting the dashboard backend endpoints.
///
/// Every method is a single request with no retry. Implementations must be
/// cheap to share behind an `Arc` since the polling loops hold their own
/// handle.
///
/// # Example
///
/// ```ignore
/// use tempdash_core::{DashboardApi, Result};
///
/// async fn print_latest<A: DashboardApi>(api: &A, device_id: &str) -> Result<()> {
///     let series = api.latest(device_id).await?;
///     println!("{:?}", series.first());
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// `GET /api/devices`
    async fn list_devices(&self) -> Result<Vec<Device>>;

    /// `POST /api/device` with `{name}`. Succeeds on any 2xx.
    async fn add_device(&self, name: &str) -> Result<()>;

    /// `GET /api/device/:id/stats`
    async fn stats(&self, device_id: &str) -> Result<StatsSnapshot>;

    /// `GET /api/device/:id/latest`
    async fn latest(&self, device_id: &str) -> Result<TelemetrySeries>;

    /// `GET /api/device/:id/history`
    async fn history(&self, device_id: &str, query: &HistoryQuery) -> Result<TelemetrySeries>;

    /// `GET /ask?deviceId=..&q=..`
    ///
    /// The body is interpreted regardless of status, so a backend-side
    /// refusal comes back as [`AskReply::Error`] rather than `Err`.
    async fn ask(&self, device_id: &str, question: &str) -> Result<AskReply>;

    /// Find a device by id first, then by exact name.
    async fn find_device(&self, id_or_name: &str) -> Result<Option<Device>> {
        let devices = self.list_devices().await?;
        let by_id = devices
            .iter()
            .find(|d| d.is_selectable() && d.id == id_or_name)
            .cloned();
        Ok(by_id.or_else(|| {
            devices
                .into_iter()
                .find(|d| d.is_selectable() && d.name == id_or_name)
        }))
    }
}
