//! Data-fetching and polling layer for the tempdash sensor dashboard.
//!
//! This crate talks to the dashboard backend over HTTP and owns the lifecycle
//! of the per-device polling loops. It has no knowledge of rendering: results
//! flow out as [`DashboardEvent`]s for a front end to turn into text.
//!
//! # Features
//!
//! - **Backend client**: devices, latest reading, statistics, hourly history, analysis
//! - **Selection lifecycle**: one real-time loop and one statistics loop per selected device
//! - **Cancellation**: switching devices stops the old loops, including in-flight requests
//! - **Testing**: [`MockApi`] with failure injection, latency and a call log
//!
//! # Polling
//!
//! | Loop | Endpoint | Period |
//! |------|----------|--------|
//! | Real-time | `/api/device/:id/latest` | 5 s |
//! | Statistics | `/api/device/:id/stats` | 60 s |
//! | Chart (once per selection) | `/api/device/:id/history` | - |
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use tempdash_core::{DashboardClient, SelectionManager};
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Arc::new(DashboardClient::new("http://localhost:5001")?);
//!     let (tx, mut rx) = mpsc::channel(64);
//!
//!     let mut selection = SelectionManager::new(client, tx);
//!     selection.select(Some("device-id".to_string())).await;
//!
//!     while let Some(event) = rx.recv().await {
//!         println!("{event:?}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod error;
pub mod messages;
pub mod mock;
pub mod polling;
pub mod selection;

pub use api::DashboardApi;
pub use client::{ASK_TIMEOUT, DEFAULT_TIMEOUT, DashboardClient};
pub use error::{ClientError, Result};
pub use messages::{Command, DashboardEvent};
pub use mock::{ApiCall, MockApi};
pub use polling::PollingTask;
pub use selection::{PollingIntervals, STATS_FALLBACK_ERROR, SelectionManager};

// Re-export the wire types
pub use tempdash_types::{
    AskReply, ChartPoint, DailyStats, Device, HistoryQuery, PeriodStats, StatsSnapshot,
    TelemetryPoint, TelemetrySeries, TelemetryValue, WeekStats,
};
