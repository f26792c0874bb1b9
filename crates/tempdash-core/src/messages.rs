//! Message types for UI/worker communication.
//!
//! ```text
//! +------------------+     Command      +-------------------+
//! |    UI Thread     | --------------> |  DashboardWorker  |
//! |    (ratatui)     |                 |  (tokio runtime)  |
//! |                  | <-------------- |                   |
//! +------------------+  DashboardEvent +-------------------+
//! ```
//!
//! - [`Command`]: Messages sent from the UI thread to the background worker
//! - [`DashboardEvent`]: Events sent from the worker back to the UI thread
//!
//! Every device-scoped event carries the id it was fetched for, so the UI
//! can ignore results that arrive after the selection moved on.

use tempdash_types::{AskReply, ChartPoint, Device, StatsSnapshot, TelemetrySeries};

/// Commands sent from the UI thread to the background worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fetch the device list.
    LoadDevices,

    /// Register a new device, then reload the list on success.
    AddDevice {
        /// Display name of the new device.
        name: String,
    },

    /// Change the selected device. `None` clears the selection.
    SelectDevice {
        device_id: Option<String>,
    },

    /// Reload the chart for the selected device.
    RefreshChart,

    /// Restart both polling loops for the selected device.
    Refresh,

    /// Relay a question to the analysis endpoint.
    Ask {
        /// Correlates the answer with its pending chat message.
        request_id: u64,
        device_id: String,
        question: String,
    },

    /// Shut down the worker.
    Shutdown,
}

/// Events sent from the background worker to the UI thread.
#[derive(Debug, Clone)]
pub enum DashboardEvent {
    /// The device list was fetched.
    DevicesLoaded { devices: Vec<Device> },

    /// The device list could not be fetched.
    DevicesError { error: String },

    /// A device was registered.
    DeviceAdded { name: String },

    /// Registering a device failed.
    AddDeviceError { name: String, error: String },

    /// A real-time tick returned a payload.
    LatestReading {
        device_id: String,
        series: TelemetrySeries,
    },

    /// A real-time tick failed.
    ReadingError { device_id: String, error: String },

    /// Statistics were fetched.
    StatsLoaded {
        device_id: String,
        stats: StatsSnapshot,
    },

    /// Statistics could not be fetched.
    StatsError { device_id: String, error: String },

    /// Hourly chart data was fetched.
    ChartLoaded {
        device_id: String,
        points: Vec<ChartPoint>,
    },

    /// Chart data could not be fetched.
    ChartError { device_id: String, error: String },

    /// The analysis endpoint answered (possibly with a refusal).
    AskAnswered { request_id: u64, reply: AskReply },

    /// The question never got a usable answer.
    AskFailed { request_id: u64, error: String },
}

impl DashboardEvent {
    /// Device the event belongs to, for device-scoped events.
    pub fn device_id(&self) -> Option<&str> {
        match self {
            Self::LatestReading { device_id, .. }
            | Self::ReadingError { device_id, .. }
            | Self::StatsLoaded { device_id, .. }
            | Self::StatsError { device_id, .. }
            | Self::ChartLoaded { device_id, .. }
            | Self::ChartError { device_id, .. } => Some(device_id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_scoped_events() {
        let event = DashboardEvent::ReadingError {
            device_id: "d1".to_string(),
            error: "timeout".to_string(),
        };
        assert_eq!(event.device_id(), Some("d1"));

        let event = DashboardEvent::DevicesLoaded { devices: vec![] };
        assert_eq!(event.device_id(), None);

        let event = DashboardEvent::AskFailed {
            request_id: 1,
            error: "x".to_string(),
        };
        assert_eq!(event.device_id(), None);
    }
}
