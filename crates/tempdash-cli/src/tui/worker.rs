//! Background worker for backend operations.
//!
//! The [`DashboardWorker`] owns the backend handle and the selection
//! lifecycle, keeping the UI thread responsive. It communicates with the UI
//! thread via channels:
//!
//! - Receives [`Command`]s from the UI to perform operations
//! - Sends [`DashboardEvent`]s back to report results
//!
//! Polling loops and chart loads run as their own tasks under the
//! [`SelectionManager`]; analysis questions are spawned as well so a slow
//! answer never delays a device switch.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use tempdash_core::{
    Command, DashboardApi, DashboardEvent, PollingIntervals, SelectionManager,
};
use tempdash_types::HistoryQuery;

/// Background worker that handles backend operations.
pub struct DashboardWorker {
    /// Receiver for commands from the UI thread.
    command_rx: mpsc::Receiver<Command>,
    /// Sender for events back to the UI thread.
    event_tx: mpsc::Sender<DashboardEvent>,
    api: Arc<dyn DashboardApi>,
    selection: SelectionManager,
}

impl DashboardWorker {
    /// Create a new worker with the default polling periods.
    pub fn new(
        command_rx: mpsc::Receiver<Command>,
        event_tx: mpsc::Sender<DashboardEvent>,
        api: Arc<dyn DashboardApi>,
    ) -> Self {
        let selection = SelectionManager::new(Arc::clone(&api), event_tx.clone());
        Self {
            command_rx,
            event_tx,
            api,
            selection,
        }
    }

    /// Override the polling periods.
    #[must_use]
    pub fn with_intervals(mut self, intervals: PollingIntervals) -> Self {
        self.selection = self.selection.with_intervals(intervals);
        self
    }

    /// Override the chart query.
    #[must_use]
    pub fn with_history_query(mut self, query: HistoryQuery) -> Self {
        self.selection = self.selection.with_history_query(query);
        self
    }

    /// Run the worker's main loop.
    ///
    /// This method consumes the worker and runs until a [`Command::Shutdown`]
    /// is received or the command channel is closed. Polling is stopped
    /// before it returns.
    pub async fn run(mut self) {
        info!("DashboardWorker started");

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(Command::Shutdown) => {
                            info!("DashboardWorker received shutdown command");
                            break;
                        }
                        Some(cmd) => {
                            self.handle_command(cmd).await;
                        }
                        None => {
                            info!("Command channel closed, shutting down worker");
                            break;
                        }
                    }
                }
            }
        }

        self.selection.shutdown().await;
        info!("DashboardWorker stopped");
    }

    /// Handle a single command from the UI.
    async fn handle_command(&mut self, cmd: Command) {
        debug!(?cmd, "Handling command");

        match cmd {
            Command::LoadDevices => {
                self.handle_load_devices().await;
            }
            Command::AddDevice { name } => {
                self.handle_add_device(name).await;
            }
            Command::SelectDevice { device_id } => {
                self.selection.select(device_id).await;
            }
            Command::RefreshChart => {
                self.selection.reload_chart();
            }
            Command::Refresh => {
                self.selection.refresh().await;
            }
            Command::Ask {
                request_id,
                device_id,
                question,
            } => {
                self.spawn_ask(request_id, device_id, question);
            }
            Command::Shutdown => {
                // Handled in run()
            }
        }
    }

    async fn handle_load_devices(&self) {
        let event = match self.api.list_devices().await {
            Ok(devices) => {
                info!(count = devices.len(), "Devices loaded");
                DashboardEvent::DevicesLoaded { devices }
            }
            Err(e) => {
                error!(error = %e, "Failed to load devices");
                DashboardEvent::DevicesError {
                    error: e.to_string(),
                }
            }
        };
        self.send(event).await;
    }

    async fn handle_add_device(&self, name: String) {
        match self.api.add_device(&name).await {
            Ok(()) => {
                info!(name = %name, "Device added");
                self.send(DashboardEvent::DeviceAdded { name }).await;
                self.handle_load_devices().await;
            }
            Err(e) => {
                error!(name = %name, error = %e, "Failed to add device");
                self.send(DashboardEvent::AddDeviceError {
                    name,
                    error: e.to_string(),
                })
                .await;
            }
        }
    }

    fn spawn_ask(&self, request_id: u64, device_id: String, question: String) {
        let api = Arc::clone(&self.api);
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            let event = match api.ask(&device_id, &question).await {
                Ok(reply) => DashboardEvent::AskAnswered { request_id, reply },
                Err(e) => {
                    warn!(request_id, device_id = %device_id, error = %e, "Analysis request failed");
                    DashboardEvent::AskFailed {
                        request_id,
                        error: e.to_string(),
                    }
                }
            };
            if let Err(e) = tx.send(event).await {
                error!("Failed to send analysis event: {}", e);
            }
        });
    }

    async fn send(&self, event: DashboardEvent) {
        if let Err(e) = self.event_tx.send(event).await {
            error!("Failed to send event: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tempdash_core::{ApiCall, MockApi};
    use tempdash_types::{AskReply, Device};
    use tokio::time::sleep;

    use super::*;

    struct Harness {
        cmd_tx: mpsc::Sender<Command>,
        event_rx: mpsc::Receiver<DashboardEvent>,
        mock: Arc<MockApi>,
        handle: tokio::task::JoinHandle<()>,
    }

    fn start(mock: MockApi) -> Harness {
        let mock = Arc::new(mock);
        let (cmd_tx, cmd_rx) = mpsc::channel(32);
        let (event_tx, event_rx) = mpsc::channel(64);
        let api: Arc<dyn DashboardApi> = mock.clone();
        let worker = DashboardWorker::new(cmd_rx, event_tx, api);
        let handle = tokio::spawn(worker.run());
        Harness {
            cmd_tx,
            event_rx,
            mock,
            handle,
        }
    }

    #[tokio::test]
    async fn test_load_devices() {
        let mut h = start(MockApi::with_devices(vec![Device::new("d1", "MyTempSensor")]));
        h.cmd_tx.send(Command::LoadDevices).await.unwrap();

        match h.event_rx.recv().await.unwrap() {
            DashboardEvent::DevicesLoaded { devices } => assert_eq!(devices.len(), 1),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_load_devices_failure() {
        let mock = MockApi::new();
        mock.set_should_fail(true, Some("down")).await;
        let mut h = start(mock);
        h.cmd_tx.send(Command::LoadDevices).await.unwrap();

        assert!(matches!(
            h.event_rx.recv().await.unwrap(),
            DashboardEvent::DevicesError { .. }
        ));
    }

    #[tokio::test]
    async fn test_add_device_reloads_list() {
        let mut h = start(MockApi::new());
        h.cmd_tx
            .send(Command::AddDevice {
                name: "Garage".to_string(),
            })
            .await
            .unwrap();

        assert!(matches!(
            h.event_rx.recv().await.unwrap(),
            DashboardEvent::DeviceAdded { ref name } if name == "Garage"
        ));
        match h.event_rx.recv().await.unwrap() {
            DashboardEvent::DevicesLoaded { devices } => {
                assert_eq!(devices.len(), 1);
                assert_eq!(devices[0].name, "Garage");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_add_device_failure_does_not_reload() {
        let mut h = start(MockApi::new());
        h.cmd_tx
            .send(Command::AddDevice {
                name: String::new(),
            })
            .await
            .unwrap();

        assert!(matches!(
            h.event_rx.recv().await.unwrap(),
            DashboardEvent::AddDeviceError { .. }
        ));
        h.cmd_tx.send(Command::Shutdown).await.unwrap();
        h.handle.await.unwrap();
        assert!(!h.mock.calls().contains(&ApiCall::ListDevices));
    }

    #[tokio::test]
    async fn test_ask_answered() {
        let mock = MockApi::new();
        mock.set_ask_reply(AskReply::Analysis("穩定".to_string())).await;
        let mut h = start(mock);
        h.cmd_tx
            .send(Command::Ask {
                request_id: 7,
                device_id: "d1".to_string(),
                question: "q".to_string(),
            })
            .await
            .unwrap();

        match h.event_rx.recv().await.unwrap() {
            DashboardEvent::AskAnswered { request_id, reply } => {
                assert_eq!(request_id, 7);
                assert_eq!(reply, AskReply::Analysis("穩定".to_string()));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_ask_failed() {
        let mock = MockApi::new();
        mock.set_should_fail(true, None).await;
        let mut h = start(mock);
        h.cmd_tx
            .send(Command::Ask {
                request_id: 3,
                device_id: "d1".to_string(),
                question: "q".to_string(),
            })
            .await
            .unwrap();

        assert!(matches!(
            h.event_rx.recv().await.unwrap(),
            DashboardEvent::AskFailed { request_id: 3, .. }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_ask_does_not_block_selection() {
        let mock = MockApi::new();
        mock.set_latency(Duration::from_secs(30));
        let h = start(mock);

        h.cmd_tx
            .send(Command::Ask {
                request_id: 1,
                device_id: "d1".to_string(),
                question: "q".to_string(),
            })
            .await
            .unwrap();
        h.cmd_tx
            .send(Command::SelectDevice {
                device_id: Some("d2".to_string()),
            })
            .await
            .unwrap();

        sleep(Duration::from_millis(10)).await;
        assert!(h.mock.calls().contains(&ApiCall::Latest("d2".to_string())));
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_polling() {
        let h = start(MockApi::new());
        h.cmd_tx
            .send(Command::SelectDevice {
                device_id: Some("d1".to_string()),
            })
            .await
            .unwrap();
        sleep(Duration::from_millis(10)).await;

        h.cmd_tx.send(Command::Shutdown).await.unwrap();
        h.handle.await.unwrap();
        let before = h.mock.call_count();

        sleep(Duration::from_secs(120)).await;
        assert_eq!(h.mock.call_count(), before);
    }
}
