//! Cancellable periodic tasks.
//!
//! A [`PollingTask`] runs an async tick function immediately and then once per
//! period until it is cancelled. Cancellation also aborts a tick that is
//! still in flight, so a stopped task never produces output afterwards.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Shortest period accepted by [`PollingTask::spawn`].
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// A background loop bound to one device.
///
/// Dropping the task cancels it.
#[derive(Debug)]
pub struct PollingTask {
    name: &'static str,
    device_id: String,
    period: Duration,
    cancel_token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl PollingTask {
    /// Spawn a loop that calls `tick` now and then every `period`.
    ///
    /// The loop's token is a child of `parent`, so cancelling the parent
    /// stops it too. Ticks never overlap: a slow tick delays the next one
    /// instead of queueing a burst.
    pub fn spawn<F, Fut>(
        name: &'static str,
        device_id: impl Into<String>,
        period: Duration,
        parent: &CancellationToken,
        mut tick: F,
    ) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let device_id = device_id.into();
        let period = period.max(MIN_PERIOD);
        let cancel_token = parent.child_token();
        let task_token = cancel_token.clone();
        let task_device = device_id.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = task_token.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                trace!(task = name, device = %task_device, "Polling tick");
                tokio::select! {
                    biased;
                    _ = task_token.cancelled() => break,
                    _ = tick() => {}
                }
            }

            debug!(task = name, device = %task_device, "Polling stopped");
        });

        Self {
            name,
            device_id,
            period,
            cancel_token,
            handle: Some(handle),
        }
    }

    /// Name used in logs.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Device this loop polls.
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Time between ticks.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Whether the loop is still running.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Whether the loop was asked to stop.
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    /// Signal the loop to stop without waiting for it.
    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    /// Stop the loop and wait for the task to exit.
    pub async fn stop(mut self) {
        self.cancel_token.cancel();
        if let Some(handle) = self.handle.take()
            && let Err(e) = handle.await
        {
            debug!(task = self.name, error = %e, "Polling task ended abnormally");
        }
    }
}

impl Drop for PollingTask {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}
