//! Polling controller
//!
//! Periodic re-fetch of a table. Each tick spawns its own fetch, so a slow
//! backend never delays or drops the next tick: `n` intervals yield `n`
//! fetches.

use std::future::Future;
use std::time::Duration;

use evdash_common::error::{CommonError, ErrorSeverity};
use evdash_common::impl_error_classification;
use parking_lot::Mutex;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Time allowed for the timer task to wind down on stop
const STOP_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum PollingError {
    #[error("Polling interval must be greater than zero")]
    ZeroInterval,

    #[error("Polling task panicked: {0}")]
    TaskPanicked(String),

    #[error(transparent)]
    Common(#[from] CommonError),
}

impl_error_classification!(PollingError, Common,
    PollingError::ZeroInterval => {
        retryable: false,
        severity: ErrorSeverity::Error,
        critical: false,
    },
    PollingError::TaskPanicked(_) => {
        retryable: false,
        severity: ErrorSeverity::Critical,
        critical: true,
    }
);

struct Running {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
    interval: Duration,
}

/// Timer driving periodic refreshes
#[derive(Default)]
pub struct PollingController {
    running: Mutex<Option<Running>>,
}

impl PollingController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start ticking every `interval`, first tick one interval from now.
    ///
    /// A running timer is replaced. Must be called from within a tokio
    /// runtime.
    pub fn start<F, Fut>(&self, interval: Duration, tick: F) -> Result<(), PollingError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if interval.is_zero() {
            return Err(PollingError::ZeroInterval);
        }

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(Self::tick_loop(interval, tick, cancel.clone()));

        let previous = self.running.lock().replace(Running { cancel, handle, interval });
        if let Some(previous) = previous {
            debug!(previous = ?previous.interval, "replacing polling timer");
            previous.cancel.cancel();
        }

        info!(interval = ?interval, "polling started");
        Ok(())
    }

    /// Stop ticking and wait for the timer task. In-flight ticks complete on
    /// their own.
    pub async fn stop(&self) -> Result<(), PollingError> {
        let Some(running) = self.running.lock().take() else {
            return Ok(());
        };

        running.cancel.cancel();
        match tokio::time::timeout(STOP_TIMEOUT, running.handle).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!("Polling task panicked: {}", e);
                return Err(PollingError::TaskPanicked(e.to_string()));
            }
            Err(_) => {
                warn!("Polling task did not complete within timeout");
                return Err(CommonError::timeout("stop polling", STOP_TIMEOUT).into());
            }
        }

        info!("polling stopped");
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.running.lock().is_some()
    }

    pub fn interval(&self) -> Option<Duration> {
        self.running.lock().as_ref().map(|running| running.interval)
    }

    async fn tick_loop<F, Fut>(interval: Duration, tick: F, cancel: CancellationToken)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    debug!("polling loop cancelled");
                    break;
                }
                _ = ticker.tick() => {
                    // Never await the tick here: a slow fetch must not hold
                    // back the next one.
                    tokio::spawn(tick());
                }
            }
        }
    }
}

/// Ensure the timer stops when the controller is dropped
impl Drop for PollingController {
    fn drop(&mut self) {
        if let Some(running) = self.running.get_mut().take() {
            debug!("PollingController dropped while running; cancelling");
            running.cancel.cancel();
        }
    }
}
