//! Trailing-edge debouncer
//!
//! Values pushed in quick succession collapse into the last one, which is
//! emitted once the input has been quiet for the configured duration. A
//! settled value equal to the previously emitted one is dropped.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

/// Configuration for a debouncer
#[derive(Debug, Clone)]
pub struct DebouncerConfig {
    /// Quiet period required before a value is emitted
    pub quiet: Duration,

    /// Drop a settled value equal to the last emitted one
    pub distinct: bool,
}

impl DebouncerConfig {
    pub fn new(quiet: Duration) -> Self {
        Self { quiet, distinct: true }
    }

    pub fn distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }
}

/// Handle feeding values into a debouncing task.
///
/// Dropping the handle closes the input; a value still waiting for its quiet
/// period is discarded.
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
    task: JoinHandle<()>,
}

impl<T> Debouncer<T>
where
    T: PartialEq + Clone + Send + 'static,
{
    /// Spawn the debouncing task; `on_settled` runs for every emitted value.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F, Fut>(config: DebouncerConfig, on_settled: F) -> Self
    where
        F: Fn(T) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(config, rx, on_settled));
        Self { tx, task }
    }

    /// Feed a value. Returns `false` once the task has stopped.
    pub fn push(&self, value: T) -> bool {
        self.tx.send(value).is_ok()
    }

    /// Close the input and wait for the task to finish.
    pub async fn shutdown(self) {
        let Self { tx, task } = self;
        drop(tx);
        if let Err(err) = task.await {
            debug!(error = %err, "debouncer task ended abnormally");
        }
    }
}

async fn run<T, F, Fut>(config: DebouncerConfig, mut rx: mpsc::UnboundedReceiver<T>, on_settled: F)
where
    T: PartialEq + Clone + Send + 'static,
    F: Fn(T) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let mut last_emitted: Option<T> = None;

    while let Some(mut pending) = rx.recv().await {
        // Restart the quiet period on every new value.
        loop {
            tokio::select! {
                next = rx.recv() => match next {
                    Some(value) => pending = value,
                    None => return,
                },
                () = tokio::time::sleep(config.quiet) => break,
            }
        }

        if config.distinct && last_emitted.as_ref() == Some(&pending) {
            trace!("debounced value unchanged, skipping");
            continue;
        }
        last_emitted = Some(pending.clone());
        on_settled(pending).await;
    }
}
