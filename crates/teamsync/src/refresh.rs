//! Scheduled refresh tasks.
//!
//! Screens that poll the entity store own an explicit `RefreshTask`
//! instead of a bare interval: the task has a start/stop lifecycle tied
//! to its owner, each cycle runs to completion before the next tick, and
//! dropping the handle cancels the task so intervals cannot leak.

use std::future::Future;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// A cancellable periodic refresh task.
pub struct RefreshTask {
    shutdown_tx: broadcast::Sender<()>,
    handle: JoinHandle<()>,
}

impl RefreshTask {
    /// Spawns a task that runs `refresh` to completion every `period`.
    ///
    /// The first cycle runs one period after spawn. Cycles never
    /// overlap: a slow refresh delays the next tick rather than
    /// stacking behind it.
    pub fn spawn<F, Fut>(period: Duration, mut refresh: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let (shutdown_tx, mut shutdown_rx) = broadcast::channel(1);

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; consume it so the
            // initial refresh happens one period from now.
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        refresh().await;
                    }
                    _ = shutdown_rx.recv() => {
                        tracing::debug!("Refresh task shutting down");
                        break;
                    }
                }
            }
        });

        Self {
            shutdown_tx,
            handle,
        }
    }

    /// Signals the task to stop after the current cycle.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Returns true once the task has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for RefreshTask {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(());
        self.handle.abort();
    }
}
