//! Periodic tick source.
//!
//! One tokio task per armed source, feeding a capacity-1 channel. The single
//! receiver makes tick delivery serial: the next tick cannot be observed
//! until the previous one has been handled. Dropping or cancelling the
//! source aborts the task.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

#[derive(Debug)]
pub struct Ticker {
    rx: mpsc::Receiver<()>,
    task: JoinHandle<()>,
}

impl Ticker {
    /// Spawn a source that ticks every `period`, first tick one period from now.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(period: Duration) -> Self {
        let (tx, rx) = mpsc::channel(1);
        let task = tokio::spawn(async move {
            let mut interval = time::interval_at(time::Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(()).await.is_err() {
                    break;
                }
            }
        });
        Self { rx, task }
    }

    /// Wait for the next tick. `None` once the source is cancelled.
    pub async fn next(&mut self) -> Option<()> {
        self.rx.recv().await
    }

    /// Stop the source. Buffered ticks are discarded.
    pub fn cancel(&mut self) {
        self.task.abort();
        self.rx.close();
        while self.rx.try_recv().is_ok() {}
    }

    #[cfg(test)]
    pub(crate) fn abort_handle(&self) -> tokio::task::AbortHandle {
        self.task.abort_handle()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.task.abort();
    }
}
