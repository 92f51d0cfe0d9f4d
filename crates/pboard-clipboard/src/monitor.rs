//! Clipboard change monitoring.
//!
//! The monitor watches the change counter rather than content: a check is a
//! single cheap counter read, and only when the counter moved is the new
//! content classified and reported. Checks run on an interval and whenever
//! [`Monitor::poll`] is called (for example when an application regains
//! focus).

use std::sync::Arc;
use std::time::Duration;

use pboard_types::ClipboardInformation;
use tokio::sync::{mpsc, watch, Notify};
use tokio::task::{JoinError, JoinHandle};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::access::ClipboardHandle;
use crate::error::ClipboardError;

/// A change observed on the clipboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipboardChange {
    pub change_count: i64,
    pub information: ClipboardInformation,
}

/// Background task reporting clipboard changes.
///
/// Dropping the monitor stops the task.
pub struct Monitor {
    poll: Arc<Notify>,
    shutdown_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl Monitor {
    /// Start monitoring. Only changes after this call are reported.
    pub async fn start(
        handle: ClipboardHandle,
        interval: Duration,
    ) -> Result<(Self, mpsc::Receiver<ClipboardChange>), ClipboardError> {
        let baseline = {
            let handle = handle.clone();
            tokio::task::spawn_blocking(move || handle.change_count())
                .await
                .map_err(|e| ClipboardError::Other(e.into()))??
        };

        let (tx, rx) = mpsc::channel(64);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let poll = Arc::new(Notify::new());

        info!(baseline, ?interval, "clipboard monitor started");
        let task = tokio::spawn(run(handle, interval, baseline, Arc::clone(&poll), tx, shutdown_rx));

        Ok((
            Self {
                poll,
                shutdown_tx,
                task: Some(task),
            },
            rx,
        ))
    }

    /// Check for a change now instead of waiting for the next tick.
    pub fn poll(&self) {
        self.poll.notify_one();
    }

    /// Stop the monitor and wait for the task to finish.
    ///
    /// Fails if the task panicked or was cancelled.
    pub async fn close(mut self) -> Result<(), ClipboardError> {
        let _ = self.shutdown_tx.send(true);
        match self.task.take() {
            Some(task) => joined(task.await),
            None => Ok(()),
        }
    }
}

fn joined(result: Result<(), JoinError>) -> Result<(), ClipboardError> {
    result.map_err(|e| {
        warn!(error = %e, "clipboard monitor task failed");
        ClipboardError::Other(e.into())
    })
}

impl Drop for Monitor {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(true);
    }
}

async fn run(
    handle: ClipboardHandle,
    interval: Duration,
    mut last: i64,
    poll: Arc<Notify>,
    tx: mpsc::Sender<ClipboardChange>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            () = poll.notified() => {}
            _ = shutdown_rx.changed() => break,
        }

        let h = handle.clone();
        let checked = tokio::task::spawn_blocking(move || check(&h, last)).await;
        match checked {
            Ok(Ok(Some(change))) => {
                last = change.change_count;
                debug!(change_count = last, info = %change.information, "clipboard changed");
                if tx.send(change).await.is_err() {
                    break;
                }
            }
            Ok(Ok(None)) => {}
            Ok(Err(e)) => warn!(error = %e, "clipboard check failed"),
            Err(e) => warn!(error = %e, "clipboard check task failed"),
        }
    }

    debug!("clipboard monitor stopped");
}

fn check(handle: &ClipboardHandle, last: i64) -> Result<Option<ClipboardChange>, ClipboardError> {
    let change_count = handle.change_count()?;
    if change_count == last {
        return Ok(None);
    }
    let information = handle.query_information()?;
    Ok(Some(ClipboardChange {
        change_count,
        information,
    }))
}
