//! Deadline handling.

use std::time::Duration;

use log::warn;
use tokio_util::sync::CancellationToken;

/// Cancels `cancel` once `timeout` elapses.
///
/// Returns the watcher task so the caller can stop it when the analysis
/// finishes first.
pub fn spawn_deadline(
    cancel: CancellationToken,
    timeout: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::time::sleep(timeout) => {
                warn!(
                    "Analysis deadline of {}s reached, cancelling remaining scans",
                    timeout.as_secs()
                );
                cancel.cancel();
            }
            _ = cancel.cancelled() => {}
        }
    })
}

/// Stops the deadline watcher, if any.
///
/// Call only after the analysis has finished: cancelling the shared token is
/// how the watcher is told to exit.
pub async fn shutdown_gracefully(
    cancel: CancellationToken,
    deadline: Option<tokio::task::JoinHandle<()>>,
) {
    if let Some(task) = deadline {
        cancel.cancel();
        let _ = task.await;
    }
}
