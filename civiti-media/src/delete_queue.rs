use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::{extract_storage_path, DeleteOutcome, MediaError, MediaResult, PhotoUploader};

struct DeleteRequest {
    path: String,
    cancel: CancellationToken,
    reply: oneshot::Sender<DeleteOutcome>,
}

/// Sends best-effort deletes to a background worker.
///
/// Enqueueing never blocks and never fails the caller; the returned handle
/// may be awaited, cancelled, or dropped.
#[derive(Clone)]
pub struct DeleteQueue {
    tx: mpsc::UnboundedSender<DeleteRequest>,
}

/// Handle for one queued delete
pub struct DeleteHandle {
    target: String,
    cancel: CancellationToken,
    outcome: oneshot::Receiver<DeleteOutcome>,
}

impl DeleteHandle {
    /// Stop the delete if it has not finished. Interrupts a pending backoff.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Wait for the delete to settle
    pub async fn wait(self) -> DeleteOutcome {
        match self.outcome.await {
            Ok(outcome) => outcome,
            // Worker stopped before reaching this request
            Err(_) => DeleteOutcome::Cancelled { path: self.target },
        }
    }
}

/// Handle for the delete worker task.
///
/// Dropping it detaches the worker, which keeps serving deletes until every
/// `DeleteQueue` is gone.
pub struct DeleteWorker {
    shutdown: CancellationToken,
    join_handle: JoinHandle<()>,
}

impl DeleteWorker {
    /// Finish in-flight deletes, then stop. Deletes enqueued afterwards
    /// resolve as cancelled.
    pub async fn shutdown(self) -> MediaResult<()> {
        self.shutdown.cancel();
        self.join_handle
            .await
            .map_err(|e| MediaError::invalid(format!("delete worker join error: {}", e)))
    }
}

impl DeleteQueue {
    /// Spawn a worker that deletes through `uploader` with its retry policy
    pub fn spawn(uploader: Arc<PhotoUploader>) -> (Self, DeleteWorker) {
        let (tx, rx) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();
        let join_handle = tokio::spawn(run_worker(uploader, rx, shutdown.clone()));

        (Self { tx }, DeleteWorker { shutdown, join_handle })
    }

    /// Queue deletion of the object behind a public URL.
    ///
    /// URLs that do not map to a storage path are logged and skipped.
    pub fn enqueue(&self, url: &str) -> DeleteHandle {
        let cancel = CancellationToken::new();
        let (reply, outcome) = oneshot::channel();

        let Some(path) = extract_storage_path(url) else {
            warn!(url, "could not extract storage path from URL");
            let _ = reply.send(DeleteOutcome::Skipped { url: url.to_string() });
            return DeleteHandle {
                target: url.to_string(),
                cancel,
                outcome,
            };
        };

        let request = DeleteRequest {
            path: path.clone(),
            cancel: cancel.clone(),
            reply,
        };
        if self.tx.send(request).is_err() {
            warn!(path = %path, "delete worker is not running");
        }

        DeleteHandle {
            target: path,
            cancel,
            outcome,
        }
    }
}

/// Each delete runs as its own task so a failing delete's backoff never holds
/// up the others.
async fn run_worker(
    uploader: Arc<PhotoUploader>,
    mut rx: mpsc::UnboundedReceiver<DeleteRequest>,
    shutdown: CancellationToken,
) {
    let mut in_flight = JoinSet::new();
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            request = rx.recv() => match request {
                Some(request) => {
                    in_flight.spawn(serve(uploader.clone(), request));
                }
                None => break,
            },
            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                if let Err(e) = joined {
                    warn!("delete task failed: {}", e);
                }
            }
        }
    }

    rx.close();
    while let Some(joined) = in_flight.join_next().await {
        if let Err(e) = joined {
            warn!("delete task failed: {}", e);
        }
    }
    debug!("delete worker stopped");
}

async fn serve(uploader: Arc<PhotoUploader>, request: DeleteRequest) {
    let outcome = process(&uploader, &request).await;
    let _ = request.reply.send(outcome);
}

async fn process(uploader: &PhotoUploader, request: &DeleteRequest) -> DeleteOutcome {
    let path = request.path.clone();
    if request.cancel.is_cancelled() {
        return DeleteOutcome::Cancelled { path };
    }

    tokio::select! {
        _ = request.cancel.cancelled() => {
            debug!(path = %path, "delete cancelled");
            DeleteOutcome::Cancelled { path }
        }
        result = uploader.delete_path(&request.path) => match result {
            Ok(()) => DeleteOutcome::Deleted { path },
            Err(e) => {
                error!(path = %path, "failed to delete from storage: {}", e);
                DeleteOutcome::Failed { path, reason: e.to_string() }
            }
        },
    }
}
