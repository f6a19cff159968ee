use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::{
    BatchOutcome, DeleteHandle, DeleteQueue, DeleteWorker, ImageAsset, ImageSource, PhotoList,
    PhotoUploader, PickSource, UploadCtx, UploadState,
};

/// Photo picking and upload for one form.
///
/// Appends to the caller's list once per batch and reports a single error
/// message per batch through `subscribe()`. Concurrent picks are not
/// serialized; callers that need ordering should not start a pick while
/// `is_uploading` is set.
pub struct PhotoController {
    uploader: Arc<PhotoUploader>,
    source: Arc<dyn ImageSource>,
    photos: Arc<dyn PhotoList>,
    deletes: DeleteQueue,
    state: watch::Sender<UploadState>,
    ctx: UploadCtx,
}

impl PhotoController {
    /// Create a controller and the worker that serves its deletes
    pub fn new<S, L>(uploader: Arc<PhotoUploader>, source: S, photos: L, ctx: UploadCtx) -> (Self, DeleteWorker)
    where
        S: ImageSource + 'static,
        L: PhotoList + 'static,
    {
        let (deletes, worker) = DeleteQueue::spawn(uploader.clone());
        let controller = Self::with_delete_queue(uploader, source, photos, ctx, deletes);
        (controller, worker)
    }

    /// Create a controller that shares an existing delete queue
    pub fn with_delete_queue<S, L>(
        uploader: Arc<PhotoUploader>,
        source: S,
        photos: L,
        ctx: UploadCtx,
        deletes: DeleteQueue,
    ) -> Self
    where
        S: ImageSource + 'static,
        L: PhotoList + 'static,
    {
        let (state, _) = watch::channel(UploadState::default());
        Self {
            uploader,
            source: Arc::new(source),
            photos: Arc::new(photos),
            deletes,
            state,
            ctx,
        }
    }

    /// Slots left before the photo limit
    pub fn remaining_slots(&self) -> usize {
        self.uploader.config().max_photos.saturating_sub(self.photos.len())
    }

    pub fn state(&self) -> UploadState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<UploadState> {
        self.state.subscribe()
    }

    pub fn clear_error(&self) {
        self.state.send_modify(|state| state.error = None);
    }

    pub fn photos(&self) -> Vec<String> {
        self.photos.urls()
    }

    pub async fn pick_from_camera(&self) -> Option<BatchOutcome> {
        self.pick(PickSource::Camera).await
    }

    pub async fn pick_from_gallery(&self) -> Option<BatchOutcome> {
        self.pick(PickSource::Gallery).await
    }

    /// Drop `url` from the list and queue its storage delete
    pub fn remove_photo(&self, url: &str) -> DeleteHandle {
        self.photos.remove(url);
        self.deletes.enqueue(url)
    }

    /// Run one pick. `None` when no batch ran (no slots, no permission,
    /// dismissed picker, picker failure).
    async fn pick(&self, source: PickSource) -> Option<BatchOutcome> {
        let slots = self.remaining_slots();
        if slots == 0 {
            debug!(%source, "photo limit reached, pick ignored");
            return None;
        }

        match self.source.request_permission(source).await {
            Ok(true) => {}
            Ok(false) => {
                self.set_error(self.uploader.config().permission_denied_message.clone());
                return None;
            }
            Err(e) => {
                warn!(%source, "permission request failed: {}", e);
                self.set_error(self.uploader.config().upload_failed_message.clone());
                return None;
            }
        }

        let limit = if source.allows_multiple() { slots } else { 1 };
        let assets = match self.source.pick(source, limit).await {
            Ok(Some(assets)) if !assets.is_empty() => assets,
            Ok(_) => return None,
            Err(e) => {
                warn!(%source, "picker failed: {}", e);
                self.set_error(self.uploader.config().upload_failed_message.clone());
                return None;
            }
        };

        Some(self.process_and_upload(assets, slots).await)
    }

    async fn process_and_upload(&self, assets: Vec<ImageAsset>, slots: usize) -> BatchOutcome {
        self.state.send_modify(|state| {
            state.error = None;
            state.is_uploading = true;
        });

        let outcome = self.uploader.process_batch(&self.ctx, assets, slots).await;

        if !outcome.urls.is_empty() {
            self.photos.append(outcome.urls.clone());
        }

        let error = outcome
            .had_error()
            .then(|| self.uploader.config().upload_failed_message.clone());
        self.state.send_modify(|state| {
            state.is_uploading = false;
            state.error = error;
        });

        outcome
    }

    fn set_error(&self, message: String) {
        self.state.send_modify(|state| state.error = Some(message));
    }
}
