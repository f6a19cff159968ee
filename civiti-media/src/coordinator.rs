use tracing::{info, warn};

use crate::{AssetFailure, BatchOutcome, FailureStage, ImageAsset, PhotoUploader, UploadCtx};

impl PhotoUploader {
    /// Compress and upload `assets` one at a time, in order.
    ///
    /// At most `remaining_slots` assets are processed. A failing asset is
    /// recorded and the batch moves on; successes are never rolled back. Each
    /// temporary file is removed before the next asset starts.
    pub async fn process_batch(
        &self,
        ctx: &UploadCtx,
        assets: Vec<ImageAsset>,
        remaining_slots: usize,
    ) -> BatchOutcome {
        let mut outcome = BatchOutcome {
            skipped: assets.len().saturating_sub(remaining_slots),
            ..BatchOutcome::default()
        };

        for (index, asset) in assets.into_iter().take(remaining_slots).enumerate() {
            if let Err(e) = self.check_size(&asset) {
                record_failure(&mut outcome, index, &asset, FailureStage::Validation, e.to_string());
                continue;
            }

            let compressed = match self.compress(&asset).await {
                Ok(compressed) => compressed,
                Err(e) => {
                    record_failure(&mut outcome, index, &asset, FailureStage::Compression, e.to_string());
                    continue;
                }
            };

            let uploaded = self.upload_file(ctx, &compressed.path).await;
            compressed.discard().await;

            match uploaded {
                Ok(url) => outcome.urls.push(url),
                Err(e) => record_failure(&mut outcome, index, &asset, FailureStage::Upload, e.to_string()),
            }
        }

        info!(
            owner = %ctx.owner_id,
            uploaded = outcome.urls.len(),
            failed = outcome.failures.len(),
            skipped = outcome.skipped,
            "photo batch finished"
        );
        outcome
    }
}

fn record_failure(
    outcome: &mut BatchOutcome,
    index: usize,
    asset: &ImageAsset,
    stage: FailureStage,
    reason: String,
) {
    warn!(index, uri = %asset.uri.display(), ?stage, "upload failed for asset: {}", reason);
    outcome.failures.push(AssetFailure {
        index,
        uri: asset.uri.clone(),
        stage,
        reason,
    });
}
