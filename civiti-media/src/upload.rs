use std::path::Path;
use std::sync::Arc;
use bytes::Bytes;
use tracing::{debug, instrument};

use crate::retry::retry;
use crate::{
    plan_compression, CompressedAsset, DefaultPathStrategy, ImageAsset, ImageTransformer,
    JpegTransformer, MediaConfig, MediaError, MediaResult, ObjectStore, PathStrategy,
    StoragePath, UploadCtx, UploadOptions,
};

/// Compresses picked images and moves them into object storage.
///
/// Holds no per-batch state; one uploader can serve any number of batches.
pub struct PhotoUploader {
    store: Arc<dyn ObjectStore>,
    transformer: Arc<dyn ImageTransformer>,
    paths: Arc<dyn PathStrategy>,
    config: MediaConfig,
}

impl PhotoUploader {
    /// Create an uploader with the JPEG transformer and default path layout
    pub fn new<S: ObjectStore + 'static>(store: S, config: MediaConfig) -> Self {
        Self {
            store: Arc::new(store),
            transformer: Arc::new(JpegTransformer::from_config(&config)),
            paths: Arc::new(DefaultPathStrategy),
            config,
        }
    }

    /// Replace the image transformer
    pub fn with_transformer<T: ImageTransformer + 'static>(mut self, transformer: T) -> Self {
        self.transformer = Arc::new(transformer);
        self
    }

    /// Replace the path strategy
    pub fn with_path_strategy<P: PathStrategy + 'static>(mut self, paths: P) -> Self {
        self.paths = Arc::new(paths);
        self
    }

    pub fn config(&self) -> &MediaConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    /// Reject assets whose declared size is over the limit
    pub fn check_size(&self, asset: &ImageAsset) -> MediaResult<()> {
        match asset.file_size {
            Some(size) if size > self.config.max_file_bytes => Err(MediaError::FileTooLarge {
                size,
                max: self.config.max_file_bytes,
            }),
            _ => Ok(()),
        }
    }

    /// Re-encode `asset` into a fresh temporary JPEG
    pub async fn compress(&self, asset: &ImageAsset) -> MediaResult<CompressedAsset> {
        let plan = plan_compression(asset, &self.config);
        debug!(uri = %asset.uri.display(), ?plan, "compressing image");
        self.transformer.transform(&asset.uri, &plan).await
    }

    /// Upload a compressed file and return its public URL.
    ///
    /// The storage path is fixed before the first attempt so retries overwrite
    /// the same object.
    #[instrument(skip(self, ctx), fields(owner = %ctx.owner_id, request_id = %ctx.request_id))]
    pub async fn upload_file(&self, ctx: &UploadCtx, file: &Path) -> MediaResult<String> {
        let path = self.paths.photo_path(&ctx.owner_id);
        let body = Bytes::from(tokio::fs::read(file).await?);
        if body.is_empty() {
            return Err(MediaError::EmptyFile);
        }
        self.upload_bytes(&path, body).await
    }

    /// Upload `body` to `path` with retry and return its public URL
    pub async fn upload_bytes(&self, path: &StoragePath, body: Bytes) -> MediaResult<String> {
        let bucket = self.config.bucket.as_str();
        let options = UploadOptions::jpeg().with_cache_control(self.config.cache_control.clone());

        retry(&self.config.retry, "upload", |_| {
            let body = body.clone();
            let options = &options;
            async move { self.store.upload(bucket, path.as_str(), body, options).await }
        })
        .await?;

        Ok(self.store.public_url(bucket, path.as_str()))
    }

    /// Remove one object with retry
    pub async fn delete_path(&self, path: &str) -> MediaResult<()> {
        let bucket = self.config.bucket.as_str();
        let paths = [path.to_string()];

        retry(&self.config.retry, "delete", |_| {
            let paths = &paths;
            async move { self.store.remove(bucket, paths).await }
        })
        .await
    }
}
