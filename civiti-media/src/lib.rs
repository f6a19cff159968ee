//! # civiti-media: photo upload pipeline
//!
//! Turns picked images into public photo URLs:
//!
//! 1. reject assets whose declared size is over the limit
//! 2. re-encode as JPEG (drops EXIF), scaling wide images down
//! 3. upload with bounded exponential backoff, overwriting partial attempts
//! 4. remove the temporary file
//!
//! Deletes go through a background queue and are best effort.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use civiti_media::prelude::*;
//!
//! # #[tokio::main]
//! # async fn main() -> MediaResult<()> {
//! let store = S3CompatibleStore::from_env().await?;
//! let uploader = Arc::new(PhotoUploader::new(store, MediaConfig::default()));
//!
//! let ctx = UploadCtx::new("user-123".to_string());
//! let assets = vec![ImageAsset::new("/tmp/pick-1.jpg").with_width(4032).with_file_size(3_100_000)];
//!
//! let outcome = uploader.process_batch(&ctx, assets, 7).await;
//! println!("uploaded {:?}, failed: {}", outcome.urls, outcome.had_error());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │  PhotoController │  ← picks, list updates, observable state
//! ├──────────────────┤
//! │  PhotoUploader   │  ← compression, retry, batch orchestration
//! ├──────────────────┤
//! │  ObjectStore     │  ← upload / public URL / remove
//! └──────────────────┘
//! ```

mod adapter;
mod compress;
mod config;
mod coordinator;
mod delete_queue;
mod error;
mod memory_store;
mod picker;
mod receipt;
pub mod retry;
mod s3_store;
pub mod store;
mod types;
mod upload;

pub use adapter::PhotoController;
pub use compress::{plan_compression, CompressedAsset, CompressionPlan, ImageTransformer, JpegTransformer};
pub use config::{MediaConfig, RetryPolicy};
pub use delete_queue::{DeleteHandle, DeleteQueue, DeleteWorker};
pub use error::{MediaError, MediaResult};
pub use memory_store::{MemoryObjectStore, StoredObject};
pub use picker::{ImageSource, PhotoList, SharedPhotoList};
pub use receipt::{AssetFailure, BatchOutcome, DeleteOutcome, FailureStage};
pub use s3_store::{S3CompatibleStore, S3Config};
pub use store::{
    extract_storage_path, public_object_url, DefaultPathStrategy, ObjectStore, PathStrategy,
    UploadOptions,
};
pub use types::{ImageAsset, PickSource, StoragePath, UploadCtx, UploadState};
pub use upload::PhotoUploader;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        ImageAsset, MediaConfig, MediaError, MediaResult, ObjectStore, PhotoController,
        PhotoUploader, S3CompatibleStore, UploadCtx,
    };
}
