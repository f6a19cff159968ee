#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::time::Instant;

use civiti_media::{
    CompressedAsset, CompressionPlan, ImageAsset, ImageSource, ImageTransformer, MediaError,
    MediaResult, MemoryObjectStore, ObjectStore, PickSource, UploadOptions,
};

pub const BUCKET: &str = "issue-photos";

/// Memory store that fails a configurable number of uploads and removes
#[derive(Clone, Default)]
pub struct FlakyStore {
    pub inner: MemoryObjectStore,
    upload_failures: Arc<AtomicUsize>,
    remove_failures: Arc<AtomicUsize>,
    broken_paths: Arc<Mutex<Vec<String>>>,
    pub upload_attempts: Arc<Mutex<Vec<(Instant, String)>>>,
    pub remove_attempts: Arc<Mutex<Vec<Instant>>>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_uploads(self, count: usize) -> Self {
        self.upload_failures.store(count, Ordering::SeqCst);
        self
    }

    pub fn failing_removes(self, count: usize) -> Self {
        self.remove_failures.store(count, Ordering::SeqCst);
        self
    }

    /// Every remove touching `path` fails
    pub fn broken_path(self, path: &str) -> Self {
        self.broken_paths.lock().push(path.to_string());
        self
    }

    pub fn upload_count(&self) -> usize {
        self.upload_attempts.lock().len()
    }

    pub fn remove_count(&self) -> usize {
        self.remove_attempts.lock().len()
    }

    fn take_failure(counter: &AtomicUsize) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl ObjectStore for FlakyStore {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        body: Bytes,
        options: &UploadOptions,
    ) -> MediaResult<()> {
        self.upload_attempts.lock().push((Instant::now(), path.to_string()));
        if Self::take_failure(&self.upload_failures) {
            return Err(MediaError::storage("503 service unavailable"));
        }
        self.inner.upload(bucket, path, body, options).await
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        self.inner.public_url(bucket, path)
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> MediaResult<()> {
        self.remove_attempts.lock().push(Instant::now());
        let broken = paths.iter().any(|p| self.broken_paths.lock().contains(p));
        if broken || Self::take_failure(&self.remove_failures) {
            return Err(MediaError::storage("connection reset"));
        }
        self.inner.remove(bucket, paths).await
    }
}

/// Transformer wrapper that counts calls
pub struct CountingTransformer<T> {
    pub inner: T,
    pub calls: Arc<AtomicUsize>,
}

impl<T> CountingTransformer<T> {
    pub fn new(inner: T) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (Self { inner, calls: calls.clone() }, calls)
    }
}

#[async_trait]
impl<T: ImageTransformer> ImageTransformer for CountingTransformer<T> {
    async fn transform(&self, source: &Path, plan: &CompressionPlan) -> MediaResult<CompressedAsset> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.transform(source, plan).await
    }
}

/// Transformer that signals `entered` and then waits for `release`
pub struct GatedTransformer<T> {
    pub inner: T,
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
}

impl<T> GatedTransformer<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            entered: Arc::default(),
            release: Arc::default(),
        }
    }
}

#[async_trait]
impl<T: ImageTransformer> ImageTransformer for GatedTransformer<T> {
    async fn transform(&self, source: &Path, plan: &CompressionPlan) -> MediaResult<CompressedAsset> {
        self.entered.notify_one();
        self.release.notified().await;
        self.inner.transform(source, plan).await
    }
}

/// Picker double
pub struct FakeSource {
    pub granted: bool,
    pub assets: Option<Vec<ImageAsset>>,
    pub limits: Arc<Mutex<Vec<(PickSource, usize)>>>,
}

impl FakeSource {
    pub fn granting(assets: Vec<ImageAsset>) -> Self {
        Self {
            granted: true,
            assets: Some(assets),
            limits: Arc::default(),
        }
    }

    pub fn denying() -> Self {
        Self {
            granted: false,
            assets: None,
            limits: Arc::default(),
        }
    }

    pub fn dismissed() -> Self {
        Self {
            granted: true,
            assets: None,
            limits: Arc::default(),
        }
    }
}

#[async_trait]
impl ImageSource for FakeSource {
    async fn request_permission(&self, _source: PickSource) -> MediaResult<bool> {
        Ok(self.granted)
    }

    async fn pick(&self, source: PickSource, limit: usize) -> MediaResult<Option<Vec<ImageAsset>>> {
        self.limits.lock().push((source, limit));
        Ok(self.assets.clone())
    }
}

/// Write a solid-ish PNG of the given size and return an asset for it
pub fn png_asset(dir: &Path, name: &str, width: u32, height: u32) -> ImageAsset {
    let path = dir.join(name);
    let image = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    image.save(&path).expect("write png fixture");
    let size = std::fs::metadata(&path).expect("fixture metadata").len();
    ImageAsset::new(path).with_width(width).with_file_size(size)
}

/// Write bytes that no decoder accepts
pub fn corrupt_asset(dir: &Path, name: &str) -> ImageAsset {
    let path = dir.join(name);
    std::fs::write(&path, b"definitely not an image").expect("write corrupt fixture");
    ImageAsset::new(path).with_width(800).with_file_size(23)
}

/// Files directly inside `dir`
pub fn files_in(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .expect("read dir")
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .collect()
}
