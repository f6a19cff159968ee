use async_trait::async_trait;
use bytes::Bytes;
use rand::Rng;

use crate::{MediaResult, StoragePath};

/// Object storage operations the pipeline depends on
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `body` at `bucket/path`
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        body: Bytes,
        options: &UploadOptions,
    ) -> MediaResult<()>;

    /// Public URL for `bucket/path`. Must contain `/object/public/{bucket}/{path}`.
    fn public_url(&self, bucket: &str, path: &str) -> String;

    /// Remove objects. Missing objects are not an error.
    async fn remove(&self, bucket: &str, paths: &[String]) -> MediaResult<()>;
}

#[async_trait]
impl<S: ObjectStore + ?Sized> ObjectStore for std::sync::Arc<S> {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        body: Bytes,
        options: &UploadOptions,
    ) -> MediaResult<()> {
        (**self).upload(bucket, path, body, options).await
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        (**self).public_url(bucket, path)
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> MediaResult<()> {
        (**self).remove(bucket, paths).await
    }
}

/// Per-upload options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    pub content_type: String,
    pub cache_control: Option<String>,
    /// Overwrite an existing object instead of failing
    pub upsert: bool,
}

impl UploadOptions {
    /// Options for a JPEG that may replace a partial earlier attempt
    pub fn jpeg() -> Self {
        Self {
            content_type: "image/jpeg".to_string(),
            cache_control: None,
            upsert: true,
        }
    }

    pub fn with_cache_control<S: Into<String>>(mut self, cache_control: S) -> Self {
        self.cache_control = Some(cache_control.into());
        self
    }

    pub fn with_upsert(mut self, upsert: bool) -> Self {
        self.upsert = upsert;
        self
    }
}

/// Public URL layout shared by the stores
pub fn public_object_url(base: &str, bucket: &str, path: &str) -> String {
    format!("{}/object/public/{}/{}", base.trim_end_matches('/'), bucket, path)
}

/// Recover the storage path from a public URL produced by `public_object_url`.
///
/// Returns `None` for URLs without an `/object/public/{bucket}/{path}` segment.
pub fn extract_storage_path(url: &str) -> Option<String> {
    const MARKER: &str = "/object/public/";

    let mut search_from = 0;
    while let Some(offset) = url[search_from..].find(MARKER) {
        let after_marker = search_from + offset + MARKER.len();
        let rest = &url[after_marker..];
        if let Some(slash) = rest.find('/') {
            let path = &rest[slash + 1..];
            if slash > 0 && !path.is_empty() {
                return Some(path.to_string());
            }
        }
        search_from = search_from + offset + 1;
    }
    None
}

/// Strategy for generating storage paths
pub trait PathStrategy: Send + Sync {
    /// Path for a new photo owned by `owner_id`
    fn photo_path(&self, owner_id: &str) -> StoragePath;
}

/// `{owner}/{unix_millis}-{6 base36 chars}.jpg`
#[derive(Debug, Clone)]
pub struct DefaultPathStrategy;

const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

impl PathStrategy for DefaultPathStrategy {
    fn photo_path(&self, owner_id: &str) -> StoragePath {
        let millis = chrono::Utc::now().timestamp_millis();
        let mut rng = rand::thread_rng();
        let suffix: String = (0..6)
            .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
            .collect();

        StoragePath(format!("{}/{}-{}.jpg", owner_id, millis, suffix))
    }
}
