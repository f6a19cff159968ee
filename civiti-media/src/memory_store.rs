use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;

use crate::{public_object_url, MediaError, MediaResult, ObjectStore, UploadOptions};

/// Object held by `MemoryObjectStore`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Bytes,
    pub content_type: String,
    pub cache_control: Option<String>,
}

type ObjectMap = HashMap<(String, String), StoredObject>;

/// In-memory object store for testing and development
#[derive(Debug, Clone)]
pub struct MemoryObjectStore {
    base_url: String,
    objects: Arc<RwLock<ObjectMap>>,
}

impl Default for MemoryObjectStore {
    fn default() -> Self {
        Self::new("http://localhost/storage/v1")
    }
}

impl MemoryObjectStore {
    pub fn new<S: Into<String>>(base_url: S) -> Self {
        Self {
            base_url: base_url.into(),
            objects: Arc::default(),
        }
    }

    pub fn get(&self, bucket: &str, path: &str) -> Option<StoredObject> {
        self.objects
            .read()
            .get(&(bucket.to_string(), path.to_string()))
            .cloned()
    }

    pub fn contains(&self, bucket: &str, path: &str) -> bool {
        self.get(bucket, path).is_some()
    }

    /// Paths stored in `bucket`, sorted
    pub fn paths(&self, bucket: &str) -> Vec<String> {
        let mut paths: Vec<String> = self
            .objects
            .read()
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, p)| p.clone())
            .collect();
        paths.sort();
        paths
    }

    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        body: Bytes,
        options: &UploadOptions,
    ) -> MediaResult<()> {
        let key = (bucket.to_string(), path.to_string());
        let mut objects = self.objects.write();
        if !options.upsert && objects.contains_key(&key) {
            return Err(MediaError::AlreadyExists {
                path: path.to_string(),
            });
        }
        objects.insert(
            key,
            StoredObject {
                body,
                content_type: options.content_type.clone(),
                cache_control: options.cache_control.clone(),
            },
        );
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        public_object_url(&self.base_url, bucket, path)
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> MediaResult<()> {
        let mut objects = self.objects.write();
        for path in paths {
            objects.remove(&(bucket.to_string(), path.clone()));
        }
        Ok(())
    }
}
