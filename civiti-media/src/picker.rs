use std::sync::Arc;
use async_trait::async_trait;
use parking_lot::RwLock;

use crate::{ImageAsset, MediaResult, PickSource};

/// Native camera / library picker
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Ask for access; `false` when the user refuses
    async fn request_permission(&self, source: PickSource) -> MediaResult<bool>;

    /// Let the user pick up to `limit` images. `None` when the picker was dismissed.
    async fn pick(&self, source: PickSource, limit: usize) -> MediaResult<Option<Vec<ImageAsset>>>;
}

/// Caller-owned list of photo URLs
pub trait PhotoList: Send + Sync {
    fn urls(&self) -> Vec<String>;

    fn len(&self) -> usize {
        self.urls().len()
    }

    fn append(&self, urls: Vec<String>);

    fn remove(&self, url: &str);
}

/// Thread-safe photo list that never grows past `max`
#[derive(Debug, Clone)]
pub struct SharedPhotoList {
    urls: Arc<RwLock<Vec<String>>>,
    max: usize,
}

impl SharedPhotoList {
    pub fn new(max: usize) -> Self {
        Self {
            urls: Arc::default(),
            max,
        }
    }

    pub fn with_urls(max: usize, urls: Vec<String>) -> Self {
        let list = Self::new(max);
        list.append(urls);
        list
    }

    pub fn clear(&self) {
        self.urls.write().clear();
    }
}

impl PhotoList for SharedPhotoList {
    fn urls(&self) -> Vec<String> {
        self.urls.read().clone()
    }

    fn len(&self) -> usize {
        self.urls.read().len()
    }

    fn append(&self, urls: Vec<String>) {
        let mut current = self.urls.write();
        let room = self.max.saturating_sub(current.len());
        current.extend(urls.into_iter().take(room));
    }

    fn remove(&self, url: &str) {
        self.urls.write().retain(|u| u != url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_is_capped() {
        let list = SharedPhotoList::new(2);
        list.append(vec!["a".into(), "b".into(), "c".into()]);
        assert_eq!(list.urls(), vec!["a".to_string(), "b".to_string()]);

        list.remove("a");
        list.append(vec!["d".into()]);
        assert_eq!(list.urls(), vec!["b".to_string(), "d".to_string()]);
    }
}
