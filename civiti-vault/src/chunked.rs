use async_trait::async_trait;
use futures::future::try_join_all;
use tracing::{debug, warn};

use crate::{SecureStore, SessionStorage, VaultConfig, VaultResult};

/// Key holding the chunk count for `key`
pub fn count_key(key: &str) -> String {
    format!("{}_count", key)
}

/// Key holding chunk `index` of `key`
pub fn chunk_key(key: &str, index: usize) -> String {
    format!("{}_{}", key, index)
}

/// Split `value` into pieces of at most `max_bytes` bytes without splitting a
/// character. Concatenating the pieces in order yields `value`.
pub fn split_chunks(value: &str, max_bytes: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut rest = value;
    while !rest.is_empty() {
        let mut end = max_bytes.min(rest.len());
        while !rest.is_char_boundary(end) {
            end -= 1;
        }
        if end == 0 {
            // Limit is smaller than the next character; emit it whole
            end = rest.chars().next().map_or(rest.len(), char::len_utf8);
        }
        let (head, tail) = rest.split_at(end);
        chunks.push(head);
        rest = tail;
    }
    chunks
}

/// Session storage that spreads values over `{key}_0..{key}_{n-1}` plus a
/// `{key}_count` record, for stores that only accept small values.
///
/// Concurrent calls against the same key are not synchronized.
pub struct ChunkedStorage<S> {
    store: S,
    config: VaultConfig,
}

impl<S: SecureStore> ChunkedStorage<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, VaultConfig::default())
    }

    pub fn with_config(store: S, config: VaultConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    /// Read `{key}_count`. Outer `None`: no count record. Inner `None`: a
    /// record that does not parse as a count. A count of `0` is a stored
    /// empty value.
    async fn read_count(&self, key: &str) -> VaultResult<Option<Option<usize>>> {
        let raw = match self.store.get_item(&count_key(key)).await? {
            Some(raw) => raw,
            None => return Ok(None),
        };
        match raw.trim().parse::<usize>() {
            Ok(count) => Ok(Some(Some(count))),
            Err(_) => {
                warn!(key, count = %raw, "unusable chunk count record");
                Ok(Some(None))
            }
        }
    }

    async fn delete_chunks(&self, key: &str, range: std::ops::Range<usize>) -> VaultResult<()> {
        try_join_all(range.map(|i| {
            let chunk = chunk_key(key, i);
            async move { self.store.delete_item(&chunk).await }
        }))
        .await?;
        Ok(())
    }
}

#[async_trait]
impl<S: SecureStore> SessionStorage for ChunkedStorage<S> {
    async fn get_item(&self, key: &str) -> VaultResult<Option<String>> {
        let count = match self.read_count(key).await? {
            Some(Some(count)) => count,
            Some(None) => return Ok(None),
            // Values written before chunking live under the bare key
            None => return self.store.get_item(key).await,
        };

        let chunks = try_join_all((0..count).map(|i| {
            let chunk = chunk_key(key, i);
            async move { self.store.get_item(&chunk).await }
        }))
        .await?;

        let mut value = String::new();
        for (index, chunk) in chunks.into_iter().enumerate() {
            match chunk {
                Some(chunk) => value.push_str(&chunk),
                None => {
                    warn!(key, index, count, "missing chunk, treating value as absent");
                    return Ok(None);
                }
            }
        }
        Ok(Some(value))
    }

    async fn set_item(&self, key: &str, value: &str) -> VaultResult<()> {
        if value.is_empty() {
            return self.remove_item(key).await;
        }

        let previous = if self.config.reap_orphans {
            self.read_count(key).await?.flatten()
        } else {
            None
        };

        let chunks = split_chunks(value, self.config.chunk_size);
        self.store
            .set_item(&count_key(key), &chunks.len().to_string())
            .await?;
        try_join_all(chunks.iter().enumerate().map(|(i, chunk)| {
            let target = chunk_key(key, i);
            async move { self.store.set_item(&target, chunk).await }
        }))
        .await?;

        if let Some(previous) = previous {
            if previous > chunks.len() {
                debug!(key, previous, current = chunks.len(), "reaping orphaned chunks");
                self.delete_chunks(key, chunks.len()..previous).await?;
            }
        }

        Ok(())
    }

    async fn remove_item(&self, key: &str) -> VaultResult<()> {
        if let Some(count) = self.read_count(key).await? {
            if let Some(count) = count {
                self.delete_chunks(key, 0..count).await?;
            }
            self.store.delete_item(&count_key(key)).await?;
        }
        // Also clear a value written before chunking
        self.store.delete_item(key).await
    }
}
