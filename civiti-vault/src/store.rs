use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use parking_lot::RwLock;

use crate::{VaultError, VaultResult};

/// Platform secure key-value primitive.
///
/// Implementations may reject values above a per-item size limit; that limit
/// is the reason `ChunkedStorage` exists.
#[async_trait]
pub trait SecureStore: Send + Sync {
    /// Read a value, `None` when the key is absent
    async fn get_item(&self, key: &str) -> VaultResult<Option<String>>;

    /// Write a value
    async fn set_item(&self, key: &str, value: &str) -> VaultResult<()>;

    /// Delete a value. Deleting an absent key succeeds.
    async fn delete_item(&self, key: &str) -> VaultResult<()>;
}

#[async_trait]
impl<S: SecureStore + ?Sized> SecureStore for Arc<S> {
    async fn get_item(&self, key: &str) -> VaultResult<Option<String>> {
        (**self).get_item(key).await
    }

    async fn set_item(&self, key: &str, value: &str) -> VaultResult<()> {
        (**self).set_item(key, value).await
    }

    async fn delete_item(&self, key: &str) -> VaultResult<()> {
        (**self).delete_item(key).await
    }
}

/// In-process secure store with an optional per-value byte limit
#[derive(Debug, Clone, Default)]
pub struct MemorySecureStore {
    values: Arc<RwLock<HashMap<String, String>>>,
    max_value_bytes: Option<usize>,
}

impl MemorySecureStore {
    /// Unlimited store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that rejects values longer than `max` bytes
    pub fn with_value_limit(max: usize) -> Self {
        Self {
            values: Arc::default(),
            max_value_bytes: Some(max),
        }
    }

    /// All keys currently present, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.values.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }
}

#[async_trait]
impl SecureStore for MemorySecureStore {
    async fn get_item(&self, key: &str) -> VaultResult<Option<String>> {
        Ok(self.values.read().get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> VaultResult<()> {
        if let Some(max) = self.max_value_bytes {
            if value.len() > max {
                return Err(VaultError::value_too_large(key, value.len(), max));
            }
        }
        self.values.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete_item(&self, key: &str) -> VaultResult<()> {
        self.values.write().remove(key);
        Ok(())
    }
}
