use async_trait::async_trait;

use crate::{ChunkedStorage, SecureStore, VaultConfig, VaultResult};

/// Storage surface consumed by the auth session lifecycle.
///
/// Errors from the underlying store propagate unchanged; callers own logging
/// and recovery.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    async fn get_item(&self, key: &str) -> VaultResult<Option<String>>;

    /// Store `value`. An empty value removes the key.
    async fn set_item(&self, key: &str, value: &str) -> VaultResult<()>;

    async fn remove_item(&self, key: &str) -> VaultResult<()>;
}

/// Pass-through storage for stores without a per-value size limit
pub struct DirectStorage<S> {
    store: S,
}

impl<S: SecureStore> DirectStorage<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[async_trait]
impl<S: SecureStore> SessionStorage for DirectStorage<S> {
    async fn get_item(&self, key: &str) -> VaultResult<Option<String>> {
        self.store.get_item(key).await
    }

    async fn set_item(&self, key: &str, value: &str) -> VaultResult<()> {
        self.store.set_item(key, value).await
    }

    async fn remove_item(&self, key: &str) -> VaultResult<()> {
        self.store.delete_item(key).await
    }
}

/// Where the session blob lives on the current platform
pub enum StorageAdapter<S> {
    /// Size-limited secure store (mobile keychains)
    Chunked(ChunkedStorage<S>),
    /// Unlimited store, no chunking (browser local storage)
    Direct(DirectStorage<S>),
    /// No persistent store available: reads miss, writes are dropped
    Unavailable,
}

impl<S: SecureStore> StorageAdapter<S> {
    pub fn chunked(store: S, config: VaultConfig) -> Self {
        Self::Chunked(ChunkedStorage::with_config(store, config))
    }

    pub fn direct(store: S) -> Self {
        Self::Direct(DirectStorage::new(store))
    }

    pub fn is_persistent(&self) -> bool {
        !matches!(self, Self::Unavailable)
    }
}

#[async_trait]
impl<S: SecureStore> SessionStorage for StorageAdapter<S> {
    async fn get_item(&self, key: &str) -> VaultResult<Option<String>> {
        match self {
            Self::Chunked(storage) => storage.get_item(key).await,
            Self::Direct(storage) => storage.get_item(key).await,
            Self::Unavailable => Ok(None),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> VaultResult<()> {
        match self {
            Self::Chunked(storage) => storage.set_item(key, value).await,
            Self::Direct(storage) => storage.set_item(key, value).await,
            Self::Unavailable => Ok(()),
        }
    }

    async fn remove_item(&self, key: &str) -> VaultResult<()> {
        match self {
            Self::Chunked(storage) => storage.remove_item(key).await,
            Self::Direct(storage) => storage.remove_item(key).await,
            Self::Unavailable => Ok(()),
        }
    }
}
