use async_trait::async_trait;
use tracing::debug;

use crate::{SecureStore, VaultResult};

/// Secure store backed by the OS keychain.
///
/// Each key becomes one keychain entry under `service`. Keychain calls block,
/// so they run on the blocking pool.
///
/// Needs a platform backend: the `apple-native` (macOS/iOS Keychain),
/// `windows-native` (Credential Manager) or `linux-native` (kernel keyutils)
/// feature. All three are on by default through `native-keychain`.
#[derive(Debug, Clone)]
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    pub fn new<S: Into<String>>(service: S) -> Self {
        Self {
            service: service.into(),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    async fn with_entry<T, F>(&self, key: &str, op: F) -> VaultResult<T>
    where
        T: Send + 'static,
        F: FnOnce(keyring::Entry) -> VaultResult<T> + Send + 'static,
    {
        let service = self.service.clone();
        let key = key.to_string();
        tokio::task::spawn_blocking(move || {
            let entry = keyring::Entry::new(&service, &key)?;
            op(entry)
        })
        .await?
    }
}

#[async_trait]
impl SecureStore for KeyringStore {
    async fn get_item(&self, key: &str) -> VaultResult<Option<String>> {
        self.with_entry(key, |entry| match entry.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        })
        .await
    }

    async fn set_item(&self, key: &str, value: &str) -> VaultResult<()> {
        let value = value.to_string();
        self.with_entry(key, move |entry| Ok(entry.set_password(&value)?))
            .await
    }

    async fn delete_item(&self, key: &str) -> VaultResult<()> {
        let result = self
            .with_entry(key, |entry| match entry.delete_credential() {
                Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
                Err(e) => Err(e.into()),
            })
            .await;
        if result.is_ok() {
            debug!(service = %self.service, key, "keychain entry removed");
        }
        result
    }
}
