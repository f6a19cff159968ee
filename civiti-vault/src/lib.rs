//! # civiti-vault: session storage for size-limited secure stores
//!
//! Mobile keychains reject values above roughly 2 KB, while an auth session
//! blob is 3-6 KB. `ChunkedStorage` spreads one value across
//! `{key}_0..{key}_{n-1}` and records `n` under `{key}_count`.
//!
//! ```rust
//! use civiti_vault::prelude::*;
//!
//! # #[tokio::main]
//! # async fn main() -> VaultResult<()> {
//! let store = MemorySecureStore::with_value_limit(2048);
//! let storage = StorageAdapter::chunked(store, VaultConfig::default());
//!
//! let session = "x".repeat(5000);
//! storage.set_item("sb-auth-token", &session).await?;
//! assert_eq!(storage.get_item("sb-auth-token").await?, Some(session));
//!
//! storage.remove_item("sb-auth-token").await?;
//! assert_eq!(storage.get_item("sb-auth-token").await?, None);
//! # Ok(())
//! # }
//! ```

mod adapter;
mod chunked;
mod config;
mod error;
mod keyring_store;
mod store;

pub use adapter::{DirectStorage, SessionStorage, StorageAdapter};
pub use chunked::{chunk_key, count_key, split_chunks, ChunkedStorage};
pub use config::{VaultConfig, DEFAULT_CHUNK_SIZE};
pub use error::{VaultError, VaultResult};
pub use keyring_store::KeyringStore;
pub use store::{MemorySecureStore, SecureStore};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        ChunkedStorage, KeyringStore, MemorySecureStore, SecureStore, SessionStorage,
        StorageAdapter, VaultConfig, VaultError, VaultResult,
    };
}
