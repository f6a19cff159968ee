use thiserror::Error;

/// Result type for vault operations
pub type VaultResult<T> = Result<T, VaultError>;

/// Errors that can occur while reading or writing secure storage
#[derive(Error, Debug)]
pub enum VaultError {
    #[error("Value for {key} is {len} bytes, store accepts at most {max}")]
    ValueTooLarge { key: String, len: usize, max: usize },

    #[error("Secure store error: {source}")]
    Backend {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Keychain error: {source}")]
    Keyring {
        #[from]
        source: keyring::Error,
    },

    #[error("Blocking store task failed: {source}")]
    TaskJoin {
        #[from]
        source: tokio::task::JoinError,
    },
}

impl VaultError {
    /// Create a backend error from any error type
    pub fn backend<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend {
            source: Box::new(error),
        }
    }

    /// Create a value too large error
    pub fn value_too_large<S: Into<String>>(key: S, len: usize, max: usize) -> Self {
        Self::ValueTooLarge {
            key: key.into(),
            len,
            max,
        }
    }
}
