use thiserror::Error;

/// Result type for media operations
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur while preparing, uploading or deleting photos
#[derive(Error, Debug)]
pub enum MediaError {
    #[error("File is {size} bytes, limit is {max}")]
    FileTooLarge { size: u64, max: u64 },

    #[error("Compressed image file is empty")]
    EmptyFile,

    #[error("Image compression failed: {reason}")]
    Compression { reason: String },

    #[error("Storage rejected request: {message}")]
    Storage { message: String },

    #[error("Object already exists: {path}")]
    AlreadyExists { path: String },

    #[error("Image picker failed: {reason}")]
    Picker { reason: String },

    #[error("Invalid request: {message}")]
    Invalid { message: String },

    #[error("Storage backend error: {source}")]
    Backend {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl MediaError {
    /// Create a backend error from any error type
    pub fn backend<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend {
            source: Box::new(error),
        }
    }

    /// Create a storage error
    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a compression error
    pub fn compression<S: Into<String>>(reason: S) -> Self {
        Self::Compression {
            reason: reason.into(),
        }
    }

    /// Create an invalid request error
    pub fn invalid<S: Into<String>>(message: S) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create a picker error
    pub fn picker<S: Into<String>>(reason: S) -> Self {
        Self::Picker {
            reason: reason.into(),
        }
    }
}
