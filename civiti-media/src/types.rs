use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Storage path of an uploaded photo, e.g. `{owner}/{millis}-{suffix}.jpg`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoragePath(pub String);

impl StoragePath {
    /// Create from existing string
    pub fn from_string(path: String) -> Self {
        Self(path)
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StoragePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Context for upload operations (owner and request info)
#[derive(Debug, Clone)]
pub struct UploadCtx {
    pub owner_id: String,
    pub request_id: String,
}

impl UploadCtx {
    pub fn new(owner_id: String) -> Self {
        Self {
            owner_id,
            request_id: Uuid::new_v4().to_string(),
        }
    }

    pub fn with_request_id(mut self, request_id: String) -> Self {
        self.request_id = request_id;
        self
    }
}

/// A picked image, as reported by the camera or library picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAsset {
    pub uri: PathBuf,
    pub width: Option<u32>,
    pub file_size: Option<u64>,
}

impl ImageAsset {
    pub fn new<P: Into<PathBuf>>(uri: P) -> Self {
        Self {
            uri: uri.into(),
            width: None,
            file_size: None,
        }
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_file_size(mut self, bytes: u64) -> Self {
        self.file_size = Some(bytes);
        self
    }
}

/// Which picker produced the assets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickSource {
    Camera,
    Gallery,
}

impl PickSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Camera => "camera",
            Self::Gallery => "gallery",
        }
    }

    /// Whether the picker lets the user select several images
    pub fn allows_multiple(&self) -> bool {
        matches!(self, Self::Gallery)
    }
}

impl std::fmt::Display for PickSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Observable upload state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadState {
    pub is_uploading: bool,
    pub error: Option<String>,
}
