use std::path::PathBuf;
use serde::{Deserialize, Serialize};

/// Why a single asset in a batch did not produce a photo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureStage {
    /// Rejected before compression (declared size over the limit)
    Validation,
    Compression,
    /// Upload failed after the retry budget was spent
    Upload,
}

/// One failed asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetFailure {
    /// Position of the asset in the processed batch
    pub index: usize,
    pub uri: PathBuf,
    pub stage: FailureStage,
    pub reason: String,
}

/// Result of processing one pick
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// Public URLs in the order their assets were supplied
    pub urls: Vec<String>,
    pub failures: Vec<AssetFailure>,
    /// Assets dropped because the batch exceeded the remaining slots
    pub skipped: usize,
}

impl BatchOutcome {
    /// At least one asset failed
    pub fn had_error(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn processed(&self) -> usize {
        self.urls.len() + self.failures.len()
    }
}

/// Final state of a queued delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeleteOutcome {
    Deleted { path: String },
    /// Retry budget exhausted, last error attached
    Failed { path: String, reason: String },
    Cancelled { path: String },
    /// URL does not point into storage, nothing attempted
    Skipped { url: String },
}

impl DeleteOutcome {
    pub fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted { .. })
    }
}
