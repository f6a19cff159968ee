use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the photo pipeline
#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// Destination bucket
    pub bucket: String,

    /// Images wider than this are scaled down to it
    pub max_width: u32,

    /// JPEG quality for recompressed images (0.0 - 1.0)
    pub jpeg_quality: f32,

    /// Below this declared size the image is only re-encoded at full quality
    pub small_file_threshold: u64,

    /// Declared sizes above this are rejected before compression (server-side limit)
    pub max_file_bytes: u64,

    /// Photos allowed per report
    pub max_photos: usize,

    /// Cache-Control sent with every upload
    pub cache_control: String,

    /// Retry schedule for uploads and deletes
    pub retry: RetryPolicy,

    /// Directory for compressed temporary files
    pub temp_dir: PathBuf,

    /// Message surfaced once per batch when any photo failed
    pub upload_failed_message: String,

    /// Message surfaced when camera or library access is refused
    pub permission_denied_message: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            bucket: "issue-photos".to_string(),
            max_width: 1920,
            jpeg_quality: 0.85,
            small_file_threshold: 500 * 1024, // 500KB
            max_file_bytes: 10 * 1024 * 1024, // 10MB
            max_photos: 7,
            cache_control: "3600".to_string(),
            retry: RetryPolicy::default(),
            temp_dir: std::env::temp_dir(),
            upload_failed_message: "Photo upload failed. Please try again.".to_string(),
            permission_denied_message: "Photo access was denied. Enable it in settings.".to_string(),
        }
    }
}

impl MediaConfig {
    /// Create a new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bucket
    pub fn with_bucket<S: Into<String>>(mut self, bucket: S) -> Self {
        self.bucket = bucket.into();
        self
    }

    /// Set max image width
    pub fn with_max_width(mut self, width: u32) -> Self {
        self.max_width = width;
        self
    }

    /// Set JPEG quality, clamped to 0.0 - 1.0
    pub fn with_jpeg_quality(mut self, quality: f32) -> Self {
        self.jpeg_quality = quality.clamp(0.0, 1.0);
        self
    }

    /// Set small file threshold
    pub fn with_small_file_threshold(mut self, bytes: u64) -> Self {
        self.small_file_threshold = bytes;
        self
    }

    /// Set max file size
    pub fn with_max_file_bytes(mut self, bytes: u64) -> Self {
        self.max_file_bytes = bytes;
        self
    }

    /// Set max photos per report
    pub fn with_max_photos(mut self, max: usize) -> Self {
        self.max_photos = max;
        self
    }

    /// Set retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set temp directory
    pub fn with_temp_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.temp_dir = dir.into();
        self
    }

    /// Set user-facing messages
    pub fn with_messages<U: Into<String>, P: Into<String>>(mut self, upload_failed: U, permission_denied: P) -> Self {
        self.upload_failed_message = upload_failed.into();
        self.permission_denied_message = permission_denied.into();
        self
    }
}

/// Bounded exponential backoff
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,

    /// Delay before the first retry
    pub initial_delay: Duration,

    /// Upper bound for any single delay
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    /// Create a new policy with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Policy that never retries
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Set max retries
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set initial delay
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set max delay
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Total attempts including the first
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Delay before retry number `attempt` (1-based): `min(initial * 2^(attempt-1), max)`
    pub fn delay_for(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let factor = 2_u32.checked_pow(attempt - 1).unwrap_or(u32::MAX);
        self.initial_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }
}
