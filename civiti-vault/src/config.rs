/// Default chunk size, matches the ~2 KB per-value limit of mobile secure stores
pub const DEFAULT_CHUNK_SIZE: usize = 2048;

/// Configuration for chunked session storage
#[derive(Debug, Clone)]
pub struct VaultConfig {
    /// Max bytes per stored chunk. Chunks never split a UTF-8 character.
    pub chunk_size: usize,

    /// Delete chunk indices left over from a previous, longer value after a write.
    ///
    /// Off by default: a shrinking write leaves orphaned chunks until the next
    /// `remove_item`. Readers never see them because `{key}_count` bounds the read.
    pub reap_orphans: bool,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            reap_orphans: false,
        }
    }
}

impl VaultConfig {
    /// Create a new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set chunk size (clamped to at least 4 bytes so any char fits)
    pub fn with_chunk_size(mut self, bytes: usize) -> Self {
        self.chunk_size = bytes.max(4);
        self
    }

    /// Reap orphaned chunks after each write
    pub fn reap_orphans(mut self) -> Self {
        self.reap_orphans = true;
        self
    }
}
