//! Chunk sizing configuration and the outbound piece type.

use std::time::Duration;

use serde_json::{Map, Value};
use tracing::{info, warn};

use hookline_core::WebhookConfig;

// ── Configuration ───────────────────────────────────────────────────────────

/// Smallest accepted chunk size (5 KB).
pub const MIN_CHUNK_SIZE_BYTES: usize = 5 * 1024;
/// Largest accepted chunk size (100 KB).
pub const MAX_CHUNK_SIZE_BYTES: usize = 100 * 1024;

/// Per-session relay configuration. Jobs clone this at start, so a runtime
/// chunk-size change never affects pieces already in flight.
#[derive(Debug, Clone)]
pub struct ChunkConfig {
    /// Receiving endpoint URL. Empty means not configured.
    pub webhook_url: String,
    /// Timeout applied to every piece's request.
    pub timeout: Duration,
    /// Target chunk size in source bytes, always within [MIN, MAX].
    pub chunk_size_bytes: usize,
}

impl ChunkConfig {
    pub fn new(webhook_url: String, timeout: Duration, chunk_size_bytes: usize) -> Self {
        Self {
            webhook_url,
            timeout,
            chunk_size_bytes: validate_chunk_size(chunk_size_bytes),
        }
    }

    /// Replace the active chunk size, re-clamping into the accepted range.
    pub fn set_chunk_size(&mut self, size_bytes: usize) {
        let old = self.chunk_size_bytes;
        self.chunk_size_bytes = validate_chunk_size(size_bytes);
        info!(
            "chunk size changed: {} -> {} bytes",
            old, self.chunk_size_bytes
        );
    }
}

impl From<&WebhookConfig> for ChunkConfig {
    fn from(cfg: &WebhookConfig) -> Self {
        Self::new(cfg.url.clone(), cfg.timeout(), cfg.chunk_size_bytes)
    }
}

/// Clamp a requested chunk size into [MIN, MAX]. Never fails.
pub fn validate_chunk_size(size: usize) -> usize {
    if size < MIN_CHUNK_SIZE_BYTES {
        warn!(
            "chunk size {} too small, using minimum {}",
            size, MIN_CHUNK_SIZE_BYTES
        );
        return MIN_CHUNK_SIZE_BYTES;
    }
    if size > MAX_CHUNK_SIZE_BYTES {
        warn!(
            "chunk size {} too large, using maximum {}",
            size, MAX_CHUNK_SIZE_BYTES
        );
        return MAX_CHUNK_SIZE_BYTES;
    }
    size
}

// ── Piece ───────────────────────────────────────────────────────────────────

/// One bounded slice of a payload, sent as a single request.
#[derive(Debug, Clone)]
pub struct Piece {
    /// 1-based position within the job. Ordering is significant: the
    /// endpoint sees "chunk N of M" and pieces are dispatched in order.
    pub index: usize,
    /// Total pieces in the job.
    pub total: usize,
    /// Slice of the source text.
    pub content: String,
    /// Name of the originating file or source.
    pub source_name: String,
    /// Caller-supplied metadata forwarded with every request.
    pub metadata: Option<Map<String, Value>>,
}
