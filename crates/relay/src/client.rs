//! High-level webhook client: chunk, dispatch in index order, aggregate.

use std::time::Duration;

use chrono::Local;
use serde_json::{json, Map, Value};
use tracing::{debug, error, info, warn};

use crate::chunker::{ChunkConfig, ContentChunker, Piece};
use crate::outcome::{combine, AggregateResult, Outcome};
use crate::response::ResponseParser;
use crate::transport::Transport;

/// Statuses the endpoint uses for accepted requests.
const ACCEPT_STATUSES: [u16; 3] = [200, 201, 202];
/// The reachability probe additionally accepts these: a webhook harness may
/// 404 an unregistered test payload while still being up.
const REACHABLE_STATUSES: [u16; 5] = [200, 201, 202, 400, 404];
/// Fixed timeout for the reachability probe.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);
/// How much of a rejection body to keep in the failure reason.
const BODY_SNIPPET_CHARS: usize = 200;

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("webhook URL not configured")]
    NotConfigured,
}

pub struct WebhookClient {
    config: ChunkConfig,
    transport: Box<dyn Transport>,
}

impl WebhookClient {
    pub fn new(config: ChunkConfig, transport: Box<dyn Transport>) -> Self {
        info!(
            "relay client initialized with chunk_size={} bytes ({:.0}KB)",
            config.chunk_size_bytes,
            config.chunk_size_bytes as f64 / 1024.0
        );
        Self { config, transport }
    }

    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }

    /// Change the chunk size for future jobs; the value is clamped.
    pub fn set_chunk_size(&mut self, size_bytes: usize) {
        self.config.set_chunk_size(size_bytes);
    }

    /// Send `content` to the webhook, splitting it when the source exceeds
    /// the configured chunk budget. Pieces go out one at a time, in order; a
    /// per-piece failure never aborts the batch.
    ///
    /// `file_size_bytes` should be the on-disk size of the source. When
    /// absent it is estimated as twice the character count, which skews the
    /// chunk count for multi-byte-heavy text; the estimate is preserved
    /// because it determines externally observed chunk boundaries.
    pub async fn send(
        &self,
        source_name: &str,
        content: &str,
        file_size_bytes: Option<u64>,
        metadata: Option<Map<String, Value>>,
    ) -> Result<AggregateResult, RelayError> {
        self.send_with_cancel(source_name, content, file_size_bytes, metadata, || true)
            .await
    }

    /// Like [`send`](Self::send), but checks `keep_going` before each piece.
    /// The in-flight request always finishes; nothing is dispatched after the
    /// predicate returns false, and outcomes gathered so far aggregate
    /// normally.
    pub async fn send_with_cancel(
        &self,
        source_name: &str,
        content: &str,
        file_size_bytes: Option<u64>,
        metadata: Option<Map<String, Value>>,
        keep_going: impl Fn() -> bool,
    ) -> Result<AggregateResult, RelayError> {
        if self.config.webhook_url.is_empty() {
            error!("webhook URL not configured, refusing to send");
            return Err(RelayError::NotConfigured);
        }

        // Snapshot: a chunk-size change mid-job must not affect this job.
        let config = self.config.clone();

        let char_len = content.chars().count();
        let file_size_bytes = file_size_bytes.unwrap_or_else(|| {
            let estimate = char_len as u64 * 2;
            warn!(
                "file size not provided, estimating {} bytes ({:.1}KB)",
                estimate,
                estimate as f64 / 1024.0
            );
            estimate
        });

        info!("processing: {}", source_name);
        info!(
            "  file size: {} bytes ({:.1}KB), content: {} chars",
            file_size_bytes,
            file_size_bytes as f64 / 1024.0,
            char_len
        );
        info!(
            "  chunk strategy: {} bytes ({:.0}KB) per chunk",
            config.chunk_size_bytes,
            config.chunk_size_bytes as f64 / 1024.0
        );

        if file_size_bytes <= config.chunk_size_bytes as u64 {
            info!("within chunk limit, sending as single chunk");
            let piece = Piece {
                index: 1,
                total: 1,
                content: content.to_string(),
                source_name: source_name.to_string(),
                metadata,
            };
            let outcome = self.send_piece(&piece, &config).await;
            return Ok(combine(&[outcome]));
        }

        let chunker = ContentChunker::new(config.chunk_size_bytes);
        let pieces = chunker.split(source_name, content, file_size_bytes, metadata.as_ref());
        let total = pieces.len();

        let mut outcomes = Vec::with_capacity(total);
        for piece in &pieces {
            if !keep_going() {
                info!(
                    "job cancelled after {}/{} chunks, aggregating partial outcomes",
                    outcomes.len(),
                    total
                );
                break;
            }
            info!(
                "processing chunk {}/{} ({} chars)",
                piece.index,
                piece.total,
                piece.content.chars().count()
            );
            outcomes.push(self.send_piece(piece, &config).await);
        }

        Ok(combine(&outcomes))
    }

    /// Probe the endpoint with a minimal test payload.
    pub async fn test_connection(&self) -> bool {
        info!("testing connection to {}", self.config.webhook_url);
        match self
            .transport
            .post_json(&self.config.webhook_url, &json!({"test": true}), PROBE_TIMEOUT)
            .await
        {
            Ok((status, _)) => {
                let reachable = REACHABLE_STATUSES.contains(&status);
                if reachable {
                    info!("webhook connection test passed (status {})", status);
                } else {
                    warn!("webhook returned unexpected status during test: {}", status);
                }
                reachable
            }
            Err(err) => {
                error!("connection test failed: {}", err);
                false
            }
        }
    }

    async fn send_piece(&self, piece: &Piece, config: &ChunkConfig) -> Outcome {
        let mut payload = json!({
            "file_name": piece.source_name,
            "content": piece.content,
            "timestamp": Local::now().to_rfc3339(),
        });

        let multi = piece.total > 1;
        if multi {
            payload["chunk_number"] = json!(piece.index);
            payload["total_chunks"] = json!(piece.total);
            debug!("sending chunk {}/{}", piece.index, piece.total);
        }

        let mut meta = piece.metadata.clone().unwrap_or_default();
        if multi {
            meta.insert("chunk_index".to_string(), json!(piece.index));
            meta.insert("total_chunks".to_string(), json!(piece.total));
        }
        if !meta.is_empty() {
            payload["metadata"] = Value::Object(meta);
        }

        info!("sending to webhook: {}", config.webhook_url);

        match self
            .transport
            .post_json(&config.webhook_url, &payload, config.timeout)
            .await
        {
            Ok((status, body)) => classify_response(piece.index, status, &body),
            Err(err) => {
                error!("chunk {} transport failure: {}", piece.index, err);
                Outcome::Failed(err.to_string())
            }
        }
    }
}

/// Classify one HTTP response into an [`Outcome`].
fn classify_response(index: usize, status: u16, body: &str) -> Outcome {
    // A 404 naming an unregistered webhook is a hard failure even though the
    // reachability probe treats plain 404s as reachable.
    if status == 404 && body.contains("not registered") {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| "webhook not registered".to_string());
        let reason = format!("endpoint returned 404: {}", message);
        error!("chunk {} rejected: {}", index, reason);
        return Outcome::Failed(reason);
    }

    if !ACCEPT_STATUSES.contains(&status) {
        let reason = format!("endpoint returned {}: {}", status, snippet(body));
        error!("chunk {} rejected: {}", index, reason);
        return Outcome::Failed(reason);
    }

    match ResponseParser::extract(body) {
        Some(text) => {
            info!("chunk {} returned content (status {})", index, status);
            Outcome::ContentReceived(text)
        }
        None => {
            info!(
                "chunk {}: status {} with empty response (async processing pattern)",
                index, status
            );
            Outcome::EmptyAccepted
        }
    }
}

fn snippet(body: &str) -> String {
    if body.chars().count() <= BODY_SNIPPET_CHARS {
        body.to_string()
    } else {
        body.chars().take(BODY_SNIPPET_CHARS).collect()
    }
}
