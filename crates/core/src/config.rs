use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_u64(key: &str, default: u64) -> u64 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub webhook: WebhookConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            webhook: WebhookConfig::from_env(),
        }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!(
            "  webhook:  url={}",
            if self.webhook.url.is_empty() {
                "(unset)"
            } else {
                self.webhook.url.as_str()
            }
        );
        tracing::info!("  timeout:  {}s", self.webhook.timeout_secs);
        tracing::info!(
            "  chunking: {} bytes ({:.0}KB) per chunk",
            self.webhook.chunk_size_bytes,
            self.webhook.chunk_size_bytes as f64 / 1024.0
        );
    }
}

// ── Webhook endpoint ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Receiving endpoint URL. Empty means not configured.
    pub url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Target chunk size in bytes (clamped by the relay at job start).
    pub chunk_size_bytes: usize,
}

impl WebhookConfig {
    fn from_env() -> Self {
        Self {
            url: env_or("WEBHOOK_URL", "http://localhost:5678/webhook-test/hook1"),
            timeout_secs: env_u64("WEBHOOK_TIMEOUT_SECS", 10),
            chunk_size_bytes: env_usize("CHUNK_SIZE_BYTES", 50 * 1024),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn is_configured(&self) -> bool {
        !self.url.is_empty()
    }
}
