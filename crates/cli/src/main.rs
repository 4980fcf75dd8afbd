//! hookline — send file contents through the chunked webhook relay.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use hookline_core::{load_dotenv, Config};
use hookline_relay::{ChunkConfig, HttpTransport, WebhookClient};

#[derive(Parser, Debug)]
#[command(name = "hookline", version, about = "Chunked webhook delivery client")]
struct Cli {
    /// Webhook endpoint URL (overrides WEBHOOK_URL).
    #[arg(long)]
    webhook_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send a file's contents, chunking when the file exceeds the budget.
    Send {
        /// Path of the file to send.
        path: PathBuf,

        /// Source name reported to the endpoint (defaults to the file name).
        #[arg(long)]
        name: Option<String>,

        /// Chunk size in bytes, clamped to 5KB..100KB.
        #[arg(long)]
        chunk_size: Option<usize>,
    },
    /// Probe the webhook and report reachability.
    Test,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    load_dotenv();
    let mut config = Config::from_env();

    let cli = Cli::parse();
    if let Some(url) = cli.webhook_url {
        config.webhook.url = url;
    }
    config.log_summary();
    if !config.webhook.is_configured() {
        tracing::warn!("webhook URL is empty; set WEBHOOK_URL or pass --webhook-url");
    }

    let mut chunk_config = ChunkConfig::from(&config.webhook);

    match cli.command {
        Command::Send {
            path,
            name,
            chunk_size,
        } => {
            if let Some(size) = chunk_size {
                chunk_config.set_chunk_size(size);
            }
            let client = WebhookClient::new(chunk_config, Box::new(HttpTransport::new()));
            send_file(&client, &path, name).await
        }
        Command::Test => {
            let client = WebhookClient::new(chunk_config, Box::new(HttpTransport::new()));
            if client.test_connection().await {
                println!("webhook reachable");
                Ok(())
            } else {
                anyhow::bail!("webhook unreachable")
            }
        }
    }
}

async fn send_file(client: &WebhookClient, path: &Path, name: Option<String>) -> Result<()> {
    let source_name = name.unwrap_or_else(|| {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string())
    });

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    // True on-disk size; the relay falls back to an estimate without it.
    let file_size = fs::metadata(path).map(|m| m.len()).ok();

    let result = client.send(&source_name, &content, file_size, None).await?;

    info!(
        "job finished: {} content, {} empty, {} failed",
        result.content_chunks, result.empty_chunks, result.failed_chunks
    );

    if !result.success {
        anyhow::bail!(result
            .error
            .unwrap_or_else(|| "delivery failed".to_string()));
    }

    if let Some(note) = &result.error {
        eprintln!("warning: {}", note);
    }
    if let Some(output) = &result.output {
        println!("{}", output);
    }
    Ok(())
}
