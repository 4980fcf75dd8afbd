//! Per-piece outcomes and the combined job result.

use serde::Serialize;
use tracing::{error, info, warn};

/// What happened to one dispatched piece. Exactly one variant applies and an
/// outcome is never revised after classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Outcome {
    /// The endpoint returned usable text for this piece.
    ContentReceived(String),
    /// Success status with no usable body: the endpoint processes
    /// asynchronously and may legitimately return nothing on this call.
    EmptyAccepted,
    /// Transport failure or remote rejection, with the reason kept for the
    /// error summary.
    Failed(String),
}

/// Output placeholder when every piece was accepted but none returned text.
pub const PENDING_NOTE: &str =
    "[all chunks processed but no content returned - the endpoint may still be processing]";

/// Combined verdict for one job.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateResult {
    pub success: bool,
    /// Combined text: contributing pieces joined by one blank line, with no
    /// headers or footers.
    pub output: Option<String>,
    /// Failure listing, also populated on partial success as a warning note.
    pub error: Option<String>,
    pub content_chunks: usize,
    pub empty_chunks: usize,
    pub failed_chunks: usize,
}

/// Fold per-piece outcomes into a single result.
///
/// Precedence: any content at all is a success (failed pieces are listed in
/// the error summary without blocking); all-empty with no failures is a
/// success carrying [`PENDING_NOTE`]; otherwise the job failed and the error
/// lists every failed index with its reason.
pub fn combine(outcomes: &[Outcome]) -> AggregateResult {
    // Nothing dispatched (a job cancelled before its first piece): vacuous
    // success, since zero pieces failed and there is nothing to combine.
    if outcomes.is_empty() {
        info!("no outcomes to aggregate, nothing was dispatched");
        return AggregateResult {
            success: true,
            output: None,
            error: None,
            content_chunks: 0,
            empty_chunks: 0,
            failed_chunks: 0,
        };
    }

    let total = outcomes.len();
    let mut contents: Vec<&str> = Vec::new();
    let mut empty: Vec<usize> = Vec::new();
    let mut failed: Vec<(usize, &str)> = Vec::new();

    for (i, outcome) in outcomes.iter().enumerate() {
        match outcome {
            Outcome::ContentReceived(text) => contents.push(text),
            Outcome::EmptyAccepted => empty.push(i + 1),
            Outcome::Failed(reason) => failed.push((i + 1, reason.as_str())),
        }
    }

    if !empty.is_empty() {
        info!("chunks with empty responses (async pattern): {:?}", empty);
    }

    if contents.is_empty() {
        if failed.is_empty() && !empty.is_empty() {
            warn!(
                "all {} chunks returned empty (endpoint still processing?)",
                total
            );
            return AggregateResult {
                success: true,
                output: Some(PENDING_NOTE.to_string()),
                error: None,
                content_chunks: 0,
                empty_chunks: empty.len(),
                failed_chunks: 0,
            };
        }

        let message = format!(
            "no content from any chunk ({} failed, {} empty): {}",
            failed.len(),
            empty.len(),
            failure_listing(&failed)
        );
        error!("{}", message);
        return AggregateResult {
            success: false,
            output: None,
            error: Some(message),
            content_chunks: 0,
            empty_chunks: empty.len(),
            failed_chunks: failed.len(),
        };
    }

    let error = if failed.is_empty() {
        None
    } else {
        let listing = failure_listing(&failed);
        warn!("{} of {} chunks failed - {}", failed.len(), total, listing);
        Some(listing)
    };

    info!("combined content from {}/{} chunks", contents.len(), total);
    AggregateResult {
        success: true,
        output: Some(contents.join("\n\n")),
        error,
        content_chunks: contents.len(),
        empty_chunks: empty.len(),
        failed_chunks: failed.len(),
    }
}

fn failure_listing(failed: &[(usize, &str)]) -> String {
    failed
        .iter()
        .map(|(idx, reason)| format!("chunk {}: {}", idx, reason))
        .collect::<Vec<_>>()
        .join(", ")
}
