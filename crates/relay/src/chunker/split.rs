//! Boundary-aware content splitting.

use serde_json::{Map, Value};
use tracing::{debug, info};

use super::types::Piece;

/// Splits text into approximately equal pieces, preferring linguistic
/// boundaries over hard cuts.
pub struct ContentChunker {
    chunk_size_bytes: usize,
}

impl ContentChunker {
    pub fn new(chunk_size_bytes: usize) -> Self {
        Self { chunk_size_bytes }
    }

    /// Number of pieces for a source of `file_size_bytes`: ceiling division
    /// against the budget, never below 1.
    ///
    /// Sizing is driven by the source's byte size, not the in-memory
    /// character count. The two diverge for multi-byte text; the divergence
    /// is preserved because it determines externally observed chunk
    /// boundaries.
    pub fn chunk_count(&self, file_size_bytes: u64) -> usize {
        let budget = self.chunk_size_bytes as u64;
        let count = ((file_size_bytes + budget - 1) / budget).max(1) as usize;
        debug!(
            "file {} bytes ({:.1}KB): {} chunks x {:.0}KB",
            file_size_bytes,
            file_size_bytes as f64 / 1024.0,
            count,
            budget as f64 / 1024.0
        );
        count
    }

    /// Split `content` into ordered pieces whose concatenation reproduces it
    /// exactly. Each cut lands on a paragraph break, line break, or space
    /// when one exists within ±25% of the target piece size; the last piece
    /// always takes the remainder verbatim.
    pub fn split(
        &self,
        source_name: &str,
        content: &str,
        file_size_bytes: u64,
        metadata: Option<&Map<String, Value>>,
    ) -> Vec<Piece> {
        let num_chunks = self.chunk_count(file_size_bytes);
        let char_len = content.chars().count();

        info!(
            "splitting {} ({} chars from {} bytes) into {} chunks",
            source_name, char_len, file_size_bytes, num_chunks
        );

        let make = |index: usize, total: usize, text: &str| Piece {
            index,
            total,
            content: text.to_string(),
            source_name: source_name.to_string(),
            metadata: metadata.cloned(),
        };

        if num_chunks == 1 || content.is_empty() {
            debug!("content fits in a single chunk");
            return vec![make(1, 1, content)];
        }

        // Byte offset of every char boundary, plus the end of the string.
        // Cuts are computed in character positions (the target size is a
        // character count) but slicing happens on these byte offsets, so a
        // cut can never land inside a multi-byte character.
        let mut boundaries: Vec<usize> = content.char_indices().map(|(b, _)| b).collect();
        boundaries.push(content.len());
        let byte_at = |char_idx: usize| boundaries[char_idx.min(char_len)];
        let char_at = |byte_idx: usize| boundaries.partition_point(|&b| b < byte_idx);

        let chars_per_chunk = (char_len + num_chunks - 1) / num_chunks;
        debug!(
            "target: {} chars per chunk (total {} chars)",
            chars_per_chunk, char_len
        );

        let mut pieces = Vec::with_capacity(num_chunks);
        let mut start_c = 0usize;

        for n in 0..num_chunks {
            let end_c = if n == num_chunks - 1 {
                debug!(
                    "chunk {}/{}: last chunk takes remainder from {} to {}",
                    n + 1,
                    num_chunks,
                    start_c,
                    char_len
                );
                char_len
            } else {
                let proposed_c = (start_c + chars_per_chunk).min(char_len);
                let window = chars_per_chunk / 4;
                let search_start_c = proposed_c.saturating_sub(window).max(start_c);
                let search_end_c = (proposed_c + window).min(char_len);

                let cut_b = find_boundary(
                    content,
                    byte_at(start_c),
                    byte_at(proposed_c),
                    byte_at(search_start_c),
                    byte_at(search_end_c),
                );
                char_at(cut_b)
            };

            let text = &content[byte_at(start_c)..byte_at(end_c)];
            info!("chunk {}/{}: {} chars", n + 1, num_chunks, end_c - start_c);
            pieces.push(make(n + 1, num_chunks, text));

            start_c = end_c;
        }

        info!("created {} pieces", pieces.len());
        pieces
    }
}

/// Search backward inside `[search_start, search_end)` for, in preference
/// order: a paragraph break, a line break, then a space. The delimiter stays
/// on the earlier piece. Falls back to a hard cut at `proposed`.
/// All arguments are byte offsets on char boundaries.
fn find_boundary(
    content: &str,
    start: usize,
    proposed: usize,
    search_start: usize,
    search_end: usize,
) -> usize {
    let window = &content[search_start..search_end];

    if let Some(pos) = window.rfind("\n\n") {
        if search_start + pos > start {
            debug!("split chunk at paragraph boundary");
            return search_start + pos + 2;
        }
    }

    if let Some(pos) = window.rfind('\n') {
        if search_start + pos > start {
            debug!("split chunk at line boundary");
            return search_start + pos + 1;
        }
    }

    if let Some(pos) = window.rfind(' ') {
        if search_start + pos > start {
            debug!("split chunk at word boundary");
            return search_start + pos + 1;
        }
    }

    debug!("no boundary found, performing hard split");
    proposed
}
