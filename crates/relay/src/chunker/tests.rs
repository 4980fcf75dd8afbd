//! Tests for the chunking engine.

use super::split::ContentChunker;
use super::types::{validate_chunk_size, MAX_CHUNK_SIZE_BYTES, MIN_CHUNK_SIZE_BYTES};

fn concat(pieces: &[super::Piece]) -> String {
    pieces.iter().map(|p| p.content.as_str()).collect()
}

// ── Chunk count ─────────────────────────────────────────────────────

#[test]
fn count_is_ceiling_division() {
    let chunker = ContentChunker::new(50 * 1024);
    assert_eq!(chunker.chunk_count(120_000), 3);
    assert_eq!(chunker.chunk_count(50 * 1024), 1);
    assert_eq!(chunker.chunk_count(50 * 1024 + 1), 2);
}

#[test]
fn count_is_at_least_one() {
    let chunker = ContentChunker::new(50 * 1024);
    assert_eq!(chunker.chunk_count(0), 1);
    assert_eq!(chunker.chunk_count(1), 1);
}

#[test]
fn count_is_monotonic_in_file_size() {
    let chunker = ContentChunker::new(8192);
    let mut last = 0;
    for size in (0..200_000).step_by(1999) {
        let count = chunker.chunk_count(size);
        assert!(count >= last, "count decreased at {} bytes", size);
        last = count;
    }
}

// ── Splitting ───────────────────────────────────────────────────────

#[test]
fn single_piece_when_within_budget() {
    let chunker = ContentChunker::new(1000);
    let text = "short content";
    let pieces = chunker.split("a.txt", text, text.len() as u64, None);
    assert_eq!(pieces.len(), 1);
    assert_eq!(pieces[0].content, text);
    assert_eq!(pieces[0].index, 1);
    assert_eq!(pieces[0].total, 1);
}

#[test]
fn empty_content_yields_single_empty_piece() {
    let chunker = ContentChunker::new(1000);
    let pieces = chunker.split("empty.txt", "", 900_000, None);
    assert_eq!(pieces.len(), 1);
    assert_eq!(pieces[0].content, "");
}

#[test]
fn round_trip_across_many_chunks() {
    let chunker = ContentChunker::new(100);
    let text = (0..80)
        .map(|i| format!("line number {} with some filler words\n", i))
        .collect::<String>();
    let pieces = chunker.split("lines.txt", &text, text.len() as u64, None);
    assert!(pieces.len() > 1);
    assert_eq!(concat(&pieces), text);
}

#[test]
fn pieces_are_numbered_in_order() {
    let chunker = ContentChunker::new(100);
    let text = "word ".repeat(200);
    let pieces = chunker.split("w.txt", &text, text.len() as u64, None);
    let total = pieces.len();
    for (i, piece) in pieces.iter().enumerate() {
        assert_eq!(piece.index, i + 1);
        assert_eq!(piece.total, total);
    }
}

#[test]
fn prefers_paragraph_break_inside_window() {
    // Two 60-char paragraphs; a 2-chunk split proposes a cut at char 61,
    // and the paragraph break at 60..62 sits inside the ±25% window.
    let text = format!("{}\n\n{}", "a".repeat(60), "b".repeat(60));
    let chunker = ContentChunker::new(80);
    let pieces = chunker.split("p.txt", &text, text.len() as u64, None);
    assert_eq!(pieces.len(), 2);
    assert!(pieces[0].content.ends_with("\n\n"));
    assert_eq!(pieces[1].content, "b".repeat(60));
    assert_eq!(concat(&pieces), text);
}

#[test]
fn falls_back_to_line_boundary_without_paragraph_breaks() {
    // No paragraph breaks and no spaces: only the newline cut can satisfy
    // the assertion.
    let text = format!("{}\n{}", "a".repeat(60), "b".repeat(60));
    let chunker = ContentChunker::new(80);
    let pieces = chunker.split("l.txt", &text, text.len() as u64, None);
    assert_eq!(pieces.len(), 2);
    assert!(pieces[0].content.ends_with('\n'));
    assert_eq!(pieces[1].content, "b".repeat(60));
    assert_eq!(concat(&pieces), text);
}

#[test]
fn falls_back_to_word_boundary_without_newlines() {
    let text = "ab ".repeat(40);
    let chunker = ContentChunker::new(80);
    let pieces = chunker.split("w.txt", &text, text.len() as u64, None);
    assert_eq!(pieces.len(), 2);
    assert!(pieces[0].content.ends_with(' '));
    assert_eq!(concat(&pieces), text);
}

#[test]
fn hard_cut_when_no_boundary_exists() {
    let text = "x".repeat(300);
    let chunker = ContentChunker::new(100);
    let pieces = chunker.split("solid.txt", &text, text.len() as u64, None);
    assert_eq!(pieces.len(), 3);
    assert_eq!(concat(&pieces), text);
}

#[test]
fn multibyte_text_never_splits_inside_a_char() {
    // 3-byte chars with no spaces or newlines force hard cuts; every cut
    // must still land on a char boundary.
    let text = "\u{65e5}\u{672c}\u{8a9e}".repeat(200);
    let chunker = ContentChunker::new(256);
    let pieces = chunker.split("cjk.txt", &text, text.len() as u64, None);
    assert!(pieces.len() > 1);
    assert_eq!(concat(&pieces), text);
}

#[test]
fn last_piece_takes_remainder_verbatim() {
    let text = format!("{}\n\ntrailing remainder without boundaries", "a".repeat(120));
    let chunker = ContentChunker::new(80);
    let pieces = chunker.split("t.txt", &text, text.len() as u64, None);
    let last = pieces.last().unwrap();
    assert!(text.ends_with(last.content.as_str()));
    assert_eq!(concat(&pieces), text);
}

#[test]
fn metadata_is_carried_on_every_piece() {
    let mut meta = serde_json::Map::new();
    meta.insert("job".to_string(), serde_json::json!("batch-7"));
    let chunker = ContentChunker::new(100);
    let text = "word ".repeat(100);
    let pieces = chunker.split("m.txt", &text, text.len() as u64, Some(&meta));
    for piece in &pieces {
        assert_eq!(piece.source_name, "m.txt");
        assert_eq!(piece.metadata.as_ref().unwrap()["job"], "batch-7");
    }
}

// ── Size validation ─────────────────────────────────────────────────

#[test]
fn clamps_below_minimum() {
    assert_eq!(validate_chunk_size(1000), MIN_CHUNK_SIZE_BYTES);
    assert_eq!(validate_chunk_size(0), MIN_CHUNK_SIZE_BYTES);
}

#[test]
fn clamps_above_maximum() {
    assert_eq!(validate_chunk_size(9_000_000), MAX_CHUNK_SIZE_BYTES);
}

#[test]
fn accepts_values_in_range() {
    assert_eq!(validate_chunk_size(51_200), 51_200);
    assert_eq!(validate_chunk_size(MIN_CHUNK_SIZE_BYTES), MIN_CHUNK_SIZE_BYTES);
    assert_eq!(validate_chunk_size(MAX_CHUNK_SIZE_BYTES), MAX_CHUNK_SIZE_BYTES);
}
