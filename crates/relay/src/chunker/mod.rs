//! Content chunking engine.
//!
//! Piece count is derived from the source's on-disk byte size, the actual
//! split operates on character positions, cutting at paragraph/line/word
//! boundaries where one falls inside the search window.

mod split;
mod types;

pub use split::ContentChunker;
pub use types::{
    validate_chunk_size, ChunkConfig, Piece, MAX_CHUNK_SIZE_BYTES, MIN_CHUNK_SIZE_BYTES,
};

#[cfg(test)]
mod tests;
