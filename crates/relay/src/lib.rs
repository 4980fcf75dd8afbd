//! Chunked webhook delivery with response aggregation.
//!
//! Oversized payloads are split at paragraph/line/word boundaries, dispatched
//! to the webhook one piece at a time in index order, and the per-piece
//! outcomes are folded back into one combined result. The endpoint is allowed
//! to answer asynchronously: a success status with an empty body counts as
//! "still working", not a failure.

pub mod chunker;
pub mod client;
pub mod outcome;
pub mod response;
pub mod transport;

pub use chunker::{ChunkConfig, ContentChunker, Piece};
pub use client::{RelayError, WebhookClient};
pub use outcome::{combine, AggregateResult, Outcome};
pub use response::ResponseParser;
pub use transport::{HttpTransport, Transport, TransportError};
