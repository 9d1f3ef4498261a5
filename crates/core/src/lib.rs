//! Core domain types for GraphRAG QA
//!
//! Triples and their textual notation, document chunks, question/answer
//! exchanges, and the fallback-content table used when a dependency
//! is unavailable.

pub mod answer;
pub mod chunk;
pub mod error;
pub mod fallback;
pub mod triple;

pub use answer::{AnswerSource, AskResponse, Exchange};
pub use chunk::{DocumentChunk, TextSplitter, FALLBACK_SOURCE};
pub use error::{CoreError, Result};
pub use fallback::{FallbackContent, TestPayload};
pub use triple::{parse_line, parse_triples, SkippedLine, Triple, TripleParse};
