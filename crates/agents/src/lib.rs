//! Retrieval and answering components for GraphRAG QA
//!
//! - `EntityGraphStore`: entity/relation graph with a disconnected mode
//! - `VectorIndex`: lazily built chunk embedding index over a PDF or text document
//! - `GraphExtractor`: turns text into relationship triples
//! - `RetrievalOrchestrator`: text plus graph context for a question
//! - `AnswerService`: prompt composition and completion

pub mod answer;
pub mod document;
pub mod error;
pub mod extractor;
pub mod graph_store;
pub mod inference;
pub mod retrieval;
pub mod vector_index;

pub use answer::AnswerService;
pub use document::{load_document, DocumentFormat};
pub use error::{AgentError, Result};
pub use extractor::GraphExtractor;
pub use graph_store::{EntityGraphStore, GRAPH_SEARCH_LIMIT};
pub use inference::{LlmConfig, OpenAiClient};
pub use retrieval::{entity_hint, GraphBuildReport, RetrievalOrchestrator, TEXT_CONTEXT_K};
pub use vector_index::{IndexStatus, VectorIndex, VectorIndexConfig, DEFAULT_SOURCE_DOC};
