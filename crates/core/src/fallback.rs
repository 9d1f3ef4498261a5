//! Substitute content served when a dependency is unavailable
//!
//! Every mock literal the service can return lives in [`FallbackContent`].
//! The defaults can be partially overridden from a JSON file.

use crate::{DocumentChunk, Result, Triple};
use serde::{Deserialize, Serialize};
use std::path::Path;

const QUESTION_PLACEHOLDER: &str = "{question}";

/// Static payload of `GET /test`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestPayload {
    pub status: String,
    pub mock_context: String,
    pub mock_graph: Vec<Triple>,
    pub message: String,
}

impl Default for TestPayload {
    fn default() -> Self {
        Self {
            status: "✅ API is working".into(),
            mock_context: "GraphRAG combines graph databases with retrieval-augmented generation for enhanced knowledge management.".into(),
            mock_graph: vec![
                Triple::fixed("GraphRAG", "USES", "Graph Database"),
                Triple::fixed("GraphRAG", "COMBINES", "LLM Technology"),
            ],
            message: "This is mock data. Connect your OpenAI API key for real responses.".into(),
        }
    }
}

/// The fallback-content table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackContent {
    /// Chunks returned by the vector index when it is not built
    pub text_chunks: Vec<String>,

    /// Triples returned by the graph store when it is disconnected
    pub graph_triples: Vec<Triple>,

    /// Extractor output when the model call fails
    pub extraction: String,

    /// Answer when no model is configured; `{question}` is substituted
    pub mock_answer: String,

    /// Hint attached to mock answers
    pub mock_note: String,

    /// Answer when the model call fails; `{question}` is substituted
    pub error_answer: String,

    pub test_payload: TestPayload,
}

impl Default for FallbackContent {
    fn default() -> Self {
        Self {
            text_chunks: vec![
                "GraphRAG combines graph databases with retrieval-augmented generation.".into(),
                "Neo4j is a graph database management system.".into(),
                "Vector embeddings enable semantic search capabilities.".into(),
            ],
            graph_triples: vec![
                Triple::fixed("MockEntity1", "RELATION", "MockEntity2"),
                Triple::fixed("GraphRAG", "RELATED_TO", "NLPTechnology"),
            ],
            extraction: "(MockEntity1)-[RELATION]->(MockEntity2)".into(),
            mock_answer: "Mock Response: Based on the context about '{question}', GraphRAG provides intelligent retrieval-augmented generation capabilities. Configure your OpenAI API key in .env file for real responses.".into(),
            mock_note: "Set OPENAI_API_KEY in .env file for real responses".into(),
            error_answer: "Mock Response: I can help with questions about {question}. Please configure your OpenAI API key.".into(),
            test_payload: TestPayload::default(),
        }
    }
}

impl FallbackContent {
    /// Parse a (possibly partial) table from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a table from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            crate::CoreError::Validation(format!(
                "cannot read fallback file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_json(&content)
    }

    /// The first `k` fallback chunks
    pub fn chunks(&self, k: usize) -> Vec<DocumentChunk> {
        self.text_chunks
            .iter()
            .take(k)
            .enumerate()
            .map(|(i, text)| DocumentChunk::fallback(text.clone(), i))
            .collect()
    }

    pub fn mock_answer_for(&self, question: &str) -> String {
        self.mock_answer.replace(QUESTION_PLACEHOLDER, question)
    }

    pub fn error_answer_for(&self, question: &str) -> String {
        self.error_answer.replace(QUESTION_PLACEHOLDER, question)
    }
}
