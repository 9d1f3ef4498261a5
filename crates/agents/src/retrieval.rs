//! Combines vector and graph retrieval for a question

use crate::{EntityGraphStore, GraphExtractor, VectorIndex};
use graphrag_qa_core::{DocumentChunk, Triple};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Chunks retrieved per question
pub const TEXT_CONTEXT_K: usize = 3;

/// Chunks sampled when building the graph from the corpus
pub const CORPUS_SAMPLE_SIZE: usize = 10;

/// Outcome of a corpus-wide graph build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GraphBuildReport {
    pub chunks_processed: usize,
    pub triples_parsed: usize,
    pub triples_stored: usize,
    pub lines_skipped: usize,
}

pub struct RetrievalOrchestrator {
    index: Arc<VectorIndex>,
    graph: Arc<EntityGraphStore>,
    extractor: GraphExtractor,
}

impl RetrievalOrchestrator {
    pub fn new(
        index: Arc<VectorIndex>,
        graph: Arc<EntityGraphStore>,
        extractor: GraphExtractor,
    ) -> Self {
        Self {
            index,
            graph,
            extractor,
        }
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    pub fn graph(&self) -> &EntityGraphStore {
        &self.graph
    }

    pub async fn retrieve_text_chunks(&self, question: &str) -> Vec<DocumentChunk> {
        self.index.search(question, TEXT_CONTEXT_K).await
    }

    /// Top chunks joined by newlines, most similar first
    pub async fn retrieve_text_context(&self, question: &str) -> String {
        self.retrieve_text_chunks(question)
            .await
            .into_iter()
            .map(|chunk| chunk.text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub async fn retrieve_graph_context(&self, entity_hint: &str) -> Vec<Triple> {
        self.graph.search(entity_hint).await
    }

    /// Extract triples from a sample of the corpus and store them.
    ///
    /// Failures are counted per chunk and per triple.
    #[instrument(skip(self))]
    pub async fn build_graph_from_corpus(&self) -> GraphBuildReport {
        let mut report = GraphBuildReport::default();
        let chunks = self.index.search(" ", CORPUS_SAMPLE_SIZE).await;

        for chunk in &chunks {
            let parse = self.extractor.extract_triples(&chunk.text).await;
            report.chunks_processed += 1;
            report.triples_parsed += parse.triples.len();
            report.lines_skipped += parse.skipped.len();

            for triple in &parse.triples {
                if self.graph.store(triple).await {
                    report.triples_stored += 1;
                }
            }
        }

        if report.lines_skipped > 0 {
            warn!("Skipped {} unparseable extraction lines", report.lines_skipped);
        }
        info!(
            "Graph build processed {} chunks, stored {} of {} triples",
            report.chunks_processed, report.triples_stored, report.triples_parsed
        );

        report
    }
}

/// First whitespace-delimited token of the question, or `""`
pub fn entity_hint(question: &str) -> &str {
    question.split_whitespace().next().unwrap_or("")
}
