//! Embedding index over the source document

use crate::{load_document, AgentError, OpenAiClient, Result};
use graphrag_qa_core::{DocumentChunk, FallbackContent, TextSplitter};
use graphrag_qa_db::ChunkRepository;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, warn};

/// Default location of the source document
pub const DEFAULT_SOURCE_DOC: &str = "data/data.pdf";

#[derive(Debug, Clone)]
pub struct VectorIndexConfig {
    /// PDF or UTF-8 text document indexed on first use
    pub source_doc: PathBuf,
    pub splitter: TextSplitter,
}

impl Default for VectorIndexConfig {
    fn default() -> Self {
        Self {
            source_doc: PathBuf::from(DEFAULT_SOURCE_DOC),
            splitter: TextSplitter::default(),
        }
    }
}

/// Whether searches hit real embeddings or the fallback chunks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexStatus {
    Ready { chunks: usize },
    Fallback { reason: String },
}

impl IndexStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, IndexStatus::Ready { .. })
    }

    /// Short label used by the health endpoint
    pub fn label(&self) -> &'static str {
        match self {
            IndexStatus::Ready { .. } => "ready",
            IndexStatus::Fallback { .. } => "fallback",
        }
    }

    fn fallback(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        warn!("Vector index unavailable, using fallback chunks: {}", reason);
        IndexStatus::Fallback { reason }
    }
}

/// Similarity index of document chunks.
///
/// The index is built at most once, on first access. Concurrent first
/// callers wait on the same build.
pub struct VectorIndex {
    repo: Option<ChunkRepository>,
    embedder: Option<OpenAiClient>,
    config: VectorIndexConfig,
    fallback: Arc<FallbackContent>,
    state: OnceCell<IndexStatus>,
}

impl VectorIndex {
    pub fn new(
        repo: Option<ChunkRepository>,
        embedder: Option<OpenAiClient>,
        config: VectorIndexConfig,
        fallback: Arc<FallbackContent>,
    ) -> Self {
        Self {
            repo,
            embedder,
            config,
            fallback,
            state: OnceCell::new(),
        }
    }

    /// Current status, building the index if this is the first access
    pub async fn status(&self) -> &IndexStatus {
        self.state.get_or_init(|| self.build()).await
    }

    /// Status without triggering a build; `None` until first access
    pub fn current_status(&self) -> Option<&IndexStatus> {
        self.state.get()
    }

    async fn build(&self) -> IndexStatus {
        if self.repo.is_none() {
            return IndexStatus::fallback("no chunk store");
        }
        if self.embedder.is_none() {
            return IndexStatus::fallback("OpenAI API key not configured");
        }

        match self.load_or_ingest().await {
            Ok(status) => status,
            Err(e) => IndexStatus::fallback(format!("index build failed: {}", e)),
        }
    }

    async fn load_or_ingest(&self) -> Result<IndexStatus> {
        let repo = self.repo()?;
        let path = &self.config.source_doc;
        let source = source_label(path);

        let existing = repo.count_for_source(&source).await?;
        if existing > 0 {
            info!("Reusing {} stored chunks for {}", existing, source);
            return Ok(IndexStatus::Ready { chunks: existing });
        }

        if path.is_file() {
            let ingested = self.ingest_file(path).await?;
            if ingested == 0 {
                return Ok(IndexStatus::fallback(format!("{} has no text", source)));
            }
            return Ok(IndexStatus::Ready { chunks: ingested });
        }

        // Chunks ingested from other documents are still usable
        let total = repo.count().await?;
        if total > 0 {
            info!("Source document missing, reusing {} stored chunks", total);
            return Ok(IndexStatus::Ready { chunks: total });
        }

        Ok(IndexStatus::fallback(format!(
            "source document not found: {}",
            path.display()
        )))
    }

    /// Embed and store chunks; returns how many were stored.
    ///
    /// Stored chunks of every source present in `chunks` are replaced, so
    /// ingesting the same document twice leaves one copy.
    #[instrument(skip(self, chunks), fields(count = chunks.len()))]
    pub async fn ingest(&self, chunks: &[DocumentChunk]) -> Result<usize> {
        let repo = self.repo()?;
        let embedder = self
            .embedder
            .as_ref()
            .ok_or_else(|| AgentError::NotConfigured("OpenAI API key not configured".into()))?;

        if chunks.is_empty() {
            return Ok(0);
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = embedder.embed_batch(&texts).await?;

        let mut by_source: BTreeMap<&str, (Vec<DocumentChunk>, Vec<Vec<f32>>)> = BTreeMap::new();
        for (chunk, embedding) in chunks.iter().zip(embeddings) {
            let entry = by_source.entry(chunk.source.as_str()).or_default();
            entry.0.push(chunk.clone());
            entry.1.push(embedding);
        }

        let mut stored = 0;
        for (source, (source_chunks, source_embeddings)) in by_source {
            stored += repo
                .replace_source(source, &source_chunks, source_embeddings)
                .await?;
        }

        info!("Ingested {} chunks", stored);
        Ok(stored)
    }

    /// Split a PDF or text file and ingest its chunks
    #[instrument(skip(self))]
    pub async fn ingest_file(&self, path: &Path) -> Result<usize> {
        let text = load_document(path).await?;
        let chunks = self.config.splitter.split(&text, &source_label(path));
        debug!("Split {} into {} chunks", path.display(), chunks.len());
        self.ingest(&chunks).await
    }

    /// The `k` chunks most similar to `query`, or the fallback chunks
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str, k: usize) -> Vec<DocumentChunk> {
        if !self.status().await.is_ready() {
            return self.fallback.chunks(k);
        }

        match self.similar(query, k).await {
            Ok(chunks) => chunks,
            Err(e) => {
                warn!("Vector search failed, using fallback chunks: {}", e);
                self.fallback.chunks(k)
            }
        }
    }

    async fn similar(&self, query: &str, k: usize) -> Result<Vec<DocumentChunk>> {
        let repo = self.repo()?;
        let embedder = self
            .embedder
            .as_ref()
            .ok_or_else(|| AgentError::NotConfigured("OpenAI API key not configured".into()))?;

        let embedding = embedder.embed(query).await?;
        let scored = repo.vector_search(embedding, k).await?;
        debug!("Retrieved {} chunks", scored.len());

        Ok(scored.into_iter().map(|s| s.chunk).collect())
    }

    fn repo(&self) -> Result<&ChunkRepository> {
        self.repo
            .as_ref()
            .ok_or_else(|| AgentError::NotConfigured("chunk store not available".into()))
    }
}

fn source_label(path: &Path) -> String {
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LlmConfig;
    use graphrag_qa_db::{init_memory, StoreKind};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    /// Embeds every input as `[1.0, len]` so that equal-length texts tie
    async fn embedding_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(|req: &Request| {
                let body: serde_json::Value = serde_json::from_slice(&req.body).unwrap();
                let data: Vec<serde_json::Value> = body["input"]
                    .as_array()
                    .unwrap()
                    .iter()
                    .enumerate()
                    .map(|(i, text)| {
                        let len = text.as_str().unwrap().len() as f32;
                        json!({"index": i, "embedding": [1.0, len]})
                    })
                    .collect();
                ResponseTemplate::new(200).set_body_json(json!({ "data": data }))
            })
            .mount(&server)
            .await;
        server
    }

    fn embedder(server: &MockServer) -> OpenAiClient {
        let config = LlmConfig::default()
            .with_api_key("test-key")
            .with_base_url(server.uri());
        OpenAiClient::from_config(&config).unwrap().unwrap()
    }

    async fn chunk_repo() -> ChunkRepository {
        ChunkRepository::new(init_memory(StoreKind::Vectors).await.unwrap())
    }

    #[tokio::test]
    async fn test_without_credential_search_uses_fallback() {
        let index = VectorIndex::new(
            Some(chunk_repo().await),
            None,
            VectorIndexConfig::default(),
            Arc::new(FallbackContent::default()),
        );

        let chunks = index.search("What is GraphRAG?", 3).await;
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.is_fallback()));
        assert_eq!(
            chunks[0].text,
            "GraphRAG combines graph databases with retrieval-augmented generation."
        );
        assert_eq!(index.status().await.label(), "fallback");
    }

    #[tokio::test]
    async fn test_missing_document_selects_fallback() {
        let server = embedding_server().await;
        let config = VectorIndexConfig {
            source_doc: PathBuf::from("/nonexistent/data.txt"),
            splitter: TextSplitter::default(),
        };
        let index = VectorIndex::new(
            Some(chunk_repo().await),
            Some(embedder(&server)),
            config,
            Arc::new(FallbackContent::default()),
        );

        match index.status().await {
            IndexStatus::Fallback { reason } => assert!(reason.contains("not found")),
            other => panic!("unexpected status: {:?}", other),
        }
        assert_eq!(index.search("anything", 2).await.len(), 2);
    }

    #[tokio::test]
    async fn test_builds_from_source_document() {
        let server = embedding_server().await;
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("data.txt");
        std::fs::write(&doc, "GraphRAG links graphs and text. Neo4j stores the graph.").unwrap();

        let config = VectorIndexConfig {
            source_doc: doc,
            splitter: TextSplitter::new(40, 5),
        };
        let index = VectorIndex::new(
            Some(chunk_repo().await),
            Some(embedder(&server)),
            config,
            Arc::new(FallbackContent::default()),
        );

        let status = index.status().await.clone();
        let IndexStatus::Ready { chunks } = status else {
            panic!("index not built: {:?}", status);
        };
        assert!(chunks >= 2);

        let results = index.search("GraphRAG", 3).await;
        assert!(!results.is_empty());
        assert!(results.iter().all(|c| !c.is_fallback()));
    }

    #[tokio::test]
    async fn test_reuses_stored_chunks() {
        let server = embedding_server().await;
        let repo = chunk_repo().await;
        let doc = PathBuf::from("/nonexistent/data.txt");
        repo.insert_chunk(
            &DocumentChunk::new("stored earlier", source_label(&doc), 0),
            vec![1.0, 14.0],
        )
        .await
        .unwrap();

        let config = VectorIndexConfig {
            source_doc: doc,
            splitter: TextSplitter::default(),
        };
        let index = VectorIndex::new(
            Some(repo),
            Some(embedder(&server)),
            config,
            Arc::new(FallbackContent::default()),
        );

        assert_eq!(index.status().await, &IndexStatus::Ready { chunks: 1 });
        assert_eq!(index.search("query", 3).await[0].text, "stored earlier");
    }

    #[tokio::test]
    async fn test_reingesting_a_document_replaces_its_chunks() {
        let server = embedding_server().await;
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("data.txt");
        std::fs::write(&doc, "GraphRAG links graphs and text.").unwrap();

        let config = VectorIndexConfig {
            source_doc: doc.clone(),
            splitter: TextSplitter::default(),
        };
        let index = VectorIndex::new(
            Some(chunk_repo().await),
            Some(embedder(&server)),
            config,
            Arc::new(FallbackContent::default()),
        );

        assert_eq!(index.status().await, &IndexStatus::Ready { chunks: 1 });
        assert_eq!(index.ingest_file(&doc).await.unwrap(), 1);

        let texts: Vec<String> = index
            .search("GraphRAG", 3)
            .await
            .into_iter()
            .map(|c| c.text)
            .collect();
        assert_eq!(texts, vec!["GraphRAG links graphs and text."]);
    }

    #[tokio::test]
    async fn test_builds_from_pdf_document() {
        let server = embedding_server().await;
        let config = VectorIndexConfig {
            source_doc: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/sample.pdf"),
            splitter: TextSplitter::default(),
        };
        let index = VectorIndex::new(
            Some(chunk_repo().await),
            Some(embedder(&server)),
            config,
            Arc::new(FallbackContent::default()),
        );

        assert!(index.status().await.is_ready());
        let results = index.search("graphs", 3).await;
        assert!(results.iter().any(|c| c.text.contains("GraphRAG")));
    }

    #[tokio::test]
    async fn test_current_status_does_not_build() {
        let index = VectorIndex::new(
            None,
            None,
            VectorIndexConfig::default(),
            Arc::new(FallbackContent::default()),
        );

        assert!(index.current_status().is_none());
        index.status().await;
        assert_eq!(index.current_status().map(|s| s.label()), Some("fallback"));
    }

    #[tokio::test]
    async fn test_ingest_requires_credential() {
        let index = VectorIndex::new(
            Some(chunk_repo().await),
            None,
            VectorIndexConfig::default(),
            Arc::new(FallbackContent::default()),
        );

        let result = index.ingest(&[DocumentChunk::new("text", "doc.txt", 0)]).await;
        assert!(matches!(result, Err(AgentError::NotConfigured(_))));
    }
}
