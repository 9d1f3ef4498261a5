//! Process-wide components shared by handlers and commands

use crate::{AppConfig, Result};
use graphrag_qa_agents::{
    AnswerService, EntityGraphStore, GraphExtractor, OpenAiClient, RetrievalOrchestrator,
    VectorIndex,
};
use graphrag_qa_core::FallbackContent;
use graphrag_qa_db::{
    init_memory, init_persistent, ChunkRepository, DbConnection, GraphRepository, StoreKind,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Everything a request needs, built once at startup
#[derive(Clone)]
pub struct AppContext {
    pub fallback: Arc<FallbackContent>,
    pub graph: Arc<EntityGraphStore>,
    pub index: Arc<VectorIndex>,
    pub retrieval: Arc<RetrievalOrchestrator>,
    pub answers: Arc<AnswerService>,
}

impl AppContext {
    /// Open the stores and wire up the components.
    ///
    /// A store that cannot be opened is logged and replaced by its fallback
    /// mode; only an unusable HTTP client configuration is an error.
    pub async fn initialize(config: &AppConfig) -> Result<Self> {
        let fallback = Arc::new(config.load_fallback());
        let llm = OpenAiClient::from_config(&config.llm)?;

        if llm.is_none() {
            warn!("OPENAI_API_KEY not set, answers will use mock data");
        }

        let graph = match open_graph(config).await {
            Some(db) => EntityGraphStore::connected(GraphRepository::new(db), fallback.clone()),
            None => EntityGraphStore::disconnected(fallback.clone()),
        };

        let chunks = open_store(config, &config.vector_db_path, StoreKind::Vectors)
            .await
            .map(ChunkRepository::new);

        let index = Arc::new(VectorIndex::new(
            chunks,
            llm.clone(),
            config.index.clone(),
            fallback.clone(),
        ));
        let graph = Arc::new(graph);
        let extractor = GraphExtractor::new(llm.clone(), fallback.clone());
        let retrieval = Arc::new(RetrievalOrchestrator::new(
            index.clone(),
            graph.clone(),
            extractor,
        ));
        let answers = Arc::new(AnswerService::new(retrieval.clone(), llm, fallback.clone()));

        Ok(Self {
            fallback,
            graph,
            index,
            retrieval,
            answers,
        })
    }
}

async fn open_graph(config: &AppConfig) -> Option<DbConnection> {
    match &config.graph_db_path {
        Some(path) => open_store(config, path, StoreKind::Graph).await,
        None => {
            info!("Graph store disabled");
            None
        }
    }
}

async fn open_store(config: &AppConfig, path: &Path, kind: StoreKind) -> Option<DbConnection> {
    let opened = if config.memory {
        init_memory(kind).await
    } else {
        init_persistent(path, kind).await
    };

    match opened {
        Ok(db) => {
            if config.memory {
                info!("Opened in-memory {:?} store", kind);
            } else {
                info!("Opened {:?} store at {}", kind, path.display());
            }
            Some(db)
        }
        Err(e) => {
            warn!("Could not open {:?} store, running in fallback mode: {}", kind, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_context() {
        let ctx = AppContext::initialize(&AppConfig::default().in_memory())
            .await
            .unwrap();

        assert!(ctx.graph.is_connected());
        assert!(!ctx.answers.is_llm_configured());
        assert!(!ctx.index.status().await.is_ready());
    }

    #[tokio::test]
    async fn test_graph_can_be_disabled() {
        let ctx = AppContext::initialize(&AppConfig::default().in_memory().without_graph())
            .await
            .unwrap();

        assert!(!ctx.graph.is_connected());
    }

    #[tokio::test]
    async fn test_persistent_stores() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            vector_db_path: dir.path().join("vectordb"),
            graph_db_path: Some(dir.path().join("graphdb")),
            ..AppConfig::default()
        };

        let ctx = AppContext::initialize(&config).await.unwrap();
        assert!(ctx.graph.is_connected());
        assert!(ctx.graph.store_triple("A", "REL", "B").await);
    }
}
